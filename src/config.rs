//! Command-line configuration for the driver.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::session::SessionOptions;

pub const USAGE: &str = "usage: kaleidoscope [--emit-ir] [--no-opt] [file]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Source file to run; the interactive prompt when absent
    pub file: Option<PathBuf>,
    pub emit_ir: bool,
    pub optimize: bool,
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file: None,
            emit_ir: false,
            optimize: true,
            help: false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    #[error("more than one source file given: {0:?}")]
    ExtraArgument(String),
}

impl Config {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();

        for arg in args {
            match arg.as_str() {
                "--emit-ir" => config.emit_ir = true,
                "--no-opt" => config.optimize = false,
                "-h" | "--help" => config.help = true,
                option if option.starts_with('-') => {
                    return Err(ConfigError::UnknownOption(String::from(option)));
                }
                path if config.file.is_some() => {
                    return Err(ConfigError::ExtraArgument(String::from(path)));
                }
                path => config.file = Some(PathBuf::from(path)),
            }
        }

        Ok(config)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            optimize: self.optimize,
            emit_ir: self.emit_ir,
            file: self
                .file
                .as_ref()
                .map(|path| path.to_string_lossy().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Config, ConfigError};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_args(args(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert!(config.optimize);
        assert_eq!(config.session_options().file, None);
    }

    #[test]
    fn test_config_flags_and_file() {
        let config = Config::from_args(args(&["--no-opt", "demo.ks", "--emit-ir"])).unwrap();

        assert_eq!(config.file, Some(PathBuf::from("demo.ks")));
        assert!(config.emit_ir);
        assert!(!config.optimize);

        let options = config.session_options();
        assert!(!options.optimize);
        assert!(options.emit_ir);
        assert_eq!(options.file.as_deref(), Some("demo.ks"));
    }

    #[test]
    fn test_config_errors() {
        assert_eq!(
            Config::from_args(args(&["--fast"])),
            Err(ConfigError::UnknownOption("--fast".to_string()))
        );
        assert_eq!(
            Config::from_args(args(&["a.ks", "b.ks"])),
            Err(ConfigError::ExtraArgument("b.ks".to_string()))
        );
    }
}
