#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod session;

extern crate regex;

/// Byte offset into a named source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0 && self.1.as_str() == "<null>"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Line number, line text and column of byte `position` in `source`.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\ndef f(x)\n  x + 1\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 39).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, 400).is_none());
    }

    #[test]
    fn test_format_error_with_caret() {
        let error = Error::new(
            ErrorImpl::UnknownVariable {
                variable: "y".to_string(),
            },
            Position(15, Rc::new("test.ks".to_string())),
        );

        let rendered = super::format_error(&error, "def f(x)\n  x + y\n");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnknownVariable (Variable `y` not declared)");
        assert_eq!(lines[1], "-> test.ks");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | x + y");
        assert_eq!(lines[4], "  | ----^");
    }

    #[test]
    fn test_format_error_unpositioned() {
        let error = Error::unpositioned(ErrorImpl::Backend {
            message: "boom".to_string(),
        });

        let rendered = super::format_error(&error, "1 + 1");
        assert_eq!(rendered, "Error: Backend (backend error: boom)\n");
    }
}

/// Renders `error` against the source it was reported for.
pub fn format_error(error: &Error, source: &str) -> String {
    /*
        Error: Name (tip)
        -> file.ks
          |
        2 | x + y
          | ----^
    */

    let mut output = if let ErrorTip::None = error.get_tip() {
        format!("Error: {} ({})\n", error.get_error_name(), error)
    } else {
        format!("Error: {} ({})\n", error.get_error_name(), error.get_tip())
    };

    let position = error.get_position();
    if position.is_null() {
        return output;
    }

    let (line, line_text, line_pos) = match get_line_at_position(source, position.0) {
        Some(found) => found,
        None => {
            output.push_str(&format!("-> {}\n", position.1));
            return output;
        }
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    output.push_str(&format!("-> {}\n", position.1));
    output.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    output
}

/// Prints `error` to stderr in the layout of [`format_error`].
pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
