use std::{env, fs::read_to_string, path::Path, process, time::Instant};

use inkwell::context::Context;
use kaleidoscope::{
    config::{Config, USAGE},
    display_error,
    errors::errors::Error,
    session::session::{Outcome, Session},
};
use rustyline::{error::ReadlineError, DefaultEditor};

fn main() {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if config.help {
        println!("{}", USAGE);
        return;
    }

    let context = Context::create();
    let mut session = match Session::new(&context, config.session_options()) {
        Ok(session) => session,
        Err(error) => {
            display_error(&error, "");
            process::exit(1);
        }
    };

    let status = match &config.file {
        Some(path) => run_file(&mut session, path),
        None => run_repl(&mut session),
    };

    process::exit(status);
}

/// Prints the result of one form. Returns false for errors.
fn report(result: Result<Outcome, Error>, source: &str) -> bool {
    match result {
        Ok(outcome) => {
            eprintln!("{}", outcome);
            true
        }
        Err(error) => {
            display_error(&error, source);
            false
        }
    }
}

fn run_file(session: &mut Session<'_>, path: &Path) -> i32 {
    let start = Instant::now();

    let source = match read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", path.display(), error);
            return 1;
        }
    };

    let mut failed = false;
    session.run_with(&source, |result| {
        if !report(result, &source) {
            failed = true;
        }
    });

    eprintln!("Ran {} in {:?}", path.display(), start.elapsed());

    if failed {
        1
    } else {
        0
    }
}

fn run_repl(session: &mut Session<'_>) -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Could not initialize line editor: {}", error);
            return 1;
        }
    };

    loop {
        match editor.readline("ready> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line.as_str());

                session.run_with(&line, |result| {
                    report(result, &line);
                });
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(error) => {
                eprintln!("Error: {:?}", error);
                return 1;
            }
        }
    }

    0
}
