use std::path::Path;
use std::process::ExitCode;
use std::{env, fs};

use nustack::{INTERACTIVE, Interpreter};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("NUSTACK_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.split_first() {
        Some((script, rest)) => run_script(script, rest),
        None => interactive(),
    }
}

/// Runs a script file. argv starts with the script path; a failure that no
/// `try` handled prints a diagnostic and exits non-zero.
fn run_script(script: &str, rest: &[String]) -> ExitCode {
    let source = match read_file(script) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new();
    let mut argv = vec![script.to_string()];
    argv.extend(rest.iter().cloned());
    interp.set_argv(argv);
    if let Some(parent) = Path::new(script).parent()
        && !parent.as_os_str().is_empty()
    {
        interp.set_current_dir(parent);
    }

    match interp.run(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("error: {failure}");
            ExitCode::FAILURE
        }
    }
}

/// The interactive loop: one shared interpreter, so definitions persist
/// between lines; failures print and the loop keeps going.
fn interactive() -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new();
    interp.set_argv(vec![INTERACTIVE.to_string()]);

    loop {
        match editor.readline("nu> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if let Err(failure) = interp.run(&line) {
                    eprintln!("error: {failure}");
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    match fs::metadata(file_path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{file_path} is not a file"));
            }
        }
        Err(err) => {
            return Err(format!("cannot read {file_path}: {err}"));
        }
    }
    fs::read_to_string(file_path).map_err(|err| format!("cannot read {file_path}: {err}"))
}
