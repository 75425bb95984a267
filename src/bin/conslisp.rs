//! Interactive conslisp shell
//!
//! Usage:
//!   conslisp              start the REPL
//!   conslisp <file.lisp>  evaluate every expression in the file and print the last value

use anyhow::Context;
use conslisp::{Evaluator, VERSION};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;
use std::fs;
use std::process;

const PROMPT: &str = "> ";

fn main() {
    let args: Vec<String> = env::args().collect();

    let outcome = match args.get(1) {
        Some(path) => run_file(path),
        None => run_repl(),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_file(path: &str) -> anyhow::Result<()> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading '{}'", path))?;

    let evaluator = Evaluator::new();
    let result = evaluator
        .run(&source)
        .with_context(|| format!("evaluating '{}'", path))?;
    println!("{}", result);
    Ok(())
}

fn run_repl() -> anyhow::Result<()> {
    println!("Conslisp {} REPL", VERSION);
    println!("Ctrl+D to exit.");

    let mut rl = DefaultEditor::new().context("initializing line editor")?;
    let evaluator = Evaluator::new();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    tracing::debug!(error = %err, "failed to record history entry");
                }

                // One bad line must not end the session
                match evaluator.eval_str(&line) {
                    Ok(value) => println!("{}", value),
                    Err(err) => println!("Error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("reading input"),
        }
    }

    Ok(())
}
