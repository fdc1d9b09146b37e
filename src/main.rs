use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;

use sqlscaffold::error::ScaffoldError;
use sqlscaffold::{generate_model, generate_model_file, ScaffoldOptions, TargetLanguage};

#[derive(Parser)]
#[command(name = "sqlscaffold")]
#[command(author, version, about = "Scaffold ORM-annotated model classes from SQL Server DDL")]
struct Cli {
    /// SQL DDL files to convert
    sql_files: Vec<PathBuf>,

    /// Raw SQL statement to convert to a model
    #[arg(short = 's', long)]
    sql: Option<String>,

    /// Target language for the generated model
    #[arg(short, long)]
    lang: TargetLanguage,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Stop on first error (default is to continue processing all inputs)
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = ScaffoldOptions {
        language: cli.lang,
        verbose: cli.verbose,
    };

    if !cli.sql_files.is_empty() {
        return run_files(&cli.sql_files, &options, cli.fail_fast);
    }

    if let Some(sql) = &cli.sql {
        return run_text(sql, "inline", &options);
    }

    if std::io::stdin().is_terminal() {
        eprintln!("Provide SQL via files, --sql, or pipe via stdin.");
        return ExitCode::from(2);
    }

    let mut sql = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut sql) {
        eprintln!("Error reading stdin: {}", err);
        return ExitCode::from(sqlscaffold::error::EXIT_FILE as u8);
    }
    run_text(&sql, "stdin", &options)
}

/// Process a single inline or piped document.
fn run_text(sql: &str, name: &str, options: &ScaffoldOptions) -> ExitCode {
    match generate_model(sql, name, options) {
        Ok(model) => {
            print_model(name, &model);
            println!("{} -> Model generated successfully.", name);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} -> {}", name, err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Process file inputs, each as an independent run of the pipeline.
///
/// Without `--fail-fast`, all files are generated (in parallel, no shared
/// state) and results print in input order; failures are aggregated.
fn run_files(paths: &[PathBuf], options: &ScaffoldOptions, fail_fast: bool) -> ExitCode {
    if fail_fast {
        for path in paths {
            let name = path.display().to_string();
            match generate_model_file(path, options) {
                Ok(outcome) => print_outcome(&name, &outcome),
                Err(err) => {
                    eprintln!("{} -> {}", name, err);
                    return ExitCode::from(err.exit_code() as u8);
                }
            }
        }
        return ExitCode::SUCCESS;
    }

    let results: Vec<(String, Result<sqlscaffold::FileOutcome, ScaffoldError>)> = paths
        .par_iter()
        .map(|path| (path.display().to_string(), generate_model_file(path, options)))
        .collect();

    let mut failures = 0usize;
    for (name, result) in results {
        match result {
            Ok(outcome) => print_outcome(&name, &outcome),
            Err(err) => {
                eprintln!("{} -> {}", name, err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("Finished with {} error(s).", failures);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_model(name: &str, model: &str) {
    println!("--- Model for '{}' ---", name);
    println!("{}", model);
}

/// Print one file's collected progress lines and model, in input order.
fn print_outcome(name: &str, outcome: &sqlscaffold::FileOutcome) {
    for line in &outcome.log {
        println!("{}", line);
    }
    print_model(name, &outcome.model);
    println!("{} -> Model saved to {}", name, outcome.output_path.display());
}
