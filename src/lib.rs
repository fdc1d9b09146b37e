//! sqlscaffold: scaffold ORM-annotated model classes from SQL Server DDL
//!
//! This library turns `CREATE TABLE` / `ALTER TABLE` scripts into
//! data-annotation-decorated model classes, as a best-effort scaffolding
//! step rather than a strict compiler: malformed statements degrade to
//! sentinels and unknown types to a fallback, so one bad fragment never
//! aborts a run.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

pub use codegen::{ModelGenerator, TargetLanguage};
pub use error::ScaffoldError;

/// Options for one scaffolding run.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Target model language.
    pub language: TargetLanguage,
    /// Enable verbose output.
    pub verbose: bool,
}

/// Result of scaffolding a file input.
#[derive(Debug)]
pub struct FileOutcome {
    /// The rendered model text.
    pub model: String,
    /// Path of the sibling model file that was written.
    pub output_path: PathBuf,
    /// Verbose progress lines, collected here so parallel runs can print
    /// them in input order instead of interleaved across threads.
    pub log: Vec<String>,
}

/// Generate model text from a DDL document.
///
/// `input` labels the source (file path, "inline", "stdin") in error
/// messages. Validation failures and an unimplemented target language are
/// the only error paths; the pipeline itself is lenient.
pub fn generate_model(
    sql: &str,
    input: &str,
    options: &ScaffoldOptions,
) -> Result<String, ScaffoldError> {
    let mut log = Vec::new();
    let result = run_pipeline(sql, input, options, &mut log);
    for line in log {
        println!("{}", line);
    }
    result
}

fn run_pipeline(
    sql: &str,
    input: &str,
    options: &ScaffoldOptions,
    log: &mut Vec<String>,
) -> Result<String, ScaffoldError> {
    if sql.trim().is_empty() {
        return Err(ScaffoldError::EmptyInput {
            input: input.to_string(),
        });
    }

    validate::validate_sql(sql).map_err(|message| ScaffoldError::Validation {
        input: input.to_string(),
        message,
    })?;

    let generator =
        options
            .language
            .generator()
            .ok_or_else(|| ScaffoldError::UnsupportedLanguage {
                language: options.language.as_str().to_string(),
            })?;

    // Step 1: Split the document into statements
    let statements = parser::split_statements(sql);

    if options.verbose {
        log.push(format!("{}: {} statement(s)", input, statements.len()));
    }

    // Step 2: Merge facts across statements
    let tables = schema::merge_statements(&statements);

    if options.verbose {
        log.push(format!("{}: {} table(s)", input, tables.len()));
    }

    // Step 3: Render the model
    Ok(generator.generate(&tables))
}

/// Scaffold one SQL file and write the model next to it.
///
/// The sibling file shares the input's base name with the target language's
/// extension and starts with the generator's fixed file header.
pub fn generate_model_file(
    path: &Path,
    options: &ScaffoldOptions,
) -> Result<FileOutcome, ScaffoldError> {
    let sql = fs::read_to_string(path).map_err(|source| ScaffoldError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let label = path.display().to_string();
    let mut log = Vec::new();
    let model = run_pipeline(&sql, &label, options, &mut log)?;

    // The language was already resolved by the pipeline.
    let generator = options
        .language
        .generator()
        .ok_or_else(|| ScaffoldError::UnsupportedLanguage {
            language: options.language.as_str().to_string(),
        })?;

    let output_path = path.with_extension(generator.file_extension().trim_start_matches('.'));

    if options.verbose {
        log.push(format!("Writing model to: {}", output_path.display()));
    }

    let contents = format!("{}{}", generator.file_header(), model);
    fs::write(&output_path, contents).map_err(|source| ScaffoldError::FileWrite {
        path: output_path.clone(),
        source,
    })?;

    Ok(FileOutcome {
        model,
        output_path,
        log,
    })
}
