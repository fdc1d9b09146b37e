//! Model text generation
//!
//! Target languages implement [`ModelGenerator`]; adding a language means
//! adding an implementation, not touching the pipeline.

mod csharp;

use clap::ValueEnum;

use crate::schema::TableFact;

pub use csharp::CSharpGenerator;

/// Capability interface for one target model language.
pub trait ModelGenerator {
    /// Render finalized table facts into model source text.
    fn generate(&self, tables: &[TableFact]) -> String;

    /// File extension for generated model files (with leading dot).
    fn file_extension(&self) -> &'static str;

    /// Fixed header written at the top of generated model files.
    fn file_header(&self) -> &'static str;
}

/// Target language selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetLanguage {
    /// C# classes with DataAnnotations attributes.
    #[value(name = "csharp")]
    CSharp,
    /// Named extension point; no generator is implemented yet.
    #[value(name = "python")]
    Python,
}

impl TargetLanguage {
    /// The generator for this language, or `None` while unimplemented.
    pub fn generator(&self) -> Option<Box<dyn ModelGenerator + Send + Sync>> {
        match self {
            TargetLanguage::CSharp => Some(Box::new(CSharpGenerator)),
            TargetLanguage::Python => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::CSharp => "csharp",
            TargetLanguage::Python => "python",
        }
    }
}
