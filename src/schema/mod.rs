//! Schema facts and cross-statement merging

mod facts;
mod merger;

pub use facts::{ColumnFact, DefaultConstraintFact, TableFact, TableId};
pub use merger::{merge_statements, Merger};
