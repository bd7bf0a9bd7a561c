pub mod content;
pub mod grammar;
pub mod ids;
pub mod term;

// Re-export core types for convenience
pub use content::*;
pub use grammar::*;
pub use ids::{LineNumber, SequenceId};
pub use term::{Definition, TermRecord};
