// Public modules
pub mod archive;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod extractor;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use error::ExtractError;
pub use extractor::Extractor;
pub use models::*;
