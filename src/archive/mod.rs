pub mod utils;
pub mod zip;
