mod document;
mod error;
mod lexer;
mod parser;

pub use document::*;
pub use error::*;
pub use lexer::*;
