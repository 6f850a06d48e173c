pub mod document;
pub mod padded;
pub mod parser;
pub mod token;

pub use document::{Document, Field, Sentence};
pub use padded::PaddedSequence;
pub use parser::{open_text_reader, DocumentParser};
pub use token::Token;
