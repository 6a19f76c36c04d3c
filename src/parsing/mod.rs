
//! General-purpose parsing support, independent of the formula
//! language itself.

pub mod operator;
pub mod source;
pub mod tokenizer;
