pub mod parse;
pub mod token;
