pub mod parse;
pub mod policies;
