pub mod field;
pub mod filler;
