pub mod athlete;
pub mod common;
