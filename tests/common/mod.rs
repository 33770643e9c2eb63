#[macro_use]
pub mod fixtures;
