//! CLI command implementations

pub mod character;
pub mod generate;
pub mod guide;
pub mod integrate;
pub mod job;
pub mod tools;
pub mod validate;
