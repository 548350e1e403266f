//! Command implementations for RepeatX CLI

pub mod find;
pub mod generate;
