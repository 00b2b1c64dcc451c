// src/commands/mod.rs
pub mod common;
pub mod generate;
pub mod inspect;
pub mod version;
