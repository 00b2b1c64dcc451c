// src/lib.rs

// Public modules (the proxygen driver API)
pub mod cli;
pub mod commands;
pub mod errors;
