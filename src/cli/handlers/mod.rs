// src/cli/handlers/mod.rs

pub mod commons;
pub mod help;
pub mod invoke;
pub mod list;
