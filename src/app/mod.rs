pub mod builtin;
pub mod cli;
pub mod config;
