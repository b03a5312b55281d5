pub mod block;
pub mod common;
pub mod config;
/// Recognizing known puzzle templates inside curried puzzles.
pub mod decompile;
pub mod log;
pub mod mint;
pub mod runner;
pub mod signing;
pub mod templates;
pub mod transfer;
pub mod utils;

#[cfg(test)]
mod tests;
