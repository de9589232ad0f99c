// src/core/mod.rs

pub mod sanitize;
pub mod wait;

pub use wait::Wait;
