// src/lib.rs

#[macro_use]
pub mod logger;

pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod specs;

pub mod file;
pub mod page;
pub mod progress;
pub mod runner;
pub mod terms;
