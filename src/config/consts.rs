// src/config/consts.rs

// Site
pub const DEFAULT_HOST: &str = "assets.e2enetworks.net";
pub const USERNAME_VAR: &str = "E2E_USERNAME";
pub const PASSWORD_VAR: &str = "E2E_PASSWORD";

// Input / output
pub const SEARCH_FILE: &str = "search_terms.txt";
pub const DEBUG_DIR: &str = "debug";
pub const LOG_FILE: &str = "automation.log";

// Run loop
pub const TAB_LIMIT: usize = 5;
pub const CHECKPOINT_EVERY: usize = 5;
pub const MAX_ATTEMPTS: u32 = 3;

// Waits
pub const WAIT_SECS: u64 = 10;
pub const SETTLE_MS: u64 = 1_000;
pub const POLL_MS: u64 = 100;
