//! keymux CLI - deploy-key setup step for CI jobs.

pub mod actions;
pub mod commands;
