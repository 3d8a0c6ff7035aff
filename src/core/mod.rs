//! Core library components.
//!
//! This module contains the reusable logic for resolving secrets from a
//! vault into environment variables, independent of the command line.

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod credential;
pub mod health;
pub mod http;
pub mod retry;
pub mod types;
pub mod validation;
pub mod vault;
