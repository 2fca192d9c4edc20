//! # onupdate-core
//!
//! Core crate for the on-update hook extension. Contains the configuration
//! schemas (logging and declarative hook declarations) and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
