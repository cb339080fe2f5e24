// loanlink-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: the database seam (Connector).
pub mod ports;

// 2. Domain: portfolio maths, verification plans, identifiers.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure: PostgreSQL adapter, config files, script loading.
pub mod infrastructure;

// 4. Application: the runner pipeline and its lifecycle guard.
pub mod application;

pub mod error;

pub use error::{LoanlinkError, USAGE_EXIT_CODE, VerificationError};
