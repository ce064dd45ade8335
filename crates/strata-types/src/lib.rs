//! Foundation types for Strata.
//!
//! This crate provides the types shared by every other Strata crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (20-byte SHA-1 digest)
//! - [`TypeError`] — Errors from type-level parsing and validation

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, DIGEST_LEN};
