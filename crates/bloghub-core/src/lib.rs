//! # BlogHub Core
//!
//! The domain layer of the BlogHub platform.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::DomainError;
