//! Common utilities for mongo-api
//!
//! This crate provides the error type shared by the synchronous and
//! asynchronous facades.

pub mod error;

pub use error::{MongoApiError, Result};
