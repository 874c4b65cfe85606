//! Thin CRUD facades over the MongoDB driver
//!
//! This crate wraps a handle to one database and exposes collection-level
//! reads, writes, counts, aggregations and atomic find-and-update, each a
//! direct pass-through to the driver with its result unwrapped into a plain
//! value.
//!
//! # Features
//! - [`MongoApi`]: async facade over `mongodb::Client`
//! - [`sync::MongoApi`]: blocking facade over `mongodb::sync::Client` (feature `sync`, on by default)
//! - [`ConnectConfig`]: connection string, write-concern hint and forwarded driver options
//!
//! # Example
//! ```rust,ignore
//! use bson::doc;
//! use mongo_api::{MongoApi, ReturnDocument};
//!
//! let api = MongoApi::connect("cluster0.example.net", "app", "svc", "s3cret", "mongodb+srv").await?;
//! let id = api.insert_one("users", Some(doc! { "name": "ada" })).await?;
//! let user = api.find_one("users", Some(doc! { "_id": id }), None, None).await?;
//! api.close().await;
//! ```

pub mod client;
pub mod config;
pub mod object_id;
pub mod params;
#[cfg(feature = "sync")]
pub mod sync;

pub use client::MongoApi;
pub use config::{ConnectConfig, PoolConfig, Service};
pub use mongo_api_common::{MongoApiError, Result};
pub use mongodb::options::{ReturnDocument, UpdateModifications};

#[allow(deprecated)]
pub use object_id::{object_id_to_str, str_to_object_id};
