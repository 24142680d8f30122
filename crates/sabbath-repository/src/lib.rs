//! Document store layer for the Digital Sabbath content API
//!
//! This crate provides a unified interface for persisting and querying the
//! content collections (blog posts, tips, challenges, e-book tests) against
//! different storage backends.
//!
//! # Features
//!
//! - **In-Memory Store**: process-local storage for development and tests
//! - **MongoDB Store**: document database backend (feature `mongodb`)
//! - **Timeouts**: every store call is bounded, so an unreachable backend
//!   surfaces as [`StoreError::StorageUnavailable`] instead of hanging
//! - **Uniqueness**: per-collection unique fields enforced on insert
//!
//! # Quick Start
//!
//! ```no_run
//! use sabbath_core::Document;
//! use sabbath_repository::{DocumentStore, Filter, InMemoryStore, TimeoutStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = TimeoutStore::new(InMemoryStore::new(), Duration::from_secs(5));
//!     store.ensure_unique("blogpost", "slug").await?;
//!
//!     store
//!         .create("blogpost", Document::new().with_field("slug", "intro"))
//!         .await?;
//!
//!     let post = store
//!         .find_one("blogpost", &Filter::new().eq("slug", "intro"))
//!         .await?;
//!     assert!(post.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │        Content service / handlers      │
//! └──────────────┬─────────────────────────┘
//!                │ DocumentStore trait
//!                ↓
//! ┌────────────────────────────────────────┐
//! │             TimeoutStore               │
//! └──────────────┬─────────────────────────┘
//!       ┌────────┴────────┐
//!       ↓                 ↓
//! ┌──────────────┐  ┌──────────────────┐
//! │ InMemory     │  │  MongoDB         │
//! │ Store        │  │  Store           │
//! └──────────────┘  └──────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod timeout;
pub mod traits;

#[cfg(feature = "mongodb")]
pub mod mongo;

// Re-exports - Configuration
pub use config::{StoreBackend, StoreConfig};

// Re-exports - Error
pub use error::{StoreError, StoreResult};

// Re-exports - Stores
pub use filter::{Filter, Predicate};
pub use memory::InMemoryStore;
pub use timeout::TimeoutStore;
pub use traits::*;

#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
