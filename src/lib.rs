//! This file is the root of the `gx_assets` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`chunk_pipeline`,
//!     `recipes`, `kernels`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types an embedding service needs to run a
//!     collection request.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod chunk_pipeline;
pub mod config;
pub mod error;
pub mod kernels;
pub mod recipes;
pub mod source;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use bridge::{collect_assets, spawn_collection, CollectOutcome, Summary, TaskRegistry, TaskStatus};
pub use chunk_pipeline::orchestrator::CollectRequest;
pub use config::{CollectConfig, LoggingConfig};
pub use error::CollectError;
pub use observability::init_logging;
pub use recipes::AssetType;
pub use source::{ConnectionDescriptor, SourceConnector};
