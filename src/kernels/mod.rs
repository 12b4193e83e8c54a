//! Pure, stateless value kernels.
//!
//! Nothing in here knows about recipes, rows or connections. Each kernel takes
//! plain Rust values and returns plain Rust values, and none of them panic on
//! malformed input.

pub mod curve;
pub mod delimited;
pub mod hex;
pub mod scalar;
