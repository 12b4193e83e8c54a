//! The extraction engine.
//!
//! Stages, in the order a request passes through them:
//!
//!   planner -> query -> executor -> normalizer -> transformer -> post_process -> assembler
//!
//! `orchestrator` wires them together. Nothing in here touches the filesystem;
//! finished documents leave through a `traits::DocumentSink`.

pub mod assembler;
pub mod executor;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod planner;
pub mod post_process;
pub mod query;
pub mod traits;
pub mod transformer;

#[cfg(test)]
mod orchestrator_tests;
