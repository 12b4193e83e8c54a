//! Drives one extraction request through every pipeline stage.

mod core;

pub use self::core::{
    fetch_identifiers, plan_extraction, process_chunk, run_collection, run_plan, CollectRequest,
    ExtractionPlan, RunOutcome, RunStats,
};
