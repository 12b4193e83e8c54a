// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public face of the collector. It owns everything that touches
// the outside world around the pure `chunk_pipeline` engine: the output file, its
// name in the depot, and the background task that runs a request.
//
// Data Flow:
//
//   1. [Task Registry (spawn_collection)]   -> Registers a PENDING task, spawns a worker
//         |
//         `-> on the worker thread ->
//
//   2. [Stateless API (collect_assets)]     -> Names the output file in the depot
//         |
//         `-> a. Calls `chunk_pipeline::orchestrator::run_collection`, handing it a
//         |      closure that opens a `JsonArrayWriter` only once wells have matched
//         |
//         `-> b. Closes the writer and returns a `Summary`, or `NoResults`
//         |
//         `-> c. On failure, removes the partial file
//
//   3. [Task Registry]                      -> Records COMPLETED or FAILED for polling
//
// ====================================================================================
pub(crate) mod format;
pub mod stateless_api;
pub mod tasks;
pub mod writer;

// --- Low-Level Stateless API ---
pub use stateless_api::collect_assets;

// --- Background Task API ---
pub use tasks::{spawn_collection, Task, TaskRegistry, TaskStatus};

// --- Output Format ---
pub use format::{output_file_name, CollectOutcome, Summary};
pub use writer::JsonArrayWriter;
