// In: src/chunk_pipeline/orchestrator/core.rs

use std::time::Instant;

use crate::chunk_pipeline::assembler::assemble;
use crate::chunk_pipeline::executor::execute_with_retry;
use crate::chunk_pipeline::normalizer::normalize;
use crate::chunk_pipeline::planner::plan_chunks;
use crate::chunk_pipeline::post_process::aggregate;
use crate::chunk_pipeline::query::{build_identifier_filter, build_selectors, BoundQuery, PRIMARY_KEY_COLUMN};
use crate::chunk_pipeline::traits::DocumentSink;
use crate::chunk_pipeline::transformer::transform_row;
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::recipes::{self, AssetType, Recipe};
use crate::source::{ConnectionDescriptor, SourceConnector};
use crate::types::{CanonicalValue, Document, TransformedRow};

//==================================================================================
// 1. Request and Outcome Types
//==================================================================================

/// One extraction request: which asset type, from which project, for which wells.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    /// Names the project in the output file name.
    pub repo_id: String,
    pub asset: AssetType,
    pub descriptor: ConnectionDescriptor,
    /// `LIKE` patterns over `w_uwi`. Empty means every well.
    pub patterns: Vec<String>,
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub docs_written: usize,
    pub chunks: usize,
}

/// The result of a run that did not fail.
#[derive(Debug)]
pub enum RunOutcome<S> {
    /// The identifier query matched nothing. No sink was opened.
    NoResults,
    Completed { sink: S, stats: RunStats },
}

/// Everything needed to run the chunk loop, decided before any sink is opened.
#[derive(Debug)]
pub struct ExtractionPlan<'r> {
    pub recipe: &'r Recipe,
    pub identifiers: usize,
    pub selectors: Vec<BoundQuery>,
}

//==================================================================================
// 2. Pipeline Stages
//==================================================================================

fn identifier_text(value: CanonicalValue) -> Option<String> {
    match value {
        CanonicalValue::String(s) => Some(s),
        CanonicalValue::Integer(i) => Some(i.to_string()),
        CanonicalValue::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

/// Runs the recipe's identifier query and returns the matching `w_uwi` values
/// in the order the source returned them.
pub fn fetch_identifiers(
    connector: &dyn SourceConnector,
    descriptor: &mut ConnectionDescriptor,
    recipe: &Recipe,
    patterns: &[String],
    max_attempts: usize,
) -> Result<Vec<String>, CollectError> {
    let query = recipe.identifier.compose(&build_identifier_filter(patterns))?;
    let result = execute_with_retry(connector, descriptor, &query, max_attempts)?;

    let ids = normalize(result)
        .into_iter()
        .filter_map(|row| {
            row.columns
                .into_iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(PRIMARY_KEY_COLUMN))
                .and_then(|(_, value)| identifier_text(value))
        })
        .collect();
    Ok(ids)
}

/// Resolves identifiers and builds one selector per chunk.
///
/// Returns `None` when no well matches, so the caller can report "no results"
/// without creating any output.
pub fn plan_extraction<'r>(
    connector: &dyn SourceConnector,
    descriptor: &mut ConnectionDescriptor,
    recipe: &'r Recipe,
    patterns: &[String],
    config: &CollectConfig,
) -> Result<Option<ExtractionPlan<'r>>, CollectError> {
    let ids = fetch_identifiers(connector, descriptor, recipe, patterns, config.max_connect_attempts)
        .map_err(|e| e.at_stage("identifiers"))?;
    if ids.is_empty() {
        log::info!("No {} identifiers matched", recipe.asset);
        return Ok(None);
    }

    let chunk_size = config.effective_chunk_size(recipe.chunk_size);
    let chunks = plan_chunks(&ids, chunk_size);
    log::info!(
        "Found {} {} identifier(s), planned {} chunk(s) of up to {}",
        ids.len(),
        recipe.asset,
        chunks.len(),
        chunk_size
    );

    let selectors = build_selectors(&chunks, &recipe.selector).map_err(|e| e.at_stage("plan"))?;
    Ok(Some(ExtractionPlan {
        recipe,
        identifiers: ids.len(),
        selectors,
    }))
}

/// Executes one chunk's selector and turns its rows into finished documents.
pub fn process_chunk(
    connector: &dyn SourceConnector,
    descriptor: &mut ConnectionDescriptor,
    recipe: &Recipe,
    query: &BoundQuery,
    max_attempts: usize,
) -> Result<Vec<Document>, CollectError> {
    let result = execute_with_retry(connector, descriptor, query, max_attempts)?;
    let rows: Vec<TransformedRow> = normalize(result)
        .into_iter()
        .map(|row| transform_row(row, recipe))
        .collect();
    let rows = match recipe.post_process {
        Some(key) => aggregate(rows, key),
        None => rows,
    };
    Ok(rows.into_iter().map(|row| assemble(row, recipe)).collect())
}

/// Runs every chunk in order, handing each document to `sink`.
pub fn run_plan<S: DocumentSink>(
    connector: &dyn SourceConnector,
    descriptor: &mut ConnectionDescriptor,
    plan: &ExtractionPlan<'_>,
    config: &CollectConfig,
    sink: &mut S,
) -> Result<RunStats, CollectError> {
    let mut stats = RunStats::default();
    let total = plan.selectors.len();

    for (idx, query) in plan.selectors.iter().enumerate() {
        let started = Instant::now();
        let docs = process_chunk(connector, descriptor, plan.recipe, query, config.max_connect_attempts)
            .map_err(|e| e.at_stage(&format!("chunk {}/{}", idx + 1, total)))?;
        for doc in &docs {
            sink.write_document(doc).map_err(|e| e.at_stage("write"))?;
        }

        stats.chunks += 1;
        stats.docs_written += docs.len();
        log::info!("Chunk {}/{}: {} document(s)", idx + 1, total, docs.len());
        log_metric!(
            "event" = "chunk_written",
            "asset" = plan.recipe.asset,
            "chunk" = idx + 1,
            "params" = query.params.len(),
            "documents" = docs.len(),
            "elapsed_ms" = started.elapsed().as_millis()
        );
    }
    Ok(stats)
}

//==================================================================================
// 3. Public Orchestration API
//==================================================================================

/// Runs one extraction request end to end.
///
/// `open_sink` is only called once at least one identifier has matched, so a
/// request with no results never creates output. The connection descriptor is
/// copied per request; a database file dropped during a retry stays dropped
/// for the rest of this request only.
pub fn run_collection<S, F>(
    connector: &dyn SourceConnector,
    request: &CollectRequest,
    config: &CollectConfig,
    open_sink: F,
) -> Result<RunOutcome<S>, CollectError>
where
    S: DocumentSink,
    F: FnOnce() -> Result<S, CollectError>,
{
    let recipe = recipes::registry()?.recipe(request.asset)?;
    let mut descriptor = request.descriptor.clone();
    log::info!(
        "Collecting {} for '{}' ({} pattern(s))",
        request.asset,
        request.repo_id,
        request.patterns.len()
    );

    let Some(plan) = plan_extraction(connector, &mut descriptor, recipe, &request.patterns, config)? else {
        return Ok(RunOutcome::NoResults);
    };

    let mut sink = open_sink().map_err(|e| e.at_stage("open"))?;
    let stats = run_plan(connector, &mut descriptor, &plan, config, &mut sink)?;
    log::info!(
        "Collected {} {} document(s) from {} identifier(s) in {} chunk(s)",
        stats.docs_written,
        request.asset,
        plan.identifiers,
        stats.chunks
    );
    Ok(RunOutcome::Completed { sink, stats })
}
