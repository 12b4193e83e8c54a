// In: src/bridge/stateless_api.rs

use std::fs;
use std::path::Path;

use crate::bridge::format::{output_file_name, CollectOutcome, Summary};
use crate::bridge::writer::JsonArrayWriter;
use crate::chunk_pipeline::orchestrator::{self, CollectRequest, RunOutcome};
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::source::SourceConnector;

/// Removes a failed request's output. Best effort: the request has already
/// failed, so a cleanup error is only logged.
fn discard_partial_output(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => log::warn!("Removed partial output {}", path.display()),
        Err(e) => log::warn!("Could not remove partial output {}: {}", path.display(), e),
    }
}

/// Runs one collection request synchronously and writes its documents to
/// `<file_depot>/<repo_id>_<unix_ts>_<asset>.json`.
///
/// The file is only created once at least one well matched; `NoResults` leaves
/// the depot untouched. An existing file of the same name fails the request
/// rather than being overwritten.
pub fn collect_assets(
    connector: &dyn SourceConnector,
    request: &CollectRequest,
    config: &CollectConfig,
) -> Result<CollectOutcome, CollectError> {
    config.validate()?;
    let name = output_file_name(&request.repo_id, request.asset, chrono::Utc::now().timestamp());
    let out_file = config.file_depot.join(name);

    // Only a file this request created may be discarded; the name is shared by
    // every same-second request for the same repo and asset.
    let mut created = false;
    let result = orchestrator::run_collection(connector, request, config, || {
        let writer = JsonArrayWriter::create(&out_file)?;
        created = true;
        Ok(writer)
    })
    .and_then(|outcome| match outcome {
        RunOutcome::NoResults => Ok(CollectOutcome::NoResults),
        RunOutcome::Completed { sink, stats } => {
            sink.close().map_err(|e| e.at_stage("close"))?;
            Ok(CollectOutcome::Completed(Summary {
                asset: request.asset,
                docs_written: stats.docs_written,
                chunks: stats.chunks,
                out_file: out_file.clone(),
            }))
        }
    });

    match &result {
        Ok(CollectOutcome::Completed(summary)) => log::info!(
            "Wrote {} {} document(s) to {}",
            summary.docs_written,
            summary.asset,
            summary.out_file.display()
        ),
        Ok(CollectOutcome::NoResults) => {
            log::info!("No {} results for '{}'", request.asset, request.repo_id)
        }
        Err(e) => {
            log::error!("Collecting {} for '{}' failed: {}", request.asset, request.repo_id, e);
            if created && config.remove_partial_output {
                discard_partial_output(&out_file);
            }
        }
    }
    result
}
