//! End-to-end tests for the orchestrator, run against the scripted connector.

use std::cell::Cell;

use serde_json::{json, Value};

use crate::chunk_pipeline::orchestrator::{run_collection, CollectRequest, RunOutcome, RunStats};
use crate::config::CollectConfig;
use crate::error::CollectError;
use crate::recipes::AssetType;
use crate::source::scripted::ScriptedConnector;
use crate::source::{ConnectionDescriptor, SourceError};
use crate::types::{ColumnMeta, Document, RawValue, ResultSet};

// Test Helpers

const IDENTIFIER: &str = "SELECT DISTINCT";
const SELECTOR: &str = "WITH w AS";

fn request(asset: AssetType, patterns: &[&str]) -> CollectRequest {
    CollectRequest {
        repo_id: "stratton".to_string(),
        asset,
        descriptor: ConnectionDescriptor::for_repo("/ggx/home/Stratton", Some("scarab")),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
}

fn text(s: &str) -> RawValue {
    RawValue::Text(s.to_string())
}

fn ids(values: &[&str]) -> ResultSet {
    ResultSet::new(
        vec![ColumnMeta::new("w_uwi", "varchar")],
        values.iter().map(|v| vec![text(v)]).collect(),
    )
}

/// Completion selector rows: one row per well with its `LIST(...)` rollups.
fn completion_rows(rows: &[(&str, &str, &str, &str)]) -> ResultSet {
    ResultSet::new(
        vec![
            ColumnMeta::new("w_uwi", "varchar"),
            ColumnMeta::new("w_well_name", "varchar"),
            ColumnMeta::new("id_c_uwi", "varchar"),
            ColumnMeta::new("c_top_depth", "long varchar"),
            ColumnMeta::new("c_completion_type", "long varchar"),
        ],
        rows.iter()
            .map(|(uwi, name, top, kind)| vec![text(uwi), text(name), text(uwi), text(top), text(kind)])
            .collect(),
    )
}

/// Runs `req` collecting documents in memory, recording whether a sink was opened.
fn collect(
    connector: &ScriptedConnector,
    req: &CollectRequest,
    config: &CollectConfig,
) -> (Result<RunOutcome<Vec<Document>>, CollectError>, bool) {
    let opened = Cell::new(false);
    let outcome = run_collection(connector, req, config, || {
        opened.set(true);
        Ok(Vec::new())
    });
    (outcome, opened.get())
}

fn completed(outcome: RunOutcome<Vec<Document>>) -> (Vec<Document>, RunStats) {
    match outcome {
        RunOutcome::Completed { sink, stats } => (sink, stats),
        RunOutcome::NoResults => panic!("expected documents, got no results"),
    }
}

// Tests

#[test]
fn test_no_identifiers_is_no_results_and_opens_nothing() {
    // Arrange
    let connector = ScriptedConnector::new().on(IDENTIFIER, ids(&[]));

    // Act
    let (outcome, opened) = collect(&connector, &request(AssetType::Completion, &[]), &CollectConfig::default());

    // Assert
    assert!(matches!(outcome.unwrap(), RunOutcome::NoResults));
    assert!(!opened);
    assert_eq!(connector.calls().len(), 1);
}

#[test]
fn test_single_well_single_rollup_row() {
    // Arrange
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-123-00001"]))
        .on_filtered(
            SELECTOR,
            "w_uwi",
            completion_rows(&[("05-123-00001", "Alpha 1", "1520.5", "PERF")]),
        );

    // Act
    let (outcome, opened) = collect(&connector, &request(AssetType::Completion, &[]), &CollectConfig::default());
    let (docs, stats) = completed(outcome.unwrap());

    // Assert
    assert!(opened);
    assert_eq!(stats, RunStats { docs_written: 1, chunks: 1 });
    assert_eq!(
        Value::Object(docs[0].clone()),
        json!({
            "well": {"uwi": "05-123-00001", "well_name": "Alpha 1"},
            "well_completion": {"top_depth": [1520.5], "completion_type": ["PERF"]},
        })
    );
}

#[test]
fn test_patterns_and_chunk_members_are_bound_parameters() {
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-1", "05-2"]))
        .on_filtered(SELECTOR, "w_uwi", completion_rows(&[("05-1", "A", "1", "X")]));

    let (outcome, _) = collect(
        &connector,
        &request(AssetType::Completion, &["05-%", "'; DROP TABLE well; --"]),
        &CollectConfig::default(),
    );
    outcome.unwrap();

    let calls = connector.calls();
    assert_eq!(calls[0].params, vec!["05-%", "'; DROP TABLE well; --"]);
    assert!(calls[0].sql.contains("(w_uwi LIKE ? OR w_uwi LIKE ?)"));
    assert!(!calls[0].sql.contains("DROP TABLE"));
    assert_eq!(calls[1].params, vec!["05-1", "05-2"]);
    assert!(calls[1].sql.contains("w_uwi IN (?,?)"));
}

#[test]
fn test_chunks_run_in_order_and_respect_the_override() {
    // Arrange: three key groups, chunk size 2 puts each group in its own chunk.
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["1-62", "1-82", "2-83", "3-84"]))
        .on_filtered(
            SELECTOR,
            "w_uwi",
            completion_rows(&[
                ("1-62", "A", "1", "X"),
                ("1-82", "B", "2", "Y"),
                ("2-83", "C", "3", "Z"),
                ("3-84", "D", "4", "W"),
            ]),
        );
    let config = CollectConfig {
        chunk_size_override: Some(2),
        ..CollectConfig::default()
    };

    // Act
    let (outcome, _) = collect(&connector, &request(AssetType::Completion, &[]), &config);
    let (docs, stats) = completed(outcome.unwrap());

    // Assert
    assert_eq!(stats, RunStats { docs_written: 4, chunks: 3 });
    let selector_params: Vec<Vec<String>> = connector.calls()[1..].iter().map(|c| c.params.clone()).collect();
    assert_eq!(
        selector_params,
        vec![vec!["1-62".to_string(), "1-82".to_string()], vec!["2-83".to_string()], vec!["3-84".to_string()]]
    );
    let names: Vec<Option<&str>> = docs.iter().map(|d| d["well"]["well_name"].as_str()).collect();
    assert_eq!(names, vec![Some("A"), Some("B"), Some("C"), Some("D")]);
}

#[test]
fn test_identical_runs_produce_identical_documents() {
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-1", "05-2"]))
        .on_filtered(
            SELECTOR,
            "w_uwi",
            completion_rows(&[("05-1", "A", "1_purrDELIM_2", "X_purrDELIM__purrNULL_"), ("05-2", "B", "", "Y")]),
        );
    let req = request(AssetType::Completion, &[]);
    let config = CollectConfig::default();

    let (first, _) = collect(&connector, &req, &config);
    let (second, _) = collect(&connector, &req, &config);

    let render = |docs: Vec<Document>| serde_json::to_string(&docs).unwrap();
    assert_eq!(render(completed(first.unwrap()).0), render(completed(second.unwrap()).0));
}

#[test]
fn test_handle_not_unique_is_retried_without_touching_the_request() {
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-1"]))
        .on_filtered(SELECTOR, "w_uwi", completion_rows(&[("05-1", "A", "1", "X")]))
        .failing_with(vec![SourceError::HandleNotUnique("Database name not unique".into())]);
    let req = request(AssetType::Completion, &[]);

    let (outcome, _) = collect(&connector, &req, &CollectConfig::default());

    assert_eq!(completed(outcome.unwrap()).1.docs_written, 1);
    let calls = connector.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].had_database_file);
    assert!(!calls[1].had_database_file);
    assert!(!calls[2].had_database_file, "the dropped file stays dropped for later chunks");
    assert!(req.descriptor.dbf.is_some());
}

#[test]
fn test_query_failure_names_the_failing_chunk() {
    // Arrange: no selector response is scripted, so the chunk query fails.
    let connector = ScriptedConnector::new().on(IDENTIFIER, ids(&["05-1"]));

    // Act
    let (outcome, opened) = collect(&connector, &request(AssetType::Completion, &[]), &CollectConfig::default());

    // Assert
    assert!(opened);
    match outcome.unwrap_err() {
        CollectError::PipelineError { stage, source } => {
            assert_eq!(stage, "chunk 1/1");
            assert!(matches!(*source, CollectError::Query(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_identifier_failure_is_fatal_before_any_sink() {
    let connector = ScriptedConnector::new()
        .failing_with(vec![SourceError::Connection("Login failed".into())]);

    let (outcome, opened) = collect(&connector, &request(AssetType::Zone, &[]), &CollectConfig::default());

    assert!(!opened);
    assert!(matches!(
        outcome.unwrap_err(),
        CollectError::PipelineError { ref stage, .. } if stage == "identifiers"
    ));
}

#[test]
fn test_dst_runs_fold_into_one_document_per_well() {
    // Arrange: two test runs for one well, the second without pipe recovery.
    let columns = vec![
        ColumnMeta::new("w_uwi", "varchar"),
        ColumnMeta::new("id_t_run_number", "varchar"),
        ColumnMeta::new("t_test_number", "long varchar"),
        ColumnMeta::new("p_recovery_amt", "long varchar"),
        ColumnMeta::new("p_recovery_amt_uom", "long varchar"),
    ];
    let rows = vec![
        vec![text("05-1"), text("1"), text("1"), text("12.5_purrDELIM_3"), text("BBL_purrDELIM_MCF")],
        vec![text("05-1"), text("2"), text("2"), RawValue::Missing, RawValue::Missing],
    ];
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-1"]))
        .on_filtered(SELECTOR, "w_uwi", ResultSet::new(columns, rows));

    // Act
    let (outcome, _) = collect(&connector, &request(AssetType::Dst, &[]), &CollectConfig::default());
    let (docs, stats) = completed(outcome.unwrap());

    // Assert
    assert_eq!(stats.docs_written, 1);
    assert_eq!(docs[0]["well_test"], json!({"test_number": [["1"], ["2"]]}));
    assert_eq!(
        docs[0]["well_test_recovery"],
        json!({"recovery_amt": [[12.5, 3.0], []], "recovery_amt_uom": [["BBL", "MCF"], []]})
    );
}

#[test]
fn test_recipe_without_post_process_writes_one_document_per_row() {
    let connector = ScriptedConnector::new()
        .on(IDENTIFIER, ids(&["05-1", "05-2"]))
        .on_filtered(
            SELECTOR,
            "w_uwi",
            ResultSet::new(
                vec![ColumnMeta::new("w_uwi", "varchar"), ColumnMeta::new("w_gx_wsn", "integer")],
                vec![vec![text("05-1"), RawValue::Int(1)], vec![text("05-2"), RawValue::Int(2)]],
            ),
        );

    let (outcome, _) = collect(&connector, &request(AssetType::Well, &[]), &CollectConfig::default());
    let (docs, _) = completed(outcome.unwrap());

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["well"], json!({"uwi": "05-2", "gx_wsn": 2}));
}
