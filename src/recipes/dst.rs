//! Drill-stem tests.
//!
//! One selector row per test run (uwi, source, test type, run number). The
//! pressure, recovery and flow details of each run are rolled up into lists
//! and outer-joined, so a run without pipe recovery carries a null
//! `p_recovery_amt`. `DstAgg` folds the runs of a well into one document and
//! keeps that gap as an empty list.

use super::projection::{collect_transforms, cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, WIDE_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const TEST_COLUMNS: &[(&str, K)] = &[
    ("base_depth", K::Float),
    ("base_form", K::String),
    ("bottom_choke_desc", K::String),
    ("casing_press", K::Float),
    ("choke_size_desc", K::String),
    ("flow_press", K::Float),
    ("flow_temp", K::Float),
    ("gas_flow_amt", K::Float),
    ("gas_flow_amt_uom", K::String),
    ("gor", K::Float),
    ("gx_base_form_alias", K::String),
    ("gx_bhp_z", K::Float),
    ("gx_co2_pct", K::Float),
    ("gx_conversion_factor", K::Float),
    ("gx_cushion_type", K::String),
    ("gx_cushion_vol", K::Float),
    ("gx_cushion_vol_ouom", K::String),
    ("gx_ft_flow_amt", K::Float),
    ("gx_ft_flow_amt_uom", K::String),
    ("gx_gas_cum", K::Float),
    ("gx_max_ft_flow_rate", K::Float),
    ("gx_max_ft_flow_rate_uom", K::String),
    ("gx_recorder_depth", K::Float),
    ("gx_top_form_alias", K::String),
    ("gx_tracer", K::String),
    ("gx_z_factor", K::Float),
    ("h2s_pct", K::Float),
    ("max_gas_flow_rate", K::String),
    ("max_hydrostatic_press", K::Float),
    ("max_oil_flow_rate", K::String),
    ("max_water_flow_rate", K::String),
    ("oil_flow_amt", K::Float),
    ("oil_flow_amt_uom", K::String),
    ("oil_gravity", K::Float),
    ("primary_fluid_recovered", K::String),
    ("production_method", K::String),
    ("remark", K::String),
    ("report_temp", K::Float),
    ("row_changed_date", K::DateTime),
    ("shut_off_type", K::String),
    ("test_date", K::DateTime),
    ("test_duration", K::String),
    ("test_number", K::String),
    ("test_subtype", K::String),
    ("top_choke_desc", K::String),
    ("top_depth", K::Float),
    ("top_form", K::String),
    ("water_flow_amt", K::Float),
    ("water_flow_amt_uom", K::String),
];

const PRESSURE_COLUMNS: &[(&str, K)] = &[
    ("end_press", K::Float),
    ("gx_duration", K::String),
    ("period_type", K::String),
    ("row_changed_date", K::DateTime),
    ("start_press", K::Float),
    ("test_number", K::Int),
];

const RECOVERY_COLUMNS: &[(&str, K)] = &[
    ("recovery_amt", K::Float),
    ("recovery_amt_uom", K::String),
    ("recovery_method", K::String),
    ("recovery_obs_no", K::Int),
    ("recovery_type", K::String),
    ("remark", K::String),
    ("row_changed_date", K::DateTime),
    ("test_number", K::String),
];

// `tts_elasped_time` is the column's real (misspelled) name.
const FLOW_COLUMNS: &[(&str, K)] = &[
    ("fluid_type", K::String),
    ("max_fluid_rate", K::Float),
    ("max_fluid_rate_uom", K::String),
    ("row_changed_date", K::DateTime),
    ("test_number", K::Int),
    ("tts_elasped_time", K::String),
];

const RUN_GROUPING: &str = "GROUP BY uwi, source, test_type, run_number";

/// The run key of one detail CTE, aliased `id_<tag>_*`.
fn run_key(tag: &str) -> Projection {
    ["uwi", "source", "test_type", "run_number"]
        .iter()
        .fold(Projection::new(), |p, col| {
            p.plain(col, &format!("id_{}_{}", tag, col))
        })
}

/// `LEFT OUTER JOIN <tag>` on the full run key of `t`.
fn run_join(tag: &str) -> String {
    let on = ["uwi", "source", "test_type", "run_number"]
        .iter()
        .map(|col| format!("{t}.id_{t}_{c} = t.id_t_{c}", t = tag, c = col))
        .collect::<Vec<_>>()
        .join("\n        AND ");
    format!("LEFT OUTER JOIN {}\n        ON {}", tag, on)
}

pub(super) fn recipe() -> Recipe {
    let t = run_key("t")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists("t_", "test_number", TEST_COLUMNS);
    let s = run_key("s").lists("s_", "test_number", PRESSURE_COLUMNS);
    let p = run_key("p").lists("p_", "test_number", RECOVERY_COLUMNS);
    let f = run_key("f").lists("f_", "test_number", FLOW_COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte(
                "t",
                &t,
                &format!("FROM well_test\n        WHERE test_type = 'DST'\n        {}", RUN_GROUPING),
            ),
            cte("s", &s, &format!("FROM well_test_pressure\n        {}", RUN_GROUPING)),
            cte(
                "p",
                &p,
                &format!(
                    "FROM well_test_recovery\n        WHERE recovery_method = 'PIPE'\n        {}",
                    RUN_GROUPING
                ),
            ),
            cte("f", &f, &format!("FROM well_test_flow\n        {}", RUN_GROUPING)),
        ],
        "w.*, t.*, s.*, p.*, f.*",
        &format!(
            "JOIN t ON w.w_uwi = t.id_t_uwi\n    {}\n    {}\n    {}",
            run_join("s"),
            run_join("p"),
            run_join("f")
        ),
    );

    Recipe {
        asset: AssetType::Dst,
        identifier: QueryTemplate::new(identifier_sql(
            "w.uwi",
            "well w\n    JOIN well_test t\n        ON w.uwi = t.uwi AND t.test_type = 'DST'",
        )),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("t_", "well_test"),
            ("s_", "well_test_pressure"),
            ("p_", "well_test_recovery"),
            ("f_", "well_test_flow"),
        ],
        transforms: transform_map(collect_transforms(&[&t, &s, &p, &f])),
        chunk_size: WIDE_CHUNK_SIZE,
        post_process: Some(PostProcessKey::DstAgg),
    }
}
