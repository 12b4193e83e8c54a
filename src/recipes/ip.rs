//! Initial potential tests: one plain row per IP test.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const TEST_COLUMNS: &[&str] = &[
    "base_depth",
    "base_form",
    "casing_press",
    "choke_size_desc",
    "flow_press",
    "flow_temp",
    "gas_flow_amt",
    "gas_flow_amt_uom",
    "gor",
    "gx_base_form_alias",
    "gx_top_form_alias",
    "oil_flow_amt",
    "oil_flow_amt_uom",
    "oil_gravity",
    "production_method",
    "remark",
    "row_changed_date",
    "run_number",
    "source",
    "test_date",
    "test_duration",
    "test_number",
    "test_type",
    "top_depth",
    "top_form",
    "uwi",
    "water_flow_amt",
    "water_flow_amt_uom",
];

pub(super) fn recipe() -> Recipe {
    let t = Projection::new().plains("t_", TEST_COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("t", &t, "FROM well_test\n        WHERE test_type = 'IP'"),
        ],
        "w.*, t.*",
        "JOIN t ON w.w_uwi = t.t_uwi",
    );

    Recipe {
        asset: AssetType::Ip,
        identifier: QueryTemplate::new(identifier_sql(
            "w.uwi",
            "well w\n    JOIN well_test t\n        ON w.uwi = t.uwi AND t.test_type = 'IP'",
        )),
        selector: QueryTemplate::new(selector),
        prefixes: vec![("w_", "well"), ("t_", "well_test")],
        transforms: Default::default(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::IpAgg),
    }
}
