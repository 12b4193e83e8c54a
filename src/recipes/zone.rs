//! Zone intervals with their attribute values.
//!
//! One selector row per zone interval. The attribute values of each interval,
//! with their attribute definitions, are rolled up into lists. `ZoneAgg` folds
//! the intervals of a well into one document.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const INTERVAL_COLUMNS: &[&str] = &[
    "base_md",
    "base_tvd",
    "base_x",
    "base_y",
    "md",
    "mdss",
    "remark",
    "row_changed_date",
    "top_md",
    "top_tvd",
    "top_x",
    "top_y",
    "tvd",
    "tvdss",
    "uwi",
    "x",
    "y",
    "zone_name",
];

const ZONE_COLUMNS: &[&str] = &[
    "domain",
    "gx_base_form_name",
    "gx_base_form_tb",
    "gx_base_modifier",
    "gx_base_offset",
    "gx_remark",
    "gx_top_form_name",
    "gx_top_form_tb",
    "gx_top_modifier",
    "gx_top_offset",
    "gx_topmidbase",
    "row_changed_date",
    "zone_name",
];

/// `(expr, alias, element, ordered)` for the attribute-value rollup.
const VALUE_LISTS: &[(&str, &str, K, bool)] = &[
    ("v.gx_remark", "v_gx_remark", K::String, true),
    ("v.row_changed_date", "v_row_changed_date", K::DateTime, true),
    ("v.uwi", "v_uwi", K::String, true),
    ("v.zattribute_name", "v_zattribute_name", K::String, true),
    ("v.zattribute_value_date", "v_zattribute_value_date", K::DateTime, true),
    ("v.zattribute_value_numeric", "v_zattribute_value_numeric", K::Float, true),
    ("v.zattribute_value_string", "v_zattribute_value_string", K::String, true),
    ("v.zone_name", "v_zone_name", K::String, true),
    ("a.gx_remark", "a_gx_remark", K::String, false),
    ("a.row_changed_date", "a_row_changed_date", K::DateTime, false),
    ("a.zattribute_name", "a_zattribute_name", K::String, true),
    ("a.zone_name", "a_zone_name", K::String, true),
    ("g.domain", "g_domain", K::String, false),
    ("g.gx_remark", "g_gx_remark", K::String, false),
    ("g.row_changed_date", "g_row_changed_date", K::DateTime, false),
    ("g.zattribute_decimals", "g_zattribute_decimals", K::Int, false),
    ("g.zattribute_name", "g_zattribute_name", K::String, false),
    ("g.zattribute_type", "g_zattribute_type", K::Int, false),
    ("g.zattribute_value_unit", "g_zattribute_value_unit", K::String, false),
];

pub(super) fn recipe() -> Recipe {
    let i = Projection::new().plains("i_", INTERVAL_COLUMNS);
    let v = VALUE_LISTS.iter().fold(
        Projection::new()
            .plain("v.uwi", "j_uwi")
            .plain("v.zone_name", "j_zone_name")
            .plain("MAX(v.row_changed_date)", "max_row_changed_date"),
        |p, (expr, alias, kind, ordered)| {
            p.list(expr, alias, *kind, ordered.then_some("v.zattribute_name"))
        },
    );
    let z = Projection::new().plains("z_", ZONE_COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("i", &i, "FROM well_zone_interval"),
            cte(
                "v",
                &v,
                "FROM well_zone_intrvl_value v
        JOIN gx_zone_zattribute a ON v.zone_name = a.zone_name AND v.zattribute_name = a.zattribute_name
        JOIN gx_zattribute g ON a.zattribute_name = g.zattribute_name
        GROUP BY j_uwi, j_zone_name",
            ),
            cte("z", &z, "FROM gx_zone"),
        ],
        "w.*, i.*, v.*, z.*",
        "JOIN i ON i.i_uwi = w.w_uwi
    FULL OUTER JOIN v ON v.j_uwi = i.i_uwi AND i.i_zone_name = v.j_zone_name
    JOIN z ON i.i_zone_name = z.z_zone_name",
    );

    Recipe {
        asset: AssetType::Zone,
        identifier: QueryTemplate::new(identifier_sql("i.uwi", "well_zone_interval i")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("i_", "well_zone_interval"),
            ("v_", "well_zone_intrvl_value"),
            ("z_", "gx_zone"),
            ("a_", "gx_zone_zattribute"),
            ("g_", "gx_zattribute"),
        ],
        transforms: transform_map(v.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::ZoneAgg),
    }
}
