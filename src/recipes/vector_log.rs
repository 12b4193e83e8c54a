//! Digital (vector) log curves with their packed sample payloads.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::TransformKind;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const CURVE_COLUMNS: &[&str] = &[
    "wellid",
    "curveset",
    "curvename",
    "version",
    "cmd_type",
    "curve_uom",
    "curve_ouom",
    "date_modified",
    "description",
    "tool_type",
    "remark",
    "topdepth",
    "basedepth",
];

const CURVESET_COLUMNS: &[&str] = &[
    "wellid",
    "curveset",
    "topdepth",
    "basedepth",
    "depthincr",
    "log_job",
    "log_trip",
    "source_file",
    "remark",
    "type",
    "fielddata",
];

pub(super) fn recipe() -> Recipe {
    let c = Projection::new().plains("c_", CURVE_COLUMNS);
    let s = Projection::new()
        .plains("s_", CURVESET_COLUMNS)
        .plain("[import date]", "s_import_date");
    let v = Projection::new()
        .plains("v_", &["wellid", "curveset", "curvename", "version"])
        .transformed("curve_values", "v_curve_values", TransformKind::DecodeCurveValues);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("c", &c, "FROM gx_well_curve"),
            cte("s", &s, "FROM gx_well_curveset"),
            cte("v", &v, "FROM gx_well_curve_values"),
        ],
        "w.*, c.*, s.*, v.*",
        "JOIN c ON w.w_uwi = c.c_wellid
    JOIN v ON
        c.c_wellid = v.v_wellid
        AND c.c_curveset = v.v_curveset
        AND c.c_curvename = v.v_curvename
        AND c.c_version = v.v_version
    JOIN s ON
        c.c_wellid = s.s_wellid
        AND c.c_curveset = s.s_curveset",
    );

    Recipe {
        asset: AssetType::VectorLog,
        identifier: QueryTemplate::new(identifier_sql("g.wellid", "gx_well_curve g")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("c_", "gx_well_curve"),
            ("s_", "gx_well_curveset"),
            ("v_", "gx_well_curve_values"),
        ],
        transforms: transform_map(v.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::VectorLogAgg),
    }
}
