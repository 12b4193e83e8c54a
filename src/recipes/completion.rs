//! Completions, one `LIST(...)` rollup per well.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::query::QueryTemplate;

pub(super) fn recipe() -> Recipe {
    let c = Projection::new().plain("uwi", "id_c_uwi").lists(
        "c_",
        "completion_obs_no",
        &[
            ("base_depth", K::Float),
            ("base_form", K::String),
            ("completion_date", K::DateTime),
            ("completion_form", K::String),
            ("completion_obs_no", K::Int),
            ("completion_type", K::String),
            ("remark", K::String),
            ("row_changed_date", K::DateTime),
            ("source", K::String),
            ("top_depth", K::Float),
            ("top_form", K::String),
            ("uwi", K::String),
        ],
    );

    let selector = selector_sql(
        &[
            well_cte(),
            cte("c", &c, "FROM well_completion\n        GROUP BY uwi"),
        ],
        "w.*, c.*",
        "JOIN c ON w.w_uwi = c.id_c_uwi",
    );

    Recipe {
        asset: AssetType::Completion,
        identifier: QueryTemplate::new(identifier_sql("c.uwi", "well_completion c")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![("w_", "well"), ("c_", "well_completion")],
        transforms: transform_map(c.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: None,
    }
}
