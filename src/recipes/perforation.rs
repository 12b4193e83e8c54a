//! Perforations, one `LIST(...)` rollup per well.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::query::QueryTemplate;

pub(super) fn recipe() -> Recipe {
    let p = Projection::new()
        .plain("uwi", "id_p_uwi")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists(
            "p_",
            "perforation_obs_no",
            &[
                ("base_depth", K::Float),
                ("base_form", K::String),
                ("cluster", K::String),
                ("completion_obs_no", K::Int),
                ("completion_source", K::String),
                ("current_status", K::String),
                ("gx_base_form_alias", K::String),
                ("gx_top_form_alias", K::String),
                ("perforation_angle", K::Float),
                ("perforation_count", K::Int),
                ("perforation_date", K::DateTime),
                ("perforation_density", K::Float),
                ("perforation_diameter", K::Float),
                ("perforation_diameter_ouom", K::String),
                ("perforation_obs_no", K::Int),
                ("perforation_per_uom", K::String),
                ("perforation_phase", K::String),
                ("perforation_type", K::String),
                ("remark", K::String),
                ("row_changed_date", K::DateTime),
                ("source", K::String),
                ("stage", K::String),
                ("top_depth", K::Float),
                ("top_form", K::String),
                ("uwi", K::String),
            ],
        );

    let selector = selector_sql(
        &[
            well_cte(),
            cte("p", &p, "FROM well_perforation\n        GROUP BY uwi"),
        ],
        "w.*, p.*",
        "JOIN p ON w.w_uwi = p.id_p_uwi",
    );

    Recipe {
        asset: AssetType::Perforation,
        identifier: QueryTemplate::new(identifier_sql("p.uwi", "well_perforation p")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![("w_", "well"), ("p_", "well_perforation")],
        transforms: transform_map(p.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: None,
    }
}
