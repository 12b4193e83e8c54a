//! Cores and their sample analyses.
//!
//! The selector yields one row per core, with that core's sample analyses
//! rolled up into lists. `CoreAgg` folds the cores of a well into one document.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const CORE_COLUMNS: &[&str] = &[
    "base_depth",
    "base_depth_ouom",
    "core_id",
    "core_type",
    "gx_primary_core_form_alias",
    "gx_qualifying_field",
    "gx_remark",
    "gx_user1",
    "primary_core_form",
    "recovered_amt",
    "recovery_amt_ouom",
    "recovery_date",
    "reported_core_number",
    "row_changed_date",
    "source",
    "top_depth",
    "top_depth_ouom",
    "uwi",
];

const SAMPLE_COLUMNS: &[(&str, K)] = &[
    ("analysis_obs_no", K::Int),
    ("core_id", K::String),
    ("gas_sat_vol", K::Float),
    ("grain_density", K::Float),
    ("grain_density_ouom", K::String),
    ("gx_base_depth", K::Float),
    ("gx_bulk_density", K::Float),
    ("gx_formation", K::String),
    ("gx_formation_alias", K::String),
    ("gx_gamma_ray", K::Float),
    ("gx_lithology_desc", K::String),
    ("gx_poissons_ratio", K::Float),
    ("gx_remark", K::String),
    ("gx_resistivity", K::Float),
    ("gx_shift_depth", K::Float),
    ("gx_show_type", K::String),
    ("gx_toc", K::Float),
    ("gx_total_clay", K::Float),
    ("gx_vitrinite_reflectance", K::Float),
    ("gx_youngs_modulus", K::Float),
    ("k90", K::Float),
    ("k90_ouom", K::String),
    ("kmax", K::Float),
    ("kmax_ouom", K::String),
    ("kvert", K::Float),
    ("kvert_ouom", K::String),
    ("oil_sat", K::Float),
    ("pore_volume_oil_sat", K::Float),
    ("pore_volume_water_sat", K::Float),
    ("porosity", K::Float),
    ("row_changed_date", K::DateTime),
    ("sample_id", K::String),
    ("sample_number", K::Int),
    ("source", K::String),
    ("top_depth", K::Float),
    ("top_depth_ouom", K::String),
    ("uwi", K::String),
    ("water_sat", K::Float),
];

pub(super) fn recipe() -> Recipe {
    let c = Projection::new().plains("c_", CORE_COLUMNS);
    let s = Projection::new()
        .plain("core_id", "id_core_id")
        .plain("source", "id_source")
        .plain("uwi", "id_uwi")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists("s_", "core_id", SAMPLE_COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("c", &c, "FROM well_core"),
            cte(
                "s",
                &s,
                "FROM well_core_sample_anal\n        GROUP BY id_uwi, id_source, id_core_id",
            ),
        ],
        "w.*, c.*, s.*",
        "JOIN c ON c.c_uwi = w.w_uwi
    LEFT OUTER JOIN s
        ON c.c_uwi = s.id_uwi
        AND c.c_source = s.id_source
        AND c.c_core_id = s.id_core_id",
    );

    Recipe {
        asset: AssetType::Core,
        identifier: QueryTemplate::new(identifier_sql("c.uwi", "well_core c")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("c_", "well_core"),
            ("s_", "well_core_sample_anal"),
        ],
        transforms: transform_map(s.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::CoreAgg),
    }
}
