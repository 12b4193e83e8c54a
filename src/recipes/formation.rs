//! Formation tops, one `LIST(...)` rollup per well.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::query::QueryTemplate;

const COLUMNS: &[(&str, K)] = &[
    ("dominant_lithology", K::String),
    ("fault_name", K::String),
    ("faulted_ind", K::Bool),
    ("form_depth", K::Float),
    ("form_id", K::String),
    ("form_obs_no", K::Int),
    ("form_tvd", K::Float),
    ("gap_thickness", K::Float),
    ("gx_base_subsea", K::Float),
    ("gx_dip", K::String),
    ("gx_dip_azimuth", K::String),
    ("gx_eroded_ind", K::Bool),
    ("gx_exten_id", K::String),
    ("gx_form_base_depth", K::Float),
    ("gx_form_base_tvd", K::Float),
    ("gx_form_depth_datum", K::Float),
    ("gx_form_id_alias", K::String),
    ("gx_form_top_depth", K::Float),
    ("gx_form_top_tvd", K::Float),
    ("gx_form_x_coordinate", K::Float),
    ("gx_form_y_coordinate", K::Float),
    ("gx_gross_thickness", K::Float),
    ("gx_internal_no", K::Float),
    ("gx_net_thickness", K::Float),
    ("gx_porosity", K::Float),
    ("gx_show", K::String),
    ("gx_strat_column", K::String),
    ("gx_top_subsea", K::Float),
    ("gx_true_strat_thickness", K::Float),
    ("gx_true_vert_thickness", K::Float),
    ("gx_user1", K::String),
    ("gx_user2", K::String),
    ("gx_user3", K::String),
    ("gx_vendor_no", K::Int),
    ("gx_wellbore_angle", K::Float),
    ("gx_wellbore_azimuth", K::Float),
    ("percent_thickness", K::Float),
    ("pick_location", K::String),
    ("pick_qualifier", K::String),
    ("pick_quality", K::String),
    ("pick_type", K::String),
    ("public", K::String),
    ("remark", K::String),
    ("row_changed_date", K::DateTime),
    ("source", K::String),
    ("unc_fault_obs_no", K::Int),
    ("unc_fault_source", K::String),
    ("unconformity_name", K::String),
    ("uwi", K::String),
];

pub(super) fn recipe() -> Recipe {
    let f = Projection::new()
        .plain("uwi", "id_f_uwi")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists("f_", "form_obs_no", COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("f", &f, "FROM well_formation\n        GROUP BY uwi"),
        ],
        "w.*, f.*",
        "JOIN f ON w.w_uwi = f.id_f_uwi",
    );

    Recipe {
        asset: AssetType::Formation,
        identifier: QueryTemplate::new(identifier_sql("f.uwi", "well_formation f")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![("w_", "well"), ("f_", "well_formation")],
        transforms: transform_map(f.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: None,
    }
}
