//! Raster log registrations: one row per registered log section.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const SECTION_COLUMNS: &[&str] = &[
    "log_section_index",
    "base_depth",
    "base_depth_ouom",
    "bottom_left_x_pixel",
    "bottom_left_y_pixel",
    "bottom_right_x_pixel",
    "bottom_right_y_pixel",
    "create_date",
    "create_user_id",
    "curve_bottom_left_x_pixel",
    "curve_bottom_left_y_pixel",
    "curve_bottom_right_x_pixel",
    "curve_bottom_right_y_pixel",
    "curve_top_left_x_pixel",
    "curve_top_left_y_pixel",
    "curve_top_right_x_pixel",
    "curve_top_right_y_pixel",
    "header_bottom_left_x_pixel",
    "header_bottom_left_y_pixel",
    "header_bottom_right_x_pixel",
    "header_bottom_right_y_pixel",
    "header_rotation",
    "header_top_left_x_pixel",
    "header_top_left_y_pixel",
    "header_top_right_x_pixel",
    "header_top_right_y_pixel",
    "log_depth_cal_vid",
    "log_section_name",
    "num_depth_cal_pts",
    "remark",
    "source_registration_filename",
    "tif_file_identifier",
    "tif_file_path",
    "tif_filename",
    "top_depth",
    "top_depth_ouom",
    "top_left_x_pixel",
    "top_left_y_pixel",
    "top_right_x_pixel",
    "top_right_y_pixel",
    "update_date",
    "update_user_id",
    "well_id",
];

pub(super) fn recipe() -> Recipe {
    let r = Projection::new().plains("r_", SECTION_COLUMNS);

    let selector = selector_sql(
        &[well_cte(), cte("r", &r, "FROM log_image_reg_log_section")],
        "w.*, r.*",
        "JOIN r ON r.r_well_id = w.w_uwi",
    );

    Recipe {
        asset: AssetType::RasterLog,
        identifier: QueryTemplate::new(identifier_sql("r.well_id", "log_image_reg_log_section r")),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("v_", "log_depth_cal_vec"),
            ("r_", "log_image_reg_log_section"),
        ],
        transforms: Default::default(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::RasterLogAgg),
    }
}
