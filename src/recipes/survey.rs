//! Directional surveys, actual and proposed.
//!
//! One selector row per survey (a header joined to its stations rolled up into
//! lists, ordered by measured depth). Actual and proposed surveys are unioned
//! and told apart by `s_kind`. `SurveyAgg` folds the surveys of a well into one
//! document.

use super::projection::{cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const STATION_COLUMNS: &[(&str, K)] = &[
    ("azimuth", K::Float),
    ("azimuth_ouom", K::String),
    ("ew_direction", K::String),
    ("gx_closure", K::String),
    ("gx_station_latitude", K::Float),
    ("gx_station_longitude", K::Float),
    ("inclination", K::Float),
    ("inclination_ouom", K::String),
    ("ns_direction", K::String),
    ("row_changed_date", K::DateTime),
    ("source", K::String),
    ("station_id", K::String),
    ("station_md", K::Float),
    ("station_md_ouom", K::String),
    ("station_tvd", K::Float),
    ("station_tvd_ouom", K::String),
    ("survey_id", K::String),
    ("uwi", K::String),
    ("x_offset", K::Float),
    ("x_offset_ouom", K::String),
    ("y_offset", K::Float),
    ("y_offset_ouom", K::String),
];

/// Header columns present on both survey tables.
const HEADER_COLUMNS: &[&str] = &[
    "azimuth_north_type",
    "base_depth",
    "base_depth_ouom",
    "calculation_required",
    "compute_method",
    "ew_magnetic_declination",
    "grid_system_id",
    "gx_base_e_w_offset",
    "gx_base_latitude",
    "gx_base_location_string",
    "gx_base_longitude",
    "gx_base_n_s_offset",
    "gx_base_tvd",
    "gx_closure",
    "gx_footage",
    "gx_kop_e_w_offset",
    "gx_kop_latitude",
    "gx_kop_longitude",
    "gx_kop_md",
    "gx_kop_n_s_offset",
    "gx_kop_tvd",
    "magnetic_declination",
    "north_reference",
    "offset_north_type",
    "record_mode",
    "remark",
    "row_changed_date",
    "source",
    "source_document",
    "survey_company",
    "survey_date",
    "survey_id",
    "survey_quality",
    "survey_type",
    "top_depth",
    "top_depth_ouom",
    "uwi",
];

/// Header columns only proposed surveys carry; actual surveys project null.
const PROPOSED_ONLY_COLUMNS: &[&str] = &[
    "gx_active",
    "gx_lp_e_w_offset",
    "gx_lp_n_s_offset",
    "gx_lp_tvd",
    "gx_scenario_name",
];

#[derive(Clone, Copy)]
enum SurveyKind {
    Actual,
    Proposed,
}

impl SurveyKind {
    fn label(self) -> &'static str {
        match self {
            SurveyKind::Actual => "actual",
            SurveyKind::Proposed => "proposed",
        }
    }

    fn header_table(self) -> &'static str {
        match self {
            SurveyKind::Actual => "well_dir_srvy",
            SurveyKind::Proposed => "well_dir_proposed_srvy",
        }
    }

    fn station_table(self) -> &'static str {
        match self {
            SurveyKind::Actual => "well_dir_srvy_station",
            SurveyKind::Proposed => "well_dir_proposed_srvy_station",
        }
    }
}

fn station_projection(kind: SurveyKind) -> Projection {
    Projection::new()
        .plain("uwi", "id_d_uwi")
        .plain("survey_id", "id_d_survey_id")
        .plain("source", "id_d_source")
        .plain(&format!("'{}'", kind.label()), "id_d_kind")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists("d_", "station_md", STATION_COLUMNS)
}

fn header_projection(kind: SurveyKind) -> Projection {
    let p = Projection::new().plain(&format!("'{}'", kind.label()), "s_kind");
    let p = HEADER_COLUMNS
        .iter()
        .fold(p, |p, col| p.plain(&format!("s.{}", col), &format!("s_{}", col)));
    PROPOSED_ONLY_COLUMNS.iter().fold(p, |p, col| {
        let expr = match kind {
            SurveyKind::Actual => "null".to_string(),
            SurveyKind::Proposed => format!("s.{}", col),
        };
        p.plain(&expr, &format!("s_{}", col))
    })
}

pub(super) fn recipe() -> Recipe {
    let actual_stations = station_projection(SurveyKind::Actual);
    let proposed_stations = station_projection(SurveyKind::Proposed);
    let d = cte(
        "d",
        &actual_stations,
        &format!(
            "FROM {}\n        GROUP BY uwi, survey_id, source\n        UNION\n        SELECT\n            {}\n        FROM {}\n        GROUP BY uwi, survey_id, source",
            SurveyKind::Actual.station_table(),
            proposed_stations.sql(),
            SurveyKind::Proposed.station_table(),
        ),
    );

    let header_tail = |kind: SurveyKind| {
        format!(
            "FROM {} s\n        WHERE s.uwi IN (SELECT uwi FROM {})",
            kind.header_table(),
            kind.station_table()
        )
    };
    let s = cte(
        "s",
        &header_projection(SurveyKind::Actual),
        &format!(
            "{}\n        UNION\n        SELECT\n            {}\n        {}",
            header_tail(SurveyKind::Actual),
            header_projection(SurveyKind::Proposed).sql(),
            header_tail(SurveyKind::Proposed),
        ),
    );

    let selector = selector_sql(
        &[well_cte(), d, s],
        "w.*, s.*, d.*",
        "JOIN d ON w.w_uwi = d.id_d_uwi
    JOIN s
        ON s.s_source = d.id_d_source
        AND s.s_survey_id = d.id_d_survey_id
        AND s.s_uwi = d.id_d_uwi
        AND s.s_kind = d.id_d_kind",
    );

    Recipe {
        asset: AssetType::Survey,
        identifier: QueryTemplate::new(identifier_sql(
            "uwi",
            "(
        SELECT uwi FROM well_dir_srvy_station
        UNION
        SELECT uwi FROM well_dir_proposed_srvy_station
    ) x",
        )),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("d_", "well_dir_srvy_station"),
            ("s_", "well_dir_srvy"),
        ],
        transforms: transform_map(actual_stations.transforms().to_vec()),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: Some(PostProcessKey::SurveyAgg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_survey_kinds_are_unioned() {
        let recipe = recipe();
        let sql = recipe.selector.sql();
        assert_eq!(sql.matches("UNION").count(), 2);
        assert!(sql.contains("'actual' AS id_d_kind"));
        assert!(sql.contains("'proposed' AS s_kind"));
        assert!(sql.contains("null AS s_gx_scenario_name"));
        assert!(sql.contains("s.gx_scenario_name AS s_gx_scenario_name"));
    }
}
