//! Cumulative production per zone, with monthly volumes rolled up into lists.
//!
//! One selector row per (zone, activity type, volume method). `ProductionAgg`
//! folds them into one document per well.

use super::projection::{collect_transforms, cte, identifier_sql, selector_sql, well_cte, Projection};
use super::{transform_map, AssetType, Recipe, WIDE_CHUNK_SIZE};
use crate::chunk_pipeline::models::ScalarKind as K;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;

const CUMULATIVE_COLUMNS: &[&str] = &[
    "activity_type",
    "average_gas_volume",
    "average_injection_volume",
    "average_oil_volume",
    "average_total_fluids_volume",
    "average_water_volume",
    "cumulative_gas_volume",
    "cumulative_injection_volume",
    "cumulative_oil_volume",
    "cumulative_total_fluids_volume",
    "cumulative_water_volume",
    "first_gas_volume",
    "first_gas_volume_date",
    "first_injection_volume",
    "first_oil_volume",
    "first_oil_volume_date",
    "first_total_fluids_date",
    "first_total_fluids_volume",
    "first_water_volume",
    "first_water_volume_date",
    "gas_eur",
    "gas_reserves",
    "gx_percent_allocation",
    "last_gas_volume",
    "last_gas_volume_date",
    "last_injection_volume",
    "last_oil_volume",
    "last_oil_volume_date",
    "last_total_fluids_date",
    "last_total_fluids_volume",
    "last_water_volume",
    "last_water_volume_date",
    "max_gas_volume",
    "max_injection_volume",
    "max_oil_volume",
    "max_total_fluids_volume",
    "max_water_volume",
    "min_gas_volume",
    "min_injection_volume",
    "min_oil_volume",
    "min_total_fluids_volume",
    "min_water_volume",
    "oil_eur",
    "oil_reserves",
    "row_changed_date",
    "uwi",
    "volume_method",
    "zone_id",
];

const MONTHLY_COLUMNS: &[(&str, K)] = &[
    ("pden_date", K::DateTime),
    ("pden_source", K::String),
    ("gas_volume", K::Float),
    ("gx_percent_allocation", K::Float),
    ("oil_volume", K::Float),
    ("prod_time", K::Float),
    ("row_changed_date", K::DateTime),
    ("volume_month", K::Int),
    ("volume_year", K::Int),
    ("water_volume", K::Float),
];

pub(super) fn recipe() -> Recipe {
    let p = Projection::new().plains("p_", CUMULATIVE_COLUMNS);
    let m = Projection::new()
        .plain("uwi", "id_m_uwi")
        .plain("zone_id", "id_m_zone_id")
        .plain("activity_type", "id_m_activity_type")
        .plain("volume_method", "id_m_volume_method")
        .plain("MAX(row_changed_date)", "max_row_changed_date")
        .lists("m_", "pden_date", MONTHLY_COLUMNS);

    let selector = selector_sql(
        &[
            well_cte(),
            cte("p", &p, "FROM well_cumulative_production"),
            cte(
                "m",
                &m,
                "FROM gx_pden_vol_sum_by_month\n        GROUP BY uwi, zone_id, activity_type, volume_method",
            ),
        ],
        "w.*, p.*, m.*",
        "JOIN p ON p.p_uwi = w.w_uwi
    JOIN m ON
        m.id_m_uwi = w.w_uwi
        AND m.id_m_zone_id = p.p_zone_id
        AND m.id_m_activity_type = p.p_activity_type
        AND m.id_m_volume_method = p.p_volume_method",
    );

    Recipe {
        asset: AssetType::Production,
        identifier: QueryTemplate::new(identifier_sql(
            "w.uwi",
            "well w\n    JOIN gx_pden_vol_sum_by_month g\n        ON w.uwi = g.uwi",
        )),
        selector: QueryTemplate::new(selector),
        prefixes: vec![
            ("w_", "well"),
            ("p_", "well_cumulative_production"),
            ("m_", "gx_pden_vol_sum_by_month"),
        ],
        transforms: transform_map(collect_transforms(&[&p, &m])),
        chunk_size: WIDE_CHUNK_SIZE,
        post_process: Some(PostProcessKey::ProductionAgg),
    }
}
