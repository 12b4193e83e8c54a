//! The well header on its own.

use super::projection::{identifier_sql, selector_sql, well_cte};
use super::{AssetType, Recipe, DEFAULT_CHUNK_SIZE};
use crate::chunk_pipeline::query::QueryTemplate;

pub(super) fn recipe() -> Recipe {
    Recipe {
        asset: AssetType::Well,
        identifier: QueryTemplate::new(identifier_sql("w.uwi", "well w")),
        selector: QueryTemplate::new(selector_sql(&[well_cte()], "w.*", "")),
        prefixes: vec![("w_", "well")],
        transforms: Default::default(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        post_process: None,
    }
}
