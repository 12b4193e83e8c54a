// In: src/recipes/mod.rs

//! The recipe registry: one immutable extraction descriptor per asset type.
//!
//! Recipes are built once per process, validated, and then shared read-only by
//! every request. The set is closed: `AssetType` enumerates it and
//! `build_recipe` matches it exhaustively.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::chunk_pipeline::models::TransformKind;
use crate::chunk_pipeline::post_process::PostProcessKey;
use crate::chunk_pipeline::query::QueryTemplate;
use crate::error::CollectError;

mod projection;

mod completion;
mod dst;
mod formation;
mod ip;
mod perforation;
mod production;
mod raster_log;
mod survey;
mod vector_log;
mod well;
mod well_core;
mod zone;

/// The prefix of the primary (well) sub-object.
pub const PRIMARY_PREFIX: &str = "w_";

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Chunk size for recipes whose selector fans out into many rows per well.
pub const WIDE_CHUNK_SIZE: usize = 100;

//==================================================================================
// 1. Asset Types
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Completion,
    Core,
    Dst,
    Formation,
    Ip,
    Perforation,
    Production,
    RasterLog,
    Survey,
    VectorLog,
    Well,
    Zone,
}

impl AssetType {
    pub const ALL: [AssetType; 12] = [
        AssetType::Completion,
        AssetType::Core,
        AssetType::Dst,
        AssetType::Formation,
        AssetType::Ip,
        AssetType::Perforation,
        AssetType::Production,
        AssetType::RasterLog,
        AssetType::Survey,
        AssetType::VectorLog,
        AssetType::Well,
        AssetType::Zone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Completion => "completion",
            AssetType::Core => "core",
            AssetType::Dst => "dst",
            AssetType::Formation => "formation",
            AssetType::Ip => "ip",
            AssetType::Perforation => "perforation",
            AssetType::Production => "production",
            AssetType::RasterLog => "raster_log",
            AssetType::Survey => "survey",
            AssetType::VectorLog => "vector_log",
            AssetType::Well => "well",
            AssetType::Zone => "zone",
        }
    }
}

impl FromStr for AssetType {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AssetType::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| CollectError::UnknownAssetType(s.to_string()))
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//==================================================================================
// 2. The Recipe Descriptor
//==================================================================================

/// Everything needed to extract and shape one asset type.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub asset: AssetType,
    /// Yields the distinct `w_uwi` values to extract.
    pub identifier: QueryTemplate,
    /// Yields the detail rows for one chunk of identifiers.
    pub selector: QueryTemplate,
    /// Column prefix -> logical sub-table name.
    pub prefixes: Vec<(&'static str, &'static str)>,
    /// Column name -> declared transform. Unlisted columns use the default for
    /// their canonical type.
    pub transforms: HashMap<String, TransformKind>,
    pub chunk_size: usize,
    pub post_process: Option<PostProcessKey>,
}

impl Recipe {
    pub fn transform_for(&self, column: &str) -> Option<TransformKind> {
        self.transforms.get(column).copied()
    }

    /// The longest declared prefix of `column`, with its table name.
    pub fn table_for(&self, column: &str) -> Option<(&'static str, &'static str)> {
        self.prefixes
            .iter()
            .filter(|(prefix, _)| column.starts_with(prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .copied()
    }

    /// The table name of the primary sub-object.
    pub fn primary_table(&self) -> Option<&'static str> {
        self.prefixes
            .iter()
            .find(|(prefix, _)| *prefix == PRIMARY_PREFIX)
            .map(|(_, table)| *table)
    }

    /// Checks the structural rules every recipe must satisfy.
    pub fn validate(&self) -> Result<(), CollectError> {
        let fail = |reason: String| CollectError::InvalidRecipe {
            asset: self.asset.to_string(),
            reason,
        };

        for (name, template) in [("identifier", &self.identifier), ("selector", &self.selector)] {
            let count = template.placeholder_count();
            if count != 1 {
                return Err(fail(format!(
                    "{} template has {} placeholders, expected 1",
                    name, count
                )));
            }
        }
        if self.primary_table().is_none() {
            return Err(fail(format!("primary prefix '{}' is not declared", PRIMARY_PREFIX)));
        }
        if let Some(column) = self
            .transforms
            .keys()
            .find(|column| self.table_for(column).is_none())
        {
            return Err(fail(format!("transform column '{}' has no declared prefix", column)));
        }
        if self.chunk_size == 0 {
            return Err(fail("chunk size must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Shorthand for the recipe modules.
pub(crate) fn transform_map(entries: Vec<(String, TransformKind)>) -> HashMap<String, TransformKind> {
    entries.into_iter().collect()
}

fn build_recipe(asset: AssetType) -> Recipe {
    match asset {
        AssetType::Completion => completion::recipe(),
        AssetType::Core => well_core::recipe(),
        AssetType::Dst => dst::recipe(),
        AssetType::Formation => formation::recipe(),
        AssetType::Ip => ip::recipe(),
        AssetType::Perforation => perforation::recipe(),
        AssetType::Production => production::recipe(),
        AssetType::RasterLog => raster_log::recipe(),
        AssetType::Survey => survey::recipe(),
        AssetType::VectorLog => vector_log::recipe(),
        AssetType::Well => well::recipe(),
        AssetType::Zone => zone::recipe(),
    }
}

//==================================================================================
// 3. The Registry
//==================================================================================

#[derive(Debug)]
pub struct RecipeRegistry {
    recipes: HashMap<AssetType, Recipe>,
}

impl RecipeRegistry {
    /// Builds and validates every recipe.
    pub fn load() -> Result<Self, CollectError> {
        let mut recipes = HashMap::with_capacity(AssetType::ALL.len());
        for asset in AssetType::ALL {
            let recipe = build_recipe(asset);
            recipe.validate()?;
            recipes.insert(asset, recipe);
        }
        Ok(Self { recipes })
    }

    pub fn recipe(&self, asset: AssetType) -> Result<&Recipe, CollectError> {
        self.recipes
            .get(&asset)
            .ok_or_else(|| CollectError::UnknownAssetType(asset.to_string()))
    }

    /// Looks a recipe up by its asset type name, case-insensitively.
    pub fn get(&self, asset_type: &str) -> Result<&Recipe, CollectError> {
        self.recipe(asset_type.parse()?)
    }
}

static REGISTRY: OnceLock<Result<RecipeRegistry, (String, String)>> = OnceLock::new();

/// The process-wide registry, built on first use.
pub fn registry() -> Result<&'static RecipeRegistry, CollectError> {
    let loaded = REGISTRY.get_or_init(|| {
        RecipeRegistry::load().map_err(|e| match e {
            CollectError::InvalidRecipe { asset, reason } => (asset, reason),
            other => (String::new(), other.to_string()),
        })
    });
    match loaded {
        Ok(registry) => Ok(registry),
        Err((asset, reason)) => Err(CollectError::InvalidRecipe {
            asset: asset.clone(),
            reason: reason.clone(),
        }),
    }
}

/// `registry()?.get(asset_type)`.
pub fn get(asset_type: &str) -> Result<&'static Recipe, CollectError> {
    registry()?.get(asset_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tokens::WHERE_TOKEN;

    #[test]
    fn test_every_recipe_validates() {
        let registry = RecipeRegistry::load().unwrap();
        for asset in AssetType::ALL {
            let recipe = registry.recipe(asset).unwrap();
            assert_eq!(recipe.asset, asset);
            assert_eq!(recipe.primary_table(), Some("well"));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_closed() {
        assert_eq!(get("Vector_Log").unwrap().asset, AssetType::VectorLog);
        assert!(matches!(get("seismic"), Err(CollectError::UnknownAssetType(_))));
    }

    #[test]
    fn test_chunk_sizes() {
        for asset in AssetType::ALL {
            let expected = match asset {
                AssetType::Dst | AssetType::Production => WIDE_CHUNK_SIZE,
                _ => DEFAULT_CHUNK_SIZE,
            };
            assert_eq!(get(asset.as_str()).unwrap().chunk_size, expected, "{}", asset);
        }
    }

    #[test]
    fn test_selectors_expose_the_primary_key() {
        for asset in AssetType::ALL {
            let recipe = get(asset.as_str()).unwrap();
            assert!(recipe.selector.sql().contains("AS w_uwi"), "{}", asset);
            assert!(recipe.identifier.sql().contains("AS w_uwi"), "{}", asset);
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut recipe = get("well").unwrap().clone();
        recipe.prefixes.push(("w_uwi_", "aliases"));
        assert_eq!(recipe.table_for("w_uwi_alias"), Some(("w_uwi_", "aliases")));
        assert_eq!(recipe.table_for("w_uwi"), Some(("w_", "well")));
        assert_eq!(recipe.table_for("id_c_uwi"), None);
    }

    #[test]
    fn test_validation_rejects_malformed_recipes() {
        let mut recipe = get("completion").unwrap().clone();
        recipe.selector = QueryTemplate::new(format!("{0} {0}", WHERE_TOKEN));
        assert!(matches!(recipe.validate(), Err(CollectError::InvalidRecipe { .. })));

        let mut recipe = get("completion").unwrap().clone();
        recipe
            .transforms
            .insert("zz_orphan".to_string(), TransformKind::BlobToHex);
        assert!(recipe.validate().is_err());

        let mut recipe = get("completion").unwrap().clone();
        recipe.prefixes.retain(|(p, _)| *p != PRIMARY_PREFIX);
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_asset_names_round_trip() {
        for asset in AssetType::ALL {
            assert_eq!(asset.to_string().parse::<AssetType>().unwrap(), asset);
        }
    }
}
