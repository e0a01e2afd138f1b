//! Template catalog loaders.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use skirmish_core::Element;

use crate::loaders::{LoadResult, read_file};

/// Loader for `[(id, template), ...]` RON catalogs.
///
/// RON format: `Vec<(String, T)>`. Ids must be unique within a catalog.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<BTreeMap<String, T>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse<T: DeserializeOwned>(content: &str) -> LoadResult<BTreeMap<String, T>> {
        let entries: Vec<(String, T)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let mut catalog = BTreeMap::new();
        for (id, template) in entries {
            if catalog.insert(id.clone(), template).is_some() {
                anyhow::bail!("duplicate template id `{}`", id);
            }
        }
        Ok(catalog)
    }
}

/// Loader for per-element condition status pools.
///
/// RON format: `Vec<(Element, Vec<String>)>`, statuses in draw order.
pub struct StatusPoolLoader;

impl StatusPoolLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<Element, Vec<String>>> {
        let content = read_file(path)?;
        let pools: Vec<(Element, Vec<String>)> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status pools RON: {}", e))?;
        Ok(pools.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::ModifierTemplate;

    #[test]
    fn duplicate_ids_are_rejected() {
        let ron = r#"[
            ("haste", (description: "Hasted")),
            ("haste", (description: "Hasted again")),
        ]"#;
        let err = CatalogLoader::parse::<ModifierTemplate>(ron).unwrap_err();
        assert!(err.to_string().contains("haste"));
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let ron = r#"[("haste", (description: "Hasted", effects: [Stat(stat: Agility, val: 2.0)]))]"#;
        let catalog = CatalogLoader::parse::<ModifierTemplate>(ron).unwrap();
        let haste = &catalog["haste"];
        assert_eq!(haste.description, "Hasted");
        assert!(haste.expiry.is_none());
        assert_eq!(
            haste.effects,
            vec![skirmish_core::PassiveEffect::flat(skirmish_core::StatKind::Agility, 2.0)]
        );
    }
}
