//! Content factory for building content tables from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use skirmish_core::{CombatConfig, ContentTables};
use tracing::{debug, info};

use crate::Encounter;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, StatusPoolLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── characters.ron
/// ├── equipment.ron
/// ├── actions.ron
/// ├── modifiers.ron
/// ├── dialogue.ron
/// ├── statuses.ron
/// └── encounters.ron
/// ```
///
/// Every file is optional. A missing catalog is empty and a missing
/// `config.toml` yields the default rules.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the combat rules from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using default rules");
            return Ok(CombatConfig::new());
        }
        ConfigLoader::load(&path)
    }

    /// Load every catalog and check their cross references.
    pub fn load_tables(&self) -> LoadResult<ContentTables> {
        let tables = ContentTables {
            characters: self.catalog("characters.ron")?,
            equipment: self.catalog("equipment.ron")?,
            actions: self.catalog("actions.ron")?,
            modifiers: self.catalog("modifiers.ron")?,
            dialogue: self.catalog("dialogue.ron")?,
            status_pools: match self.existing("statuses.ron") {
                Some(path) => StatusPoolLoader::load(&path)?,
                None => Default::default(),
            },
        };

        crate::validate(&tables)
            .with_context(|| format!("invalid content in {}", self.data_dir.display()))?;

        info!(
            dir = %self.data_dir.display(),
            characters = tables.characters.len(),
            equipment = tables.equipment.len(),
            actions = tables.actions.len(),
            modifiers = tables.modifiers.len(),
            "content loaded"
        );
        Ok(tables)
    }

    /// Load `encounters.ron`, checking each against `tables`.
    pub fn load_encounters(
        &self,
        tables: &ContentTables,
    ) -> LoadResult<std::collections::BTreeMap<String, Encounter>> {
        let encounters: std::collections::BTreeMap<String, Encounter> = self.catalog("encounters.ron")?;
        for (id, encounter) in &encounters {
            encounter
                .validate(id, tables)
                .with_context(|| format!("encounter `{id}`"))?;
        }
        Ok(encounters)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn catalog<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> LoadResult<std::collections::BTreeMap<String, T>> {
        match self.existing(file) {
            Some(path) => CatalogLoader::load(&path),
            None => Ok(Default::default()),
        }
    }

    fn existing(&self, file: &str) -> Option<PathBuf> {
        let path = self.data_dir.join(file);
        path.exists().then_some(path)
    }
}
