//! Combat rules loader.

use std::path::Path;

use skirmish_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`CombatConfig`] from TOML files.
///
/// Every key is optional; omitted keys keep their default value.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.damage_variance_low > config.damage_variance_high {
            anyhow::bail!(
                "damage_variance_low ({}) exceeds damage_variance_high ({})",
                config.damage_variance_low,
                config.damage_variance_high
            );
        }
        Ok(config)
    }
}
