//! Data-driven content for the combat engine.
//!
//! Content is authored as RON catalogs plus a TOML rules file and loaded into
//! [`skirmish_core::ContentTables`], which the engine consumes through the
//! `ContentOracle` trait. Content never appears in combat state; the engine
//! clones templates into owned instances when it spawns things.
//!
//! With the default `loaders` feature:
//! - [`CatalogLoader`] reads `[(id, template), ...]` RON catalogs
//! - [`ConfigLoader`] reads [`skirmish_core::CombatConfig`] from TOML
//! - [`ContentFactory`] loads a whole data directory, including the
//!   [`Encounter`] catalog
//! - [`validate`] checks every cross-template reference up front

#[cfg(feature = "loaders")]
pub mod loaders;

pub mod encounter;
pub mod validate;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, StatusPoolLoader};

pub use encounter::Encounter;
pub use validate::validate;
