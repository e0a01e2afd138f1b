use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use skirmish_content::ContentFactory;
use skirmish_core::{CombatConfig, CombatEngine, Element, Slot, StatKind, Team};
use tempfile::TempDir;

fn shipped_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

#[test]
fn shipped_content_loads_and_validates() {
    let factory = ContentFactory::new(shipped_data());
    let config = factory.load_config().unwrap();
    let tables = factory.load_tables().unwrap();
    let encounters = factory.load_encounters(&tables).unwrap();

    assert_eq!(config, CombatConfig::new());
    assert_eq!(tables.equipment["chainmail"].slot, Slot::Armour);
    assert_eq!(tables.status_pools[&Element::Phys].len(), 2);
    assert!(encounters.contains_key("ambush"));
}

#[test]
fn shipped_encounter_spawns() {
    let factory = ContentFactory::new(shipped_data());
    let tables = factory.load_tables().unwrap();
    let encounters = factory.load_encounters(&tables).unwrap();
    let mut engine = CombatEngine::new(Arc::new(tables), CombatConfig::new(), 7);

    let ambush = &encounters["ambush"];
    for id in &ambush.allies {
        engine.spawn(id, Team::Ally).unwrap();
    }
    for id in &ambush.enemies {
        engine.spawn(id, Team::Enemy).unwrap();
    }

    let warden = engine
        .world()
        .roster()
        .find(|c| c.template == "warden")
        .map(|c| c.id)
        .unwrap();
    // base 5 plus chainmail's 2
    assert_eq!(engine.stat(warden, StatKind::Fortitude).unwrap(), 7.0);
    assert_eq!(engine.world().character(warden).unwrap().health, 60);
}

#[test]
fn empty_directory_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let factory = ContentFactory::new(dir.path());

    assert_eq!(factory.load_config().unwrap(), CombatConfig::new());
    let tables = factory.load_tables().unwrap();
    assert!(tables.characters.is_empty());
    assert!(factory.load_encounters(&tables).unwrap().is_empty());
}

#[test]
fn dangling_reference_fails_the_load() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "characters.ron",
        r#"[("knight", (name: "Knight", weapon: Some("sword")))]"#,
    );

    let err = ContentFactory::new(dir.path()).load_tables().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("sword"), "{message}");
}

#[test]
fn malformed_ron_reports_the_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "modifiers.ron", "[(\"haste\", (description: ))]");

    let err = ContentFactory::new(dir.path()).load_tables().unwrap_err();
    assert!(err.to_string().contains("modifiers.ron"));
}

#[test]
fn one_sided_encounter_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "characters.ron", r#"[("rat", (name: "Rat"))]"#);
    write(
        dir.path(),
        "encounters.ron",
        r#"[("lonely", (allies: ["rat"], enemies: []))]"#,
    );

    let factory = ContentFactory::new(dir.path());
    let tables = factory.load_tables().unwrap();
    let err = factory.load_encounters(&tables).unwrap_err();
    assert!(format!("{err:#}").contains("lonely"));
}

#[test]
fn config_file_overrides_rules() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "config.toml", "condition_threshold = 10.0\n");

    let config = ContentFactory::new(dir.path()).load_config().unwrap();
    assert_eq!(config.condition_threshold, 10.0);
    assert_eq!(config.initiative_die, CombatConfig::DEFAULT_INITIATIVE_DIE);
}
