//! Runtime configuration read from the process environment.

use std::env;
use std::path::PathBuf;

/// Session settings that sit outside the combat rules.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Seed of the session's random stream.
    pub seed: u64,
    /// Rounds before the session is called a stalemate; 0 disables the cap.
    pub max_rounds: u32,
    /// Hand every character to the AI, including player characters.
    pub ai_only: bool,
    /// Directory holding the content catalogs and `config.toml`.
    pub content_dir: PathBuf,
    /// Encounter id from `encounters.ron`.
    pub encounter: String,
    /// Broadcast capacity per event topic.
    pub event_buffer_size: usize,
    /// Consecutive rejected player commands before the session gives up.
    pub max_rejections: u32,
    /// Where to write the JSON combat record when the session ends.
    pub export_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_rounds: 50,
            ai_only: false,
            content_dir: PathBuf::from("crates/game/content/data"),
            encounter: "ambush".to_string(),
            event_buffer_size: 256,
            max_rejections: 5,
            export_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_SEED` - Session seed (default: 0)
    /// - `SKIRMISH_MAX_ROUNDS` - Stalemate cap, 0 for none (default: 50)
    /// - `SKIRMISH_AI_ONLY` - Let the AI play every character (default: false)
    /// - `SKIRMISH_CONTENT_DIR` - Content directory (default: crates/game/content/data)
    /// - `SKIRMISH_ENCOUNTER` - Encounter id (default: ambush)
    /// - `SKIRMISH_EVENT_BUFFER` - Broadcast capacity per topic (default: 256)
    /// - `SKIRMISH_MAX_REJECTIONS` - Rejected commands before giving up (default: 5)
    /// - `SKIRMISH_EXPORT` - JSON combat record path (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("SKIRMISH_SEED") {
            config.seed = seed;
        }
        if let Some(rounds) = read_env::<u32>("SKIRMISH_MAX_ROUNDS") {
            config.max_rounds = rounds;
        }
        if let Some(ai_only) = read_env_bool("SKIRMISH_AI_ONLY") {
            config.ai_only = ai_only;
        }
        if let Some(dir) = read_env::<PathBuf>("SKIRMISH_CONTENT_DIR") {
            config.content_dir = dir;
        }
        if let Some(encounter) = read_env::<String>("SKIRMISH_ENCOUNTER") {
            config.encounter = encounter;
        }
        if let Some(capacity) = read_env::<usize>("SKIRMISH_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(attempts) = read_env::<u32>("SKIRMISH_MAX_REJECTIONS") {
            config.max_rejections = attempts.max(1);
        }
        if let Some(path) = read_env::<PathBuf>("SKIRMISH_EXPORT") {
            config.export_path = Some(path);
        }

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn ai_only(mut self) -> Self {
        self.ai_only = true;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
