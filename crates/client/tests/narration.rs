//! Rendering a full AI-only session from the shipped content.

use std::path::Path;

use skirmish_client::{Narrator, session_outcome};
use skirmish_runtime::{RuntimeConfig, SessionBuilder, SessionOutcome};

fn shipped(encounter: &str, seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        content_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../game/content/data"),
        encounter: encounter.to_string(),
        ..RuntimeConfig::default()
    }
    .ai_only()
    .with_seed(seed)
}

async fn transcript(encounter: &str, seed: u64) -> (Vec<String>, SessionOutcome) {
    let mut session = SessionBuilder::from_content_dir(shipped(encounter, seed))
        .unwrap()
        .build()
        .unwrap();
    let mut narrator = Narrator::new(session.engine());
    let outcome = session.run().await.unwrap();
    let lines = session
        .history()
        .iter()
        .filter_map(|event| narrator.render(&event.event))
        .collect();
    (lines, outcome)
}

#[tokio::test]
async fn shipped_encounters_render_without_placeholders() {
    for (encounter, seed) in [("ambush", 1), ("ambush", 4), ("brute", 2)] {
        let (lines, _) = transcript(encounter, seed).await;
        assert!(lines.iter().any(|l| l.contains("=== Round 1 ===")));
        for line in &lines {
            assert!(!line.contains('{'), "unresolved placeholder in {line:?}");
        }
    }
}

#[tokio::test]
async fn transcript_ends_with_the_outcome() {
    let (lines, outcome) = transcript("ambush", 7).await;
    let last = lines.last().unwrap();
    match outcome {
        SessionOutcome::Decided(_) => assert_eq!(*last, session_outcome(outcome)),
        SessionOutcome::Stalemate { .. } => assert!(!last.is_empty()),
    }
}

#[tokio::test]
async fn turns_are_announced_by_name() {
    let (lines, _) = transcript("brute", 3).await;
    assert!(lines.iter().any(|l| l == "-- Ogre's turn --"));
    assert!(lines.iter().any(|l| l == "-- Warden's turn --"));
}
