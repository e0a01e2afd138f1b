//! Narrative text carried by content templates.
//!
//! Content never embeds executable text generators. A narrative is either a
//! fixed line or a list to pick from at random; the engine fills in the
//! placeholders below and leaves anything else (pronouns, markup) to the
//! presentation layer.
//!
//! | Placeholder | Replaced with |
//! |---|---|
//! | `{actor}` | acting character's name |
//! | `{target}` | target character's name |
//! | `{amount}` | damage or healing dealt |
//! | `{action}` | action name |

use crate::env::rng::CombatRng;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Narrative {
    Line(String),
    Pick(Vec<String>),
}

/// Values substituted into a narrative line.
#[derive(Clone, Debug, Default)]
pub struct NarrativeVars<'a> {
    pub actor: Option<&'a str>,
    pub target: Option<&'a str>,
    pub amount: Option<i64>,
    pub action: Option<&'a str>,
}

impl Narrative {
    pub fn line(text: impl Into<String>) -> Self {
        Narrative::Line(text.into())
    }

    /// Chooses the raw line, consuming a roll only for `Pick`.
    pub fn choose<'a>(&'a self, rng: &mut CombatRng) -> Option<&'a str> {
        match self {
            Narrative::Line(line) => Some(line),
            Narrative::Pick(lines) if lines.is_empty() => None,
            Narrative::Pick(lines) => Some(&lines[rng.index(lines.len())]),
        }
    }

    pub fn render(&self, rng: &mut CombatRng, vars: &NarrativeVars<'_>) -> Option<String> {
        self.choose(rng).map(|line| fill(line, vars))
    }
}

fn fill(line: &str, vars: &NarrativeVars<'_>) -> String {
    let mut out = line.to_string();
    if let Some(actor) = vars.actor {
        out = out.replace("{actor}", actor);
    }
    if let Some(target) = vars.target {
        out = out.replace("{target}", target);
    }
    if let Some(amount) = vars.amount {
        out = out.replace("{amount}", &amount.to_string());
    }
    if let Some(action) = vars.action {
        out = out.replace("{action}", action);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_known_placeholders_only() {
        let mut rng = CombatRng::new(1);
        let text = Narrative::line("{actor} hits {target} for {amount}. {he} staggers.");
        let vars = NarrativeVars {
            actor: Some("Ava"),
            target: Some("Grub"),
            amount: Some(12),
            action: None,
        };
        assert_eq!(
            text.render(&mut rng, &vars).unwrap(),
            "Ava hits Grub for 12. {he} staggers."
        );
    }

    #[test]
    fn empty_pick_renders_nothing() {
        let mut rng = CombatRng::new(1);
        assert!(
            Narrative::Pick(Vec::new())
                .render(&mut rng, &NarrativeVars::default())
                .is_none()
        );
    }
}
