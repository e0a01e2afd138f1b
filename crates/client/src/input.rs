//! Line-based player input from stdin.

use std::io::Write;

use async_trait::async_trait;
use skirmish_core::TargetChoice;
use skirmish_runtime::{PlayerCommand, PlayerController, Result, RuntimeError, TurnView};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use crate::render::turn_menu;

/// Parses one command line against the current turn.
///
/// ```text
/// use <action> [slot]   action index from the menu, target by roster slot
/// talk <slot> <topic>   talk to the character in roster slot
/// pass
/// ```
pub fn parse_command(view: &TurnView, line: &str) -> std::result::Result<PlayerCommand, String> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("use" | "u") => {
            let index = number(words.next(), "action")?;
            let action = view
                .actions
                .get(index)
                .ok_or_else(|| format!("no action {index}"))?;
            let target = match words.next() {
                Some(slot) => TargetChoice::Character(slot_id(view, Some(slot))?),
                None if action.target.is_single() => match action.targets.as_slice() {
                    [only] => TargetChoice::Character(*only),
                    _ => return Err(format!("{} needs a target slot", action.name)),
                },
                None => TargetChoice::SelfTarget,
            };
            Ok(PlayerCommand::Use {
                thing: action.thing,
                target,
            })
        }
        Some("talk" | "t") => {
            let listener = slot_id(view, words.next())?;
            let topic = words.next().ok_or("talk needs a topic")?;
            Ok(PlayerCommand::Talk {
                listener,
                topic: topic.to_string(),
            })
        }
        Some("pass" | "p") => Ok(PlayerCommand::Pass),
        Some(other) => Err(format!("unknown command `{other}`")),
        None => Err("empty command".to_string()),
    }
}

fn number(word: Option<&str>, what: &str) -> std::result::Result<usize, String> {
    word.ok_or_else(|| format!("missing {what} number"))?
        .parse()
        .map_err(|_| format!("`{}` is not a valid {what} number", word.unwrap_or_default()))
}

fn slot_id(
    view: &TurnView,
    word: Option<&str>,
) -> std::result::Result<skirmish_core::CharacterId, String> {
    let slot = number(word, "slot")?;
    view.roster
        .get(slot)
        .map(|c| c.id)
        .ok_or_else(|| format!("no combatant in slot {slot}"))
}

/// Prompts on stdout and reads commands from stdin.
///
/// Closed input makes every further turn a pass.
pub struct StdinController {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinController {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerController for StdinController {
    async fn choose(&self, view: &TurnView) -> Result<PlayerCommand> {
        print!("{}", turn_menu(view));
        let mut lines = self.lines.lock().await;
        loop {
            print!("> ");
            let _ = std::io::stdout().flush();
            let line = lines
                .next_line()
                .await
                .map_err(|e| RuntimeError::Controller(e.to_string()))?;
            let Some(line) = line else {
                warn!("input closed, passing");
                return Ok(PlayerCommand::Pass);
            };
            match parse_command(view, &line) {
                Ok(command) => return Ok(command),
                Err(message) => println!("{message}"),
            }
        }
    }

    async fn rejected(&self, _view: &TurnView, error: &RuntimeError) {
        println!("Can't do that: {error}");
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::env::TargetKind;
    use skirmish_core::{CharacterId, Gender, Team, ThingId};
    use skirmish_runtime::{ActionView, CombatantView, TalkView};

    use super::*;

    fn combatant(raw: u32, name: &str, team: Team) -> CombatantView {
        CombatantView {
            id: CharacterId(raw),
            name: name.to_string(),
            gender: Gender::Neutral,
            team,
            health: 10,
            max_health: 10,
            mana: 0,
            max_mana: 0,
            alive: true,
            modifiers: Vec::new(),
        }
    }

    fn view() -> TurnView {
        TurnView {
            round: 1,
            actor: CharacterId(1),
            roster: vec![
                combatant(1, "Warden", Team::Ally),
                combatant(2, "Goblin", Team::Enemy),
                combatant(3, "Shaman", Team::Enemy),
            ],
            actions: vec![
                ActionView {
                    thing: ThingId(10),
                    name: "Longsword".to_string(),
                    target: TargetKind::SingleEnemy,
                    mana_cost: 0,
                    targets: vec![CharacterId(2), CharacterId(3)],
                },
                ActionView {
                    thing: ThingId(11),
                    name: "Rally".to_string(),
                    target: TargetKind::AllyTeam,
                    mana_cost: 5,
                    targets: vec![CharacterId(1)],
                },
            ],
            talk: vec![TalkView {
                listener: CharacterId(2),
                topics: vec!["threaten".to_string()],
            }],
        }
    }

    #[test]
    fn use_picks_the_action_and_roster_slot() {
        assert_eq!(
            parse_command(&view(), "use 0 2"),
            Ok(PlayerCommand::Use {
                thing: ThingId(10),
                target: TargetChoice::Character(CharacterId(3)),
            })
        );
    }

    #[test]
    fn team_actions_need_no_target() {
        assert_eq!(
            parse_command(&view(), "u 1"),
            Ok(PlayerCommand::Use {
                thing: ThingId(11),
                target: TargetChoice::SelfTarget,
            })
        );
        assert!(parse_command(&view(), "use 0").is_err());
    }

    #[test]
    fn talk_and_pass_parse() {
        assert_eq!(
            parse_command(&view(), "talk 1 threaten"),
            Ok(PlayerCommand::Talk {
                listener: CharacterId(2),
                topic: "threaten".to_string(),
            })
        );
        assert_eq!(parse_command(&view(), "  pass "), Ok(PlayerCommand::Pass));
    }

    #[test]
    fn bad_input_explains_itself() {
        assert_eq!(parse_command(&view(), "use 7"), Err("no action 7".to_string()));
        assert_eq!(
            parse_command(&view(), "use x"),
            Err("`x` is not a valid action number".to_string())
        );
        assert_eq!(
            parse_command(&view(), "dance"),
            Err("unknown command `dance`".to_string())
        );
    }
}
