use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::bonus::{BonusStack, StatBounds};
use super::kinds::{Affinities, Affinity, Element, ElementSet, StatKind};
use crate::env::PassiveEffect;
use crate::error::CombatError;
use crate::registry::CharacterId;
use crate::state::World;

/// Passive effects currently applying to `id`, modifiers first.
fn contributions(world: &World, id: CharacterId) -> impl Iterator<Item = &PassiveEffect> {
    let from_modifiers = world
        .modifiers_on(id)
        .flat_map(|modifier| modifier.template.effects.iter());
    let from_effects = world
        .effects
        .values()
        .filter(move |effect| effect.holder == id)
        .flat_map(|effect| effect.effects.iter());
    from_modifiers.chain(from_effects)
}

/// Effective value of `stat` for `id`.
pub fn effective_stat(world: &World, id: CharacterId, stat: StatKind) -> Result<f64, CombatError> {
    let character = world.character(id)?;

    let mut stack = BonusStack::for_stat(stat);
    for effect in contributions(world, id) {
        if let PassiveEffect::Stat { stat: s, val, multi } = effect
            && *s == stat
        {
            stack.add_entry(*val, *multi);
        }
    }

    let mut base = character.base(stat);
    if stat == StatKind::Initiative {
        base += effective_stat(world, id, StatKind::Agility)? + character.initiative_roll;
    }

    Ok(stack.apply(base, StatBounds::for_stat(stat)))
}

/// Baseline affinities merged with affinity effects, exclusivity rules applied.
pub fn effective_affinities(world: &World, id: CharacterId) -> Result<Affinities, CombatError> {
    let baseline = world.character(id)?.baseline;
    let mut weak = baseline.weak();
    let mut resist = baseline.resist();
    let mut immune = baseline.immune();

    for effect in contributions(world, id) {
        if let PassiveEffect::Affinity { element, affinity } = effect {
            let set: &mut ElementSet = match affinity {
                Affinity::Weak => &mut weak,
                Affinity::Resist => &mut resist,
                Affinity::Immune => &mut immune,
                Affinity::Neutral => continue,
            };
            *set = set.with(*element);
        }
    }

    Ok(Affinities::new(weak, resist, immune))
}

/// Element override for weapon attacks; the most recent contribution wins.
pub fn weapon_element(world: &World, id: CharacterId) -> Option<Element> {
    contributions(world, id)
        .filter_map(|effect| match effect {
            PassiveEffect::WeaponElement { element } => Some(*element),
            _ => None,
        })
        .last()
}

/// Every effective stat of `id`, for display and export.
pub fn stat_sheet(world: &World, id: CharacterId) -> Result<BTreeMap<StatKind, f64>, CombatError> {
    StatKind::iter()
        .map(|stat| Ok((stat, effective_stat(world, id, stat)?)))
        .collect()
}
