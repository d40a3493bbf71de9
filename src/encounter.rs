use crate::constants::DICE_SIDES;
use crate::locations::{Location, Map};
use crate::monsters::{Monster, MonsterInstance};
use rand::Rng;

/// Outcome of a d6 pool check (stealth, escape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub rolls: Vec<u32>,
    pub total: u32,
    pub target: u32,
    pub success: bool,
}

/// Rolls one base d6 plus `floor(bonus_dice)` extra d6; success when the
/// total meets the target number.
pub fn roll_dice(bonus_dice: f64, target: u32, rng: &mut impl Rng) -> DiceRoll {
    let extra = bonus_dice.max(0.0).floor() as u32;
    let mut rolls = Vec::with_capacity(1 + extra as usize);
    for _ in 0..=extra {
        rolls.push(rng.gen_range(1..=DICE_SIDES));
    }
    let total = rolls.iter().sum();
    DiceRoll {
        rolls,
        total,
        target,
        success: total >= target,
    }
}

/// Instantiates a monster for an encounter: a uniformly random id from the
/// location's range, scaled by the map multiplier. An id missing from the
/// catalog falls back to the first catalog entry; only an empty catalog
/// yields nothing.
pub fn generate_encounter(
    location: &Location,
    map: &Map,
    monsters: &[Monster],
    rng: &mut impl Rng,
) -> Option<MonsterInstance> {
    let (min_id, max_id) = location.monster_range;
    let monster_id = rng.gen_range(min_id..=max_id);
    let template = monsters
        .iter()
        .find(|m| m.id == monster_id)
        .or_else(|| monsters.first())?;
    Some(MonsterInstance::from_template(template, map.multiplier))
}
