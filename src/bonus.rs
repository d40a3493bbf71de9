use serde::{Deserialize, Serialize};

/// Every way a race, class, saga or piece of gear can modify a hero.
///
/// Percentage kinds add linearly with other sources of the same kind;
/// probability kinds feed the per-hit combat rolls; dice kinds grow the
/// d6 pool used for stealth and escape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    HealthMult,
    DamageMult,
    ArmorMult,
    GoldMult,
    HealthRegenMult,
    CritChance,
    ArmorPenetration,
    Vampirism,
    EscapeDice,
    StealthDice,
    LuckDice,
    SurvivalDice,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub value: f64,
}

impl Bonus {
    pub const fn new(kind: BonusKind, value: f64) -> Self {
        Self { kind, value }
    }
}

/// Racial bonus lookup. Unknown keys (e.g. from a stale save) resolve to
/// no bonus rather than an error.
pub fn race_bonus(race: &str) -> Option<Bonus> {
    use BonusKind::*;
    match race {
        "elf" => Some(Bonus::new(EscapeDice, 1.0)),
        "dwarf" => Some(Bonus::new(HealthMult, 0.3)),
        "halfling" => Some(Bonus::new(StealthDice, 1.0)),
        "fairy" => Some(Bonus::new(LuckDice, 1.0)),
        "laitar" => Some(Bonus::new(SurvivalDice, 1.0)),
        "ork" => Some(Bonus::new(DamageMult, 0.2)),
        "human" => Some(Bonus::new(GoldMult, 0.3)),
        "dragon" => Some(Bonus::new(ArmorMult, 0.15)),
        _ => None,
    }
}

/// Class bonus lookup, same fallback rule as [`race_bonus`].
pub fn class_bonus(class: &str) -> Option<Bonus> {
    use BonusKind::*;
    match class {
        "archer" => Some(Bonus::new(DamageMult, 0.2)),
        "warrior" => Some(Bonus::new(DamageMult, 0.2)),
        "thief" => Some(Bonus::new(StealthDice, 1.0)),
        "merchant" => Some(Bonus::new(GoldMult, 0.3)),
        "fighter" => Some(Bonus::new(LuckDice, 1.0)),
        "healer" => Some(Bonus::new(HealthMult, 0.3)),
        "sorcerer" => Some(Bonus::new(EscapeDice, 1.0)),
        "death_mage" => Some(Bonus::new(StealthDice, 1.0)),
        "hunter" => Some(Bonus::new(SurvivalDice, 1.0)),
        "bounty_hunter" => Some(Bonus::new(DamageMult, 0.1)),
        "gladiator" => Some(Bonus::new(DamageMult, 0.2)),
        "blacksmith" => Some(Bonus::new(ArmorMult, 0.15)),
        "antiquarian" => Some(Bonus::new(GoldMult, 0.3)),
        _ => None,
    }
}

/// Saga (backstory feat) bonus lookup, same fallback rule as [`race_bonus`].
pub fn saga_bonus(saga: &str) -> Option<Bonus> {
    use BonusKind::*;
    match saga {
        "golden_egg" => Some(Bonus::new(HealthMult, 0.3)),
        "vulkanor" => Some(Bonus::new(DamageMult, 0.2)),
        "well" => Some(Bonus::new(GoldMult, 0.3)),
        "pets" => Some(Bonus::new(LuckDice, 1.0)),
        "following_sun" => Some(Bonus::new(SurvivalDice, 1.0)),
        "vampire_crown" => Some(Bonus::new(StealthDice, 1.0)),
        "tiger_eye" => Some(Bonus::new(ArmorMult, 0.15)),
        "sky_phenomena" => Some(Bonus::new(EscapeDice, 1.0)),
        _ => None,
    }
}

/// Accumulated bonus contributions from all five sources
/// (race, class, saga, weapon, armor).
///
/// Same-kind percentages add: two +20% damage sources total +40%, they are
/// never compounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BonusTotals {
    pub health_mult: f64,
    pub damage_mult: f64,
    pub armor_mult: f64,
    pub gold_mult: f64,
    pub health_regen_mult: f64,
    pub crit_chance: f64,
    pub armor_penetration: f64,
    pub vampirism: f64,
    pub escape_dice: f64,
    pub stealth_dice: f64,
    pub luck_dice: f64,
    pub survival_dice: f64,
}

impl BonusTotals {
    pub fn add(&mut self, bonus: Bonus) {
        use BonusKind::*;
        match bonus.kind {
            HealthMult => self.health_mult += bonus.value,
            DamageMult => self.damage_mult += bonus.value,
            ArmorMult => self.armor_mult += bonus.value,
            GoldMult => self.gold_mult += bonus.value,
            HealthRegenMult => self.health_regen_mult += bonus.value,
            CritChance => self.crit_chance += bonus.value,
            ArmorPenetration => self.armor_penetration += bonus.value,
            Vampirism => self.vampirism += bonus.value,
            EscapeDice => self.escape_dice += bonus.value,
            StealthDice => self.stealth_dice += bonus.value,
            LuckDice => self.luck_dice += bonus.value,
            SurvivalDice => self.survival_dice += bonus.value,
        }
    }

    pub fn collect<I: IntoIterator<Item = Option<Bonus>>>(sources: I) -> Self {
        let mut totals = Self::default();
        for bonus in sources.into_iter().flatten() {
            totals.add(bonus);
        }
        totals
    }
}
