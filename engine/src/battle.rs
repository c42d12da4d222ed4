use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combatant::{Combatant, CombatantId, Side};
use crate::error::BattleError;

/// One resolved attack. Health values are taken right after the hit, clamped at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Round {
    pub attacker: Side,
    pub attacker_id: CombatantId,
    pub defender_id: CombatantId,
    pub damage: i32,
    pub attacker_remaining_hp: i32,
    pub defender_remaining_hp: i32,
    /// Reserved; the engine has no probability model and never sets it.
    #[serde(default)]
    pub is_critical: bool,
    /// Reserved; see `is_critical`.
    #[serde(default)]
    pub is_dodge: bool,
}

impl Round {
    /// Health of `id` after this round, if it took part.
    pub fn remaining_hp_of(&self, id: &CombatantId) -> Option<i32> {
        if &self.attacker_id == id {
            Some(self.attacker_remaining_hp)
        } else if &self.defender_id == id {
            Some(self.defender_remaining_hp)
        } else {
            None
        }
    }
}

/// The complete, immutable result of one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleOutcome {
    pub rounds: Vec<Round>,
    pub winner: Combatant,
    pub loser: Combatant,
}

impl BattleOutcome {
    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        [&self.winner, &self.loser]
            .into_iter()
            .find(|c| &c.id == id)
    }

    /// Id of the combatant that attacked in round 1. `None` only for an
    /// outcome with no rounds, which `resolve` never produces.
    pub fn opener(&self) -> Option<&CombatantId> {
        self.rounds.first().map(|r| &r.attacker_id)
    }

    /// Health of `id` once `rounds_played` rounds have been shown.
    ///
    /// Derived from the round log; the combatant snapshots keep their `max_hp`.
    pub fn health_after(&self, id: &CombatantId, rounds_played: usize) -> Option<i32> {
        let combatant = self.combatant(id)?;
        match rounds_played.min(self.rounds.len()).checked_sub(1) {
            Some(last) => self.rounds[last].remaining_hp_of(id),
            None => Some(combatant.max_hp),
        }
    }

    pub fn final_health(&self, id: &CombatantId) -> Option<i32> {
        self.health_after(id, self.rounds.len())
    }
}

/// Side that attacks in round 1: higher speed, then higher attack, then `a`.
pub fn opening_side(a: &Combatant, b: &Combatant) -> Side {
    if b.speed > a.speed || (b.speed == a.speed && b.attack > a.attack) {
        Side::B
    } else {
        Side::A
    }
}

/// Damage is never below 1, which bounds every battle.
pub fn round_damage(attacker: &Combatant, defender: &Combatant) -> i32 {
    (attacker.attack - defender.defense).max(1)
}

fn validate(c: &Combatant) -> Result<(), BattleError> {
    c.validate().map_err(|reason| BattleError::InvalidCombatant {
        id: c.id.clone(),
        reason,
    })
}

/// Resolve a full battle between `a` and `b`.
///
/// Roles alternate every round starting with [`opening_side`]. Only the
/// defender's health changes in a round, so the defender of the round that
/// takes it to `<= 0` is the loser.
pub fn resolve(a: &Combatant, b: &Combatant) -> Result<BattleOutcome, BattleError> {
    validate(a)?;
    validate(b)?;
    if a.id == b.id {
        return Err(BattleError::SelfMatch(a.id.clone()));
    }

    let mut hp = [a.max_hp, b.max_hp];
    let mut rounds = Vec::new();
    let mut attacker = opening_side(a, b);

    let loser = loop {
        let defender = attacker.opponent();
        let (atk, def) = (attacker.pick(a, b), defender.pick(a, b));
        let damage = round_damage(atk, def);
        hp[defender.index()] -= damage;

        rounds.push(Round {
            attacker,
            attacker_id: atk.id.clone(),
            defender_id: def.id.clone(),
            damage,
            attacker_remaining_hp: hp[attacker.index()].max(0),
            defender_remaining_hp: hp[defender.index()].max(0),
            is_critical: false,
            is_dodge: false,
        });

        if hp[defender.index()] <= 0 {
            break defender;
        }
        attacker = defender;
    };

    let winner = loser.opponent().pick(a, b).clone();
    let loser = loser.pick(a, b).clone();
    debug!(
        rounds = rounds.len(),
        winner = %winner.id,
        loser = %loser.id,
        "battle resolved"
    );

    Ok(BattleOutcome {
        rounds,
        winner,
        loser,
    })
}
