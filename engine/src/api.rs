use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleOutcome, opening_side, resolve};
use crate::combatant::{Combatant, CombatantId};
use crate::content::{builtin_roster, load_roster};
use crate::roster::Roster;

const DEFAULT_ROSTER: &str = "starter";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleConfig {
    #[serde(default)]
    pub roster_path: Option<String>,
    #[serde(default)]
    pub roster_id: Option<String>,
    /// Id or name of the first-given combatant.
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleReport {
    pub winner: String,
    pub loser: String,
    pub rounds: usize,
    pub winner_hp_end: i32,
    pub log: Vec<String>,
    pub outcome: BattleOutcome,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoundRobinConfig {
    #[serde(default)]
    pub roster_path: Option<String>,
    #[serde(default)]
    pub roster_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Standing {
    pub id: CombatantId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub rounds_fought: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoundRobinReport {
    pub battles: u32,
    pub standings: Vec<Standing>,
}

/// A roster file wins over a built-in id; with neither, the starter roster is used.
pub fn roster_for(path: Option<&str>, id: Option<&str>) -> Result<Roster> {
    match (path, id) {
        (Some(path), _) => load_roster(path),
        (None, Some(id)) => builtin_roster(id),
        (None, None) => builtin_roster(DEFAULT_ROSTER),
    }
}

pub fn simulate_battle(cfg: BattleConfig) -> Result<BattleReport> {
    let roster = roster_for(cfg.roster_path.as_deref(), cfg.roster_id.as_deref())?;
    let a = roster.find(&cfg.first)?;
    let b = roster.find(&cfg.second)?;

    let outcome = resolve(a, b).with_context(|| format!("{} vs {}", a.name, b.name))?;
    let log = battle_log(&outcome, a, b);
    let winner_hp_end = outcome.final_health(&outcome.winner.id).unwrap_or_default();

    Ok(BattleReport {
        winner: outcome.winner.name.clone(),
        loser: outcome.loser.name.clone(),
        rounds: outcome.rounds.len(),
        winner_hp_end,
        log,
        outcome,
    })
}

fn describe(c: &Combatant) -> String {
    format!(
        "{} (ATK {}, DEF {}, SPD {}, HP {})",
        c.name, c.attack, c.defense, c.speed, c.max_hp
    )
}

/// Bracket-tagged, human-readable account of a resolved battle.
pub fn battle_log(outcome: &BattleOutcome, a: &Combatant, b: &Combatant) -> Vec<String> {
    let name_of = |id: &CombatantId| {
        outcome
            .combatant(id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    };

    let mut logs = Vec::with_capacity(outcome.rounds.len() + 3);
    logs.push(format!("[START] {} vs {}", describe(a), describe(b)));
    logs.push(format!(
        "[INIT] {} strikes first",
        opening_side(a, b).pick(a, b).name
    ));
    for (i, round) in outcome.rounds.iter().enumerate() {
        let attacker = name_of(&round.attacker_id);
        let defender = name_of(&round.defender_id);
        logs.push(format!(
            "[ROUND] {} {} → {} dmg={} | {} hp={} {} hp={}",
            i + 1,
            attacker,
            defender,
            round.damage,
            attacker,
            round.attacker_remaining_hp,
            defender,
            round.defender_remaining_hp
        ));
    }
    logs.push(format!(
        "[END] winner={} loser={} rounds={}",
        outcome.winner.name,
        outcome.loser.name,
        outcome.rounds.len()
    ));
    logs
}

/// Every unordered pair fights once; roster order decides which side is `a`.
pub fn round_robin(roster: &Roster) -> Result<RoundRobinReport> {
    let combatants: Vec<&Combatant> = roster.iter().collect();
    let mut table: IndexMap<CombatantId, Standing> = combatants
        .iter()
        .map(|c| {
            (
                c.id.clone(),
                Standing {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    wins: 0,
                    losses: 0,
                    rounds_fought: 0,
                },
            )
        })
        .collect();

    let mut battles = 0u32;
    for (i, a) in combatants.iter().enumerate() {
        for b in &combatants[i + 1..] {
            let outcome = resolve(a, b).with_context(|| format!("{} vs {}", a.name, b.name))?;
            let rounds = outcome.rounds.len() as u32;
            if let Some(s) = table.get_mut(&outcome.winner.id) {
                s.wins += 1;
                s.rounds_fought += rounds;
            }
            if let Some(s) = table.get_mut(&outcome.loser.id) {
                s.losses += 1;
                s.rounds_fought += rounds;
            }
            battles += 1;
        }
    }

    let mut standings: Vec<Standing> = table.into_values().collect();
    standings.sort_by(|x, y| y.wins.cmp(&x.wins));
    Ok(RoundRobinReport { battles, standings })
}

pub fn simulate_round_robin(cfg: RoundRobinConfig) -> Result<RoundRobinReport> {
    let roster = roster_for(cfg.roster_path.as_deref(), cfg.roster_id.as_deref())?;
    round_robin(&roster)
}
