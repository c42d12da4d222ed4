use indexmap::IndexMap;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combatant::{Combatant, CombatantId};
use crate::error::RosterError;

pub const NAME_MAX_CHARS: usize = 20;
pub const STAT_RANGE: (i32, i32) = (1, 99);
pub const HP_RANGE: (i32, i32) = (1, 999);

/// Form input for a combatant that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewCombatant {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    #[serde(alias = "hp")]
    pub max_hp: i32,
}

impl Default for NewCombatant {
    fn default() -> Self {
        Self {
            name: String::new(),
            attack: 5,
            defense: 2,
            speed: 4,
            max_hp: 20,
        }
    }
}

fn check_range(field: &'static str, value: i32, (min, max): (i32, i32)) -> Result<(), RosterError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RosterError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Form limits; stricter than the engine's own invariants.
pub fn validate_entry(
    name: &str,
    attack: i32,
    defense: i32,
    speed: i32,
    max_hp: i32,
) -> Result<(), RosterError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::EmptyName);
    }
    let len = name.chars().count();
    if len > NAME_MAX_CHARS {
        return Err(RosterError::NameTooLong {
            len,
            max: NAME_MAX_CHARS,
        });
    }
    check_range("attack", attack, STAT_RANGE)?;
    check_range("defense", defense, STAT_RANGE)?;
    check_range("speed", speed, STAT_RANGE)?;
    check_range("max_hp", max_hp, HP_RANGE)
}

/// Ordered store of combatants plus a selection of at most two of them.
#[derive(Debug)]
pub struct Roster {
    combatants: IndexMap<CombatantId, Combatant>,
    selected: Vec<CombatantId>,
    ids: ChaCha8Rng,
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids handed out by `add` are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            combatants: IndexMap::new(),
            selected: Vec::new(),
            ids: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_combatants(
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for c in combatants {
            roster.insert(c)?;
        }
        Ok(roster)
    }

    fn fresh_id(&mut self) -> CombatantId {
        loop {
            let id = CombatantId::new(format!("{:016x}", self.ids.next_u64()));
            if !self.combatants.contains_key(&id) {
                return id;
            }
        }
    }

    /// Validate a form entry and store it under a newly generated id.
    pub fn add(&mut self, entry: NewCombatant) -> Result<&Combatant, RosterError> {
        validate_entry(
            &entry.name,
            entry.attack,
            entry.defense,
            entry.speed,
            entry.max_hp,
        )?;
        let id = self.fresh_id();
        let combatant = Combatant {
            id: id.clone(),
            name: entry.name.trim().to_string(),
            attack: entry.attack,
            defense: entry.defense,
            speed: entry.speed,
            max_hp: entry.max_hp,
        };
        debug!(%id, name = %combatant.name, "combatant added");
        Ok(self.combatants.entry(id).or_insert(combatant))
    }

    /// Store a combatant that already carries an id (e.g. loaded from a file).
    pub fn insert(&mut self, combatant: Combatant) -> Result<(), RosterError> {
        validate_entry(
            &combatant.name,
            combatant.attack,
            combatant.defense,
            combatant.speed,
            combatant.max_hp,
        )?;
        if self.combatants.contains_key(&combatant.id) {
            return Err(RosterError::DuplicateId(combatant.id));
        }
        debug!(id = %combatant.id, name = %combatant.name, "combatant inserted");
        self.combatants.insert(combatant.id.clone(), combatant);
        Ok(())
    }

    pub fn get(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    /// Look up by exact id, falling back to a case-insensitive name match.
    pub fn find(&self, key: &str) -> Result<&Combatant, RosterError> {
        let key = key.trim();
        self.combatants
            .get(&CombatantId::from(key))
            .or_else(|| {
                self.combatants
                    .values()
                    .find(|c| c.name.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| RosterError::UnknownCombatant(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn selected(&self) -> &[CombatantId] {
        &self.selected
    }

    pub fn select(&mut self, id: &CombatantId) -> Result<(), RosterError> {
        if !self.combatants.contains_key(id) {
            return Err(RosterError::UnknownCombatant(id.to_string()));
        }
        if self.selected.contains(id) {
            return Ok(());
        }
        if self.selected.len() >= 2 {
            return Err(RosterError::SelectionFull);
        }
        self.selected.push(id.clone());
        debug!(%id, selected = self.selected.len(), "combatant selected");
        Ok(())
    }

    pub fn unselect(&mut self, id: &CombatantId) {
        let before = self.selected.len();
        self.selected.retain(|s| s != id);
        if self.selected.len() != before {
            debug!(%id, selected = self.selected.len(), "combatant unselected");
        }
    }

    /// Select `id`, or unselect it if it already is.
    pub fn toggle(&mut self, id: &CombatantId) -> Result<(), RosterError> {
        if self.selected.contains(id) {
            self.unselect(id);
            Ok(())
        } else {
            self.select(id)
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected.clear();
    }

    /// Drop every combatant and the selection. The id sequence keeps going.
    pub fn reset_all(&mut self) {
        debug!(removed = self.combatants.len(), "roster cleared");
        self.combatants.clear();
        self.selected.clear();
    }

    /// The two selected combatants, in the order they were picked.
    pub fn selected_pair(&self) -> Result<(&Combatant, &Combatant), RosterError> {
        match self.selected.as_slice() {
            [a, b] => {
                let a = self
                    .get(a)
                    .ok_or_else(|| RosterError::UnknownCombatant(a.to_string()))?;
                let b = self
                    .get(b)
                    .ok_or_else(|| RosterError::UnknownCombatant(b.to_string()))?;
                Ok((a, b))
            }
            other => Err(RosterError::IncompleteSelection(other.len())),
        }
    }
}
