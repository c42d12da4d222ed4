use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, de::DeserializeOwned};

use crate::combatant::Combatant;
use crate::playback::PlaybackConfig;
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.yaml`/`.yml` files are YAML, everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RosterFile {
    monsters: Vec<Combatant>,
}

pub fn builtin_rosters() -> HashMap<&'static str, (Format, &'static str)> {
    HashMap::from([
        (
            "starter",
            (Format::Json, include_str!("../content/rosters/starter.json")),
        ),
        (
            "twins",
            (Format::Yaml, include_str!("../content/rosters/twins.yaml")),
        ),
    ])
}

pub fn parse_document<T: DeserializeOwned>(text: &str, format: Format) -> Result<T> {
    let value = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(value)
}

pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&text, Format::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse a `monsters:` document and validate every entry against the form limits.
pub fn parse_roster(text: &str, format: Format) -> Result<Roster> {
    let file: RosterFile = parse_document(text, format)?;
    Ok(Roster::from_combatants(file.monsters)?)
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let file: RosterFile = load_document(path)?;
    Roster::from_combatants(file.monsters)
        .with_context(|| format!("invalid roster {}", path.display()))
}

pub fn builtin_roster(id: &str) -> Result<Roster> {
    let rosters = builtin_rosters();
    let (format, text) = rosters
        .get(id)
        .ok_or_else(|| anyhow!("unknown built-in roster '{}'", id))?;
    parse_roster(text, *format).with_context(|| format!("built-in roster '{}'", id))
}

pub fn load_playback_config(path: impl AsRef<Path>) -> Result<PlaybackConfig> {
    let path = path.as_ref();
    let cfg: PlaybackConfig = load_document(path)?;
    cfg.validate()
        .with_context(|| format!("invalid playback config {}", path.display()))?;
    Ok(cfg)
}
