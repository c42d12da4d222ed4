use std::{path::PathBuf, thread, time::Duration};

use anyhow::Context;
use arena_engine::api::{simulate_battle, BattleConfig};
use arena_engine::content::{builtin_roster, load_playback_config, load_roster};
use arena_engine::{
    BattleOutcome, Clock, CombatantId, Phase, PlaybackConfig, PlaybackEvent, Sequencer, SystemClock,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Args)]
struct Matchup {
    /// First combatant (id or name)
    a: String,
    /// Second combatant (id or name)
    b: String,
    /// Roster file (JSON or YAML); overrides --roster-id
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Built-in roster id
    #[arg(long, default_value = "starter")]
    roster_id: String,
}

impl Matchup {
    fn config(&self) -> BattleConfig {
        BattleConfig {
            roster_path: self
                .roster
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            roster_id: Some(self.roster_id.clone()),
            first: self.a.clone(),
            second: self.b.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Resolve a battle and print the round log
    Battle {
        #[command(flatten)]
        matchup: Matchup,
        /// Print the full report as JSON instead of the log
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a battle in real time
    Play {
        #[command(flatten)]
        matchup: Matchup,
        /// Playback cadence file (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Skip to the result after this many milliseconds
        #[arg(long)]
        skip_after: Option<u64>,
    },
    /// Serialize a built-in roster to JSON (stdout)
    RosterDump {
        #[arg(long, default_value = "starter")]
        id: String,
        /// Single-line JSON instead of pretty-printed
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Validate a roster file and list its combatants
    RosterCheck {
        file: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "arena-cli")]
#[command(about = "Monster arena battle harness")]
struct Cli {
    /// Debug-level logging on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Battle { matchup, json } => {
            let report = simulate_battle(matchup.config())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.log {
                    println!("{}", line);
                }
            }
        }
        Cmd::Play {
            matchup,
            config,
            skip_after,
        } => {
            let cadence = match config {
                Some(path) => load_playback_config(path)?,
                None => PlaybackConfig::default(),
            };
            let report = simulate_battle(matchup.config())?;
            if let Some(start) = report.log.first() {
                println!("{}", start);
            }
            play(report.outcome, cadence, skip_after.map(Duration::from_millis))?;
        }
        Cmd::RosterDump { id, compact } => {
            let roster = builtin_roster(&id)?;
            let doc = serde_json::json!({ "monsters": roster.iter().collect::<Vec<_>>() });
            if compact {
                println!("{}", serde_json::to_string(&doc)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
        }
        Cmd::RosterCheck { file } => {
            let roster = load_roster(&file)?;
            println!("{}: {} combatants OK", file.display(), roster.len());
            for c in roster.iter() {
                println!(
                    "  {:<18} {:<20} ATK {:>2} DEF {:>2} SPD {:>2} HP {:>3}",
                    c.id.as_str(),
                    c.name,
                    c.attack,
                    c.defense,
                    c.speed,
                    c.max_hp
                );
            }
        }
    }
    Ok(())
}

fn play(
    outcome: BattleOutcome,
    cadence: PlaybackConfig,
    skip_after: Option<Duration>,
) -> anyhow::Result<()> {
    let mut seq = Sequencer::new(SystemClock::new(), cadence)?;
    seq.load(outcome);
    seq.start().context("failed to start playback")?;

    loop {
        for event in seq.poll() {
            print_event(&seq, event);
        }
        let playing = seq.state().phase == Phase::Playing;
        if !playing && seq.pending_timers() == 0 {
            break;
        }

        let now = seq.clock().now();
        if let Some(at) = skip_after.filter(|_| playing) {
            if now >= at {
                seq.skip()?;
                println!("[SKIP] jumping to round {}", seq.state().current_round_index);
                continue;
            }
        }

        let mut wait = seq.clock().until_next().unwrap_or_default();
        if let Some(at) = skip_after.filter(|_| playing) {
            wait = wait.min(at.saturating_sub(now));
        }
        thread::sleep(wait);
    }
    Ok(())
}

fn print_event(seq: &Sequencer<SystemClock>, event: PlaybackEvent) {
    let Some(outcome) = seq.outcome() else {
        return;
    };
    let name = |id: &CombatantId| outcome.combatant(id).map_or("?", |c| c.name.as_str());
    match event {
        PlaybackEvent::RoundAdvanced { index } => {
            if let Some(round) = outcome.rounds.get(index.saturating_sub(1)) {
                println!(
                    "[ROUND] {} {} → {} -{} HP ({} left)",
                    index,
                    name(&round.attacker_id),
                    name(&round.defender_id),
                    round.damage,
                    round.defender_remaining_hp
                );
            }
        }
        PlaybackEvent::Revealed => {
            if let Some(reveal) = seq.reveal() {
                println!(
                    "[RESULT] {} defeats {} after {} rounds",
                    reveal.winner.name,
                    reveal.loser.name,
                    reveal.rounds.len()
                );
            }
        }
        PlaybackEvent::Victory => println!("[VICTORY] {} wins the battle!", outcome.winner.name),
    }
}
