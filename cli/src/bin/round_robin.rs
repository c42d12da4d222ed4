use arena_engine::api::{round_robin, roster_for};
use arena_engine::content::{parse_roster, Format};
use clap::Parser;
use encoding_rs::Encoding;
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "round-robin")]
#[command(about = "Every combatant in a roster fights every other one once")]
struct Args {
    /// Roster file (JSON or YAML). If omitted, uses the built-in roster.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Built-in roster id
    #[arg(long, default_value = "starter")]
    roster_id: String,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    let args = Args::parse();

    // Files may come from editors that prepend a BOM, so decode them here.
    let roster = match args.roster.as_ref() {
        Some(path) => {
            let text = read_text_auto(path)?;
            parse_roster(&text, Format::from_path(path))?
        }
        None => roster_for(None, Some(&args.roster_id))?,
    };
    let report = round_robin(&roster)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("round-robin results");
    println!("-------------------");
    println!("combatants:         {}", roster.len());
    println!("battles:            {}", report.battles);
    println!();
    println!("{:<4} {:<20} {:>4} {:>6} {:>7}", "#", "name", "wins", "losses", "rounds");
    for (rank, s) in report.standings.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>4} {:>6} {:>7}",
            rank + 1,
            s.name,
            s.wins,
            s.losses,
            s.rounds_fought
        );
    }

    Ok(())
}
