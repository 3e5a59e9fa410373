//! Headless session runner (default binary).
//!
//! Drives a session for a fixed number of ticks from a scripted intent
//! sequence, then prints the final render snapshot as JSON. Useful for
//! replaying seeds, checking rule configs, and producing save files.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use block_shock::core::{GameSession, RuleConfig};
use block_shock::types::Intent;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Bag seed. The same seed and script always replay the same session.
    #[arg(short, long, default_value_t = 1)]
    seed: u32,

    /// Ticks to run after the script is exhausted
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Intents, one tick per comma-separated entry. Join several intents for
    /// the same tick with `+`; `wait` is an empty tick.
    /// Example: `--script "moveLeft+rotateCw,wait,hardDrop"`.
    #[arg(long, default_value = "")]
    script: String,

    /// Rule config (JSON). Missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resume from a saved session instead of starting fresh
    #[arg(short, long)]
    resume: Option<PathBuf>,

    /// Write the session snapshot here when done
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Parse the script into per-tick intent groups
fn parse_script(script: &str) -> Result<Vec<Vec<Intent>>> {
    let mut steps = Vec::new();
    for (index, entry) in script.split(',').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() && script.trim().is_empty() {
            break;
        }

        let mut intents = Vec::new();
        for token in entry.split('+').map(str::trim) {
            if token.is_empty() || token.eq_ignore_ascii_case("wait") {
                continue;
            }
            match Intent::from_str(token) {
                Some(intent) => intents.push(intent),
                None => bail!("unknown intent `{token}` in script step {}", index + 1),
            }
        }
        steps.push(intents);
    }
    Ok(steps)
}

fn load_config(path: Option<&PathBuf>) -> Result<RuleConfig> {
    let Some(path) = path else {
        return Ok(RuleConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    RuleConfig::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let steps = parse_script(&args.script)?;

    let mut session = match &args.resume {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading save {}", path.display()))?;
            GameSession::resume_or_new(&text, config, args.seed)
        }
        None => GameSession::new(config, args.seed).context("invalid rules")?,
    };
    session.start();

    let total = steps.len() as u64 + args.ticks;
    info!("running {total} ticks (seed {})", session.seed());

    for intents in &steps {
        for &intent in intents {
            session.queue(intent);
        }
        let events = session.tick();
        if !events.is_empty() {
            debug!("tick {}: {:?}", session.tick_count(), session.events());
        }
    }
    for _ in 0..args.ticks {
        session.tick();
        if session.is_game_over() {
            break;
        }
    }

    let snapshot = session.render_snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(path) = &args.save {
        let json = session.save().to_json()?;
        fs::write(path, json).with_context(|| format!("writing save {}", path.display()))?;
        info!("saved session to {}", path.display());
    }

    Ok(())
}
