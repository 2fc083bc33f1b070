use anyhow::Result;
use clap::Parser;
use sidstar_cli::{load_waypoints, TrainerClient};
use sidstar_core::PracticeMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score a waypoint file against a chart", long_about = None)]
struct Args {
    /// Trainer server URL
    #[arg(long, default_value = "http://localhost:5000")]
    url: String,

    /// Chart id, e.g. LLBG-SUVAS1
    #[arg(long)]
    map_id: String,

    /// JSON file holding an array of waypoints
    #[arg(long)]
    waypoints: PathBuf,

    /// Practice mode (FULL, NO_ALT, NO_FIX, CLEAN); omit for name matching
    #[arg(long)]
    mode: Option<PracticeMode>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let client = TrainerClient::new(args.url);
    let waypoints = load_waypoints(&args.waypoints)?;

    println!("Submitting {} waypoints for {}...", waypoints.len(), args.map_id);
    let result = client.submit_route(&args.map_id, &waypoints, args.mode)?;

    println!("Score: {}%  {}", result.score, result.message);
    if let Some(label) = &result.scoring_mode {
        println!("Scoring: {}", label);
    }
    if let Some(accuracy) = result.fix_accuracy {
        println!("Fix names: {}%", accuracy);
    }
    if let Some(accuracy) = result.alt_accuracy {
        println!("Altitudes: {}%", accuracy);
    }
    println!("Correct fixes: {}/{}", result.correct_fixes, result.total_fixes);

    if !result.missed_fixes.is_empty() {
        println!("Missed/Wrong:");
        for fix in &result.missed_fixes {
            println!("  - {}", fix);
        }
    }
    if !result.altitude_errors.is_empty() {
        println!("Altitude errors:");
        for error in &result.altitude_errors {
            println!("  - {}", error);
        }
    }

    Ok(())
}
