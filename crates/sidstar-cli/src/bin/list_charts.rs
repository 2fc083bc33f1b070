use anyhow::Result;
use clap::Parser;
use sidstar_cli::TrainerClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "List the SIDs and STARs published for an airport", long_about = None)]
struct Args {
    /// Trainer server URL
    #[arg(long, default_value = "http://localhost:5000")]
    url: String,

    /// ICAO airport identifier
    #[arg(long, default_value = "LLBG")]
    airport: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let client = TrainerClient::new(args.url);

    let charts = client.list_charts(&args.airport)?;
    println!("{} charts for {}", charts.len(), args.airport.to_uppercase());
    for chart in charts {
        println!(
            "  {:<16} {:<4} {:<24} {} fixes",
            chart.id,
            chart.chart_type,
            chart.name,
            chart.fixes.len()
        );
    }

    Ok(())
}
