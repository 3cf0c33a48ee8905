use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use grid_router::routing::{CostRegime, Coordinate, ParseOptions, RoutePlanner, DEFAULT_HOUR};

#[derive(Parser)]
#[command(name = "grid_router")]
#[command(about = "Least-cost routing over a one-way city grid")]
struct Cli {
    /// Grid file: one row per line, cells separated by the delimiter
    #[arg(long, default_value = "data/city.csv")]
    map: PathBuf,

    /// Start cell as "column,row"
    #[arg(long)]
    from: Option<Coordinate>,

    /// Target cell as "column,row"
    #[arg(long)]
    to: Option<Coordinate>,

    /// Departure hour of day, selects peak or off-peak costs
    #[arg(long, default_value_t = DEFAULT_HOUR, value_parser = clap::value_parser!(u8).range(0..=23))]
    hour: u8,

    /// Force peak-hour costs regardless of --hour
    #[arg(long, conflicts_with = "off_peak")]
    peak: bool,

    /// Force off-peak costs regardless of --hour
    #[arg(long)]
    off_peak: bool,

    /// Cell separator used by the grid file
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    /// Reject unrecognized cell tokens instead of treating them as dead cells
    #[arg(long)]
    strict: bool,

    /// Draw the grid with the route overlaid
    #[arg(long)]
    draw: bool,

    /// Print interpolated vehicle positions, this many per cell
    #[arg(long)]
    steps: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,grid_router=info"),
    )
    .init();

    let cli = Cli::parse();

    let options = ParseOptions {
        delimiter: cli.delimiter,
        strict_tokens: cli.strict,
    };
    let planner = RoutePlanner::from_file(&cli.map, &options, cli.hour)
        .with_context(|| format!("Failed to load grid from {}", cli.map.display()))?;
    info!("Loaded grid from {}", cli.map.display());

    if cli.peak {
        planner.set_regime(CostRegime::Peak);
    } else if cli.off_peak {
        planner.set_regime(CostRegime::OffPeak);
    }

    planner.print_summary();
    println!();

    let (Some(from), Some(to)) = (cli.from, cli.to) else {
        if cli.draw {
            planner.draw_map(None);
        }
        return Ok(());
    };

    let Some(route) = planner.find_route(from, to) else {
        println!("No route from {} to {}", from, to);
        if cli.draw {
            planner.draw_map(None);
        }
        std::process::exit(2);
    };

    println!("Route: {}", route.ids().join(" -> "));
    println!("Cells: {}", route.len());
    println!("Cost: {}", route.cost);

    if cli.draw {
        println!();
        planner.draw_map(Some(&route));
    }

    if let Some(steps) = cli.steps {
        println!();
        println!("--- Vehicle positions ---");
        for (tick, position) in route.positions(steps).enumerate() {
            println!("  {:>4}: ({:.2}, {:.2})", tick, position.x, position.y);
        }
    }

    Ok(())
}
