//! CLI tool to send simulated ship traffic to a VTS server.
//!
//! Simulates a fleet of ships steaming east on parallel lanes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use tokio::time;

use vts_cli::sim::{parallel_lanes, Course};
use vts_sdk::TrafficClient;

/// Send simulated ship reports to a VTS server (parallel lanes)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// VTS server URL
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// Number of ships in the fleet
    #[arg(long, default_value_t = 3)]
    ships: usize,

    /// Lane origin x coordinate
    #[arg(long, default_value_t = 500)]
    origin_x: i64,

    /// Lane origin y coordinate
    #[arg(long, default_value_t = 500)]
    origin_y: i64,

    /// Lane spacing in units
    #[arg(long, default_value_t = 10)]
    spacing: i64,

    /// Duration in seconds
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Flush the server before starting
    #[arg(long, default_value_t = false)]
    flush: bool,
}

fn wall_clock_second() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Connecting to VTS server at {}...", args.url);
    let client = TrafficClient::new(&args.url);

    if args.flush {
        client.flush().await?;
        println!("Flushed server state");
    }

    let lanes = parallel_lanes(args.ships, args.origin_x, args.origin_y, args.spacing);

    println!("Starting fleet simulation: {} ships", args.ships);
    println!("  Origin: ({}, {})", args.origin_x, args.origin_y);
    println!("  Spacing: {} units, Duration: {}s", args.spacing, args.duration);
    println!();

    let start = wall_clock_second();
    let mut interval = time::interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        let now = wall_clock_second();
        let elapsed = now - start;
        if elapsed > args.duration as i64 {
            break;
        }

        for (i, lane) in lanes.iter().enumerate() {
            let ship_id = format!("SIM{:03}", i + 1);
            let (x, y) = lane.position(elapsed);

            match client.send_position(&ship_id, now, x, y).await {
                Ok(result) => {
                    println!(
                        "[{elapsed:>3}s] {ship_id} at ({x}, {y}) speed={} status={}",
                        result.speed, result.status
                    );
                }
                Err(e) => {
                    eprintln!("[{elapsed:>3}s] {ship_id} report failed: {e}");
                }
            }
        }
    }

    println!();
    println!("Simulation complete");
    let ships = client.ships().await?;
    for ship in ships {
        println!(
            "  {} last seen t={} status={} speed={}",
            ship.id, ship.last_time, ship.last_status, ship.last_speed
        );
    }

    Ok(())
}
