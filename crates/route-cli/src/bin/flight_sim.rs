//! Flight route simulator.
//!
//! Flies a simulated aircraft along one of the built-in San Francisco to
//! Los Angeles routes and checks routes against a circular no-fly zone.
//!
//! Usage:
//!   cargo run -p route-cli --bin flight-sim -- routes
//!   cargo run -p route-cli --bin flight-sim -- --segment-ms 2000 fly --route eastern_route
//!   cargo run -p route-cli --bin flight-sim -- avoid --lon -121.8947 --lat 36.6002 --radius 50000

use anyhow::Result;
use clap::{Parser, Subcommand};
use route_cli::{fly_until_done, Config, SwitchPlan, TracingPresenter};
use route_core::{
    palette_color, project_lon_lat, NoFlyZone, PresentationAdapter, RouteCatalog, RouteSelector,
    ROUTE_PALETTE,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Animate a simulated flight along predefined routes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Interpolation steps per segment (overrides FLIGHT_STEPS_PER_SEGMENT)
    #[arg(long, global = true)]
    steps: Option<u32>,

    /// Segment time budget in milliseconds (overrides FLIGHT_SEGMENT_DURATION_MS)
    #[arg(long, global = true)]
    segment_ms: Option<u64>,

    /// Recenter the view every N steps (overrides FLIGHT_RECENTER_EVERY)
    #[arg(long, global = true)]
    recenter_every: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the route catalog
    Routes {
        /// Print routes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fly a route to the end
    Fly {
        /// Route to fly (default: first catalog route)
        #[arg(long)]
        route: Option<String>,

        /// Route to switch to mid-flight
        #[arg(long, requires = "switch_after")]
        switch_to: Option<String>,

        /// Steps to fly before switching
        #[arg(long, requires = "switch_to")]
        switch_after: Option<u64>,
    },
    /// Check routes against a no-fly zone and pick the first clear one
    Avoid {
        /// Zone center longitude (degrees)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Zone center latitude (degrees)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Zone radius in projected meters
        #[arg(long, default_value_t = 50_000.0)]
        radius: f64,

        /// Fly the selected route after choosing it
        #[arg(long)]
        fly: bool,

        /// Print the feasibility report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overlay every route with its palette color
    ShowAll,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("route_cli=info".parse()?)
                .add_directive("route_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config =
        Config::from_env().with_overrides(args.steps, args.segment_ms, args.recenter_every);
    let animator_config = config.animator_config();
    animator_config.validate()?;

    let presenter = Arc::new(TracingPresenter::new());
    let sink: Arc<dyn PresentationAdapter> = presenter.clone();
    let catalog = Arc::new(RouteCatalog::builtin());
    let mut selector = RouteSelector::new(catalog, animator_config, sink)?;

    match args.command {
        Command::Routes { json } => {
            if json {
                let routes = selector.catalog().list_routes();
                println!("{}", serde_json::to_string_pretty(routes)?);
                return Ok(());
            }
            for (index, route) in selector.catalog().list_routes().iter().enumerate() {
                println!(
                    "{:<22} {:<22} {:>2} waypoints  {:<7} {}",
                    route.id,
                    route.display_name(),
                    route.waypoints.len(),
                    palette_color(&ROUTE_PALETTE[..], index),
                    route.labels.join(" -> ")
                );
            }
        }
        Command::Fly {
            route,
            switch_to,
            switch_after,
        } => {
            match route {
                Some(id) => selector.switch_active_route(&id)?,
                None => selector.start_flight()?,
            };
            let plan = switch_to
                .zip(switch_after)
                .map(|(route_id, after_steps)| SwitchPlan { route_id, after_steps });
            println!(
                "Flying {} ({} ms per step)",
                selector.active_route()?.display_name(),
                config.animator_config().step_delay().as_millis()
            );

            let summary =
                fly_until_done(&mut selector, config.steps_per_segment, plan, shutdown_signal())
                    .await?;
            println!(
                "Flight {:?} on {} after {} marker updates ({} recenters)",
                summary.status,
                summary.route_id.as_deref().unwrap_or("-"),
                presenter.marker_updates(),
                presenter.recenter_count()
            );
            if let Some(pos) = summary.final_position {
                println!("  Final position: ({:.1}, {:.1})", pos.x, pos.y);
            }
        }
        Command::Avoid {
            lon,
            lat,
            radius,
            fly,
            json,
        } => {
            let zone = NoFlyZone::new(project_lon_lat(lon, lat), radius)?;
            let report = selector.feasibility(&zone);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("No-fly zone at ({lon}, {lat}), radius {radius}");
                for entry in &report {
                    let verdict = if entry.intersects { "BLOCKED" } else { "clear" };
                    println!(
                        "  {:<22} {:<7} waypoints in zone: {:?}",
                        entry.route_id, verdict, entry.waypoints_in_zone
                    );
                }
            }

            if !fly {
                match selector.find_feasible_route(&zone) {
                    Some(route) => println!("Selected: {}", route.id),
                    None => println!("No feasible route"),
                }
                return Ok(());
            }

            selector.start_flight()?;
            let route = selector.avoid_no_fly_zone(zone)?;
            println!("Rerouted to {}", route.display_name());
            let summary =
                fly_until_done(&mut selector, config.steps_per_segment, None, shutdown_signal())
                    .await?;
            println!(
                "Flight {:?} on {}",
                summary.status,
                summary.route_id.as_deref().unwrap_or("-")
            );
        }
        Command::ShowAll => {
            for (route_id, style) in selector.show_all_routes() {
                println!("{:<22} {:<7} width {}", route_id, style.color, style.width);
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
