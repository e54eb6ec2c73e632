#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Grid Breakout headlessly.

mod config;
mod layout_transfer;
mod simulation;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grid_breakout_core::{Coordinate, Event};
use grid_breakout_system_autopilot::Autopilot;
use grid_breakout_world::query;

use crate::{
    config::{band_layout, Settings},
    layout_transfer::BlockLayout,
    simulation::{Finish, Simulation},
};

#[derive(Parser, Debug)]
#[command(name = "grid-breakout", about = "Headless discrete-grid breakout runner")]
struct Args {
    /// TOML file supplying `[game]`, `[blocks]` and `[run]` tables.
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// Maximum number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of grid columns.
    #[arg(long)]
    width: Option<u32>,

    /// Number of grid rows.
    #[arg(long)]
    height: Option<u32>,

    /// Number of full block rows below the ceiling.
    #[arg(long)]
    block_rows: Option<u32>,

    /// Encoded block layout (`breakout:v1:WxH:...`) replacing the row band.
    #[arg(long)]
    layout: Option<String>,

    /// Keep the paddle still instead of following the ball.
    #[arg(long)]
    no_autopilot: bool,

    /// Print the encoded block layout and exit without simulating.
    #[arg(long)]
    export_layout: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Entry point for the Grid Breakout command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    apply_overrides(&mut settings, &args);

    let config = settings.game.to_config();
    config
        .validate()
        .context("game configuration is not playable")?;

    let blocks = initial_blocks(&settings)?;
    if args.export_layout {
        println!("{}", BlockLayout::for_grid(&config.grid, blocks).encode()?);
        return Ok(());
    }

    let autopilot = settings
        .run
        .autopilot
        .then(|| Autopilot::new(settings.run.paddle_speed));
    let (mut simulation, setup_events) = Simulation::new(config, &blocks, autopilot);
    let rejected = setup_events
        .iter()
        .filter(|event| matches!(event, Event::BlockPlacementRejected { .. }))
        .count();
    if rejected > 0 {
        log::warn!("{rejected} block(s) could not be placed");
    }

    println!("{}", query::welcome_banner(simulation.world()));
    log::info!(
        "{}x{} grid, {} blocks, autopilot {}",
        config.grid.width(),
        config.grid.height(),
        query::blocks(simulation.world()).len(),
        if settings.run.autopilot { "on" } else { "off" },
    );

    simulation.start();
    let summary = simulation.run(settings.run.ticks);

    let outcome = match summary.finish {
        Finish::GameEnded { contact } => format!("ball lost heading for {contact:?}"),
        Finish::Cleared => "field cleared".to_owned(),
        Finish::OutOfTicks => "tick budget exhausted".to_owned(),
        Finish::Rejected => "world state became inconsistent".to_owned(),
    };
    println!(
        "{outcome} after {} ticks: {} deflections, {} blocks destroyed, {} remaining",
        summary.ticks, summary.deflections, summary.blocks_destroyed, summary.blocks_remaining
    );

    if summary.finish == Finish::Rejected {
        bail!("simulation stopped on an invalid world state");
    }
    Ok(())
}

fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(ticks) = args.ticks {
        settings.run.ticks = ticks;
    }
    if let Some(width) = args.width {
        settings.game.width = width;
    }
    if let Some(height) = args.height {
        settings.game.height = height;
    }
    if let Some(rows) = args.block_rows {
        settings.blocks.rows = rows;
    }
    if let Some(layout) = &args.layout {
        settings.blocks.layout = Some(layout.clone());
    }
    if args.no_autopilot {
        settings.run.autopilot = false;
    }
}

fn initial_blocks(settings: &Settings) -> Result<Vec<Coordinate>> {
    let grid = settings.game.to_config().grid;
    let Some(encoded) = &settings.blocks.layout else {
        return Ok(band_layout(
            &grid,
            settings.blocks.rows,
            settings.blocks.top_margin,
        ));
    };

    let cells = BlockLayout::decode(encoded)
        .and_then(|layout| layout.into_cells_for(&grid))
        .context("invalid block layout")?;
    Ok(cells)
}
