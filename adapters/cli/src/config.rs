use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_breakout_core::{
    Coordinate, GameConfig, Grid, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_PADDLE_ROW,
    DEFAULT_PADDLE_WIDTH,
};
use serde::Deserialize;

const DEFAULT_TICKS: u64 = 2_000;
const DEFAULT_BLOCK_ROWS: u32 = 3;
const DEFAULT_BLOCK_TOP_MARGIN: u32 = 2;

/// Settings loaded from an optional TOML file before command-line overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Playing field and start state.
    pub game: GameSection,
    /// Initial block layout.
    pub blocks: BlocksSection,
    /// Tick loop parameters.
    pub run: RunSection,
}

/// `[game]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameSection {
    pub width: u32,
    pub height: u32,
    pub paddle_row: u32,
    pub paddle_width: u32,
    /// Overrides the centred paddle start column.
    pub paddle_start_left_x: Option<i32>,
    /// Overrides the reference ball start cell, as `[x, y]`.
    pub ball_start: Option<[i32; 2]>,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            paddle_row: DEFAULT_PADDLE_ROW,
            paddle_width: DEFAULT_PADDLE_WIDTH,
            paddle_start_left_x: None,
            ball_start: None,
        }
    }
}

impl GameSection {
    /// Builds the world configuration described by this section.
    pub(crate) fn to_config(&self) -> GameConfig {
        let grid = Grid::new(self.width, self.height, self.paddle_row);
        let mut config = GameConfig::for_grid(grid, self.paddle_width);
        if let Some(left_x) = self.paddle_start_left_x {
            config.paddle_start_left_x = left_x;
        }
        if let Some([x, y]) = self.ball_start {
            config.ball_start = Coordinate::new(x, y);
        }
        config
    }
}

/// `[blocks]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BlocksSection {
    /// Number of fully populated rows.
    pub rows: u32,
    /// Empty rows left between the ceiling and the first block row.
    pub top_margin: u32,
    /// Encoded layout string; replaces the row band when present.
    pub layout: Option<String>,
}

impl Default for BlocksSection {
    fn default() -> Self {
        Self {
            rows: DEFAULT_BLOCK_ROWS,
            top_margin: DEFAULT_BLOCK_TOP_MARGIN,
            layout: None,
        }
    }
}

/// `[run]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunSection {
    /// Maximum number of ticks to simulate.
    pub ticks: u64,
    /// Whether the autopilot supplies paddle positions.
    pub autopilot: bool,
    /// Cells the autopilot may move the paddle per tick.
    pub paddle_speed: u32,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            autopilot: true,
            paddle_speed: 1,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Cells of a band of full block rows hanging `top_margin` rows below the ceiling.
///
/// Rows that would fall on or below the paddle row are skipped, so a margin
/// taller than the grid yields an empty band.
pub(crate) fn band_layout(grid: &Grid, rows: u32, top_margin: u32) -> Vec<Coordinate> {
    let Ok(margin) = i32::try_from(top_margin) else {
        return Vec::new();
    };
    let top = grid.max_y().saturating_sub(margin);
    let rows = i32::try_from(rows).unwrap_or(i32::MAX);
    let mut cells = Vec::new();
    for y in (0..rows).map(|offset| top - offset) {
        if y <= grid.paddle_row() {
            break;
        }
        cells.extend((0..=grid.max_x()).map(|x| Coordinate::new(x, y)));
    }
    cells
}
