#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Breakout engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`EntitySnapshot`], and respond exclusively with new
//! command batches.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Breakout.";

/// Row occupied by the paddle in the reference configuration.
pub const DEFAULT_PADDLE_ROW: u32 = 1;
/// Number of columns in the reference configuration.
pub const DEFAULT_GRID_WIDTH: u32 = 20;
/// Number of rows in the reference configuration.
pub const DEFAULT_GRID_HEIGHT: u32 = 20;
/// Number of cells spanned by the paddle in the reference configuration.
pub const DEFAULT_PADDLE_WIDTH: u32 = 5;

/// Describes whether the ball is currently in play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// The ball is parked; ticks only re-aim it at the start heading.
    #[default]
    Stopped,
    /// The ball advances every tick.
    Started,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the active configuration and resets every entity to its start state.
    Configure {
        /// Configuration the world should adopt.
        config: GameConfig,
    },
    /// Requests that the world transition to the provided phase.
    SetPhase {
        /// Phase the world should activate.
        phase: GamePhase,
    },
    /// Returns the ball to its configured start position and heading.
    ResetBall,
    /// Moves the paddle so that its leftmost cell sits at the provided column.
    MovePaddle {
        /// Column of the paddle's leftmost cell after the move.
        left_x: i32,
    },
    /// Requests placement of a destructible block.
    PlaceBlock {
        /// Cell the block should occupy.
        cell: Coordinate,
    },
    /// Requests removal of a block, typically after it was struck.
    RemoveBlock {
        /// Cell of the block to remove.
        cell: Coordinate,
    },
    /// Advances the simulation by one discrete step.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new configuration became active.
    Configured {
        /// Configuration now in effect.
        config: GameConfig,
    },
    /// Reports that a configuration request was rejected.
    ConfigurationRejected {
        /// Specific reason the configuration failed validation.
        reason: ConfigError,
    },
    /// Announces that the game entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that was just processed, starting at one.
        tick: u64,
    },
    /// Confirms that the ball moved one cell without touching anything.
    BallAdvanced {
        /// Cell the ball occupied before moving.
        from: Coordinate,
        /// Cell the ball occupies after moving.
        to: Coordinate,
    },
    /// Reports that the ball struck an obstacle and changed heading.
    BallDeflected {
        /// Kind of contact that occurred.
        category: HitCategory,
        /// Cell that was struck, which may lie outside the grid for wall hits.
        contact: Coordinate,
        /// Heading committed after the deflection.
        heading: Heading,
    },
    /// Confirms that the ball was returned to its start state.
    BallReset {
        /// Ball state after the reset.
        ball: Ball,
    },
    /// Announces that the ball reached the floor and the run ended.
    GameEnded {
        /// Cell the ball was heading toward when it reached the floor.
        contact: Coordinate,
    },
    /// Confirms that the paddle moved.
    PaddleMoved {
        /// Span occupied by the paddle after the move.
        span: PaddleSpan,
    },
    /// Reports that a paddle move was rejected.
    PaddleMoveRejected {
        /// Leftmost column supplied in the request.
        left_x: i32,
        /// Specific reason the move failed.
        reason: PaddleError,
    },
    /// Confirms that a block was placed.
    BlockPlaced {
        /// Cell occupied by the new block.
        cell: Coordinate,
    },
    /// Reports that a block placement request was rejected.
    BlockPlacementRejected {
        /// Cell provided in the placement request.
        cell: Coordinate,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a block was removed.
    BlockRemoved {
        /// Cell the block previously occupied.
        cell: Coordinate,
    },
    /// Reports that a tick was refused because the world state was inconsistent.
    TickRejected {
        /// Invariant that the snapshot violated.
        error: SnapshotError,
    },
}

/// Location of a single grid cell.
///
/// Components are signed so that contact points just beyond a wall can be
/// reported without clamping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index, counted upward from the floor.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring coordinate one step along the heading.
    #[must_use]
    pub const fn stepped(self, heading: Heading) -> Self {
        Self {
            x: self.x + heading.x.step(),
            y: self.y + heading.y.step(),
        }
    }
}

/// Discrete playing field dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    paddle_row: u32,
}

impl Grid {
    /// Creates a new grid description.
    #[must_use]
    pub const fn new(width: u32, height: u32, paddle_row: u32) -> Self {
        Self {
            width,
            height,
            paddle_row,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Fixed row occupied by the paddle.
    #[must_use]
    pub const fn paddle_row(&self) -> i32 {
        self.paddle_row as i32
    }

    /// Largest valid column index.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.width as i32 - 1
    }

    /// Largest valid row index.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.height as i32 - 1
    }

    /// Reports whether the coordinate lies within the grid bounds.
    #[must_use]
    pub const fn is_inside(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= 0
            && coordinate.y >= 0
            && coordinate.x <= self.max_x()
            && coordinate.y <= self.max_y()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT, DEFAULT_PADDLE_ROW)
    }
}

/// Travel direction along a single axis.
///
/// The ball always moves exactly one cell per tick on each axis, so only the
/// two signs are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing indices (left or down).
    Negative,
    /// Movement toward increasing indices (right or up).
    Positive,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }

    /// Signed cell offset travelled in one tick.
    #[must_use]
    pub const fn step(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Positive => 1,
        }
    }

    /// Converts a signed unit offset into a direction.
    #[must_use]
    pub const fn from_step(step: i32) -> Option<Self> {
        match step {
            -1 => Some(Self::Negative),
            1 => Some(Self::Positive),
            _ => None,
        }
    }
}

/// Pair of per-axis directions describing where the ball travels next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    /// Horizontal component.
    pub x: Direction,
    /// Vertical component.
    pub y: Direction,
}

impl Heading {
    /// Creates a heading from its two components.
    #[must_use]
    pub const fn new(x: Direction, y: Direction) -> Self {
        Self { x, y }
    }

    /// Heading with the horizontal component reversed.
    #[must_use]
    pub const fn flip_x(self) -> Self {
        Self::new(self.x.flipped(), self.y)
    }

    /// Heading with the vertical component reversed.
    #[must_use]
    pub const fn flip_y(self) -> Self {
        Self::new(self.x, self.y.flipped())
    }

    /// Heading with both components reversed.
    #[must_use]
    pub const fn flip_both(self) -> Self {
        Self::new(self.x.flipped(), self.y.flipped())
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::new(Direction::Positive, Direction::Positive)
    }
}

/// Position and heading of the single ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ball {
    /// Cell currently occupied by the ball.
    pub position: Coordinate,
    /// Direction the ball travels on the next tick.
    pub heading: Heading,
}

impl Ball {
    /// Creates a new ball.
    #[must_use]
    pub const fn new(position: Coordinate, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// Cell the ball would occupy after an unobstructed tick.
    #[must_use]
    pub const fn next_position(&self) -> Coordinate {
        self.position.stepped(self.heading)
    }
}

/// Horizontal extent of the paddle on the paddle row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaddleSpan {
    left_x: i32,
    right_x: i32,
}

impl PaddleSpan {
    /// Creates a span covering `width` cells starting at `left_x`.
    ///
    /// A zero width is treated as a single cell. The right edge saturates at
    /// `i32::MAX`, so a span that would overflow never fits any grid.
    #[must_use]
    pub const fn from_left(left_x: i32, width: u32) -> Self {
        let extent = if width == 0 {
            0
        } else if width > i32::MAX as u32 {
            i32::MAX
        } else {
            width as i32 - 1
        };
        Self {
            left_x,
            right_x: left_x.saturating_add(extent),
        }
    }

    /// Leftmost column covered by the paddle.
    #[must_use]
    pub const fn left_x(&self) -> i32 {
        self.left_x
    }

    /// Rightmost column covered by the paddle.
    #[must_use]
    pub const fn right_x(&self) -> i32 {
        self.right_x
    }

    /// Number of cells covered by the paddle.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right_x.abs_diff(self.left_x).saturating_add(1)
    }

    /// Reports whether the column lies within the span, inclusive.
    #[must_use]
    pub const fn contains_x(&self, x: i32) -> bool {
        self.left_x <= x && x <= self.right_x
    }

    /// Reports whether every cell of the span lies within the grid.
    #[must_use]
    pub const fn fits(&self, grid: &Grid) -> bool {
        self.left_x >= 0 && self.right_x <= grid.max_x()
    }
}

/// Set of destructible blocks, iterated in coordinate order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSet {
    cells: BTreeSet<Coordinate>,
}

impl BlockSet {
    /// Creates an empty block set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a block occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.cells.contains(&cell)
    }

    /// Adds a block, returning `false` when the cell was already occupied.
    pub fn insert(&mut self, cell: Coordinate) -> bool {
        self.cells.insert(cell)
    }

    /// Removes a block, returning `false` when no block occupied the cell.
    pub fn remove(&mut self, cell: Coordinate) -> bool {
        self.cells.remove(&cell)
    }

    /// Removes every block.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of blocks remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no blocks remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over block cells in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<Coordinate> for BlockSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Consistent read-only view of every entity as it stood at the start of a tick.
#[derive(Clone, Copy, Debug)]
pub struct EntitySnapshot<'a> {
    /// Ball position and heading.
    pub ball: Ball,
    /// Current paddle span.
    pub paddle: PaddleSpan,
    /// Blocks still counting as obstacles.
    pub blocks: &'a BlockSet,
}

impl<'a> EntitySnapshot<'a> {
    /// Captures a new snapshot.
    #[must_use]
    pub const fn new(ball: Ball, paddle: PaddleSpan, blocks: &'a BlockSet) -> Self {
        Self {
            ball,
            paddle,
            blocks,
        }
    }

    /// Checks the snapshot against the grid invariants.
    ///
    /// The ball must lie inside the grid, the paddle must fit the grid with
    /// exactly `paddle_width` cells, and every block must lie inside the grid
    /// away from the paddle row. The first violation found is returned.
    pub fn validate(&self, grid: &Grid, paddle_width: u32) -> Result<(), SnapshotError> {
        if !grid.is_inside(self.ball.position) {
            return Err(SnapshotError::BallOutOfBounds {
                position: self.ball.position,
            });
        }

        if !self.paddle.fits(grid) {
            return Err(SnapshotError::PaddleOutOfBounds { span: self.paddle });
        }

        if self.paddle.width() != paddle_width {
            return Err(SnapshotError::PaddleWidthMismatch {
                expected: paddle_width,
                actual: self.paddle.width(),
            });
        }

        for cell in self.blocks.iter() {
            if !grid.is_inside(cell) {
                return Err(SnapshotError::BlockOutOfBounds { cell });
            }
            if cell.y() == grid.paddle_row() {
                return Err(SnapshotError::BlockOnPaddleRow { cell });
            }
        }

        Ok(())
    }
}

/// Category of contact reported by the collision engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitCategory {
    /// Obstacle beside the ball; only the horizontal direction reverses.
    AxisX,
    /// Obstacle above or below the ball; only the vertical direction reverses.
    AxisY,
    /// Obstacle on the diagonal cell; both directions reverse.
    Corner,
    /// The ball reached the floor row and the run ends.
    Floor,
}

/// Collision details for a tick that touched an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hit {
    /// Kind of contact.
    pub category: HitCategory,
    /// Heading the ball should adopt.
    pub heading: Heading,
    /// Cell that was struck.
    pub contact: Coordinate,
}

/// Result of resolving a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Nothing obstructs the ball; it advances with an unchanged heading.
    NoHit,
    /// The ball touches an obstacle.
    Hit(Hit),
}

/// Static configuration describing the playing field and start state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    /// Dimensions of the playing field.
    pub grid: Grid,
    /// Number of cells spanned by the paddle.
    pub paddle_width: u32,
    /// Leftmost paddle column when a game is configured.
    pub paddle_start_left_x: i32,
    /// Ball cell when a game is configured or the ball is reset.
    pub ball_start: Coordinate,
    /// Heading the ball is aimed at while the game is stopped.
    pub start_heading: Heading,
}

impl GameConfig {
    /// Builds the reference layout for a grid.
    ///
    /// The paddle is centred on the middle column and the ball starts three
    /// columns left of centre halfway up the field.
    #[must_use]
    pub fn for_grid(grid: Grid, paddle_width: u32) -> Self {
        let center_x = (grid.width() / 2) as i32;
        Self {
            grid,
            paddle_width,
            paddle_start_left_x: center_x - (paddle_width / 2) as i32,
            ball_start: Coordinate::new(center_x - 3, (grid.height() / 2) as i32),
            start_heading: Heading::default(),
        }
    }

    /// Span the paddle occupies when a game is configured.
    #[must_use]
    pub const fn paddle_start(&self) -> PaddleSpan {
        PaddleSpan::from_left(self.paddle_start_left_x, self.paddle_width)
    }

    /// Ball state when a game is configured or reset.
    #[must_use]
    pub const fn ball_start(&self) -> Ball {
        Ball::new(self.ball_start, self.start_heading)
    }

    /// Checks that the configuration describes a playable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.grid;
        if grid.width() == 0 || grid.height() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if grid.width() > i32::MAX as u32 || grid.height() > i32::MAX as u32 {
            return Err(ConfigError::GridTooLarge);
        }
        if grid.paddle_row() < 0 || grid.paddle_row() > grid.max_y() {
            return Err(ConfigError::PaddleRowOutOfBounds {
                row: grid.paddle_row,
            });
        }
        if self.paddle_width == 0 || self.paddle_width > grid.width() {
            return Err(ConfigError::InvalidPaddleWidth {
                width: self.paddle_width,
            });
        }
        if !self.paddle_start().fits(&grid) {
            return Err(ConfigError::PaddleStartOutOfBounds {
                left_x: self.paddle_start_left_x,
            });
        }
        if !grid.is_inside(self.ball_start) {
            return Err(ConfigError::BallStartOutOfBounds {
                position: self.ball_start,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_grid(Grid::default(), DEFAULT_PADDLE_WIDTH)
    }
}

/// Invariant violations detected in a per-tick snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SnapshotError {
    /// The ball lies outside the grid.
    #[error("ball at {position:?} lies outside the grid")]
    BallOutOfBounds {
        /// Offending ball position.
        position: Coordinate,
    },
    /// Part of the paddle lies outside the grid.
    #[error("paddle span {span:?} extends beyond the grid")]
    PaddleOutOfBounds {
        /// Offending paddle span.
        span: PaddleSpan,
    },
    /// The paddle no longer covers the configured number of cells.
    #[error("paddle spans {actual} cells but {expected} are configured")]
    PaddleWidthMismatch {
        /// Configured paddle width.
        expected: u32,
        /// Width observed in the snapshot.
        actual: u32,
    },
    /// A block lies outside the grid.
    #[error("block at {cell:?} lies outside the grid")]
    BlockOutOfBounds {
        /// Offending block cell.
        cell: Coordinate,
    },
    /// A block shares the paddle row.
    #[error("block at {cell:?} sits on the paddle row")]
    BlockOnPaddleRow {
        /// Offending block cell.
        cell: Coordinate,
    },
}

/// Reasons a configuration may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// The grid has no columns or no rows.
    #[error("grid must contain at least one column and one row")]
    EmptyGrid,
    /// The grid cannot be addressed with signed coordinates.
    #[error("grid dimensions exceed the addressable coordinate range")]
    GridTooLarge,
    /// The paddle row lies outside the grid.
    #[error("paddle row {row} lies outside the grid")]
    PaddleRowOutOfBounds {
        /// Requested paddle row.
        row: u32,
    },
    /// The paddle width is zero or wider than the grid.
    #[error("paddle width {width} does not fit the grid")]
    InvalidPaddleWidth {
        /// Requested paddle width.
        width: u32,
    },
    /// The paddle start position places part of the paddle outside the grid.
    #[error("paddle starting at column {left_x} extends beyond the grid")]
    PaddleStartOutOfBounds {
        /// Requested leftmost paddle column.
        left_x: i32,
    },
    /// The ball start position lies outside the grid.
    #[error("ball start {position:?} lies outside the grid")]
    BallStartOutOfBounds {
        /// Requested start cell.
        position: Coordinate,
    },
}

/// Reasons a paddle move may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PaddleError {
    /// The requested span extends beyond the grid.
    #[error("paddle would extend beyond the grid")]
    OutOfBounds,
}

/// Reasons a block placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell sits on the paddle row.
    #[error("cell sits on the paddle row")]
    PaddleRow,
    /// A block already occupies the requested cell.
    #[error("cell is already occupied by a block")]
    Occupied,
}
