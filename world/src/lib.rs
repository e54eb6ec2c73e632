#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Breakout.
//!
//! The world owns the ball, the paddle span, the block set and the game
//! phase. Each field has a single writer: the paddle only changes through
//! [`Command::MovePaddle`], blocks only through [`Command::PlaceBlock`] and
//! [`Command::RemoveBlock`], and the ball only through [`Command::Tick`] and
//! [`Command::ResetBall`]. [`Command::Configure`] resets all of them at once.

use grid_breakout_core::{
    Ball, BlockSet, Command, Coordinate, Event, GameConfig, GamePhase, Hit, HitCategory, Outcome,
    PaddleError, PaddleSpan, PlacementError, WELCOME_BANNER,
};
use grid_breakout_system_collision::resolve;

/// Represents the authoritative Grid Breakout world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    phase: GamePhase,
    ball: Ball,
    paddle: PaddleSpan,
    blocks: BlockSet,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the reference configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    fn with_config(config: GameConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::Stopped,
            ball: config.ball_start(),
            paddle: config.paddle_start(),
            blocks: BlockSet::new(),
            tick_index: 0,
            config,
        }
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }

        log::info!("game phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        if self.phase != GamePhase::Started {
            self.ball.heading = self.config.start_heading;
            return;
        }

        let grid = self.config.grid;
        let snapshot = query::snapshot(self);
        if let Err(error) = snapshot.validate(&grid, self.config.paddle_width) {
            log::error!("refusing tick {}: {error}", self.tick_index);
            out_events.push(Event::TickRejected { error });
            return;
        }

        let outcome = resolve(&grid, &snapshot);
        match outcome {
            Outcome::NoHit => {
                let from = self.ball.position;
                let to = self.ball.next_position();
                self.ball.position = to;
                log::trace!("ball advanced {from:?} -> {to:?}");
                out_events.push(Event::BallAdvanced { from, to });
            }
            Outcome::Hit(Hit {
                category: HitCategory::Floor,
                contact,
                ..
            }) => {
                log::info!("ball reached the floor heading for {contact:?}");
                out_events.push(Event::GameEnded { contact });
                self.set_phase(GamePhase::Stopped, out_events);
            }
            Outcome::Hit(Hit {
                category,
                heading,
                contact,
            }) => {
                log::debug!("{category:?} hit at {contact:?}");
                self.ball.heading = heading;
                out_events.push(Event::BallDeflected {
                    category,
                    contact,
                    heading,
                });
            }
        }
    }

    fn place_block(&mut self, cell: Coordinate) -> Result<(), PlacementError> {
        let grid = self.config.grid;
        if !grid.is_inside(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if cell.y() == grid.paddle_row() {
            return Err(PlacementError::PaddleRow);
        }
        if !self.blocks.insert(cell) {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Configure { config } => {
            if let Err(reason) = config.validate() {
                log::warn!("configuration rejected: {reason}");
                out_events.push(Event::ConfigurationRejected { reason });
                return;
            }

            let previous_phase = world.phase;
            *world = World::with_config(config);
            out_events.push(Event::Configured { config });
            if previous_phase != GamePhase::Stopped {
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Stopped,
                });
            }
        }
        Command::SetPhase { phase } => world.set_phase(phase, out_events),
        Command::ResetBall => {
            world.ball = world.config.ball_start();
            out_events.push(Event::BallReset { ball: world.ball });
        }
        Command::MovePaddle { left_x } => {
            let span = PaddleSpan::from_left(left_x, world.config.paddle_width);
            if !span.fits(&world.config.grid) {
                log::warn!("paddle move to column {left_x} rejected");
                out_events.push(Event::PaddleMoveRejected {
                    left_x,
                    reason: PaddleError::OutOfBounds,
                });
                return;
            }

            if span != world.paddle {
                world.paddle = span;
                out_events.push(Event::PaddleMoved { span });
            }
        }
        Command::PlaceBlock { cell } => match world.place_block(cell) {
            Ok(()) => out_events.push(Event::BlockPlaced { cell }),
            Err(reason) => {
                log::warn!("block placement at {cell:?} rejected: {reason}");
                out_events.push(Event::BlockPlacementRejected { cell, reason });
            }
        },
        Command::RemoveBlock { cell } => {
            if world.blocks.remove(cell) {
                out_events.push(Event::BlockRemoved { cell });
            }
        }
        Command::Tick => world.advance(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use grid_breakout_core::{
        Ball, BlockSet, EntitySnapshot, GameConfig, GamePhase, Grid, PaddleSpan,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the active configuration.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the grid dimensions.
    #[must_use]
    pub fn grid(world: &World) -> Grid {
        world.config.grid
    }

    /// Reports whether the ball is currently in play.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Current ball position and heading.
    #[must_use]
    pub fn ball(world: &World) -> Ball {
        world.ball
    }

    /// Current paddle span.
    #[must_use]
    pub fn paddle(world: &World) -> PaddleSpan {
        world.paddle
    }

    /// Blocks that still count as obstacles.
    #[must_use]
    pub fn blocks(world: &World) -> &BlockSet {
        &world.blocks
    }

    /// Number of ticks processed since the world was last configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a consistent view of every entity.
    #[must_use]
    pub fn snapshot(world: &World) -> EntitySnapshot<'_> {
        EntitySnapshot::new(world.ball, world.paddle, &world.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_breakout_core::{ConfigError, Direction, Grid, Heading, SnapshotError};

    fn small_config() -> GameConfig {
        GameConfig {
            grid: Grid::new(10, 10, 1),
            paddle_width: 3,
            paddle_start_left_x: 4,
            ball_start: Coordinate::new(2, 5),
            start_heading: Heading::new(Direction::Positive, Direction::Positive),
        }
    }

    fn configured_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Configure {
                config: small_config(),
            },
            &mut events,
        );
        world
    }

    #[test]
    fn new_world_uses_reference_configuration() {
        let world = World::new();
        assert_eq!(query::config(&world), &GameConfig::default());
        assert_eq!(query::phase(&world), GamePhase::Stopped);
        assert!(query::blocks(&world).is_empty());
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn stopped_tick_reaims_ball_without_moving_it() {
        let mut world = configured_world();
        world.ball.heading = Heading::new(Direction::Negative, Direction::Negative);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(events, vec![Event::TimeAdvanced { tick: 1 }]);
        assert_eq!(query::ball(&world), small_config().ball_start());
    }

    #[test]
    fn invalid_snapshot_rejects_tick() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPhase {
                phase: GamePhase::Started,
            },
            &mut events,
        );
        world.ball.position = Coordinate::new(12, 5);
        events.clear();

        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::TickRejected {
                    error: SnapshotError::BallOutOfBounds {
                        position: Coordinate::new(12, 5),
                    },
                },
            ]
        );
        assert_eq!(query::ball(&world).position, Coordinate::new(12, 5));
        assert_eq!(query::phase(&world), GamePhase::Started);
    }

    #[test]
    fn stray_block_on_paddle_row_rejects_tick() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPhase {
                phase: GamePhase::Started,
            },
            &mut events,
        );
        let _ = world.blocks.insert(Coordinate::new(0, 1));
        events.clear();

        apply(&mut world, Command::Tick, &mut events);

        assert!(events.contains(&Event::TickRejected {
            error: SnapshotError::BlockOnPaddleRow {
                cell: Coordinate::new(0, 1),
            },
        }));
    }

    #[test]
    fn rejected_configuration_leaves_world_untouched() {
        let mut world = configured_world();
        let mut events = Vec::new();
        let mut config = small_config();
        config.paddle_width = 0;

        apply(&mut world, Command::Configure { config }, &mut events);

        assert_eq!(
            events,
            vec![Event::ConfigurationRejected {
                reason: ConfigError::InvalidPaddleWidth { width: 0 },
            }]
        );
        assert_eq!(query::config(&world), &small_config());
    }

    #[test]
    fn reconfiguring_a_running_game_stops_it() {
        let mut world = configured_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPhase {
                phase: GamePhase::Started,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::Configure {
                config: small_config(),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::Configured {
                    config: small_config(),
                },
                Event::PhaseChanged {
                    phase: GamePhase::Stopped,
                },
            ]
        );
        assert_eq!(query::tick_index(&world), 0);
    }
}
