use grid_breakout_core::{Command, Coordinate, Event, GameConfig, GamePhase};
use grid_breakout_system_autopilot::Autopilot;
use grid_breakout_system_block_breaker::BlockBreaker;
use grid_breakout_world::{self as world, query, World};

/// Reason a headless run finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Finish {
    /// The ball reached the floor.
    GameEnded {
        /// Cell the ball was heading toward.
        contact: Coordinate,
    },
    /// Every block was destroyed.
    Cleared,
    /// The tick budget ran out with the ball still in play.
    OutOfTicks,
    /// The world refused to advance because its state was inconsistent.
    Rejected,
}

/// Totals gathered over a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub ticks: u64,
    pub deflections: u64,
    pub blocks_destroyed: u64,
    pub blocks_remaining: usize,
    pub finish: Finish,
}

/// Drives the world and its collaborating systems one tick at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    breaker: BlockBreaker,
    autopilot: Option<Autopilot>,
    deflections: u64,
}

impl Simulation {
    /// Configures a fresh world and places the initial blocks.
    ///
    /// Returns the events produced while setting up so callers can inspect
    /// rejections.
    pub(crate) fn new(
        config: GameConfig,
        blocks: &[Coordinate],
        autopilot: Option<Autopilot>,
    ) -> (Self, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::Configure { config }, &mut events);
        for &cell in blocks {
            world::apply(&mut world, Command::PlaceBlock { cell }, &mut events);
        }

        let simulation = Self {
            world,
            breaker: BlockBreaker::new(),
            autopilot,
            deflections: 0,
        };
        (simulation, events)
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Puts the ball in play.
    pub(crate) fn start(&mut self) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SetPhase {
                phase: GamePhase::Started,
            },
            &mut events,
        );
    }

    /// Applies one tick and pumps the resulting events through every system
    /// until no more commands are produced.
    pub(crate) fn step(&mut self) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);

        loop {
            if events.is_empty() {
                break;
            }
            self.deflections += events
                .iter()
                .filter(|event| matches!(event, Event::BallDeflected { .. }))
                .count() as u64;

            let mut commands = Vec::new();
            self.breaker
                .handle(&events, query::blocks(&self.world), &mut commands);
            if let Some(autopilot) = &self.autopilot {
                autopilot.handle(
                    &events,
                    query::ball(&self.world),
                    query::paddle(&self.world),
                    &query::grid(&self.world),
                    &mut commands,
                );
            }

            log.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log
    }

    /// Runs until the game ends, the field is cleared or `max_ticks` elapse.
    pub(crate) fn run(&mut self, max_ticks: u64) -> RunSummary {
        let mut finish = Finish::OutOfTicks;
        let mut ticks = 0;
        let clearable = !query::blocks(&self.world).is_empty();

        while ticks < max_ticks {
            let events = self.step();
            ticks += 1;

            if let Some(contact) = events.iter().find_map(|event| match event {
                Event::GameEnded { contact } => Some(*contact),
                _ => None,
            }) {
                finish = Finish::GameEnded { contact };
                break;
            }
            if events
                .iter()
                .any(|event| matches!(event, Event::TickRejected { .. }))
            {
                finish = Finish::Rejected;
                break;
            }
            if clearable && query::blocks(&self.world).is_empty() {
                log::info!("field cleared after {ticks} ticks");
                finish = Finish::Cleared;
                break;
            }
        }

        RunSummary {
            ticks,
            deflections: self.deflections,
            blocks_destroyed: self.breaker.destroyed(),
            blocks_remaining: query::blocks(&self.world).len(),
            finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_breakout_core::{Direction, Grid, Heading};

    fn config() -> GameConfig {
        GameConfig {
            grid: Grid::new(10, 10, 1),
            paddle_width: 3,
            paddle_start_left_x: 4,
            ball_start: Coordinate::new(5, 3),
            start_heading: Heading::new(Direction::Positive, Direction::Negative),
        }
    }

    #[test]
    fn static_paddle_bounces_the_ball_back_up() {
        let (mut simulation, events) = Simulation::new(config(), &[Coordinate::new(0, 9)], None);
        assert!(events.contains(&Event::BlockPlaced {
            cell: Coordinate::new(0, 9),
        }));
        simulation.start();

        let first = simulation.step();
        assert!(first.contains(&Event::BallAdvanced {
            from: Coordinate::new(5, 3),
            to: Coordinate::new(6, 2),
        }));
        let second = simulation.step();
        assert!(matches!(
            second.as_slice(),
            [Event::TimeAdvanced { .. }, Event::BallDeflected { .. }]
        ));
    }

    #[test]
    fn stopped_simulation_runs_out_of_ticks() {
        let (mut simulation, _) = Simulation::new(config(), &[Coordinate::new(0, 9)], None);

        let summary = simulation.run(5);

        assert_eq!(summary.finish, Finish::OutOfTicks);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.deflections, 0);
        assert_eq!(summary.blocks_remaining, 1);
        assert_eq!(query::ball(simulation.world()).position, Coordinate::new(5, 3));
    }

    #[test]
    fn destroying_the_last_block_clears_the_field() {
        let mut config = config();
        config.ball_start = Coordinate::new(2, 5);
        config.start_heading = Heading::new(Direction::Positive, Direction::Positive);
        let (mut simulation, _) = Simulation::new(config, &[Coordinate::new(2, 6)], None);
        simulation.start();

        let summary = simulation.run(10);

        assert_eq!(summary.finish, Finish::Cleared);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.blocks_destroyed, 1);
        assert_eq!(summary.blocks_remaining, 0);
    }

    #[test]
    fn empty_field_plays_until_the_floor() {
        let (mut simulation, events) = Simulation::new(config(), &[], None);
        assert_eq!(events.len(), 1);
        simulation.start();

        let summary = simulation.run(50);

        assert!(matches!(summary.finish, Finish::GameEnded { .. }));
        assert!(summary.ticks > 1);
        assert_eq!(summary.blocks_destroyed, 0);
        assert_eq!(summary.blocks_remaining, 0);
    }

    #[test]
    fn empty_field_without_a_floor_hit_runs_out_of_ticks() {
        let (mut simulation, _) = Simulation::new(config(), &[], None);
        simulation.start();

        let summary = simulation.run(1);

        assert_eq!(summary.finish, Finish::OutOfTicks);
        assert_eq!(summary.ticks, 1);
    }

    #[test]
    fn autopilot_follows_the_ball() {
        let (mut simulation, _) = Simulation::new(
            config(),
            &[Coordinate::new(0, 9)],
            Some(Autopilot::default()),
        );
        simulation.start();

        let events = simulation.step();

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PaddleMoved { .. })));
    }
}
