#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic paddle position stream for headless runs.
//!
//! The autopilot tracks the column the ball is about to enter and slides the
//! paddle toward centring beneath it, limited to a fixed number of cells per
//! tick.

use grid_breakout_core::{Ball, Command, Event, Grid, PaddleSpan};

const DEFAULT_CELLS_PER_TICK: u32 = 1;

/// Paddle supplier that follows the ball.
#[derive(Debug)]
pub struct Autopilot {
    cells_per_tick: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_CELLS_PER_TICK)
    }
}

impl Autopilot {
    /// Creates an autopilot that moves the paddle at most `cells_per_tick` cells per tick.
    #[must_use]
    pub const fn new(cells_per_tick: u32) -> Self {
        Self { cells_per_tick }
    }

    /// Emits at most one `Command::MovePaddle` when the events contain a tick.
    pub fn handle(
        &self,
        events: &[Event],
        ball: Ball,
        paddle: PaddleSpan,
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked || self.cells_per_tick == 0 {
            return;
        }

        let max_left = grid.max_x() - paddle.width() as i32 + 1;
        if max_left < 0 {
            return;
        }

        let half_width = (paddle.width() / 2) as i32;
        let desired = (ball.next_position().x() - half_width).clamp(0, max_left);
        let current = paddle.left_x();
        let reach = self.cells_per_tick as i32;
        let left_x = current + (desired - current).clamp(-reach, reach);

        if left_x != current {
            out.push(Command::MovePaddle { left_x });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_breakout_core::{Coordinate, Direction, Heading};

    fn ball_at(x: i32, heading_x: Direction) -> Ball {
        Ball::new(
            Coordinate::new(x, 5),
            Heading::new(heading_x, Direction::Negative),
        )
    }

    fn ticked() -> Vec<Event> {
        vec![Event::TimeAdvanced { tick: 1 }]
    }

    #[test]
    fn ignores_batches_without_a_tick() {
        let autopilot = Autopilot::default();
        let mut out = Vec::new();

        autopilot.handle(
            &[],
            ball_at(0, Direction::Negative),
            PaddleSpan::from_left(4, 3),
            &Grid::new(10, 10, 1),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn steps_one_cell_toward_the_ball() {
        let autopilot = Autopilot::default();
        let mut out = Vec::new();

        autopilot.handle(
            &ticked(),
            ball_at(1, Direction::Negative),
            PaddleSpan::from_left(4, 3),
            &Grid::new(10, 10, 1),
            &mut out,
        );

        assert_eq!(out, vec![Command::MovePaddle { left_x: 3 }]);
    }

    #[test]
    fn clamps_to_the_right_wall() {
        let autopilot = Autopilot::new(5);
        let mut out = Vec::new();

        autopilot.handle(
            &ticked(),
            ball_at(9, Direction::Positive),
            PaddleSpan::from_left(4, 3),
            &Grid::new(10, 10, 1),
            &mut out,
        );

        assert_eq!(out, vec![Command::MovePaddle { left_x: 7 }]);
    }

    #[test]
    fn stays_put_when_centred() {
        let autopilot = Autopilot::default();
        let mut out = Vec::new();

        autopilot.handle(
            &ticked(),
            ball_at(4, Direction::Positive),
            PaddleSpan::from_left(4, 3),
            &Grid::new(10, 10, 1),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
