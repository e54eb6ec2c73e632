#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that destroys blocks struck by the ball.

use grid_breakout_core::{BlockSet, Command, Coordinate, Event};

/// Block destruction system that queues removal commands for struck blocks.
#[derive(Debug, Default)]
pub struct BlockBreaker {
    scratch: Vec<Coordinate>,
    destroyed: u64,
}

impl BlockBreaker {
    /// Creates a new block breaker with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of removal commands emitted since the system was created.
    #[must_use]
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Emits `Command::RemoveBlock` for every deflection whose contact cell holds a block.
    ///
    /// Each cell is reported at most once per call, in event order. Contacts on
    /// walls or the paddle are ignored because no block occupies them.
    pub fn handle(&mut self, events: &[Event], blocks: &BlockSet, out: &mut Vec<Command>) {
        if blocks.is_empty() {
            return;
        }

        self.scratch.clear();

        for event in events {
            if let Event::BallDeflected { contact, .. } = event {
                if blocks.contains(*contact) && !self.scratch.contains(contact) {
                    self.scratch.push(*contact);
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        self.destroyed = self.destroyed.saturating_add(self.scratch.len() as u64);
        out.reserve(self.scratch.len());
        out.extend(
            self.scratch
                .drain(..)
                .map(|cell| Command::RemoveBlock { cell }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_breakout_core::{Direction, Heading, HitCategory};

    fn deflected(x: i32, y: i32) -> Event {
        Event::BallDeflected {
            category: HitCategory::AxisY,
            contact: Coordinate::new(x, y),
            heading: Heading::new(Direction::Positive, Direction::Negative),
        }
    }

    #[test]
    fn struck_block_is_removed() {
        let mut system = BlockBreaker::new();
        let blocks: BlockSet = [Coordinate::new(3, 6)].into_iter().collect();
        let mut out = Vec::new();

        system.handle(&[deflected(3, 6)], &blocks, &mut out);

        assert_eq!(
            out,
            vec![Command::RemoveBlock {
                cell: Coordinate::new(3, 6),
            }]
        );
        assert_eq!(system.destroyed(), 1);
    }

    #[test]
    fn wall_contacts_are_ignored() {
        let mut system = BlockBreaker::new();
        let blocks: BlockSet = [Coordinate::new(3, 6)].into_iter().collect();
        let mut out = Vec::new();

        system.handle(&[deflected(3, 10), deflected(-1, 4)], &blocks, &mut out);

        assert!(out.is_empty());
        assert_eq!(system.destroyed(), 0);
    }

    #[test]
    fn repeated_contacts_emit_a_single_removal() {
        let mut system = BlockBreaker::new();
        let blocks: BlockSet = [Coordinate::new(3, 6), Coordinate::new(5, 6)]
            .into_iter()
            .collect();
        let mut out = Vec::new();

        system.handle(
            &[deflected(5, 6), deflected(3, 6), deflected(5, 6)],
            &blocks,
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::RemoveBlock {
                    cell: Coordinate::new(5, 6),
                },
                Command::RemoveBlock {
                    cell: Coordinate::new(3, 6),
                },
            ]
        );
        assert_eq!(system.destroyed(), 2);
    }
}
