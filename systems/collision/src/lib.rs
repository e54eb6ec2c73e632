#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision engine that classifies the ball's next discrete step.
//!
//! [`resolve`] inspects a consistent [`EntitySnapshot`] and reports whether
//! the step toward `ball.position + heading` touches the floor, a wall, the
//! paddle or a block. Rules are checked in a fixed priority order and the
//! first match wins:
//!
//! 1. floor: the ball already occupies row zero;
//! 2. vertical obstacle: top or bottom wall, paddle top, block above or below;
//! 3. horizontal obstacle: side wall, paddle side, block beside;
//! 4. diagonal obstacle: outer paddle corner, block on the diagonal cell.
//!
//! A cell that is blocked on both straight neighbours is therefore always an
//! axis hit and never a corner hit.

use grid_breakout_core::{Coordinate, Direction, EntitySnapshot, Grid, Hit, HitCategory, Outcome};

/// Classifies the ball's next step against the snapshot.
///
/// The snapshot must satisfy [`EntitySnapshot::validate`]; callers own that
/// check. The function is total over valid input and never mutates state.
#[must_use]
pub fn resolve(grid: &Grid, snapshot: &EntitySnapshot<'_>) -> Outcome {
    let ball = snapshot.ball;
    let here = ball.position;
    let next = ball.next_position();

    if here.y() == 0 {
        return Outcome::Hit(Hit {
            category: HitCategory::Floor,
            heading: ball.heading,
            contact: next,
        });
    }

    if blocks_vertically(grid, snapshot, here, next) {
        return Outcome::Hit(Hit {
            category: HitCategory::AxisY,
            heading: ball.heading.flip_y(),
            contact: Coordinate::new(here.x(), next.y()),
        });
    }

    if blocks_horizontally(grid, snapshot, here, next) {
        return Outcome::Hit(Hit {
            category: HitCategory::AxisX,
            heading: ball.heading.flip_x(),
            contact: Coordinate::new(next.x(), here.y()),
        });
    }

    if blocks_diagonally(grid, snapshot, next) {
        return Outcome::Hit(Hit {
            category: HitCategory::Corner,
            heading: ball.heading.flip_both(),
            contact: next,
        });
    }

    Outcome::NoHit
}

fn blocks_vertically(
    grid: &Grid,
    snapshot: &EntitySnapshot<'_>,
    here: Coordinate,
    next: Coordinate,
) -> bool {
    let hits_wall = next.y() > grid.max_y() || next.y() < 0;
    let hits_paddle_top = snapshot.paddle.contains_x(here.x()) && next.y() == grid.paddle_row();
    let hits_block = snapshot
        .blocks
        .contains(Coordinate::new(here.x(), next.y()));

    hits_wall || hits_paddle_top || hits_block
}

fn blocks_horizontally(
    grid: &Grid,
    snapshot: &EntitySnapshot<'_>,
    here: Coordinate,
    next: Coordinate,
) -> bool {
    let paddle = snapshot.paddle;
    let hits_wall = next.x() > grid.max_x() || next.x() < 0;
    let hits_paddle_side = here.y() == grid.paddle_row()
        && (next.x() == paddle.left_x() || next.x() == paddle.right_x());
    let hits_block = snapshot
        .blocks
        .contains(Coordinate::new(next.x(), here.y()));

    hits_wall || hits_paddle_side || hits_block
}

fn blocks_diagonally(grid: &Grid, snapshot: &EntitySnapshot<'_>, next: Coordinate) -> bool {
    let paddle = snapshot.paddle;
    let heading_x = snapshot.ball.heading.x;
    // Only the outer corners count: entering the span's edge from outside it.
    let hits_paddle_corner = next.y() == grid.paddle_row()
        && ((next.x() == paddle.left_x() && heading_x == Direction::Positive)
            || (next.x() == paddle.right_x() && heading_x == Direction::Negative));
    let hits_block_corner = snapshot.blocks.contains(next);

    hits_paddle_corner || hits_block_corner
}
