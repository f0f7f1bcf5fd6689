//! Grid snapping and multi-board alignment.
//!
//! Every function here is pure: alignment and distribution return the
//! position updates to apply instead of touching boards directly.

use crate::types::board::{Board, Position, PositionUpdate};

/// Horizontal spacing between distributed boards (board width plus margin).
pub const DISTRIBUTE_SPACING: f64 = 420.0;

/// Vertical spacing used by [`distribute_vertically`].
pub const DISTRIBUTE_VERTICAL_SPACING: f64 = 460.0;

/// Rounds each axis to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid leaves the position untouched.
pub fn snap_to_grid(position: Position, grid_size: f64) -> Position {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return position;
    }
    Position::new(
        snap_axis(position.x, grid_size),
        snap_axis(position.y, grid_size),
    )
}

fn snap_axis(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size + 0.0
}

/// Moves every board onto the first board's `y`.
pub fn align_horizontally(boards: &[Board]) -> Vec<PositionUpdate> {
    let Some((reference, rest)) = boards.split_first() else {
        return Vec::new();
    };
    let y = reference.position.y;
    rest.iter()
        .filter(|b| b.position.y != y)
        .map(|b| PositionUpdate {
            board_id: b.id.clone(),
            position: Position::new(b.position.x, y),
        })
        .collect()
}

/// Moves every board onto the first board's `x`.
pub fn align_vertically(boards: &[Board]) -> Vec<PositionUpdate> {
    let Some((reference, rest)) = boards.split_first() else {
        return Vec::new();
    };
    let x = reference.position.x;
    rest.iter()
        .filter(|b| b.position.x != x)
        .map(|b| PositionUpdate {
            board_id: b.id.clone(),
            position: Position::new(x, b.position.y),
        })
        .collect()
}

/// Lays boards out left to right, [`DISTRIBUTE_SPACING`] apart, starting at
/// the left-most board's `x`. Each board keeps its own `y`.
pub fn distribute_horizontally(boards: &[Board]) -> Vec<PositionUpdate> {
    distribute(boards, |p| p.x, |p, x| Position::new(x, p.y), DISTRIBUTE_SPACING)
}

/// Top-to-bottom counterpart of [`distribute_horizontally`].
pub fn distribute_vertically(boards: &[Board]) -> Vec<PositionUpdate> {
    distribute(
        boards,
        |p| p.y,
        |p, y| Position::new(p.x, y),
        DISTRIBUTE_VERTICAL_SPACING,
    )
}

fn distribute(
    boards: &[Board],
    axis: impl Fn(Position) -> f64,
    with_axis: impl Fn(Position, f64) -> Position,
    spacing: f64,
) -> Vec<PositionUpdate> {
    if boards.len() < 2 {
        return Vec::new();
    }
    let mut sorted: Vec<&Board> = boards.iter().collect();
    sorted.sort_by(|a, b| axis(a.position).total_cmp(&axis(b.position)));

    let mut cursor = axis(sorted[0].position);
    let mut updates = Vec::new();
    for board in &sorted[1..] {
        cursor += spacing;
        if axis(board.position) != cursor {
            updates.push(PositionUpdate {
                board_id: board.id.clone(),
                position: with_axis(board.position, cursor),
            });
        }
    }
    updates
}
