//! Connector path generation.
//!
//! Turns a connector and the committed board positions into a renderer-neutral
//! [`PathDescription`]. The control points produced here are the one
//! bit-exact contract with renderers, so the constants below must not drift.

use std::collections::HashMap;

use crate::types::board::Position;
use crate::types::connector::{ConnectorBead, ConnectorString};
use crate::types::path::PathDescription;

/// Offset from a board's top-left position to its visual centre.
pub const BOARD_CENTER_OFFSET: Position = Position::new(160.0, 200.0);

/// Arc height of a bead-less connector, as a fraction of its horizontal span.
pub const ARC_LIFT_RATIO: f64 = 0.2;

/// Visual centre of a board placed at `position`.
pub fn board_center(position: Position) -> Position {
    position.translate(BOARD_CENTER_OFFSET)
}

/// Builds the stroke for `connector` from a board-id → position map.
///
/// Returns an empty path when either endpoint is missing from the map.
pub fn generate_path(
    connector: &ConnectorString,
    board_positions: &HashMap<String, Position>,
) -> PathDescription {
    let (Some(from), Some(to)) = (
        board_positions.get(&connector.from_board_id),
        board_positions.get(&connector.to_board_id),
    ) else {
        return PathDescription::empty();
    };
    route(board_center(*from), board_center(*to), &connector.sorted_beads())
}

/// Same routing as [`generate_path`] for a connector that does not exist yet,
/// e.g. the one being authored. Beads are sorted by `order` here too.
pub fn preview_path(
    from_board: Position,
    to_board: Position,
    beads: &[ConnectorBead],
) -> PathDescription {
    let mut sorted: Vec<&ConnectorBead> = beads.iter().collect();
    sorted.sort_by_key(|b| b.order);
    route(board_center(from_board), board_center(to_board), &sorted)
}

fn route(source: Position, target: Position, beads: &[&ConnectorBead]) -> PathDescription {
    let mut path = PathDescription::empty();
    path.move_to(source);

    let Some((first, rest)) = beads.split_first() else {
        let mid = source.midpoint(target);
        let lift = ARC_LIFT_RATIO * (target.x - source.x).abs();
        path.quad_to(Position::new(mid.x, mid.y - lift), target);
        return path;
    };

    let first = first.position();
    path.quad_to(source.midpoint(first), first);

    let mut last = first;
    for bead in rest {
        last = bead.position();
        path.line_to(last);
    }

    path.quad_to(last.midpoint(target), target);
    path
}
