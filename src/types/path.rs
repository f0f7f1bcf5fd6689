use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Position;

/// One absolute-coordinate drawing command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Position },
    QuadTo { control: Position, to: Position },
    LineTo { to: Position },
}

/// Renderer-neutral description of a connector's stroke.
///
/// An empty description means "draw nothing", e.g. when an endpoint board is
/// not known to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathDescription {
    pub commands: Vec<PathCommand>,
}

impl PathDescription {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, to: Position) {
        self.commands.push(PathCommand::MoveTo { to });
    }

    pub fn quad_to(&mut self, control: Position, to: Position) {
        self.commands.push(PathCommand::QuadTo { control, to });
    }

    pub fn line_to(&mut self, to: Position) {
        self.commands.push(PathCommand::LineTo { to });
    }

    pub fn start(&self) -> Option<Position> {
        self.commands.first().map(PathCommand::end_point)
    }

    pub fn end(&self) -> Option<Position> {
        self.commands.last().map(PathCommand::end_point)
    }

    /// Serialises to SVG path data, e.g. `M 160 200 Q 410 150 660 300`.
    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }
}

/// A connector's rendered stroke, as handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorPath {
    pub connector_id: String,
    pub color: String,
    pub stroke_width: f64,
    pub path: PathDescription,
    pub svg: String,
}

impl PathCommand {
    pub fn end_point(&self) -> Position {
        match self {
            PathCommand::MoveTo { to }
            | PathCommand::QuadTo { to, .. }
            | PathCommand::LineTo { to } => *to,
        }
    }
}

/// Shortest round-trip form, with `-0` folded to `0`.
struct Coord(f64);

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 0.0)
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo { to } => write!(f, "M {} {}", Coord(to.x), Coord(to.y)),
            PathCommand::QuadTo { control, to } => write!(
                f,
                "Q {} {} {} {}",
                Coord(control.x),
                Coord(control.y),
                Coord(to.x),
                Coord(to.y)
            ),
            PathCommand::LineTo { to } => write!(f, "L {} {}", Coord(to.x), Coord(to.y)),
        }
    }
}

impl fmt::Display for PathDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", cmd)?;
        }
        Ok(())
    }
}
