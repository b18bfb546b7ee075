//! Geometric layout of a reporting forest.
//!
//! # Responsibility
//! - Assign a 2D position to every forest node for a chart renderer.
//! - Describe every parent -> child link as an edge.
//!
//! # Invariants
//! - Layout is deterministic for the same forest and config.
//! - Root trees occupy disjoint bands along the breadth axis.
//! - Orientation is caller configuration: unknown values are rejected.

mod engine;

pub use engine::layout_forest;

use crate::model::contact::ContactId;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Default horizontal distance between neighbouring slots or levels.
pub const DEFAULT_SPACING_X: f64 = 300.0;
/// Default vertical distance between neighbouring slots or levels.
pub const DEFAULT_SPACING_Y: f64 = 150.0;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Orientation string is neither `vertical` nor `horizontal`.
    InvalidOrientation(String),
    /// Spacing must be a finite, positive number.
    InvalidSpacing { axis: &'static str, value: f64 },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrientation(value) => write!(
                f,
                "unknown orientation `{value}`; expected vertical|horizontal"
            ),
            Self::InvalidSpacing { axis, value } => {
                write!(f, "spacing_{axis} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for LayoutError {}

/// Which axis carries hierarchy depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Depth grows downward, siblings spread horizontally.
    #[default]
    Vertical,
    /// Depth grows rightward, siblings spread vertically.
    Horizontal,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }

    /// The other orientation.
    pub fn toggled(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }

    /// Node sides edges leave from and arrive at: `(source, target)`.
    pub fn handle_sides(self) -> (HandleSide, HandleSide) {
        match self {
            Self::Vertical => (HandleSide::Bottom, HandleSide::Top),
            Self::Horizontal => (HandleSide::Right, HandleSide::Left),
        }
    }
}

impl FromStr for Orientation {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            _ => Err(LayoutError::InvalidOrientation(value.to_string())),
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a node box an edge attaches to. Cosmetic routing hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Distance between slots (vertical) or levels (horizontal) on X.
    pub spacing_x: f64,
    /// Distance between levels (vertical) or slots (horizontal) on Y.
    pub spacing_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            spacing_x: DEFAULT_SPACING_X,
            spacing_y: DEFAULT_SPACING_Y,
        }
    }
}

impl LayoutConfig {
    /// Default spacing with the given orientation.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    /// Parses the orientation flag and applies default spacing.
    pub fn from_orientation_str(value: &str) -> LayoutResult<Self> {
        Ok(Self::new(value.parse()?))
    }

    pub fn validate(&self) -> LayoutResult<()> {
        for (axis, value) in [("x", self.spacing_x), ("y", self.spacing_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidSpacing { axis, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Position assigned to one contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: ContactId,
    pub position: Point,
    pub depth: usize,
}

/// One parent -> child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEdge {
    /// `"{source}-{target}"`.
    pub id: String,
    pub source: ContactId,
    pub target: ContactId,
}

impl ChartEdge {
    pub fn new(source: ContactId, target: ContactId) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
        }
    }
}

/// Complete layout output for one forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub orientation: Orientation,
    /// Depth-first pre-order, roots in forest order.
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<ChartEdge>,
    pub source_side: HandleSide,
    pub target_side: HandleSide,
}

impl ChartLayout {
    pub(crate) fn empty(orientation: Orientation) -> Self {
        let (source_side, target_side) = orientation.handle_sides();
        Self {
            orientation,
            nodes: Vec::new(),
            edges: Vec::new(),
            source_side,
            target_side,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of `id`; the last entry wins for duplicated ids.
    pub fn position_of(&self, id: ContactId) -> Option<Point> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.id == id)
            .map(|node| node.position)
    }

    /// Largest `(x, y)` used by any node; `(0, 0)` when empty.
    pub fn extent(&self) -> Point {
        self.nodes.iter().fold(Point { x: 0.0, y: 0.0 }, |acc, node| Point {
            x: acc.x.max(node.position.x),
            y: acc.y.max(node.position.y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HandleSide, LayoutConfig, LayoutError, Orientation};

    #[test]
    fn orientation_parses_known_values_case_insensitively() {
        assert_eq!(" Vertical ".parse::<Orientation>(), Ok(Orientation::Vertical));
        assert_eq!("HORIZONTAL".parse::<Orientation>(), Ok(Orientation::Horizontal));
    }

    #[test]
    fn orientation_rejects_unknown_value() {
        let err = "diagonal".parse::<Orientation>().unwrap_err();
        assert_eq!(err, LayoutError::InvalidOrientation("diagonal".to_string()));
        assert!(LayoutConfig::from_orientation_str("").is_err());
    }

    #[test]
    fn toggling_twice_is_identity() {
        assert_eq!(Orientation::Vertical.toggled().toggled(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.toggled(), Orientation::Horizontal);
    }

    #[test]
    fn handle_sides_follow_orientation() {
        assert_eq!(
            Orientation::Vertical.handle_sides(),
            (HandleSide::Bottom, HandleSide::Top)
        );
        assert_eq!(
            Orientation::Horizontal.handle_sides(),
            (HandleSide::Right, HandleSide::Left)
        );
    }

    #[test]
    fn validate_rejects_non_positive_or_nan_spacing() {
        let mut config = LayoutConfig::default();
        assert!(config.validate().is_ok());

        config.spacing_x = 0.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidSpacing { axis: "x", .. })
        ));

        config.spacing_x = 10.0;
        config.spacing_y = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidSpacing { axis: "y", .. })
        ));
    }
}
