//! Node and edge records consumed by the diagram surface, and the
//! interactions it reports back.

use std::sync::Arc;

use crate::chart::color::Color;
use crate::chart::model::{ConnectionId, DepartmentId, Position, Role};

/// What a department card displays.
#[derive(Clone, Debug, PartialEq)]
pub struct DepartmentPayload {
	pub name: String,
	pub color: String,
	pub roles: Vec<Arc<Role>>,
	pub size: f64,
}

/// A renderable diagram node.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
	pub id: DepartmentId,
	pub position: Position,
	pub data: DepartmentPayload,
}

/// Stroke applied to an edge line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: Color,
	pub stroke_width: f64,
}

/// Arrowhead shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
	/// Filled triangle.
	ArrowClosed,
}

/// Arrowhead drawn at an edge end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeMarker {
	pub kind: MarkerKind,
	pub width: f64,
	pub height: f64,
	pub color: Color,
}

/// A renderable diagram edge.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
	pub id: ConnectionId,
	pub source: DepartmentId,
	pub target: DepartmentId,
	/// Dashes flow from source to target.
	pub animated: bool,
	pub style: EdgeStyle,
	pub marker_end: EdgeMarker,
}

/// User interaction on the surface.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
	/// A card was dragged; carries its new top-left corner.
	NodeDragged {
		id: DepartmentId,
		position: Position,
	},
	/// A line was dragged from `source`'s output handle to `target`'s input.
	Connected {
		source: DepartmentId,
		target: DepartmentId,
	},
	/// The set of selected cards changed.
	SelectionChanged(Vec<DepartmentId>),
	/// Selected cards were deleted from the keyboard.
	NodesDeleted(Vec<DepartmentId>),
}
