//! Visual styling of the diagram surface.

use crate::chart::color::Color;

use super::types::{EdgeMarker, EdgeStyle, MarkerKind};

/// Dot pattern drawn behind the cards.
#[derive(Clone, Debug, PartialEq)]
pub struct DotGridStyle {
	/// Distance between dots in world units.
	pub gap: f64,
	/// Dot diameter in world units.
	pub size: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowTheme {
	/// Stroke given to every reporting line.
	pub edge: EdgeStyle,
	/// Arrowhead given to every reporting line.
	pub marker: EdgeMarker,
	/// Dash and gap length of animated edges.
	pub dash_pattern: (f64, f64),
	/// Dash travel speed (world units per second).
	pub flow_speed: f64,
	/// Line shown while dragging a new connection.
	pub connection_line: EdgeStyle,
	pub dots: DotGridStyle,
}

impl FlowTheme {
	/// Dark slate lines with closed arrowheads on a dotted background.
	pub fn default_theme() -> Self {
		let stroke = Color::rgb(15, 23, 42);
		Self {
			edge: EdgeStyle {
				stroke,
				stroke_width: 3.0,
			},
			marker: EdgeMarker {
				kind: MarkerKind::ArrowClosed,
				width: 28.0,
				height: 28.0,
				color: stroke,
			},
			dash_pattern: (5.0, 5.0),
			flow_speed: 20.0,
			connection_line: EdgeStyle {
				stroke: stroke.with_alpha(0.55),
				stroke_width: 2.0,
			},
			dots: DotGridStyle {
				gap: 16.0,
				size: 1.0,
			},
		}
	}
}

impl Default for FlowTheme {
	fn default() -> Self {
		Self::default_theme()
	}
}
