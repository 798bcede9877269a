//! Canvas rendering for the diagram surface.
//!
//! The canvas sits underneath the card layer and draws, in order:
//! 1. The dot grid (screen space, spacing follows zoom)
//! 2. Reporting lines with animated dashes and arrowheads (world space)
//! 3. The line of a connection being dragged out, if any (world space)

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{FlowState, NodeRect};
use super::theme::FlowTheme;
use super::types::{EdgeMarker, FlowEdge, MarkerKind};

/// Below this on-screen spacing the grid is skipped.
const MIN_DOT_SPACING: f64 = 4.0;

/// Cubic bezier between two handles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePath {
	pub start: (f64, f64),
	pub c1: (f64, f64),
	pub c2: (f64, f64),
	pub end: (f64, f64),
}

impl EdgePath {
	/// Leaves `start` heading down and enters `end` heading down.
	pub fn between(start: (f64, f64), end: (f64, f64)) -> Self {
		let bend = ((end.1 - start.1).abs() / 2.0).max(40.0);
		Self {
			start,
			c1: (start.0, start.1 + bend),
			c2: (end.0, end.1 - bend),
			end,
		}
	}

	/// Path from `source`'s output handle to `target`'s input handle.
	pub fn for_nodes(source: &NodeRect, target: &NodeRect) -> Self {
		Self::between(source.source_handle(), target.target_handle())
	}

	/// Unit direction of travel at `end`.
	pub fn end_direction(&self) -> (f64, f64) {
		let (dx, dy) = (self.end.0 - self.c2.0, self.end.1 - self.c2.1);
		let len = (dx * dx + dy * dy).sqrt();
		if len < 0.001 { (0.0, 1.0) } else { (dx / len, dy / len) }
	}
}

/// Renders the complete surface background and edges to the canvas.
pub fn render(
	state: &FlowState,
	ctx: &CanvasRenderingContext2d,
	theme: &FlowTheme,
	edges: &[FlowEdge],
	grid_color: &str,
) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_dots(state, ctx, theme, grid_color);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme, edges);
	draw_pending_connection(state, ctx, theme);

	ctx.restore();
}

fn draw_dots(state: &FlowState, ctx: &CanvasRenderingContext2d, theme: &FlowTheme, color: &str) {
	let k = state.transform.k;
	let gap = theme.dots.gap * k;
	if gap < MIN_DOT_SPACING {
		return;
	}
	let radius = (theme.dots.size * k / 2.0).max(0.5);
	let offset_x = state.transform.x.rem_euclid(gap);
	let offset_y = state.transform.y.rem_euclid(gap);

	ctx.set_fill_style_str(color);
	ctx.begin_path();
	let mut y = offset_y;
	while y < state.height {
		let mut x = offset_x;
		while x < state.width {
			ctx.move_to(x + radius, y);
			let _ = ctx.arc(x, y, radius, 0.0, TAU);
			x += gap;
		}
		y += gap;
	}
	ctx.fill();
}

fn draw_edges(
	state: &FlowState,
	ctx: &CanvasRenderingContext2d,
	theme: &FlowTheme,
	edges: &[FlowEdge],
) {
	let (dash, gap) = theme.dash_pattern;
	let dash_offset = -state.flow_time * theme.flow_speed;

	for edge in edges {
		let (Some(source), Some(target)) =
			(state.rects.get(&edge.source), state.rects.get(&edge.target))
		else {
			continue;
		};
		let path = EdgePath::for_nodes(source, target);

		ctx.set_stroke_style_str(&edge.style.stroke.to_css());
		ctx.set_line_width(edge.style.stroke_width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		stroke_path(ctx, &path);

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		draw_marker(ctx, &path, &edge.marker_end);
	}
}

fn draw_pending_connection(state: &FlowState, ctx: &CanvasRenderingContext2d, theme: &FlowTheme) {
	let Some(rect) = state.connect.source.as_ref().and_then(|id| state.rects.get(id)) else {
		return;
	};
	let path = EdgePath::between(rect.source_handle(), state.connect.cursor);
	let style = &theme.connection_line;

	ctx.set_stroke_style_str(&style.stroke.to_css());
	ctx.set_line_width(style.stroke_width);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	stroke_path(ctx, &path);
}

fn stroke_path(ctx: &CanvasRenderingContext2d, path: &EdgePath) {
	ctx.begin_path();
	ctx.move_to(path.start.0, path.start.1);
	ctx.bezier_curve_to(path.c1.0, path.c1.1, path.c2.0, path.c2.1, path.end.0, path.end.1);
	ctx.stroke();
}

/// Arrowhead at the end of `path`. Marker dimensions are halved so a 28 px
/// marker reads at card scale.
fn draw_marker(ctx: &CanvasRenderingContext2d, path: &EdgePath, marker: &EdgeMarker) {
	let (ux, uy) = path.end_direction();
	let (length, half_width) = (marker.height * 0.5, marker.width * 0.25);
	let (tip_x, tip_y) = path.end;
	let (back_x, back_y) = (tip_x - ux * length, tip_y - uy * length);
	let (px, py) = (-uy * half_width, ux * half_width);

	ctx.begin_path();
	ctx.move_to(back_x + px, back_y + py);
	ctx.line_to(tip_x, tip_y);
	ctx.line_to(back_x - px, back_y - py);

	match marker.kind {
		MarkerKind::ArrowClosed => {
			ctx.close_path();
			ctx.set_fill_style_str(&marker.color.to_css());
			ctx.fill();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn path_runs_between_handles() {
		let source = NodeRect::new(0.0, 0.0, 200.0, 100.0);
		let target = NodeRect::new(300.0, 400.0, 100.0, 80.0);
		let path = EdgePath::for_nodes(&source, &target);
		assert_eq!(path.start, (100.0, 100.0));
		assert_eq!(path.end, (350.0, 400.0));
		assert_eq!(path.c1, (100.0, 250.0));
		assert_eq!(path.c2, (350.0, 250.0));
		assert_eq!(path.end_direction(), (0.0, 1.0));
	}

	#[test]
	fn short_paths_still_bend() {
		let path = EdgePath::between((0.0, 0.0), (50.0, 10.0));
		assert_eq!(path.c1, (0.0, 40.0));
		assert_eq!(path.c2, (50.0, -30.0));
	}

	#[test]
	fn degenerate_end_points_down() {
		let path = EdgePath {
			start: (0.0, 0.0),
			c1: (0.0, 0.0),
			c2: (5.0, 5.0),
			end: (5.0, 5.0),
		};
		assert_eq!(path.end_direction(), (0.0, 1.0));
	}
}
