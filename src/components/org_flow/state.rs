//! View transform and interaction tracking for the diagram surface.
//!
//! Card geometry is measured from the DOM every frame and cached in
//! [`FlowState::rects`]; everything else here is plain arithmetic so it can be
//! exercised without a browser.

use std::collections::HashMap;

use crate::chart::model::{DepartmentId, Position};

/// Zoom limits and fit behavior.
#[derive(Clone, Debug)]
pub struct ViewportConfig {
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Multiplier applied per wheel notch or zoom button press.
	pub zoom_step: f64,
	/// Fraction of the content size kept free around it by fit view.
	pub fit_padding: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.5,
			max_zoom: 2.0,
			zoom_step: 1.1,
			fit_padding: 0.1,
		}
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// CSS transform for the card layer.
	pub fn to_css(&self) -> String {
		format!("translate({}px, {}px) scale({})", self.x, self.y, self.k)
	}
}

/// Tracks an in-progress card drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<DepartmentId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

impl DragState {
	pub fn begin(&mut self, node: DepartmentId, x: f64, y: f64, node_start: Position) {
		*self = Self {
			node: Some(node),
			start_x: x,
			start_y: y,
			node_start,
		};
	}

	/// New card position for the pointer at screen `(x, y)`.
	pub fn drag_to(&self, x: f64, y: f64, k: f64) -> Option<(DepartmentId, Position)> {
		let node = self.node.clone()?;
		let position = Position::new(
			self.node_start.x + (x - self.start_x) / k,
			self.node_start.y + (y - self.start_y) / k,
		);
		(position != self.node_start).then_some((node, position))
	}

	pub fn end(&mut self) {
		self.node = None;
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Tracks a connection being dragged out of a source handle.
#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<DepartmentId>,
	/// Pointer position in world space.
	pub cursor: (f64, f64),
}

impl ConnectState {
	pub fn begin(&mut self, source: DepartmentId, cursor: (f64, f64)) {
		self.source = Some(source);
		self.cursor = cursor;
	}

	pub fn finish(&mut self) -> Option<DepartmentId> {
		self.source.take()
	}
}

/// Measured card box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl NodeRect {
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Output handle: bottom center.
	pub fn source_handle(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height)
	}

	/// Input handle: top center.
	pub fn target_handle(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y)
	}
}

/// Surface state, mutated by pointer handlers and read by the render loop.
pub struct FlowState {
	pub config: ViewportConfig,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	/// Selected card ids, in selection order.
	pub selected: Vec<DepartmentId>,
	pub rects: HashMap<DepartmentId, NodeRect>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	/// Fit the view as soon as cards have been measured.
	pub needs_fit: bool,
}

impl FlowState {
	pub fn new(width: f64, height: f64, config: ViewportConfig) -> Self {
		Self {
			config,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			connect: ConnectState::default(),
			selected: Vec::new(),
			rects: HashMap::new(),
			width,
			height,
			flow_time: 0.0,
			needs_fit: true,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Zooms by `factor` keeping the graph point under screen `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(self.config.min_zoom, self.config.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zooms around the viewport center.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Frames every measured card. Returns `false` when nothing is measured.
	pub fn fit_view(&mut self) -> bool {
		let mut rects = self.rects.values();
		let Some(first) = rects.next() else {
			return false;
		};
		let init = (first.x, first.y, first.x + first.width, first.y + first.height);
		let (min_x, min_y, max_x, max_y) = rects.fold(init, |(x0, y0, x1, y1), r| {
			(
				x0.min(r.x),
				y0.min(r.y),
				x1.max(r.x + r.width),
				y1.max(r.y + r.height),
			)
		});

		let pad = 1.0 + 2.0 * self.config.fit_padding;
		let (w, h) = ((max_x - min_x).max(1.0) * pad, (max_y - min_y).max(1.0) * pad);
		let k = (self.width / w)
			.min(self.height / h)
			.clamp(self.config.min_zoom, self.config.max_zoom);

		self.transform = ViewTransform {
			x: self.width / 2.0 - (min_x + max_x) / 2.0 * k,
			y: self.height / 2.0 - (min_y + max_y) / 2.0 * k,
			k,
		};
		true
	}

	/// Replaces the selection. Returns the new selection only when it differs.
	pub fn select(&mut self, ids: Vec<DepartmentId>) -> Option<Vec<DepartmentId>> {
		if self.selected == ids {
			return None;
		}
		self.selected = ids.clone();
		Some(ids)
	}

	/// Empties the selection, returning what was selected.
	pub fn take_selection(&mut self) -> Vec<DepartmentId> {
		std::mem::take(&mut self.selected)
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> FlowState {
		FlowState::new(800.0, 600.0, ViewportConfig::default())
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(120.0, 80.0);
		s.zoom_at(120.0, 80.0, 1.1);
		let after = s.screen_to_graph(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!((s.transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn zoom_is_bounded() {
		let mut s = state();
		for _ in 0..50 {
			s.zoom_by(1.1);
		}
		assert_eq!(s.transform.k, 2.0);
		for _ in 0..50 {
			s.zoom_by(1.0 / 1.1);
		}
		assert_eq!(s.transform.k, 0.5);
	}

	#[test]
	fn fit_view_centers_content() {
		let mut s = state();
		assert!(!s.fit_view());

		s.rects.insert("a".into(), NodeRect::new(-220.0, 250.0, 240.0, 120.0));
		s.rects.insert("b".into(), NodeRect::new(420.0, 250.0, 240.0, 120.0));
		s.rects.insert("c".into(), NodeRect::new(100.0, 0.0, 240.0, 160.0));
		assert!(s.fit_view());

		let (cx, cy) = s.screen_to_graph(400.0, 300.0);
		assert!((cx - 220.0).abs() < 1e-9);
		assert!((cy - 185.0).abs() < 1e-9);
		assert!((s.config.min_zoom..=s.config.max_zoom).contains(&s.transform.k));
		// 880 wide content padded by 20% has to fit into 800 px.
		assert!((s.transform.k - 800.0 / (880.0 * 1.2)).abs() < 1e-9);
	}

	#[test]
	fn selection_reports_changes_only() {
		let mut s = state();
		assert_eq!(s.select(vec!["a".into()]), Some(vec!["a".to_string()]));
		assert_eq!(s.select(vec!["a".into()]), None);
		assert_eq!(s.select(Vec::new()), Some(Vec::new()));
		s.select(vec!["b".into()]);
		assert_eq!(s.take_selection(), vec!["b".to_string()]);
		assert!(s.selected.is_empty());
	}

	#[test]
	fn drag_scales_with_zoom() {
		let mut drag = DragState::default();
		assert_eq!(drag.drag_to(10.0, 10.0, 1.0), None);

		drag.begin("a".into(), 100.0, 100.0, Position::new(5.0, 5.0));
		assert_eq!(drag.drag_to(100.0, 100.0, 2.0), None);
		assert_eq!(
			drag.drag_to(140.0, 80.0, 2.0),
			Some(("a".to_string(), Position::new(25.0, -5.0)))
		);
		drag.end();
		assert_eq!(drag.drag_to(140.0, 80.0, 2.0), None);
	}

	#[test]
	fn handles_sit_on_card_edges() {
		let r = NodeRect::new(10.0, 20.0, 200.0, 100.0);
		assert_eq!(r.source_handle(), (110.0, 120.0));
		assert_eq!(r.target_handle(), (110.0, 20.0));

		let mut connect = ConnectState::default();
		connect.begin("a".into(), (1.0, 2.0));
		assert_eq!(connect.finish(), Some("a".to_string()));
		assert_eq!(connect.finish(), None);
	}

	#[test]
	fn transform_css() {
		let t = ViewTransform { x: 12.5, y: -4.0, k: 1.5 };
		assert_eq!(t.to_css(), "translate(12.5px, -4px) scale(1.5)");
	}
}
