//! Leptos component hosting the org-chart diagram.
//!
//! The surface stacks a canvas (dot grid and reporting lines) under a card
//! layer of DOM department nodes. Pointer handlers on the wrapper translate
//! drags, pans, wheel zooms and handle-to-handle drags into [`FlowEvent`]s;
//! an animation loop via `requestAnimationFrame` measures the cards and
//! repaints the canvas each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlElement, KeyboardEvent,
	MouseEvent, WheelEvent,
};

use super::adapter::{self, flow_edges, flow_nodes, node_dom_id};
use super::render;
use super::state::{FlowState, NodeRect, ViewportConfig};
use super::theme::FlowTheme;
use super::types::{FlowEvent, FlowNode};
use crate::components::ChartHandle;
use crate::components::department_node::DepartmentNode;

const FRAME_DT: f64 = 0.016;

/// Bundles surface state with its visual theme.
struct SurfaceContext {
	state: FlowState,
	theme: FlowTheme,
}

type SharedContext = Rc<RefCell<Option<SurfaceContext>>>;

fn event_element(ev: &Event) -> Option<Element> {
	ev.target()?.dyn_into::<Element>().ok()
}

fn closest(element: Option<&Element>, selector: &str) -> Option<Element> {
	element?.closest(selector).ok().flatten()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

/// Refreshes the cached card boxes from the DOM.
fn measure_nodes(state: &mut FlowState, nodes: &[FlowNode]) {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	state.rects.clear();
	for node in nodes {
		let Some(element) = document
			.get_element_by_id(&node_dom_id(&node.id))
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
		else {
			continue;
		};
		state.rects.insert(
			node.id.clone(),
			NodeRect::new(
				node.position.x,
				node.position.y,
				element.offset_width() as f64,
				element.offset_height() as f64,
			),
		);
	}
}

/// Renders the interactive org chart.
///
/// Cards and lines come from `chart`; every interaction is dispatched back to
/// it as store intents. `grid_color` tints the dot grid.
#[component]
pub fn OrgFlow(chart: ChartHandle, #[prop(into)] grid_color: Signal<String>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init, keydown_cb_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		keydown_cb.clone(),
	);

	let theme = FlowTheme::default();
	let nodes = Memo::new(move |_| chart.with(|s| flow_nodes(s.chart())));
	let edges = {
		let theme = theme.clone();
		Memo::new(move |_| chart.with(|s| flow_edges(s.chart(), &theme)))
	};
	let node_ids = Memo::new(move |_| {
		nodes.with(|nodes| nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>())
	});
	let viewport = RwSignal::new(String::new());

	let emit = move |event: Option<FlowEvent>| {
		if let Some(event) = event {
			chart.dispatch_all(adapter::intents_for(event));
		}
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			warn!("org-flow: no window, surface disabled");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("org-flow: 2d canvas context unavailable");
				return;
			}
		};

		let state = FlowState::new(w, h, ViewportConfig::default());
		viewport.set(state.transform.to_css());
		*context_init.borrow_mut() = Some(SurfaceContext {
			state,
			theme: theme.clone(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let context_key = context_init.clone();
		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if !matches!(ev.key().as_str(), "Delete" | "Backspace") {
				return;
			}
			let target = event_element(&ev);
			if closest(target.as_ref(), "input, textarea, select, [contenteditable]").is_some() {
				return;
			}
			let deleted = match *context_key.borrow_mut() {
				Some(ref mut c) => c.state.take_selection(),
				None => return,
			};
			if !deleted.is_empty() {
				emit(Some(FlowEvent::NodesDeleted(deleted)));
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut alive = true;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(FRAME_DT);
				alive &= nodes
					.try_with_untracked(|nodes| measure_nodes(&mut c.state, nodes))
					.is_some();
				if c.state.needs_fit && c.state.fit_view() {
					c.state.needs_fit = false;
					let _ = viewport.try_set(c.state.transform.to_css());
				}
				let grid = grid_color.try_get_untracked().unwrap_or_default();
				alive &= edges
					.try_with_untracked(|edges| {
						render::render(&c.state, &ctx, &c.theme, edges, &grid)
					})
					.is_some();
			}
			if !alive {
				return;
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let target = event_element(&ev);

		let event = {
			let mut guard = context_md.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};

			if let Some(handle) = closest(target.as_ref(), ".flow-handle[data-handle=\"source\"]") {
				if let Some(source) = handle.get_attribute("data-node-id") {
					ev.prevent_default();
					let cursor = c.state.screen_to_graph(x, y);
					c.state.connect.begin(source, cursor);
				}
				return;
			}
			if closest(target.as_ref(), ".nodrag").is_some() {
				return;
			}

			let card = closest(target.as_ref(), ".flow-node")
				.and_then(|el| el.get_attribute("data-node-id"));
			match card {
				Some(id) => {
					let start =
						chart.with_untracked(|s| s.chart().department(&id).map(|d| d.position));
					if let Some(start) = start {
						c.state.drag.begin(id.clone(), x, y, start);
					}
					c.state.select(vec![id])
				}
				None => {
					c.state.pan.active = true;
					c.state.pan.start_x = x;
					c.state.pan.start_y = y;
					c.state.pan.transform_start_x = c.state.transform.x;
					c.state.pan.transform_start_y = c.state.transform.y;
					c.state.select(Vec::new())
				}
			}
		};
		emit(event.map(FlowEvent::SelectionChanged));
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};

		let event = {
			let mut guard = context_mm.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};

			if let Some((id, position)) = c.state.drag.drag_to(x, y, c.state.transform.k) {
				Some(FlowEvent::NodeDragged { id, position })
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
				viewport.set(c.state.transform.to_css());
				None
			} else {
				if c.state.connect.source.is_some() {
					c.state.connect.cursor = c.state.screen_to_graph(x, y);
				}
				None
			}
		};
		emit(event);
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let target = event_element(&ev);

		let event = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			c.state.drag.end();
			c.state.pan.active = false;

			c.state.connect.finish().and_then(|source| {
				closest(target.as_ref(), ".flow-handle[data-handle=\"target\"]")
					.and_then(|handle| handle.get_attribute("data-node-id"))
					.map(|target| FlowEvent::Connected { source, target })
			})
		};
		emit(event);
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.end();
			c.state.pan.active = false;
			c.state.connect.finish();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let step = c.state.config.zoom_step;
			let factor = if ev.delta_y() > 0.0 { 1.0 / step } else { step };
			c.state.zoom_at(x, y, factor);
			viewport.set(c.state.transform.to_css());
		}
	};

	let zoom_control = move |context: SharedContext, zoom: fn(&mut FlowState)| {
		move |_: MouseEvent| {
			if let Some(ref mut c) = *context.borrow_mut() {
				zoom(&mut c.state);
				viewport.set(c.state.transform.to_css());
			}
		}
	};
	let on_zoom_in = zoom_control(context.clone(), |s| s.zoom_by(s.config.zoom_step));
	let on_zoom_out = zoom_control(context.clone(), |s| s.zoom_by(1.0 / s.config.zoom_step));
	let on_fit = zoom_control(context.clone(), |s| {
		s.fit_view();
	});

	view! {
		<div
			class="org-flow"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		>
			<canvas node_ref=canvas_ref class="org-flow-canvas" />
			<div class="org-flow-viewport" style:transform=move || viewport.get()>
				<For
					each=move || node_ids.get()
					key=|id| id.clone()
					children=move |id| view! { <DepartmentNode id=id nodes=nodes chart=chart /> }
				/>
			</div>
			<div class="org-flow-controls nodrag">
				<button type="button" title="Ingrandisci" on:click=on_zoom_in>"+"</button>
				<button type="button" title="Riduci" on:click=on_zoom_out>"−"</button>
				<button type="button" title="Adatta alla vista" on:click=on_fit>"⤢"</button>
			</div>
		</div>
	}
}
