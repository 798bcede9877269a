//! Interactive org-chart diagram.
//!
//! Departments render as draggable DOM cards over a canvas that paints the
//! dot grid and the reporting lines between them:
//! - Card dragging, canvas panning and wheel zoom within fixed bounds
//! - Dragging from a card's bottom handle onto another card's top handle
//!   connects the two departments
//! - Delete or Backspace removes the selected cards
//!
//! The surface never edits the chart itself. [`adapter`] turns the chart into
//! [`FlowNode`]/[`FlowEdge`] records and turns the surface's [`FlowEvent`]s
//! back into store intents.

pub mod adapter;
mod component;
mod render;
mod state;
pub mod theme;
mod types;

pub use component::OrgFlow;
pub use theme::FlowTheme;
pub use types::{
	DepartmentPayload, EdgeMarker, EdgeStyle, FlowEdge, FlowEvent, FlowNode, MarkerKind,
};
