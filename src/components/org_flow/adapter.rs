//! Translation between the chart model and the diagram surface.
//!
//! Forward: departments become [`FlowNode`]s and connections become
//! [`FlowEdge`]s that all share the theme's line style. Backward: surface
//! [`FlowEvent`]s become store [`Intent`]s.

use crate::chart::model::{Chart, Connection};
use crate::chart::store::Intent;

use super::theme::FlowTheme;
use super::types::{DepartmentPayload, FlowEdge, FlowEvent, FlowNode};

/// DOM id of the card rendered for department `id`.
pub fn node_dom_id(id: &str) -> String {
	format!("org-node-{id}")
}

pub fn flow_nodes(chart: &Chart) -> Vec<FlowNode> {
	chart
		.departments
		.iter()
		.map(|dept| FlowNode {
			id: dept.id.clone(),
			position: dept.position,
			data: DepartmentPayload {
				name: dept.name.clone(),
				color: dept.color.clone(),
				roles: dept.roles.clone(),
				size: dept.size,
			},
		})
		.collect()
}

/// Edge record for one connection, styled uniformly from `theme`.
pub fn flow_edge(connection: &Connection, theme: &FlowTheme) -> FlowEdge {
	FlowEdge {
		id: connection.id.clone(),
		source: connection.source.clone(),
		target: connection.target.clone(),
		animated: true,
		style: theme.edge,
		marker_end: theme.marker,
	}
}

pub fn flow_edges(chart: &Chart, theme: &FlowTheme) -> Vec<FlowEdge> {
	chart
		.connections
		.iter()
		.map(|conn| flow_edge(conn, theme))
		.collect()
}

/// Store intents for a surface event. A selection change focuses the first
/// selected card, or clears the focus when nothing is selected.
pub fn intents_for(event: FlowEvent) -> Vec<Intent> {
	match event {
		FlowEvent::NodeDragged { id, position } => vec![Intent::MoveDepartment {
			department: id,
			position,
		}],
		FlowEvent::Connected { source, target } => vec![Intent::Connect { source, target }],
		FlowEvent::SelectionChanged(ids) => {
			vec![Intent::SelectDepartment(ids.into_iter().next())]
		}
		FlowEvent::NodesDeleted(ids) => vec![Intent::RemoveDepartments(ids)],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::model::Position;
	use crate::chart::seed::{sample_chart, sample_shortcuts};
	use crate::chart::store::ChartStore;
	use crate::components::org_flow::types::MarkerKind;

	fn store() -> ChartStore {
		ChartStore::new(sample_chart(), sample_shortcuts())
	}

	fn dispatch(store: &mut ChartStore, event: FlowEvent) {
		for intent in intents_for(event) {
			store.apply(intent).unwrap();
		}
	}

	#[test]
	fn nodes_mirror_departments() {
		let chart = sample_chart();
		let nodes = flow_nodes(&chart);
		assert_eq!(nodes.len(), 3);
		for (node, dept) in nodes.iter().zip(&chart.departments) {
			assert_eq!(node.id, dept.id);
			assert_eq!(node.position, dept.position);
			assert_eq!(node.data.name, dept.name);
			assert_eq!(node.data.size, dept.size);
			assert_eq!(node.data.roles, dept.roles);
		}
		assert_eq!(node_dom_id("vendite"), "org-node-vendite");
	}

	#[test]
	fn every_edge_gets_the_same_style() {
		let theme = FlowTheme::default();
		let (chart, id) = sample_chart().connect("vendite", "vendite").unwrap();
		let edges = flow_edges(&chart, &theme);
		assert_eq!(edges.len(), 3);
		assert_eq!(edges[2].id, id);
		for edge in &edges {
			assert!(edge.animated);
			assert_eq!(edge.style.stroke.to_css(), "#0f172a");
			assert_eq!(edge.style.stroke_width, 3.0);
			assert_eq!(edge.marker_end.kind, MarkerKind::ArrowClosed);
			assert_eq!((edge.marker_end.width, edge.marker_end.height), (28.0, 28.0));
		}
	}

	#[test]
	fn drag_only_moves() {
		let mut store = store();
		let before = store.chart().department("produzione").unwrap().clone();
		dispatch(
			&mut store,
			FlowEvent::NodeDragged {
				id: "produzione".into(),
				position: Position::new(500.0, 300.0),
			},
		);
		let after = store.chart().department("produzione").unwrap();
		assert_eq!(after.position, Position::new(500.0, 300.0));
		assert_eq!(after.name, before.name);
		assert!(std::sync::Arc::ptr_eq(&after.roles[0], &before.roles[0]));
	}

	#[test]
	fn selection_takes_first_node() {
		let mut store = store();
		dispatch(
			&mut store,
			FlowEvent::SelectionChanged(vec!["vendite".into(), "produzione".into()]),
		);
		assert_eq!(store.selection().department.as_deref(), Some("vendite"));

		dispatch(&mut store, FlowEvent::SelectionChanged(Vec::new()));
		assert_eq!(store.selection().department, None);
	}

	#[test]
	fn connecting_and_deleting() {
		let mut store = store();
		dispatch(
			&mut store,
			FlowEvent::Connected {
				source: "vendite".into(),
				target: "produzione".into(),
			},
		);
		assert_eq!(store.chart().connections.len(), 3);

		dispatch(&mut store, FlowEvent::SelectionChanged(vec!["produzione".into()]));
		dispatch(&mut store, FlowEvent::NodesDeleted(vec!["produzione".into()]));
		assert_eq!(store.chart().departments.len(), 2);
		assert_eq!(store.chart().connections.len(), 1);
		assert_eq!(store.selection().department, None);
	}
}
