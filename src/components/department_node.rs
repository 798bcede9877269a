//! Department card shown on the diagram surface.
//!
//! Lists the department's roles and the employees assigned to each. Every
//! employee row has a `mod` toggle that swaps its description for an inline
//! editor; which editors are open is local to the card.

use std::collections::HashSet;
use std::sync::Arc;

use leptos::prelude::*;
use web_sys::{Event, MouseEvent};

use crate::chart::Intent;
use crate::chart::model::{DepartmentId, Employee, EmployeeId, Role, RoleId};
use crate::components::ChartHandle;
use crate::components::org_flow::FlowNode;
use crate::components::org_flow::adapter::node_dom_id;

/// Card width at size 1.
const CARD_WIDTH: f64 = 240.0;
/// Body font size at size 1.
const CARD_FONT_SIZE: f64 = 14.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EditorKey {
	role: RoleId,
	employee: EmployeeId,
}

type OpenEditors = RwSignal<HashSet<EditorKey>>;

fn card_style(node: &FlowNode) -> String {
	let scale = node.data.size;
	format!(
		"left: {}px; top: {}px; border-color: {}; width: {}px; font-size: {}px;",
		node.position.x,
		node.position.y,
		node.data.color,
		CARD_WIDTH * scale,
		CARD_FONT_SIZE * scale,
	)
}

/// Card for department `id`, read from the surface's node records.
#[component]
pub fn DepartmentNode(
	id: DepartmentId,
	nodes: Memo<Vec<FlowNode>>,
	chart: ChartHandle,
) -> impl IntoView {
	let department = StoredValue::new(id.clone());
	let node = Memo::new(move |_| {
		department.with_value(|id| nodes.with(|nodes| nodes.iter().find(|n| &n.id == id).cloned()))
	});
	let selected = Memo::new(move |_| {
		department.with_value(|id| chart.with(|s| s.selection().department.as_ref() == Some(id)))
	});
	let role_ids = Memo::new(move |_| {
		node.with(|n| {
			n.iter()
				.flat_map(|n| n.data.roles.iter().map(|r| r.id.clone()))
				.collect::<Vec<_>>()
		})
	});
	let open_editors: OpenEditors = RwSignal::new(HashSet::new());

	let read = move |field: fn(&FlowNode) -> String| {
		move || node.with(|n| n.as_ref().map(field).unwrap_or_default())
	};
	let style = read(card_style);
	let header_color = read(|n| n.data.color.clone());
	let name = read(|n| n.data.name.clone());

	view! {
		<div
			id=node_dom_id(&id)
			class="flow-node department-node"
			class:selected=move || selected.get()
			data-node-id=id.clone()
			style=style
		>
			<div
				class="flow-handle flow-handle-target"
				data-handle="target"
				data-node-id=id.clone()
			></div>
			<div class="department-header" style:background-color=header_color>
				<h3>{name}</h3>
			</div>
			<div class="department-body">
				<Show
					when=move || role_ids.with(|ids| !ids.is_empty())
					fallback=|| view! { <p class="empty-state">"Nessuna mansione aggiunta"</p> }
				>
					<ul class="role-list">
						<For
							each=move || role_ids.get()
							key=|id| id.clone()
							children=move |role_id| {
								view! {
									<RoleItem
										department=department
										role_id=role_id
										node=node
										open_editors=open_editors
										chart=chart
									/>
								}
							}
						/>
					</ul>
				</Show>
			</div>
			<div
				class="flow-handle flow-handle-source"
				data-handle="source"
				data-node-id=id.clone()
			></div>
		</div>
	}
}

#[component]
fn RoleItem(
	department: StoredValue<DepartmentId>,
	role_id: RoleId,
	node: Memo<Option<FlowNode>>,
	open_editors: OpenEditors,
	chart: ChartHandle,
) -> impl IntoView {
	let role_key = StoredValue::new(role_id);
	let role: Memo<Option<Arc<Role>>> = Memo::new(move |_| {
		role_key.with_value(|id| {
			node.with(|n| {
				n.as_ref()
					.and_then(|n| n.data.roles.iter().find(|r| &r.id == id).cloned())
			})
		})
	});
	let employee_ids = Memo::new(move |_| {
		role.with(|r| {
			r.iter()
				.flat_map(|r| r.employees.iter().map(|e| e.id.clone()))
				.collect::<Vec<_>>()
		})
	});
	let role_name = move || role.with(|r| r.as_ref().map(|r| r.name.clone()).unwrap_or_default());

	view! {
		<li>
			<span class="role-name">{role_name}</span>
			<Show
				when=move || employee_ids.with(|ids| !ids.is_empty())
				fallback=|| view! { <p class="empty-state">"Nessun dipendente assegnato"</p> }
			>
				<ul class="employee-list">
					<For
						each=move || employee_ids.get()
						key=|id| id.clone()
						children=move |employee_id| {
							view! {
								<EmployeeItem
									department=department
									role_key=role_key
									employee_id=employee_id
									role=role
									open_editors=open_editors
									chart=chart
								/>
							}
						}
					/>
				</ul>
			</Show>
		</li>
	}
}

#[component]
fn EmployeeItem(
	department: StoredValue<DepartmentId>,
	role_key: StoredValue<RoleId>,
	employee_id: EmployeeId,
	role: Memo<Option<Arc<Role>>>,
	open_editors: OpenEditors,
	chart: ChartHandle,
) -> impl IntoView {
	let key = StoredValue::new(EditorKey {
		role: role_key.get_value(),
		employee: employee_id,
	});
	let employee: Memo<Option<Arc<Employee>>> = Memo::new(move |_| {
		key.with_value(|key| {
			role.with(|r| {
				r.as_ref()
					.and_then(|r| r.employees.iter().find(|e| e.id == key.employee).cloned())
			})
		})
	});
	let is_open = Memo::new(move |_| {
		key.with_value(|key| open_editors.with(|open| open.contains(key)))
	});
	let read = move |field: fn(&Employee) -> String| {
		move || employee.with(|e| e.as_deref().map(field).unwrap_or_default())
	};
	let employee_name = read(|e| e.name.clone());
	let description = read(|e| e.description.clone());
	let show_description = move || {
		!is_open.get() && employee.with(|e| e.as_ref().is_some_and(|e| !e.description.is_empty()))
	};

	let toggle_editor = move |ev: MouseEvent| {
		ev.stop_propagation();
		let key = key.get_value();
		open_editors.update(|open| {
			if !open.remove(&key) {
				open.insert(key);
			}
		});
	};

	let on_input = move |ev: Event| {
		let key = key.get_value();
		chart.dispatch(Intent::UpdateEmployeeDescription {
			department: department.get_value(),
			role: key.role,
			employee: key.employee,
			text: event_target_value(&ev),
		});
	};

	view! {
		<li class="employee-item">
			<div class="employee-header">
				<span>{employee_name}</span>
				<button
					type="button"
					class="employee-edit-button nodrag"
					on:click=toggle_editor
					aria-label=move || format!("Modifica descrizione per {}", employee_name())
				>
					"mod"
				</button>
			</div>
			<Show when=show_description>
				<p class="employee-description">{description}</p>
			</Show>
			<Show when=move || is_open.get()>
				<textarea
					class="employee-textarea nodrag"
					prop:value=description
					on:input=on_input
					placeholder="Descrivi la mansione in dettaglio"
				></textarea>
			</Show>
		</li>
	}
}
