//! Side panel: department, role and employee forms, editing of the selected
//! department, background color and the shortcut table.
//!
//! Forms keep their drafts in local signals and dispatch only once the
//! trimmed name is non-empty and every required select has a value.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use web_sys::{Event, MouseEvent};

use crate::chart::model::{NODE_MAX_SCALE, NODE_MIN_SCALE, RoleId};
use crate::chart::{DepartmentPatch, Intent};
use crate::components::ChartHandle;
use crate::components::shortcut_table::ShortcutTable;

/// Department palette.
pub const COLORS: [&str; 6] = ["#0ea5e9", "#7c3aed", "#f97316", "#10b981", "#ef4444", "#6366f1"];

const SIZE_STEP: f64 = 0.1;
/// Size buttons disable this close to a bound.
const SIZE_EPSILON: f64 = 0.01;

type Options = Memo<Vec<(String, String)>>;

/// Whether a card of `size` can still shrink by a step.
fn can_shrink(size: f64) -> bool {
	size > NODE_MIN_SCALE + SIZE_EPSILON
}

/// Whether a card of `size` can still grow by a step.
fn can_grow(size: f64) -> bool {
	size < NODE_MAX_SCALE - SIZE_EPSILON
}

fn trimmed(draft: RwSignal<String>) -> Option<String> {
	let value = draft.with_untracked(|d| d.trim().to_string());
	(!value.is_empty()).then_some(value)
}

fn non_empty(value: RwSignal<String>) -> Option<String> {
	let value = value.get_untracked();
	(!value.is_empty()).then_some(value)
}

fn bind(draft: RwSignal<String>) -> impl Fn(Event) + Copy {
	move |ev: Event| draft.set(event_target_value(&ev))
}

#[component]
fn ColorPicker(selected: RwSignal<String>) -> impl IntoView {
	view! {
		<div class="color-picker">
			<span>"Colore"</span>
			<div class="color-options">
				{COLORS
					.into_iter()
					.map(|color| {
						view! {
							<button
								type="button"
								class:active=move || selected.with(|s| s == color)
								style:background-color=color
								on:click=move |_| selected.set(color.to_string())
								aria-label=format!("Seleziona colore {color}")
							></button>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

/// `<option>` list with a leading placeholder.
#[component]
fn OptionList(options: Options, placeholder: &'static str) -> impl IntoView {
	view! {
		<option value="">{placeholder}</option>
		<For
			each=move || options.get()
			key=|option| option.clone()
			children=|(id, name)| view! { <option value=id>{name}</option> }
		/>
	}
}

#[component]
pub fn Sidebar(
	chart: ChartHandle,
	background: RwSignal<String>,
	show_shortcuts: RwSignal<bool>,
) -> impl IntoView {
	let departments: Options = Memo::new(move |_| {
		chart.with(|s| {
			s.chart()
				.departments
				.iter()
				.map(|d| (d.id.clone(), d.name.clone()))
				.collect()
		})
	});
	let no_departments = Signal::derive(move || departments.with(Vec::is_empty));

	view! {
		<aside class="sidebar">
			<h2>"Gestione Reparti"</h2>
			<CreateDepartment chart=chart />
			<AddRole chart=chart departments=departments disabled=no_departments />
			<AssignEmployee chart=chart departments=departments disabled=no_departments />
			<EditSelected chart=chart />
			<section>
				<h3>"Personalizza sfondo"</h3>
				<div class="sidebar-form background-form">
					<label class="background-color-field">
						"Colore base"
						<input
							type="color"
							prop:value=move || background.get()
							on:input=bind(background)
							aria-label="Seleziona colore di sfondo"
						/>
					</label>
				</div>
			</section>
			<ShortcutTable chart=chart show=show_shortcuts />
		</aside>
	}
}

#[component]
fn CreateDepartment(chart: ChartHandle) -> impl IntoView {
	let name = RwSignal::new(String::new());
	let color = RwSignal::new(COLORS[0].to_string());

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let Some(trimmed_name) = trimmed(name) else {
			return;
		};
		chart.dispatch(Intent::AddDepartment {
			name: trimmed_name,
			color: color.get_untracked(),
		});
		name.set(String::new());
	};

	view! {
		<section>
			<h3>"Crea nuovo reparto"</h3>
			<form class="sidebar-form" on:submit=on_submit>
				<label>
					"Nome"
					<input
						type="text"
						prop:value=move || name.get()
						on:input=bind(name)
						placeholder="Es. Produzione"
					/>
				</label>
				<ColorPicker selected=color />
				<button type="submit" class="primary">"Aggiungi reparto"</button>
			</form>
		</section>
	}
}

#[component]
fn AddRole(chart: ChartHandle, departments: Options, disabled: Signal<bool>) -> impl IntoView {
	let department = RwSignal::new(String::new());
	let name = RwSignal::new(String::new());

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let (Some(role_name), Some(department)) = (trimmed(name), non_empty(department)) else {
			return;
		};
		chart.dispatch(Intent::AddRole {
			department,
			name: role_name,
		});
		name.set(String::new());
	};

	view! {
		<section>
			<h3>"Aggiungi mansione"</h3>
			<form class="sidebar-form" on:submit=on_submit>
				<label>
					"Reparto"
					<select prop:value=move || department.get() on:change=bind(department)>
						<OptionList options=departments placeholder="Seleziona reparto" />
					</select>
				</label>
				<label>
					"Mansione"
					<input
						type="text"
						prop:value=move || name.get()
						on:input=bind(name)
						placeholder="Es. Responsabile di linea"
					/>
				</label>
				<button type="submit" disabled=move || disabled.get()>"Aggiungi mansione"</button>
			</form>
		</section>
	}
}

#[component]
fn AssignEmployee(
	chart: ChartHandle,
	departments: Options,
	disabled: Signal<bool>,
) -> impl IntoView {
	let department = RwSignal::new(String::new());
	let role = RwSignal::new(String::new());
	let name = RwSignal::new(String::new());

	let roles: Options = Memo::new(move |_| {
		department.with(|id| {
			chart.with(|s| {
				s.chart()
					.department(id)
					.map(|d| d.roles.iter().map(|r| (r.id.clone(), r.name.clone())).collect())
					.unwrap_or_default()
			})
		})
	});

	let on_department_change = move |ev: Event| {
		department.set(event_target_value(&ev));
		role.set(String::new());
	};

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let (Some(employee_name), Some(department), Some(role)) =
			(trimmed(name), non_empty(department), non_empty(role))
		else {
			return;
		};
		chart.dispatch(Intent::AddEmployee {
			department,
			role,
			name: employee_name,
		});
		name.set(String::new());
	};

	view! {
		<section>
			<h3>"Assegna dipendente"</h3>
			<form class="sidebar-form" on:submit=on_submit>
				<label>
					"Reparto"
					<select prop:value=move || department.get() on:change=on_department_change>
						<OptionList options=departments placeholder="Seleziona reparto" />
					</select>
				</label>
				<label>
					"Mansione"
					<select
						prop:value=move || role.get()
						on:change=bind(role)
						disabled=move || department.with(String::is_empty)
					>
						<OptionList options=roles placeholder="Seleziona mansione" />
					</select>
				</label>
				<label>
					"Dipendente"
					<input
						type="text"
						prop:value=move || name.get()
						on:input=bind(name)
						placeholder="Es. Mario Rossi"
					/>
				</label>
				<button type="submit" disabled=move || disabled.get()>"Aggiungi dipendente"</button>
			</form>
		</section>
	}
}

/// Editor for the selected department and its roles. Hidden without a
/// selection.
#[component]
fn EditSelected(chart: ChartHandle) -> impl IntoView {
	let selected = Memo::new(move |_| {
		chart.with(|s| {
			s.selection()
				.department(s.chart())
				.map(|d| (d.id.clone(), d.name.clone(), d.color.clone(), d.size))
		})
	});
	let selected_role = Memo::new(move |_| {
		chart.with(|s| s.selection().role(s.chart()).map(|r| (r.id.clone(), r.name.clone())))
	});
	let roles: Options = Memo::new(move |_| {
		chart.with(|s| {
			s.selection()
				.department(s.chart())
				.map(|d| d.roles.iter().map(|r| (r.id.clone(), r.name.clone())).collect())
				.unwrap_or_default()
		})
	});

	let edit_name = RwSignal::new(String::new());
	let edit_color = RwSignal::new(COLORS[0].to_string());
	let edit_role_name = RwSignal::new(String::new());

	// Drafts follow the selection.
	Effect::new(move |_| match selected.get() {
		Some((_, name, color, _)) => {
			edit_name.set(name);
			edit_color.set(color);
		}
		None => {
			edit_name.set(String::new());
			edit_color.set(COLORS[0].to_string());
		}
	});
	Effect::new(move |_| {
		edit_role_name.set(selected_role.get().map(|(_, name)| name).unwrap_or_default());
	});

	let selected_id = move || selected.with_untracked(|s| s.as_ref().map(|(id, ..)| id.clone()));
	let size = move || selected.with(|s| s.as_ref().map_or(1.0, |(.., size)| *size));
	let shrink_disabled = move || !can_shrink(size());
	let grow_disabled = move || !can_grow(size());
	let percent = move || format!("{}%", (size() * 100.0).round());

	let resize = move |delta: f64| {
		move |_: MouseEvent| {
			if let Some(department) = selected_id() {
				chart.dispatch(Intent::ResizeDepartment { department, delta });
			}
		}
	};

	let on_edit_department = move |ev: SubmitEvent| {
		ev.prevent_default();
		let (Some(department), Some(name)) = (selected_id(), trimmed(edit_name)) else {
			return;
		};
		chart.dispatch(Intent::UpdateDepartment {
			department,
			patch: DepartmentPatch::default().name(name).color(edit_color.get_untracked()),
		});
	};

	let on_edit_role = move |ev: SubmitEvent| {
		ev.prevent_default();
		let role = selected_role.with_untracked(|r| r.as_ref().map(|(id, _)| id.clone()));
		let (Some(department), Some(role), Some(name)) =
			(selected_id(), role, trimmed(edit_role_name))
		else {
			return;
		};
		chart.dispatch(Intent::UpdateRole { department, role, name });
	};

	view! {
		<Show when=move || selected.with(Option::is_some)>
			<section>
				<h3>"Modifica reparto selezionato"</h3>
				<form class="sidebar-form" on:submit=on_edit_department>
					<label>
						"Nome"
						<input
							type="text"
							prop:value=move || edit_name.get()
							on:input=bind(edit_name)
						/>
					</label>
					<ColorPicker selected=edit_color />
					<div class="size-controls">
						<span>"Dimensione nodo"</span>
						<div class="size-controls-buttons">
							<button
								type="button"
								on:click=resize(-SIZE_STEP)
								disabled=shrink_disabled
								aria-label="Riduci nodo"
							>
								"-"
							</button>
							<span class="size-display">{percent}</span>
							<button
								type="button"
								on:click=resize(SIZE_STEP)
								disabled=grow_disabled
								aria-label="Ingrandisci nodo"
							>
								"+"
							</button>
						</div>
					</div>
					<button type="submit" class="primary">"Aggiorna reparto"</button>
				</form>

				<div class="role-editor">
					<p class="role-editor-title">"Mansioni del reparto"</p>
					<div class="role-select-list">
						<Show
							when=move || roles.with(|r| !r.is_empty())
							fallback=|| {
								view! { <p class="empty-state">"Nessuna mansione disponibile"</p> }
							}
						>
							<For
								each=move || roles.get()
								key=|role| role.clone()
								children=move |(id, name)| {
									view! { <RoleSelectButton chart=chart id=id name=name /> }
								}
							/>
						</Show>
					</div>

					<Show when=move || selected_role.with(Option::is_some)>
						<form class="sidebar-form role-edit-form" on:submit=on_edit_role>
							<label>
								"Nome mansione"
								<input
									type="text"
									prop:value=move || edit_role_name.get()
									on:input=bind(edit_role_name)
								/>
							</label>
							<button type="submit" class="primary">"Aggiorna mansione"</button>
						</form>
					</Show>
				</div>
			</section>
		</Show>
	}
}

/// Toggles role `id` as the selected role.
#[component]
fn RoleSelectButton(chart: ChartHandle, id: RoleId, name: String) -> impl IntoView {
	let id = StoredValue::new(id);
	let active = Memo::new(move |_| {
		id.with_value(|id| chart.with(|s| s.selection().role.as_ref() == Some(id)))
	});

	view! {
		<button
			type="button"
			class="role-select-button"
			class:active=move || active.get()
			on:click=move |_| {
				let next = (!active.get_untracked()).then(|| id.get_value());
				chart.dispatch(Intent::SelectRole(next));
			}
		>
			{name}
		</button>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_colors_are_valid() {
		for color in COLORS {
			assert_eq!(crate::chart::color::adjust_hex_color(color, 0).unwrap(), color);
		}
	}

	#[test]
	fn size_buttons_follow_bounds() {
		assert!(can_grow(1.0));
		assert!(can_shrink(1.0));
		assert!(can_grow(1.5));
		assert!(!can_grow(1.6));
		assert!(!can_grow(1.595));
		assert!(can_shrink(0.7));
		assert!(!can_shrink(0.6));
		assert!(!can_shrink(0.605));
	}

	#[test]
	fn every_step_from_the_default_size_is_reachable() {
		let mut size: f64 = 1.0;
		let mut grows = 0;
		while can_grow(size) {
			size = ((size + SIZE_STEP).min(NODE_MAX_SCALE) * 100.0).round() / 100.0;
			grows += 1;
		}
		assert_eq!(grows, 6);
		assert_eq!(size, NODE_MAX_SCALE);

		let mut shrinks = 0;
		while can_shrink(size) {
			size = ((size - SIZE_STEP).max(NODE_MIN_SCALE) * 100.0).round() / 100.0;
			shrinks += 1;
		}
		assert_eq!(shrinks, 10);
		assert_eq!(size, NODE_MIN_SCALE);
	}
}
