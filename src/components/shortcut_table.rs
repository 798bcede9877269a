//! Editable keyboard shortcut reference.

use leptos::prelude::*;
use web_sys::Event;

use crate::chart::model::ShortcutId;
use crate::chart::{Field, Intent, Shortcut, ShortcutPatch};
use crate::components::ChartHandle;

#[component]
pub fn ShortcutTable(chart: ChartHandle, show: RwSignal<bool>) -> impl IntoView {
	let shortcut_ids = Memo::new(move |_| {
		chart.with(|s| s.shortcuts().iter().map(|sc| sc.id.clone()).collect::<Vec<_>>())
	});

	view! {
		<section class="shortcuts">
			<div class="shortcuts-header">
				<h3>"Scorciatoie"</h3>
				<button
					type="button"
					class="shortcuts-toggle"
					on:click=move |_| show.update(|s| *s = !*s)
				>
					{move || if show.get() { "Nascondi" } else { "Mostra" }}
				</button>
			</div>
			<Show when=move || show.get()>
				<div class="shortcuts-wrapper">
					<table class="shortcuts-table">
						<thead>
							<tr>
								<th>"Azione"</th>
								<th>"Shortcut"</th>
							</tr>
						</thead>
						<tbody>
							<For
								each=move || shortcut_ids.get()
								key=|id| id.clone()
								children=move |id| view! { <ShortcutRow id=id chart=chart /> }
							/>
						</tbody>
					</table>
				</div>
			</Show>
		</section>
	}
}

#[component]
fn ShortcutRow(id: ShortcutId, chart: ChartHandle) -> impl IntoView {
	let id = StoredValue::new(id);
	let field = move |read: fn(&Shortcut) -> &str| {
		move || {
			id.with_value(|id| {
				chart.with(|s| {
					s.shortcuts()
						.iter()
						.find(|sc| &sc.id == id)
						.map(|sc| read(sc).to_string())
						.unwrap_or_default()
				})
			})
		}
	};
	let update = move |patch: fn(String) -> ShortcutPatch| {
		move |ev: Event| {
			chart.dispatch(Intent::UpdateShortcut {
				shortcut: id.get_value(),
				patch: patch(event_target_value(&ev)),
			})
		}
	};

	view! {
		<tr>
			<td>
				<input
					prop:value=field(|sc| sc.action.as_str())
					on:input=update(|action| ShortcutPatch {
						action: Field::Set(action),
						..Default::default()
					})
				/>
			</td>
			<td>
				<input
					prop:value=field(|sc| sc.keys.as_str())
					on:input=update(|keys| ShortcutPatch {
						keys: Field::Set(keys),
						..Default::default()
					})
				/>
			</td>
		</tr>
	}
}
