//! The application's single owner of chart state.
//!
//! Both the side panel and the diagram surface describe what they want as an
//! [`Intent`]. [`ChartStore::apply`] runs the matching operation, swaps in the
//! resulting chart wholesale and reconciles the selection before returning,
//! so readers never observe a selection that points at a removed record.

use std::sync::Arc;

use log::{Level, log, warn};

use super::model::{Chart, DepartmentId, EmployeeId, Position, RoleId, Shortcut, ShortcutId};
use super::ops::{ChartError, DepartmentPatch, ShortcutPatch, update_shortcut};
use super::selection::Selection;

/// A requested change to the chart, the selection or the shortcut table.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
	AddDepartment {
		name: String,
		color: String,
	},
	AddRole {
		department: DepartmentId,
		name: String,
	},
	AddEmployee {
		department: DepartmentId,
		role: RoleId,
		name: String,
	},
	UpdateDepartment {
		department: DepartmentId,
		patch: DepartmentPatch,
	},
	ResizeDepartment {
		department: DepartmentId,
		delta: f64,
	},
	MoveDepartment {
		department: DepartmentId,
		position: Position,
	},
	RemoveDepartments(Vec<DepartmentId>),
	UpdateRole {
		department: DepartmentId,
		role: RoleId,
		name: String,
	},
	RenameEmployee {
		department: DepartmentId,
		role: RoleId,
		employee: EmployeeId,
		name: String,
	},
	UpdateEmployeeDescription {
		department: DepartmentId,
		role: RoleId,
		employee: EmployeeId,
		text: String,
	},
	Connect {
		source: DepartmentId,
		target: DepartmentId,
	},
	SelectDepartment(Option<DepartmentId>),
	SelectRole(Option<RoleId>),
	UpdateShortcut {
		shortcut: ShortcutId,
		patch: ShortcutPatch,
	},
}

impl Intent {
	/// Intents fired on every pointer move or keystroke.
	pub fn is_continuous(&self) -> bool {
		matches!(
			self,
			Intent::MoveDepartment { .. }
				| Intent::UpdateEmployeeDescription { .. }
				| Intent::UpdateShortcut { .. }
		)
	}
}

/// Chart, selection and shortcut table, replaced as a whole on every change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartStore {
	chart: Chart,
	selection: Selection,
	shortcuts: Vec<Arc<Shortcut>>,
}

impl ChartStore {
	pub fn new(chart: Chart, shortcuts: Vec<Arc<Shortcut>>) -> Self {
		Self {
			chart,
			selection: Selection::default(),
			shortcuts,
		}
	}

	pub fn chart(&self) -> &Chart {
		&self.chart
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn shortcuts(&self) -> &[Arc<Shortcut>] {
		&self.shortcuts
	}

	/// Applies one intent. On error nothing changes; the error is logged and
	/// handed back for callers that care. Continuous intents log at `trace`.
	pub fn apply(&mut self, intent: Intent) -> Result<(), ChartError> {
		let level = if intent.is_continuous() {
			Level::Trace
		} else {
			Level::Debug
		};
		let result = self.try_apply(intent.clone());
		match &result {
			Ok(()) => log!(level, "org-flow: applied {intent:?}"),
			Err(e) => warn!("org-flow: ignored {intent:?}: {e}"),
		}
		result
	}

	fn try_apply(&mut self, intent: Intent) -> Result<(), ChartError> {
		let chart = &self.chart;
		let next = match intent {
			Intent::AddDepartment { name, color } => chart.add_department(name, color).0,
			Intent::AddRole { department, name } => chart.add_role(&department, name)?.0,
			Intent::AddEmployee {
				department,
				role,
				name,
			} => chart.add_employee(&department, &role, name)?.0,
			Intent::UpdateDepartment { department, patch } => {
				chart.update_department(&department, patch)?
			}
			Intent::ResizeDepartment { department, delta } => {
				chart.resize_department(&department, delta)?
			}
			Intent::MoveDepartment {
				department,
				position,
			} => chart.move_department(&department, position)?,
			Intent::RemoveDepartments(ids) => chart.remove_departments(&ids),
			Intent::UpdateRole {
				department,
				role,
				name,
			} => chart.update_role(&department, &role, name)?,
			Intent::RenameEmployee {
				department,
				role,
				employee,
				name,
			} => chart.rename_employee(&department, &role, &employee, name)?,
			Intent::UpdateEmployeeDescription {
				department,
				role,
				employee,
				text,
			} => chart.update_employee_description(&department, &role, &employee, text)?,
			Intent::Connect { source, target } => chart.connect(&source, &target)?.0,
			Intent::SelectDepartment(department) => {
				self.selection = self.selection.clone().select_department(department);
				chart.clone()
			}
			Intent::SelectRole(role) => {
				self.selection = self.selection.clone().select_role(role);
				chart.clone()
			}
			Intent::UpdateShortcut { shortcut, patch } => {
				self.shortcuts = update_shortcut(&self.shortcuts, &shortcut, patch)?;
				return Ok(());
			}
		};

		self.chart = next;
		self.selection = self.selection.clone().reconcile(&self.chart);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::chart::ops::Field;
	use crate::chart::seed::{sample_chart, sample_shortcuts};

	fn store() -> ChartStore {
		ChartStore::new(sample_chart(), sample_shortcuts())
	}

	#[test]
	fn failed_intent_leaves_state_alone() {
		let mut store = store();
		let before = store.clone();
		let err = store
			.apply(Intent::AddRole {
				department: "ghost".into(),
				name: "Ruolo".into(),
			})
			.unwrap_err();
		assert_eq!(err, ChartError::DepartmentNotFound("ghost".into()));
		assert_eq!(store, before);
		assert!(Arc::ptr_eq(&store.chart().departments[0], &before.chart().departments[0]));
	}

	#[test]
	fn scenario_through_intents() {
		let mut store = store();
		store
			.apply(Intent::AddDepartment {
				name: "HR".into(),
				color: "#10b981".into(),
			})
			.unwrap();
		let hr = store.chart().departments[3].id.clone();

		store
			.apply(Intent::AddRole {
				department: hr.clone(),
				name: "Recruiting".into(),
			})
			.unwrap();
		let recruiting = store.chart().departments[3].roles[0].id.clone();

		store
			.apply(Intent::AddEmployee {
				department: hr.clone(),
				role: recruiting,
				name: "Giulia Rossi".into(),
			})
			.unwrap();

		let dept = store.chart().department(&hr).unwrap();
		assert_eq!(dept.position, Position::new(-220.0, 480.0));
		assert_eq!(dept.roles[0].name, "Recruiting");
		assert_eq!(dept.roles[0].employees[0].name, "Giulia Rossi");
	}

	#[test]
	fn selection_follows_mutations() {
		let mut store = store();
		let dept = store.chart().departments[1].clone();
		store
			.apply(Intent::SelectDepartment(Some(dept.id.clone())))
			.unwrap();
		store
			.apply(Intent::SelectRole(Some(dept.roles[0].id.clone())))
			.unwrap();
		assert_eq!(store.selection().role.as_ref(), Some(&dept.roles[0].id));

		store
			.apply(Intent::SelectDepartment(Some(dept.id.clone())))
			.unwrap();
		assert_eq!(store.selection().role, None);

		store
			.apply(Intent::RemoveDepartments(vec![dept.id.clone()]))
			.unwrap();
		assert_eq!(store.selection(), &Selection::default());
	}

	#[test]
	fn foreign_role_is_dropped_on_select() {
		let mut store = store();
		let (a, b) = (
			store.chart().departments[0].clone(),
			store.chart().departments[2].clone(),
		);
		store.apply(Intent::SelectDepartment(Some(a.id.clone()))).unwrap();
		store.apply(Intent::SelectRole(Some(b.roles[0].id.clone()))).unwrap();
		assert_eq!(store.selection().department.as_ref(), Some(&a.id));
		assert_eq!(store.selection().role, None);
	}

	#[test]
	fn shortcuts_are_editable() {
		let mut store = store();
		store
			.apply(Intent::UpdateShortcut {
				shortcut: "toggle-shortcuts".into(),
				patch: ShortcutPatch {
					action: Field::Set("Scorciatoie".into()),
					..Default::default()
				},
			})
			.unwrap();
		assert_eq!(store.shortcuts()[3].action, "Scorciatoie");
		assert_eq!(store.shortcuts()[3].keys, "Ctrl + /");
	}

	#[test]
	fn only_structural_intents_log_at_debug() {
		let drag = Intent::MoveDepartment {
			department: "vendite".into(),
			position: Position::new(1.0, 2.0),
		};
		let typing = Intent::UpdateEmployeeDescription {
			department: "vendite".into(),
			role: "r".into(),
			employee: "e".into(),
			text: "x".into(),
		};
		let shortcut = Intent::UpdateShortcut {
			shortcut: "s".into(),
			patch: ShortcutPatch::default(),
		};
		assert!(drag.is_continuous());
		assert!(typing.is_continuous());
		assert!(shortcut.is_continuous());

		assert!(!Intent::RemoveDepartments(Vec::new()).is_continuous());
		assert!(!Intent::SelectDepartment(None).is_continuous());
		assert!(
			!Intent::Connect {
				source: "a".into(),
				target: "b".into(),
			}
			.is_continuous()
		);
	}

	#[test]
	fn connect_and_drag() {
		let mut store = store();
		store
			.apply(Intent::Connect {
				source: "vendite".into(),
				target: "produzione".into(),
			})
			.unwrap();
		store
			.apply(Intent::MoveDepartment {
				department: "vendite".into(),
				position: Position::new(1.0, 2.0),
			})
			.unwrap();
		assert_eq!(store.chart().connections.len(), 3);
		let vendite = store.chart().department("vendite").unwrap();
		assert_eq!(vendite.position, Position::new(1.0, 2.0));
		assert_eq!(vendite.name, "Vendite");
	}

	/// Intent shape with indices resolved against the chart at apply time.
	#[derive(Clone, Debug)]
	enum Step {
		AddDepartment,
		AddRole(usize),
		AddEmployee(usize, usize),
		Remove(usize),
		SelectDepartment(Option<usize>),
		SelectRole(usize, usize),
		Connect(usize, usize),
	}

	fn step() -> impl Strategy<Value = Step> {
		prop_oneof![
			Just(Step::AddDepartment),
			any::<usize>().prop_map(Step::AddRole),
			any::<(usize, usize)>().prop_map(|(d, r)| Step::AddEmployee(d, r)),
			any::<usize>().prop_map(Step::Remove),
			prop::option::of(any::<usize>()).prop_map(Step::SelectDepartment),
			any::<(usize, usize)>().prop_map(|(d, r)| Step::SelectRole(d, r)),
			any::<(usize, usize)>().prop_map(|(a, b)| Step::Connect(a, b)),
		]
	}

	fn department_id(chart: &Chart, index: usize) -> DepartmentId {
		let departments = &chart.departments;
		departments
			.get(index % (departments.len() + 1))
			.map_or_else(|| "ghost".to_string(), |d| d.id.clone())
	}

	fn role_id(chart: &Chart, department: usize, index: usize) -> RoleId {
		chart
			.department(&department_id(chart, department))
			.and_then(|d| d.roles.get(index % (d.roles.len() + 1)))
			.map_or_else(|| "ghost".to_string(), |r| r.id.clone())
	}

	fn intent(chart: &Chart, step: &Step) -> Intent {
		let dept = |index| department_id(chart, index);
		match *step {
			Step::AddDepartment => Intent::AddDepartment {
				name: "Reparto".into(),
				color: "#6366f1".into(),
			},
			Step::AddRole(d) => Intent::AddRole {
				department: dept(d),
				name: "Ruolo".into(),
			},
			Step::AddEmployee(d, r) => Intent::AddEmployee {
				department: dept(d),
				role: role_id(chart, d, r),
				name: "Nome".into(),
			},
			Step::Remove(d) => Intent::RemoveDepartments(vec![dept(d)]),
			Step::SelectDepartment(d) => Intent::SelectDepartment(d.map(dept)),
			Step::SelectRole(d, r) => Intent::SelectRole(Some(role_id(chart, d, r))),
			Step::Connect(a, b) => Intent::Connect {
				source: dept(a),
				target: dept(b),
			},
		}
	}

	proptest! {
		#[test]
		fn selection_never_dangles_after_any_intent(
			steps in prop::collection::vec(step(), 0..60),
		) {
			let mut store = store();
			for step in &steps {
				let before = store.clone();
				let intent = intent(store.chart(), step);
				if store.apply(intent).is_err() {
					prop_assert_eq!(&store, &before);
				}

				let (chart, selection) = (store.chart(), store.selection());
				match (&selection.department, &selection.role) {
					(None, role) => prop_assert!(role.is_none()),
					(Some(_), None) => prop_assert!(selection.department(chart).is_some()),
					(Some(_), Some(_)) => prop_assert!(selection.role(chart).is_some()),
				}
			}
		}
	}
}
