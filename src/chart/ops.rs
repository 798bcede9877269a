//! Structural edits on the org chart.
//!
//! Every operation takes the current [`Chart`] by reference and returns a new
//! one. Only the records on the path to the edited node are rebuilt; all other
//! departments, roles and employees are shared with the input. Unknown ids are
//! reported as [`ChartError`] and leave the input untouched, and every lookup
//! goes through [`rewrite`] so that policy lives in one place.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::color::clamp;
use super::model::{
	Chart, Connection, ConnectionId, Department, DepartmentId, Employee, EmployeeId, NODE_MAX_SCALE,
	NODE_MIN_SCALE, Position, Role, RoleId, Shortcut, ShortcutId,
};

/// New departments are laid out on a grid with this many columns.
const GRID_COLUMNS: usize = 3;
const COLUMN_SPACING: f64 = 280.0;
const ROW_SPACING: f64 = 230.0;
const GRID_ORIGIN: Position = Position::new(-220.0, 250.0);

/// An edit referenced a record that is not in the chart.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChartError {
	#[error("no department with id {0:?}")]
	DepartmentNotFound(DepartmentId),
	#[error("department {department:?} has no role with id {role:?}")]
	RoleNotFound { department: DepartmentId, role: RoleId },
	#[error("role {role:?} has no employee with id {employee:?}")]
	EmployeeNotFound { role: RoleId, employee: EmployeeId },
	#[error("no shortcut with id {0:?}")]
	ShortcutNotFound(ShortcutId),
}

/// One field of a partial update: either left alone or replaced.
#[derive(Clone, Debug, PartialEq)]
pub enum Field<T> {
	Keep,
	Set(T),
}

impl<T> Default for Field<T> {
	fn default() -> Self {
		Field::Keep
	}
}

impl<T> Field<T> {
	fn apply_to(self, current: &mut T) {
		if let Field::Set(value) = self {
			*current = value;
		}
	}
}

/// Partial update of a department's editable attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepartmentPatch {
	pub name: Field<String>,
	pub color: Field<String>,
	/// Clamped into the scale bounds when applied.
	pub size: Field<f64>,
}

impl DepartmentPatch {
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Field::Set(name.into());
		self
	}

	pub fn color(mut self, color: impl Into<String>) -> Self {
		self.color = Field::Set(color.into());
		self
	}

	pub fn size(mut self, size: f64) -> Self {
		self.size = Field::Set(size);
		self
	}
}

/// Partial update of a shortcut row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortcutPatch {
	pub action: Field<String>,
	pub keys: Field<String>,
}

/// Grid slot for the department inserted after `count` existing ones.
pub fn grid_position(count: usize) -> Position {
	let column = (count % GRID_COLUMNS) as f64;
	let row = (count / GRID_COLUMNS) as f64;
	Position::new(
		column * COLUMN_SPACING + GRID_ORIGIN.x,
		row * ROW_SPACING + GRID_ORIGIN.y,
	)
}

/// Clamps a scale factor into bounds and rounds it to two decimals.
pub fn normalize_size(size: f64) -> f64 {
	(clamp(size, NODE_MIN_SCALE, NODE_MAX_SCALE) * 100.0).round() / 100.0
}

pub(crate) fn fresh_id() -> String {
	Uuid::new_v4().to_string()
}

/// Replaces the first item matching `matches` with the result of `edit`,
/// sharing every other item with `items`.
fn rewrite<T>(
	items: &[Arc<T>],
	matches: impl Fn(&T) -> bool,
	edit: impl FnOnce(&T) -> Result<T, ChartError>,
	missing: impl FnOnce() -> ChartError,
) -> Result<Vec<Arc<T>>, ChartError> {
	let idx = items
		.iter()
		.position(|item| matches(item.as_ref()))
		.ok_or_else(missing)?;
	let mut next = items.to_vec();
	next[idx] = Arc::new(edit(items[idx].as_ref())?);
	Ok(next)
}

impl Chart {
	fn with_department(
		&self,
		department_id: &str,
		edit: impl FnOnce(&Department) -> Result<Department, ChartError>,
	) -> Result<Chart, ChartError> {
		let departments = rewrite(
			&self.departments,
			|dept| dept.id == department_id,
			edit,
			|| ChartError::DepartmentNotFound(department_id.to_string()),
		)?;
		Ok(Chart {
			departments,
			connections: self.connections.clone(),
		})
	}

	fn with_role(
		&self,
		department_id: &str,
		role_id: &str,
		edit: impl FnOnce(&Role) -> Result<Role, ChartError>,
	) -> Result<Chart, ChartError> {
		self.with_department(department_id, |dept| {
			let roles = rewrite(
				&dept.roles,
				|role| role.id == role_id,
				edit,
				|| ChartError::RoleNotFound {
					department: department_id.to_string(),
					role: role_id.to_string(),
				},
			)?;
			Ok(Department {
				roles,
				..dept.clone()
			})
		})
	}

	fn with_employee(
		&self,
		department_id: &str,
		role_id: &str,
		employee_id: &str,
		edit: impl FnOnce(&mut Employee),
	) -> Result<Chart, ChartError> {
		self.with_role(department_id, role_id, |role| {
			let employees = rewrite(
				&role.employees,
				|employee| employee.id == employee_id,
				|employee| {
					let mut next = employee.clone();
					edit(&mut next);
					Ok(next)
				},
				|| ChartError::EmployeeNotFound {
					role: role_id.to_string(),
					employee: employee_id.to_string(),
				},
			)?;
			Ok(Role {
				employees,
				..role.clone()
			})
		})
	}

	/// Appends a department at the next grid slot. Returns the new chart and
	/// the generated id.
	pub fn add_department(
		&self,
		name: impl Into<String>,
		color: impl Into<String>,
	) -> (Chart, DepartmentId) {
		let id = fresh_id();
		let department = Department {
			id: id.clone(),
			name: name.into(),
			color: color.into(),
			size: 1.0,
			roles: Vec::new(),
			position: grid_position(self.departments.len()),
		};
		let mut departments = self.departments.clone();
		departments.push(Arc::new(department));
		let chart = Chart {
			departments,
			connections: self.connections.clone(),
		};
		(chart, id)
	}

	/// Appends an empty role to a department.
	pub fn add_role(
		&self,
		department_id: &str,
		name: impl Into<String>,
	) -> Result<(Chart, RoleId), ChartError> {
		let id = fresh_id();
		let role = Arc::new(Role {
			id: id.clone(),
			name: name.into(),
			employees: Vec::new(),
		});
		let chart = self.with_department(department_id, |dept| {
			let mut next = dept.clone();
			next.roles.push(role);
			Ok(next)
		})?;
		Ok((chart, id))
	}

	/// Appends an employee with an empty description to a role.
	pub fn add_employee(
		&self,
		department_id: &str,
		role_id: &str,
		name: impl Into<String>,
	) -> Result<(Chart, EmployeeId), ChartError> {
		let id = fresh_id();
		let employee = Arc::new(Employee {
			id: id.clone(),
			name: name.into(),
			description: String::new(),
		});
		let chart = self.with_role(department_id, role_id, |role| {
			let mut next = role.clone();
			next.employees.push(employee);
			Ok(next)
		})?;
		Ok((chart, id))
	}

	pub fn update_department(
		&self,
		department_id: &str,
		patch: DepartmentPatch,
	) -> Result<Chart, ChartError> {
		self.with_department(department_id, |dept| {
			let mut next = dept.clone();
			patch.name.apply_to(&mut next.name);
			patch.color.apply_to(&mut next.color);
			patch.size.apply_to(&mut next.size);
			next.size = normalize_size(next.size);
			Ok(next)
		})
	}

	/// Grows or shrinks a department card, saturating at the scale bounds.
	pub fn resize_department(&self, department_id: &str, delta: f64) -> Result<Chart, ChartError> {
		self.with_department(department_id, |dept| {
			Ok(Department {
				size: normalize_size(dept.size + delta),
				..dept.clone()
			})
		})
	}

	pub fn move_department(
		&self,
		department_id: &str,
		position: Position,
	) -> Result<Chart, ChartError> {
		self.with_department(department_id, |dept| {
			Ok(Department {
				position,
				..dept.clone()
			})
		})
	}

	pub fn update_role(
		&self,
		department_id: &str,
		role_id: &str,
		name: impl Into<String>,
	) -> Result<Chart, ChartError> {
		let name = name.into();
		self.with_role(department_id, role_id, |role| {
			Ok(Role {
				name,
				..role.clone()
			})
		})
	}

	pub fn rename_employee(
		&self,
		department_id: &str,
		role_id: &str,
		employee_id: &str,
		name: impl Into<String>,
	) -> Result<Chart, ChartError> {
		let name = name.into();
		self.with_employee(department_id, role_id, employee_id, |employee| {
			employee.name = name;
		})
	}

	/// Stores `text` verbatim, empty included.
	pub fn update_employee_description(
		&self,
		department_id: &str,
		role_id: &str,
		employee_id: &str,
		text: impl Into<String>,
	) -> Result<Chart, ChartError> {
		let text = text.into();
		self.with_employee(department_id, role_id, employee_id, |employee| {
			employee.description = text;
		})
	}

	/// Drops the given departments and every connection touching them.
	/// Unknown ids are ignored.
	pub fn remove_departments(&self, ids: &[DepartmentId]) -> Chart {
		let removed = |id: &DepartmentId| ids.contains(id);
		Chart {
			departments: self
				.departments
				.iter()
				.filter(|dept| !removed(&dept.id))
				.cloned()
				.collect(),
			connections: self
				.connections
				.iter()
				.filter(|conn| !removed(&conn.source) && !removed(&conn.target))
				.cloned()
				.collect(),
		}
	}

	/// Adds a reporting line. Parallel lines and self-loops are accepted; only
	/// the connection id is kept unique.
	pub fn connect(&self, source: &str, target: &str) -> Result<(Chart, ConnectionId), ChartError> {
		for endpoint in [source, target] {
			if self.department(endpoint).is_none() {
				return Err(ChartError::DepartmentNotFound(endpoint.to_string()));
			}
		}

		let mut id = fresh_id();
		while self.connections.iter().any(|conn| conn.id == id) {
			id = fresh_id();
		}

		let mut connections = self.connections.clone();
		connections.push(Arc::new(Connection {
			id: id.clone(),
			source: source.to_string(),
			target: target.to_string(),
		}));
		let chart = Chart {
			departments: self.departments.clone(),
			connections,
		};
		Ok((chart, id))
	}
}

/// Applies `patch` to one shortcut row, sharing the others.
pub fn update_shortcut(
	shortcuts: &[Arc<Shortcut>],
	shortcut_id: &str,
	patch: ShortcutPatch,
) -> Result<Vec<Arc<Shortcut>>, ChartError> {
	rewrite(
		shortcuts,
		|shortcut| shortcut.id == shortcut_id,
		|shortcut| {
			let mut next = shortcut.clone();
			patch.action.apply_to(&mut next.action);
			patch.keys.apply_to(&mut next.keys);
			Ok(next)
		},
		|| ChartError::ShortcutNotFound(shortcut_id.to_string()),
	)
}
