//! Org-chart data structures.
//!
//! Every nested collection holds its children behind an [`Arc`], so an edit
//! rebuilds only the path from the chart root to the edited record. Untouched
//! siblings keep their pointer identity, which lets consumers detect changes
//! with [`Arc::ptr_eq`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a department; doubles as the diagram node id.
pub type DepartmentId = String;
/// Identifier of a role, unique within its department.
pub type RoleId = String;
/// Identifier of an employee.
pub type EmployeeId = String;
/// Identifier of a reporting-line connection.
pub type ConnectionId = String;
/// Identifier of a shortcut row.
pub type ShortcutId = String;

/// Smallest allowed department scale factor.
pub const NODE_MIN_SCALE: f64 = 0.6;
/// Largest allowed department scale factor.
pub const NODE_MAX_SCALE: f64 = 1.6;

/// A person assigned to a role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
	pub id: EmployeeId,
	pub name: String,
	/// Free text, edited inline on the department card.
	#[serde(default)]
	pub description: String,
}

/// A job function grouping employees inside a department.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
	pub id: RoleId,
	pub name: String,
	/// Insertion order is display order.
	#[serde(default)]
	pub employees: Vec<Arc<Employee>>,
}

/// Canvas coordinate of a department card's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Top-level org unit, rendered as one diagram node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Department {
	pub id: DepartmentId,
	pub name: String,
	/// Hex color of the card header and border.
	pub color: String,
	/// Scale factor, kept within [`NODE_MIN_SCALE`]..=[`NODE_MAX_SCALE`].
	#[serde(default = "default_size")]
	pub size: f64,
	#[serde(default)]
	pub roles: Vec<Arc<Role>>,
	#[serde(default)]
	pub position: Position,
}

fn default_size() -> f64 {
	1.0
}

impl Department {
	pub fn role(&self, role_id: &str) -> Option<&Arc<Role>> {
		self.roles.iter().find(|role| role.id == role_id)
	}
}

/// Directed reporting line between two departments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	pub id: ConnectionId,
	pub source: DepartmentId,
	pub target: DepartmentId,
}

/// A row of the keyboard-shortcut reference table. Display text only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
	pub id: ShortcutId,
	pub action: String,
	pub keys: String,
}

/// The whole org chart: departments plus the reporting lines between them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
	#[serde(default)]
	pub departments: Vec<Arc<Department>>,
	#[serde(default)]
	pub connections: Vec<Arc<Connection>>,
}

impl Chart {
	pub fn department(&self, id: &str) -> Option<&Arc<Department>> {
		self.departments.iter().find(|dept| dept.id == id)
	}
}
