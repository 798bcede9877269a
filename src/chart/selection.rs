//! Which department and role the edit panel is focused on.

use std::sync::Arc;

use super::model::{Chart, Department, DepartmentId, Role, RoleId};

/// Currently active department/role pair.
///
/// `role` only means something while it names a role of `department`;
/// [`Selection::reconcile`] restores that after the chart changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	pub department: Option<DepartmentId>,
	pub role: Option<RoleId>,
}

impl Selection {
	/// Switching department always clears the role, even if the new
	/// department happens to contain it.
	pub fn select_department(self, department: Option<DepartmentId>) -> Self {
		Self {
			department,
			role: None,
		}
	}

	/// Not validated here; the next [`Selection::reconcile`] drops a role that
	/// does not belong to the selected department.
	pub fn select_role(self, role: Option<RoleId>) -> Self {
		Self { role, ..self }
	}

	/// Drops references that `chart` no longer contains.
	pub fn reconcile(self, chart: &Chart) -> Self {
		let Some(department) = self.department.as_deref().and_then(|id| chart.department(id))
		else {
			return Self::default();
		};
		let role = self.role.filter(|id| department.role(id).is_some());
		Self {
			department: self.department,
			role,
		}
	}

	pub fn department<'a>(&self, chart: &'a Chart) -> Option<&'a Arc<Department>> {
		chart.department(self.department.as_deref()?)
	}

	pub fn role<'a>(&self, chart: &'a Chart) -> Option<&'a Arc<Role>> {
		self.department(chart)?.role(self.role.as_deref()?)
	}
}
