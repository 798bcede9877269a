//! Org-chart state: data model, pure edits, selection and the store that
//! owns them.

pub mod color;
pub mod model;
pub mod ops;
pub mod seed;
pub mod selection;
pub mod store;

pub use model::{Chart, Connection, Department, Employee, Position, Role, Shortcut};
pub use ops::{ChartError, DepartmentPatch, Field, ShortcutPatch};
pub use selection::Selection;
pub use store::{ChartStore, Intent};
