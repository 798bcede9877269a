//! Initial chart contents: the built-in sample and the optional JSON seed.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::model::{Chart, Connection, Department, Employee, Position, Role, Shortcut};
use super::ops::normalize_size;

/// Why the page-provided seed could not be used.
#[derive(Debug, Error)]
pub enum SeedError {
	#[error("no element with id {0:?}")]
	Missing(&'static str),
	#[error("failed to parse chart data: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Chart document embedded in the page. Every section is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChartSeed {
	#[serde(flatten)]
	pub chart: Chart,
	#[serde(default)]
	pub shortcuts: Option<Vec<Arc<Shortcut>>>,
}

impl ChartSeed {
	pub fn from_json(json: &str) -> Result<Self, SeedError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Splits the seed into a chart with in-bounds sizes and the shortcut
	/// table, falling back to the default shortcuts when none were given.
	pub fn into_parts(self) -> (Chart, Vec<Arc<Shortcut>>) {
		let departments = self
			.chart
			.departments
			.into_iter()
			.map(|dept| {
				let size = normalize_size(dept.size);
				if size == dept.size {
					dept
				} else {
					Arc::new(Department {
						size,
						..(*dept).clone()
					})
				}
			})
			.collect();
		let chart = Chart {
			departments,
			connections: self.chart.connections,
		};
		(chart, self.shortcuts.unwrap_or_else(sample_shortcuts))
	}
}

fn employee(id: &str, name: &str, description: &str) -> Arc<Employee> {
	Arc::new(Employee {
		id: id.into(),
		name: name.into(),
		description: description.into(),
	})
}

fn role(id: &str, name: &str, employees: Vec<Arc<Employee>>) -> Arc<Role> {
	Arc::new(Role {
		id: id.into(),
		name: name.into(),
		employees,
	})
}

fn department(
	id: &str,
	name: &str,
	color: &str,
	x: f64,
	y: f64,
	roles: Vec<Arc<Role>>,
) -> Arc<Department> {
	Arc::new(Department {
		id: id.into(),
		name: name.into(),
		color: color.into(),
		size: 1.0,
		roles,
		position: Position::new(x, y),
	})
}

fn connection(source: &str, target: &str) -> Arc<Connection> {
	Arc::new(Connection {
		id: format!("{source}-{target}"),
		source: source.into(),
		target: target.into(),
	})
}

/// Three departments under a general management, with two reporting lines.
pub fn sample_chart() -> Chart {
	let direzione = department(
		"direzione",
		"Direzione Generale",
		"#6366f1",
		100.0,
		0.0,
		vec![
			role(
				"direzione-role-strategia",
				"Strategia e Governance",
				vec![
					employee(
						"emp-anna",
						"Anna Bianchi",
						"Coordina i progetti strategici e monitora gli OKR aziendali.",
					),
					employee(
						"emp-paolo",
						"Paolo Verdi",
						"Supporta la definizione dei piani operativi con i responsabili di reparto.",
					),
				],
			),
			role(
				"direzione-role-finanza",
				"Controllo di Gestione",
				vec![employee(
					"emp-luca",
					"Luca Neri",
					"Redige i report finanziari mensili e cura i forecast di budget.",
				)],
			),
		],
	);

	let vendite = department(
		"vendite",
		"Vendite",
		"#0ea5e9",
		-220.0,
		250.0,
		vec![
			role(
				"vendite-role-b2b",
				"Account B2B",
				vec![
					employee(
						"emp-chiara",
						"Chiara Moretti",
						"Gestisce il portafoglio clienti corporate e le negoziazioni complesse.",
					),
					employee(
						"emp-dario",
						"Dario Gallo",
						"Sviluppa nuove opportunità commerciali e mantiene relazioni post-vendita.",
					),
				],
			),
			role(
				"vendite-role-support",
				"Customer Support",
				vec![employee(
					"emp-sara",
					"Sara Fontana",
					"Coordina la gestione ticket e monitora la soddisfazione del cliente.",
				)],
			),
		],
	);

	let produzione = department(
		"produzione",
		"Produzione",
		"#f97316",
		420.0,
		250.0,
		vec![
			role(
				"produzione-role-linea",
				"Gestione Linea",
				vec![
					employee(
						"emp-matteo",
						"Matteo Conti",
						"Organizza i turni di produzione e ottimizza i carichi di lavoro.",
					),
					employee(
						"emp-alessia",
						"Alessia Pini",
						"Supervisiona la logistica interna e coordina le squadre operative.",
					),
				],
			),
			role(
				"produzione-role-qualita",
				"Controllo Qualità",
				vec![employee(
					"emp-francesca",
					"Francesca Costa",
					"Guida i piani di test e le certificazioni per gli standard ISO.",
				)],
			),
		],
	);

	Chart {
		departments: vec![direzione, vendite, produzione],
		connections: vec![
			connection("direzione", "vendite"),
			connection("direzione", "produzione"),
		],
	}
}

/// Default rows of the shortcut reference table.
pub fn sample_shortcuts() -> Vec<Arc<Shortcut>> {
	[
		("add-department", "Aggiungi nuovo reparto", "Ctrl + Shift + N"),
		("add-role", "Aggiungi mansione", "Ctrl + Shift + M"),
		("assign-employee", "Assegna dipendente", "Ctrl + Shift + D"),
		("toggle-shortcuts", "Mostra/Nascondi scorciatoie", "Ctrl + /"),
	]
	.into_iter()
	.map(|(id, action, keys)| {
		Arc::new(Shortcut {
			id: id.into(),
			action: action.into(),
			keys: keys.into(),
		})
	})
	.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_is_consistent() {
		let chart = sample_chart();
		for conn in &chart.connections {
			assert!(chart.department(&conn.source).is_some());
			assert!(chart.department(&conn.target).is_some());
		}
		assert_eq!(sample_shortcuts().len(), 4);
	}

	#[test]
	fn minimal_seed_uses_defaults() {
		let json = r##"{
			"departments": [
				{ "id": "ops", "name": "Operations", "color": "#10b981" }
			]
		}"##;
		let (chart, shortcuts) = ChartSeed::from_json(json).unwrap().into_parts();
		let ops = chart.department("ops").unwrap();
		assert_eq!(ops.size, 1.0);
		assert!(ops.roles.is_empty());
		assert_eq!(ops.position, Position::default());
		assert!(chart.connections.is_empty());
		assert_eq!(shortcuts, sample_shortcuts());
	}

	#[test]
	fn seed_sizes_are_clamped() {
		let json = r##"{
			"departments": [
				{ "id": "a", "name": "A", "color": "#fff", "size": 4.0 },
				{ "id": "b", "name": "B", "color": "#000", "size": 0.1 },
				{ "id": "c", "name": "C", "color": "#000", "size": 1.2,
				  "roles": [{ "id": "r", "name": "R",
				              "employees": [{ "id": "e", "name": "E" }] }] }
			],
			"connections": [{ "id": "a-b", "source": "a", "target": "b" }],
			"shortcuts": []
		}"##;
		let (chart, shortcuts) = ChartSeed::from_json(json).unwrap().into_parts();
		let sizes: Vec<f64> = chart.departments.iter().map(|d| d.size).collect();
		assert_eq!(sizes, [1.6, 0.6, 1.2]);
		assert_eq!(chart.departments[2].roles[0].employees[0].description, "");
		assert_eq!(chart.connections.len(), 1);
		assert!(shortcuts.is_empty());
	}

	#[test]
	fn malformed_seed_is_an_error() {
		assert!(matches!(
			ChartSeed::from_json("{ \"departments\": 3 }"),
			Err(SeedError::Parse(_))
		));
	}
}
