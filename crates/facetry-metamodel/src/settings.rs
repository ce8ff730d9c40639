//! Metamodel settings.
//!
//! Settings are passed explicitly to the loader builder. They can be built in
//! code or read from TOML (or JSON) files:
//!
//! ```toml
//! [introspection]
//! parallel = true
//! worker_threads = 4
//!
//! [post_processing]
//! infer_parameters_from_collections = false
//!
//! [validation]
//! fail_on_error = true
//! ```

use facetry_core::{MetamodelError, MetamodelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All metamodel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetamodelSettings {
	/// How types are introspected.
	pub introspection: IntrospectionSettings,
	/// Which bundled post-processors the default programming model installs.
	pub post_processing: PostProcessingSettings,
	/// What bootstrap does with validation failures.
	pub validation: ValidationSettings,
}

/// Introspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrospectionSettings {
	/// Introspect independent types on several threads.
	pub parallel: bool,
	/// Number of worker threads when `parallel` is set.
	pub worker_threads: usize,
}

impl Default for IntrospectionSettings {
	fn default() -> Self {
		Self {
			parallel: false,
			worker_threads: std::thread::available_parallelism()
				.map(usize::from)
				.unwrap_or(4),
		}
	}
}

/// Post-processor toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingSettings {
	/// Hide a type whose properties and collections are all hidden.
	pub hide_types_without_visible_members: bool,
	/// Derive parameter choices and defaults from sibling collections.
	pub infer_parameters_from_collections: bool,
	/// Disable the properties and collections of immutable types.
	pub disable_properties_of_immutable_types: bool,
}

impl Default for PostProcessingSettings {
	fn default() -> Self {
		Self {
			hide_types_without_visible_members: true,
			infer_parameters_from_collections: true,
			disable_properties_of_immutable_types: true,
		}
	}
}

/// Validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
	/// Make bootstrap fail when the validation report is not empty.
	pub fail_on_error: bool,
}

impl Default for ValidationSettings {
	fn default() -> Self {
		Self { fail_on_error: true }
	}
}

impl MetamodelSettings {
	/// Parses settings from TOML.
	pub fn from_toml_str(contents: &str) -> MetamodelResult<Self> {
		toml::from_str(contents)
			.map_err(|e| MetamodelError::Settings(format!("TOML parse error: {}", e)))
	}

	/// Loads settings from a `.toml` or `.json` file.
	pub fn from_file(path: impl AsRef<Path>) -> MetamodelResult<Self> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path)?;
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => serde_json::from_str(&contents)
				.map_err(|e| MetamodelError::Settings(format!("JSON parse error: {}", e))),
			_ => Err(MetamodelError::Settings(format!(
				"unsupported settings format: {} (expected .toml or .json)",
				path.display()
			))),
		}
	}

	/// Builder-style toggle for parallel introspection.
	pub fn with_parallel_introspection(mut self, worker_threads: usize) -> Self {
		self.introspection.parallel = true;
		self.introspection.worker_threads = worker_threads.max(1);
		self
	}

	/// Builder-style toggle for `fail_on_error`.
	pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
		self.validation.fail_on_error = fail_on_error;
		self
	}
}
