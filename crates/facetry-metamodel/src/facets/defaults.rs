//! Default argument values.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use crate::object::{ObjectValue, Pojo};
use facetry_core::FeatureType;

/// Where a parameter's default comes from.
#[derive(Debug, Clone)]
pub enum DefaultsSource {
	/// A declared value.
	Value(ObjectValue),
	/// The elements of a sibling collection the user has selected.
	FromCollection {
		/// Name of the sibling collection.
		collection: String,
	},
}

/// Default value for an action parameter.
#[derive(Debug, Clone)]
pub struct DefaultsFacet {
	source: DefaultsSource,
}

impl DefaultsFacet {
	/// A declared default.
	pub fn value(value: ObjectValue) -> Self {
		Self {
			source: DefaultsSource::Value(value),
		}
	}

	/// Defaults to the selected elements of `collection`.
	pub fn from_collection(collection: impl Into<String>) -> Self {
		Self {
			source: DefaultsSource::FromCollection {
				collection: collection.into(),
			},
		}
	}

	/// Where the default comes from.
	pub fn source(&self) -> &DefaultsSource {
		&self.source
	}

	/// The default, given the elements currently selected in the sibling
	/// collection. The selection is supplied by the caller.
	pub fn default_value(&self, selection: &[Pojo]) -> Option<ObjectValue> {
		match &self.source {
			DefaultsSource::Value(value) => Some(value.clone()),
			DefaultsSource::FromCollection { .. } if selection.is_empty() => None,
			DefaultsSource::FromCollection { .. } => Some(ObjectValue::List(
				selection.iter().cloned().map(ObjectValue::Reference).collect(),
			)),
		}
	}
}

impl Facet for DefaultsFacet {
	fn is_derived(&self) -> bool {
		matches!(self.source, DefaultsSource::FromCollection { .. })
	}
}

/// Installs [`DefaultsFacet`] from `Default(value)`.
#[derive(Debug, Default)]
pub struct DefaultsFacetFactory;

impl FacetFactory for DefaultsFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::PARAMETERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some(value) = context.find_metadata(|m| match m {
			Metadata::Default(value) => Some(value.clone()),
			_ => None,
		}) {
			context.add_facet(DefaultsFacet::value(value));
		}
	}
}
