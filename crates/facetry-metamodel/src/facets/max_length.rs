//! Maximum length of textual values.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{ValidatingAdvisor, ValidityContext};
use crate::introspection::Metadata;
use crate::object::ObjectValue;
use facetry_core::FeatureType;

/// Rejects textual values longer than `max` characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthFacet {
	max: usize,
}

impl MaxLengthFacet {
	/// A limit of `max` characters.
	pub fn new(max: usize) -> Self {
		Self { max }
	}

	/// The configured limit.
	pub fn max(&self) -> usize {
		self.max
	}
}

impl Facet for MaxLengthFacet {
	fn as_validating_advisor(&self) -> Option<&dyn ValidatingAdvisor> {
		Some(self)
	}
}

impl ValidatingAdvisor for MaxLengthFacet {
	fn invalidates(&self, context: &ValidityContext) -> Option<String> {
		let Some(ObjectValue::Scalar(value)) = context.proposed() else {
			return None;
		};
		let length = match value {
			serde_json::Value::String(text) => text.chars().count(),
			serde_json::Value::Null => return None,
			other => other.to_string().chars().count(),
		};
		(length > self.max).then(|| {
			format!(
				"The value proposed exceeds the maximum length of {}",
				self.max
			)
		})
	}
}

/// Installs [`MaxLengthFacet`] from `MaxLength(n)`. A zero limit is a structural error.
#[derive(Debug, Default)]
pub struct MaxLengthFacetFactory;

impl FacetFactory for MaxLengthFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::VALUE_HOLDERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		let Some(max) = context.find_metadata(|m| match m {
			Metadata::MaxLength(max) => Some(*max),
			_ => None,
		}) else {
			return;
		};
		if max == 0 {
			context.fail("max length must be greater than zero");
			return;
		}
		context.add_facet(MaxLengthFacet::new(max));
	}
}
