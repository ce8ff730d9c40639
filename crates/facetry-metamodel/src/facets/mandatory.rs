//! Whether a property or parameter requires a value.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{ValidatingAdvisor, ValidityContext};
use crate::introspection::Metadata;
use crate::object::ObjectValue;
use facetry_core::{FeatureType, Precedence};

/// Whether a value is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
	/// A value must be supplied.
	Required,
	/// The value may be left empty.
	Optional,
}

/// Requires (or explicitly waives) a value for a property or parameter.
#[derive(Debug, Clone)]
pub struct MandatoryFacet {
	semantics: Semantics,
	precedence: Precedence,
}

impl MandatoryFacet {
	/// Declared as required.
	pub fn required() -> Self {
		Self {
			semantics: Semantics::Required,
			precedence: Precedence::Default,
		}
	}

	/// Declared as optional.
	pub fn optional() -> Self {
		Self {
			semantics: Semantics::Optional,
			precedence: Precedence::Default,
		}
	}

	/// Required unless something else is declared.
	pub fn fallback() -> Self {
		Self {
			semantics: Semantics::Required,
			precedence: Precedence::Fallback,
		}
	}

	/// The configured semantics.
	pub fn semantics(&self) -> Semantics {
		self.semantics
	}

	/// Whether a value is required.
	pub fn is_required(&self) -> bool {
		self.semantics == Semantics::Required
	}
}

fn is_missing(value: Option<&ObjectValue>) -> bool {
	match value {
		None => true,
		Some(ObjectValue::Scalar(serde_json::Value::Null)) => true,
		Some(ObjectValue::Scalar(serde_json::Value::String(s))) => s.is_empty(),
		Some(ObjectValue::List(values)) => values.is_empty(),
		Some(_) => false,
	}
}

impl Facet for MandatoryFacet {
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn as_validating_advisor(&self) -> Option<&dyn ValidatingAdvisor> {
		Some(self)
	}
}

impl ValidatingAdvisor for MandatoryFacet {
	fn invalidates(&self, context: &ValidityContext) -> Option<String> {
		if !self.is_required() || !context.proposes_value() {
			return None;
		}
		is_missing(context.proposed()).then(|| "Mandatory".to_string())
	}
}

/// Makes every property and parameter required at fallback precedence.
#[derive(Debug, Default)]
pub struct MandatoryFallbackFactory;

impl FacetFactory for MandatoryFallbackFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::PROPERTIES_AND_PARAMETERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		context.add_facet(MandatoryFacet::fallback());
	}
}

/// Installs [`MandatoryFacet`] from `Mandatory` or `Optional`.
///
/// Declaring both is a structural error; neither facet is installed then.
#[derive(Debug, Default)]
pub struct MandatoryFacetFactory;

impl FacetFactory for MandatoryFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::PROPERTIES_AND_PARAMETERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		let mandatory = context.has_metadata(|m| matches!(m, Metadata::Mandatory));
		let optional = context.has_metadata(|m| matches!(m, Metadata::Optional));
		match (mandatory, optional) {
			(true, true) => context.fail("declared both mandatory and optional"),
			(true, false) => {
				context.add_facet(MandatoryFacet::required());
			}
			(false, true) => {
				context.add_facet(MandatoryFacet::optional());
			}
			(false, false) => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(None, true)]
	#[case(Some(ObjectValue::Scalar(json!(null))), true)]
	#[case(Some(ObjectValue::from("")), true)]
	#[case(Some(ObjectValue::List(vec![])), true)]
	#[case(Some(ObjectValue::from("x")), false)]
	#[case(Some(ObjectValue::Scalar(json!(0))), false)]
	fn test_is_missing(#[case] value: Option<ObjectValue>, #[case] expected: bool) {
		assert_eq!(is_missing(value.as_ref()), expected);
	}

	#[rstest]
	fn test_fallback_is_weaker_than_declared() {
		assert_eq!(MandatoryFacet::fallback().precedence(), Precedence::Fallback);
		assert!(Precedence::Default.may_replace(MandatoryFacet::fallback().precedence()));
		assert!(!MandatoryFacet::optional().is_required());
	}
}
