//! Pluggable value specifications.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{ValidatingAdvisor, ValidityContext, ValidityKind};
use crate::introspection::Metadata;
use crate::object::ObjectValue;
use facetry_core::FeatureType;
use std::fmt;
use std::sync::Arc;

/// A rule a proposed value must satisfy.
pub trait Specification: Send + Sync + fmt::Debug {
	/// Returns the reason `value` does not satisfy the rule, or `None`.
	fn satisfies(&self, value: &ObjectValue) -> Option<String>;
}

/// Runs every declared [`Specification`] and reports all failures together.
#[derive(Debug, Clone)]
pub struct MustSatisfyFacet {
	specifications: Vec<Arc<dyn Specification>>,
}

impl MustSatisfyFacet {
	/// Wraps the given specifications.
	pub fn new(specifications: Vec<Arc<dyn Specification>>) -> Self {
		Self { specifications }
	}

	/// Number of specifications.
	pub fn len(&self) -> usize {
		self.specifications.len()
	}

	/// Whether there are no specifications.
	pub fn is_empty(&self) -> bool {
		self.specifications.is_empty()
	}
}

impl Facet for MustSatisfyFacet {
	fn as_validating_advisor(&self) -> Option<&dyn ValidatingAdvisor> {
		Some(self)
	}
}

impl ValidatingAdvisor for MustSatisfyFacet {
	fn invalidates(&self, context: &ValidityContext) -> Option<String> {
		let subject = match &context.kind {
			ValidityKind::Object => context.head.target.pojo().cloned().map(ObjectValue::Reference)?,
			_ => context.proposed()?.clone(),
		};
		let reasons: Vec<String> = self
			.specifications
			.iter()
			.filter_map(|specification| specification.satisfies(&subject))
			.collect();
		(!reasons.is_empty()).then(|| reasons.join("; "))
	}
}

/// Installs [`MustSatisfyFacet`] from `MustSatisfy(..)` tags; several tags are merged.
#[derive(Debug, Default)]
pub struct MustSatisfyFacetFactory;

impl FacetFactory for MustSatisfyFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&[
			FeatureType::Object,
			FeatureType::Property,
			FeatureType::ActionParameterScalar,
			FeatureType::ActionParameterCollection,
		]
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		let specifications: Vec<Arc<dyn Specification>> = context
			.metadata()
			.iter()
			.filter_map(|m| match m {
				Metadata::MustSatisfy(specifications) => Some(specifications.iter().cloned()),
				_ => None,
			})
			.flatten()
			.collect();
		if !specifications.is_empty() {
			context.add_facet(MustSatisfyFacet::new(specifications));
		}
	}
}
