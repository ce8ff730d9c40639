//! Declared member hiding.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{HidingAdvisor, VisibilityContext};
use crate::introspection::Metadata;
use facetry_core::{FeatureType, Where};

/// The member is hidden in the configured region.
#[derive(Debug, Clone)]
pub struct HiddenFacet {
	where_: Where,
}

impl HiddenFacet {
	/// Hidden in `where_`.
	pub fn new(where_: Where) -> Self {
		Self { where_ }
	}

	/// Region the member is hidden in.
	pub fn where_(&self) -> Where {
		self.where_
	}
}

impl Facet for HiddenFacet {
	fn as_hiding_advisor(&self) -> Option<&dyn HidingAdvisor> {
		Some(self)
	}
}

impl HidingAdvisor for HiddenFacet {
	fn hides(&self, context: &VisibilityContext) -> Option<String> {
		self.where_
			.includes(context.where_())
			.then(|| "Hidden".to_string())
	}
}

/// Installs [`HiddenFacet`] from `Hidden(where)`.
#[derive(Debug, Default)]
pub struct HiddenFacetFactory;

impl FacetFactory for HiddenFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::MEMBERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some(where_) = context.find_metadata(|m| match m {
			Metadata::Hidden(where_) => Some(*where_),
			_ => None,
		}) {
			context.add_facet(HiddenFacet::new(where_));
		}
	}
}
