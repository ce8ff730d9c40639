//! Immutable types.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use facetry_core::FeatureType;

/// Instances of the type cannot be changed through the UI.
///
/// Members pick this up as derived disabled facets during post-processing.
#[derive(Debug, Clone)]
pub struct ImmutableFacet {
	reason: String,
}

impl ImmutableFacet {
	/// Creates the facet.
	pub fn new(reason: impl Into<String>) -> Self {
		Self {
			reason: reason.into(),
		}
	}

	/// Reason given when a member is disabled because of this facet.
	pub fn reason(&self) -> &str {
		&self.reason
	}
}

impl Facet for ImmutableFacet {}

/// Installs [`ImmutableFacet`] from `Immutable`.
#[derive(Debug, Default)]
pub struct ImmutableFacetFactory;

impl FacetFactory for ImmutableFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&[FeatureType::Object]
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if context.has_metadata(|m| matches!(m, Metadata::Immutable)) {
			context.add_facet(ImmutableFacet::new("Immutable"));
		}
	}
}
