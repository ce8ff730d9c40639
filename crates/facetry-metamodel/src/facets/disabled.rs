//! Declared and derived member disabling.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{DisablingAdvisor, UsabilityContext};
use crate::introspection::Metadata;
use facetry_core::{FeatureType, Where};

/// The member cannot be edited or invoked in the configured region.
#[derive(Debug, Clone)]
pub struct DisabledFacet {
	where_: Where,
	reason: String,
	derived: bool,
}

impl DisabledFacet {
	/// Disabled in `where_` for `reason`.
	pub fn new(where_: Where, reason: impl Into<String>) -> Self {
		Self {
			where_,
			reason: reason.into(),
			derived: false,
		}
	}

	/// Disabled everywhere because the owning type is immutable.
	pub fn derived_from_immutable(reason: impl Into<String>) -> Self {
		Self {
			where_: Where::Everywhere,
			reason: reason.into(),
			derived: true,
		}
	}

	/// Region the member is disabled in.
	pub fn where_(&self) -> Where {
		self.where_
	}

	/// Veto reason.
	pub fn reason(&self) -> &str {
		&self.reason
	}
}

impl Facet for DisabledFacet {
	fn is_derived(&self) -> bool {
		self.derived
	}

	fn as_disabling_advisor(&self) -> Option<&dyn DisablingAdvisor> {
		Some(self)
	}
}

impl DisablingAdvisor for DisabledFacet {
	fn disables(&self, context: &UsabilityContext) -> Option<String> {
		self.where_
			.includes(context.where_())
			.then(|| self.reason.clone())
	}
}

/// Installs [`DisabledFacet`] from `Disabled { where_, reason }`.
#[derive(Debug, Default)]
pub struct DisabledFacetFactory;

impl FacetFactory for DisabledFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::MEMBERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some((where_, reason)) = context.find_metadata(|m| match m {
			Metadata::Disabled { where_, reason } => Some((*where_, reason.clone())),
			_ => None,
		}) {
			let reason = if reason.is_empty() {
				"Disabled".to_string()
			} else {
				reason
			};
			context.add_facet(DisabledFacet::new(where_, reason));
		}
	}
}
