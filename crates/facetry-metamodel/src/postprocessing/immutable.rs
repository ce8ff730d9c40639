use super::{PostProcessingContext, PostProcessor};
use crate::facets::{DisabledFacet, ImmutableFacet};
use crate::spec::ObjectSpecification;
use std::sync::Arc;

/// Disables the properties and collections of immutable types.
#[derive(Debug, Default)]
pub struct ImmutablePostProcessor;

impl PostProcessor for ImmutablePostProcessor {
	fn post_process(&self, specification: &Arc<ObjectSpecification>, _context: &PostProcessingContext<'_>) {
		let Some(immutable) = specification.get_facet::<ImmutableFacet>() else {
			return;
		};
		for member in specification.members() {
			if member.is_action() || member.has_facet::<DisabledFacet>() {
				continue;
			}
			member
				.facet_holder()
				.add_facet(DisabledFacet::derived_from_immutable(immutable.reason()));
		}
	}
}
