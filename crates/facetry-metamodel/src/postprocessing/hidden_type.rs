use super::{PostProcessingContext, PostProcessor};
use crate::facets::HiddenTypeFacet;
use crate::interaction::evaluation::hiding_advisor_count;
use crate::member::ObjectMember;
use crate::spec::ObjectSpecification;
use std::sync::Arc;

/// Hides a type whose properties and collections are all hidden.
///
/// Actions are not considered. A member counts as hidden when it carries at
/// least one hiding advisor; the derived facet asks those advisors again at
/// request time, for the acting identity and region of that request.
#[derive(Debug, Default)]
pub struct HiddenTypeFromMembersPostProcessor;

impl PostProcessor for HiddenTypeFromMembersPostProcessor {
	fn post_process(&self, specification: &Arc<ObjectSpecification>, _context: &PostProcessingContext<'_>) {
		if !specification.bean_sort().is_hideable() || specification.has_facet::<HiddenTypeFacet>() {
			return;
		}
		let members: Vec<Arc<ObjectMember>> = specification
			.members()
			.iter()
			.filter(|member| member.is_property() || member.is_collection())
			.cloned()
			.collect();
		if members.is_empty()
			|| !members
				.iter()
				.all(|member| hiding_advisor_count(member.facet_holder()) > 0)
		{
			return;
		}
		tracing::debug!(spec = %specification.identifier(), members = members.len(), "deriving type-level hiding");
		specification
			.facet_holder()
			.add_facet(HiddenTypeFacet::derived_from_members(
				specification.logical_name(),
				members,
			));
	}
}
