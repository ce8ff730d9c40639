use super::{PostProcessingContext, PostProcessor};
use crate::facets::{AutoCompleteFacet, ChoicesFacet, DefaultsFacet};
use crate::member::{ActionParameter, MemberKind};
use crate::spec::ObjectSpecification;
use std::sync::Arc;

/// Lets action parameters pick up choices and defaults from a sibling
/// collection of the same element type.
///
/// For a collection `items` of `Item` and an action `remove(chosen: [Item])`,
/// `chosen` offers the current contents of `items` as choices and, being the
/// first parameter, defaults to the items the user selected.
#[derive(Debug, Default)]
pub struct CollectionParameterPostProcessor;

fn is_compatible(parameter: &ActionParameter, element_type: &str) -> bool {
	parameter.type_ref().type_name() == element_type
}

impl PostProcessor for CollectionParameterPostProcessor {
	fn post_process(&self, specification: &Arc<ObjectSpecification>, _context: &PostProcessingContext<'_>) {
		for collection in specification.members_of(MemberKind::Collection) {
			let Some(element_type) = collection.type_ref().map(|type_ref| type_ref.type_name()) else {
				continue;
			};
			for action in specification.members_of(MemberKind::Action) {
				let mut compatible = action
					.parameters()
					.iter()
					.filter(|parameter| is_compatible(parameter, element_type))
					.peekable();

				if let Some(first) = compatible.peek()
					&& first.index() == 0
					&& !first.has_facet::<DefaultsFacet>()
				{
					first
						.facet_holder()
						.add_facet(DefaultsFacet::from_collection(collection.name()));
				}

				for parameter in compatible {
					if parameter.has_facet::<ChoicesFacet>() || parameter.has_facet::<AutoCompleteFacet>() {
						continue;
					}
					tracing::debug!(
						parameter = %parameter.identifier(),
						collection = collection.name(),
						"choices derived from collection"
					);
					parameter
						.facet_holder()
						.add_facet(ChoicesFacet::from_collection(collection.name()));
				}
			}
		}
	}
}
