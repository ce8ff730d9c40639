//! Folding advisor facets over an interaction context.

use super::context::{UsabilityContext, ValidityContext, VisibilityContext};
use super::result::{Aggregation, InteractionResultSet};
use crate::holder::FacetHolder;

/// Asks every hiding advisor on `holder`, stopping at the first veto.
///
/// Framework-initiated interactions are allowed without asking anyone.
pub fn evaluate_visibility(holder: &FacetHolder, context: &VisibilityContext) -> InteractionResultSet {
	let mut results = InteractionResultSet::new(Aggregation::FirstVeto);
	if context.head.is_framework() {
		return results;
	}
	for facet in holder.facets() {
		let Some(advisor) = facet.as_hiding_advisor() else {
			continue;
		};
		if results.record(facet.facet_name(), advisor.hides(context)).is_break() {
			tracing::debug!(element = %context.identifier, facet = facet.facet_name(), "hidden");
			break;
		}
	}
	results
}

/// Asks every disabling advisor on `holder`, stopping at the first veto.
pub fn evaluate_usability(holder: &FacetHolder, context: &UsabilityContext) -> InteractionResultSet {
	let mut results = InteractionResultSet::new(Aggregation::FirstVeto);
	if context.head.is_framework() {
		return results;
	}
	for facet in holder.facets() {
		let Some(advisor) = facet.as_disabling_advisor() else {
			continue;
		};
		if results.record(facet.facet_name(), advisor.disables(context)).is_break() {
			tracing::debug!(element = %context.identifier, facet = facet.facet_name(), "disabled");
			break;
		}
	}
	results
}

/// Asks every validating advisor on `holder` and keeps all vetoes.
pub fn evaluate_validity(holder: &FacetHolder, context: &ValidityContext) -> InteractionResultSet {
	let mut results = InteractionResultSet::new(Aggregation::AllVetoes);
	if context.head.is_framework() {
		return results;
	}
	for facet in holder.facets() {
		if let Some(advisor) = facet.as_validating_advisor() {
			let _ = results.record(facet.facet_name(), advisor.invalidates(context));
		}
	}
	if results.is_vetoed() {
		tracing::debug!(
			element = %context.identifier,
			vetoes = results.vetoes().len(),
			"proposal invalid"
		);
	}
	results
}

/// Number of hiding advisors on `holder`.
pub fn hiding_advisor_count(holder: &FacetHolder) -> usize {
	holder
		.facets()
		.iter()
		.filter(|facet| facet.as_hiding_advisor().is_some())
		.count()
}
