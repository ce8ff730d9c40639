use super::{PostProcessingContext, PostProcessor};
use crate::spec::ObjectSpecification;
use facetry_core::BeanSort;
use std::sync::Arc;

/// Reports every type that ended up without a classification.
#[derive(Debug, Default)]
pub struct ClassificationValidator;

impl PostProcessor for ClassificationValidator {
	fn post_process(&self, specification: &Arc<ObjectSpecification>, context: &PostProcessingContext<'_>) {
		if specification.bean_sort() == BeanSort::Unknown {
			context.fail(
				specification.identifier().clone(),
				format!(
					"{} is neither an entity, a view model, a domain service, a value nor abstract",
					specification.logical_name()
				),
			);
		}
	}
}
