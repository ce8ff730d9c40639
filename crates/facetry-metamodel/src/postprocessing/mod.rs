//! Second-pass derivation over the complete set of specifications.
//!
//! Post-processors run once every reachable type has been introspected.
//! They read a specification's own members and other specifications, and
//! only ever add facets that are absent, so running the phase again changes
//! nothing.

mod classification;
mod collection_parameters;
mod hidden_type;
mod immutable;

pub use classification::ClassificationValidator;
pub use collection_parameters::CollectionParameterPostProcessor;
pub use hidden_type::HiddenTypeFromMembersPostProcessor;
pub use immutable::ImmutablePostProcessor;

use crate::spec::ObjectSpecification;
use crate::validation::ValidationReport;
use facetry_core::Identifier;
use parking_lot::Mutex;
use std::sync::Arc;

/// A whole-metamodel derivation step.
pub trait PostProcessor: Send + Sync {
	/// Name used in logs.
	fn name(&self) -> &'static str {
		let full = std::any::type_name::<Self>();
		full.rsplit("::").next().unwrap_or(full)
	}

	/// Derives facets for `specification`.
	fn post_process(&self, specification: &Arc<ObjectSpecification>, context: &PostProcessingContext<'_>);
}

/// What a post-processor may see besides the specification it is given.
pub struct PostProcessingContext<'a> {
	specifications: &'a [Arc<ObjectSpecification>],
	report: &'a Mutex<ValidationReport>,
}

impl<'a> PostProcessingContext<'a> {
	pub(crate) fn new(
		specifications: &'a [Arc<ObjectSpecification>],
		report: &'a Mutex<ValidationReport>,
	) -> Self {
		Self {
			specifications,
			report,
		}
	}

	/// Every specification in the metamodel, ordered by full name.
	pub fn specifications(&self) -> &[Arc<ObjectSpecification>] {
		self.specifications
	}

	/// The specification with the given full name.
	pub fn specification(&self, full_name: &str) -> Option<&Arc<ObjectSpecification>> {
		self.specifications
			.iter()
			.find(|spec| spec.full_name() == full_name)
	}

	/// Records a structural problem.
	pub fn fail(&self, origin: Identifier, message: impl Into<String>) {
		self.report.lock().push(origin, message);
	}
}
