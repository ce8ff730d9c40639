//! The facet factory contract.
//!
//! A factory looks at the declared metadata of one class, member or
//! parameter and adds facets to its holder. Factories run in the order the
//! [`ProgrammingModel`](crate::programming_model::ProgrammingModel) lists
//! them and only see the element they are invoked for.

use crate::facet::Facet;
use crate::holder::FacetHolder;
use crate::introspection::{ClassDescriptor, MemberDescriptor, Metadata, ParameterDescriptor};
use crate::validation::ValidationReport;
use facetry_core::{FeatureType, Identifier};
use parking_lot::Mutex;

/// A contributor of facets for one concern.
pub trait FacetFactory: Send + Sync {
	/// Name used in logs.
	fn name(&self) -> &'static str {
		let full = std::any::type_name::<Self>();
		full.rsplit("::").next().unwrap_or(full)
	}

	/// Feature types this factory is invoked for.
	fn feature_types(&self) -> &'static [FeatureType];

	/// Inspects the element described by `context` and adds facets.
	fn process(&self, context: &ProcessingContext<'_>);
}

/// Everything a factory may look at while processing one element.
pub struct ProcessingContext<'a> {
	class: &'a ClassDescriptor,
	member: Option<&'a MemberDescriptor>,
	parameter: Option<(usize, &'a ParameterDescriptor)>,
	feature_type: FeatureType,
	holder: &'a FacetHolder,
	report: &'a Mutex<ValidationReport>,
}

impl<'a> ProcessingContext<'a> {
	pub(crate) fn for_class(
		class: &'a ClassDescriptor,
		holder: &'a FacetHolder,
		report: &'a Mutex<ValidationReport>,
	) -> Self {
		Self {
			class,
			member: None,
			parameter: None,
			feature_type: FeatureType::Object,
			holder,
			report,
		}
	}

	pub(crate) fn for_member(
		class: &'a ClassDescriptor,
		member: &'a MemberDescriptor,
		feature_type: FeatureType,
		holder: &'a FacetHolder,
		report: &'a Mutex<ValidationReport>,
	) -> Self {
		Self {
			class,
			member: Some(member),
			parameter: None,
			feature_type,
			holder,
			report,
		}
	}

	pub(crate) fn for_parameter(
		class: &'a ClassDescriptor,
		member: &'a MemberDescriptor,
		index: usize,
		parameter: &'a ParameterDescriptor,
		feature_type: FeatureType,
		holder: &'a FacetHolder,
		report: &'a Mutex<ValidationReport>,
	) -> Self {
		Self {
			class,
			member: Some(member),
			parameter: Some((index, parameter)),
			feature_type,
			holder,
			report,
		}
	}

	/// The class being introspected.
	pub fn class(&self) -> &ClassDescriptor {
		self.class
	}

	/// The member, unless a class is being processed.
	pub fn member(&self) -> Option<&MemberDescriptor> {
		self.member
	}

	/// The parameter and its position, when a parameter is being processed.
	pub fn parameter(&self) -> Option<(usize, &ParameterDescriptor)> {
		self.parameter
	}

	/// Feature type of the element being processed.
	pub fn feature_type(&self) -> FeatureType {
		self.feature_type
	}

	/// Identifier of the element being processed.
	pub fn identifier(&self) -> &Identifier {
		self.holder.identifier()
	}

	/// The element's facet holder.
	pub fn holder(&self) -> &FacetHolder {
		self.holder
	}

	/// Metadata declared on the element being processed.
	pub fn metadata(&self) -> &[Metadata] {
		match (self.parameter, self.member) {
			(Some((_, parameter)), _) => &parameter.metadata,
			(None, Some(member)) => &member.metadata,
			(None, None) => &self.class.metadata,
		}
	}

	/// First metadata tag for which `select` returns a value.
	pub fn find_metadata<T>(&self, select: impl FnMut(&Metadata) -> Option<T>) -> Option<T> {
		self.metadata().iter().find_map(select)
	}

	/// Whether a tag matching `predicate` is declared.
	pub fn has_metadata(&self, predicate: impl FnMut(&Metadata) -> bool) -> bool {
		self.metadata().iter().any(predicate)
	}

	/// Adds a facet to the element's holder.
	pub fn add_facet<F: Facet>(&self, facet: F) -> bool {
		self.holder.add_facet(facet)
	}

	/// Records a structural problem on the element being processed.
	pub fn fail(&self, message: impl Into<String>) {
		self.report.lock().push(self.identifier().clone(), message);
	}
}
