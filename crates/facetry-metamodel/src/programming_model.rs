//! The ordered lists of facet factories and post-processors.

use crate::facets::{
	AuthorizationFacetFactory, AuthorizationOracle, AutoCompleteFacetFactory, ChoicesFacetFactory,
	DefaultsFacetFactory, DisabledFacetFactory, HiddenFacetFactory, HiddenTypeFacetFactory,
	ImmutableFacetFactory, MandatoryFacetFactory, MandatoryFallbackFactory, MaxLengthFacetFactory,
	MemberOrderFacetFactory, MustSatisfyFacetFactory, NamedFacetFactory, RegexFacetFactory,
	ValueFacetFactory,
};
use crate::factory::FacetFactory;
use crate::postprocessing::{
	ClassificationValidator, CollectionParameterPostProcessor, HiddenTypeFromMembersPostProcessor,
	ImmutablePostProcessor, PostProcessor,
};
use crate::settings::MetamodelSettings;
use std::fmt;
use std::sync::Arc;

/// Which factories run, and in which order, while building the metamodel.
///
/// Order matters: when two factories contribute facets of the same type at
/// the same precedence, the one listed later wins.
///
/// # Examples
///
/// ```
/// use facetry_metamodel::facets::{HiddenFacetFactory, NamedFacetFactory};
/// use facetry_metamodel::programming_model::ProgrammingModel;
///
/// let model = ProgrammingModel::empty()
///     .with_factory(NamedFacetFactory)
///     .with_factory(HiddenFacetFactory);
/// assert_eq!(model.factory_names(), vec!["NamedFacetFactory", "HiddenFacetFactory"]);
/// ```
#[derive(Clone, Default)]
pub struct ProgrammingModel {
	factories: Vec<Arc<dyn FacetFactory>>,
	post_processors: Vec<Arc<dyn PostProcessor>>,
}

impl ProgrammingModel {
	/// A model without factories or post-processors.
	pub fn empty() -> Self {
		Self::default()
	}

	/// The bundled catalogue, with post-processors toggled by `settings`.
	pub fn from_settings(settings: &MetamodelSettings) -> Self {
		let mut model = Self::empty()
			.with_factory(NamedFacetFactory)
			.with_factory(ValueFacetFactory)
			.with_factory(HiddenTypeFacetFactory)
			.with_factory(ImmutableFacetFactory)
			.with_factory(HiddenFacetFactory)
			.with_factory(DisabledFacetFactory)
			.with_factory(MandatoryFallbackFactory)
			.with_factory(MandatoryFacetFactory)
			.with_factory(MaxLengthFacetFactory)
			.with_factory(RegexFacetFactory)
			.with_factory(MustSatisfyFacetFactory)
			.with_factory(MemberOrderFacetFactory)
			.with_factory(ChoicesFacetFactory)
			.with_factory(AutoCompleteFacetFactory)
			.with_factory(DefaultsFacetFactory)
			.with_post_processor(ClassificationValidator);

		let post_processing = &settings.post_processing;
		if post_processing.hide_types_without_visible_members {
			model = model.with_post_processor(HiddenTypeFromMembersPostProcessor);
		}
		if post_processing.infer_parameters_from_collections {
			model = model.with_post_processor(CollectionParameterPostProcessor);
		}
		if post_processing.disable_properties_of_immutable_types {
			model = model.with_post_processor(ImmutablePostProcessor);
		}
		model
	}

	/// Appends a factory.
	pub fn with_factory(mut self, factory: impl FacetFactory + 'static) -> Self {
		self.factories.push(Arc::new(factory));
		self
	}

	/// Appends a post-processor.
	pub fn with_post_processor(mut self, post_processor: impl PostProcessor + 'static) -> Self {
		self.post_processors.push(Arc::new(post_processor));
		self
	}

	/// Appends a factory that consults `oracle` for every member.
	pub fn with_authorization(self, oracle: Arc<dyn AuthorizationOracle>) -> Self {
		self.with_factory(AuthorizationFacetFactory::new(oracle))
	}

	/// Factories in pipeline order.
	pub fn factories(&self) -> &[Arc<dyn FacetFactory>] {
		&self.factories
	}

	/// Post-processors in run order.
	pub fn post_processors(&self) -> &[Arc<dyn PostProcessor>] {
		&self.post_processors
	}

	/// Factory names in pipeline order.
	pub fn factory_names(&self) -> Vec<&'static str> {
		self.factories.iter().map(|factory| factory.name()).collect()
	}

	/// Post-processor names in run order.
	pub fn post_processor_names(&self) -> Vec<&'static str> {
		self.post_processors.iter().map(|p| p.name()).collect()
	}
}

impl fmt::Debug for ProgrammingModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProgrammingModel")
			.field("factories", &self.factory_names())
			.field("post_processors", &self.post_processor_names())
			.finish()
	}
}
