//! Permissible values: fixed choices, choices taken from a collection, and
//! search-as-you-type.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use crate::managed::ManagedObject;
use crate::object::ObjectValue;
use facetry_core::FeatureType;
use std::fmt;
use std::sync::Arc;

/// Where the choices come from.
#[derive(Debug, Clone)]
pub enum ChoicesSource {
	/// A fixed list declared on the element.
	Fixed(Vec<ObjectValue>),
	/// The current contents of a collection of the target object.
	FromCollection {
		/// Name of the sibling collection.
		collection: String,
	},
}

/// The values a property or parameter may take.
#[derive(Debug, Clone)]
pub struct ChoicesFacet {
	source: ChoicesSource,
}

impl ChoicesFacet {
	/// A fixed list of choices.
	pub fn fixed(values: Vec<ObjectValue>) -> Self {
		Self {
			source: ChoicesSource::Fixed(values),
		}
	}

	/// Choices read from `collection` on the target at evaluation time.
	pub fn from_collection(collection: impl Into<String>) -> Self {
		Self {
			source: ChoicesSource::FromCollection {
				collection: collection.into(),
			},
		}
	}

	/// Where the choices come from.
	pub fn source(&self) -> &ChoicesSource {
		&self.source
	}

	/// The choices for `target`.
	///
	/// Collection-backed choices reflect the collection's contents at the time
	/// of the call; an empty target yields no choices.
	pub fn choices(&self, target: &ManagedObject) -> Vec<ObjectValue> {
		match &self.source {
			ChoicesSource::Fixed(values) => values.clone(),
			ChoicesSource::FromCollection { collection } => target
				.pojo()
				.map(|pojo| {
					pojo.collection(collection)
						.into_iter()
						.map(ObjectValue::Reference)
						.collect()
				})
				.unwrap_or_default(),
		}
	}
}

impl Facet for ChoicesFacet {
	fn is_derived(&self) -> bool {
		matches!(self.source, ChoicesSource::FromCollection { .. })
	}
}

type SearchFn = dyn Fn(&ManagedObject, &str) -> Vec<ObjectValue> + Send + Sync;

/// A search function for [`AutoCompleteFacet`].
#[derive(Clone)]
pub struct AutoCompleteSearch(Arc<SearchFn>);

impl AutoCompleteSearch {
	/// Wraps a search function.
	pub fn new<F>(search: F) -> Self
	where
		F: Fn(&ManagedObject, &str) -> Vec<ObjectValue> + Send + Sync + 'static,
	{
		Self(Arc::new(search))
	}

	/// Runs the search.
	pub fn search(&self, target: &ManagedObject, text: &str) -> Vec<ObjectValue> {
		(self.0)(target, text)
	}
}

impl fmt::Debug for AutoCompleteSearch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AutoCompleteSearch(..)")
	}
}

/// Search-as-you-type candidates.
#[derive(Debug, Clone)]
pub struct AutoCompleteFacet {
	min_length: usize,
	search: AutoCompleteSearch,
}

impl AutoCompleteFacet {
	/// Creates the facet.
	pub fn new(min_length: usize, search: AutoCompleteSearch) -> Self {
		Self { min_length, search }
	}

	/// Characters required before searching.
	pub fn min_length(&self) -> usize {
		self.min_length
	}

	/// Candidates for `text`; empty while `text` is shorter than the minimum.
	pub fn candidates(&self, target: &ManagedObject, text: &str) -> Vec<ObjectValue> {
		if text.chars().count() < self.min_length {
			return Vec::new();
		}
		self.search.search(target, text)
	}
}

impl Facet for AutoCompleteFacet {}

/// Installs [`ChoicesFacet`] from `Choices(..)`.
#[derive(Debug, Default)]
pub struct ChoicesFacetFactory;

impl FacetFactory for ChoicesFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::PROPERTIES_AND_PARAMETERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some(values) = context.find_metadata(|m| match m {
			Metadata::Choices(values) => Some(values.clone()),
			_ => None,
		}) {
			context.add_facet(ChoicesFacet::fixed(values));
		}
	}
}

/// Installs [`AutoCompleteFacet`] from `AutoComplete { .. }`.
#[derive(Debug, Default)]
pub struct AutoCompleteFacetFactory;

impl FacetFactory for AutoCompleteFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::PROPERTIES_AND_PARAMETERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some((min_length, search)) = context.find_metadata(|m| match m {
			Metadata::AutoComplete { min_length, search } => Some((*min_length, search.clone())),
			_ => None,
		}) {
			context.add_facet(AutoCompleteFacet::new(min_length, search));
		}
	}
}
