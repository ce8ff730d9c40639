//! Member layout order.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use facetry_core::FeatureType;
use std::cmp::Ordering;

/// Position of a member among its siblings.
#[derive(Debug, Clone)]
pub struct MemberOrderFacet {
	sequence: String,
	group: Option<String>,
}

impl MemberOrderFacet {
	/// Creates the facet.
	pub fn new(sequence: impl Into<String>, group: Option<String>) -> Self {
		Self {
			sequence: sequence.into(),
			group,
		}
	}

	/// Dewey-decimal sequence, e.g. `"1.2"`.
	pub fn sequence(&self) -> &str {
		&self.sequence
	}

	/// Layout group.
	pub fn group(&self) -> Option<&str> {
		self.group.as_deref()
	}
}

impl Facet for MemberOrderFacet {}

/// One dot-separated component of a sequence.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Component<'a> {
	Number(u64),
	Text(&'a str),
}

impl<'a> Component<'a> {
	fn parse(raw: &'a str) -> Self {
		let raw = raw.trim();
		raw.parse().map_or(Self::Text(raw), Self::Number)
	}
}

/// Compares two dewey-decimal sequences component by component.
///
/// Numeric components compare numerically and sort before any non-numeric
/// component; non-numeric components compare lexically. A sequence that is
/// a prefix of another sorts first.
pub fn compare_sequences(a: &str, b: &str) -> Ordering {
	a.split('.')
		.map(Component::parse)
		.cmp(b.split('.').map(Component::parse))
}

/// Installs [`MemberOrderFacet`] from `MemberOrder { sequence, group }`.
#[derive(Debug, Default)]
pub struct MemberOrderFacetFactory;

impl FacetFactory for MemberOrderFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::MEMBERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some((sequence, group)) = context.find_metadata(|m| match m {
			Metadata::MemberOrder { sequence, group } => Some((sequence.clone(), group.clone())),
			_ => None,
		}) {
			context.add_facet(MemberOrderFacet::new(sequence, group));
		}
	}
}
