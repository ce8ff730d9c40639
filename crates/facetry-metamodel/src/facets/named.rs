//! Display names and descriptions.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use facetry_core::{FeatureType, Precedence};

/// Name shown to users.
#[derive(Debug, Clone)]
pub struct NamedFacet {
	name: String,
	precedence: Precedence,
}

impl NamedFacet {
	/// An explicitly declared name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			precedence: Precedence::Default,
		}
	}

	/// A name derived from the identifier, used when nothing is declared.
	pub fn fallback(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			precedence: Precedence::Fallback,
		}
	}

	/// The name.
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl Facet for NamedFacet {
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn is_derived(&self) -> bool {
		self.precedence == Precedence::Fallback
	}
}

/// Description shown to users, e.g. as a tooltip.
#[derive(Debug, Clone)]
pub struct DescribedAsFacet {
	description: String,
}

impl DescribedAsFacet {
	/// Creates the facet.
	pub fn new(description: impl Into<String>) -> Self {
		Self {
			description: description.into(),
		}
	}

	/// The description.
	pub fn description(&self) -> &str {
		&self.description
	}
}

impl Facet for DescribedAsFacet {}

/// Turns `removeLines`, `unit_price` or `Order` into `Remove Lines`, `Unit Price`, `Order`.
pub fn natural_name(identifier: &str) -> String {
	let mut words: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut previous_lower = false;
	for c in identifier.chars() {
		if c == '_' || c == '-' || c == ' ' {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			previous_lower = false;
			continue;
		}
		if c.is_uppercase() && previous_lower && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}
		previous_lower = c.is_lowercase() || c.is_ascii_digit();
		current.push(c);
	}
	if !current.is_empty() {
		words.push(current);
	}
	words
		.iter()
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Installs [`NamedFacet`] (declared or derived) and [`DescribedAsFacet`].
#[derive(Debug, Default)]
pub struct NamedFacetFactory;

impl FacetFactory for NamedFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::ALL
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		let fallback = match context.parameter() {
			Some((_, parameter)) => natural_name(&parameter.name),
			None if context.feature_type() == FeatureType::Object => {
				let logical = context.class().logical_name.as_str();
				logical.rsplit(['.', ':']).next().unwrap_or(logical).to_string()
			}
			None => natural_name(context.identifier().short_name()),
		};
		context.add_facet(NamedFacet::fallback(fallback));

		if let Some(name) = context.find_metadata(|m| match m {
			Metadata::Named(name) => Some(name.clone()),
			_ => None,
		}) {
			context.add_facet(NamedFacet::new(name));
		}
		if let Some(description) = context.find_metadata(|m| match m {
			Metadata::DescribedAs(text) => Some(text.clone()),
			_ => None,
		}) {
			context.add_facet(DescribedAsFacet::new(description));
		}
	}
}
