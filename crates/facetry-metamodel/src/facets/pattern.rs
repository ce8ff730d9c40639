//! Regular expression constraint on textual values.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{ValidatingAdvisor, ValidityContext};
use crate::introspection::Metadata;
use facetry_core::FeatureType;
use regex::Regex;

/// Rejects textual values that do not match the pattern as a whole.
#[derive(Debug, Clone)]
pub struct RegexFacet {
	pattern: String,
	regex: Regex,
}

impl RegexFacet {
	/// Compiles `pattern`, anchored at both ends.
	pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
		let pattern = pattern.into();
		let regex = Regex::new(&format!("^(?:{pattern})$"))?;
		Ok(Self { pattern, regex })
	}

	/// The pattern as declared.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Whether `text` matches.
	pub fn matches(&self, text: &str) -> bool {
		self.regex.is_match(text)
	}
}

impl Facet for RegexFacet {
	fn as_validating_advisor(&self) -> Option<&dyn ValidatingAdvisor> {
		Some(self)
	}
}

impl ValidatingAdvisor for RegexFacet {
	fn invalidates(&self, context: &ValidityContext) -> Option<String> {
		let text = context.proposed()?.as_str()?;
		if text.is_empty() || self.matches(text) {
			return None;
		}
		Some(format!("Doesn't match pattern {}", self.pattern))
	}
}

/// Installs [`RegexFacet`] from `RegEx(pattern)`. An invalid pattern is a structural error.
#[derive(Debug, Default)]
pub struct RegexFacetFactory;

impl FacetFactory for RegexFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::VALUE_HOLDERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		let Some(pattern) = context.find_metadata(|m| match m {
			Metadata::RegEx(pattern) => Some(pattern.clone()),
			_ => None,
		}) else {
			return;
		};
		match RegexFacet::new(pattern.as_str()) {
			Ok(facet) => {
				context.add_facet(facet);
			}
			Err(error) => context.fail(format!("invalid regular expression '{pattern}': {error}")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("[A-Z]-\\d+", "A-17", true)]
	#[case("[A-Z]-\\d+", "xA-17", false)]
	#[case("[A-Z]-\\d+", "A-17x", false)]
	#[case("a|b", "ab", false)]
	fn test_pattern_is_anchored(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
		let facet = RegexFacet::new(pattern).unwrap();
		assert_eq!(facet.matches(text), expected);
	}

	#[rstest]
	fn test_invalid_pattern_rejected() {
		assert!(RegexFacet::new("(unclosed").is_err());
	}
}
