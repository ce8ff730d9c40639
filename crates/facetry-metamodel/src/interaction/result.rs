//! Interaction outcomes.

use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;

/// Final verdict of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "consent", content = "reason", rename_all = "snake_case")]
pub enum Consent {
	/// The interaction may proceed.
	Allow,
	/// The interaction is denied for the given reason.
	Veto(String),
}

impl Consent {
	/// Builds a consent from an advisor answer.
	pub fn from_reason(reason: Option<String>) -> Self {
		match reason {
			Some(reason) => Consent::Veto(reason),
			None => Consent::Allow,
		}
	}

	/// Whether the interaction may proceed.
	pub fn is_allowed(&self) -> bool {
		matches!(self, Consent::Allow)
	}

	/// Whether the interaction is denied.
	pub fn is_vetoed(&self) -> bool {
		!self.is_allowed()
	}

	/// The veto reason.
	pub fn reason(&self) -> Option<&str> {
		match self {
			Consent::Allow => None,
			Consent::Veto(reason) => Some(reason),
		}
	}
}

impl fmt::Display for Consent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Consent::Allow => f.write_str("allowed"),
			Consent::Veto(reason) => write!(f, "vetoed: {reason}"),
		}
	}
}

/// How an [`InteractionResultSet`] treats a veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
	/// Stop at the first veto (visibility, usability).
	FirstVeto,
	/// Collect every veto (validity).
	AllVetoes,
}

/// One veto recorded in a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Veto {
	/// Name of the facet that vetoed.
	pub advisor: &'static str,
	/// The reason given.
	pub reason: String,
}

/// Accumulates advisor answers for one context.
#[derive(Debug, Clone)]
pub struct InteractionResultSet {
	aggregation: Aggregation,
	vetoes: Vec<Veto>,
	consulted: usize,
}

impl InteractionResultSet {
	/// Creates an empty result set.
	pub fn new(aggregation: Aggregation) -> Self {
		Self {
			aggregation,
			vetoes: Vec::new(),
			consulted: 0,
		}
	}

	/// Records one advisor's answer.
	///
	/// Returns [`ControlFlow::Break`] once no further advisor needs to be asked.
	pub fn record(&mut self, advisor: &'static str, reason: Option<String>) -> ControlFlow<()> {
		self.consulted += 1;
		let Some(reason) = reason else {
			return ControlFlow::Continue(());
		};
		self.vetoes.push(Veto { advisor, reason });
		match self.aggregation {
			Aggregation::FirstVeto => ControlFlow::Break(()),
			Aggregation::AllVetoes => ControlFlow::Continue(()),
		}
	}

	/// Appends every veto of another result set.
	pub fn merge(&mut self, other: InteractionResultSet) {
		self.consulted += other.consulted;
		self.vetoes.extend(other.vetoes);
	}

	/// Whether any advisor vetoed.
	pub fn is_vetoed(&self) -> bool {
		!self.vetoes.is_empty()
	}

	/// Recorded vetoes in the order they were given.
	pub fn vetoes(&self) -> &[Veto] {
		&self.vetoes
	}

	/// Reasons in the order they were given.
	pub fn reasons(&self) -> impl Iterator<Item = &str> {
		self.vetoes.iter().map(|veto| veto.reason.as_str())
	}

	/// Number of advisors asked.
	pub fn consulted(&self) -> usize {
		self.consulted
	}

	/// Collapses the set into a verdict; several reasons are joined with `"; "`.
	pub fn into_consent(self) -> Consent {
		if self.vetoes.is_empty() {
			return Consent::Allow;
		}
		let reasons: Vec<String> = self.vetoes.into_iter().map(|veto| veto.reason).collect();
		Consent::Veto(reasons.join("; "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_first_veto_short_circuits() {
		// Arrange
		let mut results = InteractionResultSet::new(Aggregation::FirstVeto);

		// Act
		let first = results.record("HiddenFacet", None);
		let second = results.record("AuthorizationFacet", Some("Not authorized".into()));

		// Assert
		assert_eq!(first, ControlFlow::Continue(()));
		assert_eq!(second, ControlFlow::Break(()));
		assert_eq!(results.consulted(), 2);
		assert_eq!(results.into_consent(), Consent::Veto("Not authorized".into()));
	}

	#[rstest]
	fn test_all_vetoes_aggregated() {
		let mut results = InteractionResultSet::new(Aggregation::AllVetoes);
		results.record("MaxLengthFacet", Some("too long".into()));
		results.record("RegexFacet", Some("bad format".into()));

		assert_eq!(results.vetoes().len(), 2);
		assert_eq!(results.reasons().collect::<Vec<_>>(), vec!["too long", "bad format"]);
		assert_eq!(
			results.into_consent().reason(),
			Some("too long; bad format")
		);
	}

	#[rstest]
	fn test_empty_set_allows() {
		let results = InteractionResultSet::new(Aggregation::AllVetoes);
		assert!(!results.is_vetoed());
		assert!(results.into_consent().is_allowed());
	}

	#[rstest]
	#[case(Consent::Allow, "allowed")]
	#[case(Consent::Veto("Hidden".into()), "vetoed: Hidden")]
	fn test_consent_display(#[case] consent: Consent, #[case] expected: &str) {
		assert_eq!(consent.to_string(), expected);
	}
}
