//! Startup validation report.
//!
//! Structural problems found while building the metamodel are not errors:
//! each one is appended here and bootstrap carries on, so that a single run
//! reports everything that is wrong. The caller decides whether to abort.

use facetry_core::{Identifier, MetamodelError, MetamodelResult};
use serde::Serialize;
use std::fmt;

/// One structural problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidationFailure {
	/// The element the problem was found on.
	pub origin: Identifier,
	/// Human-readable description.
	pub message: String,
}

impl fmt::Display for ValidationFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.origin, self.message)
	}
}

/// Ordered list of structural problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
	failures: Vec<ValidationFailure>,
}

impl ValidationReport {
	/// An empty report.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a failure. A failure identical to one already reported is
	/// ignored so that re-running a phase does not duplicate entries.
	pub fn push(&mut self, origin: Identifier, message: impl Into<String>) {
		let failure = ValidationFailure {
			origin,
			message: message.into(),
		};
		if self.failures.contains(&failure) {
			return;
		}
		tracing::warn!(origin = %failure.origin, message = %failure.message, "metamodel validation failure");
		self.failures.push(failure);
	}

	/// Failures in the order they were found.
	pub fn failures(&self) -> &[ValidationFailure] {
		&self.failures
	}

	/// Failure messages prefixed with their origin.
	pub fn messages(&self) -> Vec<String> {
		self.failures.iter().map(ToString::to_string).collect()
	}

	/// Number of failures.
	pub fn len(&self) -> usize {
		self.failures.len()
	}

	/// Whether no failure was found.
	pub fn is_empty(&self) -> bool {
		self.failures.is_empty()
	}

	/// Converts a non-empty report into [`MetamodelError::Validation`].
	pub fn into_result(self) -> MetamodelResult<()> {
		if self.failures.is_empty() {
			return Ok(());
		}
		Err(MetamodelError::Validation {
			count: self.failures.len(),
			summary: self.messages().join("; "),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_report_keeps_order_and_ignores_duplicates() {
		// Arrange
		let mut report = ValidationReport::new();

		// Act
		report.push(Identifier::class("shop.Order"), "no classification");
		report.push(Identifier::property("shop.Order", "number"), "max length must be positive");
		report.push(Identifier::class("shop.Order"), "no classification");

		// Assert
		assert_eq!(report.len(), 2);
		assert_eq!(
			report.messages(),
			vec![
				"shop.Order: no classification",
				"shop.Order#number: max length must be positive",
			]
		);
	}

	#[rstest]
	fn test_into_result() {
		assert!(ValidationReport::new().into_result().is_ok());

		let mut report = ValidationReport::new();
		report.push(Identifier::class("a.A"), "first");
		report.push(Identifier::class("b.B"), "second");
		let error = report.into_result().unwrap_err();
		assert!(matches!(
			error,
			MetamodelError::Validation { count: 2, ref summary } if summary == "a.A: first; b.B: second"
		));
	}
}
