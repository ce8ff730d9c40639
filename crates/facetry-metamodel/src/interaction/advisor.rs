//! Advisor capabilities.
//!
//! A facet takes part in request-time evaluation by implementing one of these
//! traits and returning itself from the matching `Facet::as_*_advisor`
//! accessor. Every advisor answers with a veto reason, or `None` to allow.

use super::context::{UsabilityContext, ValidityContext, VisibilityContext};

/// Decides whether an element is hidden.
pub trait HidingAdvisor {
	/// Returns the reason the element is hidden, or `None` if it is visible.
	fn hides(&self, context: &VisibilityContext) -> Option<String>;
}

/// Decides whether a member can be edited or invoked.
pub trait DisablingAdvisor {
	/// Returns the reason the member is disabled, or `None` if it is usable.
	fn disables(&self, context: &UsabilityContext) -> Option<String>;
}

/// Decides whether a proposed value, argument list or object is valid.
pub trait ValidatingAdvisor {
	/// Returns the reason the proposal is invalid, or `None` if it is valid.
	fn invalidates(&self, context: &ValidityContext) -> Option<String>;
}
