//! The acting identity of an interaction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The user (or system principal) on whose behalf an interaction runs.
///
/// Passed explicitly into every interaction context; nothing in the
/// metamodel reads the acting identity from ambient state.
///
/// # Examples
///
/// ```
/// use facetry_core::Actor;
///
/// let actor = Actor::new("sven").with_role("clerk");
/// assert!(actor.has_role("clerk"));
/// assert!(!actor.has_role("admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	name: String,
	roles: BTreeSet<String>,
	#[serde(default)]
	locale: Option<String>,
}

impl Actor {
	/// Creates an actor without roles.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			roles: BTreeSet::new(),
			locale: None,
		}
	}

	/// The system principal used for framework-initiated work.
	pub fn system() -> Self {
		Self::new("__system").with_role("__system")
	}

	/// Adds a role.
	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.roles.insert(role.into());
		self
	}

	/// Sets the preferred locale.
	pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}

	/// The actor's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The actor's roles, sorted.
	pub fn roles(&self) -> impl Iterator<Item = &str> {
		self.roles.iter().map(String::as_str)
	}

	/// Whether the actor holds `role`.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.contains(role)
	}

	/// The actor's preferred locale, if any.
	pub fn locale(&self) -> Option<&str> {
		self.locale.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_roles_are_sorted_and_deduplicated() {
		let actor = Actor::new("joe")
			.with_role("b")
			.with_role("a")
			.with_role("b");
		assert_eq!(actor.roles().collect::<Vec<_>>(), vec!["a", "b"]);
	}

	#[rstest]
	fn test_system_actor() {
		let actor = Actor::system();
		assert_eq!(actor.name(), "__system");
		assert!(actor.has_role("__system"));
		assert_eq!(actor.locale(), None);
	}
}
