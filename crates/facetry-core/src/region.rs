//! UI regions and interaction initiators.

use serde::{Deserialize, Serialize};

/// The region of a user interface in which a member is rendered.
///
/// Facets such as "hidden" carry the regions they apply to. A facet whose
/// configured region does not include the requested region is not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Where {
	/// Every region.
	#[default]
	Everywhere,
	/// Synonym for [`Where::Everywhere`].
	Anywhere,
	/// The form displaying a single object.
	ObjectForms,
	/// A table embedded in the page of a parent object.
	ParentedTables,
	/// A table shown on its own, e.g. the result of an action.
	StandaloneTables,
	/// Both parented and standalone tables.
	AllTables,
	/// A column referencing the parent object of a parented table.
	ReferencesParent,
	/// No region at all.
	Nowhere,
	/// The region was not specified by the caller.
	NotSpecified,
}

impl Where {
	/// Whether this configured region covers the requested `context` region.
	///
	/// # Examples
	///
	/// ```
	/// use facetry_core::Where;
	///
	/// assert!(Where::AllTables.includes(Where::ParentedTables));
	/// assert!(!Where::ObjectForms.includes(Where::StandaloneTables));
	/// assert!(!Where::Nowhere.includes(Where::ObjectForms));
	/// ```
	pub fn includes(self, context: Where) -> bool {
		match self {
			Where::Everywhere | Where::Anywhere => true,
			Where::Nowhere => false,
			Where::AllTables => matches!(
				context,
				Where::AllTables | Where::ParentedTables | Where::StandaloneTables
			),
			other => other == context,
		}
	}

	/// Whether this region applies everywhere.
	pub fn is_always(self) -> bool {
		matches!(self, Where::Everywhere | Where::Anywhere)
	}
}

/// Who initiated an interaction.
///
/// Framework-initiated interactions bypass all visibility, usability and
/// validity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiatedBy {
	/// An end user acting through a viewer.
	#[default]
	User,
	/// The framework itself (e.g. persistence, fixtures).
	Framework,
}

impl InitiatedBy {
	/// Returns `true` if interaction rules must be enforced.
	pub fn is_user(self) -> bool {
		self == InitiatedBy::User
	}
}
