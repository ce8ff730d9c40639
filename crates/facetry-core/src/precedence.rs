//! Facet precedence.

use serde::{Deserialize, Serialize};

/// Ordering rule deciding whether a newly contributed facet may replace an
/// existing facet of the same type.
///
/// A facet replaces the current one when its precedence is greater than or
/// equal to the current precedence. `High` therefore has the final say: only
/// another `High` facet can displace it.
///
/// # Examples
///
/// ```
/// use facetry_core::Precedence;
///
/// assert!(Precedence::High > Precedence::Default);
/// assert!(Precedence::Default.may_replace(Precedence::Fallback));
/// assert!(!Precedence::Default.may_replace(Precedence::High));
/// ```
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Precedence {
	/// Installed when nothing more specific is known.
	Fallback,
	/// Contributed from declared metadata.
	#[default]
	Default,
	/// Final say; typically derived by post-processing.
	High,
}

impl Precedence {
	/// Whether a facet of this precedence may replace one of `existing` precedence.
	pub fn may_replace(self, existing: Precedence) -> bool {
		self >= existing
	}
}
