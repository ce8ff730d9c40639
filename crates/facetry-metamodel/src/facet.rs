//! The facet abstraction.
//!
//! A facet is a small, immutable capability contribution attached to exactly
//! one metamodel element. Each facet struct is its own facet type: the
//! holder stores at most one facet per concrete struct.

use crate::interaction::advisor::{DisablingAdvisor, HidingAdvisor, ValidatingAdvisor};
use facetry_core::Precedence;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A typed capability contribution.
///
/// Implementors are plain structs carrying their payload. Facets that take
/// part in request-time evaluation expose themselves through the
/// `as_*_advisor` accessors.
///
/// # Examples
///
/// ```
/// use facetry_metamodel::facet::Facet;
/// use facetry_core::Precedence;
///
/// #[derive(Debug)]
/// struct AuditedFacet;
///
/// impl Facet for AuditedFacet {
///     fn precedence(&self) -> Precedence {
///         Precedence::Fallback
///     }
/// }
/// ```
pub trait Facet: Any + Send + Sync + fmt::Debug {
	/// Precedence used when another facet of the same type is added.
	fn precedence(&self) -> Precedence {
		Precedence::Default
	}

	/// Whether the facet was derived from other facets rather than declared.
	fn is_derived(&self) -> bool {
		false
	}

	/// Human-readable facet type name, used in logs and veto bookkeeping.
	fn facet_name(&self) -> &'static str {
		short_type_name(std::any::type_name::<Self>())
	}

	/// This facet as a visibility advisor, if it is one.
	fn as_hiding_advisor(&self) -> Option<&dyn HidingAdvisor> {
		None
	}

	/// This facet as a usability advisor, if it is one.
	fn as_disabling_advisor(&self) -> Option<&dyn DisablingAdvisor> {
		None
	}

	/// This facet as a validity advisor, if it is one.
	fn as_validating_advisor(&self) -> Option<&dyn ValidatingAdvisor> {
		None
	}
}

fn short_type_name(full: &'static str) -> &'static str {
	full.rsplit("::").next().unwrap_or(full)
}

/// Key under which a facet is stored in a holder.
///
/// Equality and hashing use the concrete type only; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct FacetType {
	id: TypeId,
	name: &'static str,
}

impl FacetType {
	/// The facet type of `F`.
	pub fn of<F: Facet>() -> Self {
		Self {
			id: TypeId::of::<F>(),
			name: short_type_name(std::any::type_name::<F>()),
		}
	}

	/// The facet type of an existing facet.
	pub fn of_facet(facet: &dyn Facet) -> Self {
		let any: &dyn Any = facet;
		Self {
			id: any.type_id(),
			name: facet.facet_name(),
		}
	}

	/// Diagnostic name of the facet type.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for FacetType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for FacetType {}

impl Hash for FacetType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for FacetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl fmt::Display for FacetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
