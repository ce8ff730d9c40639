//! Facet holders.
//!
//! A [`FacetHolder`] stores at most one facet per facet type and gates
//! replacement on [`Precedence`](facetry_core::Precedence). Holders are mutable while the metamodel is
//! being built and become a lock-free, read-only map once frozen.

use crate::facet::{Facet, FacetType};
use facetry_core::Identifier;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::{Arc, OnceLock};

type FacetMap = IndexMap<FacetType, Arc<dyn Facet>>;

/// Container of facets owned by one metamodel element.
pub struct FacetHolder {
	identifier: Identifier,
	building: RwLock<FacetMap>,
	frozen: OnceLock<FacetMap>,
}

impl FacetHolder {
	/// Creates an empty holder for the element named by `identifier`.
	pub fn new(identifier: Identifier) -> Self {
		Self {
			identifier,
			building: RwLock::new(IndexMap::new()),
			frozen: OnceLock::new(),
		}
	}

	/// Identifier of the owning element.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Adds a facet, replacing the current facet of the same type iff the new
	/// facet's precedence is greater than or equal to the current one.
	///
	/// Returns `true` if the facet was accepted. Always returns `false` once
	/// the holder has been frozen.
	///
	/// # Examples
	///
	/// ```
	/// use facetry_core::{Identifier, Precedence};
	/// use facetry_metamodel::facet::Facet;
	/// use facetry_metamodel::holder::FacetHolder;
	///
	/// #[derive(Debug)]
	/// struct Label(&'static str, Precedence);
	///
	/// impl Facet for Label {
	///     fn precedence(&self) -> Precedence {
	///         self.1
	///     }
	/// }
	///
	/// let holder = FacetHolder::new(Identifier::class("shop.Order"));
	/// assert!(holder.add_facet(Label("first", Precedence::Default)));
	/// assert!(!holder.add_facet(Label("weaker", Precedence::Fallback)));
	/// assert_eq!(holder.get_facet::<Label>().unwrap().0, "first");
	/// ```
	pub fn add_facet<F: Facet>(&self, facet: F) -> bool {
		self.add_facet_arc(Arc::new(facet))
	}

	/// Adds an already boxed facet; see [`FacetHolder::add_facet`].
	pub fn add_facet_arc(&self, facet: Arc<dyn Facet>) -> bool {
		if self.frozen.get().is_some() {
			tracing::warn!(
				holder = %self.identifier,
				facet = facet.facet_name(),
				"facet rejected: holder is frozen"
			);
			return false;
		}

		let key = FacetType::of_facet(facet.as_ref());
		let mut facets = self.building.write();
		if let Some(existing) = facets.get(&key)
			&& !facet.precedence().may_replace(existing.precedence())
		{
			tracing::debug!(
				holder = %self.identifier,
				facet = %key,
				existing = ?existing.precedence(),
				incoming = ?facet.precedence(),
				"facet discarded by precedence"
			);
			return false;
		}
		facets.insert(key, facet);
		true
	}

	/// Returns the facet of type `F`, if present.
	pub fn get_facet<F: Facet>(&self) -> Option<Arc<F>> {
		let facet = self.get_facet_dyn(FacetType::of::<F>())?;
		let any: Arc<dyn Any + Send + Sync> = facet;
		any.downcast::<F>().ok()
	}

	/// Returns the facet stored under `facet_type`, if present.
	pub fn get_facet_dyn(&self, facet_type: FacetType) -> Option<Arc<dyn Facet>> {
		match self.frozen.get() {
			Some(facets) => facets.get(&facet_type).cloned(),
			None => self.building.read().get(&facet_type).cloned(),
		}
	}

	/// Whether a facet of type `F` is present.
	pub fn has_facet<F: Facet>(&self) -> bool {
		self.contains(FacetType::of::<F>())
	}

	/// Whether a facet is stored under `facet_type`.
	pub fn contains(&self, facet_type: FacetType) -> bool {
		match self.frozen.get() {
			Some(facets) => facets.contains_key(&facet_type),
			None => self.building.read().contains_key(&facet_type),
		}
	}

	/// Snapshot of all facets, in the order their types were first added.
	pub fn facets(&self) -> Vec<Arc<dyn Facet>> {
		match self.frozen.get() {
			Some(facets) => facets.values().cloned().collect(),
			None => self.building.read().values().cloned().collect(),
		}
	}

	/// Facet types present, in the order they were first added.
	pub fn facet_types(&self) -> Vec<FacetType> {
		match self.frozen.get() {
			Some(facets) => facets.keys().copied().collect(),
			None => self.building.read().keys().copied().collect(),
		}
	}

	/// Number of facets.
	pub fn len(&self) -> usize {
		match self.frozen.get() {
			Some(facets) => facets.len(),
			None => self.building.read().len(),
		}
	}

	/// Whether the holder has no facets.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Freezes the holder. Subsequent reads take no lock; additions are rejected.
	pub(crate) fn freeze(&self) {
		let facets = std::mem::take(&mut *self.building.write());
		if self.frozen.set(facets).is_err() {
			tracing::debug!(holder = %self.identifier, "holder already frozen");
		}
	}

	/// Whether [`FacetHolder::freeze`] has run.
	pub fn is_frozen(&self) -> bool {
		self.frozen.get().is_some()
	}
}

impl std::fmt::Debug for FacetHolder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FacetHolder")
			.field("identifier", &self.identifier.to_string())
			.field("facets", &self.facet_types())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use facetry_core::Precedence;
	use rstest::{fixture, rstest};

	#[derive(Debug)]
	struct TagFacet {
		value: &'static str,
		precedence: Precedence,
	}

	impl Facet for TagFacet {
		fn precedence(&self) -> Precedence {
			self.precedence
		}
	}

	#[derive(Debug)]
	struct OtherFacet;

	impl Facet for OtherFacet {}

	fn tag(value: &'static str, precedence: Precedence) -> TagFacet {
		TagFacet { value, precedence }
	}

	#[fixture]
	fn holder() -> FacetHolder {
		FacetHolder::new(Identifier::property("shop.Order", "number"))
	}

	#[rstest]
	#[case(Precedence::Fallback, Precedence::Fallback, "second")]
	#[case(Precedence::Fallback, Precedence::Default, "second")]
	#[case(Precedence::Fallback, Precedence::High, "second")]
	#[case(Precedence::Default, Precedence::Fallback, "first")]
	#[case(Precedence::Default, Precedence::Default, "second")]
	#[case(Precedence::Default, Precedence::High, "second")]
	#[case(Precedence::High, Precedence::Fallback, "first")]
	#[case(Precedence::High, Precedence::Default, "first")]
	#[case(Precedence::High, Precedence::High, "second")]
	fn test_precedence_gated_replacement(
		holder: FacetHolder,
		#[case] first: Precedence,
		#[case] second: Precedence,
		#[case] expected: &str,
	) {
		// Arrange
		holder.add_facet(tag("first", first));

		// Act
		let accepted = holder.add_facet(tag("second", second));

		// Assert
		assert_eq!(accepted, expected == "second");
		assert_eq!(holder.get_facet::<TagFacet>().unwrap().value, expected);
		assert_eq!(holder.len(), 1);
	}

	#[rstest]
	fn test_distinct_types_coexist(holder: FacetHolder) {
		holder.add_facet(tag("a", Precedence::Default));
		holder.add_facet(OtherFacet);

		assert!(holder.has_facet::<TagFacet>());
		assert!(holder.has_facet::<OtherFacet>());
		assert_eq!(
			holder.facet_types(),
			vec![FacetType::of::<TagFacet>(), FacetType::of::<OtherFacet>()]
		);
	}

	#[rstest]
	fn test_replacement_keeps_insertion_position(holder: FacetHolder) {
		holder.add_facet(tag("a", Precedence::Default));
		holder.add_facet(OtherFacet);
		holder.add_facet(tag("b", Precedence::High));

		assert_eq!(holder.facet_types()[0], FacetType::of::<TagFacet>());
		assert_eq!(holder.get_facet::<TagFacet>().unwrap().value, "b");
	}

	#[rstest]
	fn test_missing_facet(holder: FacetHolder) {
		assert!(holder.get_facet::<TagFacet>().is_none());
		assert!(!holder.has_facet::<TagFacet>());
		assert!(holder.is_empty());
	}

	#[rstest]
	fn test_frozen_holder_rejects_additions(holder: FacetHolder) {
		// Arrange
		holder.add_facet(tag("kept", Precedence::Default));

		// Act
		holder.freeze();
		let accepted = holder.add_facet(tag("late", Precedence::High));

		// Assert
		assert!(holder.is_frozen());
		assert!(!accepted);
		assert_eq!(holder.get_facet::<TagFacet>().unwrap().value, "kept");
		assert_eq!(holder.len(), 1);
	}
}
