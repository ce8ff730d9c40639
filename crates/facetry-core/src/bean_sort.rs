//! Classification of domain types.

use serde::{Deserialize, Serialize};

/// The classification of a domain type.
///
/// Bean sort scopes which derivations apply: for example, type-level hiding
/// is only derived for entities, view models and abstract types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeanSort {
	/// A persistent domain object.
	Entity,
	/// A non-persisted object whose state is carried in its identity.
	ViewModel,
	/// A singleton domain service.
	ManagedService,
	/// A type that is never instantiated directly.
	Abstract,
	/// A value type such as a string or number.
	Value,
	/// A type explicitly excluded from the metamodel.
	Vetoed,
	/// Nothing declared allows the type to be classified.
	Unknown,
}

impl BeanSort {
	/// Entities and view models.
	pub fn is_domain_object(self) -> bool {
		matches!(self, BeanSort::Entity | BeanSort::ViewModel)
	}

	/// Whether members of this type are introspected.
	pub fn is_introspectable(self) -> bool {
		!matches!(self, BeanSort::Vetoed | BeanSort::Value)
	}

	/// Whether post-processors deriving type-level hiding consider this type.
	pub fn is_hideable(self) -> bool {
		matches!(
			self,
			BeanSort::Entity | BeanSort::ViewModel | BeanSort::Abstract
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(BeanSort::Entity, true)]
	#[case(BeanSort::ViewModel, true)]
	#[case(BeanSort::Abstract, true)]
	#[case(BeanSort::ManagedService, false)]
	#[case(BeanSort::Value, false)]
	#[case(BeanSort::Unknown, false)]
	fn test_is_hideable(#[case] sort: BeanSort, #[case] expected: bool) {
		assert_eq!(sort.is_hideable(), expected);
	}

	#[rstest]
	fn test_is_introspectable() {
		assert!(BeanSort::Entity.is_introspectable());
		assert!(!BeanSort::Vetoed.is_introspectable());
		assert!(!BeanSort::Value.is_introspectable());
	}
}
