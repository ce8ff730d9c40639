//! Pairing of a live instance with its specification.

use crate::object::Pojo;
use crate::spec::ObjectSpecification;
use std::sync::Arc;

/// A live domain instance (or none) together with its specification.
///
/// Created by the caller for one operation; the metamodel never keeps one
/// beyond the evaluation it was passed to.
#[derive(Debug, Clone)]
pub struct ManagedObject {
	specification: Arc<ObjectSpecification>,
	pojo: Option<Pojo>,
}

impl ManagedObject {
	/// Wraps an instance.
	pub fn new(specification: Arc<ObjectSpecification>, pojo: Pojo) -> Self {
		Self {
			specification,
			pojo: Some(pojo),
		}
	}

	/// A managed object without an instance, e.g. for type-level questions.
	pub fn empty(specification: Arc<ObjectSpecification>) -> Self {
		Self {
			specification,
			pojo: None,
		}
	}

	/// The specification of the instance's type.
	pub fn specification(&self) -> &Arc<ObjectSpecification> {
		&self.specification
	}

	/// The instance, if any.
	pub fn pojo(&self) -> Option<&Pojo> {
		self.pojo.as_ref()
	}

	/// Whether there is no instance.
	pub fn is_empty(&self) -> bool {
		self.pojo.is_none()
	}

	/// Title of the instance, falling back to the logical type name.
	pub fn title(&self) -> String {
		self.pojo
			.as_ref()
			.and_then(|pojo| pojo.title())
			.unwrap_or_else(|| self.specification.logical_name().to_string())
	}
}
