//! # Facetry Metamodel
//!
//! Runtime metamodel engine: builds one [`ObjectSpecification`] per domain
//! type by composing small facets contributed by independent factories, and
//! evaluates visibility, usability and validity against live instances.
//!
//! ## Lifecycle
//!
//! 1. An introspection adapter ([`ClassIntrospector`]) describes domain classes.
//! 2. The [`SpecificationLoader`] runs the [`ProgrammingModel`]'s facet
//!    factories over every reachable class, caching placeholders first so
//!    cyclic type graphs resolve.
//! 3. Post-processors derive cross-cutting facets over the complete set.
//! 4. The metamodel is frozen; from then on it is read without locks.
//!
//! Structural problems found on the way end up in a [`ValidationReport`].
//!
//! ## Example
//!
//! ```
//! use facetry_core::{Actor, Where};
//! use facetry_metamodel::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = ClassRegistry::with_builtin_values().with_class(
//!     ClassDescriptor::new("shop.Order")
//!         .with_metadata(Metadata::Entity)
//!         .with_member(MemberDescriptor::property("number", "string").with_metadata(Metadata::MaxLength(8)))
//!         .with_member(MemberDescriptor::property("notes", "string").with_metadata(Metadata::Hidden(Where::Everywhere))),
//! );
//! let loader = SpecificationLoader::builder().introspector(registry).build();
//! loader.bootstrap(["shop.Order"]).unwrap();
//!
//! let order = loader.adapt(Arc::new(DynamicObject::new("shop.Order"))).unwrap();
//! let head = InteractionHead::new(order.clone(), Actor::new("alice"));
//! let spec = order.specification();
//!
//! assert!(spec.member("notes").unwrap().is_visible(&head).unwrap().is_vetoed());
//! assert!(spec
//!     .member("number")
//!     .unwrap()
//!     .validate_property(&head, Some("far too long".into()))
//!     .unwrap()
//!     .is_vetoed());
//! ```

#![warn(missing_docs)]

pub mod facet;
pub mod facets;
pub mod factory;
pub mod holder;
pub mod interaction;
pub mod introspection;
pub mod loader;
pub mod managed;
pub mod member;
pub mod object;
pub mod postprocessing;
pub mod programming_model;
pub mod settings;
pub mod spec;
pub mod validation;

pub use facet::{Facet, FacetType};
pub use factory::{FacetFactory, ProcessingContext};
pub use holder::FacetHolder;
pub use interaction::{Consent, InteractionHead, InteractionResultSet};
pub use introspection::ClassIntrospector;
pub use loader::{MetamodelPhase, SpecificationLoader, SpecificationLoaderBuilder};
pub use managed::ManagedObject;
pub use member::{ActionParameter, MemberKind, ObjectMember};
pub use object::{DomainObject, DynamicObject, ObjectValue, Pojo};
pub use postprocessing::{PostProcessingContext, PostProcessor};
pub use programming_model::ProgrammingModel;
pub use settings::MetamodelSettings;
pub use spec::{ObjectSpecification, SpecState};
pub use validation::{ValidationFailure, ValidationReport};

// Re-exported for `register_domain_class!`.
#[doc(hidden)]
pub use inventory;

/// Commonly used items.
pub mod prelude {
	pub use crate::facet::Facet;
	pub use crate::interaction::{
		Consent, InteractionHead, UsabilityContext, ValidityContext, ValidityKind, VisibilityContext,
	};
	pub use crate::introspection::{
		ClassDescriptor, ClassIntrospector, ClassRegistry, MemberDescriptor, Metadata,
		ParameterDescriptor, TypeRef,
	};
	pub use crate::loader::SpecificationLoader;
	pub use crate::managed::ManagedObject;
	pub use crate::member::{ActionParameter, MemberKind, ObjectMember};
	pub use crate::object::{DomainObject, DynamicObject, ObjectValue, Pojo};
	pub use crate::programming_model::ProgrammingModel;
	pub use crate::settings::MetamodelSettings;
	pub use crate::spec::ObjectSpecification;
	pub use crate::validation::ValidationReport;
	pub use crate::register_domain_class;
}
