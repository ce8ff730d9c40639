//! # Facetry
//!
//! A runtime metamodel engine. Facetry builds one specification per domain
//! type by composing small, independent facets, then answers at request time
//! whether a member is visible, usable, and whether a proposed value is valid.
//!
//! ## Feature Flags
//!
//! - `metamodel` (default) - The specification loader, facet catalogue,
//!   post-processors and interaction evaluation
//!
//! Without `metamodel` only the shared vocabulary from `facetry-core` is
//! exported.
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "metamodel")]
//! # {
//! use facetry::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = ClassRegistry::with_builtin_values().with_class(
//!     ClassDescriptor::new("library.Book")
//!         .with_metadata(Metadata::Entity)
//!         .with_member(MemberDescriptor::property("isbn", "string").with_metadata(Metadata::RegEx("[0-9-]+".into()))),
//! );
//! let loader = SpecificationLoader::builder().introspector(registry).build();
//! loader.bootstrap(["library.Book"]).unwrap();
//!
//! let book = loader.adapt(Arc::new(DynamicObject::new("library.Book"))).unwrap();
//! let head = InteractionHead::new(book.clone(), Actor::new("librarian"));
//! let isbn = book.specification().member("isbn").unwrap();
//!
//! assert_eq!(
//!     isbn.validate_property(&head, Some("not an isbn".into())).unwrap(),
//!     Consent::Veto("Doesn't match pattern [0-9-]+".to_string())
//! );
//! # }
//! ```

pub use facetry_core::{
	Actor, BeanSort, FeatureType, Identifier, InitiatedBy, MetamodelError, MetamodelResult, Precedence,
	Where,
};

#[cfg(feature = "metamodel")]
pub use facetry_metamodel::{
	Consent, DomainObject, DynamicObject, Facet, FacetFactory, FacetHolder, InteractionHead, ManagedObject,
	MetamodelSettings, ObjectMember, ObjectSpecification, ObjectValue, Pojo, PostProcessor, ProgrammingModel,
	SpecificationLoader, ValidationReport,
};

/// The shared vocabulary crate.
pub mod core {
	pub use facetry_core::*;
}

/// The metamodel engine crate.
#[cfg(feature = "metamodel")]
pub mod metamodel {
	pub use facetry_metamodel::*;
}

/// Commonly used items.
pub mod prelude {
	pub use facetry_core::{Actor, BeanSort, InitiatedBy, MetamodelError, MetamodelResult, Where};

	#[cfg(feature = "metamodel")]
	pub use facetry_metamodel::prelude::*;
}
