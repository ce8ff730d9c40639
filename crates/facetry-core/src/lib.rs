//! # Facetry Core
//!
//! Shared vocabulary for the Facetry metamodel.
//!
//! This crate holds the small value types that every other Facetry crate
//! speaks in terms of. It contains no metamodel logic of its own.
//!
//! ## Modules
//!
//! - [`error`]: [`MetamodelError`] and the [`MetamodelResult`] alias
//! - [`identifier`]: [`Identifier`] and [`FeatureType`] naming a type, member or parameter
//! - [`precedence`]: [`Precedence`] governing facet replacement
//! - [`region`]: [`Where`] (UI region) and [`InitiatedBy`]
//! - [`bean_sort`]: [`BeanSort`] classification of domain types
//! - [`actor`]: [`Actor`], the acting identity threaded through every interaction

#![warn(missing_docs)]

pub mod actor;
pub mod bean_sort;
pub mod error;
pub mod identifier;
pub mod precedence;
pub mod region;

pub use actor::Actor;
pub use bean_sort::BeanSort;
pub use error::{MetamodelError, MetamodelResult};
pub use identifier::{FeatureType, Identifier};
pub use precedence::Precedence;
pub use region::{InitiatedBy, Where};
