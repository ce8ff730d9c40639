//! Introspection adapter.
//!
//! The metamodel learns about domain types through [`ClassIntrospector`]:
//! given a type name, the adapter enumerates the type's members and their
//! declared metadata. How the adapter obtains that information (explicit
//! registration tables, generated code, link-time registration) does not
//! leak into the facet factories, which only ever see [`ClassDescriptor`]s.
//!
//! [`ClassRegistry`] is the bundled adapter. Classes can be registered
//! programmatically or at link time through [`register_domain_class!`].
//!
//! # Examples
//!
//! ```
//! use facetry_metamodel::introspection::{
//!     ClassDescriptor, ClassIntrospector, ClassRegistry, MemberDescriptor, Metadata,
//! };
//!
//! let registry = ClassRegistry::with_builtin_values();
//! registry
//!     .register(
//!         ClassDescriptor::new("shop.Customer")
//!             .with_metadata(Metadata::Entity)
//!             .with_member(
//!                 MemberDescriptor::property("name", "string").with_metadata(Metadata::MaxLength(40)),
//!             ),
//!     )
//!     .unwrap();
//!
//! let customer = registry.describe("shop.Customer").unwrap();
//! assert_eq!(customer.members.len(), 1);
//! ```

use crate::facets::choices::AutoCompleteSearch;
use crate::facets::must_satisfy::Specification;
use crate::facets::value::ValueKind;
use crate::object::ObjectValue;
use facetry_core::{MetamodelError, MetamodelResult, Where};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A declared metadata tag on a class, member or parameter.
#[derive(Clone)]
pub enum Metadata {
	/// The class is a persistent entity.
	Entity,
	/// The class is a view model.
	ViewModel,
	/// The class is a domain service.
	DomainService,
	/// The class is a value type parsed from text as `ValueKind`.
	Value(ValueKind),
	/// The class or member is excluded from the metamodel.
	Programmatic,
	/// Hidden in the given region.
	Hidden(Where),
	/// Not editable/invokable in the given region.
	Disabled {
		/// Region in which the member is disabled.
		where_: Where,
		/// Veto reason.
		reason: String,
	},
	/// A value is required.
	Mandatory,
	/// A value is optional.
	Optional,
	/// Maximum length of the textual value.
	MaxLength(usize),
	/// Regular expression the textual value must match.
	RegEx(String),
	/// Display name.
	Named(String),
	/// Description, e.g. for tooltips.
	DescribedAs(String),
	/// Position among the type's members.
	MemberOrder {
		/// Dewey-decimal sequence such as `"1.2"`.
		sequence: String,
		/// Optional layout group.
		group: Option<String>,
	},
	/// A fixed set of permissible values.
	Choices(Vec<ObjectValue>),
	/// Search-as-you-type candidates.
	AutoComplete {
		/// Minimum number of characters before searching.
		min_length: usize,
		/// Search function.
		search: AutoCompleteSearch,
	},
	/// Default value for a parameter.
	Default(ObjectValue),
	/// Instances of the class cannot be changed through the UI.
	Immutable,
	/// Specifications every proposed value must satisfy.
	MustSatisfy(Vec<Arc<dyn Specification>>),
}

impl fmt::Debug for Metadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Metadata::Entity => f.write_str("Entity"),
			Metadata::ViewModel => f.write_str("ViewModel"),
			Metadata::DomainService => f.write_str("DomainService"),
			Metadata::Value(kind) => write!(f, "Value({kind:?})"),
			Metadata::Programmatic => f.write_str("Programmatic"),
			Metadata::Hidden(where_) => write!(f, "Hidden({where_:?})"),
			Metadata::Disabled { where_, reason } => {
				write!(f, "Disabled({where_:?}, {reason:?})")
			}
			Metadata::Mandatory => f.write_str("Mandatory"),
			Metadata::Optional => f.write_str("Optional"),
			Metadata::MaxLength(n) => write!(f, "MaxLength({n})"),
			Metadata::RegEx(pattern) => write!(f, "RegEx({pattern:?})"),
			Metadata::Named(name) => write!(f, "Named({name:?})"),
			Metadata::DescribedAs(text) => write!(f, "DescribedAs({text:?})"),
			Metadata::MemberOrder { sequence, group } => {
				write!(f, "MemberOrder({sequence:?}, {group:?})")
			}
			Metadata::Choices(values) => write!(f, "Choices({} values)", values.len()),
			Metadata::AutoComplete { min_length, .. } => {
				write!(f, "AutoComplete(min_length = {min_length})")
			}
			Metadata::Default(value) => write!(f, "Default({})", value.to_text()),
			Metadata::Immutable => f.write_str("Immutable"),
			Metadata::MustSatisfy(specs) => write!(f, "MustSatisfy({specs:?})"),
		}
	}
}

/// The declared type of a property, parameter or action result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
	/// A single value or reference.
	Scalar(String),
	/// A collection whose elements have the given type.
	Collection(String),
}

impl TypeRef {
	/// The scalar type, or the element type of a collection.
	pub fn type_name(&self) -> &str {
		match self {
			TypeRef::Scalar(name) | TypeRef::Collection(name) => name,
		}
	}

	/// Whether this is a collection type.
	pub fn is_collection(&self) -> bool {
		matches!(self, TypeRef::Collection(_))
	}
}

/// One action parameter.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
	/// Parameter name.
	pub name: String,
	/// Declared type.
	pub type_ref: TypeRef,
	/// Declared metadata.
	pub metadata: Vec<Metadata>,
}

impl ParameterDescriptor {
	/// A scalar (single value or reference) parameter.
	pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			type_ref: TypeRef::Scalar(type_name.into()),
			metadata: Vec::new(),
		}
	}

	/// A parameter accepting a collection of `element_type`.
	pub fn collection(name: impl Into<String>, element_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			type_ref: TypeRef::Collection(element_type.into()),
			metadata: Vec::new(),
		}
	}

	/// Adds a metadata tag.
	pub fn with_metadata(mut self, metadata: Metadata) -> Self {
		self.metadata.push(metadata);
		self
	}
}

/// Structural shape of a member.
#[derive(Debug, Clone)]
pub enum MemberShape {
	/// A single-valued property of the given type.
	Property(String),
	/// A collection of the given element type.
	Collection(String),
	/// An action.
	Action {
		/// Parameters, in order.
		parameters: Vec<ParameterDescriptor>,
		/// Declared result type, if any.
		returns: Option<TypeRef>,
	},
}

/// One member of a class.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
	/// Member name, unique within its class.
	pub name: String,
	/// Property, collection or action.
	pub shape: MemberShape,
	/// Declared metadata.
	pub metadata: Vec<Metadata>,
}

impl MemberDescriptor {
	/// A property of type `type_name`.
	pub fn property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
		Self::with_shape(name, MemberShape::Property(type_name.into()))
	}

	/// A collection of `element_type`.
	pub fn collection(name: impl Into<String>, element_type: impl Into<String>) -> Self {
		Self::with_shape(name, MemberShape::Collection(element_type.into()))
	}

	/// An action without parameters or result.
	pub fn action(name: impl Into<String>) -> Self {
		Self::with_shape(
			name,
			MemberShape::Action {
				parameters: Vec::new(),
				returns: None,
			},
		)
	}

	fn with_shape(name: impl Into<String>, shape: MemberShape) -> Self {
		Self {
			name: name.into(),
			shape,
			metadata: Vec::new(),
		}
	}

	/// Appends a parameter. Ignored for properties and collections.
	pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
		if let MemberShape::Action { parameters, .. } = &mut self.shape {
			parameters.push(parameter);
		}
		self
	}

	/// Sets the result type. Ignored for properties and collections.
	pub fn returning(mut self, type_ref: TypeRef) -> Self {
		if let MemberShape::Action { returns, .. } = &mut self.shape {
			*returns = Some(type_ref);
		}
		self
	}

	/// Adds a metadata tag.
	pub fn with_metadata(mut self, metadata: Metadata) -> Self {
		self.metadata.push(metadata);
		self
	}

	/// Parameters of an action; empty for other members.
	pub fn parameters(&self) -> &[ParameterDescriptor] {
		match &self.shape {
			MemberShape::Action { parameters, .. } => parameters,
			_ => &[],
		}
	}
}

/// Everything the metamodel needs to know about one domain class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
	/// Unique full type name; the cache key of the specification.
	pub full_name: String,
	/// Logical type name used in messages and by viewers.
	pub logical_name: String,
	/// Whether the class cannot be instantiated.
	pub is_abstract: bool,
	/// Full name of the supertype, if any.
	pub supertype: Option<String>,
	/// Class-level metadata.
	pub metadata: Vec<Metadata>,
	/// Members in declaration order, inherited members included.
	pub members: Vec<MemberDescriptor>,
}

impl ClassDescriptor {
	/// A concrete class without metadata or members whose logical name equals its full name.
	pub fn new(full_name: impl Into<String>) -> Self {
		let full_name = full_name.into();
		Self {
			logical_name: full_name.clone(),
			full_name,
			is_abstract: false,
			supertype: None,
			metadata: Vec::new(),
			members: Vec::new(),
		}
	}

	/// Sets the logical type name.
	pub fn with_logical_name(mut self, logical_name: impl Into<String>) -> Self {
		self.logical_name = logical_name.into();
		self
	}

	/// Marks the class abstract.
	pub fn abstract_type(mut self) -> Self {
		self.is_abstract = true;
		self
	}

	/// Sets the supertype.
	pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
		self.supertype = Some(supertype.into());
		self
	}

	/// Adds a class-level metadata tag.
	pub fn with_metadata(mut self, metadata: Metadata) -> Self {
		self.metadata.push(metadata);
		self
	}

	/// Appends a member.
	pub fn with_member(mut self, member: MemberDescriptor) -> Self {
		self.members.push(member);
		self
	}

	/// Whether a metadata tag matching `predicate` is declared on the class.
	pub fn has_metadata(&self, predicate: impl Fn(&Metadata) -> bool) -> bool {
		self.metadata.iter().any(predicate)
	}
}

/// Source of class descriptors for the specification loader.
pub trait ClassIntrospector: Send + Sync {
	/// Describes the class with the given full name.
	fn describe(&self, full_name: &str) -> Option<ClassDescriptor>;

	/// Every class this adapter knows, in registration order.
	fn known_types(&self) -> Vec<String>;
}

/// Link-time registration of a domain class.
///
/// Submitted through [`register_domain_class!`] and collected by
/// [`ClassRegistry::from_inventory`].
pub struct DomainClassRegistration {
	describe: fn() -> ClassDescriptor,
}

impl DomainClassRegistration {
	/// Wraps a describing function.
	pub const fn new(describe: fn() -> ClassDescriptor) -> Self {
		Self { describe }
	}

	/// Produces the descriptor.
	pub fn descriptor(&self) -> ClassDescriptor {
		(self.describe)()
	}
}

inventory::collect!(DomainClassRegistration);

/// Registers a domain class at link time.
///
/// # Examples
///
/// ```ignore
/// use facetry_metamodel::introspection::{ClassDescriptor, Metadata};
///
/// fn describe_customer() -> ClassDescriptor {
///     ClassDescriptor::new("shop.Customer").with_metadata(Metadata::Entity)
/// }
///
/// facetry_metamodel::register_domain_class!(describe_customer);
/// ```
#[macro_export]
macro_rules! register_domain_class {
	($describe:expr) => {
		$crate::inventory::submit! {
			$crate::introspection::DomainClassRegistration::new($describe)
		}
	};
}

/// Explicit registration table of class descriptors.
#[derive(Default)]
pub struct ClassRegistry {
	classes: RwLock<IndexMap<String, ClassDescriptor>>,
}

impl ClassRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with the built-in value types `string`, `i64`, `f64` and `bool`.
	pub fn with_builtin_values() -> Self {
		let registry = Self::new();
		{
			let mut classes = registry.classes.write();
			for (name, kind) in [
				("string", ValueKind::String),
				("i64", ValueKind::Integer),
				("f64", ValueKind::Decimal),
				("bool", ValueKind::Boolean),
			] {
				classes.insert(
					name.to_string(),
					ClassDescriptor::new(name).with_metadata(Metadata::Value(kind)),
				);
			}
		}
		registry
	}

	/// Creates a registry holding the built-in value types and every class
	/// registered through [`register_domain_class!`].
	///
	/// Link-time registrations that clash with an earlier one are skipped
	/// with a warning.
	pub fn from_inventory() -> Self {
		let registry = Self::with_builtin_values();
		for registration in inventory::iter::<DomainClassRegistration>() {
			let descriptor = registration.descriptor();
			if let Err(error) = registry.register(descriptor) {
				tracing::warn!(%error, "skipping link-time class registration");
			}
		}
		registry
	}

	/// Registers a class.
	///
	/// # Errors
	///
	/// Returns [`MetamodelError::DuplicateType`] if a class with the same
	/// full name is already registered.
	pub fn register(&self, descriptor: ClassDescriptor) -> MetamodelResult<()> {
		let mut classes = self.classes.write();
		if classes.contains_key(&descriptor.full_name) {
			return Err(MetamodelError::DuplicateType(descriptor.full_name));
		}
		classes.insert(descriptor.full_name.clone(), descriptor);
		Ok(())
	}

	/// Builder-style registration; duplicates replace the earlier descriptor.
	pub fn with_class(self, descriptor: ClassDescriptor) -> Self {
		self.classes
			.write()
			.insert(descriptor.full_name.clone(), descriptor);
		self
	}

	/// Whether a class is registered.
	pub fn contains(&self, full_name: &str) -> bool {
		self.classes.read().contains_key(full_name)
	}

	/// Number of registered classes.
	pub fn len(&self) -> usize {
		self.classes.read().len()
	}

	/// Whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.classes.read().is_empty()
	}
}

impl ClassIntrospector for ClassRegistry {
	fn describe(&self, full_name: &str) -> Option<ClassDescriptor> {
		self.classes.read().get(full_name).cloned()
	}

	fn known_types(&self) -> Vec<String> {
		self.classes.read().keys().cloned().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builtin_values_registered() {
		let registry = ClassRegistry::with_builtin_values();
		assert!(registry.contains("string"));
		assert!(registry.contains("bool"));
		assert_eq!(registry.len(), 4);
		let string = registry.describe("string").unwrap();
		assert!(string.has_metadata(|m| matches!(m, Metadata::Value(ValueKind::String))));
	}

	#[rstest]
	fn test_duplicate_registration_rejected() {
		// Arrange
		let registry = ClassRegistry::new();
		registry.register(ClassDescriptor::new("shop.Order")).unwrap();

		// Act
		let result = registry.register(ClassDescriptor::new("shop.Order"));

		// Assert
		assert!(matches!(result, Err(MetamodelError::DuplicateType(name)) if name == "shop.Order"));
	}

	#[rstest]
	fn test_known_types_in_registration_order() {
		let registry = ClassRegistry::new()
			.with_class(ClassDescriptor::new("b.Second"))
			.with_class(ClassDescriptor::new("a.First"));
		assert_eq!(registry.known_types(), vec!["b.Second", "a.First"]);
	}

	#[rstest]
	fn test_action_builder_collects_parameters() {
		let action = MemberDescriptor::action("removeLines")
			.with_parameter(ParameterDescriptor::collection("chosen", "shop.Line"))
			.with_parameter(ParameterDescriptor::scalar("note", "string"))
			.returning(TypeRef::Scalar("shop.Order".to_string()));

		assert_eq!(action.parameters().len(), 2);
		assert!(action.parameters()[0].type_ref.is_collection());
		assert_eq!(action.parameters()[1].type_ref.type_name(), "string");
		assert!(matches!(
			action.shape,
			MemberShape::Action { returns: Some(TypeRef::Scalar(ref t)), .. } if t == "shop.Order"
		));
	}

	#[rstest]
	fn test_parameters_ignored_on_properties() {
		let property = MemberDescriptor::property("number", "string")
			.with_parameter(ParameterDescriptor::scalar("x", "string"));
		assert!(property.parameters().is_empty());
	}

	#[rstest]
	fn test_logical_name_defaults_to_full_name() {
		let class = ClassDescriptor::new("shop::model::Order");
		assert_eq!(class.logical_name, "shop::model::Order");
		let class = class.with_logical_name("shop.Order");
		assert_eq!(class.logical_name, "shop.Order");
	}
}
