//! Identifiers for metamodel elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of metamodel element a facet holder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
	/// A domain type as a whole.
	Object,
	/// A scalar or reference property.
	Property,
	/// A collection of references.
	Collection,
	/// An invokable action.
	Action,
	/// A scalar (or reference) action parameter.
	ActionParameterScalar,
	/// A parameter accepting a collection of references.
	ActionParameterCollection,
}

impl FeatureType {
	/// Every feature type, in declaration order.
	pub const ALL: [FeatureType; 6] = [
		FeatureType::Object,
		FeatureType::Property,
		FeatureType::Collection,
		FeatureType::Action,
		FeatureType::ActionParameterScalar,
		FeatureType::ActionParameterCollection,
	];

	/// Feature types belonging to members (properties, collections, actions).
	pub const MEMBERS: [FeatureType; 3] = [
		FeatureType::Property,
		FeatureType::Collection,
		FeatureType::Action,
	];

	/// Feature types belonging to action parameters.
	pub const PARAMETERS: [FeatureType; 2] = [
		FeatureType::ActionParameterScalar,
		FeatureType::ActionParameterCollection,
	];

	/// Properties and scalar parameters: anything that holds a single proposed value.
	pub const VALUE_HOLDERS: [FeatureType; 2] =
		[FeatureType::Property, FeatureType::ActionParameterScalar];

	/// Properties and every kind of action parameter.
	pub const PROPERTIES_AND_PARAMETERS: [FeatureType; 3] = [
		FeatureType::Property,
		FeatureType::ActionParameterScalar,
		FeatureType::ActionParameterCollection,
	];

	/// Returns `true` for properties, collections and actions.
	pub fn is_member(&self) -> bool {
		Self::MEMBERS.contains(self)
	}

	/// Returns `true` for action parameters.
	pub fn is_parameter(&self) -> bool {
		Self::PARAMETERS.contains(self)
	}
}

/// Identifies a type, one of its members, or an action parameter.
///
/// The textual form is `type#member(param, types)` for actions,
/// `type#member` for properties and collections and plain `type` for the
/// type itself. Parameters append `[index]`.
///
/// # Examples
///
/// ```
/// use facetry_core::Identifier;
///
/// let id = Identifier::action("shop.Order", "removeLines", ["shop.Line"]);
/// assert_eq!(id.to_string(), "shop.Order#removeLines(shop.Line)");
/// assert_eq!(id.parameter(0).to_string(), "shop.Order#removeLines(shop.Line)[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
	type_name: String,
	member_name: Option<String>,
	parameter_types: Vec<String>,
	parameter_index: Option<usize>,
	feature_type: FeatureType,
}

impl Identifier {
	/// Identifier for a type.
	pub fn class(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			member_name: None,
			parameter_types: Vec::new(),
			parameter_index: None,
			feature_type: FeatureType::Object,
		}
	}

	/// Identifier for a property.
	pub fn property(type_name: impl Into<String>, name: impl Into<String>) -> Self {
		Self::member(type_name, name, FeatureType::Property)
	}

	/// Identifier for a collection.
	pub fn collection(type_name: impl Into<String>, name: impl Into<String>) -> Self {
		Self::member(type_name, name, FeatureType::Collection)
	}

	/// Identifier for an action with the given parameter types.
	pub fn action<I, S>(type_name: impl Into<String>, name: impl Into<String>, params: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			type_name: type_name.into(),
			member_name: Some(name.into()),
			parameter_types: params.into_iter().map(Into::into).collect(),
			parameter_index: None,
			feature_type: FeatureType::Action,
		}
	}

	fn member(
		type_name: impl Into<String>,
		name: impl Into<String>,
		feature_type: FeatureType,
	) -> Self {
		Self {
			type_name: type_name.into(),
			member_name: Some(name.into()),
			parameter_types: Vec::new(),
			parameter_index: None,
			feature_type,
		}
	}

	/// Derives the identifier of the parameter at `index` of this action.
	///
	/// The parameter's feature type is resolved by the caller through
	/// [`Identifier::with_feature_type`]; it defaults to a scalar parameter.
	pub fn parameter(&self, index: usize) -> Self {
		Self {
			type_name: self.type_name.clone(),
			member_name: self.member_name.clone(),
			parameter_types: self.parameter_types.clone(),
			parameter_index: Some(index),
			feature_type: FeatureType::ActionParameterScalar,
		}
	}

	/// Returns a copy with a different feature type.
	pub fn with_feature_type(mut self, feature_type: FeatureType) -> Self {
		self.feature_type = feature_type;
		self
	}

	/// Full name of the owning type.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Member name, or `None` for a type identifier.
	pub fn member_name(&self) -> Option<&str> {
		self.member_name.as_deref()
	}

	/// Parameter type names of an action.
	pub fn parameter_types(&self) -> &[String] {
		&self.parameter_types
	}

	/// Parameter index, for parameter identifiers.
	pub fn parameter_index(&self) -> Option<usize> {
		self.parameter_index
	}

	/// Feature type of the identified element.
	pub fn feature_type(&self) -> FeatureType {
		self.feature_type
	}

	/// The member name, falling back to the simple type name.
	///
	/// The simple type name is the part after the last `.` or `::`.
	pub fn short_name(&self) -> &str {
		match &self.member_name {
			Some(name) => name,
			None => simple_name(&self.type_name),
		}
	}
}

fn simple_name(full_name: &str) -> &str {
	let after_colons = full_name.rsplit("::").next().unwrap_or(full_name);
	after_colons.rsplit('.').next().unwrap_or(after_colons)
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.type_name)?;
		if let Some(member) = &self.member_name {
			write!(f, "#{member}")?;
		}
		if self.feature_type == FeatureType::Action || self.parameter_index.is_some() {
			write!(f, "({})", self.parameter_types.join(", "))?;
		}
		if let Some(index) = self.parameter_index {
			write!(f, "[{index}]")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_class_identifier_display() {
		let id = Identifier::class("shop.Order");
		assert_eq!(id.to_string(), "shop.Order");
		assert_eq!(id.feature_type(), FeatureType::Object);
		assert_eq!(id.short_name(), "Order");
	}

	#[rstest]
	#[case(Identifier::property("shop.Order", "number"), "shop.Order#number")]
	#[case(Identifier::collection("shop.Order", "lines"), "shop.Order#lines")]
	#[case(
		Identifier::action("shop.Order", "addLine", ["shop.Product", "i64"]),
		"shop.Order#addLine(shop.Product, i64)"
	)]
	#[case(Identifier::action("shop.Order", "submit", Vec::<String>::new()), "shop.Order#submit()")]
	fn test_member_identifier_display(#[case] id: Identifier, #[case] expected: &str) {
		assert_eq!(id.to_string(), expected);
	}

	#[rstest]
	fn test_parameter_identifier() {
		// Arrange
		let action = Identifier::action("shop.Order", "removeLines", ["shop.Line"]);

		// Act
		let param = action
			.parameter(0)
			.with_feature_type(FeatureType::ActionParameterCollection);

		// Assert
		assert_eq!(param.parameter_index(), Some(0));
		assert_eq!(param.feature_type(), FeatureType::ActionParameterCollection);
		assert_eq!(param.member_name(), Some("removeLines"));
		assert_ne!(param, action);
	}

	#[rstest]
	#[case("shop::model::Order", "Order")]
	#[case("shop.Order", "Order")]
	#[case("Order", "Order")]
	fn test_short_name_strips_path(#[case] full: &str, #[case] expected: &str) {
		assert_eq!(Identifier::class(full).short_name(), expected);
	}

	#[rstest]
	fn test_feature_type_groups() {
		assert!(FeatureType::Collection.is_member());
		assert!(!FeatureType::Object.is_member());
		assert!(FeatureType::ActionParameterCollection.is_parameter());
		assert_eq!(FeatureType::ALL.len(), 6);
	}
}
