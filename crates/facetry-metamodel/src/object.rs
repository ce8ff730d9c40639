//! Live domain instances as seen by the metamodel.
//!
//! The metamodel never inspects domain instances through reflection. An
//! instance exposes its state through [`DomainObject`]; [`DynamicObject`] is
//! a ready-made property-bag implementation.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared handle to a live domain instance.
pub type Pojo = Arc<dyn DomainObject>;

/// Runtime state access for a domain instance.
pub trait DomainObject: Send + Sync + fmt::Debug {
	/// Full name of the instance's type, as known to the introspection adapter.
	fn type_name(&self) -> &str;

	/// Current value of a property, or `None` if it is unset.
	fn property(&self, name: &str) -> Option<ObjectValue>;

	/// Current contents of a collection. Unknown collections are empty.
	fn collection(&self, name: &str) -> Vec<Pojo>;

	/// A human-readable title for the instance.
	fn title(&self) -> Option<String> {
		None
	}
}

/// A value held by a property or proposed for a property or parameter.
#[derive(Clone, Debug)]
pub enum ObjectValue {
	/// A value-type value (string, number, boolean...).
	Scalar(Value),
	/// A reference to another domain instance.
	Reference(Pojo),
	/// Several values, e.g. an argument for a collection parameter.
	List(Vec<ObjectValue>),
}

impl ObjectValue {
	/// The scalar string, if this is a string scalar.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ObjectValue::Scalar(Value::String(s)) => Some(s),
			_ => None,
		}
	}

	/// The scalar, if this is one.
	pub fn as_scalar(&self) -> Option<&Value> {
		match self {
			ObjectValue::Scalar(value) => Some(value),
			_ => None,
		}
	}

	/// The referenced instance, if this is a reference.
	pub fn as_reference(&self) -> Option<&Pojo> {
		match self {
			ObjectValue::Reference(pojo) => Some(pojo),
			_ => None,
		}
	}

	/// Renders the value the way validators see it as text.
	pub fn to_text(&self) -> String {
		match self {
			ObjectValue::Scalar(Value::String(s)) => s.clone(),
			ObjectValue::Scalar(value) => value.to_string(),
			ObjectValue::Reference(pojo) => pojo
				.title()
				.unwrap_or_else(|| format!("{} instance", pojo.type_name())),
			ObjectValue::List(values) => values
				.iter()
				.map(ObjectValue::to_text)
				.collect::<Vec<_>>()
				.join(", "),
		}
	}

	/// Identity-aware equality: references compare by pointer, scalars by value.
	pub fn same_as(&self, other: &ObjectValue) -> bool {
		match (self, other) {
			(ObjectValue::Scalar(a), ObjectValue::Scalar(b)) => a == b,
			(ObjectValue::Reference(a), ObjectValue::Reference(b)) => same_pojo(a, b),
			(ObjectValue::List(a), ObjectValue::List(b)) => {
				a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
			}
			_ => false,
		}
	}
}

impl From<Value> for ObjectValue {
	fn from(value: Value) -> Self {
		ObjectValue::Scalar(value)
	}
}

impl From<&str> for ObjectValue {
	fn from(value: &str) -> Self {
		ObjectValue::Scalar(Value::String(value.to_string()))
	}
}

impl From<Pojo> for ObjectValue {
	fn from(pojo: Pojo) -> Self {
		ObjectValue::Reference(pojo)
	}
}

/// Whether two handles point at the same instance.
pub fn same_pojo(a: &Pojo, b: &Pojo) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A property-bag domain instance.
///
/// Properties and collections can be changed after creation, so anything
/// derived from them (e.g. choices taken from a collection) observes the
/// current contents.
///
/// # Examples
///
/// ```
/// use facetry_metamodel::object::{DomainObject, DynamicObject};
/// use std::sync::Arc;
///
/// let order = DynamicObject::new("shop.Order").with_property("number", "A-17");
/// let line = Arc::new(DynamicObject::new("shop.Line"));
/// order.push_to_collection("lines", line);
///
/// assert_eq!(order.property("number").unwrap().as_str(), Some("A-17"));
/// assert_eq!(order.collection("lines").len(), 1);
/// ```
pub struct DynamicObject {
	type_name: String,
	properties: RwLock<HashMap<String, ObjectValue>>,
	collections: RwLock<HashMap<String, Vec<Pojo>>>,
}

impl DynamicObject {
	/// Creates an instance with no state.
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			properties: RwLock::new(HashMap::new()),
			collections: RwLock::new(HashMap::new()),
		}
	}

	/// Builder-style property assignment.
	pub fn with_property(self, name: impl Into<String>, value: impl Into<ObjectValue>) -> Self {
		self.set_property(name, value);
		self
	}

	/// Sets a property.
	pub fn set_property(&self, name: impl Into<String>, value: impl Into<ObjectValue>) {
		self.properties.write().insert(name.into(), value.into());
	}

	/// Clears a property.
	pub fn clear_property(&self, name: &str) {
		self.properties.write().remove(name);
	}

	/// Appends an element to a collection.
	pub fn push_to_collection(&self, name: impl Into<String>, element: Pojo) {
		self.collections
			.write()
			.entry(name.into())
			.or_default()
			.push(element);
	}

	/// Removes an element (by identity) from a collection.
	pub fn remove_from_collection(&self, name: &str, element: &Pojo) {
		if let Some(elements) = self.collections.write().get_mut(name) {
			elements.retain(|candidate| !same_pojo(candidate, element));
		}
	}
}

impl DomainObject for DynamicObject {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn property(&self, name: &str) -> Option<ObjectValue> {
		self.properties.read().get(name).cloned()
	}

	fn collection(&self, name: &str) -> Vec<Pojo> {
		self.collections
			.read()
			.get(name)
			.cloned()
			.unwrap_or_default()
	}

	fn title(&self) -> Option<String> {
		let properties = self.properties.read();
		properties
			.get("title")
			.or_else(|| properties.get("name"))
			.map(ObjectValue::to_text)
	}
}

impl fmt::Debug for DynamicObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynamicObject")
			.field("type_name", &self.type_name)
			.field(
				"properties",
				&self.properties.read().keys().collect::<Vec<_>>(),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_collection_reflects_mutation() {
		// Arrange
		let order = DynamicObject::new("shop.Order");
		let first: Pojo = Arc::new(DynamicObject::new("shop.Line"));
		let second: Pojo = Arc::new(DynamicObject::new("shop.Line"));
		order.push_to_collection("lines", first.clone());
		order.push_to_collection("lines", second.clone());

		// Act
		order.remove_from_collection("lines", &first);

		// Assert
		let lines = order.collection("lines");
		assert_eq!(lines.len(), 1);
		assert!(same_pojo(&lines[0], &second));
	}

	#[rstest]
	fn test_unknown_collection_is_empty() {
		assert!(DynamicObject::new("shop.Order").collection("nope").is_empty());
	}

	#[rstest]
	#[case(ObjectValue::from("abc"), "abc")]
	#[case(ObjectValue::Scalar(json!(42)), "42")]
	#[case(ObjectValue::List(vec![ObjectValue::from("a"), ObjectValue::Scalar(json!(true))]), "a, true")]
	fn test_to_text(#[case] value: ObjectValue, #[case] expected: &str) {
		assert_eq!(value.to_text(), expected);
	}

	#[rstest]
	fn test_title_prefers_title_then_name() {
		let item = DynamicObject::new("shop.Item").with_property("name", "Widget");
		assert_eq!(item.title().as_deref(), Some("Widget"));
		item.set_property("title", "Blue widget");
		assert_eq!(item.title().as_deref(), Some("Blue widget"));
	}

	#[rstest]
	fn test_same_as_uses_identity_for_references() {
		let a: Pojo = Arc::new(DynamicObject::new("shop.Item"));
		let b: Pojo = Arc::new(DynamicObject::new("shop.Item"));
		assert!(ObjectValue::from(a.clone()).same_as(&ObjectValue::from(a.clone())));
		assert!(!ObjectValue::from(a).same_as(&ObjectValue::from(b)));
	}
}
