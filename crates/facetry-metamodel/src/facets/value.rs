//! Value-type semantics.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::introspection::Metadata;
use crate::object::ObjectValue;
use facetry_core::FeatureType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a built-in value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
	/// Text.
	String,
	/// Signed 64-bit integer.
	Integer,
	/// Floating point number.
	Decimal,
	/// `true` or `false`.
	Boolean,
}

/// Parses user-entered text into a value of the type.
#[derive(Debug, Clone, Copy)]
pub struct ValueFacet {
	kind: ValueKind,
}

impl ValueFacet {
	/// Creates the facet.
	pub fn new(kind: ValueKind) -> Self {
		Self { kind }
	}

	/// The value kind.
	pub fn kind(&self) -> ValueKind {
		self.kind
	}

	/// Parses `text`; the error is a user-facing reason.
	pub fn parse(&self, text: &str) -> Result<ObjectValue, String> {
		let trimmed = text.trim();
		let value = match self.kind {
			ValueKind::String => Value::String(text.to_string()),
			ValueKind::Integer => trimmed
				.parse::<i64>()
				.map(Value::from)
				.map_err(|_| format!("'{text}' is not a whole number"))?,
			ValueKind::Decimal => trimmed
				.parse::<f64>()
				.ok()
				.and_then(serde_json::Number::from_f64)
				.map(Value::Number)
				.ok_or_else(|| format!("'{text}' is not a number"))?,
			ValueKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
				"true" | "yes" | "1" => Value::Bool(true),
				"false" | "no" | "0" => Value::Bool(false),
				_ => return Err(format!("'{text}' is not true or false")),
			},
		};
		Ok(ObjectValue::Scalar(value))
	}
}

impl Facet for ValueFacet {}

/// Installs [`ValueFacet`] from `Value(kind)`.
#[derive(Debug, Default)]
pub struct ValueFacetFactory;

impl FacetFactory for ValueFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&[FeatureType::Object]
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some(kind) = context.find_metadata(|m| match m {
			Metadata::Value(kind) => Some(*kind),
			_ => None,
		}) {
			context.add_facet(ValueFacet::new(kind));
		}
	}
}
