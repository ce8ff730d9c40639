//! Metamodel error types.
//!
//! Only programming-contract violations and bootstrap aborts are errors.
//! Structural problems found while building the metamodel are collected in a
//! validation report instead, and runtime vetoes are plain reason strings.

use thiserror::Error;

/// Result type for metamodel operations.
pub type MetamodelResult<T> = Result<T, MetamodelError>;

/// Metamodel errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetamodelError {
	/// The introspection adapter has no class with this name.
	#[error("unknown type: {0}")]
	UnknownType(String),

	/// A class with this name is already registered with the introspection adapter.
	#[error("type already registered: {0}")]
	DuplicateType(String),

	/// No member with this name exists on the type.
	#[error("type '{type_name}' has no member '{member}'")]
	UnknownMember {
		/// Full name of the owning type.
		type_name: String,
		/// Requested member name.
		member: String,
	},

	/// The operation does not apply to this kind of member, or its arguments
	/// do not match the member's signature.
	#[error("invalid operation on '{identifier}': {message}")]
	InvalidOperation {
		/// The member the operation was invoked on.
		identifier: String,
		/// What was wrong.
		message: String,
	},

	/// The operation requires a metamodel that has passed the post-processing barrier.
	#[error("metamodel not ready: {0}")]
	NotReady(String),

	/// The metamodel has been frozen and can no longer be changed.
	#[error("metamodel is frozen: {0}")]
	Frozen(String),

	/// Bootstrap was aborted because the validation report is not empty.
	#[error("metamodel validation failed with {count} problem(s): {summary}")]
	Validation {
		/// Number of validation failures.
		count: usize,
		/// All failures joined into one line.
		summary: String,
	},

	/// Settings could not be read or parsed.
	#[error("settings error: {0}")]
	Settings(String),

	/// IO error while reading settings.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_error_display() {
		let error = MetamodelError::UnknownMember {
			type_name: "shop.Order".to_string(),
			member: "lines".to_string(),
		};
		assert_eq!(error.to_string(), "type 'shop.Order' has no member 'lines'");

		let error = MetamodelError::Validation {
			count: 2,
			summary: "a; b".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"metamodel validation failed with 2 problem(s): a; b"
		);
	}
}
