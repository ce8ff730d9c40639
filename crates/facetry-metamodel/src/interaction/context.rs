//! Interaction contexts.
//!
//! Contexts are created fresh for one evaluation and dropped right after it.
//! Everything an advisor may need (target, acting identity, UI region) is
//! carried explicitly; nothing is read from ambient state.

use crate::managed::ManagedObject;
use crate::object::ObjectValue;
use facetry_core::{Actor, Identifier, InitiatedBy, Where};

/// The parts shared by every interaction context.
#[derive(Debug, Clone)]
pub struct InteractionHead {
	/// The object being interacted with.
	pub target: ManagedObject,
	/// The acting identity.
	pub actor: Actor,
	/// Who initiated the interaction.
	pub initiated_by: InitiatedBy,
	/// Region of the UI the interaction happens in.
	pub where_: Where,
}

impl InteractionHead {
	/// A user-initiated interaction everywhere in the UI.
	pub fn new(target: ManagedObject, actor: Actor) -> Self {
		Self {
			target,
			actor,
			initiated_by: InitiatedBy::User,
			where_: Where::Everywhere,
		}
	}

	/// A framework-initiated interaction, which no advisor can veto.
	pub fn framework(target: ManagedObject) -> Self {
		Self::new(target, Actor::system()).initiated_by(InitiatedBy::Framework)
	}

	/// Sets the initiator.
	pub fn initiated_by(mut self, initiated_by: InitiatedBy) -> Self {
		self.initiated_by = initiated_by;
		self
	}

	/// Sets the UI region.
	pub fn in_region(mut self, where_: Where) -> Self {
		self.where_ = where_;
		self
	}

	/// Whether the framework initiated this interaction.
	pub fn is_framework(&self) -> bool {
		!self.initiated_by.is_user()
	}
}

/// Asks whether an element is visible.
#[derive(Debug, Clone)]
pub struct VisibilityContext {
	/// Shared interaction data.
	pub head: InteractionHead,
	/// The element being asked about.
	pub identifier: Identifier,
}

impl VisibilityContext {
	/// Creates a visibility context.
	pub fn new(head: InteractionHead, identifier: Identifier) -> Self {
		Self { head, identifier }
	}

	/// The UI region.
	pub fn where_(&self) -> Where {
		self.head.where_
	}
}

/// Asks whether a member can be edited or invoked.
#[derive(Debug, Clone)]
pub struct UsabilityContext {
	/// Shared interaction data.
	pub head: InteractionHead,
	/// The member being asked about.
	pub identifier: Identifier,
}

impl UsabilityContext {
	/// Creates a usability context.
	pub fn new(head: InteractionHead, identifier: Identifier) -> Self {
		Self { head, identifier }
	}

	/// The UI region.
	pub fn where_(&self) -> Where {
		self.head.where_
	}
}

/// What is being validated.
#[derive(Debug, Clone)]
pub enum ValidityKind {
	/// A new value for a property; `None` clears it.
	PropertyModify {
		/// The proposed value.
		proposed: Option<ObjectValue>,
	},
	/// One argument of an action.
	ActionArgument {
		/// Zero-based parameter position.
		position: usize,
		/// The proposed argument.
		proposed: Option<ObjectValue>,
	},
	/// A complete argument list for an action.
	ActionInvocation {
		/// One entry per parameter.
		arguments: Vec<Option<ObjectValue>>,
	},
	/// The target object as a whole.
	Object,
}

/// Asks whether a proposal is valid.
#[derive(Debug, Clone)]
pub struct ValidityContext {
	/// Shared interaction data.
	pub head: InteractionHead,
	/// The element being validated.
	pub identifier: Identifier,
	/// What is being validated.
	pub kind: ValidityKind,
}

impl ValidityContext {
	/// Creates a validity context.
	pub fn new(head: InteractionHead, identifier: Identifier, kind: ValidityKind) -> Self {
		Self {
			head,
			identifier,
			kind,
		}
	}

	/// Whether this context proposes a single value (property or argument).
	pub fn proposes_value(&self) -> bool {
		matches!(
			self.kind,
			ValidityKind::PropertyModify { .. } | ValidityKind::ActionArgument { .. }
		)
	}

	/// The single proposed value, for property and argument validation.
	pub fn proposed(&self) -> Option<&ObjectValue> {
		match &self.kind {
			ValidityKind::PropertyModify { proposed } | ValidityKind::ActionArgument { proposed, .. } => {
				proposed.as_ref()
			}
			_ => None,
		}
	}
}
