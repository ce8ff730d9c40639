//! Properties, collections, actions and action parameters.

use crate::facet::Facet;
use crate::facets::{AutoCompleteFacet, ChoicesFacet, DefaultsFacet, NamedFacet};
use crate::holder::FacetHolder;
use crate::interaction::{
	Aggregation, Consent, InteractionHead, InteractionResultSet, UsabilityContext, ValidityContext,
	ValidityKind, VisibilityContext, evaluate_usability, evaluate_validity, evaluate_visibility,
};
use crate::introspection::TypeRef;
use crate::managed::ManagedObject;
use crate::object::{ObjectValue, Pojo};
use crate::spec::ObjectSpecification;
use facetry_core::{FeatureType, Identifier, MetamodelError, MetamodelResult};
use std::fmt;
use std::sync::{Arc, Weak};

/// Kind of an [`ObjectMember`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
	/// A single value or reference.
	Property,
	/// A collection of references.
	Collection,
	/// An invokable action.
	Action,
}

impl MemberKind {
	/// The corresponding feature type.
	pub fn feature_type(self) -> FeatureType {
		match self {
			MemberKind::Property => FeatureType::Property,
			MemberKind::Collection => FeatureType::Collection,
			MemberKind::Action => FeatureType::Action,
		}
	}
}

/// One parameter of an action.
pub struct ActionParameter {
	identifier: Identifier,
	name: String,
	index: usize,
	type_ref: TypeRef,
	holder: FacetHolder,
	type_spec: Weak<ObjectSpecification>,
}

impl ActionParameter {
	pub(crate) fn new(
		identifier: Identifier,
		name: String,
		index: usize,
		type_ref: TypeRef,
		type_spec: Weak<ObjectSpecification>,
	) -> Self {
		Self {
			holder: FacetHolder::new(identifier.clone()),
			identifier,
			name,
			index,
			type_ref,
			type_spec,
		}
	}

	/// Identifier of the parameter.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Declared name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Zero-based position.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Declared type.
	pub fn type_ref(&self) -> &TypeRef {
		&self.type_ref
	}

	/// Whether the parameter accepts a collection.
	pub fn is_collection(&self) -> bool {
		self.type_ref.is_collection()
	}

	/// Specification of the parameter's (element) type.
	pub fn specification(&self) -> Option<Arc<ObjectSpecification>> {
		self.type_spec.upgrade()
	}

	/// The parameter's facets.
	pub fn facet_holder(&self) -> &FacetHolder {
		&self.holder
	}

	/// The facet of type `F`, if present.
	pub fn get_facet<F: Facet>(&self) -> Option<Arc<F>> {
		self.holder.get_facet::<F>()
	}

	/// Whether a facet of type `F` is present.
	pub fn has_facet<F: Facet>(&self) -> bool {
		self.holder.has_facet::<F>()
	}

	/// Display name.
	pub fn display_name(&self) -> String {
		self.get_facet::<NamedFacet>()
			.map(|named| named.name().to_string())
			.unwrap_or_else(|| self.name.clone())
	}

	/// Permissible arguments for `target`.
	pub fn choices(&self, target: &ManagedObject) -> Vec<ObjectValue> {
		self.get_facet::<ChoicesFacet>()
			.map(|facet| facet.choices(target))
			.unwrap_or_default()
	}

	/// Search-as-you-type candidates for `text`.
	pub fn auto_complete(&self, target: &ManagedObject, text: &str) -> Vec<ObjectValue> {
		self.get_facet::<AutoCompleteFacet>()
			.map(|facet| facet.candidates(target, text))
			.unwrap_or_default()
	}

	/// Default argument, given the elements the user selected in the sibling
	/// collection. Scalar parameters default to the first selected element.
	pub fn default_value(&self, selection: &[Pojo]) -> Option<ObjectValue> {
		let value = self.get_facet::<DefaultsFacet>()?.default_value(selection)?;
		match value {
			ObjectValue::List(mut values) if !self.is_collection() && !values.is_empty() => {
				Some(values.swap_remove(0))
			}
			other => Some(other),
		}
	}

	fn validity(&self, head: &InteractionHead, proposed: Option<ObjectValue>) -> InteractionResultSet {
		let context = ValidityContext::new(
			head.clone(),
			self.identifier.clone(),
			ValidityKind::ActionArgument {
				position: self.index,
				proposed,
			},
		);
		evaluate_validity(&self.holder, &context)
	}

	pub(crate) fn freeze(&self) {
		self.holder.freeze();
	}
}

impl fmt::Debug for ActionParameter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionParameter")
			.field("identifier", &self.identifier.to_string())
			.field("type_ref", &self.type_ref)
			.field("facets", &self.holder.facet_types())
			.finish()
	}
}

/// A property, collection or action of an [`ObjectSpecification`].
pub struct ObjectMember {
	identifier: Identifier,
	name: String,
	kind: MemberKind,
	type_ref: Option<TypeRef>,
	holder: FacetHolder,
	owner: Weak<ObjectSpecification>,
	type_spec: Weak<ObjectSpecification>,
	parameters: Vec<ActionParameter>,
}

impl ObjectMember {
	pub(crate) fn new(
		identifier: Identifier,
		kind: MemberKind,
		type_ref: Option<TypeRef>,
		owner: Weak<ObjectSpecification>,
		type_spec: Weak<ObjectSpecification>,
		parameters: Vec<ActionParameter>,
	) -> Self {
		Self {
			name: identifier.short_name().to_string(),
			holder: FacetHolder::new(identifier.clone()),
			identifier,
			kind,
			type_ref,
			owner,
			type_spec,
			parameters,
		}
	}

	/// Identifier of the member.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Member name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Property, collection or action.
	pub fn kind(&self) -> MemberKind {
		self.kind
	}

	/// Whether this is a property.
	pub fn is_property(&self) -> bool {
		self.kind == MemberKind::Property
	}

	/// Whether this is a collection.
	pub fn is_collection(&self) -> bool {
		self.kind == MemberKind::Collection
	}

	/// Whether this is an action.
	pub fn is_action(&self) -> bool {
		self.kind == MemberKind::Action
	}

	/// Property type, collection element type or action result type.
	pub fn type_ref(&self) -> Option<&TypeRef> {
		self.type_ref.as_ref()
	}

	/// Specification of [`ObjectMember::type_ref`].
	pub fn specification(&self) -> Option<Arc<ObjectSpecification>> {
		self.type_spec.upgrade()
	}

	/// The specification this member belongs to.
	pub fn owner(&self) -> Option<Arc<ObjectSpecification>> {
		self.owner.upgrade()
	}

	/// Parameters of an action; empty for other members.
	pub fn parameters(&self) -> &[ActionParameter] {
		&self.parameters
	}

	/// The parameter at `index`.
	pub fn parameter(&self, index: usize) -> Option<&ActionParameter> {
		self.parameters.get(index)
	}

	/// The member's facets.
	pub fn facet_holder(&self) -> &FacetHolder {
		&self.holder
	}

	/// The facet of type `F`, if present.
	pub fn get_facet<F: Facet>(&self) -> Option<Arc<F>> {
		self.holder.get_facet::<F>()
	}

	/// Whether a facet of type `F` is present.
	pub fn has_facet<F: Facet>(&self) -> bool {
		self.holder.has_facet::<F>()
	}

	/// Display name.
	pub fn display_name(&self) -> String {
		self.get_facet::<NamedFacet>()
			.map(|named| named.name().to_string())
			.unwrap_or_else(|| self.name.clone())
	}

	/// Whether the member is visible for this interaction.
	///
	/// # Errors
	///
	/// [`MetamodelError::NotReady`] before the post-processing barrier.
	pub fn is_visible(&self, head: &InteractionHead) -> MetamodelResult<Consent> {
		self.ensure_ready()?;
		let context = VisibilityContext::new(head.clone(), self.identifier.clone());
		Ok(evaluate_visibility(&self.holder, &context).into_consent())
	}

	/// Whether the member can be edited or invoked for this interaction.
	pub fn is_usable(&self, head: &InteractionHead) -> MetamodelResult<Consent> {
		self.ensure_ready()?;
		let context = UsabilityContext::new(head.clone(), self.identifier.clone());
		Ok(evaluate_usability(&self.holder, &context).into_consent())
	}

	/// Validates a proposed property value. All reasons are reported together.
	pub fn validate_property(
		&self,
		head: &InteractionHead,
		proposed: Option<ObjectValue>,
	) -> MetamodelResult<Consent> {
		self.ensure_ready()?;
		self.require(MemberKind::Property, "validate_property")?;
		Ok(self.property_validity(head, proposed).into_consent())
	}

	/// Validates one argument of an action.
	pub fn validate_argument(
		&self,
		head: &InteractionHead,
		position: usize,
		proposed: Option<ObjectValue>,
	) -> MetamodelResult<Consent> {
		self.ensure_ready()?;
		self.require(MemberKind::Action, "validate_argument")?;
		let parameter = self.parameters.get(position).ok_or_else(|| {
			self.invalid(format!(
				"no parameter at position {position}; the action has {}",
				self.parameters.len()
			))
		})?;
		Ok(parameter.validity(head, proposed).into_consent())
	}

	/// Validates a complete argument list: every argument, then the action
	/// as a whole. All reasons are reported together.
	pub fn validate_invocation(
		&self,
		head: &InteractionHead,
		arguments: Vec<Option<ObjectValue>>,
	) -> MetamodelResult<Consent> {
		self.ensure_ready()?;
		self.require(MemberKind::Action, "validate_invocation")?;
		if arguments.len() != self.parameters.len() {
			return Err(self.invalid(format!(
				"expected {} argument(s), got {}",
				self.parameters.len(),
				arguments.len()
			)));
		}

		let mut results = InteractionResultSet::new(Aggregation::AllVetoes);
		for (parameter, argument) in self.parameters.iter().zip(arguments.iter().cloned()) {
			results.merge(parameter.validity(head, argument));
		}
		let context = ValidityContext::new(
			head.clone(),
			self.identifier.clone(),
			ValidityKind::ActionInvocation { arguments },
		);
		results.merge(evaluate_validity(&self.holder, &context));
		Ok(results.into_consent())
	}

	/// Permissible values of a property for `target`.
	pub fn choices(&self, target: &ManagedObject) -> MetamodelResult<Vec<ObjectValue>> {
		self.ensure_ready()?;
		self.require(MemberKind::Property, "choices")?;
		Ok(self
			.get_facet::<ChoicesFacet>()
			.map(|facet| facet.choices(target))
			.unwrap_or_default())
	}

	/// Search-as-you-type candidates of a property for `text`.
	pub fn auto_complete(&self, target: &ManagedObject, text: &str) -> MetamodelResult<Vec<ObjectValue>> {
		self.ensure_ready()?;
		self.require(MemberKind::Property, "auto_complete")?;
		Ok(self
			.get_facet::<AutoCompleteFacet>()
			.map(|facet| facet.candidates(target, text))
			.unwrap_or_default())
	}

	/// Default arguments of an action, one per parameter.
	///
	/// `selection` holds the elements the user selected in the sibling
	/// collection, for parameters whose default comes from a collection.
	pub fn defaults(&self, selection: &[Pojo]) -> MetamodelResult<Vec<Option<ObjectValue>>> {
		self.ensure_ready()?;
		self.require(MemberKind::Action, "defaults")?;
		Ok(self
			.parameters
			.iter()
			.map(|parameter| parameter.default_value(selection))
			.collect())
	}

	pub(crate) fn property_validity(
		&self,
		head: &InteractionHead,
		proposed: Option<ObjectValue>,
	) -> InteractionResultSet {
		let context = ValidityContext::new(
			head.clone(),
			self.identifier.clone(),
			ValidityKind::PropertyModify { proposed },
		);
		evaluate_validity(&self.holder, &context)
	}

	fn ensure_ready(&self) -> MetamodelResult<()> {
		match self.owner.upgrade() {
			Some(owner) => owner.ensure_post_processed(),
			None => Err(MetamodelError::NotReady(format!(
				"owner of '{}' is no longer loaded",
				self.identifier
			))),
		}
	}

	fn require(&self, kind: MemberKind, operation: &str) -> MetamodelResult<()> {
		if self.kind == kind {
			return Ok(());
		}
		Err(self.invalid(format!("{operation} requires a {kind:?}, this is a {:?}", self.kind)))
	}

	fn invalid(&self, message: String) -> MetamodelError {
		MetamodelError::InvalidOperation {
			identifier: self.identifier.to_string(),
			message,
		}
	}

	pub(crate) fn freeze(&self) {
		self.holder.freeze();
		for parameter in &self.parameters {
			parameter.freeze();
		}
	}
}

impl fmt::Debug for ObjectMember {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ObjectMember")
			.field("identifier", &self.identifier.to_string())
			.field("kind", &self.kind)
			.field("facets", &self.holder.facet_types())
			.field("parameters", &self.parameters)
			.finish()
	}
}
