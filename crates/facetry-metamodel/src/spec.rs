//! The per-type metamodel node.

use crate::facet::Facet;
use crate::facets::NamedFacet;
use crate::holder::FacetHolder;
use crate::interaction::{
	Aggregation, Consent, InteractionHead, InteractionResultSet, ValidityContext, ValidityKind,
	VisibilityContext, evaluate_validity, evaluate_visibility,
};
use crate::loader::LoaderShared;
use crate::member::{MemberKind, ObjectMember};
use facetry_core::{BeanSort, Identifier, MetamodelError, MetamodelResult};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::thread::{self, ThreadId};

/// Lifecycle of an [`ObjectSpecification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SpecState {
	/// Identity known; members and facets not yet populated.
	Placeholder = 0,
	/// The facet factory pipeline is running.
	Introspecting = 1,
	/// Facets and members populated.
	Introspected = 2,
	/// Cross-cutting facets derived.
	PostProcessed = 3,
	/// Read-only.
	Frozen = 4,
}

impl SpecState {
	fn from_u8(value: u8) -> Self {
		match value {
			0 => SpecState::Placeholder,
			1 => SpecState::Introspecting,
			2 => SpecState::Introspected,
			3 => SpecState::PostProcessed,
			_ => SpecState::Frozen,
		}
	}
}

/// Outcome of asking for the right to introspect a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
	/// The caller must run the pipeline.
	Run,
	/// Another caller is running it; use the placeholder as is.
	InFlight,
	/// Introspection already finished.
	Done,
}

/// Class-level facts settled during introspection.
#[derive(Debug, Clone)]
pub(crate) struct Shape {
	pub(crate) logical_name: String,
	pub(crate) bean_sort: BeanSort,
	pub(crate) is_abstract: bool,
	pub(crate) supertype: Option<String>,
}

/// Metamodel node for one domain type.
///
/// Created as a placeholder the first time the type is asked for and
/// populated in place by the loader, so that self-referential and mutually
/// referential types resolve to the same node.
pub struct ObjectSpecification {
	identifier: Identifier,
	holder: FacetHolder,
	loader: Weak<LoaderShared>,
	state: AtomicU8,
	introspector: Mutex<Option<ThreadId>>,
	introspected: Condvar,
	shape: OnceLock<Shape>,
	members: OnceLock<Vec<Arc<ObjectMember>>>,
	supertype: OnceLock<Weak<ObjectSpecification>>,
}

impl ObjectSpecification {
	pub(crate) fn placeholder(full_name: &str, loader: Weak<LoaderShared>) -> Self {
		let identifier = Identifier::class(full_name);
		Self {
			holder: FacetHolder::new(identifier.clone()),
			identifier,
			loader,
			state: AtomicU8::new(SpecState::Placeholder as u8),
			introspector: Mutex::new(None),
			introspected: Condvar::new(),
			shape: OnceLock::new(),
			members: OnceLock::new(),
			supertype: OnceLock::new(),
		}
	}

	/// Identifier of the type.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Full type name; the cache key.
	pub fn full_name(&self) -> &str {
		self.identifier.type_name()
	}

	/// Logical type name, falling back to the full name on a placeholder.
	pub fn logical_name(&self) -> &str {
		self.shape
			.get()
			.map(|shape| shape.logical_name.as_str())
			.unwrap_or_else(|| self.full_name())
	}

	/// Display name.
	pub fn display_name(&self) -> String {
		self.get_facet::<NamedFacet>()
			.map(|named| named.name().to_string())
			.unwrap_or_else(|| self.identifier.short_name().to_string())
	}

	/// Classification; [`BeanSort::Unknown`] on a placeholder.
	pub fn bean_sort(&self) -> BeanSort {
		self.shape
			.get()
			.map(|shape| shape.bean_sort)
			.unwrap_or(BeanSort::Unknown)
	}

	/// Whether the type cannot be instantiated.
	pub fn is_abstract(&self) -> bool {
		self.shape.get().is_some_and(|shape| shape.is_abstract)
	}

	/// Current lifecycle state.
	pub fn state(&self) -> SpecState {
		SpecState::from_u8(self.state.load(Ordering::Acquire))
	}

	/// Whether the factory pipeline has finished for this type.
	pub fn is_introspected(&self) -> bool {
		self.state() >= SpecState::Introspected
	}

	/// The supertype's specification, resolved on first use.
	pub fn supertype(&self) -> Option<Arc<ObjectSpecification>> {
		if let Some(supertype) = self.supertype.get() {
			return supertype.upgrade();
		}
		let name = self.shape.get()?.supertype.as_deref()?;
		let loader = self.loader.upgrade()?;
		let supertype = loader.spec_for(name).ok()?;
		let _ = self.supertype.set(Arc::downgrade(&supertype));
		Some(supertype)
	}

	/// Members in layout order; empty on a placeholder.
	pub fn members(&self) -> &[Arc<ObjectMember>] {
		self.members.get().map(Vec::as_slice).unwrap_or_default()
	}

	/// The member called `name`.
	pub fn member(&self, name: &str) -> Option<&Arc<ObjectMember>> {
		self.members().iter().find(|member| member.name() == name)
	}

	/// The member called `name`, or [`MetamodelError::UnknownMember`].
	pub fn require_member(&self, name: &str) -> MetamodelResult<&Arc<ObjectMember>> {
		self.member(name)
			.ok_or_else(|| MetamodelError::UnknownMember {
				type_name: self.full_name().to_string(),
				member: name.to_string(),
			})
	}

	/// Members of one kind, in layout order.
	pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &Arc<ObjectMember>> {
		self.members().iter().filter(move |member| member.kind() == kind)
	}

	/// The property called `name`.
	pub fn property(&self, name: &str) -> Option<&Arc<ObjectMember>> {
		self.member(name).filter(|member| member.is_property())
	}

	/// The collection called `name`.
	pub fn collection(&self, name: &str) -> Option<&Arc<ObjectMember>> {
		self.member(name).filter(|member| member.is_collection())
	}

	/// The action called `name`.
	pub fn action(&self, name: &str) -> Option<&Arc<ObjectMember>> {
		self.member(name).filter(|member| member.is_action())
	}

	/// The type-level facets.
	pub fn facet_holder(&self) -> &FacetHolder {
		&self.holder
	}

	/// The type-level facet of type `F`, if present.
	pub fn get_facet<F: Facet>(&self) -> Option<Arc<F>> {
		self.holder.get_facet::<F>()
	}

	/// Whether a type-level facet of type `F` is present.
	pub fn has_facet<F: Facet>(&self) -> bool {
		self.holder.has_facet::<F>()
	}

	/// Whether the type as a whole is visible for this interaction.
	///
	/// # Errors
	///
	/// [`MetamodelError::NotReady`] before the post-processing barrier.
	pub fn is_visible(&self, head: &InteractionHead) -> MetamodelResult<Consent> {
		self.ensure_post_processed()?;
		let context = VisibilityContext::new(head.clone(), self.identifier.clone());
		Ok(evaluate_visibility(&self.holder, &context).into_consent())
	}

	/// Validates the target object: every property's current value, then
	/// the type-level validators. All reasons are reported together.
	pub fn validate_object(&self, head: &InteractionHead) -> MetamodelResult<Consent> {
		self.ensure_post_processed()?;
		let mut results = InteractionResultSet::new(Aggregation::AllVetoes);
		let pojo = head.target.pojo();
		for property in self.members_of(MemberKind::Property) {
			let current = pojo.and_then(|pojo| pojo.property(property.name()));
			results.merge(property.property_validity(head, current));
		}
		let context = ValidityContext::new(head.clone(), self.identifier.clone(), ValidityKind::Object);
		results.merge(evaluate_validity(&self.holder, &context));
		Ok(results.into_consent())
	}

	pub(crate) fn ensure_post_processed(&self) -> MetamodelResult<()> {
		if self.state() >= SpecState::PostProcessed {
			return Ok(());
		}
		Err(MetamodelError::NotReady(format!(
			"'{}' is {:?}; request-time evaluation needs a post-processed metamodel",
			self.identifier,
			self.state()
		)))
	}

	/// Claims the right to run the pipeline for this type.
	///
	/// A caller outside any pipeline waits while another thread is
	/// introspecting; a caller inside a pipeline (`nested`) gets the
	/// placeholder immediately.
	pub(crate) fn claim_introspection(&self, nested: bool) -> Claim {
		let current = thread::current().id();
		let mut owner = self.introspector.lock();
		loop {
			match self.state() {
				SpecState::Placeholder => {
					*owner = Some(current);
					self.set_state(SpecState::Introspecting);
					return Claim::Run;
				}
				SpecState::Introspecting => {
					if nested || *owner == Some(current) {
						return Claim::InFlight;
					}
					self.introspected.wait(&mut owner);
				}
				_ => return Claim::Done,
			}
		}
	}

	/// Publishes the outcome of a claimed introspection and wakes waiters.
	/// An unfinished run returns the specification to the placeholder state.
	pub(crate) fn finish_introspection(&self, completed: bool) {
		let mut owner = self.introspector.lock();
		*owner = None;
		self.set_state(if completed {
			SpecState::Introspected
		} else {
			SpecState::Placeholder
		});
		self.introspected.notify_all();
	}

	pub(crate) fn populate(&self, shape: Shape, members: Vec<Arc<ObjectMember>>) {
		if self.shape.set(shape).is_err() || self.members.set(members).is_err() {
			tracing::warn!(spec = %self.identifier, "specification populated twice");
		}
	}

	pub(crate) fn set_state(&self, state: SpecState) {
		self.state.store(state as u8, Ordering::Release);
	}

	pub(crate) fn freeze(&self) {
		self.holder.freeze();
		for member in self.members() {
			member.freeze();
		}
		self.set_state(SpecState::Frozen);
	}
}

impl fmt::Debug for ObjectSpecification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ObjectSpecification")
			.field("full_name", &self.full_name())
			.field("bean_sort", &self.bean_sort())
			.field("state", &self.state())
			.field(
				"members",
				&self.members().iter().map(|m| m.name()).collect::<Vec<_>>(),
			)
			.field("facets", &self.holder.facet_types())
			.finish()
	}
}
