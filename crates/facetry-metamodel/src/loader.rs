//! Building and caching specifications.
//!
//! [`SpecificationLoader::spec_for`] is the single entry point for metamodel
//! nodes. A type seen for the first time is inserted into the cache as a
//! placeholder before the facet factory pipeline runs, so a lookup of the
//! same type from inside its own pipeline (a `Node` with a `Node` property)
//! finds the placeholder instead of recursing.
//!
//! The pipeline runs exactly once per type. A caller that finds another
//! thread introspecting the type waits for it, unless the caller is itself
//! inside a pipeline; nested lookups get the placeholder at once, so
//! mutually referential types introspected on different threads cannot
//! deadlock.
//!
//! Bootstrap then crosses two whole-metamodel barriers: post-processing and
//! freezing. Afterwards the metamodel is read-only.

use crate::factory::ProcessingContext;
use crate::introspection::{ClassDescriptor, ClassIntrospector, ClassRegistry, MemberDescriptor, MemberShape, Metadata, TypeRef};
use crate::facets::MemberOrderFacet;
use crate::facets::member_order::compare_sequences;
use crate::managed::ManagedObject;
use crate::member::{ActionParameter, MemberKind, ObjectMember};
use crate::object::Pojo;
use crate::postprocessing::PostProcessingContext;
use crate::programming_model::ProgrammingModel;
use crate::settings::MetamodelSettings;
use crate::spec::{Claim, ObjectSpecification, Shape, SpecState};
use crate::validation::ValidationReport;
use facetry_core::{BeanSort, FeatureType, Identifier, MetamodelError, MetamodelResult};
use parking_lot::{Mutex, RwLock};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};

thread_local! {
	static PIPELINE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as running a facet factory pipeline.
struct PipelineScope;

impl PipelineScope {
	fn enter() -> Self {
		PIPELINE_DEPTH.with(|depth| depth.set(depth.get() + 1));
		Self
	}

	fn is_active() -> bool {
		PIPELINE_DEPTH.with(|depth| depth.get() > 0)
	}
}

impl Drop for PipelineScope {
	fn drop(&mut self) {
		PIPELINE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
	}
}

/// Returns a claimed specification to the placeholder state unless the
/// pipeline completed, and wakes waiting callers either way.
struct IntrospectionGuard<'a> {
	spec: &'a ObjectSpecification,
	completed: bool,
}

impl IntrospectionGuard<'_> {
	fn complete(mut self) {
		self.completed = true;
	}
}

impl Drop for IntrospectionGuard<'_> {
	fn drop(&mut self) {
		self.spec.finish_introspection(self.completed);
	}
}

/// Whole-metamodel phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetamodelPhase {
	/// Types are being introspected.
	Introspecting,
	/// The post-processing barrier has been crossed.
	PostProcessed,
	/// Read-only.
	Frozen,
}

pub(crate) struct LoaderShared {
	this: Weak<LoaderShared>,
	introspector: Arc<dyn ClassIntrospector>,
	model: ProgrammingModel,
	settings: MetamodelSettings,
	cache: RwLock<HashMap<String, Arc<ObjectSpecification>>>,
	frozen: OnceLock<HashMap<String, Arc<ObjectSpecification>>>,
	report: Mutex<ValidationReport>,
	phase: RwLock<MetamodelPhase>,
}

impl LoaderShared {
	fn phase(&self) -> MetamodelPhase {
		*self.phase.read()
	}

	pub(crate) fn spec_for(&self, full_name: &str) -> MetamodelResult<Arc<ObjectSpecification>> {
		if let Some(frozen) = self.frozen.get() {
			return frozen
				.get(full_name)
				.cloned()
				.ok_or_else(|| self.not_loaded(full_name, "the metamodel was frozen"));
		}

		let cached = self.cache.read().get(full_name).cloned();
		if let Some(spec) = cached {
			if spec.is_introspected() {
				return Ok(spec);
			}
			return self.ensure_introspected(spec, None);
		}

		if self.phase() >= MetamodelPhase::PostProcessed {
			return Err(self.not_loaded(full_name, "the post-processing barrier"));
		}
		let descriptor = self
			.introspector
			.describe(full_name)
			.ok_or_else(|| MetamodelError::UnknownType(full_name.to_string()))?;
		let spec = Arc::clone(
			self.cache
				.write()
				.entry(full_name.to_string())
				.or_insert_with(|| Arc::new(ObjectSpecification::placeholder(full_name, self.this.clone()))),
		);
		self.ensure_introspected(spec, Some(descriptor))
	}

	/// The error for a lookup that missed the cache once introspection closed.
	fn not_loaded(&self, full_name: &str, barrier: &str) -> MetamodelError {
		if self.introspector.describe(full_name).is_none() {
			return MetamodelError::UnknownType(full_name.to_string());
		}
		MetamodelError::NotReady(format!("'{full_name}' was not loaded before {barrier}"))
	}

	fn ensure_introspected(
		&self,
		spec: Arc<ObjectSpecification>,
		descriptor: Option<ClassDescriptor>,
	) -> MetamodelResult<Arc<ObjectSpecification>> {
		match spec.claim_introspection(PipelineScope::is_active()) {
			Claim::Done | Claim::InFlight => Ok(spec),
			Claim::Run => {
				let guard = IntrospectionGuard {
					spec: &spec,
					completed: false,
				};
				let descriptor = match descriptor {
					Some(descriptor) => descriptor,
					None => self
						.introspector
						.describe(spec.full_name())
						.ok_or_else(|| MetamodelError::UnknownType(spec.full_name().to_string()))?,
				};
				self.introspect(&spec, &descriptor);
				guard.complete();
				Ok(spec)
			}
		}
	}

	fn introspect(&self, spec: &Arc<ObjectSpecification>, descriptor: &ClassDescriptor) {
		let _scope = PipelineScope::enter();
		tracing::debug!(spec = %descriptor.full_name, "introspecting");

		let bean_sort = self.classify(descriptor);
		if let Some(supertype) = &descriptor.supertype {
			// Loaded now so that the lazy lookup in `supertype()` hits the cache.
			let _ = self.resolve(&TypeRef::Scalar(supertype.clone()), spec.identifier());
		}
		let class_context = ProcessingContext::for_class(descriptor, spec.facet_holder(), &self.report);
		self.run_factories(&class_context);

		let mut members = Vec::new();
		if bean_sort.is_introspectable() {
			let mut seen = HashSet::new();
			for member in &descriptor.members {
				if member.metadata.iter().any(|m| matches!(m, Metadata::Programmatic)) {
					continue;
				}
				if !seen.insert(member.name.as_str()) {
					self.report.lock().push(
						spec.identifier().clone(),
						format!("duplicate member '{}'", member.name),
					);
					continue;
				}
				members.push(Arc::new(self.introspect_member(spec, descriptor, member)));
			}
		}
		sort_members(&mut members);

		tracing::debug!(
			spec = %descriptor.full_name,
			bean_sort = ?bean_sort,
			members = members.len(),
			"introspected"
		);
		spec.populate(
			Shape {
				logical_name: descriptor.logical_name.clone(),
				bean_sort,
				is_abstract: descriptor.is_abstract,
				supertype: descriptor.supertype.clone(),
			},
			members,
		);
	}

	fn introspect_member(
		&self,
		spec: &Arc<ObjectSpecification>,
		class: &ClassDescriptor,
		member: &MemberDescriptor,
	) -> ObjectMember {
		let full_name = class.full_name.as_str();
		let (kind, type_ref, identifier) = match &member.shape {
			MemberShape::Property(type_name) => (
				MemberKind::Property,
				Some(TypeRef::Scalar(type_name.clone())),
				Identifier::property(full_name, &member.name),
			),
			MemberShape::Collection(element_type) => (
				MemberKind::Collection,
				Some(TypeRef::Collection(element_type.clone())),
				Identifier::collection(full_name, &member.name),
			),
			MemberShape::Action { parameters, returns } => (
				MemberKind::Action,
				returns.clone(),
				Identifier::action(
					full_name,
					&member.name,
					parameters.iter().map(|p| p.type_ref.type_name().to_string()),
				),
			),
		};

		let type_spec = match &type_ref {
			Some(type_ref) => self.resolve(type_ref, &identifier),
			None => Weak::new(),
		};
		let parameters = member
			.parameters()
			.iter()
			.enumerate()
			.map(|(index, parameter)| {
				let feature_type = if parameter.type_ref.is_collection() {
					FeatureType::ActionParameterCollection
				} else {
					FeatureType::ActionParameterScalar
				};
				let parameter_id = identifier.parameter(index).with_feature_type(feature_type);
				let parameter_spec = self.resolve(&parameter.type_ref, &parameter_id);
				ActionParameter::new(
					parameter_id,
					parameter.name.clone(),
					index,
					parameter.type_ref.clone(),
					parameter_spec,
				)
			})
			.collect();

		let object_member = ObjectMember::new(
			identifier,
			kind,
			type_ref,
			Arc::downgrade(spec),
			type_spec,
			parameters,
		);

		let member_context = ProcessingContext::for_member(
			class,
			member,
			kind.feature_type(),
			object_member.facet_holder(),
			&self.report,
		);
		self.run_factories(&member_context);
		for (parameter, descriptor) in object_member.parameters().iter().zip(member.parameters()) {
			let parameter_context = ProcessingContext::for_parameter(
				class,
				member,
				parameter.index(),
				descriptor,
				parameter.identifier().feature_type(),
				parameter.facet_holder(),
				&self.report,
			);
			self.run_factories(&parameter_context);
		}
		object_member
	}

	/// Looks up the specification of a referenced type from inside a pipeline.
	fn resolve(&self, type_ref: &TypeRef, origin: &Identifier) -> Weak<ObjectSpecification> {
		match self.spec_for(type_ref.type_name()) {
			Ok(spec) => Arc::downgrade(&spec),
			Err(error) => {
				self.report
					.lock()
					.push(origin.clone(), format!("references an unusable type: {error}"));
				Weak::new()
			}
		}
	}

	fn run_factories(&self, context: &ProcessingContext<'_>) {
		for factory in self.model.factories() {
			if factory.feature_types().contains(&context.feature_type()) {
				factory.process(context);
			}
		}
	}

	fn classify(&self, descriptor: &ClassDescriptor) -> BeanSort {
		if descriptor.has_metadata(|m| matches!(m, Metadata::Programmatic)) {
			return BeanSort::Vetoed;
		}
		if descriptor.has_metadata(|m| matches!(m, Metadata::Value(_))) {
			return BeanSort::Value;
		}
		let declared: Vec<BeanSort> = descriptor
			.metadata
			.iter()
			.filter_map(|m| match m {
				Metadata::Entity => Some(BeanSort::Entity),
				Metadata::ViewModel => Some(BeanSort::ViewModel),
				Metadata::DomainService => Some(BeanSort::ManagedService),
				_ => None,
			})
			.collect();
		match declared.as_slice() {
			[] if descriptor.is_abstract => BeanSort::Abstract,
			[] => BeanSort::Unknown,
			[sort] => *sort,
			[first, ..] => {
				self.report.lock().push(
					Identifier::class(&descriptor.full_name),
					format!("conflicting classifications {declared:?}; using {first:?}"),
				);
				*first
			}
		}
	}

	fn sorted_specifications(&self) -> Vec<Arc<ObjectSpecification>> {
		let mut specs: Vec<Arc<ObjectSpecification>> = match self.frozen.get() {
			Some(frozen) => frozen.values().cloned().collect(),
			None => self.cache.read().values().cloned().collect(),
		};
		specs.sort_by(|a, b| a.full_name().cmp(b.full_name()));
		specs
	}
}

/// Orders members by their [`MemberOrderFacet`]; unordered members follow in
/// declaration order.
fn sort_members(members: &mut [Arc<ObjectMember>]) {
	members.sort_by(|a, b| {
		match (a.get_facet::<MemberOrderFacet>(), b.get_facet::<MemberOrderFacet>()) {
			(Some(a), Some(b)) => compare_sequences(a.sequence(), b.sequence()),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		}
	});
}

/// Builds, caches and freezes [`ObjectSpecification`]s.
///
/// Cloning is cheap; clones share the same metamodel.
///
/// # Examples
///
/// ```
/// use facetry_metamodel::introspection::{ClassDescriptor, ClassRegistry, MemberDescriptor, Metadata};
/// use facetry_metamodel::loader::SpecificationLoader;
///
/// let registry = ClassRegistry::with_builtin_values().with_class(
///     ClassDescriptor::new("shop.Customer")
///         .with_metadata(Metadata::Entity)
///         .with_member(MemberDescriptor::property("name", "string")),
/// );
/// let loader = SpecificationLoader::builder().introspector(registry).build();
///
/// let report = loader.bootstrap(["shop.Customer"]).unwrap();
/// assert!(report.is_empty());
///
/// let customer = loader.spec_for("shop.Customer").unwrap();
/// assert_eq!(customer.members().len(), 1);
/// ```
#[derive(Clone)]
pub struct SpecificationLoader {
	shared: Arc<LoaderShared>,
}

impl SpecificationLoader {
	/// Starts building a loader.
	pub fn builder() -> SpecificationLoaderBuilder {
		SpecificationLoaderBuilder::default()
	}

	/// The specification of `full_name`, introspecting it on first use.
	///
	/// # Errors
	///
	/// - [`MetamodelError::UnknownType`] if the introspection adapter does not
	///   know the type, in any phase.
	/// - [`MetamodelError::NotReady`] for a known type not loaded before the
	///   post-processing barrier.
	pub fn spec_for(&self, full_name: &str) -> MetamodelResult<Arc<ObjectSpecification>> {
		self.shared.spec_for(full_name)
	}

	/// Wraps a live instance with the specification of its type.
	pub fn adapt(&self, pojo: Pojo) -> MetamodelResult<ManagedObject> {
		let specification = self.spec_for(pojo.type_name())?;
		Ok(ManagedObject::new(specification, pojo))
	}

	/// Introspects every named type and everything reachable from it.
	///
	/// Unknown names are recorded in the validation report rather than
	/// returned, so that one run reports every problem.
	///
	/// # Errors
	///
	/// [`MetamodelError::Frozen`] once the post-processing barrier has been crossed.
	pub fn introspect_all<I, S>(&self, names: I) -> MetamodelResult<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		if self.shared.phase() != MetamodelPhase::Introspecting {
			return Err(MetamodelError::Frozen(
				"introspection is closed after post-processing".to_string(),
			));
		}
		let names: Vec<String> = names.into_iter().map(|name| name.as_ref().to_string()).collect();
		let introspection = &self.shared.settings.introspection;
		let failures = if introspection.parallel && names.len() > 1 {
			self.introspect_parallel(&names, introspection.worker_threads)
		} else {
			names
				.iter()
				.filter_map(|name| self.spec_for(name).err().map(|error| (name.clone(), error)))
				.collect()
		};

		let mut report = self.shared.report.lock();
		for (name, error) in failures {
			report.push(Identifier::class(name), error.to_string());
		}
		Ok(())
	}

	fn introspect_parallel(&self, names: &[String], worker_threads: usize) -> Vec<(String, MetamodelError)> {
		let workers = worker_threads.clamp(1, names.len());
		tracing::debug!(types = names.len(), workers, "introspecting in parallel");
		// A worker waiting on another thread's claim blocks only while that
		// owner is running its pipeline, never on queued pool work.
		let introspect = || -> Vec<(String, MetamodelError)> {
			names
				.par_iter()
				.filter_map(|name| self.spec_for(name).err().map(|error| (name.clone(), error)))
				.collect()
		};
		match ThreadPoolBuilder::new().num_threads(workers).build() {
			Ok(pool) => pool.install(introspect),
			Err(error) => {
				tracing::warn!(%error, "could not build introspection pool; using the global pool");
				introspect()
			}
		}
	}

	/// Runs every post-processor over every specification.
	///
	/// May be run again before [`SpecificationLoader::freeze`]; post-processors
	/// only add absent facets, so a second run changes nothing.
	///
	/// # Errors
	///
	/// - [`MetamodelError::Frozen`] after [`SpecificationLoader::freeze`].
	/// - [`MetamodelError::NotReady`] if a type is still being introspected.
	pub fn post_process_all(&self) -> MetamodelResult<()> {
		if self.shared.phase() == MetamodelPhase::Frozen {
			return Err(MetamodelError::Frozen("post-processing after freeze".to_string()));
		}
		let specs = self.shared.sorted_specifications();
		if let Some(pending) = specs.iter().find(|spec| !spec.is_introspected()) {
			return Err(MetamodelError::NotReady(format!(
				"'{}' is still {:?}",
				pending.full_name(),
				pending.state()
			)));
		}

		let context = PostProcessingContext::new(&specs, &self.shared.report);
		for post_processor in self.shared.model.post_processors() {
			tracing::debug!(
				post_processor = post_processor.name(),
				specifications = specs.len(),
				"running post-processor"
			);
			for spec in &specs {
				post_processor.post_process(spec, &context);
			}
		}
		for spec in &specs {
			spec.set_state(SpecState::PostProcessed);
		}
		*self.shared.phase.write() = MetamodelPhase::PostProcessed;
		Ok(())
	}

	/// Makes the metamodel read-only. Freezing twice is a no-op.
	///
	/// # Errors
	///
	/// [`MetamodelError::NotReady`] before the post-processing barrier.
	pub fn freeze(&self) -> MetamodelResult<()> {
		match self.shared.phase() {
			MetamodelPhase::Frozen => return Ok(()),
			MetamodelPhase::Introspecting => {
				return Err(MetamodelError::NotReady(
					"freeze requires a post-processed metamodel".to_string(),
				));
			}
			MetamodelPhase::PostProcessed => {}
		}

		let mut phase = self.shared.phase.write();
		let cache = self.shared.cache.read().clone();
		for spec in cache.values() {
			spec.freeze();
		}
		let specifications = cache.len();
		if self.shared.frozen.set(cache).is_err() {
			tracing::debug!("metamodel already frozen");
		}
		*phase = MetamodelPhase::Frozen;
		tracing::info!(
			specifications,
			failures = self.shared.report.lock().len(),
			"metamodel frozen"
		);
		Ok(())
	}

	/// Introspects `names`, post-processes and freezes; returns the report.
	pub fn initialize<I, S>(&self, names: I) -> MetamodelResult<ValidationReport>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.introspect_all(names)?;
		self.post_process_all()?;
		self.freeze()?;
		Ok(self.validation_report())
	}

	/// Like [`SpecificationLoader::initialize`], but fails with
	/// [`MetamodelError::Validation`] on a non-empty report when
	/// `validation.fail_on_error` is set.
	pub fn bootstrap<I, S>(&self, names: I) -> MetamodelResult<ValidationReport>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let report = self.initialize(names)?;
		if self.shared.settings.validation.fail_on_error {
			report.clone().into_result()?;
		}
		Ok(report)
	}

	/// [`SpecificationLoader::bootstrap`] over every type the introspection
	/// adapter knows.
	pub fn bootstrap_all(&self) -> MetamodelResult<ValidationReport> {
		self.bootstrap(self.shared.introspector.known_types())
	}

	/// Every cached specification, ordered by full name.
	pub fn all_specifications(&self) -> Vec<Arc<ObjectSpecification>> {
		self.shared.sorted_specifications()
	}

	/// Snapshot of the validation report.
	pub fn validation_report(&self) -> ValidationReport {
		self.shared.report.lock().clone()
	}

	/// Current whole-metamodel phase.
	pub fn phase(&self) -> MetamodelPhase {
		self.shared.phase()
	}

	/// Whether [`SpecificationLoader::freeze`] has run.
	pub fn is_frozen(&self) -> bool {
		self.shared.frozen.get().is_some()
	}

	/// The settings the loader was built with.
	pub fn settings(&self) -> &MetamodelSettings {
		&self.shared.settings
	}

	/// The programming model the loader was built with.
	pub fn programming_model(&self) -> &ProgrammingModel {
		&self.shared.model
	}
}

impl std::fmt::Debug for SpecificationLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpecificationLoader")
			.field("phase", &self.phase())
			.field("specifications", &self.shared.cache.read().len())
			.field("model", &self.shared.model)
			.finish()
	}
}

/// Builder for [`SpecificationLoader`].
#[derive(Default)]
pub struct SpecificationLoaderBuilder {
	introspector: Option<Arc<dyn ClassIntrospector>>,
	model: Option<ProgrammingModel>,
	settings: Option<MetamodelSettings>,
}

impl SpecificationLoaderBuilder {
	/// Sets the introspection adapter. Defaults to
	/// [`ClassRegistry::from_inventory`].
	pub fn introspector(mut self, introspector: impl ClassIntrospector + 'static) -> Self {
		self.introspector = Some(Arc::new(introspector));
		self
	}

	/// Sets a shared introspection adapter.
	pub fn shared_introspector(mut self, introspector: Arc<dyn ClassIntrospector>) -> Self {
		self.introspector = Some(introspector);
		self
	}

	/// Sets the programming model. Defaults to
	/// [`ProgrammingModel::from_settings`].
	pub fn programming_model(mut self, model: ProgrammingModel) -> Self {
		self.model = Some(model);
		self
	}

	/// Sets the settings.
	pub fn settings(mut self, settings: MetamodelSettings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Builds the loader.
	pub fn build(self) -> SpecificationLoader {
		let settings = self.settings.unwrap_or_default();
		let model = self
			.model
			.unwrap_or_else(|| ProgrammingModel::from_settings(&settings));
		let introspector = self
			.introspector
			.unwrap_or_else(|| Arc::new(ClassRegistry::from_inventory()));
		let shared = Arc::new_cyclic(|this| LoaderShared {
			this: this.clone(),
			introspector,
			model,
			settings,
			cache: RwLock::new(HashMap::new()),
			frozen: OnceLock::new(),
			report: Mutex::new(ValidationReport::new()),
			phase: RwLock::new(MetamodelPhase::Introspecting),
		});
		SpecificationLoader { shared }
	}
}
