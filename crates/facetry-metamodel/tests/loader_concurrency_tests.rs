//! Specification loading: caching, cycles and concurrent first use

use facetry_core::{BeanSort, FeatureType};
use facetry_metamodel::facets::NamedFacetFactory;
use facetry_metamodel::prelude::*;
use facetry_metamodel::{FacetFactory, ProcessingContext, SpecState};
use parking_lot::Mutex;
use rstest::*;
use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Counts class-level pipeline runs per type and slows each run down so that
/// concurrent callers overlap.
#[derive(Clone, Default)]
struct CountingFactory {
	runs: Arc<Mutex<HashMap<String, usize>>>,
}

impl CountingFactory {
	fn runs_of(&self, full_name: &str) -> usize {
		self.runs.lock().get(full_name).copied().unwrap_or(0)
	}
}

impl FacetFactory for CountingFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&[FeatureType::Object]
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		*self
			.runs
			.lock()
			.entry(context.class().full_name.clone())
			.or_default() += 1;
		thread::sleep(Duration::from_millis(20));
	}
}

fn graph_registry() -> ClassRegistry {
	ClassRegistry::with_builtin_values()
		.with_class(
			ClassDescriptor::new("graph.Node")
				.with_metadata(Metadata::Entity)
				.with_member(MemberDescriptor::property("label", "string"))
				.with_member(MemberDescriptor::property("parent", "graph.Node"))
				.with_member(MemberDescriptor::collection("children", "graph.Node")),
		)
		.with_class(
			ClassDescriptor::new("graph.Left")
				.with_metadata(Metadata::Entity)
				.with_member(MemberDescriptor::property("right", "graph.Right")),
		)
		.with_class(
			ClassDescriptor::new("graph.Right")
				.with_metadata(Metadata::Entity)
				.with_member(MemberDescriptor::property("left", "graph.Left")),
		)
		.with_class(
			ClassDescriptor::new("graph.Shape")
				.abstract_type()
				.with_member(MemberDescriptor::property("largest", "graph.Circle")),
		)
		.with_class(
			ClassDescriptor::new("graph.Circle")
				.with_metadata(Metadata::Entity)
				.with_supertype("graph.Shape")
				.with_member(MemberDescriptor::property("radius", "f64")),
		)
}

#[fixture]
fn counter() -> CountingFactory {
	CountingFactory::default()
}

fn loader_with(counter: &CountingFactory, settings: MetamodelSettings) -> SpecificationLoader {
	let model = ProgrammingModel::from_settings(&settings).with_factory(counter.clone());
	SpecificationLoader::builder()
		.introspector(graph_registry())
		.programming_model(model)
		.settings(settings)
		.build()
}

#[rstest]
fn test_concurrent_first_lookup_runs_pipeline_once(counter: CountingFactory) {
	// Arrange
	let loader = loader_with(&counter, MetamodelSettings::default());
	let threads = 8;
	let barrier = Barrier::new(threads);

	// Act
	let specs: Vec<Arc<ObjectSpecification>> = thread::scope(|scope| {
		let handles: Vec<_> = (0..threads)
			.map(|_| {
				scope.spawn(|| {
					barrier.wait();
					loader.spec_for("graph.Node").unwrap()
				})
			})
			.collect();
		handles.into_iter().map(|handle| handle.join().unwrap()).collect()
	});

	// Assert
	assert_eq!(counter.runs_of("graph.Node"), 1);
	for spec in &specs {
		assert!(Arc::ptr_eq(spec, &specs[0]));
		// Every caller sees the finished specification, never the placeholder.
		assert_eq!(spec.state(), SpecState::Introspected);
		assert_eq!(spec.members().len(), 3);
	}
}

#[rstest]
fn test_self_referencing_type_resolves_to_itself(counter: CountingFactory) {
	// Arrange
	let loader = loader_with(&counter, MetamodelSettings::default());

	// Act
	let node = loader.spec_for("graph.Node").unwrap();

	// Assert
	let parent = node.property("parent").unwrap().specification().unwrap();
	let children = node.collection("children").unwrap().specification().unwrap();
	assert!(Arc::ptr_eq(&node, &parent));
	assert!(Arc::ptr_eq(&node, &children));
	assert_eq!(counter.runs_of("graph.Node"), 1);
}

#[rstest]
fn test_supertype_cycle_resolves(counter: CountingFactory) {
	// Arrange
	let loader = loader_with(&counter, MetamodelSettings::default());

	// Act
	let circle = loader.spec_for("graph.Circle").unwrap();
	loader.post_process_all().unwrap();
	loader.freeze().unwrap();

	// Assert
	let shape = circle.supertype().unwrap();
	assert_eq!(shape.full_name(), "graph.Shape");
	assert_eq!(shape.bean_sort(), BeanSort::Abstract);
	assert!(shape.is_abstract());
	let largest = shape.property("largest").unwrap().specification().unwrap();
	assert!(Arc::ptr_eq(&largest, &circle));
	assert_eq!(counter.runs_of("graph.Circle"), 1);
	assert_eq!(counter.runs_of("graph.Shape"), 1);
}

#[rstest]
#[case::sequential(MetamodelSettings::default())]
#[case::parallel(MetamodelSettings::default().with_parallel_introspection(4))]
fn test_mutually_referencing_types(counter: CountingFactory, #[case] settings: MetamodelSettings) {
	// Arrange
	let loader = loader_with(&counter, settings);

	// Act
	let report = loader.bootstrap(["graph.Left", "graph.Right"]).unwrap();

	// Assert
	assert!(report.is_empty(), "{:?}", report.messages());
	let left = loader.spec_for("graph.Left").unwrap();
	let right = loader.spec_for("graph.Right").unwrap();
	assert!(Arc::ptr_eq(
		&left.property("right").unwrap().specification().unwrap(),
		&right
	));
	assert!(Arc::ptr_eq(
		&right.property("left").unwrap().specification().unwrap(),
		&left
	));
	assert_eq!(counter.runs_of("graph.Left"), 1);
	assert_eq!(counter.runs_of("graph.Right"), 1);
	assert_eq!(left.state(), SpecState::Frozen);
}

#[rstest]
fn test_parallel_introspection_of_many_types(counter: CountingFactory) {
	// Arrange
	let loader = loader_with(&counter, MetamodelSettings::default().with_parallel_introspection(3));
	let names = ["graph.Node", "graph.Left", "graph.Right", "graph.Circle", "graph.Shape"];

	// Act
	loader.introspect_all(names).unwrap();

	// Assert
	for name in names {
		assert_eq!(counter.runs_of(name), 1, "{name}");
		assert!(loader.spec_for(name).unwrap().is_introspected());
	}
}

#[rstest]
fn test_parallel_introspection_reports_unknown_names(counter: CountingFactory) {
	// Arrange
	let loader = loader_with(&counter, MetamodelSettings::default().with_parallel_introspection(2));

	// Act
	loader.introspect_all(["graph.Node", "graph.Missing", "graph.Left"]).unwrap();

	// Assert
	let messages = loader.validation_report().messages().join("\n");
	assert!(messages.contains("graph.Missing: unknown type: graph.Missing"), "{messages}");
	assert_eq!(counter.runs_of("graph.Node"), 1);
	assert_eq!(counter.runs_of("graph.Left"), 1);
}

#[rstest]
fn test_lookup_is_served_from_cache() {
	// Arrange
	let loader = SpecificationLoader::builder()
		.introspector(graph_registry())
		.programming_model(ProgrammingModel::empty().with_factory(NamedFacetFactory))
		.build();

	// Act
	let first = loader.spec_for("graph.Left").unwrap();
	let second = loader.spec_for("graph.Left").unwrap();

	// Assert
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(first.display_name(), "Left");
	// `graph.Right` was reached through the `right` property.
	let cached: Vec<String> = loader
		.all_specifications()
		.iter()
		.map(|spec| spec.full_name().to_string())
		.collect();
	assert_eq!(cached, vec!["graph.Left", "graph.Right"]);
}
