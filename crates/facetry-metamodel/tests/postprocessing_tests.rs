//! Post-processing: type-level hiding, collection-backed parameters and
//! immutable types

use facetry_core::{Actor, Where};
use facetry_metamodel::facets::{
	AutoCompleteFacet, AutoCompleteSearch, ChoicesFacet, ChoicesSource, DefaultsFacet, DisabledFacet,
	HiddenTypeFacet, HiddenTypeSource, RolePermissions,
};
use facetry_metamodel::object::same_pojo;
use facetry_metamodel::prelude::*;
use rstest::*;
use serde_json::json;
use std::sync::Arc;

fn bootstrap(registry: ClassRegistry, model: ProgrammingModel, names: &[&str]) -> SpecificationLoader {
	let loader = SpecificationLoader::builder()
		.introspector(registry)
		.programming_model(model)
		.build();
	loader.bootstrap(names).unwrap();
	loader
}

fn default_model() -> ProgrammingModel {
	ProgrammingModel::from_settings(&MetamodelSettings::default())
}

fn head(loader: &SpecificationLoader, pojo: Pojo, actor: Actor) -> InteractionHead {
	InteractionHead::new(loader.adapt(pojo).unwrap(), actor)
}

fn is_same(value: &ObjectValue, pojo: &Pojo) -> bool {
	value.as_reference().is_some_and(|candidate| same_pojo(candidate, pojo))
}

// Type-level hiding

fn secret_class(where_: Where) -> ClassDescriptor {
	ClassDescriptor::new("hr.SecretFile")
		.with_logical_name("SecretFile")
		.with_metadata(Metadata::Entity)
		.with_member(MemberDescriptor::property("code", "string").with_metadata(Metadata::Hidden(where_)))
		.with_member(MemberDescriptor::collection("notes", "string").with_metadata(Metadata::Hidden(where_)))
		.with_member(MemberDescriptor::action("shred"))
}

#[rstest]
fn test_type_with_only_hidden_members_is_hidden() {
	// Arrange
	let registry = ClassRegistry::with_builtin_values().with_class(secret_class(Where::Everywhere));
	let loader = bootstrap(registry, default_model(), &["hr.SecretFile"]);
	let head = head(&loader, Arc::new(DynamicObject::new("hr.SecretFile")), Actor::new("clerk"));

	// Act
	let consent = head.target.specification().is_visible(&head).unwrap();

	// Assert
	assert_eq!(
		consent,
		Consent::Veto("All properties and collections of SecretFile are hidden".to_string())
	);
	let facet = head.target.specification().get_facet::<HiddenTypeFacet>().unwrap();
	assert!(matches!(facet.source(), HiddenTypeSource::DerivedFromMembers { .. }));
}

#[rstest]
fn test_one_visible_member_keeps_type_visible() {
	// Arrange
	let class = secret_class(Where::Everywhere).with_member(MemberDescriptor::property("title", "string"));
	let registry = ClassRegistry::with_builtin_values().with_class(class);
	let loader = bootstrap(registry, default_model(), &["hr.SecretFile"]);
	let head = head(&loader, Arc::new(DynamicObject::new("hr.SecretFile")), Actor::new("clerk"));

	// Act
	let consent = head.target.specification().is_visible(&head).unwrap();

	// Assert
	assert_eq!(consent, Consent::Allow);
	assert!(!head.target.specification().has_facet::<HiddenTypeFacet>());
}

#[rstest]
#[case(Where::ParentedTables, true)]
#[case(Where::StandaloneTables, true)]
#[case(Where::ObjectForms, false)]
fn test_derived_type_hiding_follows_request_region(#[case] region: Where, #[case] hidden: bool) {
	// Arrange
	let registry = ClassRegistry::with_builtin_values().with_class(secret_class(Where::AllTables));
	let loader = bootstrap(registry, default_model(), &["hr.SecretFile"]);
	let head =
		head(&loader, Arc::new(DynamicObject::new("hr.SecretFile")), Actor::new("clerk")).in_region(region);

	// Act
	let consent = head.target.specification().is_visible(&head).unwrap();

	// Assert
	assert_eq!(consent.is_vetoed(), hidden);
}

#[rstest]
#[case::payroll(Actor::new("pat").with_role("payroll"), true)]
#[case::outsider(Actor::new("sam").with_role("sales"), false)]
fn test_derived_type_hiding_asks_authorization_per_request(#[case] actor: Actor, #[case] visible: bool) {
	// Arrange
	let registry = ClassRegistry::with_builtin_values().with_class(
		ClassDescriptor::new("hr.Payslip")
			.with_logical_name("Payslip")
			.with_metadata(Metadata::Entity)
			.with_member(MemberDescriptor::property("gross", "f64"))
			.with_member(MemberDescriptor::property("net", "f64")),
	);
	let permissions = RolePermissions::new()
		.viewable_by("hr.Payslip#gross", "payroll")
		.viewable_by("hr.Payslip#net", "payroll");
	let model = default_model().with_authorization(Arc::new(permissions));
	let loader = bootstrap(registry, model, &["hr.Payslip"]);
	let head = head(&loader, Arc::new(DynamicObject::new("hr.Payslip")), actor);

	// Act
	let consent = head.target.specification().is_visible(&head).unwrap();

	// Assert
	assert_eq!(consent.is_allowed(), visible);
}

#[rstest]
fn test_declared_type_hiding_is_kept() {
	// Arrange
	let class = secret_class(Where::Everywhere).with_metadata(Metadata::Hidden(Where::Everywhere));
	let registry = ClassRegistry::with_builtin_values().with_class(class);
	let loader = bootstrap(registry, default_model(), &["hr.SecretFile"]);
	let head = head(&loader, Arc::new(DynamicObject::new("hr.SecretFile")), Actor::new("clerk"));

	// Act
	let consent = head.target.specification().is_visible(&head).unwrap();

	// Assert
	assert_eq!(consent, Consent::Veto("Hidden".to_string()));
}

#[rstest]
fn test_type_hiding_can_be_switched_off() {
	// Arrange
	let mut settings = MetamodelSettings::default();
	settings.post_processing.hide_types_without_visible_members = false;
	let registry = ClassRegistry::with_builtin_values().with_class(secret_class(Where::Everywhere));
	let loader = bootstrap(registry, ProgrammingModel::from_settings(&settings), &["hr.SecretFile"]);

	// Act
	let spec = loader.spec_for("hr.SecretFile").unwrap();

	// Assert
	assert!(!spec.has_facet::<HiddenTypeFacet>());
}

// Collection-backed parameters

fn basket_registry() -> ClassRegistry {
	let search = AutoCompleteSearch::new(|target, text| {
		target
			.pojo()
			.map(|basket| {
				basket
					.collection("items")
					.into_iter()
					.filter(|item| item.title().is_some_and(|title| title.starts_with(text)))
					.map(ObjectValue::Reference)
					.collect()
			})
			.unwrap_or_default()
	});
	ClassRegistry::with_builtin_values()
		.with_class(
			ClassDescriptor::new("shop.Item")
				.with_metadata(Metadata::Entity)
				.with_member(MemberDescriptor::property("name", "string")),
		)
		.with_class(
			ClassDescriptor::new("shop.Basket")
				.with_metadata(Metadata::Entity)
				.with_member(MemberDescriptor::collection("items", "shop.Item"))
				.with_member(
					MemberDescriptor::action("removeItems")
						.with_parameter(ParameterDescriptor::collection("chosen", "shop.Item")),
				)
				.with_member(
					MemberDescriptor::action("inspect").with_parameter(ParameterDescriptor::scalar("item", "shop.Item")),
				)
				.with_member(
					MemberDescriptor::action("changeQuantity")
						.with_parameter(ParameterDescriptor::scalar("quantity", "i64"))
						.with_parameter(ParameterDescriptor::scalar("item", "shop.Item")),
				)
				.with_member(
					MemberDescriptor::action("promote").with_parameter(
						ParameterDescriptor::scalar("item", "shop.Item")
							.with_metadata(Metadata::Choices(vec![ObjectValue::from("fixed")])),
					),
				)
				.with_member(
					MemberDescriptor::action("find").with_parameter(
						ParameterDescriptor::scalar("item", "shop.Item")
							.with_metadata(Metadata::AutoComplete { min_length: 1, search }),
					),
				),
		)
}

#[fixture]
fn basket_loader() -> SpecificationLoader {
	bootstrap(basket_registry(), default_model(), &["shop.Basket"])
}

fn item(name: &str) -> Pojo {
	Arc::new(DynamicObject::new("shop.Item").with_property("name", name))
}

#[rstest]
fn test_collection_parameter_choices_reflect_live_collection(basket_loader: SpecificationLoader) {
	// Arrange
	let basket = Arc::new(DynamicObject::new("shop.Basket"));
	let apple = item("apple");
	basket.push_to_collection("items", apple.clone());
	let target = basket_loader.adapt(basket.clone()).unwrap();
	let spec = basket_loader.spec_for("shop.Basket").unwrap();
	let chosen = spec.action("removeItems").unwrap().parameter(0).unwrap();

	// Act
	let before = chosen.choices(&target);
	let pear = item("pear");
	basket.push_to_collection("items", pear.clone());
	let after = chosen.choices(&target);

	// Assert
	assert_eq!(before.len(), 1);
	assert!(is_same(&before[0], &apple));
	assert_eq!(after.len(), 2);
	assert!(is_same(&after[1], &pear));
}

#[rstest]
fn test_first_parameter_defaults_to_selection(basket_loader: SpecificationLoader) {
	// Arrange
	let spec = basket_loader.spec_for("shop.Basket").unwrap();
	let apple = item("apple");
	let pear = item("pear");
	let selection = vec![apple.clone(), pear.clone()];

	// Act
	let remove = spec.action("removeItems").unwrap().defaults(&selection).unwrap();
	let inspect = spec.action("inspect").unwrap().defaults(&selection).unwrap();
	let nothing_selected = spec.action("removeItems").unwrap().defaults(&[]).unwrap();

	// Assert
	match &remove[0] {
		Some(ObjectValue::List(values)) => {
			assert_eq!(values.len(), 2);
			assert!(is_same(&values[0], &apple));
			assert!(is_same(&values[1], &pear));
		}
		other => panic!("expected a list default, got {other:?}"),
	}
	assert!(inspect[0].as_ref().is_some_and(|value| is_same(value, &apple)));
	assert!(nothing_selected[0].is_none());
}

#[rstest]
fn test_later_parameter_gets_choices_but_no_default(basket_loader: SpecificationLoader) {
	// Arrange
	let spec = basket_loader.spec_for("shop.Basket").unwrap();
	let action = spec.action("changeQuantity").unwrap();

	// Act
	let item_parameter = action.parameter(1).unwrap();
	let quantity_parameter = action.parameter(0).unwrap();

	// Assert
	assert!(item_parameter.has_facet::<ChoicesFacet>());
	assert!(!item_parameter.has_facet::<DefaultsFacet>());
	assert!(!quantity_parameter.has_facet::<ChoicesFacet>());
	let defaults = action.defaults(&[item("apple")]).unwrap();
	assert_eq!(defaults.len(), 2);
	assert!(defaults.iter().all(Option::is_none));
}

#[rstest]
fn test_declared_choices_and_autocomplete_are_kept(basket_loader: SpecificationLoader) {
	// Arrange
	let spec = basket_loader.spec_for("shop.Basket").unwrap();

	// Act
	let promoted = spec.action("promote").unwrap().parameter(0).unwrap();
	let found = spec.action("find").unwrap().parameter(0).unwrap();

	// Assert
	let choices = promoted.get_facet::<ChoicesFacet>().unwrap();
	assert!(matches!(choices.source(), ChoicesSource::Fixed(values) if values.len() == 1));
	assert!(found.has_facet::<AutoCompleteFacet>());
	assert!(!found.has_facet::<ChoicesFacet>());
	// Index 0 and compatible: the default is still inferred.
	assert!(found.has_facet::<DefaultsFacet>());
}

#[rstest]
fn test_autocomplete_searches_target(basket_loader: SpecificationLoader) {
	// Arrange
	let basket = Arc::new(DynamicObject::new("shop.Basket"));
	basket.push_to_collection("items", item("apple"));
	basket.push_to_collection("items", item("apricot"));
	basket.push_to_collection("items", item("pear"));
	let target = basket_loader.adapt(basket).unwrap();
	let spec = basket_loader.spec_for("shop.Basket").unwrap();
	let found = spec.action("find").unwrap().parameter(0).unwrap();

	// Act
	let candidates = found.auto_complete(&target, "ap");
	let too_short = found.auto_complete(&target, "");

	// Assert
	assert_eq!(candidates.len(), 2);
	assert!(too_short.is_empty());
}

#[rstest]
fn test_collection_inference_can_be_switched_off() {
	// Arrange
	let mut settings = MetamodelSettings::default();
	settings.post_processing.infer_parameters_from_collections = false;

	// Act
	let loader = bootstrap(basket_registry(), ProgrammingModel::from_settings(&settings), &["shop.Basket"]);

	// Assert
	let spec = loader.spec_for("shop.Basket").unwrap();
	let chosen = spec.action("removeItems").unwrap().parameter(0).unwrap();
	assert!(!chosen.has_facet::<ChoicesFacet>());
	assert!(!chosen.has_facet::<DefaultsFacet>());
}

#[rstest]
fn test_post_processing_twice_changes_nothing() {
	// Arrange
	let loader = SpecificationLoader::builder()
		.introspector(basket_registry().with_class(secret_class(Where::Everywhere)))
		.build();
	loader.introspect_all(["shop.Basket", "hr.SecretFile"]).unwrap();
	loader.post_process_all().unwrap();
	let basket = loader.spec_for("shop.Basket").unwrap();
	let secret = loader.spec_for("hr.SecretFile").unwrap();
	let chosen = basket.action("removeItems").unwrap().parameter(0).unwrap();
	let choices = chosen.get_facet::<ChoicesFacet>().unwrap();
	let defaults = chosen.get_facet::<DefaultsFacet>().unwrap();
	let hidden = secret.get_facet::<HiddenTypeFacet>().unwrap();
	let facet_count = chosen.facet_holder().len();
	let report = loader.validation_report();

	// Act
	loader.post_process_all().unwrap();

	// Assert
	assert!(Arc::ptr_eq(&choices, &chosen.get_facet::<ChoicesFacet>().unwrap()));
	assert!(Arc::ptr_eq(&defaults, &chosen.get_facet::<DefaultsFacet>().unwrap()));
	assert!(Arc::ptr_eq(&hidden, &secret.get_facet::<HiddenTypeFacet>().unwrap()));
	assert_eq!(chosen.facet_holder().len(), facet_count);
	assert_eq!(loader.validation_report(), report);
}

// Immutable types

#[rstest]
fn test_immutable_type_disables_properties_not_actions() {
	// Arrange
	let registry = ClassRegistry::with_builtin_values().with_class(
		ClassDescriptor::new("ledger.Entry")
			.with_metadata(Metadata::Entity)
			.with_metadata(Metadata::Immutable)
			.with_member(MemberDescriptor::property("amount", "f64"))
			.with_member(MemberDescriptor::property("memo", "string").with_metadata(Metadata::Disabled {
				where_: Where::Everywhere,
				reason: "Locked by audit".into(),
			}))
			.with_member(MemberDescriptor::action("reverse")),
	);
	let loader = bootstrap(registry, default_model(), &["ledger.Entry"]);
	let entry = DynamicObject::new("ledger.Entry").with_property("amount", ObjectValue::Scalar(json!(12.5)));
	let head = head(&loader, Arc::new(entry), Actor::new("auditor"));
	let spec = head.target.specification().clone();

	// Act
	let amount = spec.member("amount").unwrap().is_usable(&head).unwrap();
	let memo = spec.member("memo").unwrap().is_usable(&head).unwrap();
	let reverse = spec.member("reverse").unwrap().is_usable(&head).unwrap();

	// Assert
	assert_eq!(amount, Consent::Veto("Immutable".to_string()));
	assert!(spec.member("amount").unwrap().get_facet::<DisabledFacet>().unwrap().is_derived());
	assert!(!spec.member("memo").unwrap().get_facet::<DisabledFacet>().unwrap().is_derived());
	assert_eq!(memo, Consent::Veto("Locked by audit".to_string()));
	assert_eq!(reverse, Consent::Allow);
}
