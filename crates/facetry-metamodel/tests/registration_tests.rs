//! Link-time class registration

use facetry_core::{BeanSort, MetamodelError};
use facetry_metamodel::prelude::*;
use rstest::*;

fn describe_customer() -> ClassDescriptor {
	ClassDescriptor::new("crm.Customer")
		.with_logical_name("Customer")
		.with_metadata(Metadata::Entity)
		.with_member(MemberDescriptor::property("name", "string"))
		.with_member(MemberDescriptor::collection("orders", "crm.Order"))
}

fn describe_order() -> ClassDescriptor {
	ClassDescriptor::new("crm.Order")
		.with_metadata(Metadata::ViewModel)
		.with_member(MemberDescriptor::property("customer", "crm.Customer"))
}

facetry_metamodel::register_domain_class!(describe_customer);
facetry_metamodel::register_domain_class!(describe_order);

#[rstest]
fn test_registered_classes_are_found_by_default_loader() {
	// Arrange
	let loader = SpecificationLoader::builder().build();

	// Act
	let report = loader.bootstrap(["crm.Customer"]).unwrap();

	// Assert
	assert!(report.is_empty());
	let customer = loader.spec_for("crm.Customer").unwrap();
	let order = loader.spec_for("crm.Order").unwrap();
	assert_eq!(customer.logical_name(), "Customer");
	assert_eq!(customer.display_name(), "Customer");
	assert_eq!(order.bean_sort(), BeanSort::ViewModel);
}

#[rstest]
fn test_registry_rejects_explicit_duplicates() {
	// Arrange
	let registry = ClassRegistry::from_inventory();

	// Act
	let result = registry.register(describe_order());

	// Assert
	assert!(matches!(result, Err(MetamodelError::DuplicateType(name)) if name == "crm.Order"));
	assert!(registry.contains("crm.Customer"));
	assert!(registry.contains("string"));
}
