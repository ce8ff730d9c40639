//! Authorization-derived hiding and disabling.
//!
//! The metamodel does not decide who may see or change what. It asks an
//! [`AuthorizationOracle`] supplied by the application, through an
//! [`AuthorizationFacet`] installed on every member.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{DisablingAdvisor, HidingAdvisor, UsabilityContext, VisibilityContext};
use facetry_core::{Actor, FeatureType, Identifier};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// External permission checks for members.
pub trait AuthorizationOracle: Send + Sync + fmt::Debug {
	/// Whether `actor` may see `member`.
	fn has_view_permission(&self, actor: &Actor, member: &Identifier) -> bool;

	/// Whether `actor` may edit or invoke `member`.
	fn has_change_permission(&self, actor: &Actor, member: &Identifier) -> bool;
}

/// Role-based [`AuthorizationOracle`].
///
/// Rules are keyed by `type#member`, with no parameter signature, so one
/// rule covers an action and all of its parameters. A member without a rule
/// is open to everyone; a member with a rule requires one of the listed
/// roles. Change permission implies view permission.
///
/// # Examples
///
/// ```
/// use facetry_core::{Actor, Identifier};
/// use facetry_metamodel::facets::authorization::{AuthorizationOracle, RolePermissions};
///
/// let permissions = RolePermissions::new()
///     .viewable_by("hr.Employee#salary", "payroll")
///     .changeable_by("hr.Employee#salary", "payroll_admin");
///
/// let salary = Identifier::property("hr.Employee", "salary");
/// let clerk = Actor::new("clerk").with_role("payroll");
/// assert!(permissions.has_view_permission(&clerk, &salary));
/// assert!(!permissions.has_change_permission(&clerk, &salary));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RolePermissions {
	view: HashMap<String, BTreeSet<String>>,
	change: HashMap<String, BTreeSet<String>>,
}

impl RolePermissions {
	/// No rules: everything is allowed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Lets `role` see `member`.
	pub fn viewable_by(mut self, member: impl Into<String>, role: impl Into<String>) -> Self {
		self.view.entry(member.into()).or_default().insert(role.into());
		self
	}

	/// Lets `role` see and change `member`.
	pub fn changeable_by(mut self, member: impl Into<String>, role: impl Into<String>) -> Self {
		self.change.entry(member.into()).or_default().insert(role.into());
		self
	}

	fn rule_key(member: &Identifier) -> String {
		match member.member_name() {
			Some(name) => format!("{}#{name}", member.type_name()),
			None => member.type_name().to_string(),
		}
	}

	fn permits(rules: &HashMap<String, BTreeSet<String>>, actor: &Actor, member: &str) -> Option<bool> {
		rules
			.get(member)
			.map(|roles| roles.iter().any(|role| actor.has_role(role)))
	}
}

impl AuthorizationOracle for RolePermissions {
	fn has_view_permission(&self, actor: &Actor, member: &Identifier) -> bool {
		let key = Self::rule_key(member);
		match (
			Self::permits(&self.view, actor, &key),
			Self::permits(&self.change, actor, &key),
		) {
			(None, None) => true,
			(view, change) => view.unwrap_or(false) || change.unwrap_or(false),
		}
	}

	fn has_change_permission(&self, actor: &Actor, member: &Identifier) -> bool {
		let key = Self::rule_key(member);
		Self::permits(&self.change, actor, &key).unwrap_or(true)
	}
}

/// Hides and disables a member according to an [`AuthorizationOracle`].
#[derive(Debug, Clone)]
pub struct AuthorizationFacet {
	oracle: Arc<dyn AuthorizationOracle>,
}

impl AuthorizationFacet {
	/// Creates the facet.
	pub fn new(oracle: Arc<dyn AuthorizationOracle>) -> Self {
		Self { oracle }
	}
}

impl Facet for AuthorizationFacet {
	fn as_hiding_advisor(&self) -> Option<&dyn HidingAdvisor> {
		Some(self)
	}

	fn as_disabling_advisor(&self) -> Option<&dyn DisablingAdvisor> {
		Some(self)
	}
}

impl HidingAdvisor for AuthorizationFacet {
	fn hides(&self, context: &VisibilityContext) -> Option<String> {
		(!self
			.oracle
			.has_view_permission(&context.head.actor, &context.identifier))
		.then(|| "Not authorized to view".to_string())
	}
}

impl DisablingAdvisor for AuthorizationFacet {
	fn disables(&self, context: &UsabilityContext) -> Option<String> {
		(!self
			.oracle
			.has_change_permission(&context.head.actor, &context.identifier))
		.then(|| "Not authorized to edit".to_string())
	}
}

/// Installs [`AuthorizationFacet`] on every member.
#[derive(Debug, Clone)]
pub struct AuthorizationFacetFactory {
	oracle: Arc<dyn AuthorizationOracle>,
}

impl AuthorizationFacetFactory {
	/// Creates the factory.
	pub fn new(oracle: Arc<dyn AuthorizationOracle>) -> Self {
		Self { oracle }
	}
}

impl FacetFactory for AuthorizationFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&FeatureType::MEMBERS
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		context.add_facet(AuthorizationFacet::new(Arc::clone(&self.oracle)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn permissions() -> RolePermissions {
		RolePermissions::new()
			.viewable_by("hr.Employee#salary", "payroll")
			.changeable_by("hr.Employee#salary", "payroll_admin")
	}

	#[rstest]
	#[case("payroll", true, false)]
	#[case("payroll_admin", true, true)]
	#[case("sales", false, false)]
	fn test_role_permissions(
		permissions: RolePermissions,
		#[case] role: &str,
		#[case] view: bool,
		#[case] change: bool,
	) {
		let actor = Actor::new("someone").with_role(role);
		let salary = Identifier::property("hr.Employee", "salary");
		assert_eq!(permissions.has_view_permission(&actor, &salary), view);
		assert_eq!(permissions.has_change_permission(&actor, &salary), change);
	}

	#[rstest]
	fn test_unruled_member_is_open(permissions: RolePermissions) {
		let actor = Actor::new("anyone");
		let name = Identifier::property("hr.Employee", "name");
		assert!(permissions.has_view_permission(&actor, &name));
		assert!(permissions.has_change_permission(&actor, &name));
	}

	#[rstest]
	fn test_action_rule_ignores_signature() {
		// Arrange
		let permissions = RolePermissions::new().changeable_by("hr.Employee#raise", "manager");
		let raise = Identifier::action("hr.Employee", "raise", ["i64", "string"]);
		let amount = raise.parameter(0);
		let manager = Actor::new("boss").with_role("manager");
		let clerk = Actor::new("clerk");

		// Act / Assert
		assert!(permissions.has_change_permission(&manager, &raise));
		assert!(permissions.has_change_permission(&manager, &amount));
		assert!(!permissions.has_change_permission(&clerk, &raise));
		assert!(!permissions.has_view_permission(&clerk, &amount));
	}
}
