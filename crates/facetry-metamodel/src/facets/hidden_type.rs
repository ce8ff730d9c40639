//! Type-level hiding.

use crate::facet::Facet;
use crate::factory::{FacetFactory, ProcessingContext};
use crate::interaction::{HidingAdvisor, VisibilityContext, evaluate_visibility};
use crate::introspection::Metadata;
use crate::member::ObjectMember;
use facetry_core::{FeatureType, Precedence, Where};
use std::fmt;
use std::sync::Arc;

/// Why a type is hidden.
#[derive(Clone)]
pub enum HiddenTypeSource {
	/// Declared on the class.
	Declared(Where),
	/// Every property and collection of the type is hidden.
	DerivedFromMembers {
		/// Logical name of the type, used in the veto reason.
		logical_name: String,
		/// The properties and collections consulted.
		members: Vec<Arc<ObjectMember>>,
	},
}

/// Hides a whole type.
#[derive(Clone)]
pub struct HiddenTypeFacet {
	source: HiddenTypeSource,
}

impl HiddenTypeFacet {
	/// Declared hiding in `where_`.
	pub fn declared(where_: Where) -> Self {
		Self {
			source: HiddenTypeSource::Declared(where_),
		}
	}

	/// Hidden whenever every one of `members` is hidden for the asking actor.
	pub fn derived_from_members(logical_name: impl Into<String>, members: Vec<Arc<ObjectMember>>) -> Self {
		Self {
			source: HiddenTypeSource::DerivedFromMembers {
				logical_name: logical_name.into(),
				members,
			},
		}
	}

	/// Why the type is hidden.
	pub fn source(&self) -> &HiddenTypeSource {
		&self.source
	}
}

impl fmt::Debug for HiddenTypeFacet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.source {
			HiddenTypeSource::Declared(where_) => f.debug_tuple("HiddenTypeFacet::Declared").field(where_).finish(),
			HiddenTypeSource::DerivedFromMembers {
				logical_name,
				members,
			} => f
				.debug_struct("HiddenTypeFacet::DerivedFromMembers")
				.field("logical_name", logical_name)
				.field(
					"members",
					&members.iter().map(|m| m.name().to_string()).collect::<Vec<_>>(),
				)
				.finish(),
		}
	}
}

impl Facet for HiddenTypeFacet {
	fn precedence(&self) -> Precedence {
		match self.source {
			HiddenTypeSource::Declared(_) => Precedence::Default,
			HiddenTypeSource::DerivedFromMembers { .. } => Precedence::High,
		}
	}

	fn is_derived(&self) -> bool {
		matches!(self.source, HiddenTypeSource::DerivedFromMembers { .. })
	}

	fn as_hiding_advisor(&self) -> Option<&dyn HidingAdvisor> {
		Some(self)
	}
}

impl HidingAdvisor for HiddenTypeFacet {
	fn hides(&self, context: &VisibilityContext) -> Option<String> {
		match &self.source {
			HiddenTypeSource::Declared(where_) => where_
				.includes(context.where_())
				.then(|| "Hidden".to_string()),
			HiddenTypeSource::DerivedFromMembers {
				logical_name,
				members,
			} => {
				let all_hidden = !members.is_empty()
					&& members.iter().all(|member| {
						let member_context =
							VisibilityContext::new(context.head.clone(), member.identifier().clone());
						evaluate_visibility(member.facet_holder(), &member_context).is_vetoed()
					});
				all_hidden.then(|| format!("All properties and collections of {logical_name} are hidden"))
			}
		}
	}
}

/// Installs a declared [`HiddenTypeFacet`] from `Hidden(where)` on a class.
#[derive(Debug, Default)]
pub struct HiddenTypeFacetFactory;

impl FacetFactory for HiddenTypeFacetFactory {
	fn feature_types(&self) -> &'static [FeatureType] {
		&[FeatureType::Object]
	}

	fn process(&self, context: &ProcessingContext<'_>) {
		if let Some(where_) = context.find_metadata(|m| match m {
			Metadata::Hidden(where_) => Some(*where_),
			_ => None,
		}) {
			context.add_facet(HiddenTypeFacet::declared(where_));
		}
	}
}
