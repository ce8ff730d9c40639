//! The bundled facet catalogue.
//!
//! Each module pairs one facet with the factory that installs it from
//! declared metadata. Derived variants are added by post-processors.

pub mod authorization;
pub mod choices;
pub mod defaults;
pub mod disabled;
pub mod hidden;
pub mod hidden_type;
pub mod immutable;
pub mod mandatory;
pub mod max_length;
pub mod member_order;
pub mod must_satisfy;
pub mod named;
pub mod pattern;
pub mod value;

pub use authorization::{AuthorizationFacet, AuthorizationFacetFactory, AuthorizationOracle, RolePermissions};
pub use choices::{AutoCompleteFacet, AutoCompleteFacetFactory, AutoCompleteSearch, ChoicesFacet, ChoicesFacetFactory, ChoicesSource};
pub use defaults::{DefaultsFacet, DefaultsFacetFactory, DefaultsSource};
pub use disabled::{DisabledFacet, DisabledFacetFactory};
pub use hidden::{HiddenFacet, HiddenFacetFactory};
pub use hidden_type::{HiddenTypeFacet, HiddenTypeFacetFactory, HiddenTypeSource};
pub use immutable::{ImmutableFacet, ImmutableFacetFactory};
pub use mandatory::{MandatoryFacet, MandatoryFacetFactory, MandatoryFallbackFactory, Semantics};
pub use max_length::{MaxLengthFacet, MaxLengthFacetFactory};
pub use member_order::{MemberOrderFacet, MemberOrderFacetFactory};
pub use must_satisfy::{MustSatisfyFacet, MustSatisfyFacetFactory, Specification};
pub use named::{DescribedAsFacet, NamedFacet, NamedFacetFactory};
pub use pattern::{RegexFacet, RegexFacetFactory};
pub use value::{ValueFacet, ValueFacetFactory, ValueKind};
