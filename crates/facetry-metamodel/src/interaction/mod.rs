//! Request-time interaction evaluation.
//!
//! A caller builds a [`VisibilityContext`], [`UsabilityContext`] or
//! [`ValidityContext`] for one evaluation; every facet implementing the
//! matching advisor is asked for a veto and the answers are folded into an
//! [`InteractionResultSet`].
//!
//! Visibility and usability stop at the first veto. Validity keeps going so
//! that several simultaneous problems are reported together.

pub mod advisor;
pub mod context;
pub mod evaluation;
pub mod result;

pub use advisor::{DisablingAdvisor, HidingAdvisor, ValidatingAdvisor};
pub use context::{InteractionHead, UsabilityContext, ValidityContext, ValidityKind, VisibilityContext};
pub use evaluation::{evaluate_usability, evaluate_validity, evaluate_visibility};
pub use result::{Aggregation, Consent, InteractionResultSet, Veto};
