//! Thing entity model for twinproto.
//!
//! Defines the entity that retrieve commands address and responses carry:
//! - [`Thing`]: id, policy (V2) or ACL (V1), attributes and features
//! - [`Feature`] / [`Features`]: the dynamically named sub-components
//!
//! The model renders itself through the same versioned codec as the signals
//! and exposes its feature ids, which is what selector wildcards expand
//! against. Validation of domain rules (policies, definitions) is left to
//! the services owning the things.

mod feature;
mod thing;

pub use feature::{Feature, Features};
pub use thing::{Thing, ThingBuilder, fields as thing_fields};
