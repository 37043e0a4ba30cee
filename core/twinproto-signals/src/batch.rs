//! The shared-namespace rule for batch retrieval.
//!
//! Qualified ids in one batch must all carry the same namespace. An explicit
//! namespace must equal it, and is only accepted when at least one id is
//! qualified.

use crate::error::{SignalError, SignalResult};
use std::collections::BTreeSet;
use tracing::debug;
use twinproto_types::ThingId;

/// Checks `ids` against the shared-namespace rule and returns the namespace
/// the batch is confined to, if any.
pub fn validate_namespace<'a, I>(ids: I, explicit: Option<&str>) -> SignalResult<Option<String>>
where
    I: IntoIterator<Item = &'a ThingId>,
{
    let found: BTreeSet<&str> = ids.into_iter().filter_map(ThingId::namespace).collect();

    let mut namespaces = found.iter();
    let single = match (namespaces.next(), namespaces.next()) {
        (Some(first), None) => Some(*first),
        (None, _) => None,
        (Some(_), Some(_)) => {
            debug!(count = found.len(), "Batch spans several namespaces");
            return Err(SignalError::InconsistentNamespaces {
                namespaces: found.iter().map(|ns| ns.to_string()).collect(),
            });
        }
    };

    match (explicit, single) {
        (Some(namespace), Some(found)) if namespace != found => Err(SignalError::NamespaceMismatch {
            namespace: namespace.to_string(),
            found: found.to_string(),
        }),
        (Some(_), None) => Err(SignalError::InconsistentNamespaces {
            namespaces: Vec::new(),
        }),
        (_, single) => Ok(single.map(str::to_string)),
    }
}
