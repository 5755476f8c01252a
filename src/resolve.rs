//! Turns user-supplied tokens into the desired set.

use crate::catalog::{ALL_TOKEN, CapabilityCatalog, CapabilitySet};
use crate::error::ReconcileError;

/// Resolve user input against `catalog`.
///
/// Empty input requests nothing. The wildcard only counts when it is the sole
/// token; mixed with other tokens it is rejected like any unknown value.
pub fn resolve_desired<S: AsRef<str>>(
    catalog: &CapabilityCatalog,
    requested: &[S],
) -> Result<CapabilitySet, ReconcileError> {
    if requested.is_empty() {
        return Ok(CapabilitySet::new());
    }
    if let [only] = requested {
        if only.as_ref() == ALL_TOKEN {
            return Ok(catalog.full_set());
        }
    }

    let mut desired = CapabilitySet::new();
    for token in requested {
        let token = token.as_ref();
        if !catalog.contains(token) {
            return Err(catalog.unknown(token));
        }
        desired.insert(token);
    }
    Ok(desired)
}
