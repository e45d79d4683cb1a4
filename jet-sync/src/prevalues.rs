//! Pre-value reconciliation.
//!
//! - [`initial`] — a definition that was just created: always save, an empty
//!   map when the model declares none.
//! - [`merge`] — a definition that already existed: the model's map becomes
//!   the complete set, but entries that survive keep the store's id and sort
//!   order. Models without pre-values, and legacy positional storage, are
//!   left alone.

use std::collections::BTreeMap;

use jet_core::{PreValue, PreValueCollection, PreValueMap, StorageId};

use crate::service::DataTypeService;
use crate::SyncError;

/// What a pre-value reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreValueOutcome {
    /// The complete set was saved with this many entries.
    Saved(usize),
    /// The model expressed no opinion; nothing was read or written.
    Untouched,
    /// Existing pre-values are positional and cannot be merged by key.
    SkippedPositional,
}

/// Save the pre-values of a newly created definition.
pub fn initial(
    service: &mut dyn DataTypeService,
    id: StorageId,
    desired: Option<&BTreeMap<String, String>>,
) -> Result<PreValueOutcome, SyncError> {
    let pre_values: PreValueMap = desired
        .into_iter()
        .flatten()
        .map(|(key, value)| (key.clone(), PreValue::new(value.clone())))
        .collect();
    let count = pre_values.len();
    service.save_pre_values(id, pre_values)?;
    tracing::debug!("saved {count} pre-value(s) for new definition {id}");
    Ok(PreValueOutcome::Saved(count))
}

/// Reconcile the pre-values of an existing definition with `desired`.
pub fn merge(
    service: &mut dyn DataTypeService,
    id: StorageId,
    desired: Option<&BTreeMap<String, String>>,
) -> Result<PreValueOutcome, SyncError> {
    let Some(desired) = desired else {
        return Ok(PreValueOutcome::Untouched);
    };

    let existing = match service.pre_values(id)? {
        PreValueCollection::Dictionary(map) => map,
        PreValueCollection::List(_) => {
            tracing::warn!(
                "pre-values of definition {id} are positional; leaving them unchanged"
            );
            return Ok(PreValueOutcome::SkippedPositional);
        }
    };

    let pre_values = merged(&existing, desired);
    let count = pre_values.len();
    service.save_pre_values(id, pre_values)?;
    tracing::debug!(
        "saved {count} pre-value(s) for definition {id} (previously {})",
        existing.len()
    );
    Ok(PreValueOutcome::Saved(count))
}

/// The replacement set for `existing` given `desired`.
///
/// Keys missing from `desired` are dropped. Kept keys carry the existing
/// entry with only its value replaced.
pub fn merged(existing: &PreValueMap, desired: &BTreeMap<String, String>) -> PreValueMap {
    desired
        .iter()
        .map(|(key, value)| {
            let entry = match existing.get(key) {
                Some(current) => PreValue {
                    value: value.clone(),
                    ..current.clone()
                },
                None => PreValue::new(value.clone()),
            };
            (key.clone(), entry)
        })
        .collect()
}
