//! Ordering rules for the Track → Section → Sequence hierarchy.
//!
//! Sections are ordered within their track and sequences within their
//! section by an integer `order`. The functions here compute new orders and
//! validate client-supplied reorderings; the repositories apply the results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// One `{ id, order }` pair of a reorder request or a planned order write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderEntry {
    pub id: DbId,
    pub order: i32,
}

/// What a sequence slot points at. Exactly one of content or form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceTarget {
    Content(DbId),
    Form(DbId),
}

impl SequenceTarget {
    /// Build a target from the two nullable columns / request fields.
    ///
    /// Fails when both or neither are set.
    pub fn from_ids(content_id: Option<DbId>, form_id: Option<DbId>) -> Result<Self, CoreError> {
        match (content_id, form_id) {
            (Some(id), None) => Ok(Self::Content(id)),
            (None, Some(id)) => Ok(Self::Form(id)),
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "A sequence must reference either a content or a form, not both".into(),
            )),
            (None, None) => Err(CoreError::Validation(
                "A sequence must reference a content or a form".into(),
            )),
        }
    }

    pub fn content_id(self) -> Option<DbId> {
        match self {
            Self::Content(id) => Some(id),
            Self::Form(_) => None,
        }
    }

    pub fn form_id(self) -> Option<DbId> {
        match self {
            Self::Form(id) => Some(id),
            Self::Content(_) => None,
        }
    }
}

/// Order for an item appended after `existing`: one past the maximum, or `0`
/// when there is nothing yet.
///
/// Gaps are not filled: `{0, 2, 5}` yields `6`.
pub fn next_order(existing: &[i32]) -> Result<i32, CoreError> {
    match existing.iter().copied().max() {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| CoreError::Validation("Order value out of range".into())),
    }
}

/// Resolve the orders of a freshly created child list: an explicit order is
/// kept, a missing one becomes the item's position in the list.
pub fn positional_orders<I>(explicit: I) -> Vec<i32>
where
    I: IntoIterator<Item = Option<i32>>,
{
    explicit
        .into_iter()
        .enumerate()
        .map(|(index, order)| order.unwrap_or(index as i32))
        .collect()
}

/// Plan the writes that renumber `current` (pairs of `(id, order)`) to a
/// dense `0..n-1` sequence.
///
/// Items are ranked by `(order, id)`. Only entries whose order actually
/// changes are returned.
pub fn compact_orders(current: &[(DbId, i32)]) -> Vec<OrderEntry> {
    let mut ranked = current.to_vec();
    ranked.sort_by_key(|&(id, order)| (order, id));

    ranked
        .into_iter()
        .enumerate()
        .filter_map(|(index, (id, order))| {
            let dense = index as i32;
            (order != dense).then_some(OrderEntry { id, order: dense })
        })
        .collect()
}

/// Validate a reorder request against the ids currently under the parent.
///
/// The request must name every current child exactly once, nothing else, and
/// its orders must be a permutation of `0..n-1`. `entity` names the child
/// kind in error messages (e.g. `"section"`).
pub fn validate_reorder(
    entity: &str,
    current_ids: &[DbId],
    entries: &[OrderEntry],
) -> Result<(), CoreError> {
    if entries.len() != current_ids.len() {
        return Err(CoreError::Validation(format!(
            "Reorder must list every {entity} exactly once: expected {}, got {}",
            current_ids.len(),
            entries.len()
        )));
    }

    let current: HashSet<DbId> = current_ids.iter().copied().collect();
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !current.contains(&entry.id) {
            return Err(CoreError::Validation(format!(
                "{entity} {} does not belong to this parent",
                entry.id
            )));
        }
        if !seen.insert(entry.id) {
            return Err(CoreError::Validation(format!(
                "{entity} {} is listed more than once",
                entry.id
            )));
        }
    }

    let mut orders: Vec<i32> = entries.iter().map(|e| e.order).collect();
    orders.sort_unstable();
    let is_permutation = orders
        .iter()
        .enumerate()
        .all(|(index, &order)| order == index as i32);
    if !is_permutation {
        return Err(CoreError::Validation(format!(
            "{entity} orders must be a permutation of 0..{}",
            entries.len()
        )));
    }

    Ok(())
}
