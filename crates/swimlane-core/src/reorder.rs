//! Reordering of the flat item list when a drag is dropped.
//!
//! The dragged item is reinserted next to an existing item of the target
//! bucket (the anchor) instead of at an absolute index, so the order of
//! every other bucket is left untouched. The anchor is resolved from the
//! target bucket as it looks without the dragged item:
//!
//! 1. the item just above the target row,
//! 2. else the item on the target row itself,
//! 3. else the last item of the bucket,
//! 4. else the last item of the previous column's bucket in the same section,
//! 5. else the start of the list.

use crate::model::{CellAddress, Item, ItemId};
use serde::{Deserialize, Serialize};

/// Where the dragged item is reinserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Immediately after this item.
    After(ItemId),
    /// Immediately before this item.
    Before(ItemId),
    /// At the start of the list.
    Start,
}

/// Notification emitted after a committed move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent<T> {
    pub id: ItemId,
    /// Payload of the moved item.
    pub item: T,
    pub from: CellAddress,
    pub to: CellAddress,
    /// Neighbour above the moved item in its new bucket.
    pub item_before: Option<T>,
    /// Neighbour below the moved item in its new bucket.
    pub item_after: Option<T>,
}

fn bucket_without<'a, T>(
    items: &'a [Item<T>],
    section: usize,
    column: usize,
    dragged: &ItemId,
) -> impl Iterator<Item = &'a Item<T>> {
    items
        .iter()
        .filter(move |item| item.is_in(section, column) && item.id != *dragged)
}

/// Pick the anchor for dropping `dragged` on `target`.
pub fn resolve_anchor<T>(items: &[Item<T>], dragged: &ItemId, target: CellAddress) -> Anchor {
    let bucket: Vec<&Item<T>> =
        bucket_without(items, target.section, target.column, dragged).collect();

    if let Some(before) = target.row.checked_sub(1).and_then(|row| bucket.get(row)) {
        return Anchor::After(before.id.clone());
    }
    if let Some(at) = bucket.get(target.row) {
        return Anchor::Before(at.id.clone());
    }
    if let Some(last) = bucket.last() {
        return Anchor::After(last.id.clone());
    }
    if let Some(previous_column) = target.column.checked_sub(1) {
        if let Some(last) = bucket_without(items, target.section, previous_column, dragged).last() {
            return Anchor::After(last.id.clone());
        }
    }
    Anchor::Start
}

/// Move `dragged` from `origin` to `target` inside `items`.
///
/// Returns `None` and leaves the list untouched when the target is the
/// origin or the dragged item is no longer in the list.
pub fn reorder<T: Clone>(
    items: &mut Vec<Item<T>>,
    dragged: &ItemId,
    origin: CellAddress,
    target: CellAddress,
) -> Option<MoveEvent<T>> {
    if origin == target {
        return None;
    }
    let Some(from_index) = items.iter().position(|item| item.id == *dragged) else {
        log::warn!("Dragged item {} is gone from the list, dropping the move", dragged);
        return None;
    };

    let anchor = resolve_anchor(items, dragged, target);
    let mut moved = items.remove(from_index);
    let insert_at = match &anchor {
        Anchor::After(id) => items.iter().position(|item| item.id == *id).map(|i| i + 1),
        Anchor::Before(id) => items.iter().position(|item| item.id == *id),
        Anchor::Start => Some(0),
    }
    .unwrap_or(0);

    moved.section = target.section;
    moved.column = target.column;
    items.insert(insert_at, moved);

    let bucket: Vec<&Item<T>> = items
        .iter()
        .filter(|item| item.is_in(target.section, target.column))
        .collect();
    let position = bucket.iter().position(|item| item.id == *dragged)?;
    let item_before = position
        .checked_sub(1)
        .and_then(|i| bucket.get(i))
        .map(|item| item.data.clone());
    let item_after = bucket.get(position + 1).map(|item| item.data.clone());

    log::info!(
        "Moved {} from {:?} to {:?} (list index {} -> {})",
        dragged,
        origin,
        target,
        from_index,
        insert_at
    );

    Some(MoveEvent {
        id: dragged.clone(),
        item: bucket[position].data.clone(),
        from: origin,
        to: target,
        item_before,
        item_after,
    })
}
