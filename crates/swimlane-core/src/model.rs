//! Board data model and the grid projection.
//!
//! The board is a flat, ordered list of items tagged with a section and a
//! column. [`GridModel::project`] turns that list into the matrix the board
//! renders from: one bucket per `(section, column)` holding the matching
//! items in list order. The matrix is a pure projection and is rebuilt
//! whenever the data or the sections change.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Stable identity of an item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Fresh random id for items that carry no key of their own.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Id derived from a consumer-supplied key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An item as supplied by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput<T> {
    /// Optional stable key; items without one get a generated id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub column: usize,
    pub section: usize,
    pub data: T,
}

impl<T> ItemInput<T> {
    pub fn new(column: usize, section: usize, data: T) -> Self {
        Self {
            key: None,
            column,
            section,
            data,
        }
    }

    /// Attach a stable key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// An item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    pub id: ItemId,
    pub column: usize,
    pub section: usize,
    pub data: T,
}

impl<T> Item<T> {
    /// Whether the item lives in the given `(section, column)` bucket.
    pub fn is_in(&self, section: usize, column: usize) -> bool {
        self.section == section && self.column == column
    }
}

/// Turn consumer input into board items.
///
/// Keyed inputs keep their key as id, so identities survive a data refresh.
/// Unkeyed inputs and duplicate keys get a generated id.
pub fn ingest<T>(inputs: Vec<ItemInput<T>>) -> Vec<Item<T>> {
    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .map(|input| {
            let id = match input.key {
                Some(key) if seen.insert(key.clone()) => ItemId::from_key(key),
                Some(key) => {
                    log::warn!("Duplicate item key `{}`, assigning a generated id", key);
                    ItemId::generate()
                }
                None => ItemId::generate(),
            };
            Item {
                id,
                column: input.column,
                section: input.section,
                data: input.data,
            }
        })
        .collect()
}

/// A board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub index: usize,
    pub title: String,
    /// Disabled columns render normally but never accept drops.
    #[serde(default)]
    pub disabled: bool,
}

impl Column {
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            disabled: false,
        }
    }
}

/// A collapsible group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    pub title: String,
    #[serde(default)]
    pub expanded: bool,
}

impl Section {
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            expanded: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// Address of a single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    pub section: usize,
    pub column: usize,
    pub row: usize,
}

impl CellAddress {
    pub fn new(section: usize, column: usize, row: usize) -> Self {
        Self {
            section,
            column,
            row,
        }
    }
}

/// A materialized row: one optional item per column.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow<T> {
    pub section: usize,
    pub row: usize,
    pub items: Vec<Option<Item<T>>>,
}

/// A section of the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSection<T> {
    pub index: usize,
    pub title: String,
    pub expanded: bool,
    /// `buckets[column]` holds the items of this section in that column.
    pub buckets: Vec<Vec<Item<T>>>,
    /// Materialized rows; empty when collapsed.
    pub rows: Vec<GridRow<T>>,
}

impl<T> GridSection<T> {
    /// Population of the fullest column.
    pub fn max_bucket_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// The projected board matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel<T> {
    pub sections: Vec<GridSection<T>>,
    pub column_count: usize,
}

impl<T: Clone> GridModel<T> {
    /// Project a flat item list onto sections and columns.
    ///
    /// Items whose section or column is out of range are left out of the
    /// matrix but stay in the list.
    pub fn project(
        items: &[Item<T>],
        columns: &[Column],
        sections: &[Section],
        empty_rows: usize,
    ) -> Self {
        let column_count = columns.len();
        let sections = sections
            .iter()
            .enumerate()
            .map(|(section_index, section)| {
                let buckets: Vec<Vec<Item<T>>> = (0..column_count)
                    .map(|column_index| {
                        items
                            .iter()
                            .filter(|item| item.is_in(section_index, column_index))
                            .cloned()
                            .collect()
                    })
                    .collect();

                let row_count = section_row_count(&buckets, section.expanded, empty_rows);
                let rows = (0..row_count)
                    .map(|row| GridRow {
                        section: section_index,
                        row,
                        items: buckets.iter().map(|bucket| bucket.get(row).cloned()).collect(),
                    })
                    .collect();

                GridSection {
                    index: section_index,
                    title: section.title.clone(),
                    expanded: section.expanded,
                    buckets,
                    rows,
                }
            })
            .collect();

        Self {
            sections,
            column_count,
        }
    }
}

impl<T> GridModel<T> {
    /// The bucket for `(section, column)`, if in range.
    pub fn bucket(&self, section: usize, column: usize) -> Option<&[Item<T>]> {
        self.sections
            .get(section)
            .and_then(|s| s.buckets.get(column))
            .map(Vec::as_slice)
    }

    /// The item at a cell, if the cell is populated.
    pub fn item_at(&self, cell: CellAddress) -> Option<&Item<T>> {
        self.bucket(cell.section, cell.column)
            .and_then(|bucket| bucket.get(cell.row))
    }

    /// Whether `(section, row)` is currently materialized.
    pub fn has_row(&self, section: usize, row: usize) -> bool {
        self.sections
            .get(section)
            .is_some_and(|s| row < s.rows.len())
    }

    /// Number of materialized rows in a section.
    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.rows.len())
    }

    /// Whether there is nothing to drag or drop on.
    pub fn is_empty(&self) -> bool {
        self.column_count == 0 || self.sections.iter().all(|s| s.rows.is_empty())
    }
}

/// Rows a section materializes.
///
/// An expanded section always has at least one row, plus the trailing
/// empty rows. A collapsed section has none.
pub fn section_row_count<T>(buckets: &[Vec<T>], expanded: bool, empty_rows: usize) -> usize {
    if !expanded {
        return 0;
    }
    let max_rows = buckets.iter().map(Vec::len).max().unwrap_or(0);
    max_rows.max(1) + empty_rows
}
