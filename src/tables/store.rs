// src/tables/store.rs

use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};
use tracing::warn;

use super::types::{Dish, Item, Keyed, Menu, Page};

/// Rows of one entity plus a primary-key → row-position index.
///
/// The index is built once from the rows handed to `new`. Repairs only ever rewrite
/// text and price fields, so keys never move after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    rows: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T: Keyed> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (pos, row) in rows.iter().enumerate() {
            let Some(key) = row.key() else { continue };
            match index.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
                Entry::Occupied(first) => {
                    warn!(key, first = *first.get(), duplicate = pos, "duplicate primary key; keeping first row");
                }
            }
        }
        Self { rows, index }
    }

    pub fn get(&self, key: i64) -> Option<&T> {
        self.index.get(&key).map(|&pos| &self.rows[pos])
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Mutable access to the values of each row. Keys must not be rewritten through this.
    pub fn rows_mut(&mut self) -> &mut [T] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Group row positions by a foreign key. Rows whose key is `None` are left out.
    pub fn group_by<F>(&self, fk: F) -> HashMap<i64, Vec<usize>>
    where
        F: Fn(&T) -> Option<i64>,
    {
        let mut groups: HashMap<i64, Vec<usize>> = HashMap::new();
        for (pos, row) in self.rows.iter().enumerate() {
            if let Some(k) = fk(row) {
                groups.entry(k).or_default().push(pos);
            }
        }
        groups
    }
}

impl<T: Keyed> Default for Table<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Keyed> From<Vec<T>> for Table<T> {
    fn from(rows: Vec<T>) -> Self {
        Self::new(rows)
    }
}

/// Source rows dropped at load because their primary key was not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRows {
    pub menus: usize,
    pub pages: usize,
    pub dishes: usize,
}

/// The four menu tables, owned together for one cleaning run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub menus: Table<Menu>,
    pub pages: Table<Page>,
    pub items: Table<Item>,
    pub dishes: Table<Dish>,
    pub skipped: SkippedRows,
}

impl Dataset {
    pub fn new(menus: Vec<Menu>, pages: Vec<Page>, items: Vec<Item>, dishes: Vec<Dish>) -> Self {
        Self {
            menus: Table::new(menus),
            pages: Table::new(pages),
            items: Table::new(items),
            dishes: Table::new(dishes),
            skipped: SkippedRows::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: i64, menu_id: Option<i64>) -> Page {
        Page { id, menu_id }
    }

    #[test]
    fn test_lookup_by_key() {
        let pages = Table::new(vec![page(10, Some(1)), page(11, Some(1)), page(12, Some(2))]);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.get(11).and_then(|p| p.menu_id), Some(1));
        assert!(pages.get(99).is_none());
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let pages = Table::new(vec![page(10, Some(1)), page(10, Some(2))]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.get(10).and_then(|p| p.menu_id), Some(1));
    }

    #[test]
    fn test_group_by_skips_null_foreign_keys() {
        let pages = Table::new(vec![page(10, Some(1)), page(11, None), page(12, Some(1))]);
        let by_menu = pages.group_by(|p| p.menu_id);
        assert_eq!(by_menu.len(), 1);
        assert_eq!(by_menu[&1], vec![0, 2]);
    }

    #[test]
    fn test_items_are_not_indexed() {
        let items = Table::new(vec![Item::default(), Item::default()]);
        assert_eq!(items.len(), 2);
        assert!(items.get(0).is_none());
    }
}
