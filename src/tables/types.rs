// src/tables/types.rs

use serde::{Deserialize, Serialize};

pub type MenuId = i64;
pub type PageId = i64;
pub type DishId = i64;

/// One physical menu. Only the columns the cleaning run touches are kept.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Menu {
    pub id: MenuId,
    pub date: Option<String>,
    pub place: Option<String>,
    pub currency: Option<String>,
    pub call_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Page {
    pub id: PageId,
    pub menu_id: Option<MenuId>,
}

/// A priced listing of a dish on a page. `price` is `None` when unknown, never zero.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Item {
    pub menu_page_id: Option<PageId>,
    pub dish_id: Option<DishId>,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Dish {
    pub id: DishId,
    pub name: Option<String>,
}

/// Rows that can be looked up by primary key.
pub trait Keyed {
    fn key(&self) -> Option<i64>;
}

impl Keyed for Menu {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Keyed for Page {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Keyed for Dish {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

// Items are only ever reached through their page, never by key.
impl Keyed for Item {
    fn key(&self) -> Option<i64> {
        None
    }
}
