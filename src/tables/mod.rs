pub mod store;
pub mod types;

pub use store::{Dataset, SkippedRows, Table};
pub use types::{Dish, DishId, Item, Keyed, Menu, MenuId, Page, PageId};
