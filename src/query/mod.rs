// src/query/mod.rs

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

use crate::classify::{is_cup_of_coffee, is_in_year_range, is_new_york, YearRange};
use crate::tables::{Dataset, DishId, Menu, MenuId};

pub mod date_parser;

use date_parser::parse_year;

/// Exact currency a menu must carry; misspellings are only accepted after repair.
const DOLLARS: &str = "Dollars";

/// "What did a cup of coffee cost in New York?"
///
/// Joins Item → Page → Menu and Item → Dish and keeps rows where the dish is a cup of
/// coffee, the menu is from New York and priced in `Dollars`, optionally dated within
/// `years`, and the item price is below `price_ceiling`. A null in any filtered column
/// excludes the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoffeeQuery {
    pub years: Option<YearRange>,
    pub price_ceiling: f64,
}

impl Default for CoffeeQuery {
    fn default() -> Self {
        Self {
            years: None,
            price_ceiling: 1.0,
        }
    }
}

/// One matching item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub menu_id: MenuId,
    /// `None` when the menu date could not be parsed.
    pub year: Option<i32>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

impl CoffeeQuery {
    pub fn for_years(years: YearRange) -> Self {
        Self {
            years: Some(years),
            ..Self::default()
        }
    }

    fn menu_matches(&self, m: &Menu) -> bool {
        let place_ok = m.place.as_deref().is_some_and(is_new_york);
        let currency_ok = m.currency.as_deref() == Some(DOLLARS);
        let date_ok = match self.years {
            None => true,
            Some(range) => m.date.as_deref().is_some_and(|d| is_in_year_range(d, range)),
        };
        place_ok && currency_ok && date_ok
    }

    #[instrument(level = "info", skip_all, fields(items = data.items.len(), years = ?self.years))]
    pub fn run(&self, data: &Dataset) -> Vec<PriceRow> {
        let coffee: HashSet<DishId> = data
            .dishes
            .rows()
            .par_iter()
            .filter(|d| d.name.as_deref().is_some_and(is_cup_of_coffee))
            .map(|d| d.id)
            .collect();

        let matching: Vec<(MenuId, Option<i32>)> = data
            .menus
            .rows()
            .par_iter()
            .filter(|m| self.menu_matches(m))
            .map(|m| (m.id, m.date.as_deref().and_then(parse_year)))
            .collect();
        // Duplicate ids keep every row, as an inner join would.
        let mut menus: HashMap<MenuId, Vec<Option<i32>>> = HashMap::new();
        for (id, year) in matching {
            menus.entry(id).or_default().push(year);
        }
        let pages = data.pages.group_by(|p| Some(p.id));

        debug!(coffee_dishes = coffee.len(), menus = menus.len(), "join inputs filtered");

        let mut rows = Vec::new();
        for item in data.items.rows() {
            let Some(price) = item.price.filter(|p| *p < self.price_ceiling) else {
                continue;
            };
            if !item.dish_id.is_some_and(|id| coffee.contains(&id)) {
                continue;
            }
            let Some(page_rows) = item.menu_page_id.and_then(|id| pages.get(&id)) else {
                continue;
            };
            for &pos in page_rows {
                let Some(menu_id) = data.pages.rows()[pos].menu_id else {
                    continue;
                };
                for &year in menus.get(&menu_id).into_iter().flatten() {
                    rows.push(PriceRow { menu_id, year, price });
                }
            }
        }

        debug!(matched = rows.len(), "query done");
        rows
    }
}

pub fn prices(rows: &[PriceRow]) -> Vec<f64> {
    rows.iter().map(|r| r.price).collect()
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Mean and median price per year, ascending by year. Rows without a year are left out.
pub fn summarize_by_year(rows: &[PriceRow]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in rows {
        if let Some(year) = r.year {
            by_year.entry(year).or_default().push(r.price);
        }
    }

    by_year
        .into_iter()
        .map(|(year, mut ps)| {
            ps.sort_by(f64::total_cmp);
            let count = ps.len();
            YearSummary {
                year,
                count,
                mean: ps.iter().sum::<f64>() / count as f64,
                median: median(&ps),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::Pipeline;
    use crate::tables::{Dish, Item, Page};

    fn menu(id: i64, date: Option<&str>, place: Option<&str>, currency: Option<&str>) -> Menu {
        Menu {
            id,
            date: date.map(String::from),
            place: place.map(String::from),
            currency: currency.map(String::from),
            call_number: None,
        }
    }

    fn item(page: Option<i64>, dish: Option<i64>, price: Option<f64>) -> Item {
        Item {
            menu_page_id: page,
            dish_id: dish,
            price,
        }
    }

    /// Pages are numbered menu id * 10; dish 1 is coffee, dish 2 is not, dish 3 is misspelled.
    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                menu(1, Some("1900-04-15"), Some("New York"), Some("Dollars")),
                menu(2, Some("1905"), Some("Albany, NY"), Some("Dollars")),
                menu(3, Some("1900-01-01"), Some("Boston"), Some("Dollars")),
                menu(4, Some("1901-01-01"), Some("NYC"), Some("Cents")),
                menu(5, Some("1920-01-01"), Some("N.Y."), Some("Dollars")),
                menu(6, Some("circa 1900"), Some("New York"), Some("Dollars")),
                menu(7, Some("1902"), None, Some("Dollars")),
                menu(8, Some("1903"), Some("Nwe York"), Some("Dolalrs")),
            ],
            (1..=8).map(|m| Page { id: m * 10, menu_id: Some(m) }).collect(),
            vec![
                item(Some(10), Some(1), Some(0.10)),
                item(Some(10), Some(1), Some(0.20)),
                item(Some(10), Some(1), Some(1.00)),
                item(Some(10), Some(1), None),
                item(Some(10), Some(2), Some(0.05)),
                item(Some(20), Some(1), Some(0.05)),
                item(Some(30), Some(1), Some(0.05)),
                item(Some(40), Some(1), Some(5.0)),
                item(Some(50), Some(1), Some(0.15)),
                item(Some(60), Some(1), Some(0.07)),
                item(Some(70), Some(1), Some(0.05)),
                item(Some(80), Some(3), Some(0.08)),
                item(Some(99), Some(1), Some(0.05)),
                item(None, Some(1), Some(0.05)),
                item(Some(10), Some(42), Some(0.05)),
            ],
            vec![
                Dish { id: 1, name: Some("Coffee".into()) },
                Dish { id: 2, name: Some("Coffee cake".into()) },
                Dish { id: 3, name: Some("Cup of Cofee".into()) },
            ],
        )
    }

    #[test]
    fn test_all_years() {
        let rows = CoffeeQuery::default().run(&dataset());
        assert_eq!(prices(&rows), vec![0.10, 0.20, 0.05, 0.15, 0.07]);
        let years: Vec<Option<i32>> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![Some(1900), Some(1900), Some(1905), Some(1920), None]);
    }

    #[test]
    fn test_target_decade() {
        let rows = CoffeeQuery::for_years(YearRange::default()).run(&dataset());
        assert_eq!(prices(&rows), vec![0.10, 0.20, 0.05]);
    }

    #[test]
    fn test_repair_changes_the_answer() {
        let mut data = dataset();
        let query = CoffeeQuery::for_years(YearRange::default());
        let dirty = query.run(&data);

        Pipeline::standard().run(&mut data);
        let clean = query.run(&data);

        // menu 4 is now in dollars (5.0 -> 0.05), menu 8 has a readable place,
        // currency and dish name
        assert_eq!(prices(&dirty), vec![0.10, 0.20, 0.05]);
        assert_eq!(prices(&clean), vec![0.10, 0.20, 0.05, 0.05, 0.08]);
    }

    #[test]
    fn test_duplicate_keys_join_every_row() {
        let data = Dataset::new(
            vec![
                menu(1, Some("1900"), Some("New York"), Some("Dollars")),
                menu(1, Some("1905"), Some("New York"), Some("Dollars")),
                menu(2, Some("1901"), Some("NYC"), Some("Dollars")),
            ],
            vec![Page { id: 10, menu_id: Some(1) }, Page { id: 10, menu_id: Some(2) }],
            vec![item(Some(10), Some(1), Some(0.10))],
            vec![Dish { id: 1, name: Some("Coffee".into()) }],
        );
        let rows = CoffeeQuery::default().run(&data);
        let got: Vec<(MenuId, Option<i32>)> = rows.iter().map(|r| (r.menu_id, r.year)).collect();
        assert_eq!(got, vec![(1, Some(1900)), (1, Some(1905)), (2, Some(1901))]);
    }

    #[test]
    fn test_empty_join() {
        let rows = CoffeeQuery::default().run(&Dataset::default());
        assert!(rows.is_empty());
        assert!(summarize_by_year(&rows).is_empty());
    }

    #[test]
    fn test_summarize_by_year() {
        let rows = vec![
            PriceRow { menu_id: 1, year: Some(1905), price: 0.10 },
            PriceRow { menu_id: 1, year: Some(1900), price: 0.30 },
            PriceRow { menu_id: 2, year: Some(1900), price: 0.10 },
            PriceRow { menu_id: 3, year: Some(1900), price: 0.20 },
            PriceRow { menu_id: 3, year: Some(1905), price: 0.20 },
            PriceRow { menu_id: 4, year: None, price: 0.90 },
        ];
        let summary = summarize_by_year(&rows);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].year, 1900);
        assert_eq!(summary[0].count, 3);
        assert!((summary[0].mean - 0.2).abs() < 1e-12);
        assert_eq!(summary[0].median, 0.20);

        assert_eq!(summary[1].year, 1905);
        assert_eq!(summary[1].count, 2);
        assert!((summary[1].mean - 0.15).abs() < 1e-12);
        assert!((summary[1].median - 0.15).abs() < 1e-12);
    }
}
