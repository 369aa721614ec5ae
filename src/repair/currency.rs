use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};

use super::RepairStep;
use crate::tables::{Dataset, MenuId, PageId};

/// One-edit misspellings of "dollars", whole value only.
static DOLLARS_TYPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:",
        r"odllars|dlolars|dolalrs|dollras|dollasr",
        r"|ollars|dllars|dolars|dollrs|dollas|dollar",
        r"|[^d]ollars|d[^o]llars|do[^l]lars|dol[^l]ars|doll[^a]rs|dolla[^r]s|dollar[^s]",
        r")$",
    ))
    .unwrap()
});

const CENTS: &str = "Cents";
const DOLLARS: &str = "Dollars";

/// Replace a currency that is a misspelling of "dollars" with `Dollars`.
pub struct DollarsSpelling;

impl RepairStep for DollarsSpelling {
    fn name(&self) -> &'static str {
        "dollars_spelling"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let mut fixed = 0;
        for m in data.menus.rows_mut() {
            if m.currency.as_deref().is_some_and(|c| DOLLARS_TYPO.is_match(c)) {
                m.currency = Some(DOLLARS.to_string());
                fixed += 1;
            }
        }
        debug!(fixed, "currency spellings fixed");
        fixed
    }
}

/// Turn menus priced in `Cents` into `Dollars` and divide their item prices by 100.
///
/// The affected menu and page ids are collected in full before any price is touched,
/// so each item is rescaled at most once. Only the exact value `Cents` qualifies.
pub struct CentsToDollars;

impl RepairStep for CentsToDollars {
    fn name(&self) -> &'static str {
        "cents_to_dollars"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let mut menu_ids: HashSet<MenuId> = HashSet::new();
        for m in data.menus.rows_mut() {
            if m.currency.as_deref() == Some(CENTS) {
                m.currency = Some(DOLLARS.to_string());
                menu_ids.insert(m.id);
            }
        }
        if menu_ids.is_empty() {
            return 0;
        }

        let pages_by_menu = data.pages.group_by(|p| p.menu_id);
        let page_ids: HashSet<PageId> = menu_ids
            .iter()
            .filter_map(|id| pages_by_menu.get(id))
            .flatten()
            .map(|&pos| data.pages.rows()[pos].id)
            .collect();

        let items_by_page = data.items.group_by(|i| i.menu_page_id);
        let item_rows: Vec<usize> = page_ids
            .iter()
            .filter_map(|id| items_by_page.get(id))
            .flatten()
            .copied()
            .collect();

        let items = data.items.rows_mut();
        let mut rescaled = 0;
        for pos in item_rows {
            if let Some(price) = items[pos].price.as_mut() {
                *price /= 100.0;
                rescaled += 1;
            }
        }

        info!(menus = menu_ids.len(), pages = page_ids.len(), rescaled, "converted cents to dollars");
        menu_ids.len() + rescaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Item, Menu, Page};

    fn currencies(values: &[&str]) -> Dataset {
        let menus = values
            .iter()
            .enumerate()
            .map(|(i, c)| Menu { id: i as i64, currency: Some(c.to_string()), ..Default::default() })
            .collect();
        Dataset::new(menus, vec![], vec![], vec![])
    }

    #[test]
    fn test_dollars_spelling() {
        let mut data = currencies(&["Doller", "Dollers", "Dollar", "Dolalrs", "dollars", "Canadian Dollars", "Dollars and Cents"]);
        assert_eq!(DollarsSpelling.apply(&mut data), 3);
        let got: Vec<&str> = data.menus.rows().iter().filter_map(|m| m.currency.as_deref()).collect();
        assert_eq!(
            got,
            vec!["Doller", "Dollars", "Dollars", "Dollars", "dollars", "Canadian Dollars", "Dollars and Cents"]
        );
    }

    #[test]
    fn test_cents_to_dollars() {
        let mut data = Dataset::new(
            vec![Menu { id: 1, currency: Some("Cents".into()), ..Default::default() }],
            vec![Page { id: 2, menu_id: Some(1) }],
            vec![Item { menu_page_id: Some(2), dish_id: None, price: Some(10.0) }],
            vec![],
        );

        assert_eq!(CentsToDollars.apply(&mut data), 2);
        assert_eq!(data.menus.rows()[0].currency.as_deref(), Some("Dollars"));
        assert_eq!(data.items.rows()[0].price, Some(0.1));
    }

    #[test]
    fn test_cents_only_rescales_owned_items() {
        let mut data = Dataset::new(
            vec![
                Menu { id: 1, currency: Some("Cents".into()), ..Default::default() },
                Menu { id: 2, currency: Some("Dollars".into()), ..Default::default() },
                Menu { id: 3, currency: Some("cents".into()), ..Default::default() },
            ],
            vec![
                Page { id: 10, menu_id: Some(1) },
                Page { id: 11, menu_id: Some(1) },
                Page { id: 20, menu_id: Some(2) },
                Page { id: 30, menu_id: Some(3) },
                Page { id: 40, menu_id: None },
            ],
            vec![
                Item { menu_page_id: Some(10), dish_id: None, price: Some(50.0) },
                Item { menu_page_id: Some(11), dish_id: None, price: Some(25.0) },
                Item { menu_page_id: Some(11), dish_id: None, price: None },
                Item { menu_page_id: Some(20), dish_id: None, price: Some(0.5) },
                Item { menu_page_id: Some(30), dish_id: None, price: Some(40.0) },
                Item { menu_page_id: Some(40), dish_id: None, price: Some(3.0) },
                Item { menu_page_id: Some(77), dish_id: None, price: Some(9.0) },
            ],
            vec![],
        );

        assert_eq!(CentsToDollars.apply(&mut data), 3);

        let currencies: Vec<Option<&str>> = data.menus.rows().iter().map(|m| m.currency.as_deref()).collect();
        assert_eq!(currencies, vec![Some("Dollars"), Some("Dollars"), Some("cents")]);

        let prices: Vec<Option<f64>> = data.items.rows().iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![Some(0.5), Some(0.25), None, Some(0.5), Some(40.0), Some(3.0), Some(9.0)]);
    }

    #[test]
    fn test_cents_runs_once() {
        let mut data = Dataset::new(
            vec![Menu { id: 1, currency: Some("Cents".into()), ..Default::default() }],
            vec![Page { id: 2, menu_id: Some(1) }],
            vec![Item { menu_page_id: Some(2), dish_id: None, price: Some(10.0) }],
            vec![],
        );
        CentsToDollars.apply(&mut data);
        assert_eq!(CentsToDollars.apply(&mut data), 0);
        assert_eq!(data.items.rows()[0].price, Some(0.1));
    }
}
