// src/profile/mod.rs

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::classify::{
    classify, is_cup_of_coffee, is_dollars, is_in_year_range, is_new_york, Classification,
    YearRange,
};
use crate::query::date_parser::parse_year;
use crate::tables::{Dish, Menu};

const NEW_YORK: usize = 0b001;
const IN_RANGE: usize = 0b010;
const DOLLARS: usize = 0b100;

/// Menu counts for every combination of (New York, in year range, Dollars).
///
/// `counts[mask]` holds the rows whose matching axes are the bits of `mask`
/// (1 = New York, 2 = in range, 4 = Dollars), so the eight buckets always sum to
/// the number of rows profiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuProfile {
    pub counts: [usize; 8],
}

impl MenuProfile {
    /// The seven non-empty overlap regions in three-set diagram order:
    /// NY, Date, NY+Date, Dollars, NY+Dollars, Date+Dollars, all three.
    pub fn venn_subsets(&self) -> [usize; 7] {
        let mut out = [0; 7];
        out.copy_from_slice(&self.counts[1..]);
        out
    }

    /// Rows that matched none of the three axes.
    pub fn unmatched(&self) -> usize {
        self.counts[0]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Target / other / missing breakdown of one classified column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeProfile {
    pub target: usize,
    pub other: usize,
    pub missing: usize,
}

impl AttributeProfile {
    fn record(&mut self, c: Classification) {
        match c {
            Classification::Match => self.target += 1,
            Classification::Other => self.other += 1,
            Classification::Missing => self.missing += 1,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.target += other.target;
        self.other += other.other;
        self.missing += other.missing;
        self
    }

    pub fn total(&self) -> usize {
        self.target + self.other + self.missing
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAttributes {
    pub place: AttributeProfile,
    pub date: AttributeProfile,
    pub currency: AttributeProfile,
}

/// The three classifications of one menu row.
fn classify_menu(m: &Menu, years: YearRange) -> [Classification; 3] {
    [
        classify(m.place.as_deref(), is_new_york),
        classify(m.date.as_deref(), |d| is_in_year_range(d, years)),
        classify(m.currency.as_deref(), is_dollars),
    ]
}

#[instrument(level = "info", skip(menus), fields(rows = menus.len()))]
pub fn profile_menus(menus: &[Menu], years: YearRange) -> MenuProfile {
    let counts = menus
        .par_iter()
        .map(|m| {
            let [place, date, currency] = classify_menu(m, years);
            let mut mask = 0;
            if place.is_match() {
                mask |= NEW_YORK;
            }
            if date.is_match() {
                mask |= IN_RANGE;
            }
            if currency.is_match() {
                mask |= DOLLARS;
            }
            mask
        })
        .fold(
            || [0usize; 8],
            |mut acc, mask| {
                acc[mask] += 1;
                acc
            },
        )
        .reduce(
            || [0usize; 8],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    let profile = MenuProfile { counts };
    debug!(subsets = ?profile.venn_subsets(), unmatched = profile.unmatched(), "menu profile");
    profile
}

#[instrument(level = "info", skip(menus), fields(rows = menus.len()))]
pub fn profile_menu_attributes(menus: &[Menu], years: YearRange) -> MenuAttributes {
    menus
        .par_iter()
        .map(|m| {
            let [place, date, currency] = classify_menu(m, years);
            let mut attrs = MenuAttributes::default();
            attrs.place.record(place);
            attrs.date.record(date);
            attrs.currency.record(currency);
            attrs
        })
        .reduce(MenuAttributes::default, |a, b| MenuAttributes {
            place: a.place.merge(b.place),
            date: a.date.merge(b.date),
            currency: a.currency.merge(b.currency),
        })
}

/// Number of dishes whose name is a cup of coffee.
#[instrument(level = "info", skip(dishes), fields(rows = dishes.len()))]
pub fn profile_dishes(dishes: &[Dish]) -> usize {
    dishes
        .par_iter()
        .filter(|d| classify(d.name.as_deref(), is_cup_of_coffee).is_match())
        .count()
}

/// Menus per decade, keyed by the decade's first year. Unparseable dates are skipped.
pub fn decade_histogram(menus: &[Menu]) -> BTreeMap<i32, usize> {
    let mut hist = BTreeMap::new();
    for year in menus.iter().filter_map(|m| m.date.as_deref().and_then(parse_year)) {
        *hist.entry(year - year.rem_euclid(10)).or_insert(0) += 1;
    }
    hist
}
