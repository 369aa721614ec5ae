// src/classify/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static NEW_YORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:new york|new yorkers?|N\.?Y\.?C?\.?)\b").unwrap());

static LEADING_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{4})").unwrap());

static DOLLARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^dollars$").unwrap());

static PLAIN_COFFEE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:black )?coffee$").unwrap());
static COFFEE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcoffee\b").unwrap());
static VESSEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:cup|mug|glass|demi[- ]tasse|goblet)\b").unwrap());
static BULK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:pot|pitcher|jug|pound|lb|machine|for two|all you)\b").unwrap()
});
static MODIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:iced?|cream|milk|cocktail)\b").unwrap());

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(1900, 1909)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Mentions New York, N.Y., NYC or New Yorker(s) as a whole token anywhere in the text.
pub fn is_new_york(text: &str) -> bool {
    NEW_YORK.is_match(text)
}

/// The text starts with a four-digit year inside `range`.
/// "1905-06-01" matches, "12/05/1905" does not.
pub fn is_in_year_range(text: &str, range: YearRange) -> bool {
    LEADING_YEAR
        .captures(text)
        .and_then(|c| c[1].parse::<i32>().ok())
        .is_some_and(|year| range.contains(year))
}

/// Exactly "dollars", any case.
pub fn is_dollars(text: &str) -> bool {
    DOLLARS.is_match(text)
}

/// A single serving of hot coffee.
///
/// Plain "coffee" and "black coffee" always qualify. Anything else must name coffee
/// together with a serving vessel, and must not mention a bulk quantity or a
/// preparation that changes the drink (iced, with cream, ...).
pub fn is_cup_of_coffee(text: &str) -> bool {
    if PLAIN_COFFEE.is_match(text) {
        return true;
    }
    COFFEE_WORD.is_match(text)
        && VESSEL.is_match(text)
        && !BULK.is_match(text)
        && !MODIFIER.is_match(text)
}

/// Tri-state outcome of classifying a nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Match,
    Other,
    Missing,
}

impl Classification {
    pub fn is_match(self) -> bool {
        self == Classification::Match
    }
}

/// Classify a nullable value. An absent value is never handed to the predicate.
pub fn classify<F>(value: Option<&str>, predicate: F) -> Classification
where
    F: Fn(&str) -> bool,
{
    match value {
        None => Classification::Missing,
        Some(v) if predicate(v) => Classification::Match,
        Some(_) => Classification::Other,
    }
}
