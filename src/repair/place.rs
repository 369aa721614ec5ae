use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{rewrite_field, RepairStep};
use crate::tables::Dataset;

/// One-edit misspellings of "new york": transpositions, deletions, then substitutions.
static NEW_YORK_TYPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"enw york|nwe york|ne wyork|newy ork|new yrok|new yokr",
        r"|\bew york|nw york|ne york|newyork|new ork|new yrk|new yok|new yor\b",
        r"|[^n]ew york|n[^e]w york|ne[^w] york|new[^ ]york|new [^y]ork|new y[^o]rk|new yo[^r]k|new yor[^k]",
    ))
    .unwrap()
});

/// Replace misspelled "new york" inside `Menu.place` with `NEW YORK`.
pub struct NewYorkSpelling;

impl RepairStep for NewYorkSpelling {
    fn name(&self) -> &'static str {
        "new_york_spelling"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let fixed = data
            .menus
            .rows_mut()
            .iter_mut()
            .map(|m| rewrite_field(&mut m.place, |p| NEW_YORK_TYPO.replace_all(p, "NEW YORK")))
            .filter(|&changed| changed)
            .count();
        debug!(fixed, "place spellings fixed");
        fixed
    }
}
