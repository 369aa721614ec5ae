use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

use super::{rewrite_field, RepairStep};
use crate::tables::Dataset;

static YEAR_PREFIXED_CALL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-").unwrap());

/// Known transcription errors at the start of a date, seen while exploring the data.
const DATE_TYPOS: [(&str, &str); 3] = [("0190", "1900"), ("1091", "1901"), ("2928", "1928")];

/// Fill a missing date from a call number shaped like `YYYY-...`.
pub struct DateFromCallNumber;

impl RepairStep for DateFromCallNumber {
    fn name(&self) -> &'static str {
        "date_from_call_number"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let mut filled = 0;
        for m in data.menus.rows_mut() {
            if m.date.is_some() {
                continue;
            }
            let Some(call) = m.call_number.as_deref() else {
                continue;
            };
            if YEAR_PREFIXED_CALL_NUMBER.is_match(call) {
                m.date = Some(call[..4].to_string());
                filled += 1;
            }
        }
        debug!(filled, "dates backfilled from call numbers");
        filled
    }
}

/// Rewrite the three out-of-range year prefixes listed in `DATE_TYPOS`.
pub struct DateTypos;

fn fix_date_typos(date: &str) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(date);
    for (typo, year) in DATE_TYPOS {
        if let Some(rest) = out.strip_prefix(typo) {
            out = Cow::Owned(format!("{year}{rest}"));
        }
    }
    out
}

impl RepairStep for DateTypos {
    fn name(&self) -> &'static str {
        "date_typos"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let fixed = data
            .menus
            .rows_mut()
            .iter_mut()
            .map(|m| rewrite_field(&mut m.date, fix_date_typos))
            .filter(|&changed| changed)
            .count();
        debug!(fixed, "date typos fixed");
        fixed
    }
}
