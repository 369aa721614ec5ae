use std::borrow::Cow;
use tracing::debug;

use super::{rewrite_field, RepairStep};
use crate::tables::Dataset;

/// Strip leading/trailing whitespace from every free-text field the later steps match on.
///
/// Prices are trimmed before numeric coercion in `load`, so they are already clean here.
pub struct TrimWhitespace;

fn trim(s: &str) -> Cow<'_, str> {
    let t = s.trim();
    if t.len() == s.len() {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(t.to_string())
    }
}

impl RepairStep for TrimWhitespace {
    fn name(&self) -> &'static str {
        "trim_whitespace"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let mut menu_changes = 0;
        for m in data.menus.rows_mut() {
            for field in [&mut m.date, &mut m.call_number, &mut m.place, &mut m.currency] {
                if rewrite_field(field, trim) {
                    menu_changes += 1;
                }
            }
        }

        let mut dish_changes = 0;
        for d in data.dishes.rows_mut() {
            if rewrite_field(&mut d.name, trim) {
                dish_changes += 1;
            }
        }

        debug!(menu_changes, dish_changes, "trimmed");
        menu_changes + dish_changes
    }
}
