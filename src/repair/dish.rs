use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{rewrite_field, RepairStep};
use crate::tables::Dataset;

// The first-letter substitution skips `t` so "toffee" survives.
static COFFEE_TYPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"ocffee|cfofee|cofefe",
        r"|offee|cffee|cofee|coffe",
        r"|[^ct]offee|c[^o]ffee|co[^f]fee|cof[^f]ee|coff[^e]e|coffe[^e]",
        r")\b",
    ))
    .unwrap()
});

/// Replace misspelled "coffee" words inside `Dish.name` with `Coffee`.
pub struct CoffeeSpelling;

impl RepairStep for CoffeeSpelling {
    fn name(&self) -> &'static str {
        "coffee_spelling"
    }

    fn apply(&self, data: &mut Dataset) -> usize {
        let fixed = data
            .dishes
            .rows_mut()
            .iter_mut()
            .map(|d| rewrite_field(&mut d.name, |n| COFFEE_TYPO.replace_all(n, "Coffee")))
            .filter(|&changed| changed)
            .count();
        debug!(fixed, "dish spellings fixed");
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Dish;

    fn run(names: &[&str]) -> Vec<String> {
        let dishes = names
            .iter()
            .enumerate()
            .map(|(i, n)| Dish { id: i as i64, name: Some(n.to_string()) })
            .collect();
        let mut data = Dataset::new(vec![], vec![], vec![], dishes);
        CoffeeSpelling.apply(&mut data);
        data.dishes.rows().iter().filter_map(|d| d.name.clone()).collect()
    }

    #[test]
    fn test_coffee_typos() {
        assert_eq!(
            run(&["Caffe", "Caffee", "Coffe", "Cofefe"]),
            vec!["Caffe", "Coffee", "Coffee", "Coffee"]
        );
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(
            run(&["Cup of cofee, black", "Toffee", "Coffee", "Coffees", "Offeeing"]),
            vec!["Cup of Coffee, black", "Toffee", "Coffee", "Coffees", "Offeeing"]
        );
    }
}
