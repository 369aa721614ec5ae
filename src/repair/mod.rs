// src/repair/mod.rs

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{info, info_span};

use crate::tables::Dataset;

pub mod currency;
pub mod date;
pub mod dish;
pub mod place;
pub mod trimming;

pub use currency::{CentsToDollars, DollarsSpelling};
pub use date::{DateFromCallNumber, DateTypos};
pub use dish::CoffeeSpelling;
pub use place::NewYorkSpelling;
pub use trimming::TrimWhitespace;

/// One in-place repair over the dataset.
pub trait RepairStep: Send + Sync {
    fn name(&self) -> &'static str;

    /// Apply the repair and return how many values it changed.
    fn apply(&self, data: &mut Dataset) -> usize;
}

/// Changed-value count per step, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub steps: Vec<(String, usize)>,
}

impl RepairSummary {
    pub fn total_changes(&self) -> usize {
        self.steps.iter().map(|(_, n)| n).sum()
    }
}

/// Ordered repair steps. Later steps read what earlier ones wrote, so order is fixed.
pub struct Pipeline {
    steps: Vec<Box<dyn RepairStep>>,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn RepairStep>>) -> Self {
        Self { steps }
    }

    /// The full cleaning run, in the only order that is valid:
    /// date backfill feeds the typo fix, and the Dollars spelling fix runs before
    /// Cents are converted.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(TrimWhitespace),
            Box::new(DateFromCallNumber),
            Box::new(DateTypos),
            Box::new(NewYorkSpelling),
            Box::new(DollarsSpelling),
            Box::new(CentsToDollars),
            Box::new(CoffeeSpelling),
        ])
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    #[tracing::instrument(level = "info", skip_all, fields(steps = self.steps.len()))]
    pub fn run(&self, data: &mut Dataset) -> RepairSummary {
        let mut summary = RepairSummary::default();
        for step in &self.steps {
            let _span = info_span!("repair", step = step.name()).entered();
            let changed = step.apply(data);
            info!(changed, "applied");
            summary.steps.push((step.name().to_string(), changed));
        }
        summary
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rewrite a present text value, leaving `None` alone. Returns whether it changed.
pub(crate) fn rewrite_field<F>(field: &mut Option<String>, f: F) -> bool
where
    F: for<'a> FnOnce(&'a str) -> Cow<'a, str>,
{
    let Some(current) = field.as_deref() else {
        return false;
    };
    let next = match f(current) {
        Cow::Borrowed(_) => return false,
        Cow::Owned(next) => next,
    };
    if next == current {
        return false;
    }
    *field = Some(next);
    true
}
