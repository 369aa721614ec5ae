// src/config.rs

use anyhow::{bail, Context, Result};
use std::{env, path::PathBuf};

use crate::classify::YearRange;
use crate::query::CoffeeQuery;

pub const ENV_YEARS: &str = "MENUCLEAN_YEARS";
pub const ENV_PRICE_CEILING: &str = "MENUCLEAN_PRICE_CEILING";
pub const ENV_REPORT: &str = "MENUCLEAN_REPORT";

const DEFAULT_REPORT: &str = "doc/report.json";
const USAGE: &str = "Usage: menuclean <DATASET_DIR> [--all-years]";

/// Settings for one cleaning run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset_dir: PathBuf,
    pub years: YearRange,
    /// Skip the year filter when querying prices.
    pub query_all_years: bool,
    pub price_ceiling: f64,
    pub report_path: PathBuf,
}

impl Config {
    /// Build from process arguments and `MENUCLEAN_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_parts(env::args().skip(1), |k| env::var(k).ok())
    }

    /// `args` excludes the program name; `var` looks up an override by name.
    pub fn from_parts<I, F>(args: I, var: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut dataset_dir = None;
        let mut query_all_years = false;
        for arg in args {
            match arg.as_str() {
                "--all-years" => query_all_years = true,
                flag if flag.starts_with("--") => bail!("unknown flag `{}`\n{}", flag, USAGE),
                path if dataset_dir.is_none() => dataset_dir = Some(PathBuf::from(path)),
                extra => bail!("unexpected argument `{}`\n{}", extra, USAGE),
            }
        }
        let Some(dataset_dir) = dataset_dir else {
            bail!(USAGE);
        };

        let years = match var(ENV_YEARS) {
            Some(raw) => parse_years(&raw).with_context(|| format!("invalid {}", ENV_YEARS))?,
            None => YearRange::default(),
        };

        let price_ceiling = match var(ENV_PRICE_CEILING) {
            Some(raw) => {
                let v: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {}: `{}`", ENV_PRICE_CEILING, raw))?;
                if !(v.is_finite() && v > 0.0) {
                    bail!("{} must be a positive number, got `{}`", ENV_PRICE_CEILING, raw);
                }
                v
            }
            None => CoffeeQuery::default().price_ceiling,
        };

        let report_path = var(ENV_REPORT)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT));

        Ok(Self {
            dataset_dir,
            years,
            query_all_years,
            price_ceiling,
            report_path,
        })
    }

    pub fn query(&self) -> CoffeeQuery {
        CoffeeQuery {
            years: (!self.query_all_years).then_some(self.years),
            price_ceiling: self.price_ceiling,
        }
    }
}

/// Parse `START-END` (inclusive) or a single year.
fn parse_years(raw: &str) -> Result<YearRange> {
    let raw = raw.trim();
    let (start, end) = match raw.split_once('-') {
        Some((s, e)) => (s.trim(), e.trim()),
        None => (raw, raw),
    };
    let start: i32 = start.parse().with_context(|| format!("bad start year `{}`", start))?;
    let end: i32 = end.parse().with_context(|| format!("bad end year `{}`", end))?;
    if start > end {
        bail!("year range {}-{} is reversed", start, end);
    }
    Ok(YearRange::new(start, end))
}
