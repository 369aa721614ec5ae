// src/report/mod.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::classify::YearRange;
use crate::profile::{profile_dishes, profile_menu_attributes, profile_menus, MenuAttributes};
use crate::query::{prices, summarize_by_year, CoffeeQuery, YearSummary};
use crate::repair::RepairSummary;
use crate::tables::{Dataset, SkippedRows};

/// Everything measured on the dataset in one state (dirty or clean).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Overlap counts in three-set diagram order: NY, Date, NY+Date, Dollars,
    /// NY+Dollars, Date+Dollars, all three.
    pub menu_venn: [usize; 7],
    pub menus_unmatched: usize,
    pub menu_attributes: MenuAttributes,
    pub coffee_dishes: usize,
    pub prices: Vec<f64>,
    pub by_year: Vec<YearSummary>,
}

impl Snapshot {
    #[instrument(level = "info", skip_all)]
    pub fn capture(data: &Dataset, years: YearRange, query: &CoffeeQuery) -> Self {
        let menus = data.menus.rows();
        let profile = profile_menus(menus, years);
        let rows = query.run(data);
        Self {
            menu_venn: profile.venn_subsets(),
            menus_unmatched: profile.unmatched(),
            menu_attributes: profile_menu_attributes(menus, years),
            coffee_dishes: profile_dishes(data.dishes.rows()),
            prices: prices(&rows),
            by_year: summarize_by_year(&rows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub years: YearRange,
    /// Source rows the profiles above never saw.
    pub skipped_at_load: SkippedRows,
    pub query: CoffeeQuery,
    pub dirty: Snapshot,
    pub clean: Snapshot,
    pub repairs: RepairSummary,
}

/// Write `report` as pretty JSON to `path`, via a temp file renamed over the target.
#[instrument(level = "info", skip(report, path), fields(path = %path.as_ref().display()))]
pub fn write_report<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating report directory {:?}", dir))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("report path {:?} has no file name", path))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut tmp =
        fs::File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    serde_json::to_writer_pretty(&mut tmp, report).context("serializing report")?;
    tmp.write_all(b"\n")?;
    drop(tmp);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    info!("wrote report");
    Ok(())
}

pub fn read_report<P: AsRef<Path>>(path: P) -> Result<RunReport> {
    let path = path.as_ref();
    let f = fs::File::open(path).with_context(|| format!("opening {:?}", path))?;
    serde_json::from_reader(f).with_context(|| format!("parsing {:?}", path))
}
