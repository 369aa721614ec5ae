use anyhow::Result;
use menuclean::{
    config::Config,
    load::load_dataset,
    repair::Pipeline,
    report::{write_report, RunReport, Snapshot},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn print_snapshot(label: &str, s: &Snapshot) {
    println!("\n{label}");
    println!("{:-<60}", "");
    println!("{: <28} {:?}", "menus (venn subsets)", s.menu_venn);
    println!("{: <28} {:>10}", "menus matching nothing", s.menus_unmatched);
    println!("{: <28} {:>10}", "cup-of-coffee dishes", s.coffee_dishes);
    println!("{: <28} {:>10}", "coffee prices found", s.prices.len());
    for y in &s.by_year {
        println!(
            "  {: <26} n={:<6} mean={:>6.3} median={:>6.3}",
            y.year, y.count, y.mean, y.median
        );
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(dataset = %config.dataset_dir.display(), years = %config.years, "startup");
    let query = config.query();

    // ─── 3) load all four tables before touching anything ────────────
    let mut data = load_dataset(&config.dataset_dir)?;

    // ─── 4) measure, repair, measure again ───────────────────────────
    let dirty = Snapshot::capture(&data, config.years, &query);
    let repairs = Pipeline::standard().run(&mut data);
    info!(changes = repairs.total_changes(), "repairs applied");
    let clean = Snapshot::capture(&data, config.years, &query);

    // ─── 5) persist + summarise ──────────────────────────────────────
    let report = RunReport {
        years: config.years,
        skipped_at_load: data.skipped,
        query,
        dirty,
        clean,
        repairs,
    };
    write_report(&report, &config.report_path)?;

    let skipped = report.skipped_at_load;
    if skipped != Default::default() {
        println!(
            "\nrows dropped at load (no usable id): menus={} pages={} dishes={}",
            skipped.menus, skipped.pages, skipped.dishes
        );
    }
    print_snapshot("dirty data", &report.dirty);
    print_snapshot("clean data", &report.clean);
    println!("\nreport written to {}", config.report_path.display());

    info!("all done");
    Ok(())
}
