// src/bin/coffee_query.rs
//
// usage: coffee_query <DATASET_DIR> [--all-years]

use anyhow::Result;
use menuclean::{
    config::Config,
    load::load_dataset,
    query::{summarize_by_year, PriceRow},
    repair::Pipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn print_rows(label: &str, rows: &[PriceRow]) {
    let undated = rows.iter().filter(|r| r.year.is_none()).count();
    println!("\n{label}: {} prices ({} without a readable year)", rows.len(), undated);
    println!("{: <8} {:>8} {:>10} {:>10}", "Year", "Count", "Mean", "Median");
    println!("{:-<40}", "");
    for y in summarize_by_year(rows) {
        println!("{: <8} {:>8} {:>10.3} {:>10.3}", y.year, y.count, y.mean, y.median);
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let config = Config::from_env()?;
    let query = config.query();
    info!(?query, "querying coffee prices");

    let mut data = load_dataset(&config.dataset_dir)?;

    let dirty = query.run(&data);
    Pipeline::standard().run(&mut data);
    let clean = query.run(&data);

    print_rows("dirty", &dirty);
    print_rows("clean", &clean);
    Ok(())
}
