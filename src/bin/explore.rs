// src/bin/explore.rs
//
// usage: explore <DATASET_DIR>
// Profiles the raw Menu table only; nothing is repaired.

use anyhow::Result;
use menuclean::{
    config::Config,
    load::load_dataset,
    profile::{decade_histogram, profile_menu_attributes, AttributeProfile},
};
use tracing_subscriber::{fmt, EnvFilter};

fn print_attribute(name: &str, a: &AttributeProfile) {
    println!("{: <10} {:>10} {:>10} {:>10} {:>10}", name, a.target, a.other, a.missing, a.total());
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = Config::from_env()?;
    let data = load_dataset(&config.dataset_dir)?;
    let menus = data.menus.rows();

    let attrs = profile_menu_attributes(menus, config.years);
    for a in [&attrs.place, &attrs.date, &attrs.currency] {
        anyhow::ensure!(a.total() == menus.len(), "attribute breakdown does not cover every menu");
    }

    println!("\nApplicable menu attributes (target years {})", config.years);
    if data.skipped.menus > 0 {
        println!("({} menus without a usable id were not loaded)", data.skipped.menus);
    }
    println!("{: <10} {:>10} {:>10} {:>10} {:>10}", "Attribute", "Target", "Other", "Missing", "Total");
    println!("{:-<54}", "");
    print_attribute("currency", &attrs.currency);
    print_attribute("date", &attrs.date);
    print_attribute("place", &attrs.place);

    println!("\nMenus by decade");
    println!("{:-<24}", "");
    for (decade, count) in decade_histogram(menus) {
        println!("{: <10} {:>12}", decade, count);
    }
    Ok(())
}
