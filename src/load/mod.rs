// src/load/mod.rs

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde::{de::DeserializeOwned, Deserialize};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, info, instrument, warn};

use crate::tables::{Dataset, Dish, Item, Menu, Page, SkippedRows};

pub const MENU_FILE: &str = "Menu.csv";
pub const PAGE_FILE: &str = "MenuPage.csv";
pub const ITEM_FILE: &str = "MenuItem.csv";
pub const DISH_FILE: &str = "Dish.csv";

const MENU_COLUMNS: &[&str] = &["id", "date", "place", "currency", "call_number"];
const PAGE_COLUMNS: &[&str] = &["id", "menu_id"];
const ITEM_COLUMNS: &[&str] = &["menu_page_id", "dish_id", "price"];
const DISH_COLUMNS: &[&str] = &["id", "name"];

#[derive(Debug, Deserialize)]
struct MenuRecord {
    id: Option<String>,
    date: Option<String>,
    place: Option<String>,
    currency: Option<String>,
    call_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageRecord {
    id: Option<String>,
    menu_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    menu_page_id: Option<String>,
    dish_id: Option<String>,
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DishRecord {
    id: Option<String>,
    name: Option<String>,
}

/// Integer key from a CSV cell. Accepts `12` and `12.0`; anything else is `None`.
fn parse_key(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Trim then coerce a price cell. Non-numeric, non-finite and negative values are unknown.
fn parse_price(raw: Option<&str>) -> Option<f64> {
    let p = raw?.trim().parse::<f64>().ok()?;
    (p.is_finite() && p >= 0.0).then_some(p)
}

/// Deserialize every record of one table, failing if a required header is absent.
fn read_records<T, R>(reader: R, name: &str, required: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", name))?
        .clone();
    for col in required {
        if !headers.iter().any(|h| h == *col) {
            bail!("{} is missing required column `{}`", name, col);
        }
    }

    let mut out = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let record: T =
            result.with_context(|| format!("CSV parse error in {} at record {}", name, idx))?;
        out.push(record);
    }
    debug!(file = name, rows = out.len(), "read records");
    Ok(out)
}

fn open(dir: &Path, name: &str) -> Result<BufReader<File>> {
    let path = dir.join(name);
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Build rows from `records`, dropping those `build` rejects. Returns the rows and the
/// number dropped.
fn keyed_rows<Rec, T>(
    records: Vec<Rec>,
    name: &str,
    build: impl Fn(Rec) -> Option<T>,
) -> (Vec<T>, usize) {
    let total = records.len();
    let rows: Vec<T> = records.into_iter().filter_map(build).collect();
    let skipped = total - rows.len();
    if skipped > 0 {
        warn!(file = name, skipped, "rows without a usable id");
    }
    (rows, skipped)
}

fn read_menus<R: Read>(reader: R) -> Result<(Vec<Menu>, usize)> {
    let records: Vec<MenuRecord> = read_records(reader, MENU_FILE, MENU_COLUMNS)?;
    Ok(keyed_rows(records, MENU_FILE, |r| {
        Some(Menu {
            id: parse_key(r.id.as_deref())?,
            date: r.date,
            place: r.place,
            currency: r.currency,
            call_number: r.call_number,
        })
    }))
}

fn read_pages<R: Read>(reader: R) -> Result<(Vec<Page>, usize)> {
    let records: Vec<PageRecord> = read_records(reader, PAGE_FILE, PAGE_COLUMNS)?;
    Ok(keyed_rows(records, PAGE_FILE, |r| {
        Some(Page {
            id: parse_key(r.id.as_deref())?,
            menu_id: parse_key(r.menu_id.as_deref()),
        })
    }))
}

fn read_dishes<R: Read>(reader: R) -> Result<(Vec<Dish>, usize)> {
    let records: Vec<DishRecord> = read_records(reader, DISH_FILE, DISH_COLUMNS)?;
    Ok(keyed_rows(records, DISH_FILE, |r| {
        Some(Dish {
            id: parse_key(r.id.as_deref())?,
            name: r.name,
        })
    }))
}

pub fn menus_from_reader<R: Read>(reader: R) -> Result<Vec<Menu>> {
    Ok(read_menus(reader)?.0)
}

pub fn pages_from_reader<R: Read>(reader: R) -> Result<Vec<Page>> {
    Ok(read_pages(reader)?.0)
}

pub fn items_from_reader<R: Read>(reader: R) -> Result<Vec<Item>> {
    let records: Vec<ItemRecord> = read_records(reader, ITEM_FILE, ITEM_COLUMNS)?;
    let mut unreadable = 0usize;
    let items: Vec<Item> = records
        .into_iter()
        .map(|r| {
            let price = parse_price(r.price.as_deref());
            if price.is_none() && r.price.is_some() {
                unreadable += 1;
            }
            Item {
                menu_page_id: parse_key(r.menu_page_id.as_deref()),
                dish_id: parse_key(r.dish_id.as_deref()),
                price,
            }
        })
        .collect();
    if unreadable > 0 {
        warn!(unreadable, "prices treated as unknown");
    }
    Ok(items)
}

pub fn dishes_from_reader<R: Read>(reader: R) -> Result<Vec<Dish>> {
    Ok(read_dishes(reader)?.0)
}

/// Load the four menu tables from `dir`.
///
/// Every file is checked for existence before any is parsed, so a missing table
/// fails the run without doing partial work.
#[instrument(level = "info", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("dataset directory `{}` does not exist or is not a directory", dir.display());
    }
    for name in [MENU_FILE, PAGE_FILE, ITEM_FILE, DISH_FILE] {
        let path = dir.join(name);
        if !path.is_file() {
            bail!("missing input table {}", path.display());
        }
    }

    let (menus, skipped_menus) = read_menus(open(dir, MENU_FILE)?)?;
    let (pages, skipped_pages) = read_pages(open(dir, PAGE_FILE)?)?;
    let items = items_from_reader(open(dir, ITEM_FILE)?)?;
    let (dishes, skipped_dishes) = read_dishes(open(dir, DISH_FILE)?)?;

    info!(
        menus = menus.len(),
        pages = pages.len(),
        items = items.len(),
        dishes = dishes.len(),
        "loaded dataset"
    );
    let mut data = Dataset::new(menus, pages, items, dishes);
    data.skipped = SkippedRows {
        menus: skipped_menus,
        pages: skipped_pages,
        dishes: skipped_dishes,
    };
    Ok(data)
}
