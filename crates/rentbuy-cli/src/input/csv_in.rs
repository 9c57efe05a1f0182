use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, warn};

use rentbuy_core::buy_rent::property::PropertyRecord;
use rentbuy_core::portfolio::rates::BankRate;

use super::file::resolve_path;

const PRICE: &str = "price_inr";
const AREA: &str = "area_sqft";
const RENT: &str = "estimated_monthly_rent";

const REQUIRED_COLUMNS: [&str; 3] = [PRICE, AREA, RENT];
const OPTIONAL_COLUMNS: [&str; 4] = ["title", "city", "location", "bedrooms"];

/// Read a property CSV from disk.
pub fn read_properties(path: &str) -> Result<Vec<PropertyRecord>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let file = File::open(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let records = parse_properties(file)
        .map_err(|e| format!("Failed to load '{}': {}", canonical.display(), e))?;
    debug!(path = %canonical.display(), rows = records.len(), "properties loaded");
    Ok(records)
}

/// Read a bank rates CSV from disk.
pub fn read_rates(path: &str) -> Result<Vec<BankRate>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let file = File::open(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let rates = parse_rates(file)
        .map_err(|e| format!("Failed to load '{}': {}", canonical.display(), e))?;
    Ok(rates)
}

/// `" Price INR "` -> `"price_inr"`
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Empty or unparsable cells are absent values, not errors.
fn parse_number(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()
}

fn column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Parse property rows against the fixed column set.
///
/// Every header must be a known column and every required column must be
/// present. Rows are kept even when their numeric cells are unusable.
pub fn parse_properties<R: Read>(
    reader: R,
) -> Result<Vec<PropertyRecord>, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();

    if let Some(unknown) = headers
        .iter()
        .find(|h| !REQUIRED_COLUMNS.contains(&h.as_str()) && !OPTIONAL_COLUMNS.contains(&h.as_str()))
    {
        return Err(format!(
            "unmapped column '{}' (expected {} and optionally {})",
            unknown,
            REQUIRED_COLUMNS.join(", "),
            OPTIONAL_COLUMNS.join(", ")
        )
        .into());
    }
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|c| column(&headers, c).is_none())
    {
        return Err(format!("missing required column '{}'", missing).into());
    }

    let price_idx = column(&headers, PRICE);
    let area_idx = column(&headers, AREA);
    let rent_idx = column(&headers, RENT);
    let title_idx = column(&headers, "title");
    let city_idx = column(&headers, "city");
    let location_idx = column(&headers, "location");
    let bedrooms_idx = column(&headers, "bedrooms");

    let mut records = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| format!("row {}: {}", row + 1, e))?;
        let text = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let number = |idx: Option<usize>| idx.and_then(|i| record.get(i)).and_then(parse_number);

        records.push(PropertyRecord {
            title: text(title_idx),
            city: text(city_idx),
            location: text(location_idx),
            bedrooms: text(bedrooms_idx),
            price: number(price_idx),
            rent_estimate: number(rent_idx),
            area_sqft: number(area_idx),
        });
    }

    Ok(records)
}

/// Parse a bank rates table. `rate` is required, `bank` optional, other
/// columns are ignored. Blank rate cells are skipped.
pub fn parse_rates<R: Read>(reader: R) -> Result<Vec<BankRate>, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();

    let rate_idx = column(&headers, "rate").ok_or("missing required column 'rate'")?;
    let bank_idx = column(&headers, "bank");

    let mut rates = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| format!("row {}: {}", row + 1, e))?;
        let bank = bank_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let cell = record.get(rate_idx).unwrap_or("").trim();
        if cell.is_empty() {
            warn!(row = row + 1, "blank rate skipped");
            continue;
        }
        let rate = parse_number(cell)
            .ok_or_else(|| format!("row {}: rate '{}' is not a number", row + 1, cell))?;
        rates.push(BankRate { bank, rate });
    }

    Ok(rates)
}
