//! Transaction input readers
//!
//! Two formats are accepted:
//!
//! - CSV with the header `id,date,amount,description,category_id,subcategory_id`
//!   (columns may be in any order; the category columns are optional)
//! - JSON: an array of transaction objects with the same field names
//!
//! Dates are `YYYY-MM-DD`. Amounts are signed: negative for expenses.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Column positions resolved from the CSV header
struct Columns {
    id: usize,
    date: usize,
    amount: usize,
    description: usize,
    category_id: Option<usize>,
    subcategory_id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidData(format!("Missing CSV column: {}", name)))
        };

        Ok(Self {
            id: require("id")?,
            date: require("date")?,
            amount: require("amount")?,
            description: require("description")?,
            category_id: find("category_id"),
            subcategory_id: find("subcategory_id"),
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str, row: usize) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| Error::InvalidData(format!("Row {}: missing {}", row, name)))
}

fn optional_field(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Parse a `YYYY-MM-DD` date
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Unable to parse date: {}", s)))
}

/// Parse a signed amount, ignoring thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().replace([',', ' ', '\u{a0}'], "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| Error::InvalidData(format!("Unable to parse amount: {}", s)))
}

/// Read transactions from CSV
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Row 1 is the header
        let row = i + 2;

        transactions.push(Transaction {
            id: field(&record, columns.id, "id", row)?.to_string(),
            date: parse_date(field(&record, columns.date, "date", row)?)?,
            amount: parse_amount(field(&record, columns.amount, "amount", row)?)?,
            description: field(&record, columns.description, "description", row)?.to_string(),
            category_id: optional_field(&record, columns.category_id),
            subcategory_id: optional_field(&record, columns.subcategory_id),
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Read transactions from a JSON array
pub fn read_transactions_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    debug!("Parsed {} JSON transactions", transactions.len());
    Ok(transactions)
}

/// Read a transaction file, choosing the format by extension
pub fn read_transactions_file(path: &Path) -> Result<Vec<Transaction>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    match extension.as_deref() {
        Some("csv") => read_transactions_csv(reader),
        Some("json") => read_transactions_json(reader),
        _ => Err(Error::InvalidData(format!(
            "Unsupported transaction file (expected .csv or .json): {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), date("2024-01-15"));
        assert!(parse_date("01/15/2024").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("-1,234.56").unwrap(), -1234.56);
        assert_eq!(parse_amount(" 25000 ").unwrap(), 25000.0);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_read_csv() {
        let csv = "id,date,amount,description,category_id,subcategory_id
t1,2024-01-15,-149.00,NETFLIX COM,entertainment,streaming
t2,2024-01-25,25000,SALARY EMPLOYER,,
";
        let transactions = read_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "t1");
        assert_eq!(transactions[0].amount, -149.0);
        assert_eq!(transactions[0].category_id.as_deref(), Some("entertainment"));
        assert_eq!(transactions[0].subcategory_id.as_deref(), Some("streaming"));
        assert_eq!(transactions[1].category_id, None);
        assert!(!transactions[1].is_expense());
    }

    #[test]
    fn test_read_csv_without_category_columns() {
        let csv = "description,amount,date,id
SPOTIFY,-59,2024-02-01,a
";
        let transactions = read_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].description, "SPOTIFY");
        assert_eq!(transactions[0].date, date("2024-02-01"));
        assert_eq!(transactions[0].category_id, None);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let csv = "id,date,description\nt1,2024-01-15,NETFLIX\n";
        let result = read_transactions_csv(csv.as_bytes());
        assert!(matches!(result, Err(Error::InvalidData(msg)) if msg.contains("amount")));
    }

    #[test]
    fn test_read_csv_bad_row() {
        let csv = "id,date,amount,description\nt1,15/01/2024,-10,NETFLIX\n";
        assert!(read_transactions_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_json() {
        let json = r#"[
            {"id": "t1", "date": "2024-01-15", "amount": -149.0, "description": "NETFLIX COM"},
            {"id": "t2", "date": "2024-02-15", "amount": -149.0, "description": "NETFLIX COM",
             "category_id": "entertainment", "subcategory_id": null}
        ]"#;
        let transactions = read_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].category_id.as_deref(), Some("entertainment"));
        assert_eq!(transactions[1].subcategory_id, None);
    }

    #[test]
    fn test_read_file_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();

        let csv_path = dir.path().join("tx.CSV");
        fs::write(&csv_path, "id,date,amount,description\nt1,2024-01-15,-5,COFFEE\n").unwrap();
        assert_eq!(read_transactions_file(&csv_path).unwrap().len(), 1);

        let json_path = dir.path().join("tx.json");
        fs::write(&json_path, "[]").unwrap();
        assert!(read_transactions_file(&json_path).unwrap().is_empty());

        let other = dir.path().join("tx.xlsx");
        fs::write(&other, "").unwrap();
        assert!(matches!(
            read_transactions_file(&other),
            Err(Error::InvalidData(_))
        ));
    }
}
