use calamine::{ExcelDateTime, ExcelDateTimeType, Range};
use chrono::NaiveDate;
use invoice_sheets::core::*;
use invoice_sheets::parser::{scan_invoices, scan_metadata};
use invoice_sheets::sheet::{Cell, Sheet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn s(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else {
        Cell::String(value.into())
    }
}

fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|v| s(v)).collect())
        .collect();
    Sheet::from_rows(name, rows)
}

fn metadata() -> Metadata {
    let root = sheet(
        "ROOT",
        &[
            &["", "PARTIES"],
            &["", "ID", "NAME"],
            &["", "P1", "Acme s.r.o."],
            &["", "P2", "Beta a.s."],
            &["", "ACCOUNTS"],
            &["", "ID", "ACCOUNT NUMBER", "BANK CODE"],
            &["", "ACC1", "19-2000145399", "0800"],
            &["", "METHODS"],
            &["", "ID", "NAME"],
            &["", "TRANSFER", "Bank transfer"],
        ],
    );
    scan_metadata(&root, &ParseOptions::default()).unwrap()
}

fn scan(rows: &[&[&str]]) -> Vec<Invoice> {
    scan_invoices(&sheet("2026", rows), &metadata(), &ParseOptions::default()).unwrap()
}

fn names(invoices: &[Invoice]) -> Vec<&str> {
    invoices.iter().map(|invoice| invoice.name.as_str()).collect()
}

fn item_names(invoice: &Invoice) -> Vec<&str> {
    invoice.items.iter().map(|item| item.name.as_str()).collect()
}

const HEADER: &[&str] = &[
    "INVOICE", "ISSUER", "RECIPIENT", "ISSUE DATE", "DUE DATE", "METHOD", "ACCOUNT", "VS", "ITEM",
    "QUANTITY", "UNIT PRICE", "TOTAL PRICE",
];

#[test]
fn two_invoices_split_by_invoice_column() {
    let invoices = scan(&[
        &["INVOICES"],
        HEADER,
        &["INV-1", "P1", "P2", "2026-01-01", "2026-01-31", "TRANSFER", "ACC1", "20260001", "Design", "1", "1000", "1000"],
        &["", "", "", "", "", "", "", "", "Hosting", "12", "50", "600"],
        &["", "", "", "", "", "", "", "", "Domain", "1", "300", "300"],
        &["INV-2", "P2", "P1", "2026-02-01", "2026-02-28", "", "", "20260002", "Support", "2", "100", "200"],
        &["", "", "", "", "", "", "", "", "Training", "1", "800", "800"],
    ]);

    assert_eq!(names(&invoices), vec!["INV-1", "INV-2"]);
    assert_eq!(item_names(&invoices[0]), vec!["Design", "Hosting", "Domain"]);
    assert_eq!(item_names(&invoices[1]), vec!["Support", "Training"]);
    assert_eq!(invoices[0].total(), dec!(1900));
    assert_eq!(invoices[1].total(), dec!(1000));
    assert_eq!(invoices[1].vs.as_deref(), Some("20260002"));
}

#[test]
fn references_resolved_from_metadata() {
    let invoices = scan(&[
        &["INVOICES"],
        HEADER,
        &["INV-1", "P1", "P9", "2026-01-01", "2026-01-31", "TRANSFER", "ACC1", "1", "Design", "1", "1000", "1000"],
    ]);
    let invoice = &invoices[0];

    assert_eq!(invoice.issuer.as_ref().unwrap().name.as_deref(), Some("Acme s.r.o."));
    assert_eq!(invoice.recipient, None);
    assert_eq!(invoice.method.as_ref().unwrap().name.as_deref(), Some("Bank transfer"));
    assert_eq!(
        invoice.account.as_ref().unwrap().raw_iban().as_deref(),
        Some("CZ6508000000192000145399")
    );
    assert_eq!(invoice.issue_date, Some(date(2026, 1, 1)));
    assert_eq!(invoice.due_date, Some(date(2026, 1, 31)));

    let errors = validate_references(&metadata(), &invoices);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[REF-RECIPIENT] INV-1.recipient: unknown recipient 'P9'");
}

#[test]
fn new_header_block_restarts_items() {
    let invoices = scan(&[
        &["INVOICES"],
        &["INVOICE", "ITEM"],
        &["INV-1", "a"],
        &["", "b"],
        &[],
        &["Invoice", "ITEM", "UNIT"],
        &["INV-2", "c", "pcs"],
        &["", "d", "h"],
    ]);
    assert_eq!(names(&invoices), vec!["INV-1", "INV-2"]);
    assert_eq!(item_names(&invoices[0]), vec!["a", "b"]);
    assert_eq!(invoices[1].items[1].unit.as_deref(), Some("h"));
}

#[test]
fn data_row_without_item() {
    let invoices = scan(&[&["INVOICES"], &["INVOICE", "ITEM"], &["INV-1", ""], &["", "a"]]);
    assert_eq!(item_names(&invoices[0]), vec!["a"]);
}

#[test]
fn blank_rows_between_header_and_data() {
    let invoices = scan(&[&["INVOICES"], &["INVOICE", "ITEM"], &[], &["", ""], &["INV-1", "a"]]);
    assert_eq!(names(&invoices), vec!["INV-1"]);
    assert_eq!(item_names(&invoices[0]), vec!["a"]);
}

#[test]
fn no_anchor_means_no_invoices() {
    let invoices = scan(&[&["INVOICE", "ITEM"], &["INV-1", "a"], &["", "b"]]);
    assert!(invoices.is_empty());
}

#[test]
fn anchor_without_header() {
    let invoices = scan(&[&["Invoices"], &["INV-1", "a"], &["", "b"]]);
    assert!(invoices.is_empty());
}

#[test]
fn anchor_found_in_any_column() {
    let invoices = scan(&[&["", "", "INVOICES"], &["INVOICE", "ITEM"], &["INV-1", "a"]]);
    assert_eq!(names(&invoices), vec!["INV-1"]);
}

#[test]
fn unmapped_item_columns_are_absent() {
    let invoices = scan(&[&["INVOICES"], &["INVOICE", "ITEM", "QUANTITY"], &["INV-1", "a", ""]]);
    let item = &invoices[0].items[0];
    assert_eq!(item.quantity, Some(Decimal::ZERO));
    assert_eq!(item.total_price, None);
    assert_eq!(invoices[0].total(), Decimal::ZERO);
}

#[test]
fn lenient_dates_become_absent() {
    let invoices = scan(&[
        &["INVOICES"],
        &["INVOICE", "ISSUE DATE", "TAX DATE", "DUE DATE"],
        &["INV-1", "1/15/2026", "01-15-26", "15.01.2026"],
    ]);
    let invoice = &invoices[0];
    assert_eq!(invoice.issue_date, Some(date(2026, 1, 15)));
    assert_eq!(invoice.tax_date, Some(date(2026, 1, 15)));
    assert_eq!(invoice.due_date, None);
}

#[test]
fn short_dates_are_fixed_width() {
    let invoices = scan(&[
        &["INVOICES"],
        &["INVOICE", "ISSUE DATE", "TAX DATE", "DUE DATE"],
        &["INV-1", "2026-1-5", "1-15-26", "01-31-75"],
    ]);
    let invoice = &invoices[0];
    assert_eq!(invoice.issue_date, None);
    assert_eq!(invoice.tax_date, None);
    assert_eq!(invoice.due_date, Some(date(2075, 1, 31)));
}

#[test]
fn strict_amount_out_of_range() {
    let data = Sheet::from_rows(
        "2026",
        vec![
            vec![s("INVOICES")],
            vec![s("INVOICE"), s("ITEM"), s("TOTAL PRICE")],
            vec![s("INV-1"), s("Hosting"), Cell::Float(1e30)],
        ],
    );
    let options = ParseOptions::new().coercion(CoercionPolicy::Strict);
    let err = scan_invoices(&data, &metadata(), &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value at 2026!C3: '1000000000000000000000000000000' is too large for a decimal"
    );

    let invoices = scan_invoices(&data, &metadata(), &ParseOptions::default()).unwrap();
    assert_eq!(invoices[0].items[0].total_price, Some(Decimal::ZERO));
}

#[test]
fn strict_dates_fail() {
    let data = sheet(
        "2026",
        &[&["INVOICES"], &["INVOICE", "DUE DATE"], &["INV-1", "15.01.2026"]],
    );
    let options = ParseOptions::new().coercion(CoercionPolicy::Strict);
    let err = scan_invoices(&data, &metadata(), &options).unwrap_err();
    assert_eq!(err.to_string(), "invalid value at 2026!B3: '15.01.2026' is not a date");
}

#[test]
fn typed_cells() {
    let due = ExcelDateTime::new(45688.0, ExcelDateTimeType::DateTime, false);
    let data = Sheet::from_rows(
        "2026",
        vec![
            vec![s("INVOICES")],
            vec![s("INVOICE"), s("DUE DATE"), s("VS"), s("ITEM"), s("QUANTITY"), s("TOTAL PRICE")],
            vec![
                Cell::Int(2026001),
                Cell::DateTime(due),
                Cell::Float(20260001.0),
                s("Hosting"),
                Cell::Float(1.5),
                Cell::Float(1499.9),
            ],
        ],
    );
    let invoices = scan_invoices(&data, &metadata(), &ParseOptions::default()).unwrap();
    let invoice = &invoices[0];

    assert_eq!(invoice.name, "2026001");
    assert_eq!(invoice.due_date, Some(date(2025, 1, 31)));
    assert_eq!(invoice.vs.as_deref(), Some("20260001"));
    assert_eq!(invoice.items[0].quantity, Some(dec!(1.5)));
    assert_eq!(invoice.items[0].total_price, Some(dec!(1499.9)));
}

#[test]
fn range_not_starting_at_a1() {
    let mut range = Range::new((4, 2), (6, 3));
    range.set_value((4, 2), s("INVOICES"));
    range.set_value((5, 2), s("INVOICE"));
    range.set_value((5, 3), s("ITEM"));
    range.set_value((6, 2), s("INV-1"));
    range.set_value((6, 3), s("Consulting"));
    let data = Sheet::new("2026", range);

    let invoices = scan_invoices(&data, &metadata(), &ParseOptions::default()).unwrap();
    assert_eq!(names(&invoices), vec!["INV-1"]);
    assert_eq!(item_names(&invoices[0]), vec!["Consulting"]);
}
