use criterion::{Criterion, black_box, criterion_group, criterion_main};

use invoice_sheets::core::*;
use invoice_sheets::parser::{WorkbookParser, scan_invoices, scan_metadata};
use invoice_sheets::sheet::{Cell, Sheet, Workbook, cell_monetary};

fn s(value: &str) -> Cell {
    Cell::String(value.into())
}

fn root_sheet(parties: usize) -> Sheet {
    let mut rows = vec![
        vec![Cell::Empty, s("PARTIES")],
        vec![Cell::Empty, s("ID"), s("NAME"), s("ADDRESS")],
    ];
    for i in 0..parties {
        rows.push(vec![Cell::Empty, s(&format!("P{i}")), s(&format!("Party {i}")), s("A1")]);
    }
    rows.extend([
        vec![Cell::Empty, s("ADDRESSES")],
        vec![Cell::Empty, s("ID"), s("STREET"), s("CITY")],
        vec![Cell::Empty, s("A1"), s("Main St"), s("Praha")],
        vec![Cell::Empty, s("ACCOUNTS")],
        vec![Cell::Empty, s("ID"), s("ACCOUNT NUMBER"), s("BANK CODE")],
        vec![Cell::Empty, s("ACC1"), s("19-2000145399"), s("0800")],
    ]);
    Sheet::from_rows("ROOT", rows)
}

/// `invoices` invoices with `items` item rows each.
fn data_sheet(name: &str, invoices: usize, items: usize) -> Sheet {
    let mut rows = vec![
        vec![s("INVOICES")],
        ["INVOICE", "ISSUER", "RECIPIENT", "DUE DATE", "ACCOUNT", "VS", "ITEM", "QUANTITY", "UNIT PRICE", "TOTAL PRICE"]
            .iter()
            .map(|label| s(label))
            .collect(),
    ];
    for i in 0..invoices {
        rows.push(vec![
            s(&format!("INV-{i}")),
            s("P1"),
            s("P2"),
            s("2026-01-31"),
            s("ACC1"),
            Cell::Int(i as i64),
            s("Setup"),
            Cell::Float(1.0),
            s("1,000.00 CZK"),
            s("1,000.00 CZK"),
        ]);
        for j in 0..items {
            rows.push(vec![
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                s(&format!("Item {j}")),
                Cell::Float(2.0),
                Cell::Float(49.5),
                Cell::Float(99.0),
            ]);
        }
    }
    Sheet::from_rows(name, rows)
}

fn bench_coercion(c: &mut Criterion) {
    let cell = s("1,234,567.89 CZK");
    c.bench_function("monetary_cell", |b| {
        b.iter(|| cell_monetary(black_box(&cell), "CZK").unwrap())
    });
}

fn bench_scans(c: &mut Criterion) {
    let options = ParseOptions::default();
    let root = root_sheet(500);
    let data = data_sheet("2026", 1_000, 10);
    let metadata = scan_metadata(&root, &options).unwrap();

    c.bench_function("metadata_500_parties", |b| {
        b.iter(|| scan_metadata(black_box(&root), &options).unwrap())
    });

    c.bench_function("invoices_1000x10", |b| {
        b.iter(|| scan_invoices(black_box(&data), &metadata, &options).unwrap())
    });
}

fn bench_workbook(c: &mut Criterion) {
    let workbook = Workbook::from_sheets(vec![
        root_sheet(100),
        data_sheet("2024", 300, 10),
        data_sheet("2025", 300, 10),
        data_sheet("2026", 300, 10),
    ]);
    let parser = WorkbookParser::default();

    c.bench_function("workbook_3_sheets", |b| {
        b.iter(|| parser.parse(black_box(&workbook)).unwrap())
    });
}

criterion_group!(benches, bench_coercion, bench_scans, bench_workbook);
criterion_main!(benches);
