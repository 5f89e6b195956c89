//! Declarative column-to-field tables for every record kind.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::core::*;
use crate::sheet::{Cell, HeaderMap, Row, cell_string, parse_date, parse_decimal, parse_monetary};

/// A data row read through the header of its block.
pub(crate) struct RowContext<'r, 'a> {
    pub row: Row<'a>,
    pub header: &'r HeaderMap,
    pub sheet: &'r str,
    pub options: &'r ParseOptions,
}

impl<'r, 'a> RowContext<'r, 'a> {
    /// `None` if the header has no such column.
    fn cell(&self, column: &str) -> Option<Option<&'a Cell>> {
        self.header.column(column).map(|index| self.row.get(index))
    }

    pub fn location(&self, column: usize) -> String {
        format!("{}!{}", self.sheet, self.row.reference(column))
    }

    fn location_of(&self, label: &str) -> String {
        self.header
            .column(label)
            .map(|column| self.location(column))
            .unwrap_or_else(|| format!("{0}!{1}:{1}", self.sheet, self.row.index() + 1))
    }

    /// Trimmed text of a column; unmapped columns and blank cells are absent.
    pub fn text(&self, column: &str) -> Option<String> {
        let value = self.cell(column)?.map(cell_string).unwrap_or_default();
        (!value.is_empty()).then_some(value)
    }

    pub fn date(&self, column: &str) -> Result<Option<NaiveDate>, ParseError> {
        let Some(text) = self.text(column) else {
            return Ok(None);
        };
        match parse_date(&text) {
            Ok(date) => Ok(date),
            Err(err) => self.recover(column, err, None),
        }
    }

    pub fn decimal(&self, column: &str) -> Result<Option<Decimal>, ParseError> {
        let Some(cell) = self.cell(column) else {
            return Ok(None);
        };
        let text = cell.map(cell_string).unwrap_or_default();
        match parse_decimal(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.recover(column, err, Some(Decimal::ZERO)),
        }
    }

    pub fn monetary(&self, column: &str) -> Result<Option<Decimal>, ParseError> {
        let Some(cell) = self.cell(column) else {
            return Ok(None);
        };
        let text = cell.map(cell_string).unwrap_or_default();
        match parse_monetary(&text, &self.options.currency_marker) {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.recover(column, err, Some(Decimal::ZERO)),
        }
    }

    fn recover<T>(&self, column: &str, err: CellError, fallback: T) -> Result<T, ParseError> {
        let cell = self.location_of(column);
        match self.options.coercion {
            CoercionPolicy::Strict => Err(ParseError::InvalidValue { cell, source: err }),
            CoercionPolicy::Lenient => {
                warn!("Ignoring invalid value at {}: {}.", cell, err);
                Ok(fallback)
            }
        }
    }
}

/// How one column is read into a record.
pub(crate) enum Field<T> {
    Text(&'static str, fn(&mut T, Option<String>)),
    Date(&'static str, fn(&mut T, Option<NaiveDate>)),
    Decimal(&'static str, fn(&mut T, Option<Decimal>)),
    Money(&'static str, fn(&mut T, Option<Decimal>)),
}

/// Fill `record` from the row using a field table.
pub(crate) fn apply<T>(record: &mut T, fields: &[Field<T>], ctx: &RowContext) -> Result<(), ParseError> {
    for field in fields {
        match field {
            Field::Text(column, set) => set(record, ctx.text(column)),
            Field::Date(column, set) => set(record, ctx.date(column)?),
            Field::Decimal(column, set) => set(record, ctx.decimal(column)?),
            Field::Money(column, set) => set(record, ctx.monetary(column)?),
        }
    }
    Ok(())
}

pub(crate) const ADDRESS_FIELDS: &[Field<Address>] = &[
    Field::Text("ID", |a, v| a.id = v.unwrap_or_default()),
    Field::Text("STREET", |a, v| a.street = v),
    Field::Text("HOUSE NUMBER", |a, v| a.house_number = v),
    Field::Text("CITY", |a, v| a.city = v),
    Field::Text("DISTRICT", |a, v| a.district = v),
    Field::Text("ZIP CODE", |a, v| a.zip_code = v),
    Field::Text("COUNTRY", |a, v| a.country = v),
];

pub(crate) const PARTY_FIELDS: &[Field<Party>] = &[
    Field::Text("ID", |p, v| p.id = v.unwrap_or_default()),
    Field::Text("NAME", |p, v| p.name = v),
    Field::Text("IDENTIFIER TYPE", |p, v| p.identifier_type = v),
    Field::Text("IDENTIFIER", |p, v| p.identifier = v),
    Field::Text("VAT PREFIX", |p, v| p.vat_prefix = v),
    Field::Text("VAT", |p, v| p.vat = v),
    Field::Text("ADDRESS", |p, v| p.address_reference = v),
];

pub(crate) const ACCOUNT_FIELDS: &[Field<Account>] = &[
    Field::Text("ID", |a, v| a.id = v.unwrap_or_default()),
    Field::Text("ACCOUNT NUMBER", |a, v| a.account_number = v),
    Field::Text("BANK CODE", |a, v| a.bank_code = v),
    Field::Text("BANK NAME", |a, v| a.bank_name = v),
];

pub(crate) const METHOD_FIELDS: &[Field<Method>] = &[
    Field::Text("ID", |m, v| m.id = v.unwrap_or_default()),
    Field::Text("NAME", |m, v| m.name = v),
];

/// Invoice columns. Identifier columns are stored as references and resolved
/// against the metadata afterwards.
pub(crate) const INVOICE_FIELDS: &[Field<Invoice>] = &[
    Field::Text("INVOICE", |i, v| i.name = v.unwrap_or_default()),
    Field::Text("ISSUER", |i, v| i.references.issuer = v),
    Field::Text("RECIPIENT", |i, v| i.references.recipient = v),
    Field::Date("ISSUE DATE", |i, v| i.issue_date = v),
    Field::Date("TAX DATE", |i, v| i.tax_date = v),
    Field::Date("DUE DATE", |i, v| i.due_date = v),
    Field::Text("METHOD", |i, v| i.references.method = v),
    Field::Text("ACCOUNT", |i, v| i.references.account = v),
    Field::Text("VS", |i, v| i.vs = v),
    Field::Text("KS", |i, v| i.ks = v),
    Field::Text("SS", |i, v| i.ss = v),
    Field::Text("MESSAGE", |i, v| i.message = v),
    Field::Text("FLAG", |i, v| i.flag = v),
];

/// Item columns other than the `ITEM` name.
pub(crate) const ITEM_FIELDS: &[Field<Item>] = &[
    Field::Text("UNIT", |i, v| i.unit = v),
    Field::Decimal("QUANTITY", |i, v| i.quantity = v),
    Field::Money("UNIT PRICE", |i, v| i.unit_price = v),
    Field::Money("BASE PRICE", |i, v| i.base_price = v),
    Field::Decimal("VAT RATE", |i, v| i.vat_rate = v),
    Field::Money("VAT", |i, v| i.vat_price = v),
    Field::Money("TOTAL PRICE", |i, v| i.total_price = v),
    Field::Text("ITEM FLAG", |i, v| i.flag = v),
];

pub(crate) fn address(ctx: &RowContext) -> Result<Address, ParseError> {
    let mut address = Address::default();
    apply(&mut address, ADDRESS_FIELDS, ctx)?;
    Ok(address)
}

pub(crate) fn party(ctx: &RowContext) -> Result<Party, ParseError> {
    let mut party = Party::default();
    apply(&mut party, PARTY_FIELDS, ctx)?;
    Ok(party)
}

/// Account with its IBAN derived from bank code and account number.
pub(crate) fn account(ctx: &RowContext) -> Result<Account, ParseError> {
    let mut account = Account::default();
    apply(&mut account, ACCOUNT_FIELDS, ctx)?;

    if account.bank_code.is_some() || account.account_number.is_some() {
        let bank_code = account.bank_code.as_deref().unwrap_or("");
        let number = account.account_number.as_deref().unwrap_or("");
        let iban = czech_iban(bank_code, number).map_err(|source| ParseError::InvalidAccount {
            cell: ctx.location_of("ACCOUNT NUMBER"),
            id: account.id.clone(),
            source,
        })?;
        account.iban = Some(iban);
    }

    Ok(account)
}

pub(crate) fn method(ctx: &RowContext) -> Result<Method, ParseError> {
    let mut method = Method::default();
    apply(&mut method, METHOD_FIELDS, ctx)?;
    Ok(method)
}

/// Invoice fields of a data row, references still unresolved.
pub(crate) fn invoice(ctx: &RowContext) -> Result<Invoice, ParseError> {
    let mut invoice = Invoice::default();
    apply(&mut invoice, INVOICE_FIELDS, ctx)?;
    Ok(invoice)
}

/// Item of a row, `None` if its name is blank.
///
/// Other cells of a nameless row are not read, so separator rows never
/// trigger coercion errors.
pub(crate) fn item(ctx: &RowContext) -> Result<Option<Item>, ParseError> {
    let Some(name) = ctx.text("ITEM") else {
        return Ok(None);
    };
    let mut item = Item {
        name,
        ..Default::default()
    };
    apply(&mut item, ITEM_FIELDS, ctx)?;
    Ok(Some(item))
}
