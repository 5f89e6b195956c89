use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Postal address from the `ADDRESSES` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Issuer or recipient from the `PARTIES` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: Option<String>,
    /// Kind of the registration identifier (e.g. "IČO").
    pub identifier_type: Option<String>,
    pub identifier: Option<String>,
    /// Country prefix of the VAT number (e.g. "CZ").
    pub vat_prefix: Option<String>,
    pub vat: Option<String>,
    /// Address resolved from `address_reference` after the metadata scan.
    pub address: Option<Address>,
    /// Raw `ADDRESS` cell, an id into the addresses dictionary.
    #[serde(skip)]
    pub address_reference: Option<String>,
}

impl Party {
    /// VAT prefix and number joined, e.g. "CZ12345678".
    pub fn vat_id(&self) -> Option<String> {
        let vat = self.vat.as_deref()?;
        Some(format!("{}{}", self.vat_prefix.as_deref().unwrap_or(""), vat))
    }
}

/// Bank account from the `ACCOUNTS` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
    pub bank_name: Option<String>,
    /// IBAN in its printed form, groups of four separated by spaces.
    pub iban: Option<String>,
}

impl Account {
    /// IBAN in electronic form (no spaces).
    pub fn raw_iban(&self) -> Option<String> {
        self.iban
            .as_deref()
            .map(|iban| iban.chars().filter(|c| !c.is_whitespace()).collect())
    }
}

/// Payment method from the `METHODS` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub id: String,
    pub name: Option<String>,
}

/// Insertion-ordered key/value pairs from the `VARIABLES` section.
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.positions.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Variables::new();
        for (key, value) in iter {
            variables.insert(key, value);
        }
        variables
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Variables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VariablesVisitor;

        impl<'de> Visitor<'de> for VariablesVisitor {
            type Value = Variables;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of variable names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Variables, A::Error> {
                let mut variables = Variables::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    variables.insert(key, value);
                }
                Ok(variables)
            }
        }

        deserializer.deserialize_map(VariablesVisitor)
    }
}

/// Master data read from the root sheet. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub parties: HashMap<String, Party>,
    pub addresses: HashMap<String, Address>,
    pub accounts: HashMap<String, Account>,
    pub methods: HashMap<String, Method>,
    pub variables: Variables,
}

/// A single invoice line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Never blank: rows with a blank item name are not items.
    pub name: String,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub base_price: Option<Decimal>,
    /// VAT rate in percent.
    pub vat_rate: Option<Decimal>,
    pub vat_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub flag: Option<String>,
}

/// Identifiers an invoice row referred to, kept for validation of dangling references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceReferences {
    pub issuer: Option<String>,
    pub recipient: Option<String>,
    pub method: Option<String>,
    pub account: Option<String>,
}

/// An invoice with its resolved master data and line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number, also the business key.
    pub name: String,
    pub issuer: Option<Party>,
    pub recipient: Option<Party>,
    pub issue_date: Option<NaiveDate>,
    /// Date of taxable supply.
    pub tax_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub method: Option<Method>,
    pub account: Option<Account>,
    /// Variable symbol.
    pub vs: Option<String>,
    /// Constant symbol.
    pub ks: Option<String>,
    /// Specific symbol.
    pub ss: Option<String>,
    pub message: Option<String>,
    pub flag: Option<String>,
    /// Items in sheet row order.
    pub items: Vec<Item>,
    /// SPD payment string, set by [`Invoice::refresh`].
    pub payment_code: Option<String>,
    /// Rendered payment code image (SVG markup).
    pub payment_image: Option<String>,
    #[serde(skip)]
    pub references: InvoiceReferences,
}

/// Invoices found on one data sheet, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInvoices {
    pub name: String,
    pub invoices: Vec<Invoice>,
}

/// Result of parsing a whole workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedWorkbook {
    pub metadata: Metadata,
    pub sheets: Vec<SheetInvoices>,
}

impl ParsedWorkbook {
    /// Data sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&SheetInvoices> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// All invoices across sheets, in sheet order.
    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.sheets.iter().flat_map(|sheet| sheet.invoices.iter())
    }
}
