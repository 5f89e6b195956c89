use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;

use super::ExportError;
use crate::core::{Account, Address, Invoice, Item, Method, Party};

fn xml_io(e: std::io::Error) -> ExportError {
    ExportError::Xml(e.to_string())
}

/// Indented XML writer with a UTF-8 declaration.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, ExportError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, ExportError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| ExportError::Xml(format!("invalid UTF-8: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, ExportError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ExportError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, ExportError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, ExportError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, ExportError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Text element, skipped when the value is absent.
    pub fn optional_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, ExportError> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(self),
        }
    }

    /// Monetary amount with a currency attribute, skipped when absent.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Option<Decimal>,
        currency: &str,
    ) -> Result<&mut Self, ExportError> {
        match amount {
            Some(amount) => self.text_element_with_attrs(
                name,
                &format_decimal(amount),
                &[("currency", currency)],
            ),
            None => Ok(self),
        }
    }

    /// Plain number (quantity, rate), skipped when absent.
    pub fn number_element(
        &mut self,
        name: &str,
        value: Option<Decimal>,
    ) -> Result<&mut Self, ExportError> {
        match value {
            Some(value) => self.text_element(name, &value.normalize().to_string()),
            None => Ok(self),
        }
    }
}

/// Format a Decimal for XML output: at least 2 decimal places, trailing zeros
/// beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

/// Serialize invoices into an `<invoices>` document.
///
/// Resolved parties, methods and accounts are written inline. Absent fields
/// produce no element.
pub fn to_xml(invoices: &[Invoice], currency: &str) -> Result<String, ExportError> {
    let mut w = XmlWriter::new()?;
    w.start_element("invoices")?;
    for invoice in invoices {
        write_invoice(&mut w, invoice, currency)?;
    }
    w.end_element("invoices")?;
    w.into_string()
}

fn write_invoice(w: &mut XmlWriter, invoice: &Invoice, currency: &str) -> Result<(), ExportError> {
    w.start_element_with_attrs("invoice", &[("name", invoice.name.as_str())])?;

    if let Some(issuer) = &invoice.issuer {
        write_party(w, "issuer", issuer)?;
    }
    if let Some(recipient) = &invoice.recipient {
        write_party(w, "recipient", recipient)?;
    }

    let dates = [
        ("issueDate", invoice.issue_date),
        ("taxDate", invoice.tax_date),
        ("dueDate", invoice.due_date),
    ];
    for (name, date) in dates {
        if let Some(date) = date {
            w.text_element(name, &date.format("%Y-%m-%d").to_string())?;
        }
    }

    if let Some(method) = &invoice.method {
        write_method(w, method)?;
    }
    if let Some(account) = &invoice.account {
        write_account(w, account)?;
    }

    w.optional_element("vs", invoice.vs.as_deref())?
        .optional_element("ks", invoice.ks.as_deref())?
        .optional_element("ss", invoice.ss.as_deref())?
        .optional_element("message", invoice.message.as_deref())?
        .optional_element("flag", invoice.flag.as_deref())?;

    w.start_element("items")?;
    for item in &invoice.items {
        write_item(w, item, currency)?;
    }
    w.end_element("items")?;

    w.amount_element("total", Some(invoice.total()), currency)?
        .optional_element("paymentCode", invoice.payment_code.as_deref())?;

    w.end_element("invoice")?;
    Ok(())
}

fn write_party(w: &mut XmlWriter, tag: &str, party: &Party) -> Result<(), ExportError> {
    w.start_element_with_attrs(tag, &[("id", party.id.as_str())])?
        .optional_element("name", party.name.as_deref())?
        .optional_element("identifierType", party.identifier_type.as_deref())?
        .optional_element("identifier", party.identifier.as_deref())?
        .optional_element("vatId", party.vat_id().as_deref())?;
    if let Some(address) = &party.address {
        write_address(w, address)?;
    }
    w.end_element(tag)?;
    Ok(())
}

fn write_address(w: &mut XmlWriter, address: &Address) -> Result<(), ExportError> {
    w.start_element_with_attrs("address", &[("id", address.id.as_str())])?
        .optional_element("street", address.street.as_deref())?
        .optional_element("houseNumber", address.house_number.as_deref())?
        .optional_element("city", address.city.as_deref())?
        .optional_element("district", address.district.as_deref())?
        .optional_element("zipCode", address.zip_code.as_deref())?
        .optional_element("country", address.country.as_deref())?
        .end_element("address")?;
    Ok(())
}

fn write_method(w: &mut XmlWriter, method: &Method) -> Result<(), ExportError> {
    w.start_element_with_attrs("method", &[("id", method.id.as_str())])?
        .optional_element("name", method.name.as_deref())?
        .end_element("method")?;
    Ok(())
}

fn write_account(w: &mut XmlWriter, account: &Account) -> Result<(), ExportError> {
    w.start_element_with_attrs("account", &[("id", account.id.as_str())])?
        .optional_element("accountNumber", account.account_number.as_deref())?
        .optional_element("bankCode", account.bank_code.as_deref())?
        .optional_element("bankName", account.bank_name.as_deref())?
        .optional_element("iban", account.iban.as_deref())?
        .end_element("account")?;
    Ok(())
}

fn write_item(w: &mut XmlWriter, item: &Item, currency: &str) -> Result<(), ExportError> {
    w.start_element("item")?
        .text_element("name", &item.name)?
        .optional_element("unit", item.unit.as_deref())?
        .number_element("quantity", item.quantity)?
        .amount_element("unitPrice", item.unit_price, currency)?
        .amount_element("basePrice", item.base_price, currency)?
        .number_element("vatRate", item.vat_rate)?
        .amount_element("vatPrice", item.vat_price, currency)?
        .amount_element("totalPrice", item.total_price, currency)?
        .optional_element("flag", item.flag.as_deref())?
        .end_element("item")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(100)), "100.00");
        assert_eq!(format_decimal(dec!(1500.0)), "1500.00");
        assert_eq!(format_decimal(dec!(49.90)), "49.90");
        assert_eq!(format_decimal(dec!(0.005)), "0.005");
    }

    #[test]
    fn escapes_text() {
        let mut w = XmlWriter::new().unwrap();
        w.text_element("message", "Tom & Jerry <s.r.o.>").unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.contains("<message>Tom &amp; Jerry &lt;s.r.o.&gt;</message>"));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let invoice = Invoice {
            name: "INV-1".into(),
            items: vec![Item {
                name: "Hosting".into(),
                quantity: Some(dec!(2.000)),
                total_price: Some(dec!(500)),
                ..Default::default()
            }],
            ..Default::default()
        };
        let xml = to_xml(&[invoice], "CZK").unwrap();
        assert!(xml.contains(r#"<invoice name="INV-1">"#));
        assert!(xml.contains("<quantity>2</quantity>"));
        assert!(xml.contains(r#"<totalPrice currency="CZK">500.00</totalPrice>"#));
        assert!(xml.contains(r#"<total currency="CZK">500.00</total>"#));
        assert!(!xml.contains("<issuer"));
        assert!(!xml.contains("<unitPrice"));
    }
}
