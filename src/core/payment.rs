//! Czech "Short Payment Descriptor" (SPD) payment codes.
//!
//! The payload is a `*`-separated list of `KEY:value` pairs that banking apps
//! read from a QR code, e.g.
//! `SPD*1.0*ACC:CZ6508000000192000145399*AM:1500.00*CC:CZK*X-VS:2026001*`.

use rust_decimal::Decimal;

use super::types::Invoice;

/// SPD header including the format version.
pub const SPD_HEADER: &str = "SPD*1.0*";

/// Renders a payment code into an image (SVG markup).
pub trait PaymentImageRenderer {
    fn render(&self, payment_code: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

impl Invoice {
    /// Sum of item total prices. Items without a total count as zero.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .filter_map(|item| item.total_price)
            .sum()
    }

    /// Recompute the payment code from the current items.
    pub fn refresh(&mut self, currency: &str) {
        self.payment_code = Some(payment_code(self, currency));
    }

    /// Recompute the payment code and render its image.
    pub fn refresh_with(
        &mut self,
        currency: &str,
        renderer: &dyn PaymentImageRenderer,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let code = payment_code(self, currency);
        self.payment_image = Some(renderer.render(&code)?);
        self.payment_code = Some(code);
        Ok(())
    }
}

/// Build the SPD payload for an invoice. Absent or blank fields are omitted.
pub fn payment_code(invoice: &Invoice, currency: &str) -> String {
    let mut code = String::from(SPD_HEADER);

    if let Some(iban) = invoice.account.as_ref().and_then(|a| a.raw_iban()) {
        push_field(&mut code, "ACC", &iban);
    }
    push_field(&mut code, "AM", &format!("{:.2}", invoice.total().round_dp(2)));
    push_field(&mut code, "CC", currency);
    if let Some(message) = &invoice.message {
        push_field(&mut code, "MSG", message);
    }
    if let Some(due) = invoice.due_date {
        push_field(&mut code, "DT", &due.format("%Y%m%d").to_string());
    }
    if let Some(vs) = &invoice.vs {
        push_field(&mut code, "X-VS", vs);
    }
    if let Some(ss) = &invoice.ss {
        push_field(&mut code, "X-SS", ss);
    }
    if let Some(ks) = &invoice.ks {
        push_field(&mut code, "X-KS", ks);
    }

    code
}

fn push_field(code: &mut String, key: &str, value: &str) {
    let value: String = value.trim().chars().filter(|&c| c != '*').collect();
    if value.is_empty() {
        return;
    }
    code.push_str(key);
    code.push(':');
    code.push_str(&value);
    code.push('*');
}
