use super::error::ValidationError;
use super::types::*;

/// Report dangling references left by parsing.
///
/// Parsing resolves identifiers leniently: an unknown party, method, account
/// or address id yields an absent value. This pass lists every such miss so
/// callers can reject affected invoices. Returns all findings, not just the first.
pub fn validate_references(metadata: &Metadata, invoices: &[Invoice]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut party_ids: Vec<&String> = metadata.parties.keys().collect();
    party_ids.sort();
    for id in party_ids {
        let party = &metadata.parties[id];
        if party.address.is_some() {
            continue;
        }
        if let Some(reference) = &party.address_reference {
            errors.push(ValidationError::with_rule(
                format!("parties.{id}.address"),
                format!("unknown address '{reference}'"),
                "REF-ADDRESS",
            ));
        }
    }

    for invoice in invoices {
        validate_invoice(invoice, &mut errors);
    }

    errors
}

fn validate_invoice(invoice: &Invoice, errors: &mut Vec<ValidationError>) {
    let refs = &invoice.references;
    let checks: [(&str, &Option<String>, bool, &str); 4] = [
        ("issuer", &refs.issuer, invoice.issuer.is_some(), "REF-ISSUER"),
        ("recipient", &refs.recipient, invoice.recipient.is_some(), "REF-RECIPIENT"),
        ("method", &refs.method, invoice.method.is_some(), "REF-METHOD"),
        ("account", &refs.account, invoice.account.is_some(), "REF-ACCOUNT"),
    ];

    for (field, reference, resolved, rule) in checks {
        if resolved {
            continue;
        }
        if let Some(reference) = reference {
            errors.push(ValidationError::with_rule(
                format!("{}.{field}", invoice.name),
                format!("unknown {field} '{reference}'"),
                rule,
            ));
        }
    }
}
