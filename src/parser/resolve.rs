//! Identifier lookups against the scanned metadata.

use std::collections::HashMap;

use log::debug;

use crate::core::{Invoice, Metadata};

/// Attach each party's address by its `ADDRESS` reference.
///
/// Unknown references leave the address absent; `validate_references`
/// reports them.
pub fn resolve_addresses(metadata: &mut Metadata) {
    let Metadata {
        parties, addresses, ..
    } = metadata;

    for party in parties.values_mut() {
        party.address = lookup(addresses, &party.address_reference);
        if party.address.is_none() {
            if let Some(reference) = &party.address_reference {
                debug!("Party '{}' refers to unknown address '{}'.", party.id, reference);
            }
        }
    }
}

/// Fill issuer, recipient, method and account from the invoice's references.
pub fn resolve_invoice(invoice: &mut Invoice, metadata: &Metadata) {
    let references = &invoice.references;
    invoice.issuer = lookup(&metadata.parties, &references.issuer);
    invoice.recipient = lookup(&metadata.parties, &references.recipient);
    invoice.method = lookup(&metadata.methods, &references.method);
    invoice.account = lookup(&metadata.accounts, &references.account);
}

fn lookup<T: Clone>(records: &HashMap<String, T>, id: &Option<String>) -> Option<T> {
    id.as_ref().and_then(|id| records.get(id)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Account, Address, InvoiceReferences, Party};

    fn metadata() -> Metadata {
        let mut metadata = Metadata::default();
        metadata.addresses.insert(
            "A1".into(),
            Address {
                id: "A1".into(),
                street: Some("Main St".into()),
                ..Default::default()
            },
        );
        for (id, address) in [("P1", Some("A1")), ("P2", Some("A9")), ("P3", None)] {
            metadata.parties.insert(
                id.into(),
                Party {
                    id: id.into(),
                    address_reference: address.map(Into::into),
                    ..Default::default()
                },
            );
        }
        metadata.accounts.insert(
            "ACC".into(),
            Account {
                id: "ACC".into(),
                ..Default::default()
            },
        );
        metadata
    }

    #[test]
    fn addresses() {
        let mut metadata = metadata();
        resolve_addresses(&mut metadata);
        assert_eq!(
            metadata.parties["P1"].address.as_ref().and_then(|a| a.street.as_deref()),
            Some("Main St")
        );
        assert_eq!(metadata.parties["P2"].address, None);
        assert_eq!(metadata.parties["P3"].address, None);
    }

    #[test]
    fn invoice_references() {
        let metadata = metadata();
        let mut invoice = Invoice {
            references: InvoiceReferences {
                issuer: Some("P1".into()),
                recipient: Some("P7".into()),
                method: None,
                account: Some("ACC".into()),
            },
            ..Default::default()
        };
        resolve_invoice(&mut invoice, &metadata);

        assert_eq!(invoice.issuer.map(|p| p.id), Some("P1".into()));
        assert_eq!(invoice.recipient, None);
        assert_eq!(invoice.method, None);
        assert_eq!(invoice.account.map(|a| a.id), Some("ACC".into()));
    }
}
