//! Core invoice types, configuration, and post-parse processing.
//!
//! This module holds the domain model produced by the parser together with
//! the pieces that operate on it after a scan: IBAN derivation, payment codes,
//! and reference validation.

mod config;
mod error;
pub mod iban;
mod payment;
mod types;
mod validation;

pub use config::*;
pub use error::*;
pub use iban::{IbanError, czech_iban};
pub use payment::{PaymentImageRenderer, SPD_HEADER, payment_code};
pub use types::*;
pub use validation::*;
