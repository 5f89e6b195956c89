//! IBAN derivation for Czech bank accounts.

use thiserror::Error;

/// Error returned when a bank code / account number pair cannot form an IBAN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot build IBAN from '{value}': {reason}")]
pub struct IbanError {
    /// The offending input.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

const COUNTRY_CODE: &str = "CZ";
const BANK_CODE_LEN: usize = 4;
const PREFIX_LEN: usize = 6;
const NUMBER_LEN: usize = 10;

/// Build the printed IBAN (`CZkk bbbb pppp ppnn nnnn nnnn`) from a bank code
/// and an account number.
///
/// The account number is either `prefix-number` (up to 6 and 10 digits) or up
/// to 16 plain digits. All parts are left-padded with zeros.
pub fn czech_iban(bank_code: &str, account_number: &str) -> Result<String, IbanError> {
    let bank_code = bank_code.trim();
    let account_number = account_number.trim();

    let bank = padded_digits(bank_code, BANK_CODE_LEN, "bank code")?;
    let account = match account_number.split_once('-') {
        Some((prefix, number)) => {
            let prefix = padded_digits(prefix, PREFIX_LEN, "account prefix")?;
            let number = padded_digits(number, NUMBER_LEN, "account number")?;
            format!("{prefix}{number}")
        }
        None => padded_digits(account_number, PREFIX_LEN + NUMBER_LEN, "account number")?,
    };
    if account.bytes().all(|b| b == b'0') {
        return Err(IbanError {
            value: account_number.into(),
            reason: "account number is empty or zero".into(),
        });
    }

    let bban = format!("{bank}{account}");
    let check = check_digits(COUNTRY_CODE, &bban);
    Ok(format_printed(&format!("{COUNTRY_CODE}{check:02}{bban}")))
}

fn padded_digits(value: &str, width: usize, what: &str) -> Result<String, IbanError> {
    let value = value.trim();
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(IbanError {
            value: value.into(),
            reason: format!("{what} must contain digits only"),
        });
    }
    if value.len() > width {
        return Err(IbanError {
            value: value.into(),
            reason: format!("{what} is longer than {width} digits"),
        });
    }
    Ok(format!("{value:0>width$}"))
}

/// ISO 7064 MOD 97-10 check digits for the given country and BBAN.
fn check_digits(country: &str, bban: &str) -> u32 {
    let rearranged = format!("{bban}{country}00");
    let remainder = rearranged.chars().fold(0u32, |acc, c| {
        let value = c.to_digit(36).unwrap_or(0);
        if value >= 10 {
            (acc * 100 + value) % 97
        } else {
            (acc * 10 + value) % 97
        }
    });
    98 - remainder
}

fn format_printed(iban: &str) -> String {
    let chars: Vec<char> = iban.chars().collect();
    chars
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
