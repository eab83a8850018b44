//! CNPJ and CPF (Brazilian company and individual tax ids) validation.

use super::patterns::{CNPJ_PATTERN, CPF_PATTERN};
use super::{digits_only, to_digits};

/// A validated taxpayer id, digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxId {
    /// Company id (14 digits).
    Cnpj(String),
    /// Individual id (11 digits).
    Cpf(String),
}

/// Validate a CNPJ using its two mod-11 check digits.
///
/// Accepts bare digits or the `XX.XXX.XXX/XXXX-XX` layout.
/// Weights: 5,4,3,2,9,8,7,6,5,4,3,2 then 6,5,4,3,2,9,8,7,6,5,4,3,2
pub fn validate_cnpj(cnpj: &str) -> bool {
    let cnpj = cnpj.trim();
    if !CNPJ_PATTERN.is_match(cnpj) {
        return false;
    }

    let digits = to_digits(&digits_only(cnpj));
    if digits.len() != 14 || all_same(&digits) {
        return false;
    }

    let first = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let second = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    check_digit(&digits[..12], &first) == digits[12]
        && check_digit(&digits[..13], &second) == digits[13]
}

/// Validate a CPF using its two mod-11 check digits.
///
/// Accepts bare digits or the `XXX.XXX.XXX-XX` layout.
pub fn validate_cpf(cpf: &str) -> bool {
    let cpf = cpf.trim();
    if !CPF_PATTERN.is_match(cpf) {
        return false;
    }

    let digits = to_digits(&digits_only(cpf));
    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    let first = [10, 9, 8, 7, 6, 5, 4, 3, 2];
    let second = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

    check_digit(&digits[..9], &first) == digits[9]
        && check_digit(&digits[..10], &second) == digits[10]
}

/// Classify and validate an id that may be either a CNPJ or a CPF.
pub fn validate_tax_id(id: &str) -> Option<TaxId> {
    let digits = digits_only(id);
    match digits.len() {
        14 if validate_cnpj(id) => Some(TaxId::Cnpj(digits)),
        11 if validate_cpf(id) => Some(TaxId::Cpf(digits)),
        _ => None,
    }
}

/// Format CNPJ as XX.XXX.XXX/XXXX-XX.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = digits_only(cnpj);

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

/// Format CPF as XXX.XXX.XXX-XX.
pub fn format_cpf(cpf: &str) -> String {
    let digits = digits_only(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

// Sequences like 000.000.000-00 pass the arithmetic but are never issued.
fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}
