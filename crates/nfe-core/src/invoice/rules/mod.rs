//! Rule helpers for Brazilian fiscal fields.

pub mod access_key;
pub mod amounts;
pub mod cnpj;
pub mod dates;
pub mod patterns;

pub use access_key::{strip_access_key_prefix, validate_access_key, AccessKey};
pub use amounts::{format_brl_amount, parse_brl_amount};
pub use cnpj::{format_cnpj, format_cpf, validate_cnpj, validate_cpf, validate_tax_id, TaxId};
pub use dates::parse_issue_date;

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Convert an all-digit string to its digit values.
pub(crate) fn to_digits(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}
