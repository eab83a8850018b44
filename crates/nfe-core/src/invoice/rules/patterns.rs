//! Common regex patterns for NF-e field rules.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CNPJ: bare digits or XX.XXX.XXX/XXXX-XX
    pub static ref CNPJ_PATTERN: Regex = Regex::new(
        r"^([0-9]{2})\.?([0-9]{3})\.?([0-9]{3})/?([0-9]{4})-?([0-9]{2})$"
    ).unwrap();

    // CPF: bare digits or XXX.XXX.XXX-XX
    pub static ref CPF_PATTERN: Regex = Regex::new(
        r"^([0-9]{3})\.?([0-9]{3})\.?([0-9]{3})-?([0-9]{2})$"
    ).unwrap();

    // Access key: 44 ASCII digits, optionally grouped by spaces as printed on the DANFE
    pub static ref ACCESS_KEY_PATTERN: Regex = Regex::new(
        r"^(?:[0-9] ?){43}[0-9]$"
    ).unwrap();

    // Dates: DD/MM/AAAA (also with '.' or '-') and ISO AAAA-MM-DD
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^([0-9]{1,2})[./\-]([0-9]{1,2})[./\-]([0-9]{4})$"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:[T ].*)?$"
    ).unwrap();

    // Amounts: optional R$ prefix, digits with '.' or ',' separators
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"^(?:R\$\s*)?-?[0-9., ]+$"
    ).unwrap();
}
