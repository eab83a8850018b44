//! NF-e access key (chave de acesso) decoding and validation.

use serde::{Deserialize, Serialize};

use super::patterns::ACCESS_KEY_PATTERN;
use super::{digits_only, to_digits};
use crate::invoice::ACCESS_KEY_PREFIX;

/// Number of digits in an access key.
pub const ACCESS_KEY_LEN: usize = 44;

/// Components of a 44-digit access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    /// IBGE state code of the issuer (cUF).
    pub c_uf: String,
    /// Year and month of issuance, AAMM.
    pub year_month: String,
    /// Issuer CNPJ.
    pub cnpj: String,
    /// Document model (55 for NF-e, 65 for NFC-e).
    pub model: String,
    pub series: String,
    pub number: String,
    /// Emission type (tpEmis).
    pub emission_type: String,
    /// Random numeric code (cNF).
    pub numeric_code: String,
    pub check_digit: u32,
}

impl AccessKey {
    /// Split a key into its components.
    ///
    /// Accepts the `NFe` prefix and space-grouped keys. Does not check the
    /// check digit; see [`validate_access_key`].
    pub fn parse(key: &str) -> Option<Self> {
        let key = strip_access_key_prefix(key.trim());
        if !ACCESS_KEY_PATTERN.is_match(key) {
            return None;
        }

        let d = digits_only(key);
        if d.len() != ACCESS_KEY_LEN {
            return None;
        }

        Some(Self {
            c_uf: d[0..2].to_string(),
            year_month: d[2..6].to_string(),
            cnpj: d[6..20].to_string(),
            model: d[20..22].to_string(),
            series: d[22..25].to_string(),
            number: d[25..34].to_string(),
            emission_type: d[34..35].to_string(),
            numeric_code: d[35..43].to_string(),
            check_digit: d[43..44].parse().ok()?,
        })
    }

    /// State abbreviation for the key's IBGE code, if known.
    pub fn uf(&self) -> Option<&'static str> {
        uf_from_ibge(&self.c_uf)
    }

    /// Document model name for the key's model code.
    pub fn model_name(&self) -> Option<&'static str> {
        match self.model.as_str() {
            "55" => Some("NF-e"),
            "65" => Some("NFC-e"),
            _ => None,
        }
    }
}

/// Remove the `NFe` document-id prefix, if present.
pub fn strip_access_key_prefix(id: &str) -> &str {
    id.strip_prefix(ACCESS_KEY_PREFIX).unwrap_or(id)
}

/// Validate an access key's length and mod-11 check digit.
///
/// Weights 2..9 are applied right to left over the first 43 digits,
/// restarting at 2 after 9. A computed digit of 10 or 11 becomes 0.
pub fn validate_access_key(key: &str) -> bool {
    let key = strip_access_key_prefix(key.trim());
    if !ACCESS_KEY_PATTERN.is_match(key) {
        return false;
    }

    let digits = to_digits(&digits_only(key));
    if digits.len() != ACCESS_KEY_LEN {
        return false;
    }

    compute_check_digit(&digits[..ACCESS_KEY_LEN - 1]) == digits[ACCESS_KEY_LEN - 1]
}

/// Compute the check digit for the first 43 digits of a key.
fn compute_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2..=9).cycle())
        .map(|(d, w)| d * w)
        .sum();

    let digit = 11 - sum % 11;
    if digit >= 10 { 0 } else { digit }
}

fn uf_from_ibge(code: &str) -> Option<&'static str> {
    let uf = match code {
        "11" => "RO",
        "12" => "AC",
        "13" => "AM",
        "14" => "RR",
        "15" => "PA",
        "16" => "AP",
        "17" => "TO",
        "21" => "MA",
        "22" => "PI",
        "23" => "CE",
        "24" => "RN",
        "25" => "PB",
        "26" => "PE",
        "27" => "AL",
        "28" => "SE",
        "29" => "BA",
        "31" => "MG",
        "32" => "ES",
        "33" => "RJ",
        "35" => "SP",
        "41" => "PR",
        "42" => "SC",
        "43" => "RS",
        "50" => "MS",
        "51" => "MT",
        "52" => "GO",
        "53" => "DF",
        _ => return None,
    };
    Some(uf)
}
