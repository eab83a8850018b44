//! Post-mapping validation of an NF-e record.
//!
//! The mapper treats every field as optional. Required-field and identifier
//! checks happen here, after mapping, and only report issues.

use tracing::debug;

use crate::models::config::ValidationConfig;
use crate::models::field::FieldValue;
use crate::models::nfe::Nfe;

use super::rules::{
    digits_only, parse_issue_date, validate_access_key, validate_cnpj, validate_tax_id, AccessKey,
};

/// Collects validation issues for a mapped record.
#[derive(Debug, Clone)]
pub struct NfeValidator {
    /// Whether to check CNPJ/CPF check digits.
    validate_cnpj: bool,
    /// Whether to check the access key check digit.
    validate_access_key: bool,
}

impl NfeValidator {
    /// Create a validator with every check enabled.
    pub fn new() -> Self {
        Self {
            validate_cnpj: true,
            validate_access_key: true,
        }
    }

    /// Create a validator from configuration.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new()
            .with_cnpj_validation(config.validate_cnpj)
            .with_access_key_validation(config.validate_access_key)
    }

    /// Set CNPJ/CPF validation.
    pub fn with_cnpj_validation(mut self, validate: bool) -> Self {
        self.validate_cnpj = validate;
        self
    }

    /// Set access key validation.
    pub fn with_access_key_validation(mut self, validate: bool) -> Self {
        self.validate_access_key = validate;
        self
    }

    /// Validate the record and return any issues found.
    pub fn validate(&self, nfe: &Nfe) -> Vec<String> {
        let inf = &nfe.inf_nfe;
        let mut issues = Vec::new();

        if is_blank(&inf.ide.n_nf) {
            issues.push("Missing invoice number".to_string());
        }

        if let Some(d_emi) = &inf.ide.d_emi {
            if text_of(d_emi).and_then(|s| parse_issue_date(&s)).is_none() {
                issues.push(format!("Unrecognized issue date: {}", d_emi));
            }
        }

        if is_blank(&inf.emit.x_nome) {
            issues.push("Missing issuer name".to_string());
        }

        match &inf.emit.cnpj {
            None => issues.push("Missing issuer CNPJ".to_string()),
            Some(cnpj) if self.validate_cnpj => {
                if !text_of(cnpj).is_some_and(|s| validate_cnpj(&s)) {
                    issues.push(format!("Invalid issuer CNPJ: {}", cnpj));
                }
            }
            Some(_) => {}
        }

        if let Some(id) = &inf.dest.cnpj_cpf {
            if self.validate_cnpj && text_of(id).and_then(|s| validate_tax_id(&s)).is_none() {
                issues.push(format!("Invalid recipient CNPJ/CPF: {}", id));
            }
        }

        let key = nfe.access_key();
        if key.is_empty() {
            issues.push("Missing access key".to_string());
        } else if self.validate_access_key {
            match AccessKey::parse(key).filter(|_| validate_access_key(key)) {
                Some(decoded) => issues.extend(cross_check(&decoded, nfe)),
                None => issues.push(format!("Invalid access key: {}", key)),
            }
        }

        if inf.det.is_empty() {
            issues.push("No line items".to_string());
        }

        if inf.total.icms_tot.v_nf.is_none() {
            issues.push("Missing invoice total".to_string());
        }

        debug!("Validation found {} issues", issues.len());

        issues
    }
}

impl Default for NfeValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare the fields encoded in the access key with the mapped ones.
///
/// Fields absent from the record are not reported here.
fn cross_check(key: &AccessKey, nfe: &Nfe) -> Vec<String> {
    let inf = &nfe.inf_nfe;
    let mut issues = Vec::new();

    if let Some(cnpj) = inf.emit.cnpj.as_ref().and_then(text_of) {
        if digits_only(&cnpj) != key.cnpj {
            issues.push(format!(
                "Access key CNPJ {} does not match issuer CNPJ {}",
                key.cnpj, cnpj
            ));
        }
    }

    if let Some(number) = inf.ide.n_nf.as_ref().and_then(text_of) {
        if !same_number(&number, &key.number) {
            issues.push(format!(
                "Access key number {} does not match invoice number {}",
                key.number, number
            ));
        }
    }

    if let Some(serie) = inf.ide.serie.as_ref().and_then(text_of) {
        if !same_number(&serie, &key.series) {
            issues.push(format!(
                "Access key series {} does not match series {}",
                key.series, serie
            ));
        }
    }

    issues
}

// Keys zero-pad number and series; "12345" matches "000012345".
fn same_number(field: &str, encoded: &str) -> bool {
    let field = digits_only(field);
    !field.is_empty() && field.trim_start_matches('0') == encoded.trim_start_matches('0')
}

fn is_blank(field: &Option<FieldValue>) -> bool {
    match field {
        None => true,
        Some(FieldValue::Text(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

// Ids and dates sometimes come back as JSON numbers.
fn text_of(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Number(n) if n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceMapper, JsonToNfeMapper};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn complete() -> serde_json::Value {
        json!({
            "ide": {"numero_nf": "12345", "serie": "1", "data_emissao": "15/10/2021"},
            "emitente": {"nome": "EMPRESA EMITENTE LTDA", "cnpj": "11222333000181"},
            "destinatario": {"nome": "JOAO DA SILVA", "cnpj_cpf": "529.982.247-25"},
            "itens": [{"descricao": "PRODUTO", "quantidade": 1.0}],
            "totais": {"valor_total_nf": 10.0},
            "chave_acesso": "43211011222333000181550010000123451000000009"
        })
    }

    #[test]
    fn test_complete_record_has_no_issues() {
        let nfe = JsonToNfeMapper::new().map(&complete()).unwrap();
        assert_eq!(nfe.validate(), Vec::<String>::new());
    }

    #[test]
    fn test_empty_record_issues() {
        let nfe = JsonToNfeMapper::new().map(&json!({})).unwrap();
        assert_eq!(
            nfe.validate(),
            vec![
                "Missing invoice number",
                "Missing issuer name",
                "Missing issuer CNPJ",
                "Missing access key",
                "No line items",
                "Missing invoice total",
            ]
        );
    }

    #[test]
    fn test_invalid_identifiers() {
        let mut input = complete();
        input["emitente"]["cnpj"] = json!("11222333000144");
        input["destinatario"]["cnpj_cpf"] = json!("123");
        input["chave_acesso"] = json!("43211011222333000181550010000123451000000008");
        input["ide"]["data_emissao"] = json!("ontem");

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        assert_eq!(
            nfe.validate(),
            vec![
                "Unrecognized issue date: ontem",
                "Invalid issuer CNPJ: 11222333000144",
                "Invalid recipient CNPJ/CPF: 123",
                "Invalid access key: 43211011222333000181550010000123451000000008",
            ]
        );
    }

    #[test]
    fn test_checks_can_be_disabled() {
        let mut input = complete();
        input["emitente"]["cnpj"] = json!("11222333000144");
        input["chave_acesso"] = json!("123");

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        let validator = NfeValidator::new()
            .with_cnpj_validation(false)
            .with_access_key_validation(false);
        assert!(validator.validate(&nfe).is_empty());
    }

    #[test]
    fn test_access_key_cross_check() {
        let mut input = complete();
        // Valid key, but encoding CNPJ 11222333000144, number 12346 and series 2.
        input["chave_acesso"] = json!("43211011222333000144550020000123461000000005");

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        assert_eq!(
            nfe.validate(),
            vec![
                "Access key CNPJ 11222333000144 does not match issuer CNPJ 11222333000181",
                "Access key number 000012346 does not match invoice number 12345",
                "Access key series 002 does not match series 1",
            ]
        );
    }

    #[test]
    fn test_cross_check_skips_absent_fields() {
        let mut input = complete();
        input["ide"] = json!({});
        input["emitente"] = json!({"nome": "EMPRESA EMITENTE LTDA", "cnpj": null});

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        assert_eq!(nfe.validate(), vec!["Missing invoice number", "Missing issuer CNPJ"]);
    }

    #[test]
    fn test_cross_check_accepts_numeric_fields() {
        let mut input = complete();
        input["ide"]["numero_nf"] = json!(12345);
        input["ide"]["serie"] = json!(1);

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        assert!(nfe.validate().is_empty());
    }

    #[test]
    fn test_numeric_cnpj_is_accepted() {
        let mut input = complete();
        input["emitente"]["cnpj"] = json!(11222333000181u64);

        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        assert!(nfe.validate().is_empty());
    }
}
