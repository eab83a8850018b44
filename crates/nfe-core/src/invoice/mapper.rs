//! Mapper from model-extracted JSON to the NF-e record.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::MappingError;
use crate::models::field::{json_kind, FieldValue};
use crate::models::nfe::*;

use super::{InvoiceMapper, Result};

/// Literal prepended to the access key to form the document id.
pub const ACCESS_KEY_PREFIX: &str = "NFe";

/// Faults hit while walking the input. Surfaced as [`MappingError::Fault`].
#[derive(Debug, Error)]
enum Fault {
    #[error("group '{group}' must be a mapping, found {found}")]
    GroupNotMapping {
        group: &'static str,
        found: &'static str,
    },

    #[error("'{key}' must be a sequence, found {found}")]
    NotSequence {
        key: &'static str,
        found: &'static str,
    },

    #[error("item {index} must be a mapping, found {found}")]
    ItemNotMapping { index: usize, found: &'static str },
}

/// Optional-lookup view over one input group. A missing group reads as empty.
#[derive(Clone, Copy)]
struct Group<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl Group<'_> {
    fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields
            .and_then(|fields| fields.get(key))
            .and_then(FieldValue::from_json)
    }
}

fn group<'a>(
    input: &'a Map<String, Value>,
    key: &'static str,
) -> std::result::Result<Group<'a>, Fault> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(Group { fields: None }),
        Some(Value::Object(fields)) => Ok(Group {
            fields: Some(fields),
        }),
        Some(other) => Err(Fault::GroupNotMapping {
            group: key,
            found: json_kind(other),
        }),
    }
}

fn sequence<'a>(
    input: &'a Map<String, Value>,
    key: &'static str,
) -> std::result::Result<&'a [Value], Fault> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(Fault::NotSequence {
            key,
            found: json_kind(other),
        }),
    }
}

/// Converts the extraction client's JSON into an [`Nfe`].
///
/// Every leaf is looked up by its own key; an absent or `null` key leaves
/// the slot `None`. Values are carried through without coercion. The mapper
/// holds no state, so one instance can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonToNfeMapper;

impl JsonToNfeMapper {
    /// Create a new mapper.
    pub fn new() -> Self {
        Self
    }

    fn build(&self, input: &Map<String, Value>) -> std::result::Result<Nfe, Fault> {
        let mut nfe = Nfe::new();
        let inf = &mut nfe.inf_nfe;

        self.map_ide(group(input, "ide")?, &mut inf.ide);
        self.map_emit(group(input, "emitente")?, &mut inf.emit);
        self.map_dest(group(input, "destinatario")?, &mut inf.dest);

        inf.det = sequence(input, "itens")?
            .iter()
            .enumerate()
            .map(|(index, item)| self.map_item(index, item))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Mapped {} line items", inf.det.len());

        self.map_total(group(input, "totais")?, &mut inf.total);
        self.map_transp(group(input, "transporte")?, &mut inf.transp);

        let key = input
            .get("chave_acesso")
            .and_then(FieldValue::from_json)
            .map(|v| v.to_string())
            .unwrap_or_default();
        inf.id = format!("{}{}", ACCESS_KEY_PREFIX, key);

        Ok(nfe)
    }

    fn map_ide(&self, data: Group<'_>, ide: &mut Ide) {
        ide.n_nf = data.get("numero_nf");
        ide.serie = data.get("serie");
        ide.d_emi = data.get("data_emissao");
    }

    fn map_emit(&self, data: Group<'_>, emit: &mut Emit) {
        emit.x_nome = data.get("nome");
        emit.cnpj = data.get("cnpj");
        emit.ie = data.get("ie");
        self.map_address(data, &mut emit.ender_emit);
    }

    fn map_dest(&self, data: Group<'_>, dest: &mut Dest) {
        dest.x_nome = data.get("nome");
        dest.cnpj_cpf = data.get("cnpj_cpf");
        dest.ie = data.get("ie");
        self.map_address(data, &mut dest.ender_dest);
    }

    fn map_address(&self, data: Group<'_>, address: &mut Endereco) {
        address.x_lgr = data.get("endereco");
        address.x_bairro = data.get("bairro");
        address.cep = data.get("cep");
        address.x_mun = data.get("municipio");
        address.uf = data.get("uf");
        address.fone = data.get("telefone");
    }

    fn map_item(&self, index: usize, value: &Value) -> std::result::Result<Det, Fault> {
        let data = match value {
            Value::Object(fields) => Group {
                fields: Some(fields),
            },
            other => {
                return Err(Fault::ItemNotMapping {
                    index,
                    found: json_kind(other),
                });
            }
        };

        let mut det = Det::default();

        let prod = &mut det.prod;
        prod.c_prod = data.get("codigo_produto");
        prod.x_prod = data.get("descricao");
        prod.ncm = data.get("ncm");
        prod.cfop = data.get("cfop");
        prod.u_com = data.get("unidade");
        prod.q_com = data.get("quantidade");
        prod.v_un_com = data.get("valor_unitario");
        prod.v_prod = data.get("valor_total");

        let imposto = &mut det.imposto;
        imposto.icms.cst = data.get("cst");
        imposto.icms.v_bc = data.get("base_calculo_icms");
        imposto.icms.v_icms = data.get("valor_icms");
        imposto.icms.p_icms = data.get("aliquota_icms");
        imposto.ipi.v_ipi = data.get("valor_ipi");
        imposto.ipi.p_ipi = data.get("aliquota_ipi");

        Ok(det)
    }

    fn map_total(&self, data: Group<'_>, total: &mut Total) {
        let tot = &mut total.icms_tot;
        tot.v_bc = data.get("base_calculo_icms");
        tot.v_icms = data.get("valor_icms");
        tot.v_prod = data.get("valor_total_produtos");
        tot.v_frete = data.get("valor_frete");
        tot.v_seg = data.get("valor_seguro");
        tot.v_outro = data.get("outras_despesas");
        tot.v_ipi = data.get("valor_total_ipi");
        tot.v_nf = data.get("valor_total_nf");
    }

    fn map_transp(&self, data: Group<'_>, transp: &mut Transp) {
        // Carrier, vehicle and volume slots stay empty for now.
        transp.mod_frete = data.get("modalidade_frete");
    }
}

impl InvoiceMapper for JsonToNfeMapper {
    fn map(&self, input: &Value) -> Result<Nfe> {
        let Value::Object(fields) = input else {
            return Err(MappingError::NotAMapping);
        };

        info!("Mapping extracted JSON ({} top-level keys)", fields.len());

        let nfe = self
            .build(fields)
            .map_err(|fault| MappingError::Fault(fault.to_string()))?;

        info!("Mapping complete: {}", nfe.inf_nfe.id);
        Ok(nfe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_non_mapping_input() {
        let mapper = JsonToNfeMapper::new();
        for input in [json!("not a mapping"), json!([1, 2]), json!(42), Value::Null] {
            assert_eq!(mapper.map(&input), Err(MappingError::NotAMapping));
        }
    }

    #[test]
    fn test_empty_mapping() {
        let nfe = JsonToNfeMapper::new().map(&json!({})).unwrap();

        assert_eq!(nfe.inf_nfe.id, "NFe");
        assert!(nfe.inf_nfe.det.is_empty());

        let mut expected = Nfe::new();
        expected.inf_nfe.id = "NFe".to_string();
        assert_eq!(nfe, expected);
    }

    #[test]
    fn test_null_is_treated_as_absent() {
        let input = json!({
            "ide": null,
            "itens": null,
            "emitente": {"nome": null, "cnpj": "11222333000181"},
            "chave_acesso": null
        });
        let nfe = JsonToNfeMapper::new().map(&input).unwrap();

        assert_eq!(nfe.inf_nfe.ide.n_nf, None);
        assert!(nfe.inf_nfe.det.is_empty());
        assert_eq!(nfe.inf_nfe.emit.x_nome, None);
        assert_eq!(nfe.inf_nfe.emit.cnpj, Some("11222333000181".into()));
        assert_eq!(nfe.inf_nfe.id, "NFe");
    }

    #[test]
    fn test_group_of_wrong_kind_is_a_fault() {
        let err = JsonToNfeMapper::new()
            .map(&json!({"emitente": "EMPRESA"}))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::Fault("group 'emitente' must be a mapping, found string".to_string())
        );
    }

    #[test]
    fn test_items_of_wrong_kind_is_a_fault() {
        let err = JsonToNfeMapper::new()
            .map(&json!({"itens": {"descricao": "X"}}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected error during mapping: 'itens' must be a sequence, found mapping"
        );
    }

    #[test]
    fn test_item_of_wrong_kind_is_a_fault() {
        let err = JsonToNfeMapper::new()
            .map(&json!({"itens": [{"descricao": "A"}, "B"]}))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::Fault("item 1 must be a mapping, found string".to_string())
        );
    }

    #[test]
    fn test_values_are_not_coerced() {
        let input = json!({
            "ide": {"numero_nf": 12345},
            "totais": {"valor_total_nf": "150,00", "valor_frete": 0}
        });
        let nfe = JsonToNfeMapper::new().map(&input).unwrap();

        assert_eq!(nfe.inf_nfe.ide.n_nf, Some(FieldValue::from(12345)));
        assert_eq!(nfe.inf_nfe.total.icms_tot.v_nf, Some("150,00".into()));
        assert_eq!(nfe.inf_nfe.total.icms_tot.v_frete, Some(FieldValue::from(0)));
        assert_eq!(nfe.inf_nfe.total.icms_tot.v_seg, None);
    }

    #[test]
    fn test_numeric_access_key_is_stringified() {
        let nfe = JsonToNfeMapper::new()
            .map(&json!({"chave_acesso": 123}))
            .unwrap();
        assert_eq!(nfe.inf_nfe.id, "NFe123");
    }

    #[test]
    fn test_item_taxes() {
        let input = json!({
            "itens": [{
                "cst": "00",
                "base_calculo_icms": 100.0,
                "valor_icms": 18.0,
                "aliquota_icms": 18.0,
                "valor_ipi": 5.0,
                "aliquota_ipi": 5.0
            }]
        });
        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        let imposto = &nfe.inf_nfe.det[0].imposto;

        assert_eq!(imposto.icms.cst, Some("00".into()));
        assert_eq!(imposto.icms.v_icms.as_ref().and_then(FieldValue::as_f64), Some(18.0));
        assert_eq!(imposto.ipi.p_ipi.as_ref().and_then(FieldValue::as_f64), Some(5.0));
        assert_eq!(imposto.pis, Pis::default());
        assert_eq!(imposto.cofins, Cofins::default());
    }

    #[test]
    fn test_transport_only_maps_freight_modality() {
        let input = json!({
            "transporte": {
                "modalidade_frete": "0",
                "transportador_nome": "TRANSPORTADORA XYZ",
                "veiculo_placa": "ABC1D23",
                "quantidade_volumes": 3,
                "peso_bruto": 12.5
            }
        });
        let nfe = JsonToNfeMapper::new().map(&input).unwrap();
        let transp = &nfe.inf_nfe.transp;

        assert_eq!(transp.mod_frete, Some("0".into()));
        assert_eq!(transp.transporta, Transporta::default());
        assert_eq!(transp.veic_transp, Veiculo::default());
        assert_eq!(transp.vol, Volume::default());
    }
}
