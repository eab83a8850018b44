//! NF-e record tree.
//!
//! Each struct mirrors one group of the NF-e layout and is a plain data
//! holder. Every leaf is `Option<FieldValue>` so an absent value stays
//! distinguishable from a present empty string or zero.

use serde::{Deserialize, Serialize};

use super::field::FieldValue;

/// Optional leaf value.
pub type Field = Option<FieldValue>;

/// A complete electronic invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nfe {
    /// Invoice information block.
    pub inf_nfe: InfNfe,
}

/// Invoice information block (`infNFe`), the header owning every group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfNfe {
    /// Canonical document id: `NFe` followed by the 44-digit access key.
    pub id: String,

    /// Identification.
    pub ide: Ide,

    /// Issuer.
    pub emit: Emit,

    /// Recipient.
    pub dest: Dest,

    /// Line items, in printed order.
    pub det: Vec<Det>,

    /// Totals.
    pub total: Total,

    /// Transport.
    pub transp: Transp,
}

/// Identification group (`ide`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ide {
    /// Invoice number (`nNF`).
    pub n_nf: Field,

    /// Series.
    pub serie: Field,

    /// Issuance date (`dEmi`), free-form.
    pub d_emi: Field,
}

/// Issuer group (`emit`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emit {
    /// Legal name (`xNome`).
    pub x_nome: Field,

    /// Company tax id.
    pub cnpj: Field,

    /// State registration (inscrição estadual).
    pub ie: Field,

    /// Address (`enderEmit`).
    pub ender_emit: Endereco,
}

/// Recipient group (`dest`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dest {
    /// Legal name (`xNome`).
    pub x_nome: Field,

    /// Company (CNPJ) or individual (CPF) tax id.
    pub cnpj_cpf: Field,

    /// State registration (inscrição estadual).
    pub ie: Field,

    /// Address (`enderDest`).
    pub ender_dest: Endereco,
}

/// Address shared by issuer and recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
    /// Street and number (`xLgr`).
    pub x_lgr: Field,

    /// District (`xBairro`).
    pub x_bairro: Field,

    /// Postal code.
    pub cep: Field,

    /// Municipality (`xMun`).
    pub x_mun: Field,

    /// State abbreviation.
    pub uf: Field,

    /// Phone number.
    pub fone: Field,
}

impl Endereco {
    /// Check if the address has any data.
    pub fn is_empty(&self) -> bool {
        self.x_lgr.is_none()
            && self.x_bairro.is_none()
            && self.cep.is_none()
            && self.x_mun.is_none()
            && self.uf.is_none()
            && self.fone.is_none()
    }

    /// Format address as a single line.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        for part in [&self.x_lgr, &self.x_bairro].into_iter().flatten() {
            parts.push(part.to_string());
        }
        match (&self.x_mun, &self.uf) {
            (Some(mun), Some(uf)) => parts.push(format!("{}/{}", mun, uf)),
            (Some(mun), None) => parts.push(mun.to_string()),
            (None, Some(uf)) => parts.push(uf.to_string()),
            (None, None) => {}
        }
        if let Some(cep) = &self.cep {
            parts.push(format!("CEP {}", cep));
        }
        if let Some(fone) = &self.fone {
            parts.push(format!("Tel. {}", fone));
        }
        parts.join(", ")
    }
}

/// A single line item (`det`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Det {
    /// Product data.
    pub prod: Prod,

    /// Taxes levied on the item.
    pub imposto: Imposto,
}

/// Product group (`prod`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prod {
    /// Product code (`cProd`).
    pub c_prod: Field,

    /// Description (`xProd`).
    pub x_prod: Field,

    /// Mercosur nomenclature code.
    pub ncm: Field,

    /// Fiscal operation code.
    pub cfop: Field,

    /// Commercial unit (`uCom`).
    pub u_com: Field,

    /// Commercial quantity (`qCom`).
    pub q_com: Field,

    /// Unit value (`vUnCom`).
    pub v_un_com: Field,

    /// Item total (`vProd`).
    pub v_prod: Field,
}

/// Tax group (`imposto`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Imposto {
    pub icms: Icms,
    pub ipi: Ipi,
    pub pis: Pis,
    pub cofins: Cofins,
}

/// Value-added tax on goods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icms {
    /// Tax situation code.
    pub cst: Field,

    /// Tax base (`vBC`).
    pub v_bc: Field,

    /// Rate (`pICMS`).
    pub p_icms: Field,

    /// Tax value (`vICMS`).
    pub v_icms: Field,
}

/// Excise tax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ipi {
    /// Rate (`pIPI`).
    pub p_ipi: Field,

    /// Tax value (`vIPI`).
    pub v_ipi: Field,
}

/// Social contribution (PIS). Not filled by the current mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pis {
    pub cst: Field,
    pub v_bc: Field,
    pub p_pis: Field,
    pub v_pis: Field,
}

/// Social contribution (COFINS). Not filled by the current mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cofins {
    pub cst: Field,
    pub v_bc: Field,
    pub p_cofins: Field,
    pub v_cofins: Field,
}

/// Totals group (`total`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Total {
    /// ICMS-based totals.
    pub icms_tot: IcmsTot,
}

/// ICMS totals (`ICMSTot`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IcmsTot {
    /// ICMS tax base.
    pub v_bc: Field,

    /// ICMS value.
    pub v_icms: Field,

    /// Products total.
    pub v_prod: Field,

    /// Freight.
    pub v_frete: Field,

    /// Insurance.
    pub v_seg: Field,

    /// Other expenses.
    pub v_outro: Field,

    /// IPI total.
    pub v_ipi: Field,

    /// Invoice grand total (`vNF`).
    pub v_nf: Field,
}

/// Transport group (`transp`).
///
/// Only `mod_frete` is mapped today; the carrier, vehicle and volume slots
/// exist so the record can hold every extracted transport field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transp {
    /// Freight modality (`modFrete`).
    pub mod_frete: Field,

    pub transporta: Transporta,

    pub veic_transp: Veiculo,

    pub vol: Volume,
}

/// Carrier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transporta {
    pub x_nome: Field,
    pub cnpj_cpf: Field,
    pub ie: Field,
    pub x_ender: Field,
    pub x_mun: Field,
    pub uf: Field,
}

/// Vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Veiculo {
    pub placa: Field,
    pub uf: Field,
}

/// Transported volumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume count.
    pub q_vol: Field,
    /// Kind of packaging.
    pub esp: Field,
    pub marca: Field,
    /// Volume numbering.
    pub n_vol: Field,
    /// Gross weight.
    pub peso_b: Field,
    /// Net weight.
    pub peso_l: Field,
}

impl Nfe {
    /// Create an empty record with every group default-initialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access key digits without the `NFe` prefix.
    pub fn access_key(&self) -> &str {
        crate::invoice::rules::access_key::strip_access_key_prefix(&self.inf_nfe.id)
    }

    /// Validate the record and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        crate::invoice::NfeValidator::new().validate(self)
    }
}
