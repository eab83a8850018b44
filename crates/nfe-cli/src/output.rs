//! Output formatting for mapped records.

use nfe_core::invoice::rules::{
    format_brl_amount, format_cnpj, format_cpf, validate_tax_id, AccessKey, TaxId,
};
use nfe_core::models::nfe::Endereco;
use nfe_core::{FieldValue, Nfe};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
    /// Structural dump of the record
    Debug,
}

impl OutputFormat {
    /// Parse the format name stored in the config file.
    pub fn from_config(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            "text" | "txt" => Some(OutputFormat::Text),
            "debug" => Some(OutputFormat::Debug),
            _ => None,
        }
    }

    /// File extension for written outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text | OutputFormat::Debug => "txt",
        }
    }
}

pub fn format_nfe(nfe: &Nfe, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(nfe)?),
        OutputFormat::Json => Ok(serde_json::to_string(nfe)?),
        OutputFormat::Csv => format_csv(nfe),
        OutputFormat::Text => Ok(format_text(nfe)),
        OutputFormat::Debug => Ok(format!("{:#?}", nfe)),
    }
}

/// Header row shared by per-file CSV output.
pub const CSV_HEADER: [&str; 10] = [
    "access_key",
    "number",
    "series",
    "issue_date",
    "issuer_name",
    "issuer_cnpj",
    "recipient_name",
    "recipient_cnpj_cpf",
    "items",
    "total",
];

/// One CSV row for a record, matching [`CSV_HEADER`].
pub fn csv_row(nfe: &Nfe) -> Vec<String> {
    let inf = &nfe.inf_nfe;
    vec![
        nfe.access_key().to_string(),
        raw(&inf.ide.n_nf),
        raw(&inf.ide.serie),
        raw(&inf.ide.d_emi),
        raw(&inf.emit.x_nome),
        raw(&inf.emit.cnpj),
        raw(&inf.dest.x_nome),
        raw(&inf.dest.cnpj_cpf),
        inf.det.len().to_string(),
        raw(&inf.total.icms_tot.v_nf),
    ]
}

fn format_csv(nfe: &Nfe) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(nfe))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(nfe: &Nfe) -> String {
    let inf = &nfe.inf_nfe;
    let mut output = String::new();

    output.push_str(&format!("NF-e: {}\n", inf.id));
    if let Some(key) = AccessKey::parse(nfe.access_key()) {
        output.push_str(&format!(
            "Model: {}  State: {}  Period: {}\n",
            key.model_name().unwrap_or(key.model.as_str()),
            key.uf().unwrap_or(key.c_uf.as_str()),
            key.year_month
        ));
    }
    output.push_str(&format!(
        "Number: {}  Series: {}  Issued: {}\n",
        show(&inf.ide.n_nf),
        show(&inf.ide.serie),
        show(&inf.ide.d_emi)
    ));
    output.push('\n');

    output.push_str("Issuer:\n");
    output.push_str(&format!("  {}\n", show(&inf.emit.x_nome)));
    output.push_str(&format!("  CNPJ: {}\n", tax_id(&inf.emit.cnpj)));
    push_address(&mut output, &inf.emit.ender_emit);
    output.push('\n');

    output.push_str("Recipient:\n");
    output.push_str(&format!("  {}\n", show(&inf.dest.x_nome)));
    output.push_str(&format!("  CNPJ/CPF: {}\n", tax_id(&inf.dest.cnpj_cpf)));
    push_address(&mut output, &inf.dest.ender_dest);
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", inf.det.len()));
    for (i, det) in inf.det.iter().enumerate() {
        output.push_str(&format!(
            "  {:>3}. {}  {} {} x {} = {}\n",
            i + 1,
            show(&det.prod.x_prod),
            show(&det.prod.q_com),
            show(&det.prod.u_com),
            amount(&det.prod.v_un_com),
            amount(&det.prod.v_prod)
        ));
    }
    output.push('\n');

    let tot = &inf.total.icms_tot;
    output.push_str("Totals:\n");
    output.push_str(&format!("  Products: {}\n", amount(&tot.v_prod)));
    output.push_str(&format!("  Freight:  {}\n", amount(&tot.v_frete)));
    output.push_str(&format!("  ICMS:     {}\n", amount(&tot.v_icms)));
    output.push_str(&format!("  IPI:      {}\n", amount(&tot.v_ipi)));
    output.push_str(&format!("  Total:    {}\n", amount(&tot.v_nf)));

    if let Some(mod_frete) = &inf.transp.mod_frete {
        output.push_str(&format!("\nFreight modality: {}\n", mod_frete));
    }

    output
}

fn push_address(output: &mut String, address: &Endereco) {
    if !address.is_empty() {
        output.push_str(&format!("  {}\n", address.format()));
    }
}

fn show(field: &Option<FieldValue>) -> String {
    field.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn raw(field: &Option<FieldValue>) -> String {
    field.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn amount(field: &Option<FieldValue>) -> String {
    match field {
        Some(value) => value
            .as_decimal()
            .map(format_brl_amount)
            .unwrap_or_else(|| value.to_string()),
        None => "-".to_string(),
    }
}

fn tax_id(field: &Option<FieldValue>) -> String {
    let Some(value) = field else {
        return "-".to_string();
    };
    match validate_tax_id(&value.to_string()) {
        Some(TaxId::Cnpj(digits)) => format_cnpj(&digits),
        Some(TaxId::Cpf(digits)) => format_cpf(&digits),
        None => value.to_string(),
    }
}
