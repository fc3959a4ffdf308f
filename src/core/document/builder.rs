//! TISS lote XML assembly
//!
//! Layout of the generated document:
//!
//! ```text
//! ans:mensagemTISS
//! ├── cabecalho (identificacaoTransacao, versaoPadrao)
//! └── prestadorParaOperadora/loteGuias
//!     ├── numeroLote
//!     └── guiasTISS/guiaSP_SADT*
//!         ├── cabecalhoGuia, dadosBeneficiario, dadosSolicitante, dadosAtendimento
//!         ├── procedimentosExecutados/procedimentoExecutado*
//!         └── valorTotal
//! ```

use super::money::{format_money, format_quantity, guide_total};
use crate::core::grouping::BillingGroup;
use crate::domain::billing::{BillingRecord, LineItem};
use crate::domain::ids::RecordId;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;

/// TISS schema namespace
pub const TISS_NAMESPACE: &str = "http://www.ans.gov.br/padroes/tiss/schemas";

/// Schema version used when none is configured
pub const DEFAULT_SCHEMA_VERSION: &str = "3.05.00";

/// Maximum characters kept from a procedure description
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Zero-pad width of the per-guide index in derived guide numbers
const GUIDE_INDEX_WIDTH: usize = 4;

const ZERO_MONEY: &str = "0.00";

/// Per-document parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Lote number, also the prefix of derived guide numbers
    pub lote_number: String,

    /// Insurer ANS registration code
    pub ans_code: String,

    /// TISS schema version
    pub schema_version: String,

    /// Transaction timestamp, also the execution date of undated procedures
    pub issued_at: DateTime<Utc>,
}

impl DocumentOptions {
    pub fn new(lote_number: impl Into<String>, ans_code: impl Into<String>) -> Self {
        Self {
            lote_number: lote_number.into(),
            ans_code: ans_code.into(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            issued_at: Utc::now(),
        }
    }

    pub fn with_schema_version(mut self, schema_version: impl Into<String>) -> Self {
        self.schema_version = schema_version.into();
        self
    }

    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// External guide number if the record has one, else lote number plus
    /// the 1-based guide index padded to four digits
    pub fn guide_number(&self, record: &BillingRecord, index: usize) -> String {
        match record.guide_number.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(external) => external.to_string(),
            None => format!(
                "{}{:0width$}",
                self.lote_number,
                index + 1,
                width = GUIDE_INDEX_WIDTH
            ),
        }
    }
}

/// Builds the lote document for one group or sub-chunk
///
/// Each guide's `valorTotalGeral` adds up to [`BillingGroup::total_amount`].
pub fn build_group_document(group: &BillingGroup, options: &DocumentOptions) -> Result<String> {
    build_document(&group.records, &group.line_items, options)
}

/// Builds a TISS lote document with one `guiaSP_SADT` per record
///
/// Guides are always written as repeated elements; a single-guide lote has
/// exactly one `guiaSP_SADT` child.
///
/// # Errors
///
/// Returns a document error if XML serialization fails.
pub fn build_document(
    records: &[BillingRecord],
    line_items: &HashMap<RecordId, Vec<LineItem>>,
    options: &DocumentOptions,
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let root = BytesStart::new("ans:mensagemTISS").with_attributes([("xmlns:ans", TISS_NAMESPACE)]);
    writer.write_event(Event::Start(root))?;

    write_header(&mut writer, options)?;

    open(&mut writer, "prestadorParaOperadora")?;
    open(&mut writer, "loteGuias")?;
    leaf(&mut writer, "numeroLote", &options.lote_number)?;
    open(&mut writer, "guiasTISS")?;
    for (index, record) in records.iter().enumerate() {
        let items = line_items
            .get(&record.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        write_guide(&mut writer, record, items, index, options)?;
    }
    close(&mut writer, "guiasTISS")?;
    close(&mut writer, "loteGuias")?;
    close(&mut writer, "prestadorParaOperadora")?;

    close(&mut writer, "ans:mensagemTISS")?;

    Ok(String::from_utf8(writer.into_inner())?)
}

type XmlWriter = Writer<Vec<u8>>;

fn open(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn leaf(writer: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    close(writer, name)
}

fn write_header(writer: &mut XmlWriter, options: &DocumentOptions) -> Result<()> {
    open(writer, "cabecalho")?;
    open(writer, "identificacaoTransacao")?;
    leaf(writer, "tipoTransacao", "ENVIO_LOTE_GUIAS")?;
    leaf(writer, "sequencialTransacao", "1")?;
    leaf(
        writer,
        "dataRegistroTransacao",
        &options.issued_at.format("%Y-%m-%d").to_string(),
    )?;
    leaf(
        writer,
        "horaRegistroTransacao",
        &options.issued_at.format("%H:%M:%S").to_string(),
    )?;
    close(writer, "identificacaoTransacao")?;
    leaf(writer, "versaoPadrao", &options.schema_version)?;
    close(writer, "cabecalho")
}

fn write_guide(
    writer: &mut XmlWriter,
    record: &BillingRecord,
    items: &[LineItem],
    index: usize,
    options: &DocumentOptions,
) -> Result<()> {
    let guide_number = options.guide_number(record, index);

    open(writer, "guiaSP_SADT")?;

    open(writer, "cabecalhoGuia")?;
    leaf(writer, "registroANS", &options.ans_code)?;
    leaf(writer, "numeroGuiaPrestador", &guide_number)?;
    leaf(writer, "guiaPrincipal", &guide_number)?;
    close(writer, "cabecalhoGuia")?;

    open(writer, "dadosBeneficiario")?;
    leaf(
        writer,
        "numeroCarteira",
        record.patient_id.as_deref().unwrap_or_default(),
    )?;
    leaf(writer, "atendimentoRN", "N")?;
    close(writer, "dadosBeneficiario")?;

    write_requester(writer)?;

    open(writer, "dadosAtendimento")?;
    leaf(writer, "tipoAtendimento", "05")?;
    leaf(writer, "indicacaoAcidente", "9")?;
    leaf(writer, "tipoConsulta", "1")?;
    close(writer, "dadosAtendimento")?;

    open(writer, "procedimentosExecutados")?;
    for (seq, item) in items.iter().enumerate() {
        write_procedure(writer, item, seq + 1, options)?;
    }
    close(writer, "procedimentosExecutados")?;

    let procedures_total = format_money(guide_total(items));

    open(writer, "valorTotal")?;
    leaf(writer, "valorProcedimentos", &procedures_total)?;
    leaf(writer, "valorDiarias", ZERO_MONEY)?;
    leaf(writer, "valorTaxasAlugueis", ZERO_MONEY)?;
    leaf(writer, "valorMateriais", ZERO_MONEY)?;
    leaf(writer, "valorMedicamentos", ZERO_MONEY)?;
    leaf(writer, "valorOPME", ZERO_MONEY)?;
    leaf(writer, "valorGasesMedicinais", ZERO_MONEY)?;
    leaf(writer, "valorTotalGeral", &procedures_total)?;
    close(writer, "valorTotal")?;

    close(writer, "guiaSP_SADT")
}

/// Requesting party block
///
/// Filled with placeholder identity values; records carry no requester data.
fn write_requester(writer: &mut XmlWriter) -> Result<()> {
    open(writer, "dadosSolicitante")?;
    open(writer, "contratadoSolicitante")?;
    leaf(writer, "codigoPrestadorNaOperadora", "0000000000")?;
    close(writer, "contratadoSolicitante")?;
    open(writer, "profissionalSolicitante")?;
    leaf(writer, "nomeProfissional", "MEDICO SOLICITANTE")?;
    leaf(writer, "conselhoProfissional", "1")?;
    leaf(writer, "numeroConselhoProfissional", "00000")?;
    leaf(writer, "UF", "SP")?;
    leaf(writer, "CBOS", "225125")?;
    close(writer, "profissionalSolicitante")?;
    close(writer, "dadosSolicitante")
}

fn write_procedure(
    writer: &mut XmlWriter,
    item: &LineItem,
    seq: usize,
    options: &DocumentOptions,
) -> Result<()> {
    let executed_on = item.performed_at.unwrap_or(options.issued_at);
    let time = options.issued_at.format("%H:%M:%S").to_string();
    let description: String = item.description.chars().take(MAX_DESCRIPTION_CHARS).collect();

    open(writer, "procedimentoExecutado")?;
    leaf(writer, "sequencialItem", &seq.to_string())?;
    leaf(
        writer,
        "dataExecucao",
        &executed_on.format("%Y-%m-%d").to_string(),
    )?;
    leaf(writer, "horaInicial", &time)?;
    leaf(writer, "horaFinal", &time)?;

    open(writer, "procedimento")?;
    leaf(writer, "codigoTabela", "22")?;
    leaf(writer, "codigoProcedimento", item.procedure_code())?;
    leaf(writer, "descricaoProcedimento", &description)?;
    close(writer, "procedimento")?;

    leaf(
        writer,
        "quantidadeExecutada",
        &format_quantity(item.quantity),
    )?;
    leaf(writer, "viaAcesso", "1")?;
    leaf(writer, "tecnicaUtilizada", "1")?;
    leaf(writer, "reducaoAcrescimo", "1.00")?;
    leaf(writer, "valorUnitario", &format_money(item.unit_price))?;
    leaf(writer, "valorTotal", &format_money(item.total_price))?;

    close(writer, "procedimentoExecutado")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{InsurerId, OrganizationId};
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn options() -> DocumentOptions {
        DocumentOptions::new("123456789012", "326305")
            .with_issued_at(Utc.with_ymd_and_hms(2026, 2, 1, 14, 30, 5).unwrap())
    }

    fn record(id: &str) -> BillingRecord {
        BillingRecord::new(
            RecordId::new(id).unwrap(),
            OrganizationId::new("org-1").unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
        )
        .with_insurer(InsurerId::new("ins-1").unwrap())
        .with_patient("0001234500")
    }

    fn item(record_id: &str, unit: &str, total: &str) -> LineItem {
        LineItem::new(
            RecordId::new(record_id).unwrap(),
            "10101012",
            "Consulta em consultorio",
            Decimal::ONE,
            Decimal::from_str(unit).unwrap(),
            Decimal::from_str(total).unwrap(),
        )
    }

    #[test]
    fn test_guide_number_prefers_external() {
        let opts = options();
        assert_eq!(opts.guide_number(&record("a"), 0), "1234567890120001");
        assert_eq!(opts.guide_number(&record("a"), 11), "1234567890120012");
        let external = record("a").with_guide_number("G-77");
        assert_eq!(opts.guide_number(&external, 0), "G-77");
    }

    #[test]
    fn test_header_and_lote() {
        let xml = build_document(&[record("a")], &HashMap::new(), &options()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!("<ans:mensagemTISS xmlns:ans=\"{TISS_NAMESPACE}\">")));
        assert!(xml.contains("<tipoTransacao>ENVIO_LOTE_GUIAS</tipoTransacao>"));
        assert!(xml.contains("<dataRegistroTransacao>2026-02-01</dataRegistroTransacao>"));
        assert!(xml.contains("<horaRegistroTransacao>14:30:05</horaRegistroTransacao>"));
        assert!(xml.contains("<versaoPadrao>3.05.00</versaoPadrao>"));
        assert!(xml.contains("<numeroLote>123456789012</numeroLote>"));
        assert!(xml.trim_end().ends_with("</ans:mensagemTISS>"));
    }

    #[test]
    fn test_procedures_and_totals() {
        let mut items = HashMap::new();
        items.insert(
            RecordId::new("a").unwrap(),
            vec![item("a", "10.1", "10.1"), item("a", "0.335", "0.335")],
        );
        let xml = build_document(&[record("a")], &items, &options()).unwrap();

        assert_eq!(xml.matches("<procedimentoExecutado>").count(), 2);
        assert!(xml.contains("<sequencialItem>2</sequencialItem>"));
        assert!(xml.contains("<valorUnitario>10.10</valorUnitario>"));
        assert!(xml.contains("<valorTotal>0.34</valorTotal>"));
        // 10.1 + 0.335 summed exactly, then rounded once
        assert!(xml.contains("<valorProcedimentos>10.44</valorProcedimentos>"));
        assert!(xml.contains("<valorTotalGeral>10.44</valorTotalGeral>"));
        assert!(xml.contains("<valorOPME>0.00</valorOPME>"));
        assert!(xml.contains("<numeroCarteira>0001234500</numeroCarteira>"));
    }

    #[test]
    fn test_description_truncated_and_escaped() {
        let mut long = item("a", "1", "1");
        long.description = format!("R&D {}", "x".repeat(200));
        let mut items = HashMap::new();
        items.insert(RecordId::new("a").unwrap(), vec![long]);

        let xml = build_document(&[record("a")], &items, &options()).unwrap();
        let expected = format!("R&amp;D {}", "x".repeat(MAX_DESCRIPTION_CHARS - 4));
        assert!(xml.contains(&format!(
            "<descricaoProcedimento>{expected}</descricaoProcedimento>"
        )));
    }

    #[test]
    fn test_undated_procedure_uses_issue_date() {
        let dated = item("a", "1", "1")
            .with_performed_at(Utc.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap());
        let mut items = HashMap::new();
        items.insert(RecordId::new("a").unwrap(), vec![dated, item("a", "1", "1")]);

        let xml = build_document(&[record("a")], &items, &options()).unwrap();
        assert!(xml.contains("<dataExecucao>2026-01-12</dataExecucao>"));
        assert!(xml.contains("<dataExecucao>2026-02-01</dataExecucao>"));
    }

    #[test]
    fn test_single_and_multiple_guides_use_same_element() {
        let one = build_document(&[record("a")], &HashMap::new(), &options()).unwrap();
        let two = build_document(&[record("a"), record("b")], &HashMap::new(), &options()).unwrap();
        assert_eq!(one.matches("<guiaSP_SADT>").count(), 1);
        assert_eq!(two.matches("<guiaSP_SADT>").count(), 2);
    }
}
