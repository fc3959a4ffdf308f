//! Integration tests for grouping and lote document assembly

mod common;

use chrono::{TimeZone, Utc};
use common::*;
use std::collections::HashMap;
use tiss_batcher::core::document::{build_group_document, DocumentOptions};
use tiss_batcher::core::grouping::group_records;
use tiss_batcher::domain::{LineItem, RecordId};

fn options() -> DocumentOptions {
    DocumentOptions::new("123456789001", "326305")
        .with_schema_version("3.05.00")
        .with_issued_at(Utc.with_ymd_and_hms(2026, 2, 1, 14, 30, 5).unwrap())
}

fn items(list: Vec<LineItem>) -> HashMap<RecordId, Vec<LineItem>> {
    let mut map: HashMap<RecordId, Vec<LineItem>> = HashMap::new();
    for item in list {
        map.entry(item.record_id.clone()).or_default().push(item);
    }
    map
}

#[test]
fn test_group_document_structure() {
    let records = vec![
        record("r1", "ins-x", 2026, 1),
        record("r2", "ins-x", 2026, 1),
    ];
    let line_items = items(vec![
        item("r1", "10101012", 15000),
        item("r1", "40301010", 3333),
        item("r2", "10101012", 15000),
    ]);

    let groups = group_records(records, &line_items);
    assert_eq!(groups.len(), 1);

    let xml = build_group_document(&groups[0], &options()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns:ans=\"http://www.ans.gov.br/padroes/tiss/schemas\""));
    assert!(xml.contains("<tipoTransacao>ENVIO_LOTE_GUIAS</tipoTransacao>"));
    assert!(xml.contains("<dataRegistroTransacao>2026-02-01</dataRegistroTransacao>"));
    assert!(xml.contains("<horaRegistroTransacao>14:30:05</horaRegistroTransacao>"));
    assert!(xml.contains("<versaoPadrao>3.05.00</versaoPadrao>"));
    assert!(xml.contains("<numeroLote>123456789001</numeroLote>"));

    assert_eq!(xml.matches("<guiaSP_SADT>").count(), 2);
    assert!(xml.contains("<numeroGuiaPrestador>1234567890010001</numeroGuiaPrestador>"));
    assert!(xml.contains("<numeroGuiaPrestador>1234567890010002</numeroGuiaPrestador>"));
    assert!(xml.contains("<numeroCarteira>card-r1</numeroCarteira>"));

    assert!(xml.contains("<valorTotalGeral>183.33</valorTotalGeral>"));
    assert!(xml.contains("<valorTotalGeral>150.00</valorTotalGeral>"));
    assert_eq!(groups[0].total_amount(), money(33333));
}

#[test]
fn test_single_guide_document_has_one_guide_element() {
    let groups = group_records(
        vec![record("r1", "ins-x", 2026, 1)],
        &items(vec![item("r1", "10101012", 100)]),
    );

    let xml = build_group_document(&groups[0], &options()).unwrap();

    assert_eq!(xml.matches("<guiaSP_SADT>").count(), 1);
    assert_eq!(xml.matches("<guiasTISS>").count(), 1);
    assert!(xml.contains("<sequencialItem>1</sequencialItem>"));
}

#[test]
fn test_split_chunks_keep_record_order() {
    let records: Vec<_> = (0..5)
        .map(|i| record(&format!("r{i}"), "ins-x", 2026, 1))
        .collect();
    let groups = group_records(records, &HashMap::new());
    let chunks = groups.into_iter().next().unwrap().split(2);

    let ids: Vec<Vec<String>> = chunks
        .iter()
        .map(|c| c.records.iter().map(|r| r.id.to_string()).collect())
        .collect();
    assert_eq!(
        ids,
        vec![
            vec!["r0".to_string(), "r1".to_string()],
            vec!["r2".to_string(), "r3".to_string()],
            vec!["r4".to_string()],
        ]
    );
}
