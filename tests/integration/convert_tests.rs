//! End-to-end conversion tests
//!
//! These tests drive the full pipeline (read → extract → normalize → write)
//! over XML fixtures and inspect the written CSV artifacts.

use crate::common::TestContext;
use ngr_convert::bundle::{GRN_CSV, MAPPING_CSV, PAYEE_CSV, USER_CSV};

#[test]
fn test_convert_produces_all_four_csv_files() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    for name in [GRN_CSV, PAYEE_CSV, USER_CSV, MAPPING_CSV] {
        assert!(
            ctx.output_dir.join(name).exists(),
            "Expected artifact {} to be written",
            name
        );
    }
}

#[test]
fn test_grn_table_keeps_first_duplicate_verbatim() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    let csv = ctx.read_csv(GRN_CSV);

    // G0001 appears twice in the fixture; only the first row survives, whole.
    assert_eq!(csv.lines().count(), 3, "header + G0001 + G0002: {}", csv);
    assert!(csv.contains("Riverbend Growers"));
    assert!(!csv.contains("stale duplicate"));
}

#[test]
fn test_payee_duplicates_merge_column_wise() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    let csv = ctx.read_csv(PAYEE_CSV);
    assert_eq!(csv.lines().count(), 4, "header + P100 + P200 + P300: {}", csv);

    // P100 appears twice with complementary fields; the merged row carries both.
    let p100 = csv
        .lines()
        .find(|line| line.contains("P100"))
        .expect("P100 row should exist");
    assert!(p100.contains("Riverbend Pty Ltd"), "NAME from first row: {}", p100);
    assert!(p100.contains("11 222 333 444"), "ABN from duplicate row: {}", p100);
}

#[test]
fn test_user_merge_and_phone_aggregation() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    let csv = ctx.read_csv(USER_CSV);
    assert_eq!(csv.lines().count(), 4, "header + U1 + U2 + U3: {}", csv);

    let u1 = csv
        .lines()
        .find(|line| line.contains("U1"))
        .expect("U1 row should exist");
    assert!(u1.contains("owner@riverbend.example"));
    assert!(u1.contains("Mobile; Home"));
    assert!(u1.contains("0400 111 222; 07 5550 1234"));
}

#[test]
fn test_mapping_table_preserves_many_to_many_links() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    let csv = ctx.read_csv(MAPPING_CSV);
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());

    let header = rdr.headers().expect("mapping should have a header").clone();
    assert_eq!(header, vec!["GRN", "PAYEE_ID", "USER_ID"]);

    let records: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.expect("valid record").iter().map(str::to_string).collect())
        .collect();

    // The repeated (G0001, P100, U1) link is dropped; the U1-under-P200
    // fan-out is a distinct combination and stays.
    assert_eq!(records.len(), 4);
    assert!(records.contains(&vec!["G0001".to_string(), "P100".to_string(), "U1".to_string()]));
    assert!(records.contains(&vec!["G0001".to_string(), "P200".to_string(), "U1".to_string()]));
    assert!(records.contains(&vec!["G0001".to_string(), "P100".to_string(), "U2".to_string()]));
    assert!(records.contains(&vec!["G0002".to_string(), "P300".to_string(), "U3".to_string()]));
}

#[test]
fn test_values_with_commas_are_quoted() {
    let ctx = TestContext::with_fixture("partnerships.xml");
    ctx.convert_successfully();

    let csv = ctx.read_csv(GRN_CSV);
    assert!(
        csv.contains("\"Hilltop Farming, Co\""),
        "comma-bearing name should be quoted: {}",
        csv
    );
}

#[test]
fn test_empty_export_produces_empty_artifacts() {
    let ctx = TestContext::with_fixture("empty.xml");
    ctx.convert_successfully();

    for name in [GRN_CSV, PAYEE_CSV, USER_CSV, MAPPING_CSV] {
        assert_eq!(ctx.read_csv(name), "", "{} should be empty", name);
    }
}

#[test]
fn test_malformed_input_fails_without_artifacts() {
    let ctx = TestContext::with_fixture("malformed.xml");
    let result = ctx.convert();

    assert!(!result.success);
    assert!(
        result.errors[0].contains("Malformed XML input"),
        "Unexpected error: {:?}",
        result.errors
    );
    // No partial results: the output directory is never created.
    assert!(!ctx.output_dir.exists());
}

#[test]
fn test_leaf_values_trimmed_end_to_end() {
    let ctx = TestContext::with_xml(
        "<ngr_export><partnership><GRN> G9 </GRN><NAME> Padded </NAME></partnership></ngr_export>",
    );
    ctx.convert_successfully();

    assert_eq!(ctx.read_csv(GRN_CSV), "GRN,NAME\nG9,Padded\n");
}

#[test]
fn test_convert_xml_runs_without_filesystem() {
    let tables = ngr_convert::convert_xml(
        "<ngr_export><partnership><GRN>G1</GRN></partnership></ngr_export>",
    )
    .expect("well-formed input should convert");

    assert_eq!(tables.grn.len(), 1);
    assert!(tables.payees.is_empty());
    assert!(tables.users.is_empty());
    assert!(tables.mapping.is_empty());
}
