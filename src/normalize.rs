//! Deduplicate raw rows into the four output tables

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::extract::RawRows;
use crate::table::{Row, Table};

/// Column set of the mapping table, in output order.
const MAPPING_COLUMNS: [&str; 3] = ["GRN", "PAYEE_ID", "USER_ID"];

/// The four normalized tables produced by one conversion.
#[derive(Debug, Clone)]
pub struct OutputTables {
    /// One row per distinct GRN
    pub grn: Table,
    /// One row per distinct PAYEE_ID
    pub payees: Table,
    /// One row per distinct USER_ID
    pub users: Table,
    /// Distinct (GRN, PAYEE_ID, USER_ID) combinations
    pub mapping: Table,
}

/// Deduplicate the raw row collections into the four output tables.
///
/// The GRN table keeps the first row per key verbatim; the payee and user
/// tables merge their groups column-wise. Never fails: empty inputs yield
/// empty tables.
pub fn normalize(raw: &RawRows) -> OutputTables {
    OutputTables {
        grn: Table::from_rows(dedup_keep_first(&raw.grn, "GRN")),
        payees: Table::from_rows(merge_by_key(&raw.payees, "PAYEE_ID")),
        users: Table::from_rows(merge_by_key(&raw.users, "USER_ID")),
        mapping: Table::from_rows(project_mapping(&raw.users)),
    }
}

/// Keep the first row seen for each key value and drop later duplicates
/// whole, with no field-level merge. Null (or absent) keys are one shared
/// key like any other.
fn dedup_keep_first(rows: &[Row], key: &str) -> Vec<Row> {
    let mut seen: HashSet<Option<String>> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if seen.insert(row.key(key).map(str::to_string)) {
            out.push(row.clone());
        }
    }
    out
}

/// Collapse all rows sharing a key into one merged row per group, groups in
/// first-occurrence order of their key. All null-keyed rows form a single
/// group.
fn merge_by_key(rows: &[Row], key: &str) -> Vec<Row> {
    let mut order: Vec<Option<String>> = Vec::new();
    let mut groups: HashMap<Option<String>, Vec<&Row>> = HashMap::new();

    for row in rows {
        match groups.entry(row.key(key).map(str::to_string)) {
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(vec![row]);
            }
            Entry::Occupied(mut entry) => entry.get_mut().push(row),
        }
    }

    order.iter().map(|k| merge_group(&groups[k])).collect()
}

/// Column-wise fold over one group: for each column (first-seen order across
/// the group) take the first non-null value, scanning rows in their original
/// order. An empty string is a present value and wins over null; a column
/// null in every row stays null.
fn merge_group(group: &[&Row]) -> Row {
    let mut merged = Row::new();
    for row in group {
        for col in row.columns() {
            if merged.get(col).is_none() {
                merged.insert(col, first_present(group, col));
            }
        }
    }
    merged
}

/// First non-null value for `col` across the group rows.
fn first_present(group: &[&Row], col: &str) -> Option<String> {
    group.iter().find_map(|row| row.get(col).and_then(|v| v.clone()))
}

/// Project user rows onto the three key columns, dropping exact-duplicate
/// triples and keeping first-occurrence order. Every distinct combination
/// survives: the same user under two payees stays as two rows.
fn project_mapping(user_rows: &[Row]) -> Vec<Row> {
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut out = Vec::new();

    for row in user_rows {
        let triple: Vec<Option<String>> = MAPPING_COLUMNS
            .iter()
            .map(|col| row.get(col).cloned().flatten())
            .collect();
        if seen.insert(triple.clone()) {
            let mut projected = Row::new();
            for (col, value) in MAPPING_COLUMNS.iter().zip(triple) {
                projected.insert(*col, value);
            }
            out.push(projected);
        }
    }

    out
}
