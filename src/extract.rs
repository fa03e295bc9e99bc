//! Flatten the nested partnership tree of an NGR export into raw rows

use roxmltree::{Document, Node};

use crate::error::NgrConvertError;
use crate::table::Row;

/// Separator used when aggregating repeated phone fields into one value.
const PHONE_SEPARATOR: &str = "; ";

/// Raw (non-deduplicated) rows extracted from one parsed export.
#[derive(Debug, Clone, Default)]
pub struct RawRows {
    /// One row per partnership element
    pub grn: Vec<Row>,
    /// One row per payee element, carrying its parent GRN
    pub payees: Vec<Row>,
    /// One row per user element, carrying its ancestor GRN and PAYEE_ID
    pub users: Vec<Row>,
}

/// Parse an NGR export and flatten it into raw GRN, payee and user rows.
///
/// Fails only when the document is not well-formed XML. Elements missing
/// their identifier child still produce a row with a null identifier field;
/// downstream grouping treats null as a valid key.
pub fn extract(xml: &str) -> Result<RawRows, NgrConvertError> {
    let doc = Document::parse(xml).map_err(|e| NgrConvertError::MalformedInput { source: e })?;

    let mut rows = RawRows::default();

    for partnership in children_named(doc.root_element(), "partnership") {
        let grn_id = child_text(partnership, "GRN");

        let mut grn_row = Row::new();
        grn_row.insert("GRN", grn_id.clone());
        collect_leaf_fields(partnership, "payee", &mut grn_row);
        rows.grn.push(grn_row);

        for payee in children_named(partnership, "payee") {
            let payee_id = child_text(payee, "PAYEE_ID");

            let mut payee_row = Row::new();
            payee_row.insert("GRN", grn_id.clone());
            payee_row.insert("PAYEE_ID", payee_id.clone());
            collect_leaf_fields(payee, "user", &mut payee_row);
            rows.payees.push(payee_row);

            for user in children_named(payee, "user") {
                rows.users.push(user_row(user, &grn_id, &payee_id));
            }
        }
    }

    Ok(rows)
}

/// Build one user row, diverting repeated PHONE_TYPE/PHONE_NUMBER children
/// into the two aggregate fields.
fn user_row(user: Node, grn_id: &Option<String>, payee_id: &Option<String>) -> Row {
    let mut row = Row::new();
    row.insert("GRN", grn_id.clone());
    row.insert("PAYEE_ID", payee_id.clone());
    row.insert("USER_ID", child_text(user, "USER_ID"));

    let mut phone_types = Vec::new();
    let mut phone_numbers = Vec::new();

    for child in user.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "PHONE_TYPE" => phone_types.push(leaf_text(child)),
            "PHONE_NUMBER" => phone_numbers.push(leaf_text(child)),
            name if is_leaf(child) => {
                row.insert(name.to_uppercase(), Some(leaf_text(child)));
            }
            _ => {}
        }
    }

    row.insert("PHONE_TYPES", join_phones(phone_types));
    row.insert("PHONE_NUMBERS", join_phones(phone_numbers));
    row
}

/// Copy every direct leaf child of `parent` into `row`, upper-casing the tag
/// name. Children named `skip` are left out: that is where the next nesting
/// level lives.
fn collect_leaf_fields(parent: Node, skip: &str, row: &mut Row) {
    for child in parent.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == skip || !is_leaf(child) {
            continue;
        }
        row.insert(child.tag_name().name().to_uppercase(), Some(leaf_text(child)));
    }
}

/// Direct child elements of `parent` with the given tag, in document order.
fn children_named<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed text of the first child element with the given tag. `None` when
/// the child is absent or has no text node at all.
fn child_text(parent: Node, name: &'static str) -> Option<String> {
    children_named(parent, name)
        .next()
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}

/// An element with no element children.
fn is_leaf(node: Node) -> bool {
    !node.children().any(|n| n.is_element())
}

/// Leaf text is always a string: a missing or empty text node yields "".
fn leaf_text(node: Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}

/// Collected phone values joined with "; ", or null when none were present.
fn join_phones(values: Vec<String>) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(PHONE_SEPARATOR))
    }
}
