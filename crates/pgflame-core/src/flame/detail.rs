//! Detail rows shown for a selected flame frame.
//!
//! Rows come from [`DETAIL_FIELDS`], an ordered table of labels and
//! extractors. A row is emitted only when its attribute is present: a
//! non-empty string or a non-zero number. A count that is genuinely zero
//! (e.g. no shared buffers hit) is therefore omitted as well.

use crate::plan::PlanNode;

const TABLE_HEADER: &str = r#"<table class="table table-striped table-bordered"><tbody>"#;
const TABLE_FOOTER: &str = "</tbody></table>";

/// A raw attribute value pulled off a plan node.
enum FieldValue<'a> {
    Text(Option<&'a str>),
    Count(Option<u64>),
    Kilobytes(Option<u64>),
}

impl FieldValue<'_> {
    /// Render the value, or `None` when the attribute is absent.
    fn render(&self) -> Option<String> {
        match *self {
            Self::Text(text) => text.filter(|t| !t.is_empty()).map(str::to_owned),
            Self::Count(count) => count.filter(|c| *c != 0).map(|c| c.to_string()),
            Self::Kilobytes(kb) => kb.filter(|k| *k != 0).map(|k| format!("{k}kB")),
        }
    }
}

struct DetailField {
    label: &'static str,
    extract: fn(&PlanNode) -> FieldValue<'_>,
}

/// Candidate rows in display order.
const DETAIL_FIELDS: &[DetailField] = &[
    DetailField {
        label: "Parent Relationship",
        extract: |n| FieldValue::Text(n.parent_relationship.as_deref()),
    },
    DetailField {
        label: "Filter",
        extract: |n| FieldValue::Text(n.filter.as_deref()),
    },
    DetailField {
        label: "Join Filter",
        extract: |n| FieldValue::Text(n.join_filter.as_deref()),
    },
    DetailField {
        label: "Hash Cond",
        extract: |n| FieldValue::Text(n.hash_cond.as_deref()),
    },
    DetailField {
        label: "Index Cond",
        extract: |n| FieldValue::Text(n.index_cond.as_deref()),
    },
    DetailField {
        label: "Recheck Cond",
        extract: |n| FieldValue::Text(n.recheck_cond.as_deref()),
    },
    DetailField {
        label: "Buffers Shared Hit",
        extract: |n| FieldValue::Count(n.buffers_hit),
    },
    DetailField {
        label: "Buffers Shared Read",
        extract: |n| FieldValue::Count(n.buffers_read),
    },
    DetailField {
        label: "Hash Buckets",
        extract: |n| FieldValue::Count(n.hash_buckets),
    },
    DetailField {
        label: "Hash Batches",
        extract: |n| FieldValue::Count(n.hash_batches),
    },
    DetailField {
        label: "Memory Usage",
        extract: |n| FieldValue::Kilobytes(n.memory_usage),
    },
];

/// One labeled row of a [`Detail`] block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// The ordered detail rows for one plan node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    pub rows: Vec<DetailRow>,
}

impl Detail {
    /// Render the rows as a two-column HTML table. Cell text is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from(TABLE_HEADER);
        for row in &self.rows {
            html.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                row.label,
                escape_html(&row.value)
            ));
        }
        html.push_str(TABLE_FOOTER);
        html
    }

    /// Whether the node had no attribute worth showing.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Collect the present descriptive attributes of `node` in canonical order.
pub fn format_detail(node: &PlanNode) -> Detail {
    let rows = DETAIL_FIELDS
        .iter()
        .filter_map(|field| {
            (field.extract)(node).render().map(|value| DetailRow {
                label: field.label,
                value,
            })
        })
        .collect();
    Detail { rows }
}

/// A single line of explanatory text, used for the synthetic frames.
pub(crate) fn note_html(text: &str) -> String {
    format!("<span>{}</span>", escape_html(text))
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
