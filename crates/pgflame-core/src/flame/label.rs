use crate::plan::PlanNode;

/// Derive the display label for a plan node.
///
/// An index without a table is not shown; such nodes get the bare method.
pub fn label(node: &PlanNode) -> String {
    let table = node.table.as_deref().filter(|t| !t.is_empty());
    let index = node.index.as_deref().filter(|i| !i.is_empty());

    match (table, index) {
        (Some(table), Some(index)) => format!("{} using {index} on {table}", node.method),
        (Some(table), None) => format!("{} on {table}", node.method),
        _ => node.method.clone(),
    }
}
