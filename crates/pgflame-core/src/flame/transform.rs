//! Recursive plan-to-flame conversion.

use crate::plan::PlanNode;

use super::detail::format_detail;
use super::label::label;
use super::{FlameNode, INIT_PLAN_COLOR};

/// Convert a plan node and its subtree into a [`FlameNode`].
///
/// `color` is the color inherited from the parent. An init-plan node replaces
/// it with [`INIT_PLAN_COLOR`] and passes that down, so the whole subtree is
/// painted. A node's value is its own time plus the value of its init-plan
/// children; other children are already counted in the node's time.
pub fn transform(node: &PlanNode, color: Option<&str>) -> FlameNode {
    let is_init_plan = node.is_init_plan();
    let color = if is_init_plan {
        Some(INIT_PLAN_COLOR)
    } else {
        color
    };

    let children: Vec<FlameNode> = node
        .children
        .iter()
        .map(|child| transform(child, color))
        .collect();

    let value = node.total_time
        + children
            .iter()
            .filter(|child| child.is_init_plan)
            .map(|child| child.value)
            .sum::<f64>();

    FlameNode {
        name: label(node),
        value,
        time: node.total_time,
        detail: format_detail(node).to_html(),
        color: color.map(str::to_owned),
        is_init_plan,
        children,
    }
}
