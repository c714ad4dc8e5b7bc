//! Flame graph data: the plan-to-flame transformation.
//!
//! [`build_tree`] wraps the transformed execution tree and a planning-time
//! leaf under a synthetic `Total` root. The serialized shape of
//! [`FlameNode`] is what the page template's renderer consumes.

pub mod detail;
pub mod label;
pub mod transform;

use serde::{Deserialize, Serialize};

use crate::plan::{Plan, PlanNode};

pub use detail::{Detail, DetailRow, format_detail};
pub use label::label;
pub use transform::transform;

/// Color of the planning-time leaf.
pub const PLANNING_COLOR: &str = "#00C05A";
/// Color painted over every node of an init-plan subtree.
pub const INIT_PLAN_COLOR: &str = "#C0C0C0";

const PLANNING_NAME: &str = "Query Planning";
const PLANNING_DETAIL: &str = "Time to generate the query plan";
const TOTAL_NAME: &str = "Total";
const TOTAL_DETAIL: &str = "Includes planning and execution time";

/// One node of the rendered flame graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlameNode {
    /// Display label.
    pub name: String,
    /// Width of the frame: own time plus the value of init-plan children.
    pub value: f64,
    /// The node's own reported time.
    pub time: f64,
    /// HTML table of the node's descriptive attributes.
    pub detail: String,
    /// Explicit frame color; `None` lets the renderer pick one.
    pub color: Option<String>,
    #[serde(rename = "init_plan")]
    pub is_init_plan: bool,
    pub children: Vec<FlameNode>,
}

impl FlameNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(FlameNode::node_count).sum::<usize>()
    }
}

/// Build the full flame tree for an execution root and its planning time.
pub fn build_tree(root: &PlanNode, planning_time: f64) -> FlameNode {
    let planning = FlameNode {
        name: PLANNING_NAME.to_owned(),
        value: planning_time,
        time: planning_time,
        detail: detail::note_html(PLANNING_DETAIL),
        color: Some(PLANNING_COLOR.to_owned()),
        is_init_plan: false,
        children: Vec::new(),
    };

    let execution = transform(root, None);

    let total = FlameNode {
        name: TOTAL_NAME.to_owned(),
        value: planning.value + execution.value,
        time: planning.time + execution.time,
        detail: detail::note_html(TOTAL_DETAIL),
        color: None,
        is_init_plan: false,
        children: vec![planning, execution],
    };

    tracing::debug!(
        nodes = total.node_count(),
        total_value = total.value,
        "built flame tree"
    );

    total
}

/// Build the flame tree for a parsed [`Plan`].
pub fn build_flame(plan: &Plan) -> FlameNode {
    build_tree(&plan.root, plan.planning_time)
}
