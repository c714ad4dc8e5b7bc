//! Shared fixtures for pg-flame integration tests.
//!
//! Provides sample `EXPLAIN (ANALYZE, BUFFERS, FORMAT JSON)` documents as
//! produced by PostgreSQL, and small helpers for walking flame trees.

use pgflame_core::FlameNode;
use pgflame_core::plan::PlanNode;

/// A hash join over two sequential scans. No init-plans.
pub const HASH_JOIN_EXPLAIN: &str = r#"[
  {
    "Plan": {
      "Node Type": "Hash Join",
      "Parallel Aware": false,
      "Join Type": "Inner",
      "Startup Cost": 1.09,
      "Total Cost": 2.24,
      "Plan Rows": 3,
      "Plan Width": 64,
      "Actual Startup Time": 0.031,
      "Actual Total Time": 0.045,
      "Actual Rows": 3,
      "Actual Loops": 1,
      "Inner Unique": true,
      "Hash Cond": "(orders.user_id = users.id)",
      "Shared Hit Blocks": 2,
      "Shared Read Blocks": 0,
      "Plans": [
        {
          "Node Type": "Seq Scan",
          "Parent Relationship": "Outer",
          "Relation Name": "orders",
          "Alias": "orders",
          "Actual Total Time": 0.008,
          "Actual Loops": 1,
          "Filter": "(total > 100)",
          "Rows Removed by Filter": 7,
          "Shared Hit Blocks": 1,
          "Shared Read Blocks": 0
        },
        {
          "Node Type": "Hash",
          "Parent Relationship": "Inner",
          "Actual Total Time": 0.012,
          "Actual Loops": 1,
          "Hash Buckets": 1024,
          "Original Hash Buckets": 1024,
          "Hash Batches": 1,
          "Original Hash Batches": 1,
          "Peak Memory Usage": 9,
          "Shared Hit Blocks": 1,
          "Shared Read Blocks": 0,
          "Plans": [
            {
              "Node Type": "Seq Scan",
              "Parent Relationship": "Outer",
              "Relation Name": "users",
              "Alias": "users",
              "Actual Total Time": 0.006,
              "Actual Loops": 1,
              "Shared Hit Blocks": 1,
              "Shared Read Blocks": 0
            }
          ]
        }
      ]
    },
    "Planning": {
      "Shared Hit Blocks": 12,
      "Shared Read Blocks": 0
    },
    "Planning Time": 0.25,
    "Triggers": [],
    "Execution Time": 0.08
  }
]"#;

/// A query whose result node has an init-plan subtree (an uncorrelated
/// scalar subquery) containing its own nested scan.
pub const INIT_PLAN_EXPLAIN: &str = r#"[
  {
    "Plan": {
      "Node Type": "Seq Scan",
      "Relation Name": "orders",
      "Actual Total Time": 4.0,
      "Actual Loops": 1,
      "Filter": "(total > $0)",
      "Plans": [
        {
          "Node Type": "Aggregate",
          "Strategy": "Plain",
          "Parent Relationship": "InitPlan",
          "Subplan Name": "InitPlan 1 (returns $0)",
          "Actual Total Time": 1.5,
          "Actual Loops": 1,
          "Plans": [
            {
              "Node Type": "Index Only Scan",
              "Parent Relationship": "Outer",
              "Relation Name": "orders",
              "Index Name": "orders_total_idx",
              "Actual Total Time": 0.25,
              "Actual Loops": 2,
              "Index Cond": "(total IS NOT NULL)"
            }
          ]
        }
      ]
    },
    "Planning Time": 2.5,
    "Execution Time": 5.6
  }
]"#;

/// A parallel sequential scan under a `Gather`. The scan runs in the leader
/// and two workers, so it reports three loops with an averaged time.
pub const PARALLEL_EXPLAIN: &str = r#"[
  {
    "Plan": {
      "Node Type": "Gather",
      "Parallel Aware": false,
      "Actual Total Time": 100.0,
      "Actual Rows": 3000,
      "Actual Loops": 1,
      "Workers Planned": 2,
      "Workers Launched": 2,
      "Plans": [
        {
          "Node Type": "Parallel Seq Scan",
          "Parent Relationship": "Outer",
          "Parallel Aware": true,
          "Relation Name": "events",
          "Alias": "events",
          "Actual Total Time": 95.0,
          "Actual Rows": 1000,
          "Actual Loops": 3,
          "Filter": "(kind = 'click'::text)",
          "Rows Removed by Filter": 20000
        }
      ]
    },
    "Planning Time": 0.5,
    "Execution Time": 100.4
  }
]"#;

/// Plan output from `EXPLAIN (FORMAT JSON)` without `ANALYZE`.
pub const COST_ONLY_EXPLAIN: &str = r#"[
  {
    "Plan": {
      "Node Type": "Seq Scan",
      "Relation Name": "users",
      "Startup Cost": 0.0,
      "Total Cost": 22.7,
      "Plan Rows": 1270,
      "Plan Width": 36
    }
  }
]"#;

/// Example tree: a result node with one regular and one init-plan child.
///
/// Execution value is `10.0 + 1.5 = 11.5`.
pub fn sample_tree() -> PlanNode {
    PlanNode::new("Result", 10.0)
        .child(PlanNode::new("Seq Scan", 6.0).table("t").filter("(x > 1)"))
        .child(
            PlanNode::new("Limit", 1.5)
                .init_plan()
                .child(PlanNode::new("Index Scan", 1.0).table("u").index("u_pkey")),
        )
}

/// Visit every node of a flame tree in depth-first pre-order.
pub fn walk<'a>(node: &'a FlameNode, visit: &mut dyn FnMut(&'a FlameNode)) {
    visit(node);
    for child in &node.children {
        walk(child, visit);
    }
}

/// Collect the names of every node of a flame tree in depth-first pre-order.
pub fn names(node: &FlameNode) -> Vec<String> {
    let mut out = Vec::new();
    walk(node, &mut |n| out.push(n.name.clone()));
    out
}
