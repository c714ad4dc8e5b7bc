//! Parser for `EXPLAIN (ANALYZE, BUFFERS, FORMAT JSON)` output.
//!
//! PostgreSQL emits a one-element JSON array whose object holds the `Plan`
//! tree and statement-level timings. Keys not needed for the flame graph are
//! ignored. A node's time is its `Actual Total Time` as reported; it is not
//! scaled by `Actual Loops`, since parallel workers report an average that
//! would otherwise exceed the parent's wall time.

use serde::Deserialize;
use thiserror::Error;

use super::model::{Plan, PlanNode};

/// Errors that can occur while parsing plan JSON.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan JSON contains no plans")]
    EmptyPlan,

    #[error("plan has no timing information (run EXPLAIN with ANALYZE)")]
    MissingAnalyze,
}

#[derive(Debug, Deserialize)]
struct RawExplain {
    #[serde(rename = "Plan")]
    plan: RawNode,
    #[serde(rename = "Planning Time", default)]
    planning_time: f64,
    #[serde(rename = "Execution Time", default)]
    execution_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "Node Type")]
    node_type: String,
    #[serde(rename = "Relation Name", default)]
    relation_name: Option<String>,
    #[serde(rename = "Index Name", default)]
    index_name: Option<String>,
    #[serde(rename = "Parent Relationship", default)]
    parent_relationship: Option<String>,
    #[serde(rename = "Actual Total Time", default)]
    actual_total_time: Option<f64>,
    #[serde(rename = "Filter", default)]
    filter: Option<String>,
    #[serde(rename = "Join Filter", default)]
    join_filter: Option<String>,
    #[serde(rename = "Hash Cond", default)]
    hash_cond: Option<String>,
    #[serde(rename = "Index Cond", default)]
    index_cond: Option<String>,
    #[serde(rename = "Recheck Cond", default)]
    recheck_cond: Option<String>,
    #[serde(rename = "Shared Hit Blocks", default)]
    shared_hit_blocks: Option<u64>,
    #[serde(rename = "Shared Read Blocks", default)]
    shared_read_blocks: Option<u64>,
    #[serde(rename = "Hash Buckets", default)]
    hash_buckets: Option<u64>,
    #[serde(rename = "Hash Batches", default)]
    hash_batches: Option<u64>,
    #[serde(rename = "Peak Memory Usage", default)]
    peak_memory_usage: Option<u64>,
    #[serde(rename = "Plans", default)]
    plans: Vec<RawNode>,
}

impl From<RawNode> for PlanNode {
    fn from(raw: RawNode) -> Self {
        Self {
            method: raw.node_type,
            table: raw.relation_name,
            index: raw.index_name,
            parent_relationship: raw.parent_relationship,
            total_time: raw.actual_total_time.unwrap_or(0.0),
            filter: raw.filter,
            join_filter: raw.join_filter,
            hash_cond: raw.hash_cond,
            index_cond: raw.index_cond,
            recheck_cond: raw.recheck_cond,
            buffers_hit: raw.shared_hit_blocks,
            buffers_read: raw.shared_read_blocks,
            hash_buckets: raw.hash_buckets,
            hash_batches: raw.hash_batches,
            memory_usage: raw.peak_memory_usage,
            children: raw.plans.into_iter().map(PlanNode::from).collect(),
        }
    }
}

/// Parse `EXPLAIN ANALYZE` JSON output into a [`Plan`].
///
/// Only the first statement of the document is used.
pub fn parse_plan_json(content: &str) -> Result<Plan, PlanParseError> {
    let explains: Vec<RawExplain> = serde_json::from_str(content)?;
    let total = explains.len();
    let explain = explains
        .into_iter()
        .next()
        .ok_or(PlanParseError::EmptyPlan)?;

    if total > 1 {
        tracing::debug!(statements = total, "using the first plan of a multi-statement document");
    }

    if explain.plan.actual_total_time.is_none() {
        return Err(PlanParseError::MissingAnalyze);
    }

    let plan = Plan {
        planning_time: explain.planning_time,
        execution_time: explain.execution_time,
        root: PlanNode::from(explain.plan),
    };

    tracing::debug!(
        nodes = plan.root.node_count(),
        planning_time = plan.planning_time,
        "parsed plan"
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_plan() {
        let json = r#"[
          {
            "Plan": {
              "Node Type": "Seq Scan",
              "Relation Name": "users",
              "Actual Total Time": 0.25,
              "Actual Loops": 1
            },
            "Planning Time": 0.1,
            "Execution Time": 0.3
          }
        ]"#;
        let plan = parse_plan_json(json).expect("should parse");
        assert_eq!(plan.planning_time, 0.1);
        assert_eq!(plan.execution_time, Some(0.3));
        assert_eq!(plan.root.method, "Seq Scan");
        assert_eq!(plan.root.table.as_deref(), Some("users"));
        assert_eq!(plan.root.total_time, 0.25);
        assert!(plan.root.children.is_empty());
    }

    #[test]
    fn total_time_is_reported_time() {
        let json = r#"[
          {
            "Plan": {
              "Node Type": "Nested Loop",
              "Actual Total Time": 10.0,
              "Actual Loops": 1,
              "Plans": [
                {
                  "Node Type": "Index Scan",
                  "Parent Relationship": "Inner",
                  "Relation Name": "orders",
                  "Index Name": "orders_user_id_idx",
                  "Actual Total Time": 0.5,
                  "Actual Loops": 4
                }
              ]
            }
          }
        ]"#;
        let plan = parse_plan_json(json).expect("should parse");
        assert_eq!(plan.root.children[0].total_time, 0.5);
        assert_eq!(plan.root.children[0].index.as_deref(), Some("orders_user_id_idx"));
    }

    #[test]
    fn parallel_workers_stay_within_gather() {
        let json = r#"[
          {
            "Plan": {
              "Node Type": "Gather",
              "Workers Planned": 2,
              "Workers Launched": 2,
              "Actual Total Time": 100.0,
              "Actual Loops": 1,
              "Plans": [
                {
                  "Node Type": "Parallel Seq Scan",
                  "Parent Relationship": "Outer",
                  "Parallel Aware": true,
                  "Relation Name": "events",
                  "Actual Total Time": 95.0,
                  "Actual Loops": 3
                }
              ]
            }
          }
        ]"#;
        let plan = parse_plan_json(json).expect("should parse");
        assert_eq!(plan.root.total_time, 100.0);
        assert_eq!(plan.root.children[0].total_time, 95.0);
    }

    #[test]
    fn planning_time_defaults_to_zero() {
        let json = r#"[{"Plan": {"Node Type": "Result", "Actual Total Time": 1.0}}]"#;
        let plan = parse_plan_json(json).expect("should parse");
        assert_eq!(plan.planning_time, 0.0);
        assert_eq!(plan.execution_time, None);
    }

    #[test]
    fn reads_descriptive_attributes() {
        let json = r#"[
          {
            "Plan": {
              "Node Type": "Hash",
              "Actual Total Time": 3.0,
              "Actual Loops": 1,
              "Hash Buckets": 1024,
              "Hash Batches": 1,
              "Peak Memory Usage": 72,
              "Shared Hit Blocks": 12,
              "Shared Read Blocks": 3,
              "Filter": "(active IS TRUE)"
            }
          }
        ]"#;
        let node = parse_plan_json(json).expect("should parse").root;
        assert_eq!(node.hash_buckets, Some(1024));
        assert_eq!(node.hash_batches, Some(1));
        assert_eq!(node.memory_usage, Some(72));
        assert_eq!(node.buffers_hit, Some(12));
        assert_eq!(node.buffers_read, Some(3));
        assert_eq!(node.filter.as_deref(), Some("(active IS TRUE)"));
    }

    #[test]
    fn preserves_child_order() {
        let json = r#"[
          {
            "Plan": {
              "Node Type": "Append",
              "Actual Total Time": 3.0,
              "Plans": [
                {"Node Type": "Seq Scan", "Relation Name": "a", "Actual Total Time": 1.0},
                {"Node Type": "Seq Scan", "Relation Name": "b", "Actual Total Time": 1.0},
                {"Node Type": "Seq Scan", "Relation Name": "c", "Actual Total Time": 1.0}
              ]
            }
          }
        ]"#;
        let plan = parse_plan_json(json).expect("should parse");
        let tables: Vec<_> = plan
            .root
            .children
            .iter()
            .map(|c| c.table.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(tables, vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_empty_array() {
        let err = parse_plan_json("[]").unwrap_err();
        assert!(
            matches!(err, PlanParseError::EmptyPlan),
            "expected EmptyPlan, got: {err}"
        );
    }

    #[test]
    fn rejects_plan_without_analyze() {
        let json = r#"[{"Plan": {"Node Type": "Seq Scan", "Total Cost": 35.5}}]"#;
        let err = parse_plan_json(json).unwrap_err();
        assert!(
            matches!(err, PlanParseError::MissingAnalyze),
            "expected MissingAnalyze, got: {err}"
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_plan_json("QUERY PLAN\n----------").unwrap_err();
        assert!(
            matches!(err, PlanParseError::Json(_)),
            "expected Json, got: {err}"
        );
    }

    #[test]
    fn rejects_node_without_type() {
        let json = r#"[{"Plan": {"Actual Total Time": 1.0}}]"#;
        let err = parse_plan_json(json).unwrap_err();
        assert!(
            matches!(err, PlanParseError::Json(_)),
            "expected Json, got: {err}"
        );
    }
}
