//! Domain types for a parsed query plan.
//!
//! These are produced by [`parse_plan_json`](super::parse_plan_json) and
//! consumed by the flame transformation. Descriptive attributes are optional;
//! the flame layer treats `None`, empty strings and zero counts alike.

/// `Parent Relationship` value marking a node whose time is not included in
/// its parent's reported time.
pub const INIT_PLAN_RELATIONSHIP: &str = "InitPlan";

/// A complete analyzed plan: the execution tree plus statement-level timings.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Time spent planning the statement, in milliseconds.
    pub planning_time: f64,
    /// Total execution time reported by the server, when present.
    pub execution_time: Option<f64>,
    /// Root of the execution tree.
    pub root: PlanNode,
}

/// One step of the execution plan.
///
/// Use [`PlanNode::new`] for the required fields, then chain the optional
/// setters (builder-style).
#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    /// Operation name, e.g. `Seq Scan` or `Hash Join`.
    pub method: String,
    /// Relation the node reads, if any.
    pub table: Option<String>,
    /// Index the node uses, if any.
    pub index: Option<String>,
    /// How this node relates to its parent (`Outer`, `Inner`, `InitPlan`, ...).
    pub parent_relationship: Option<String>,
    /// Time reported for the node (`Actual Total Time`), in milliseconds.
    pub total_time: f64,
    pub filter: Option<String>,
    pub join_filter: Option<String>,
    pub hash_cond: Option<String>,
    pub index_cond: Option<String>,
    pub recheck_cond: Option<String>,
    pub buffers_hit: Option<u64>,
    pub buffers_read: Option<u64>,
    pub hash_buckets: Option<u64>,
    pub hash_batches: Option<u64>,
    /// Peak memory usage in kilobytes.
    pub memory_usage: Option<u64>,
    /// Child nodes in plan order.
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Create a node with the given method and total time and no optional
    /// attributes.
    pub fn new(method: impl Into<String>, total_time: f64) -> Self {
        Self {
            method: method.into(),
            table: None,
            index: None,
            parent_relationship: None,
            total_time,
            filter: None,
            join_filter: None,
            hash_cond: None,
            index_cond: None,
            recheck_cond: None,
            buffers_hit: None,
            buffers_read: None,
            hash_buckets: None,
            hash_batches: None,
            memory_usage: None,
            children: Vec::new(),
        }
    }

    /// Whether this node is an init-plan: its time must be added to the
    /// parent explicitly.
    pub fn is_init_plan(&self) -> bool {
        self.parent_relationship.as_deref() == Some(INIT_PLAN_RELATIONSHIP)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PlanNode::node_count).sum::<usize>()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn parent_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.parent_relationship = Some(relationship.into());
        self
    }

    /// Shorthand for `parent_relationship("InitPlan")`.
    pub fn init_plan(self) -> Self {
        self.parent_relationship(INIT_PLAN_RELATIONSHIP)
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn join_filter(mut self, join_filter: impl Into<String>) -> Self {
        self.join_filter = Some(join_filter.into());
        self
    }

    pub fn hash_cond(mut self, cond: impl Into<String>) -> Self {
        self.hash_cond = Some(cond.into());
        self
    }

    pub fn index_cond(mut self, cond: impl Into<String>) -> Self {
        self.index_cond = Some(cond.into());
        self
    }

    pub fn recheck_cond(mut self, cond: impl Into<String>) -> Self {
        self.recheck_cond = Some(cond.into());
        self
    }

    /// Set shared buffer hit and read counts.
    pub fn buffers(mut self, hit: u64, read: u64) -> Self {
        self.buffers_hit = Some(hit);
        self.buffers_read = Some(read);
        self
    }

    /// Set hash table bucket and batch counts.
    pub fn hash_table(mut self, buckets: u64, batches: u64) -> Self {
        self.hash_buckets = Some(buckets);
        self.hash_batches = Some(batches);
        self
    }

    pub fn memory_usage(mut self, kilobytes: u64) -> Self {
        self.memory_usage = Some(kilobytes);
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }
}
