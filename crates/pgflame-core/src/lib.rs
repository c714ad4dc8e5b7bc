//! Turns PostgreSQL `EXPLAIN (ANALYZE, FORMAT JSON)` output into flame graph
//! data and a self-contained HTML page.
//!
//! - [`plan`]: the input plan tree and its JSON parser.
//! - [`flame`]: the plan-to-flame transformation and per-node detail rows.
//! - [`html`]: serialization of the flame tree into the page template.

pub mod flame;
pub mod html;
pub mod plan;

pub use flame::{FlameNode, build_flame, build_tree};
pub use html::{PageOptions, RenderError, generate};
pub use plan::{Plan, PlanNode, PlanParseError, parse_plan_json};
