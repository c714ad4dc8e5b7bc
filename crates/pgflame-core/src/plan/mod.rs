//! Plan input: the node tree model and the `EXPLAIN` JSON parser.

pub mod model;
pub mod parser;

pub use model::{INIT_PLAN_RELATIONSHIP, Plan, PlanNode};
pub use parser::{PlanParseError, parse_plan_json};
