//! Column typing and role resolution.

mod resolver;
mod types;

pub use resolver::{ColumnResolver, NamePattern, ResolvedColumns};
pub use types::{ColumnType, VitalRole};
