//! Build plans handed to the external build tool.

pub mod plan;

pub use plan::{BuildPlan, CompileStep, LinkStep, ProductRef};
