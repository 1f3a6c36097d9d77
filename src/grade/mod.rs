#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Graded tasks and the recipes their requirements are built from.
pub mod catalog;
/// Requirements and how they are checked against parsed rules.
pub mod requirement;
/// Shared result types.
pub mod results;
/// Final score and status.
pub mod scorer;

pub use catalog::{AliasTable, Catalog, CatalogError, CatalogVersion, Check, TaskDefinition};
pub use requirement::{Evaluation, Requirement, RequirementError, RequirementKind, evaluate};
pub use results::{RequirementOutcome, TaskResult, earned_marks};
pub use scorer::{GradeReport, Status, score};
