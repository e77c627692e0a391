//! Placeholder analyzer
mod placeholder;
mod types;

pub use placeholder::{
    collect_placeholders,
    extract_placeholders,
    find_inconsistencies,
    recompute_issues,
};
pub use types::{
    IssueMap,
    PlaceholderIssue,
};
