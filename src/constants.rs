#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// File name tried first when looking for the student's stylesheet
pub const DEFAULT_STYLESHEET: &str = "styles.css";

/// HTML entry point scanned for `<link rel="stylesheet">` tags
pub const HTML_ENTRY_POINT: &str = "index.html";

/// Late cutoff: 09 Oct 2025, 11:59 PM Riyadh time (UTC+03:00)
pub const DEFAULT_DUE: &str = "2025-10-09T23:59:00+03:00";

/// Directory all grading artefacts are written to
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Header of the persisted grade record. Downstream consumers parse this
/// exact column order.
pub const CSV_HEADER: &str = "student_username,obtained_marks,total_marks,status";

/// Maximum total a report can carry
pub const TOTAL_MARKS: u32 = 100;

/// Submission marks for an on-time submission
pub const ON_TIME_SUBMISSION_MARKS: u32 = 20;

/// Submission marks for a late submission
pub const LATE_SUBMISSION_MARKS: u32 = 10;

/// Student identifier used when nothing else can be resolved
pub const FALLBACK_STUDENT_ID: &str = "student";

/// Marker rendered in place of a commit time that could not be determined
pub const UNKNOWN_COMMIT_TIME: &str = "unknown";
