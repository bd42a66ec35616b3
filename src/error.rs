// ⚠️ Ledger Errors
// Load errors abort start-up, selection errors reject a single action

use crate::semester::SemesterId;
use std::path::Path;

/// Everything the loader and the ledger can refuse.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// A reference table could not be read or a row failed presence/numeric checks.
    #[error("malformed input in {source_name}{}: {reason}", at_line(.line))]
    MalformedInput {
        /// File path or reader label the row came from.
        source_name: String,
        /// 1-based line number when the csv reader knows it.
        line: Option<u64>,
        reason: String,
    },

    #[error("unknown module '{module}' for {semester}")]
    UnknownModule { semester: SemesterId, module: String },

    #[error("unknown grade '{0}'")]
    UnknownGrade(String),

    /// Expected during normal use: the user picked a module twice.
    #[error("the module '{module}' has already been added to {semester}")]
    DuplicateModule { semester: SemesterId, module: String },

    #[error("{0} is not loaded")]
    UnknownSemester(SemesterId),

    #[error("both a module and a grade must be selected")]
    MissingSelection,
}

impl LedgerError {
    pub(crate) fn malformed(source_name: impl Into<String>, line: Option<u64>, reason: impl Into<String>) -> Self {
        LedgerError::MalformedInput {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unreadable(path: &Path, err: impl std::fmt::Display) -> Self {
        LedgerError::malformed(path.display().to_string(), None, err.to_string())
    }

    /// True for conditions the front end should show as a notice and move on.
    pub fn is_recoverable_notice(&self) -> bool {
        matches!(self, LedgerError::DuplicateModule { .. })
    }

    /// True for errors raised while loading reference data.
    pub fn is_load_error(&self) -> bool {
        matches!(self, LedgerError::MalformedInput { .. })
    }
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" (line {})", l)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_recoverable_notice() {
        let err = LedgerError::DuplicateModule {
            semester: SemesterId::new(1),
            module: "Math".to_string(),
        };
        assert!(err.is_recoverable_notice());
        assert!(!err.is_load_error());
        assert_eq!(
            err.to_string(),
            "the module 'Math' has already been added to Semester 1"
        );
    }

    #[test]
    fn test_lookup_errors_are_not_notices() {
        assert!(!LedgerError::UnknownGrade("Z".to_string()).is_recoverable_notice());
        assert!(!LedgerError::UnknownModule {
            semester: SemesterId::new(2),
            module: "Art".to_string(),
        }
        .is_recoverable_notice());
    }

    #[test]
    fn test_malformed_message_includes_line() {
        let err = LedgerError::malformed("grade_points.csv", Some(3), "points is not numeric");
        assert!(err.is_load_error());
        assert_eq!(
            err.to_string(),
            "malformed input in grade_points.csv (line 3): points is not numeric"
        );

        let no_line = LedgerError::malformed("semester1.csv", None, "missing column");
        assert_eq!(no_line.to_string(), "malformed input in semester1.csv: missing column");
    }
}
