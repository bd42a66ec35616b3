// 📊 Reports - semester and overall summaries for display and JSON output

use crate::gpa::{classify, compute_gpa, format_gpa, Classification};
use crate::semester::{Entry, SemesterId, SemesterRecord};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterSummary {
    pub semester: SemesterId,
    pub entries: Vec<Entry>,
    pub total_credits: f64,
    pub gpa: f64,
    pub classification: Classification,
}

impl SemesterSummary {
    pub fn from_record(record: &SemesterRecord) -> Self {
        let gpa = compute_gpa(record.entries());
        SemesterSummary {
            semester: record.id(),
            entries: record.entries().to_vec(),
            total_credits: record.total_credits(),
            gpa,
            classification: classify(gpa),
        }
    }
}

impl fmt::Display for SemesterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.semester)?;
        for entry in &self.entries {
            writeln!(f, "  {} - {}", entry.module, entry.grade)?;
        }
        write!(f, "{} GPA: {}", self.semester, format_gpa(self.gpa))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub semesters: Vec<SemesterSummary>,
    pub total_credits: f64,
    pub gpa: f64,
    pub classification: Classification,
}

impl OverallSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SemesterRecord>,
    {
        let semesters: Vec<SemesterSummary> = records.into_iter().map(SemesterSummary::from_record).collect();
        let gpa = compute_gpa(semesters.iter().flat_map(|s| s.entries.iter()));
        let total_credits = semesters.iter().map(|s| s.total_credits).sum();

        OverallSummary {
            semesters,
            total_credits,
            gpa,
            classification: classify(gpa),
        }
    }
}

impl fmt::Display for OverallSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for semester in &self.semesters {
            writeln!(f, "{}", semester)?;
            writeln!(f)?;
        }
        writeln!(f, "Overall GPA: {}", format_gpa(self.gpa))?;
        write!(f, "Classification: {}", self.classification)
    }
}
