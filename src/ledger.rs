// 🧮 GPA Ledger - the accumulator
// Owns the grade scale and every semester record for the life of the process

use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::gpa::{classify, compute_gpa, Classification};
use crate::loader::{load_grade_scale, load_module_catalog, Selection};
use crate::reference::{GradeScale, ModuleCatalog};
use crate::report::{OverallSummary, SemesterSummary};
use crate::semester::{Entry, SemesterId, SemesterRecord};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Accumulates module/grade selections per semester.
///
/// Built once from reference data, then passed explicitly to whatever front
/// end drives it. Semesters iterate in ascending id order.
#[derive(Debug, Clone)]
pub struct GpaLedger {
    scale: GradeScale,
    semesters: BTreeMap<SemesterId, SemesterRecord>,
}

/// Outcome of applying a batch of selections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub accepted: usize,
    pub duplicates: usize,
    pub rejected: Vec<(Selection, LedgerError)>,
}

impl GpaLedger {
    pub fn new(scale: GradeScale) -> Self {
        GpaLedger {
            scale,
            semesters: BTreeMap::new(),
        }
    }

    /// Loads the grade scale and every semester catalog named in `config`.
    /// Any unreadable or malformed file aborts the whole load.
    pub fn load(config: &Config) -> Result<Self> {
        let scale = load_grade_scale(&config.grade_scale)?;
        let mut ledger = GpaLedger::new(scale);

        for source in &config.semesters {
            let catalog = load_module_catalog(&source.path)?;
            ledger.register_semester(source.id, catalog);
        }

        info!(
            grades = ledger.scale.len(),
            semesters = ledger.semesters.len(),
            "ledger ready"
        );
        Ok(ledger)
    }

    /// Registers (or replaces) a semester with an empty entry list.
    pub fn register_semester(&mut self, id: SemesterId, catalog: ModuleCatalog) {
        let record = SemesterRecord::new(id, Arc::new(catalog));
        if self.semesters.insert(id, record).is_some() {
            warn!(semester = %id, "semester re-registered, previous entries dropped");
        }
    }

    pub fn grade_scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn semester(&self, id: SemesterId) -> Result<&SemesterRecord> {
        self.semesters.get(&id).ok_or(LedgerError::UnknownSemester(id))
    }

    pub fn semester_ids(&self) -> impl Iterator<Item = SemesterId> + '_ {
        self.semesters.keys().copied()
    }

    pub fn semesters(&self) -> impl Iterator<Item = &SemesterRecord> {
        self.semesters.values()
    }

    // ========================================================================
    // ENTRIES
    // ========================================================================

    /// Accepts one module/grade selection for a semester.
    ///
    /// Checks run in order: blank selection, semester, module, grade,
    /// duplicate. The entry list only changes when every check passes.
    pub fn add_entry(&mut self, semester: SemesterId, module: &str, grade: &str) -> Result<&Entry> {
        let module = module.trim();
        let grade = grade.trim();

        if module.is_empty() || grade.is_empty() {
            return Err(LedgerError::MissingSelection);
        }

        let record = self
            .semesters
            .get_mut(&semester)
            .ok_or(LedgerError::UnknownSemester(semester))?;

        let credits = record
            .catalog()
            .credits(module)
            .ok_or_else(|| LedgerError::UnknownModule {
                semester,
                module: module.to_string(),
            })?;

        let points = self
            .scale
            .points(grade)
            .ok_or_else(|| LedgerError::UnknownGrade(grade.to_string()))?;

        if record.has_module(module) {
            return Err(LedgerError::DuplicateModule {
                semester,
                module: module.to_string(),
            });
        }

        debug!(semester = %semester, module, grade, credits, points, "entry accepted");
        record.push(Entry::new(module, grade, credits, points));

        // just pushed, so the list is non-empty
        Ok(&record.entries()[record.entries().len() - 1])
    }

    /// Applies selections in order. Duplicates and lookup failures are
    /// logged and skipped; accumulated state is never rolled back.
    pub fn apply_selections(&mut self, selections: &[Selection]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for selection in selections {
            match self.add_entry(selection.semester, &selection.module, &selection.grade) {
                Ok(_) => outcome.accepted += 1,
                Err(e) if e.is_recoverable_notice() => {
                    warn!("{}", e);
                    outcome.duplicates += 1;
                }
                Err(e) => {
                    warn!(semester = %selection.semester, "selection rejected: {}", e);
                    outcome.rejected.push((selection.clone(), e));
                }
            }
        }

        outcome
    }

    /// Clears a semester's entries and returns how many were removed.
    pub fn reset_semester(&mut self, semester: SemesterId) -> Result<usize> {
        let record = self
            .semesters
            .get_mut(&semester)
            .ok_or(LedgerError::UnknownSemester(semester))?;

        let removed = record.clear();
        info!(semester = %semester, removed, "semester entries reset");
        Ok(removed)
    }

    // ========================================================================
    // GPA
    // ========================================================================

    pub fn semester_gpa(&self, semester: SemesterId) -> Result<f64> {
        Ok(compute_gpa(self.semester(semester)?.entries()))
    }

    /// All entries, semester-ascending then insertion order.
    pub fn all_entries(&self) -> impl Iterator<Item = &Entry> {
        self.semesters.values().flat_map(|record| record.entries())
    }

    pub fn overall_gpa(&self) -> f64 {
        compute_gpa(self.all_entries())
    }

    pub fn overall_classification(&self) -> Classification {
        classify(self.overall_gpa())
    }

    pub fn semester_summary(&self, semester: SemesterId) -> Result<SemesterSummary> {
        Ok(SemesterSummary::from_record(self.semester(semester)?))
    }

    pub fn overall_summary(&self) -> OverallSummary {
        OverallSummary::from_records(self.semesters.values())
    }
}

// ============================================================================
// TESTS
// ============================================================================
