// 📚 Reference Data - grade scale and per-semester module catalogs
// Loaded once, read-only afterwards

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// LABELLED TABLE
// ============================================================================

/// Label -> value map that remembers first-seen order for display.
#[derive(Debug, Clone, Default)]
struct LabelTable {
    rows: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl LabelTable {
    /// Last write wins: a repeated label keeps its position but takes the new value.
    fn insert(&mut self, label: String, value: f64) -> Option<f64> {
        match self.index.get(&label) {
            Some(&i) => Some(std::mem::replace(&mut self.rows[i].1, value)),
            None => {
                self.index.insert(label.clone(), self.rows.len());
                self.rows.push((label, value));
                None
            }
        }
    }

    fn get(&self, label: &str) -> Option<f64> {
        self.index.get(label).map(|&i| self.rows[i].1)
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }

    fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rows.iter().map(|(label, value)| (label.as_str(), *value))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

// ============================================================================
// GRADE SCALE
// ============================================================================

/// Grade label (e.g. "A", "B+") to point value.
#[derive(Debug, Clone, Default)]
pub struct GradeScale {
    table: LabelTable,
}

impl GradeScale {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous points when the label was already present.
    pub fn insert(&mut self, grade: impl Into<String>, points: f64) -> Option<f64> {
        self.table.insert(grade.into(), points)
    }

    pub fn points(&self, grade: &str) -> Option<f64> {
        self.table.get(grade)
    }

    pub fn contains(&self, grade: &str) -> bool {
        self.table.get(grade).is_some()
    }

    /// Grade labels in file order (for pick lists)
    pub fn grades(&self) -> impl Iterator<Item = &str> {
        self.table.labels()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for GradeScale {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut scale = GradeScale::new();
        for (grade, points) in iter {
            scale.insert(grade, points);
        }
        scale
    }
}

// ============================================================================
// MODULE CATALOG
// ============================================================================

/// Module name to credit weight, one catalog per semester.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    table: LabelTable,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous credits when the module was already present.
    pub fn insert(&mut self, module: impl Into<String>, credits: f64) -> Option<f64> {
        self.table.insert(module.into(), credits)
    }

    pub fn credits(&self, module: &str) -> Option<f64> {
        self.table.get(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.table.get(module).is_some()
    }

    /// Module names in file order
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.table.labels()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ModuleCatalog {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut catalog = ModuleCatalog::new();
        for (module, credits) in iter {
            catalog.insert(module, credits);
        }
        catalog
    }
}

// ============================================================================
// API VIEWS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeView {
    pub grade: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleView {
    pub module: String,
    pub credits: f64,
}

impl GradeScale {
    pub fn views(&self) -> Vec<GradeView> {
        self.iter()
            .map(|(grade, points)| GradeView { grade: grade.to_string(), points })
            .collect()
    }
}

impl ModuleCatalog {
    pub fn views(&self) -> Vec<ModuleView> {
        self.iter()
            .map(|(module, credits)| ModuleView { module: module.to_string(), credits })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
