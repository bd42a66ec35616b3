// 🗓️ Semester Records
// One append-only list of accepted entries per semester

use crate::reference::ModuleCatalog;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// SEMESTER ID
// ============================================================================

/// 1-based semester number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SemesterId(u8);

impl SemesterId {
    pub const fn new(n: u8) -> Self {
        SemesterId(n)
    }

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SemesterId {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if n == 0 {
            Err("semester numbers start at 1".to_string())
        } else {
            Ok(SemesterId(n))
        }
    }
}

impl From<SemesterId> for u8 {
    fn from(id: SemesterId) -> u8 {
        id.0
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Semester {}", self.0)
    }
}

impl FromStr for SemesterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("Semester ")
            .or_else(|| trimmed.strip_prefix("semester"))
            .unwrap_or(trimmed)
            .trim();

        let n = digits
            .parse::<u8>()
            .map_err(|_| format!("'{}' is not a semester number", s))?;
        SemesterId::try_from(n)
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// One accepted module/grade selection. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub module: String,
    pub grade: String,
    pub credits: f64,
    pub points: f64,
}

impl Entry {
    pub fn new(module: impl Into<String>, grade: impl Into<String>, credits: f64, points: f64) -> Self {
        Entry {
            module: module.into(),
            grade: grade.into(),
            credits,
            points,
        }
    }

    /// credits × points
    pub fn weighted_points(&self) -> f64 {
        self.credits * self.points
    }
}

// ============================================================================
// SEMESTER RECORD
// ============================================================================

#[derive(Debug, Clone)]
pub struct SemesterRecord {
    id: SemesterId,
    catalog: Arc<ModuleCatalog>,
    entries: Vec<Entry>,
}

impl SemesterRecord {
    pub fn new(id: SemesterId, catalog: Arc<ModuleCatalog>) -> Self {
        SemesterRecord {
            id,
            catalog,
            entries: Vec::new(),
        }
    }

    pub fn id(&self) -> SemesterId {
        self.id
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Accepted entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.entries.iter().any(|e| e.module == module)
    }

    pub fn total_credits(&self) -> f64 {
        self.entries.iter().map(|e| e.credits).sum()
    }

    /// Callers check catalog membership and duplicates first.
    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_id_parse() {
        assert_eq!("2".parse::<SemesterId>(), Ok(SemesterId::new(2)));
        assert_eq!(" 3 ".parse::<SemesterId>(), Ok(SemesterId::new(3)));
        assert_eq!("Semester 4".parse::<SemesterId>(), Ok(SemesterId::new(4)));
        assert_eq!("semester1".parse::<SemesterId>(), Ok(SemesterId::new(1)));
        assert!("0".parse::<SemesterId>().is_err());
        assert!("first".parse::<SemesterId>().is_err());
    }

    #[test]
    fn test_semester_id_serde() {
        let id: SemesterId = serde_json::from_str("3").unwrap();
        assert_eq!(id, SemesterId::new(3));
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        assert!(serde_json::from_str::<SemesterId>("0").is_err());
    }

    #[test]
    fn test_semester_id_display_and_order() {
        assert_eq!(SemesterId::new(1).to_string(), "Semester 1");
        assert!(SemesterId::new(1) < SemesterId::new(2));
    }

    #[test]
    fn test_record_tracks_entries() {
        let catalog: ModuleCatalog = vec![("Math", 3.0), ("Eng", 2.0)].into_iter().collect();
        let mut record = SemesterRecord::new(SemesterId::new(1), Arc::new(catalog));

        assert!(record.entries().is_empty());
        record.push(Entry::new("Math", "A", 3.0, 4.0));
        record.push(Entry::new("Eng", "B", 2.0, 3.0));

        assert!(record.has_module("Math"));
        assert!(!record.has_module("Physics"));
        assert_eq!(record.total_credits(), 5.0);
        assert_eq!(record.entries()[1].module, "Eng");
        assert_eq!(record.catalog().len(), 2);

        assert_eq!(record.clear(), 2);
        assert!(record.entries().is_empty());
        assert_eq!(record.catalog().len(), 2);
    }

    #[test]
    fn test_entry_weighted_points() {
        assert_eq!(Entry::new("Math", "A", 3.0, 4.0).weighted_points(), 12.0);
    }
}
