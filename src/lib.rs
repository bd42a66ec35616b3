// GPA Ledger - Core Library
// Exposes the loader, ledger and reports for the CLI, TUI and API server

pub mod config;
pub mod error;
pub mod gpa;
pub mod ledger;
pub mod loader;
pub mod reference;
pub mod report;
pub mod semester;

// Re-export commonly used types
pub use config::{Config, SemesterSource};
pub use error::{LedgerError, Result};
pub use gpa::{classify, compute_gpa, format_gpa, Classification};
pub use ledger::{BatchOutcome, GpaLedger};
pub use loader::{
    load_grade_scale, load_grade_scale_from_reader,
    load_module_catalog, load_module_catalog_from_reader,
    load_selections, load_selections_from_reader, Selection,
};
pub use reference::{GradeScale, GradeView, ModuleCatalog, ModuleView};
pub use report::{OverallSummary, SemesterSummary};
pub use semester::{Entry, SemesterId, SemesterRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
