// ⚙️ Configuration - where the reference tables live

use crate::semester::SemesterId;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GRADE_SCALE_FILE: &str = "grade_points.csv";
pub const DEFAULT_SEMESTER_COUNT: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSource {
    pub id: SemesterId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub grade_scale: PathBuf,
    pub semesters: Vec<SemesterSource>,
}

impl Config {
    /// `grade_points.csv` and `semester1.csv`..`semester4.csv` inside `dir`.
    pub fn from_data_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let semesters = (1..=DEFAULT_SEMESTER_COUNT)
            .map(|n| SemesterSource {
                id: SemesterId::new(n),
                path: dir.join(format!("semester{}.csv", n)),
            })
            .collect();

        Config {
            grade_scale: dir.join(GRADE_SCALE_FILE),
            semesters,
        }
    }

    /// Load from a JSON file. Relative paths resolve against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        if self.grade_scale.is_relative() {
            self.grade_scale = base.join(&self.grade_scale);
        }
        for source in &mut self.semesters {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_data_dir(".")
    }
}
