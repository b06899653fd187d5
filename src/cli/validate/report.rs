//! Validation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::fmt::plural_s;

/// A single validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Route key or file the problem is about.
    pub target: String,
    /// Error reason/message.
    pub reason: String,
}

/// Report section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    /// Manifest presence, shape and revision
    Manifest,
    /// Route keys missing from or unexpected in the manifest
    Routes,
    /// Digests that differ from a fresh computation
    Digests,
    /// Referenced files missing on disk
    Assets,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Routes => "routes",
            Self::Digests => "digests",
            Self::Assets => "assets",
        }
    }
}

/// All problems found, grouped by section
#[derive(Debug, Default)]
pub struct ValidationReport {
    sections: BTreeMap<Section, Vec<ValidationError>>,
}

impl ValidationReport {
    pub fn add(&mut self, section: Section, target: impl Into<String>, reason: impl Into<String>) {
        self.sections.entry(section).or_default().push(ValidationError {
            target: target.into(),
            reason: reason.into(),
        });
    }

    pub fn errors(&self, section: Section) -> &[ValidationError] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Print the full report to stderr.
    pub fn print(&self) {
        for (section, errors) in &self.sections {
            eprintln!();
            eprintln!(
                "{} {}",
                section.name().red().bold(),
                format!("({} error{})", errors.len(), plural_s(errors.len())).dimmed()
            );
            for e in errors {
                if e.reason.is_empty() {
                    eprintln!("{} {}", "→".red(), e.target);
                } else {
                    eprintln!("{} {} {}", "→".red(), e.target.cyan(), e.reason);
                }
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.error_count();
        if total == 0 {
            write!(f, "{}", "all checks passed".green())
        } else {
            write!(
                f,
                "{} {}",
                format!("{total} problem{}", plural_s(total)).red().bold(),
                format!("in {} section{}", self.sections.len(), plural_s(self.sections.len())).dimmed()
            )
        }
    }
}
