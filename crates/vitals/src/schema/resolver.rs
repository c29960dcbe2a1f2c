//! Heuristic resolution of vital-sign roles from column names.
//!
//! Upstream exports name their columns inconsistently ("Heart Rate",
//! `heart_rate_bpm`, `SpO2_Percent`, ...). Instead of a fixed schema, each
//! [`VitalRole`] is matched against column names with case-insensitive
//! substring patterns kept in an explicit rule table.

use indexmap::IndexMap;
use serde::Serialize;

use super::types::VitalRole;

/// A name matches a pattern when it contains every one of its fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    fragments: Vec<String>,
}

impl NamePattern {
    /// Build a pattern from lowercase fragments.
    pub fn all_of<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Test a lowercased column name.
    fn matches(&self, lowered: &str) -> bool {
        self.fragments.iter().all(|f| lowered.contains(f.as_str()))
    }
}

/// Default rule table. A role matches when any of its patterns matches.
const DEFAULT_RULES: &[(VitalRole, &[&[&str]])] = &[
    (VitalRole::HeartRate, &[&["heart", "rate"]]),
    (
        VitalRole::OxygenSaturation,
        &[&["oxygen", "sat"], &["spo2"], &["oxygen saturation"]],
    ),
    (VitalRole::Timestamp, &[&["timestamp"]]),
];

/// Maps column names to vital-sign roles.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    rules: IndexMap<VitalRole, Vec<NamePattern>>,
}

impl ColumnResolver {
    /// Create a resolver with the default rule table.
    pub fn new() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(role, patterns)| {
                let patterns = patterns.iter().map(|p| NamePattern::all_of(*p)).collect();
                (*role, patterns)
            })
            .collect();
        Self { rules }
    }

    /// Register an additional synonym pattern for a role.
    pub fn with_pattern(mut self, role: VitalRole, pattern: NamePattern) -> Self {
        self.rules.entry(role).or_default().push(pattern);
        self
    }

    /// Find the first column, in column order, that fulfills `role`.
    pub fn resolve<'a>(&self, headers: &'a [String], role: VitalRole) -> Option<&'a str> {
        let patterns = self.rules.get(&role)?;
        headers
            .iter()
            .find(|name| {
                let lowered = name.to_lowercase();
                patterns.iter().any(|p| p.matches(&lowered))
            })
            .map(String::as_str)
    }

    /// Resolve every known role against a header row.
    pub fn resolve_all(&self, headers: &[String]) -> ResolvedColumns {
        ResolvedColumns {
            heart_rate: self.resolve(headers, VitalRole::HeartRate).map(str::to_string),
            oxygen_saturation: self
                .resolve(headers, VitalRole::OxygenSaturation)
                .map(str::to_string),
            timestamp: self.resolve(headers, VitalRole::Timestamp).map(str::to_string),
        }
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Columns resolved for each role of one dataset. Absent roles are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub heart_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
    pub timestamp: Option<String>,
}

impl ResolvedColumns {
    /// Column resolved for `role`.
    pub fn get(&self, role: VitalRole) -> Option<&str> {
        match role {
            VitalRole::HeartRate => self.heart_rate.as_deref(),
            VitalRole::OxygenSaturation => self.oxygen_saturation.as_deref(),
            VitalRole::Timestamp => self.timestamp.as_deref(),
        }
    }
}
