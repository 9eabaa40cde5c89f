//! Audit filter configuration
//!
//! This module provides the AuditFilter struct that decides which
//! dependency entries are evaluated at all.

use crate::domain::DependencyEntry;

/// Filter configuration for the audit
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Dependencies to skip
    pub exclude: Vec<String>,
    /// If non-empty, only audit these dependencies
    pub only: Vec<String>,
}

impl AuditFilter {
    /// Create a new AuditFilter with default settings (audit all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dependencies to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set dependencies to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if a dependency should be audited
    pub fn should_audit(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }

    /// Keep the entries that pass the filter, in order
    pub fn apply(&self, entries: Vec<DependencyEntry>) -> Vec<DependencyEntry> {
        entries
            .into_iter()
            .filter(|e| self.should_audit(&e.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filter() {
        let filter = AuditFilter::new();
        assert!(filter.exclude.is_empty());
        assert!(filter.only.is_empty());
    }

    #[test]
    fn test_should_audit_no_filter() {
        let filter = AuditFilter::new();
        assert!(filter.should_audit("lodash"));
        assert!(filter.should_audit("acme/widget"));
    }

    #[test]
    fn test_should_audit_with_only() {
        let filter = AuditFilter::new().with_only(vec!["lodash".to_string()]);
        assert!(filter.should_audit("lodash"));
        assert!(!filter.should_audit("react"));
    }

    #[test]
    fn test_should_audit_with_exclude() {
        let filter = AuditFilter::new().with_exclude(vec!["react".to_string()]);
        assert!(filter.should_audit("lodash"));
        assert!(!filter.should_audit("react"));
    }

    #[test]
    fn test_only_takes_precedence_over_exclude() {
        let filter = AuditFilter::new()
            .with_only(vec!["lodash".to_string()])
            .with_exclude(vec!["lodash".to_string()]);
        assert!(filter.should_audit("lodash"));
    }

    #[test]
    fn test_apply_keeps_order() {
        let filter = AuditFilter::new().with_exclude(vec!["b".to_string()]);
        let entries = vec![
            DependencyEntry::new("c", "1.0.0"),
            DependencyEntry::new("b", "1.0.0"),
            DependencyEntry::new("a", "1.0.0"),
        ];
        let names: Vec<String> = filter.apply(entries).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["c", "a"]);
    }
}
