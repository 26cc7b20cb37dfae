//! Validation of resolved migration settings.
//!
//! All violations are collected and reported in a fixed field order, so the
//! first reported field is deterministic.

use crate::config::{keys, MigrationConfig};
use crate::error::Result;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Validated fields as `(struct field, settings key)`, in reporting order.
const FIELD_ORDER: [(&str, &str); 6] = [
    ("dialect", keys::DB),
    ("user", keys::USER),
    ("host", keys::HOST),
    ("port", keys::PORT),
    ("dbname", keys::DBNAME),
    ("sslmode", keys::SSLMODE),
];

/// A single invalid setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Settings key of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every setting that failed validation, in reporting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    fn from_errors(errors: &ValidationErrors) -> Self {
        let field_errors = errors.field_errors();

        let violations = FIELD_ORDER
            .iter()
            .filter_map(|&(name, key)| {
                let (_, errs) = field_errors.iter().find(|(field, _)| {
                    let field: &str = field;
                    field == name
                })?;
                let message = errs
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), ToString::to_string)
                    })
                    .unwrap_or_default();
                Some(FieldViolation {
                    field: key,
                    message,
                })
            })
            .collect();

        Self { violations }
    }

    /// All violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Settings keys that failed, in reporting order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// The first failing settings key.
    #[must_use]
    pub fn first_field(&self) -> Option<&'static str> {
        self.violations.first().map(|v| v.field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid database configuration: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Check a defaulted configuration for completeness.
pub fn validate_config(config: &MigrationConfig) -> Result<()> {
    config
        .validate()
        .map_err(|errors| ValidationFailure::from_errors(&errors).into())
}
