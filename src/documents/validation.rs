//! Field-level input validation for document requests.
//!
//! Validation failures are caller-fixable and are detected before any
//! database lookup or rendering happens.

use std::fmt;

use crate::rut;

/// A single validation failure with enough context to identify the field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} no puede estar vacío", label))
    }

    pub fn invalid_rut(field: &str, value: &str) -> Self {
        Self::new(field, format!("RUT '{}' inválido", value))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Accumulator so a request reports every bad field at once.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), super::DocumentError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            let joined = self
                .errors
                .iter()
                .map(ValidationError::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(super::DocumentError::Invalid(joined))
        }
    }
}

/// Require a non-blank string.
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Require a RUT with a correct check digit.
pub fn validate_rut(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "RUT"));
        return;
    }
    if !rut::validate(trimmed) {
        errors.add(ValidationError::invalid_rut(field, trimmed));
    }
}

/// Require a non-empty list of line items.
pub fn validate_non_empty<T>(items: &[T], field: &str, label: &str, errors: &mut ValidationErrors) {
    if items.is_empty() {
        errors.add(ValidationError::new(
            field,
            format!("{} debe contener al menos un elemento", label),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_multiple_errors() {
        let mut errors = ValidationErrors::new();
        validate_required("", "nombre", "Nombre", &mut errors);
        validate_rut("21402714-4", "rut", &mut errors);
        let err = errors.into_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("[nombre]"));
        assert!(msg.contains("[rut]"));
    }

    #[test]
    fn test_valid_input_passes() {
        let mut errors = ValidationErrors::new();
        validate_required("Juan", "nombre", "Nombre", &mut errors);
        validate_rut("21402714-3", "rut", &mut errors);
        validate_non_empty(&[1], "elementos", "Elementos", &mut errors);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_empty_rut_reports_empty_not_invalid() {
        let mut errors = ValidationErrors::new();
        validate_rut("  ", "rut", &mut errors);
        let msg = errors.into_result().unwrap_err().to_string();
        assert!(msg.contains("vacío"));
    }
}
