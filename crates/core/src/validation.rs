//! Input validation helpers shared by workflow DTOs.
//!
//! DTOs derive [`validator::Validate`]; [`check`] turns the collected field errors into a
//! single [`DomainError::Validation`] before any state is touched.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::DomainError;

/// Runs the derived validation for `input`.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] naming every failing field.
pub fn check<T: Validate>(input: &T) -> Result<(), DomainError> {
    input.validate().map_err(|errs| DomainError::Validation(describe(&errs)))
}

/// Renders validation errors as `field: message` pairs in a stable order.
fn describe(errs: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errs
        .field_errors()
        .iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                format!("{field}: {msg}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Amount must be strictly positive.
pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(error("positive", "must be greater than zero"))
    }
}

/// Amount must be zero or positive.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(error("non_negative", "must not be negative"))
    }
}

/// Text must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("not_blank", "must not be blank"))
    } else {
        Ok(())
    }
}
