/// Turns `validator` results into ordered field violations
///
/// `ValidationErrors` is keyed by a hash map, so the order of fields is not
/// stable. Callers pass the declaration order of their fields together with
/// the camelCase name clients know them by.

use validator::{Validate, ValidationErrors};

use super::{FieldViolation, StoreError, StoreResult};

/// Runs `input.validate()` and maps any failure to `StoreError::Validation`
///
/// `fields` lists `(rust_name, client_name)` pairs in the order messages
/// should appear.
pub fn check<T: Validate>(input: &T, fields: &[(&str, &str)]) -> StoreResult<()> {
    input
        .validate()
        .map_err(|errors| StoreError::Validation(collect_violations(&errors, fields)))
}

/// Flattens validation errors into one violation per failed constraint
pub fn collect_violations(errors: &ValidationErrors, fields: &[(&str, &str)]) -> Vec<FieldViolation> {
    let field_errors = errors.field_errors();

    let mut violations = Vec::new();
    for &(name, client_name) in fields {
        if let Some(errors) = field_errors.get(name) {
            for error in errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", client_name));
                violations.push(FieldViolation::new(client_name, message));
            }
        }
    }

    violations
}
