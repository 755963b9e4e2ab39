//! Conversion of `validator` results into faults

use gatehouse_common::{Fault, FieldError};
use validator::ValidationErrors;

/// Turn validation errors into a `ValidationError` fault, one entry per
/// failing field, sorted by field name.
pub fn validation_fault(errors: &ValidationErrors) -> Fault {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));

    Fault::validation("invalid request body", fields)
}
