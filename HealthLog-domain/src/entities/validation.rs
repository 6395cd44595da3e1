//! Shared validation rules for log payloads

use std::borrow::Cow;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use validator::{ValidationError, ValidationErrors};

/// How far ahead of the server clock a timestamp may lie
pub const MAX_FUTURE_SKEW_MINUTES: i64 = 5;

/// Longest accepted free-text note
pub const MAX_NOTES_LENGTH: u64 = 500;

fn timestamp_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Parse an RFC 3339 timestamp and return it in UTC with millisecond precision
pub fn normalize_timestamp(value: &str) -> Result<String, String> {
    let parsed = DateTime::parse_from_rfc3339(value.trim())
        .map_err(|_| format!("Invalid timestamp format '{}', expected ISO 8601 / RFC 3339", value))?;

    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `validator` hook for the `timestamp` field of every payload
pub fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
        timestamp_error(
            "timestamp_format",
            "Invalid timestamp format, expected ISO 8601 / RFC 3339".to_string(),
        )
    })?;

    let limit = Utc::now() + Duration::minutes(MAX_FUTURE_SKEW_MINUTES);
    if parsed.with_timezone(&Utc) > limit {
        return Err(timestamp_error(
            "timestamp_future",
            "Timestamp cannot be in the future".to_string(),
        ));
    }

    Ok(())
}

/// Flatten `validator` errors into "field: message; field: message".
///
/// Fields are sorted so the message is stable. Struct-level errors come last
/// without a field prefix.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut parts = Vec::new();
    let mut schema_parts = Vec::new();

    for (field, errors) in fields {
        let messages: Vec<String> = errors
            .iter()
            .map(|err| match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid {}", field),
            })
            .collect();

        if *field == "__all__" {
            schema_parts.push(messages.join(", "));
        } else {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
    }

    parts.extend(schema_parts);
    parts.join("; ")
}
