use serde_json::Value;

use crate::error::CycleError;
use crate::models::HomeworkRecord;

/// Checks the payload shape and returns the newest homework (element 0).
pub fn check_response(payload: &Value) -> Result<HomeworkRecord, CycleError> {
    let object = payload
        .as_object()
        .ok_or_else(|| shape_error(format!("response is {}, expected an object", kind(payload))))?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| shape_error("response has no `homeworks` key".to_string()))?;

    let homeworks = homeworks.as_array().ok_or_else(|| {
        shape_error(format!("`homeworks` is {}, expected an array", kind(homeworks)))
    })?;

    let latest = homeworks.first().ok_or_else(|| {
        tracing::error!("Homework list is empty");
        CycleError::Empty
    })?;

    let name = non_empty_str(latest, "homework_name")?;
    let status = non_empty_str(latest, "status")?;

    Ok(HomeworkRecord {
        name: name.to_string(),
        status: status.to_string(),
    })
}

fn non_empty_str<'a>(homework: &'a Value, field: &'static str) -> Result<&'a str, CycleError> {
    match homework.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            tracing::error!(field, "Homework record is missing a field");
            Err(CycleError::Field(field))
        }
    }
}

fn shape_error(message: String) -> CycleError {
    tracing::error!(%message, "Unexpected homework API response");
    CycleError::Shape(message)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
