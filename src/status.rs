use serde_json::Value;

use crate::error::RecordError;

/// Fixed verdict sentence for a known review status. The set is closed: the
/// reviewer either took the work, approved it, or returned it.
fn verdict_for(status: &str) -> Option<&'static str> {
    match status {
        "approved" => Some("Работа проверена: ревьюеру всё понравилось. Ура!"),
        "reviewing" => Some("Работа взята на проверку ревьюером."),
        "rejected" => Some("Работа проверена: у ревьюера есть замечания."),
        _ => None,
    }
}

/// Turn one homework record into the message sent to the chat.
pub fn parse_status(homework: &Value) -> Result<String, RecordError> {
    let name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingName)?;
    let status = homework
        .get("status")
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingStatus)?;
    let verdict = verdict_for(status)
        .ok_or_else(|| RecordError::UnknownStatus(status.to_string()))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name, verdict
    ))
}
