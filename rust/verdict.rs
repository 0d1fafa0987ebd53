use crate::error::CycleError;
use crate::models::{HomeworkRecord, HomeworkStatus};

pub fn verdict(status: HomeworkStatus) -> &'static str {
    match status {
        HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
        HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
        HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
    }
}

/// Builds the notification text for a record, rejecting undocumented statuses.
pub fn format_status(record: &HomeworkRecord) -> Result<String, CycleError> {
    let status = HomeworkStatus::parse(&record.status).ok_or_else(|| {
        tracing::error!(status = %record.status, "Undocumented homework status");
        CycleError::UnknownStatus(record.status.clone())
    })?;
    tracing::debug!(
        homework = %record.name,
        status = status.as_str(),
        "Parsed homework status"
    );

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name,
        verdict(status)
    ))
}
