use serde::Deserialize;
use serde_json::Value;

use crate::attendance::{AttendanceError, JoinEvent};

pub const PARTICIPANT_JOINED: &str = "meeting.participant_joined";

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    object: PayloadObject,
}

#[derive(Debug, Deserialize)]
struct PayloadObject {
    participant: Participant,
}

#[derive(Debug, Deserialize)]
struct Participant {
    user_name: String,
    join_time: String,
}

/// Extracts the join from a meeting webhook body.
///
/// Bodies that are not JSON or lack the fields a join needs fail with
/// `MalformedPayload`. Any event other than a participant join fails with
/// `UnimplementedEvent`, whatever its payload looks like.
pub fn parse_join_event(body: &[u8]) -> Result<JoinEvent, AttendanceError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| AttendanceError::MalformedPayload("a JSON body"))?;

    let event = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or(AttendanceError::MalformedPayload("event"))?;
    if event != PARTICIPANT_JOINED {
        return Err(AttendanceError::UnimplementedEvent(event.to_string()));
    }

    let payload = value
        .get("payload")
        .cloned()
        .ok_or(AttendanceError::MalformedPayload("payload"))?;
    let payload: WebhookPayload = serde_json::from_value(payload)
        .map_err(|_| AttendanceError::MalformedPayload("payload.object.participant"))?;

    let participant = payload.object.participant;
    Ok(JoinEvent {
        display_name: participant.user_name,
        join_time: participant.join_time,
    })
}
