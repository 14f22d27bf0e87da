use salvo::prelude::*;
use tracing::{error, warn};

use crate::attendance::AttendanceError;
use crate::web::web_state;
use crate::webhook::parse_join_event;

/// Status code returned to the meeting platform for a failed delivery.
pub fn status_for(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::MalformedPayload(_) => StatusCode::PRECONDITION_FAILED,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn reply(res: &mut Response, status: StatusCode) {
    res.status_code(status);
    res.render(status.canonical_reason().unwrap_or_default());
}

#[handler]
pub async fn receive_webhook(req: &mut Request, res: &mut Response) {
    let state = web_state();
    state.metrics.webhook_received();

    let body = match req.payload().await {
        Ok(body) => body.clone(),
        Err(e) => {
            warn!("failed to read webhook body: {}", e);
            state.metrics.webhook_rejected();
            reply(res, StatusCode::PRECONDITION_FAILED);
            return;
        }
    };

    let event = match parse_join_event(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!("webhook rejected ({}): {}", err.kind(), err);
            state.metrics.webhook_rejected();
            reply(res, status_for(&err));
            return;
        }
    };

    match state.service.handle(&event).await {
        Ok(outcome) => {
            state.metrics.join_completed(&outcome.write);
            reply(res, StatusCode::OK);
        }
        Err(err) => {
            match &err {
                AttendanceError::Store(_)
                | AttendanceError::LedgerWriteFailed(_)
                | AttendanceError::Timetable(_)
                | AttendanceError::Roster(_) => {
                    error!("join of {} failed ({}): {}", event.display_name, err.kind(), err)
                }
                _ => warn!("join of {} not recorded ({}): {}", event.display_name, err.kind(), err),
            }
            state.metrics.join_failed();
            reply(res, status_for(&err));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::http::StatusCode;
    use salvo::prelude::Service;
    use salvo::test::TestClient;
    use serde_json::json;

    use super::status_for;
    use crate::attendance::handler::tests::{MONDAY_0905, SHEET, service, sheet};
    use crate::attendance::AttendanceError;
    use crate::config::{Config, LedgerConfig};
    use crate::web::WebServer;
    use crate::web::router::create_router;

    #[tokio::test]
    async fn webhook_route_maps_outcomes_to_status_codes() {
        let store = sheet("");
        let config = Config::from_yaml("sheet:\n  spreadsheet_id: abc123\n  access_token: token\n")
            .expect("config");
        let _server = WebServer::new(
            Arc::new(config),
            Arc::new(service(store.clone(), LedgerConfig::default())),
        );
        let router = Service::new(create_router());

        let joined = json!({
            "event": "meeting.participant_joined",
            "payload": { "object": { "participant": {
                "user_name": "2301 강정민",
                "join_time": MONDAY_0905
            } } }
        })
        .to_string();
        let res = TestClient::post("http://127.0.0.1:3000/webhook")
            .raw_json(joined.clone())
            .send(&router)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(store.cell(SHEET, 2, 1).as_deref(), Some("출석 9:5"));

        // A replay of a recorded join is still a success.
        let res = TestClient::post("http://127.0.0.1:3000/")
            .raw_json(joined)
            .send(&router)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(store.write_count(), 1);

        let res = TestClient::post("http://127.0.0.1:3000/webhook")
            .text("requestBody=1")
            .send(&router)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::PRECONDITION_FAILED));

        let left = json!({
            "event": "meeting.participant_left",
            "payload": { "object": { "participant": { "user_name": "2301 강정민" } } }
        })
        .to_string();
        let res = TestClient::post("http://127.0.0.1:3000/webhook")
            .raw_json(left)
            .send(&router)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let unknown = json!({
            "event": "meeting.participant_joined",
            "payload": { "object": { "participant": {
                "user_name": "Zoom Guest",
                "join_time": MONDAY_0905
            } } }
        })
        .to_string();
        let res = TestClient::post("http://127.0.0.1:3000/webhook")
            .raw_json(unknown)
            .send(&router)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn malformed_payload_maps_to_precondition_failed() {
        assert_eq!(
            status_for(&AttendanceError::MalformedPayload("payload")),
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[test]
    fn engine_failures_map_to_bad_request() {
        let failures = [
            AttendanceError::UnimplementedEvent("meeting.participant_left".to_string()),
            AttendanceError::WeekendNotTracked,
            AttendanceError::NoActiveWindow("20:00".to_string()),
            AttendanceError::UnknownParticipant("Guest".to_string()),
            AttendanceError::IdentityNotInSheet {
                id: "2310".to_string(),
                name: "박지훈".to_string(),
            },
            AttendanceError::LedgerWriteFailed("메인!C2:C2".to_string()),
        ];

        for failure in &failures {
            assert_eq!(status_for(failure), StatusCode::BAD_REQUEST, "{}", failure);
        }
    }
}
