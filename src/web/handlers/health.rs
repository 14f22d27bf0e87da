use salvo::prelude::*;
use serde_json::json;

use crate::web::web_state;

#[handler]
pub async fn health_check(res: &mut Response) {
    res.render(Json(json!({ "status": "ok" })));
}

#[handler]
pub async fn get_status(res: &mut Response) {
    let state = web_state();
    let settings = state.service.settings();

    res.render(Json(json!({
        "status": "running",
        "sheet_name": settings.sheet_name,
        "timezone": settings.timezone.name(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    })));
}
