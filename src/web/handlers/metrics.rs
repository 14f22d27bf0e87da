use salvo::prelude::*;
use serde_json::json;

use crate::web::metrics::format_prometheus;
use crate::web::web_state;

#[handler]
pub async fn metrics(res: &mut Response) {
    let state = web_state();
    let uptime_seconds = state.started_at.elapsed().as_secs();

    let metrics_payload = json!({
        "service": {
            "status": "running",
            "uptime_seconds": uptime_seconds,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "joins": state.metrics.snapshot(),
    });

    res.render(Json(metrics_payload));
}

#[handler]
pub async fn prometheus(res: &mut Response) {
    let state = web_state();
    let body = format_prometheus(
        &state.metrics.snapshot(),
        state.started_at.elapsed().as_secs(),
    );
    res.render(Text::Plain(body));
}
