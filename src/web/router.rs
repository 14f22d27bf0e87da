use salvo::prelude::*;

use crate::web::handlers::{
    health::{get_status, health_check},
    metrics::{metrics, prometheus},
    webhook::receive_webhook,
};

pub fn create_router() -> Router {
    Router::new()
        .post(receive_webhook)
        .push(Router::with_path("webhook").post(receive_webhook))
        .push(Router::with_path("health").get(health_check))
        .push(Router::with_path("status").get(get_status))
        .push(
            Router::with_path("metrics")
                .get(metrics)
                .push(Router::with_path("prometheus").get(prometheus)),
        )
}
