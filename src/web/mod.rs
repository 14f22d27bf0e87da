use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use once_cell::sync::OnceCell;
use salvo::prelude::*;
use tracing::info;

use crate::attendance::AttendanceService;
use crate::config::Config;

pub mod handlers;
pub mod metrics;
pub mod router;

use self::metrics::JoinMetrics;
use self::router::create_router;

pub struct WebState {
    pub service: Arc<AttendanceService>,
    pub metrics: JoinMetrics,
    pub started_at: Instant,
}

static WEB_STATE: OnceCell<WebState> = OnceCell::new();

pub fn web_state() -> &'static WebState {
    WEB_STATE
        .get()
        .expect("web state is not initialized before handler execution")
}

#[derive(Clone)]
pub struct WebServer {
    config: Arc<Config>,
}

impl WebServer {
    pub fn new(config: Arc<Config>, service: Arc<AttendanceService>) -> Self {
        let _ = WEB_STATE.set(WebState {
            service,
            metrics: JoinMetrics::new(),
            started_at: Instant::now(),
        });

        Self { config }
    }

    pub async fn start(&self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );
        info!("starting webhook server on {}", bind_addr);

        let acceptor = TcpListener::new(bind_addr).bind().await;
        Server::new(acceptor).serve(create_router()).await;

        Ok(())
    }
}
