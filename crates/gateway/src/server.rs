use std::{
    future::{Future, IntoFuture},
    sync::Arc,
    time::Duration,
};

#[cfg(feature = "prometheus")]
use axum::http::header;
use {
    axum::{
        Router,
        body::Bytes,
        extract::{State, rejection::BytesRejection},
        http::{Method, StatusCode},
        response::{IntoResponse, Json},
        routing::{any, get},
    },
    tokio::{net::TcpListener, signal, sync::oneshot},
    tower_http::trace::TraceLayer,
    tracing::{Instrument, info, info_span, warn},
    uuid::Uuid,
};

use reelbridge_config::ReelbridgeConfig;

use crate::{
    pipeline::handle_webhook,
    state::{GatewayState, build_http_client},
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let router = Router::new()
        .route("/webhook", any(webhook_handler))
        .route("/health", get(health_handler));

    #[cfg(feature = "prometheus")]
    let router = if state.metrics_handle.is_some() {
        router.route("/metrics", get(prometheus_metrics_handler))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the webhook server and run until SIGINT/SIGTERM.
pub async fn start_gateway(config: ReelbridgeConfig) -> anyhow::Result<()> {
    let http = build_http_client(&config.http)?;
    let state = GatewayState::from_config(&config, http);

    #[cfg(feature = "metrics")]
    let state = {
        let handle = reelbridge_metrics::init_metrics(reelbridge_metrics::MetricsRecorderConfig {
            enabled: config.metrics.enabled,
        })?;
        reelbridge_metrics::gauge!(
            reelbridge_metrics::system::BUILD_INFO,
            reelbridge_metrics::labels::VERSION => state.version.clone()
        )
        .set(1.0);
        state.with_metrics_handle(handle)
    };

    let listener = TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    let session = if config.session.id.is_empty() {
        "any (accept-all)".to_string()
    } else {
        config.session.id.clone()
    };
    let lines = [
        format!("reelbridge v{}", state.version),
        format!("listening on http://{addr}/webhook"),
        format!("session: {session}"),
        format!("lookup credentials: {}", config.lookup.keys.len()),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    let app = build_gateway_app(Arc::new(state));
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    serve_until(listener, app, shutdown_signal(), grace).await?;

    info!("server stopped");
    Ok(())
}

/// Serve `app` until `shutdown` resolves, then stop accepting connections and
/// give in-flight requests up to `grace` to finish before returning.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let forced_close = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result,
        () = forced_close => {
            warn!(grace_secs = grace.as_secs(), "shutdown grace period elapsed, closing remaining connections");
            Ok(())
        },
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// Acknowledges every delivery with `200 OK`; the sender retries anything
/// else, which would relay the same video twice.
async fn webhook_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    async {
        #[cfg(feature = "metrics")]
        reelbridge_metrics::counter!(reelbridge_metrics::webhook::RECEIVED_TOTAL).increment(1);

        if method != Method::POST {
            info!(%method, "ignoring non-POST webhook request");
            return;
        }
        match body {
            Ok(raw) => handle_webhook(&state, &raw).await,
            Err(e) => warn!(error = %e, "failed to read webhook body"),
        }
    }
    .instrument(info_span!("webhook", %request_id))
    .await;

    (StatusCode::OK, "OK")
}

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
    }))
}

/// Prometheus text exposition, unauthenticated for scrapers.
#[cfg(feature = "prometheus")]
async fn prometheus_metrics_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    match state.metrics_handle.as_ref() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not enabled".to_string(),
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        reelbridge_media::{CredentialSet, RapidApiLookup, VideoResolver},
        reelbridge_whatsapp::{WhatsAppGatewayConfig, WhatsAppOutbound},
    };

    fn unconfigured_state() -> Arc<GatewayState> {
        let http = reqwest::Client::new();
        Arc::new(GatewayState::new(
            "",
            "",
            VideoResolver::new(
                Arc::new(RapidApiLookup::new(http.clone(), "", "http://127.0.0.1:9")),
                CredentialSet::default(),
            ),
            Arc::new(WhatsAppOutbound::new(http, WhatsAppGatewayConfig::default())),
        ))
    }

    #[tokio::test]
    async fn graceful_shutdown_returns_when_idle() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(
            listener,
            build_gateway_app(unconfigured_state()),
            async {
                rx.await.ok();
            },
            Duration::from_secs(1),
        ));

        let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(resp.status(), 200);
        drop(resp);

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn stuck_request_is_cut_off_after_grace() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (entered_tx, entered_rx) = oneshot::channel::<()>();
        let entered_tx = Arc::new(std::sync::Mutex::new(Some(entered_tx)));
        let app = Router::new().route(
            "/stuck",
            get(move || {
                let entered = entered_tx.clone();
                async move {
                    let tx = entered.lock().unwrap().take();
                    if let Some(tx) = tx {
                        let _ = tx.send(());
                    }
                    std::future::pending::<&'static str>().await
                }
            }),
        );

        let grace = Duration::from_millis(300);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(
            listener,
            app,
            async {
                stop_rx.await.ok();
            },
            grace,
        ));
        let client = tokio::spawn(reqwest::get(format!("http://{addr}/stuck")));
        entered_rx.await.unwrap();

        let signalled = std::time::Instant::now();
        stop_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server kept waiting on the stuck request")
            .unwrap()
            .unwrap();
        assert!(signalled.elapsed() >= grace);
        client.abort();
    }
}
