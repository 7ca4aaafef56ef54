//! Webhook pipeline: normalize, filter, extract, resolve, relay.
//!
//! Stages run strictly in sequence; the first failure ends processing of
//! that webhook. Nothing here decides the HTTP response.

use std::time::Instant;

use tracing::{debug, info, warn};

#[cfg(feature = "metrics")]
use reelbridge_metrics::{counter, histogram, labels, relay as relay_metrics, webhook};

use {
    reelbridge_channels::{Error, MediaReply, Result, gating},
    reelbridge_media::extract_video_link,
    reelbridge_whatsapp::normalize,
};

use crate::state::GatewayState;

/// Run every stage for one raw webhook body.
pub async fn process_webhook(state: &GatewayState, raw: &[u8]) -> Result<()> {
    let message = normalize(raw)?;
    gating::check(&message, &state.expected_session)?;

    let link = extract_video_link(&message.content).ok_or(Error::NoLinkFound)?;
    debug!(link, "found video link");

    let media_url = state
        .resolver
        .resolve(link)
        .await
        .map_err(resolution_error)?;

    if message.sender.is_empty() {
        return Err(Error::MissingRecipient);
    }

    let reply = MediaReply::video(media_url, format!("{}{link}", state.caption_prefix));
    let sent = state.outbound.send_media(&message.sender, &reply).await;
    #[cfg(feature = "metrics")]
    match &sent {
        Ok(()) => counter!(relay_metrics::SENT_TOTAL).increment(1),
        Err(_) => counter!(relay_metrics::FAILED_TOTAL).increment(1),
    }
    sent
}

/// Run the pipeline and log its outcome. Never fails.
pub async fn handle_webhook(state: &GatewayState, raw: &[u8]) {
    let started = Instant::now();
    let outcome = process_webhook(state, raw).await;

    match &outcome {
        Ok(()) => info!(elapsed_ms = started.elapsed().as_millis() as u64, "video relayed"),
        Err(e) if e.is_policy_drop() => info!(stage = e.stage(), reason = %e, "webhook ignored"),
        Err(e) => warn!(stage = e.stage(), error = %e, "webhook dropped"),
    }

    #[cfg(feature = "metrics")]
    {
        match &outcome {
            Ok(()) => counter!(webhook::RELAYED_TOTAL).increment(1),
            Err(e) => counter!(webhook::DROPPED_TOTAL, labels::STAGE => e.stage()).increment(1),
        }
        histogram!(webhook::PROCESSING_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
    }
}

fn resolution_error(err: reelbridge_media::Error) -> Error {
    match err {
        reelbridge_media::Error::NotConfigured { setting } => {
            Error::ConfigurationMissing { setting }
        },
        reelbridge_media::Error::Exhausted { attempts, source } => {
            Error::ResolutionFailed { attempts, source }
        },
        other => Error::resolution_failed(1, other),
    }
}
