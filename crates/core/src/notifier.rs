//! Delivery of referral payloads to the automation webhook.
//!
//! Delivery is a single best-effort attempt. Failures are logged and reported as `false`;
//! they are never turned into errors for the caller.

use crate::payload::ReferralPayload;
use crate::{ReferralError, ReferralResult};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Forward `payload`; returns `true` only if the far end accepted it.
    async fn notify(&self, payload: &ReferralPayload) -> bool;
}

/// POSTs payloads as JSON to a fixed URL.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl WebhookNotifier {
    /// Create a notifier for `url` whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ReferralError::InvalidWebhookUrl` if the URL does not parse or is not
    /// `http`/`https`, and `ReferralError::HttpClient` if the client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> ReferralResult<Self> {
        let url = parse_webhook_url(url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReferralError::HttpClient)?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Validate a webhook URL.
pub fn parse_webhook_url(url: &str) -> ReferralResult<reqwest::Url> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| ReferralError::InvalidWebhookUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ReferralError::InvalidWebhookUrl(format!(
            "{url}: unsupported scheme '{other}'"
        ))),
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &ReferralPayload) -> bool {
        tracing::info!(
            "sending referral for {} to {} via webhook",
            payload.specialty,
            payload.provider_name
        );

        let response = match self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("webhook connection error: {}", e);
                return false;
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!("webhook accepted referral ({})", status);
            true
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("webhook rejected referral ({}): {}", status, body);
            false
        }
    }
}

/// Used when no webhook is configured; every notification is reported as undelivered.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, payload: &ReferralPayload) -> bool {
        tracing::warn!(
            "no webhook configured; referral for {} not forwarded",
            payload.patient_name
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn payload() -> ReferralPayload {
        ReferralPayload {
            patient_name: "John Smith".into(),
            provider_name: "Dr. Emily Chen".into(),
            facility: "Mercy General".into(),
            specialty: "cardiology".into(),
            action_label: "Referral (IN-NETWORK)".into(),
            coverage_status: "IN-NETWORK".into(),
            copay: "$25.00".into(),
            notify_email: Some("care@example.org".into()),
        }
    }

    #[tokio::test]
    async fn success_status_reports_delivery() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook/referral")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "doctor_name": "Dr. Emily Chen",
                "hospital": "Mercy General",
                "copay": "$25.00",
            })))
            .with_status(200)
            .with_body("queued")
            .create_async()
            .await;

        let url = format!("{}/webhook/referral", server.url());
        let notifier = WebhookNotifier::new(&url, Duration::from_secs(5)).expect("notifier");

        assert!(notifier.notify(&payload()).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_reports_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .with_body("workflow not active")
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/hook", server.url());
        let notifier = WebhookNotifier::new(&url, Duration::from_secs(5)).expect("notifier");

        assert!(!notifier.notify(&payload()).await);
        // A single attempt, no retry.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_error_reports_failure() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:1/hook", Duration::from_secs(2))
            .expect("notifier");
        assert!(!notifier.notify(&payload()).await);
    }

    #[tokio::test]
    async fn unresponsive_webhook_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        // Accept connections and hold them open without ever answering.
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let notifier =
            WebhookNotifier::new(&format!("http://{addr}/hook"), Duration::from_secs(1))
                .expect("notifier");
        let started = std::time::Instant::now();
        let notified = notifier.notify(&payload()).await;
        let elapsed = started.elapsed();

        assert!(!notified);
        assert!(elapsed >= Duration::from_millis(900), "gave up after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "gave up after {elapsed:?}");
        server.abort();
    }

    #[tokio::test]
    async fn disabled_notifier_never_delivers() {
        assert!(!DisabledNotifier.notify(&payload()).await);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            WebhookNotifier::new("ftp://example.org/hook", Duration::from_secs(1)),
            Err(ReferralError::InvalidWebhookUrl(_))
        ));
        assert!(matches!(
            WebhookNotifier::new("not a url", Duration::from_secs(1)),
            Err(ReferralError::InvalidWebhookUrl(_))
        ));
    }
}
