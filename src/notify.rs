use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::ImportResult;

/// What the side channel gets told about a finished run.
#[derive(Debug, Clone)]
pub struct Notification {
    pub success: bool,
    pub total_records: usize,
    pub season_range: String,
    pub failed_seasons: Vec<i32>,
    pub duration_seconds: f64,
    pub error_message: Option<String>,
    pub sink_location: Option<String>,
}

impl Notification {
    pub fn from_result(result: &ImportResult, season_range: &str) -> Self {
        Self {
            success: result.is_success(),
            total_records: result.total_records,
            season_range: season_range.to_string(),
            failed_seasons: result.failed_seasons.clone(),
            duration_seconds: result.duration_seconds,
            error_message: (!result.is_success())
                .then(|| "No data loaded: all seasons failed".to_string()),
            sink_location: Some(result.sink_location.clone()),
        }
    }
}

/// Posts run summaries to a Slack incoming webhook.
///
/// Delivery is strictly best-effort: a missing webhook URL or a failed POST
/// is logged and swallowed, never surfaced to the caller.
pub struct SlackNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// Build the webhook payload (attachment with short fields).
    pub fn build_message(notification: &Notification) -> Value {
        let (color, title) = if notification.success {
            ("good", ":white_check_mark: Baseball Data Import Completed")
        } else {
            ("danger", ":x: Baseball Data Import Failed")
        };

        let mut fields = vec![
            json!({"title": "Status", "value": if notification.success { "Success" } else { "Failed" }, "short": true}),
            json!({"title": "Records", "value": notification.total_records.to_string(), "short": true}),
            json!({"title": "Seasons", "value": notification.season_range, "short": true}),
            json!({"title": "Duration", "value": format!("{:.2}s", notification.duration_seconds), "short": true}),
        ];

        if let Some(location) = &notification.sink_location {
            fields.push(json!({"title": "Sink", "value": location, "short": false}));
        }

        if !notification.failed_seasons.is_empty() {
            fields.push(json!({
                "title": "Failed Seasons",
                "value": format!("{:?}", notification.failed_seasons),
                "short": false
            }));
        }

        if let Some(error) = &notification.error_message {
            let truncated: String = error.chars().take(500).collect();
            fields.push(json!({"title": "Error", "value": truncated, "short": false}));
        }

        json!({
            "attachments": [{
                "color": color,
                "title": title,
                "fields": fields,
                "footer": "baseball-etl",
                "ts": Utc::now().timestamp()
            }]
        })
    }

    /// Send the notification. Never fails the run.
    pub async fn send(&self, notification: &Notification) {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                debug!("SLACK_WEBHOOK_URL not set, skipping notification");
                return;
            }
        };

        let message = Self::build_message(notification);

        match self.client.post(url).json(&message).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Slack notification sent");
            }
            Ok(response) => {
                warn!("Slack notification rejected: {}", response.status());
            }
            Err(e) => {
                warn!("Failed to send Slack notification: {}", e);
            }
        }
    }
}
