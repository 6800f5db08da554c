use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Follower counts from the EFP API. `None` means the value is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FollowStats {
    pub followers: Option<u64>,
    pub following: Option<u64>,
}

impl FollowStats {
    pub fn unknown() -> Self {
        FollowStats::default()
    }

    pub fn followers_display(&self) -> String {
        display_count(self.followers)
    }

    pub fn following_display(&self) -> String {
        display_count(self.following)
    }
}

fn display_count(count: Option<u64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Counts come as numbers or as numeric strings, a missing count is 0.
fn read_count(body: &Value, key: &str) -> u64 {
    match body.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub fn parse_stats(status: u16, body: &str) -> Result<FollowStats> {
    if !(200..300).contains(&status) {
        return Err(anyhow!("stats API answered with status {}", status));
    }

    let body: Value = serde_json::from_str(body)?;
    Ok(FollowStats {
        followers: Some(read_count(&body, "followers_count")),
        following: Some(read_count(&body, "following_count")),
    })
}

/// One GET per homepage render. No retries, no timeout of its own.
pub struct StatsClient {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl StatsClient {
    pub fn new(api_url: Option<&str>, handle: &str) -> Self {
        let endpoint = api_url.map(|url| format!("{}/users/{}/stats", url.trim_end_matches('/'), handle));
        StatsClient {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub async fn fetch(&self) -> FollowStats {
        let Some(ref endpoint) = self.endpoint else {
            debug!("Stats disabled, showing unknown counts");
            return FollowStats::unknown();
        };

        match self.try_fetch(endpoint).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Error fetching follow stats from {}: {}", endpoint, e);
                FollowStats::unknown()
            }
        }
    }

    async fn try_fetch(&self, endpoint: &str) -> Result<FollowStats> {
        let response = self.client.get(endpoint).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_stats(status, &body)
    }
}
