use std::time::Duration;

use luckyeight_execution::{ConfigOverrides, ItemOverride};
use luckyeight_types::StakeEvent;
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::{Error, Result};

const ITEMS_PATH: &str = "config/items";
const CHIPS_PATH: &str = "config/chips";
const JACKPOT_PATH: &str = "config/jackpot";
const MILESTONES_PATH: &str = "config/milestones";
const SESSION_PATH: &str = "config/session";
const STAKE_PATH: &str = "ledger/stake";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry behavior for outbound requests.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Whether POSTs may be retried as well.
    pub retry_non_idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            retry_non_idempotent: false,
        }
    }
}

impl RetryPolicy {
    fn allows(&self, method: &Method) -> bool {
        *method == Method::GET || self.retry_non_idempotent
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRequest<'a> {
    player_id: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ItemsConfig {
    #[serde(default)]
    pub items: Vec<ItemOverride>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipsConfig {
    #[serde(default)]
    pub chips: Option<Vec<u64>>,
    #[serde(default)]
    pub max_stakes: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct JackpotConfig {
    #[serde(default)]
    pub bonus: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MilestonesConfig {
    #[serde(default)]
    pub rewards: Option<Vec<u64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default)]
    pub session_end_ms: Option<u64>,
    #[serde(default)]
    pub advanced_mode_override: Option<bool>,
}

/// Client for the config provider and ledger backend.
///
/// The provider's read endpoints are GETs that carry a JSON body; reqwest sends the body as-is,
/// so no translating proxy is needed.
#[derive(Clone)]
pub struct Client {
    pub(crate) base_url: Url,
    http: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }
        // Relative joins drop the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url,
            http,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send_with_retry<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Response> {
        let policy = self.retry_policy;
        let attempts = if policy.allows(&method) {
            policy.max_attempts.max(1)
        } else {
            1
        };
        let mut attempt = 1;
        loop {
            let result = self
                .http
                .request(method.clone(), url.clone())
                .json(body)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if !is_retryable(status) || attempt >= attempts {
                        let text = response.text().await.unwrap_or_default();
                        return Err(Error::FailedWithBody {
                            status,
                            body: format!("{method} {url}: {text}"),
                        });
                    }
                }
                Err(err) => {
                    if !(err.is_connect() || err.is_timeout()) || attempt >= attempts {
                        return Err(err.into());
                    }
                }
            }

            let delay = policy.retry_delay(&mut rand::thread_rng(), attempt);
            debug!(%url, attempt, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    pub(crate) async fn get_with_retry<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Response> {
        self.send_with_retry(Method::GET, url, body).await
    }

    pub(crate) async fn post_with_retry<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Response> {
        self.send_with_retry(Method::POST, url, body).await
    }

    async fn read_config<T: DeserializeOwned>(&self, path: &str, player_id: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self
            .get_with_retry(url, &ConfigRequest { player_id })
            .await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn fetch_items(&self, player_id: &str) -> Result<ItemsConfig> {
        self.read_config(ITEMS_PATH, player_id).await
    }

    pub async fn fetch_chips(&self, player_id: &str) -> Result<ChipsConfig> {
        self.read_config(CHIPS_PATH, player_id).await
    }

    pub async fn fetch_jackpot(&self, player_id: &str) -> Result<JackpotConfig> {
        self.read_config(JACKPOT_PATH, player_id).await
    }

    pub async fn fetch_milestones(&self, player_id: &str) -> Result<MilestonesConfig> {
        self.read_config(MILESTONES_PATH, player_id).await
    }

    pub async fn fetch_session(&self, player_id: &str) -> Result<SessionConfig> {
        self.read_config(SESSION_PATH, player_id).await
    }

    /// Fetch every config endpoint concurrently.
    ///
    /// Each endpoint is independent: a failed fetch is logged and leaves its fields unset, so the
    /// engine keeps its built-in defaults for them.
    pub async fn hydrate(&self, player_id: &str) -> ConfigOverrides {
        let (items, chips, jackpot, milestones, session) = tokio::join!(
            self.fetch_items(player_id),
            self.fetch_chips(player_id),
            self.fetch_jackpot(player_id),
            self.fetch_milestones(player_id),
            self.fetch_session(player_id),
        );

        let mut overrides = ConfigOverrides::default();
        if let Some(items) = fallback(ITEMS_PATH, items) {
            if !items.items.is_empty() {
                overrides.items = Some(items.items);
            }
        }
        if let Some(chips) = fallback(CHIPS_PATH, chips) {
            overrides.chips = chips.chips;
            overrides.max_stakes = chips.max_stakes;
        }
        if let Some(jackpot) = fallback(JACKPOT_PATH, jackpot) {
            overrides.jackpot_bonus = jackpot.bonus;
        }
        if let Some(milestones) = fallback(MILESTONES_PATH, milestones) {
            overrides.milestone_rewards = milestones.rewards;
        }
        if let Some(session) = fallback(SESSION_PATH, session) {
            overrides.session_end_ms = session.session_end_ms;
            overrides.advanced_mode_override = session.advanced_mode_override;
        }
        overrides
    }

    /// Report an accepted stake. Never retried unless the policy allows non-idempotent retries.
    pub async fn submit_stake(&self, event: &StakeEvent) -> Result<()> {
        let url = self.base_url.join(STAKE_PATH)?;
        self.post_with_retry(url, event).await?;
        Ok(())
    }
}

fn fallback<T>(path: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path, ?err, "config fetch failed; keeping defaults");
            None
        }
    }
}
