//! Source verification through the Etherscan contract API.
//!
//! Blockscout explorers expose the same API under `/api`, so the client works
//! for them as well. A verification is a three step exchange:
//! `getsourcecode` to detect contracts that are verified already,
//! `verifysourcecode` to submit the standard JSON input, and
//! `checkverifystatus` polled until the explorer has compiled and compared the
//! bytecode.

use {
    super::{VerificationReceipt, Verify},
    crate::{
        arguments::{display_option, display_secret_option},
        artifact::Artifact,
    },
    alloy::primitives::Address,
    contracts::alloy::{ConcertTicket::Concert, constructor_args, networks},
    serde::Deserialize,
    std::{
        fmt::{self, Display, Formatter},
        sync::Arc,
        time::Duration,
    },
    url::Url,
};

const USER_AGENT: &str = concat!("concert-deployer/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const CODE_FORMAT: &str = "solidity-standard-json-input";
const PENDING: &str = "Pending in queue";
const PASS: &str = "Pass";
const ALREADY_VERIFIED: &str = "already verified";

/// Block explorer arguments.
#[derive(clap::Parser)]
#[group(skip)]
pub struct Arguments {
    /// Etherscan compatible API endpoint. Defaults to the known explorer of
    /// the connected chain.
    #[clap(long, env)]
    pub explorer_api_url: Option<Url>,

    /// Explorer website, used to link to the verified contract. Defaults to
    /// the known explorer of the connected chain.
    #[clap(long, env)]
    pub explorer_url: Option<Url>,

    /// API key for the explorer. Blockscout explorers accept requests
    /// without one.
    #[clap(long, env)]
    pub explorer_api_key: Option<String>,

    /// Delay between two verification status checks.
    #[clap(
        long,
        env,
        default_value = "3s",
        value_parser = humantime::parse_duration,
    )]
    pub verification_poll_interval: Duration,

    /// How many times the verification status is checked before giving up.
    #[clap(
        long,
        env,
        default_value = "20",
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub verification_max_attempts: u32,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            explorer_api_url,
            explorer_url,
            explorer_api_key,
            verification_poll_interval,
            verification_max_attempts,
        } = self;

        display_option(f, "explorer_api_url", explorer_api_url)?;
        display_option(f, "explorer_url", explorer_url)?;
        display_secret_option(f, "explorer_api_key", explorer_api_key)?;
        writeln!(
            f,
            "verification_poll_interval: {verification_poll_interval:?}"
        )?;
        writeln!(
            f,
            "verification_max_attempts: {verification_max_attempts}"
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the contract has already been verified")]
    AlreadyVerified,
    #[error("explorer rejected the verification request: {0}")]
    Rejected(String),
    #[error("verification failed: {0}")]
    Failed(String),
    #[error("verification still pending after {0} status checks")]
    TimedOut(u32),
    #[error("no explorer known for chain {0}, pass --explorer-api-url")]
    UnknownExplorer(u64),
    #[error("missing compilation details: {0:#}")]
    BuildInfo(anyhow::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Envelope of every explorer API response. `result` is a string for errors
/// and most actions, a list of objects for `getsourcecode`.
#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    message: String,
    result: serde_json::Value,
}

impl Response {
    fn is_ok(&self) -> bool {
        self.status == "1"
    }

    fn result_text(&self) -> String {
        match &self.result {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

pub struct EtherscanVerifier {
    client: reqwest::Client,
    api_url: Option<Url>,
    browser_url: Option<Url>,
    api_key: Option<String>,
    chain_id: u64,
    artifact: Arc<Artifact>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl EtherscanVerifier {
    /// Explorer URLs that are not configured explicitly fall back to the
    /// known explorer of `chain_id`. A chain without a known explorer only
    /// fails once a verification is attempted.
    pub fn new(args: &Arguments, chain_id: u64, artifact: Arc<Artifact>) -> Result<Self, Error> {
        let known = networks::explorer(chain_id);
        let api_url = args
            .explorer_api_url
            .clone()
            .or_else(|| known.and_then(|explorer| explorer.api_url.parse().ok()));
        let browser_url = args
            .explorer_url
            .clone()
            .or_else(|| known.and_then(|explorer| explorer.browser_url.parse().ok()));
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url,
            browser_url,
            api_key: args.explorer_api_key.clone(),
            chain_id,
            artifact,
            poll_interval: args.verification_poll_interval,
            max_attempts: args.verification_max_attempts,
        })
    }

    pub async fn verify_contract(
        &self,
        address: Address,
        concert: &Concert,
    ) -> Result<VerificationReceipt, Error> {
        let api_url = self
            .api_url
            .as_ref()
            .ok_or(Error::UnknownExplorer(self.chain_id))?;

        if self.is_verified(api_url, address).await? {
            tracing::info!(?address, "source already published");
            return Err(Error::AlreadyVerified);
        }
        let guid = self.submit(api_url, address, concert).await?;
        tracing::info!(guid, "submitted source for verification");
        let message = self.wait_for_result(api_url, &guid).await?;
        if let Some(page) = self.source_page(address) {
            tracing::info!(%page, "verified source published");
        }

        Ok(VerificationReceipt { guid, message })
    }

    /// Explorer page showing the source of the contract at `address`.
    fn source_page(&self, address: Address) -> Option<Url> {
        self.browser_url
            .as_ref()?
            .join(&format!("address/{address}#code"))
            .ok()
    }

    async fn is_verified(&self, api_url: &Url, address: Address) -> Result<bool, Error> {
        let address = address.to_string();
        let response = self
            .get(
                api_url,
                &[
                    ("module", "contract"),
                    ("action", "getsourcecode"),
                    ("address", address.as_str()),
                ],
            )
            .await?;
        if !response.is_ok() {
            // Some explorers answer with an error for unknown contracts, the
            // submission below reports real problems.
            tracing::debug!(
                message = response.message,
                result = response.result_text(),
                "could not look up existing source"
            );
            return Ok(false);
        }

        Ok(response
            .result
            .get(0)
            .and_then(|entry| entry.get("SourceCode"))
            .and_then(|source| source.as_str())
            .is_some_and(|source| !source.is_empty()))
    }

    async fn submit(
        &self,
        api_url: &Url,
        address: Address,
        concert: &Concert,
    ) -> Result<String, Error> {
        let build_info = self.artifact.build_info().map_err(Error::BuildInfo)?;
        let mut form = vec![
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", address.to_string()),
            ("sourceCode", build_info.input.to_string()),
            ("codeformat", CODE_FORMAT.to_string()),
            ("contractname", self.artifact.fully_qualified_name()),
            (
                "compilerversion",
                format!("v{}", build_info.solc_long_version),
            ),
            // sic, the API expects this spelling
            (
                "constructorArguements",
                const_hex::encode(constructor_args(concert)),
            ),
        ];
        form.extend(self.api_key_param());

        let response: Response = self
            .client
            .post(api_url.clone())
            .query(&[self.chain_param()])
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(?response, "verification submission response");

        let text = response.result_text();
        if response.is_ok() {
            Ok(text)
        } else if text.to_lowercase().contains(ALREADY_VERIFIED) {
            Err(Error::AlreadyVerified)
        } else {
            Err(Error::Rejected(text))
        }
    }

    async fn wait_for_result(&self, api_url: &Url, guid: &str) -> Result<String, Error> {
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;
            let response = self
                .get(
                    api_url,
                    &[
                        ("module", "contract"),
                        ("action", "checkverifystatus"),
                        ("guid", guid),
                    ],
                )
                .await?;
            let text = response.result_text();
            tracing::debug!(attempt, status = text, "verification status");

            if text.contains(PENDING) {
                continue;
            }
            if text.starts_with(PASS) {
                return Ok(text);
            }
            if text.to_lowercase().contains(ALREADY_VERIFIED) {
                return Err(Error::AlreadyVerified);
            }
            return Err(Error::Failed(text));
        }
        Err(Error::TimedOut(self.max_attempts))
    }

    async fn get(&self, api_url: &Url, params: &[(&str, &str)]) -> Result<Response, Error> {
        let response = self
            .client
            .get(api_url.clone())
            .query(&[self.chain_param()])
            .query(&self.api_key_param().into_iter().collect::<Vec<_>>())
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }

    /// Etherscan v2 selects the chain through `chainid`, other explorers
    /// ignore it.
    fn chain_param(&self) -> (&'static str, String) {
        ("chainid", self.chain_id.to_string())
    }

    /// Sent in the query of reads and in the form body of submissions.
    fn api_key_param(&self) -> Option<(&'static str, String)> {
        self.api_key.clone().map(|api_key| ("apikey", api_key))
    }
}

#[async_trait::async_trait]
impl Verify for EtherscanVerifier {
    async fn verify(
        &self,
        address: Address,
        concert: &Concert,
    ) -> anyhow::Result<VerificationReceipt> {
        Ok(self.verify_contract(address, concert).await?)
    }
}
