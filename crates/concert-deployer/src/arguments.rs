use {
    crate::verify::etherscan,
    alloy::signers::local::PrivateKeySigner,
    anyhow::Result,
    clap::Parser,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(Parser)]
#[clap(about = "Deploys the ConcertTicket contract and verifies it on a block explorer")]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deployer account.
    #[clap(long, env, conflicts_with = "mnemonic", required_unless_present = "mnemonic")]
    pub private_key: Option<String>,

    /// BIP-39 mnemonic to derive the deployer account from.
    #[clap(long, env)]
    pub mnemonic: Option<String>,

    /// Derivation index of the deployer account within the mnemonic.
    #[clap(long, env, default_value = "0")]
    pub mnemonic_index: u32,

    /// Hardhat artifact of the ConcertTicket contract. The matching
    /// `.dbg.json` file and build info are needed for verification.
    #[clap(
        long,
        env,
        default_value = "artifacts/contracts/ConcertTicket.sol/ConcertTicket.json"
    )]
    pub artifact: PathBuf,

    /// How long to wait for the deployment transaction to be mined.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,

    #[clap(flatten)]
    pub explorer: etherscan::Arguments,

    /// Log filter, see
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    #[clap(long, env, default_value = "warn,concert_deployer=info,ethrpc=info")]
    pub log_filter: String,

    /// Emit log lines as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl Arguments {
    /// The account that signs and pays for the deployment.
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        match (&self.private_key, &self.mnemonic) {
            (Some(key), _) => ethrpc::signer::from_private_key(key),
            (None, Some(phrase)) => ethrpc::signer::from_mnemonic(phrase, self.mnemonic_index),
            (None, None) => anyhow::bail!("either a private key or a mnemonic is required"),
        }
    }

    pub fn observe_config(&self) -> observe::Config {
        observe::Config::new(&self.log_filter, self.use_json_logs)
    }
}

pub fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            node_url,
            private_key,
            mnemonic,
            mnemonic_index,
            artifact,
            confirmation_timeout,
            explorer,
            log_filter,
            use_json_logs,
        } = self;

        writeln!(f, "node_url: {node_url}")?;
        display_secret_option(f, "private_key", private_key)?;
        display_secret_option(f, "mnemonic", mnemonic)?;
        writeln!(f, "mnemonic_index: {mnemonic_index}")?;
        writeln!(f, "artifact: {}", artifact.display())?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        write!(f, "{explorer}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}
