pub mod arguments;
pub mod artifact;
pub mod deploy;
pub mod verify;

use {
    crate::{
        artifact::Artifact,
        deploy::{Deploy, Deployment, OnchainDeployer},
        verify::{Verify, etherscan::EtherscanVerifier},
    },
    alloy::providers::Provider,
    anyhow::{Context, Result},
    contracts::alloy::ConcertTicket::Concert,
    std::{io::Write, sync::Arc},
};

/// Deploys a ConcertTicket contract for `concert` and then tries to verify
/// it, writing progress lines to `out`.
///
/// A failed deployment is returned as error before verification is
/// attempted. A failed verification is only reported in `out`.
pub async fn deploy_and_verify(
    deployer: &dyn Deploy,
    verifier: &dyn Verify,
    concert: &Concert,
    out: &mut impl Write,
) -> Result<Deployment> {
    writeln!(
        out,
        "Deploying contracts with the account: {}",
        deployer.deployer()
    )?;

    let deployment = deployer.deploy(concert).await?;
    writeln!(out, "ConcertTicket deployed to: {}", deployment.address)?;

    match verifier.verify(deployment.address, concert).await {
        Ok(receipt) => writeln!(out, "{receipt:?}")?,
        Err(err) => {
            tracing::warn!(?err, "verification failed");
            writeln!(out, "{err}")?;
        }
    }

    writeln!(out, "Deployed contract at: {}", deployment.address)?;
    Ok(deployment)
}

pub async fn run(args: arguments::Arguments) -> Result<()> {
    let signer = args.signer()?;
    let deployer_address = signer.address();
    let provider = ethrpc::alloy::provider_with_signer(&args.node_url, signer);
    let chain_id = provider
        .get_chain_id()
        .await
        .context("could not fetch current chain id")?;
    tracing::info!(chain_id, "connected to node");

    let artifact = Arc::new(Artifact::load(&args.artifact)?);
    let concert = Concert::fixture();
    for warning in concert.sanity_warnings() {
        tracing::warn!(warning, "unusual concert parameters");
    }

    let deployer = OnchainDeployer::new(
        provider,
        deployer_address,
        artifact.clone(),
        args.confirmation_timeout,
    );
    let verifier = EtherscanVerifier::new(&args.explorer, chain_id, artifact)?;

    let deployment =
        deploy_and_verify(&deployer, &verifier, &concert, &mut std::io::stdout()).await?;
    tracing::info!(
        address = ?deployment.address,
        transaction = ?deployment.transaction_hash,
        "done"
    );
    Ok(())
}
