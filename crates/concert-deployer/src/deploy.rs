use {
    crate::artifact::Artifact,
    alloy::{
        network::{ReceiptResponse, TransactionBuilder},
        primitives::{Address, TxHash},
        providers::Provider,
        rpc::types::TransactionRequest,
    },
    anyhow::{Context, Result, ensure},
    contracts::alloy::{ConcertTicket::Concert, constructor_args},
    ethrpc::AlloyProvider,
    std::{sync::Arc, time::Duration},
};

/// A mined contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub transaction_hash: TxHash,
}

/// Abstracts the submission of the contract creation transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deploy: Send + Sync {
    /// The account that signs and pays for the deployment.
    fn deployer(&self) -> Address;

    /// Creates a ConcertTicket contract for `concert` and waits until the
    /// creation is mined.
    async fn deploy(&self, concert: &Concert) -> Result<Deployment>;
}

pub struct OnchainDeployer {
    provider: AlloyProvider,
    deployer: Address,
    artifact: Arc<Artifact>,
    confirmation_timeout: Duration,
}

impl OnchainDeployer {
    pub fn new(
        provider: AlloyProvider,
        deployer: Address,
        artifact: Arc<Artifact>,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            deployer,
            artifact,
            confirmation_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Deploy for OnchainDeployer {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn deploy(&self, concert: &Concert) -> Result<Deployment> {
        let code = self.artifact.deploy_code(&constructor_args(concert));
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to submit deployment transaction")?;
        let transaction_hash = *pending.tx_hash();
        tracing::info!(?transaction_hash, "submitted deployment transaction");

        let receipt = pending
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .with_context(|| format!("deployment transaction {transaction_hash} was not mined"))?;
        deployment_from_receipt(&receipt)
    }
}

/// Checks that a mined creation transaction succeeded and created a contract.
fn deployment_from_receipt(receipt: &impl ReceiptResponse) -> Result<Deployment> {
    let transaction_hash = receipt.transaction_hash();
    ensure!(
        receipt.status(),
        "deployment transaction {transaction_hash} reverted"
    );
    let address = receipt
        .contract_address()
        .with_context(|| format!("receipt of {transaction_hash} has no contract address"))?;
    tracing::info!(
        ?address,
        block = ?receipt.block_number(),
        gas_used = receipt.gas_used(),
        "deployment mined"
    );

    Ok(Deployment {
        address,
        transaction_hash,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{primitives::address, rpc::types::TransactionReceipt},
        ethrpc::signer::{TEST_MNEMONIC, from_mnemonic},
        serde_json::{Value, json},
        std::path::PathBuf,
    };

    const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    /// Receipt of a creation transaction as a development node returns it.
    fn receipt(status: &str, contract_address: Value) -> TransactionReceipt {
        serde_json::from_value(json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x7a1200",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": TxHash::repeat_byte(1),
            "transactionIndex": "0x0",
            "blockHash": TxHash::repeat_byte(2),
            "blockNumber": "0x1",
            "gasUsed": "0x7a1200",
            "effectiveGasPrice": "0x3b9aca00",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "to": null,
            "contractAddress": contract_address,
        }))
        .unwrap()
    }

    #[test]
    fn successful_creation() {
        let deployment = deployment_from_receipt(&receipt("0x1", json!(CONTRACT))).unwrap();
        assert_eq!(
            deployment,
            Deployment {
                address: CONTRACT,
                transaction_hash: TxHash::repeat_byte(1),
            }
        );
    }

    #[test]
    fn reverted_creation() {
        let err = deployment_from_receipt(&receipt("0x0", json!(CONTRACT))).unwrap_err();
        assert!(err.to_string().ends_with("reverted"));
    }

    #[test]
    fn creation_without_contract_address() {
        let err = deployment_from_receipt(&receipt("0x1", Value::Null)).unwrap_err();
        assert!(err.to_string().contains("has no contract address"));
    }

    /// Needs a development node at `NODE_URL` whose first mnemonic account is
    /// funded, and a compiled artifact at `ARTIFACT`.
    #[tokio::test]
    #[ignore]
    async fn deploys_fixture_on_local_node() {
        let url = std::env::var("NODE_URL").unwrap().parse().unwrap();
        let artifact = PathBuf::from(std::env::var("ARTIFACT").unwrap());
        let signer = from_mnemonic(TEST_MNEMONIC, 0).unwrap();
        let deployer_address = signer.address();
        let provider = ethrpc::alloy::provider_with_signer(&url, signer);

        let deployer = OnchainDeployer::new(
            provider.clone(),
            deployer_address,
            Arc::new(Artifact::load(&artifact).unwrap()),
            Duration::from_secs(30),
        );
        let deployment = deployer.deploy(&Concert::fixture()).await.unwrap();

        let code = provider.get_code_at(deployment.address).await.unwrap();
        assert!(!code.is_empty());
    }
}
