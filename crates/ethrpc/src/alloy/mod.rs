mod instrumentation;

use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
        signers::local::PrivateKeySigner,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider that fills, signs and submits transactions with
/// `signer`. Nonce, gas limit, fees and chain id are filled in by the
/// provider's recommended fillers.
pub fn provider_with_signer(url: &Url, signer: PrivateKeySigner) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    let wallet = EthereumWallet::new(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}

#[cfg(test)]
mod tests {
    use {super::*, crate::signer};

    #[tokio::test]
    #[ignore]
    async fn chain_id_from_env_node() {
        let url: Url = std::env::var("NODE_URL").unwrap().parse().unwrap();
        let signer = signer::from_mnemonic(signer::TEST_MNEMONIC, 0).unwrap();
        let provider = provider_with_signer(&url, signer);
        let chain_id = provider.get_chain_id().await.unwrap();
        println!("connected to chain {chain_id}");
    }
}
