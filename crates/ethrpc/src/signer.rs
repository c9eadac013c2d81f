use {
    alloy::signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    anyhow::{Context, Result},
};

/// Mnemonic of the default accounts of local development nodes (anvil,
/// hardhat).
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Parses a hex encoded private key, with or without `0x` prefix.
pub fn from_private_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse()
        .context("private key is not a valid secp256k1 key")
}

/// Derives the signer at `m/44'/60'/0'/0/{index}` from a BIP-39 phrase.
pub fn from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase.trim())
        .index(index)
        .context("invalid derivation index")?
        .build()
        .context("could not derive signer from mnemonic")
}
