pub mod etherscan;

use {
    alloy::primitives::Address,
    anyhow::Result,
    contracts::alloy::ConcertTicket::Concert,
};

/// What the explorer reported for a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReceipt {
    /// Identifier the explorer assigned to the verification request.
    pub guid: String,
    pub message: String,
}

/// Abstracts source verification on a block explorer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Verify: Send + Sync {
    /// Registers the source of the contract at `address`, which was created
    /// with `concert` as constructor argument.
    async fn verify(&self, address: Address, concert: &Concert) -> Result<VerificationReceipt>;
}
