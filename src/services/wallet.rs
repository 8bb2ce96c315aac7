use anyhow::Result;
use async_trait::async_trait;

/// Wallet/contract bridge. Only the connection outcome is visible here.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    async fn init(&self) -> Result<bool>;
}

/// No wallet provider present.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedWallet;

#[async_trait]
impl WalletBridge for DetachedWallet {
    async fn init(&self) -> Result<bool> {
        Ok(false)
    }
}
