/*
[INPUT]:  Query parameters and signature headers
[OUTPUT]: Account data (wallet balances)
[POS]:    HTTP layer - account endpoints (require query signature)
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use crate::http::{BybitClient, Result};
use crate::types::{AccountType, WalletBalanceResult};

impl BybitClient {
    /// Wallet balance per account type, optionally filtered to one coin
    ///
    /// GET /v5/account/wallet-balance?accountType={accountType}&coin={coin}
    pub async fn get_wallet_balance(
        &self,
        account_type: AccountType,
        coin: Option<&str>,
    ) -> Result<WalletBalanceResult> {
        let mut query = vec![("accountType", account_type.as_str().to_string())];
        if let Some(coin) = coin {
            query.push(("coin", coin.to_string()));
        }
        self.get_signed("/v5/account/wallet-balance", &query).await
    }
}
