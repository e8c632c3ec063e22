use ondcbuy_core::TransactionId;

use crate::error::ClientError;
use crate::types::CartConfirmation;

use super::OndcClient;

impl OndcClient {
    /// Fetches the seller's view of the cart for a transaction.
    ///
    /// A confirmation with no items is returned as-is; callers polling for
    /// readiness treat it as pending.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::UnexpectedShape`] if no known envelope matches.
    pub async fn fetch_cart(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<CartConfirmation, ClientError> {
        let url = self.endpoint(&["cart", transaction_id.as_str()])?;
        let body = self.get_json(&url).await?;
        CartConfirmation::from_response(body).ok_or_else(|| ClientError::UnexpectedShape {
            context: format!("cart(transaction_id={transaction_id})"),
        })
    }
}
