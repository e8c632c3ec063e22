use crate::error::ClientError;
use crate::payload::SelectRequest;
use crate::types::SelectAck;

use super::OndcClient;

impl OndcClient {
    /// Sends an ONDC `select` and requires an `ACK`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Nack`] if the gateway answered `NACK`.
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::Deserialize`] if the body is not an ack envelope.
    pub async fn select(&self, request: &SelectRequest) -> Result<SelectAck, ClientError> {
        let url = self.endpoint(&["select"])?;
        let body = self.post_json(&url, request).await?;
        let ack: SelectAck = serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
            context: format!("select(transaction_id={})", request.context.transaction_id),
            source: e,
        })?;

        if !ack.is_ack() {
            let message = ack
                .error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| ack.message.ack.status.clone());
            return Err(ClientError::Nack { message });
        }

        tracing::debug!(
            transaction_id = %request.context.transaction_id,
            message_id = %request.context.message_id,
            "select acknowledged"
        );
        Ok(ack)
    }
}
