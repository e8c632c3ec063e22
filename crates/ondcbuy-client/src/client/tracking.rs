use ondcbuy_core::TrackingData;

use crate::error::ClientError;

use super::OndcClient;

impl OndcClient {
    /// Fetches the latest `on_track` data for an order.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::UnexpectedShape`] if the body is not an `on_track`
    ///   message.
    pub async fn track(&self, order_id: &str) -> Result<TrackingData, ClientError> {
        let url = self.endpoint(&["track", order_id])?;
        let body = self.get_json(&url).await?;
        let mut data = TrackingData::from_on_track(body).ok_or_else(|| {
            ClientError::UnexpectedShape {
                context: format!("track(order_id={order_id})"),
            }
        })?;
        if data.order_id.is_none() {
            data.order_id = Some(order_id.to_owned());
        }
        Ok(data)
    }
}
