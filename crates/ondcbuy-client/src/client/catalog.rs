use ondcbuy_core::ProductDetail;

use crate::error::ClientError;

use super::OndcClient;

impl OndcClient {
    /// Fetches one product, accepting a bare object or one wrapped in
    /// `product` or `data`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::Deserialize`] if the product lacks `id`, `name` or
    ///   `price`.
    pub async fn product_detail(&self, product_id: &str) -> Result<ProductDetail, ClientError> {
        let url = self.endpoint(&["product-detail", product_id])?;
        let body = self.get_json(&url).await?;
        let wrapped = body
            .get("product")
            .or_else(|| body.get("data"))
            .filter(|v| v.is_object())
            .cloned();
        let inner = wrapped.unwrap_or(body);
        serde_json::from_value(inner).map_err(|e| ClientError::Deserialize {
            context: format!("product-detail(id={product_id})"),
            source: e,
        })
    }
}
