use ondcbuy_core::ReturnRequest;

use crate::error::ClientError;

use super::OndcClient;

impl OndcClient {
    /// Lists the buyer's return requests.
    ///
    /// The list may arrive bare, as `{"return_requests": [...]}` or as
    /// `{"data": [...]}`. Entries that fail to decode are skipped with a
    /// warning rather than failing the whole list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::UnexpectedShape`] if no array is found.
    pub async fn list_returns(&self) -> Result<Vec<ReturnRequest>, ClientError> {
        let url = self.endpoint(&["returns"])?;
        let body = self.get_json(&url).await?;
        let entries = match body {
            serde_json::Value::Array(entries) => entries,
            serde_json::Value::Object(mut map) => {
                match map.remove("return_requests").or_else(|| map.remove("data")) {
                    Some(serde_json::Value::Array(entries)) => entries,
                    _ => {
                        return Err(ClientError::UnexpectedShape {
                            context: "returns".to_owned(),
                        })
                    }
                }
            }
            _ => {
                return Err(ClientError::UnexpectedShape {
                    context: "returns".to_owned(),
                })
            }
        };

        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<ReturnRequest>(entry)
                    .map_err(|e| {
                        tracing::warn!(index, error = %e, "skipping malformed return request");
                    })
                    .ok()
            })
            .collect())
    }
}
