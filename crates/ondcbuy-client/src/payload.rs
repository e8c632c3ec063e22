//! Construction of the ONDC `select` request body.

use chrono::{DateTime, SecondsFormat, Utc};
use ondcbuy_core::{
    CartItem, CoreError, MessageId, OndcContextConfig, ProductDetail, TransactionId, MAX_QUANTITY,
    MIN_QUANTITY,
};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::guard::{SelectKey, SelectOptions};

/// One line to select, from either a product page or a cart row.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub provider_id: Option<String>,
    pub location_id: Option<String>,
    pub options: SelectOptions,
}

impl SelectItem {
    #[must_use]
    pub fn from_product(product: &ProductDetail, quantity: u32, options: SelectOptions) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            provider_id: product.provider_id.clone(),
            location_id: product.location_id.clone(),
            options,
        }
    }

    #[must_use]
    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            provider_id: item.provider_id.clone(),
            location_id: item.location_id.clone(),
            options: SelectOptions::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> SelectKey {
        SelectKey::new(&self.id, self.quantity, &self.options)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name"));
        }
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(CoreError::InvalidQuantity {
                id: self.id.clone(),
                requested: self.quantity,
                min: MIN_QUANTITY,
                max: MAX_QUANTITY,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub context: RequestContext,
    pub message: SelectMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub domain: String,
    pub action: String,
    pub country: String,
    pub city: String,
    pub core_version: String,
    pub bap_id: String,
    pub bap_uri: String,
    pub bpp_id: String,
    pub bpp_uri: String,
    pub transaction_id: String,
    pub message_id: String,
    pub timestamp: String,
    pub ttl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectMessage {
    pub order: SelectOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOrder {
    pub provider: Provider,
    pub items: Vec<OrderItem>,
    pub fulfillments: Vec<Fulfillment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    pub quantity: ItemQuantity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuantity {
    pub selected: Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Count {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub code: String,
    pub list: Vec<TagEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntry {
    pub code: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub end: FulfillmentEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentEnd {
    pub location: EndLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndLocation {
    pub gps: String,
    pub address: AreaCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCode {
    pub area_code: String,
}

/// Builds a `select` body with a fresh message id and the current time.
///
/// # Errors
///
/// - [`ClientError::Validation`] when an item has a blank id or name, a
///   quantity outside `1..=99`, or no provider id is known for it.
/// - [`ClientError::EmptyCart`] when `items` is empty.
/// - [`ClientError::MixedProviders`] when items belong to different providers.
pub fn build_select_payload(
    ctx: &OndcContextConfig,
    transaction_id: &TransactionId,
    items: &[SelectItem],
) -> Result<SelectRequest, ClientError> {
    build_select_payload_at(ctx, transaction_id, items, &MessageId::generate(), Utc::now())
}

pub(crate) fn build_select_payload_at(
    ctx: &OndcContextConfig,
    transaction_id: &TransactionId,
    items: &[SelectItem],
    message_id: &MessageId,
    now: DateTime<Utc>,
) -> Result<SelectRequest, ClientError> {
    if items.is_empty() {
        return Err(ClientError::EmptyCart);
    }
    for item in items {
        item.validate()?;
    }

    let mut providers: Vec<String> = Vec::new();
    for item in items {
        let provider = item
            .provider_id
            .clone()
            .or_else(|| ctx.default_provider_id.clone())
            .ok_or(CoreError::MissingField("provider_id"))?;
        if !providers.contains(&provider) {
            providers.push(provider);
        }
    }
    if providers.len() > 1 {
        return Err(ClientError::MixedProviders { providers });
    }
    let provider_id = providers.remove(0);

    let mut locations: Vec<IdRef> = Vec::new();
    let order_items: Vec<OrderItem> = items
        .iter()
        .map(|item| {
            let location_id = item
                .location_id
                .clone()
                .or_else(|| ctx.default_location_id.clone());
            if let Some(loc) = &location_id {
                if !locations.iter().any(|l| &l.id == loc) {
                    locations.push(IdRef { id: loc.clone() });
                }
            }
            OrderItem {
                id: item.id.clone(),
                location_id,
                quantity: ItemQuantity {
                    selected: Count {
                        count: item.quantity,
                    },
                },
                tags: option_tags(&item.options),
            }
        })
        .collect();

    Ok(SelectRequest {
        context: RequestContext {
            domain: ctx.domain.clone(),
            action: "select".to_owned(),
            country: ctx.country.clone(),
            city: ctx.city.clone(),
            core_version: ctx.core_version.clone(),
            bap_id: ctx.bap_id.clone(),
            bap_uri: ctx.bap_uri.clone(),
            bpp_id: ctx.bpp_id.clone(),
            bpp_uri: ctx.bpp_uri.clone(),
            transaction_id: transaction_id.as_str().to_owned(),
            message_id: message_id.as_str().to_owned(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            ttl: ctx.ttl.clone(),
        },
        message: SelectMessage {
            order: SelectOrder {
                provider: Provider {
                    id: provider_id,
                    locations,
                },
                items: order_items,
                fulfillments: vec![Fulfillment {
                    end: FulfillmentEnd {
                        location: EndLocation {
                            gps: ctx.fulfillment_end.gps.clone(),
                            address: AreaCode {
                                area_code: ctx.fulfillment_end.area_code.clone(),
                            },
                        },
                    },
                }],
            },
        },
    })
}

/// Options travel as a single `attr` tag; non-string values are rendered as
/// compact JSON.
fn option_tags(options: &SelectOptions) -> Vec<Tag> {
    if options.is_empty() {
        return Vec::new();
    }
    let list = options
        .iter()
        .map(|(code, value)| TagEntry {
            code: code.clone(),
            value: match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
        .collect();
    vec![Tag {
        code: "attr".to_owned(),
        list,
    }]
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ondcbuy_core::FulfillmentEnd as ContextEnd;

    use super::*;

    fn context() -> OndcContextConfig {
        OndcContextConfig {
            domain: "ONDC:RET10".to_owned(),
            country: "IND".to_owned(),
            city: "std:080".to_owned(),
            core_version: "1.2.0".to_owned(),
            bap_id: "buyer.example.com".to_owned(),
            bap_uri: "https://buyer.example.com/ondc".to_owned(),
            bpp_id: "seller.example.com".to_owned(),
            bpp_uri: "https://seller.example.com/ondc".to_owned(),
            ttl: "PT30S".to_owned(),
            default_provider_id: Some("P-default".to_owned()),
            default_location_id: None,
            fulfillment_end: ContextEnd {
                gps: "12.9716,77.5946".to_owned(),
                area_code: "560001".to_owned(),
            },
        }
    }

    fn item(id: &str, name: &str) -> SelectItem {
        SelectItem {
            id: id.to_owned(),
            name: name.to_owned(),
            quantity: 2,
            provider_id: Some("P1".to_owned()),
            location_id: Some("L1".to_owned()),
            options: SelectOptions::new().with("size", "M"),
        }
    }

    fn txn() -> TransactionId {
        TransactionId::parse("T-1").unwrap()
    }

    #[test]
    fn builds_expected_wire_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let message_id = MessageId::generate();
        let payload =
            build_select_payload_at(&context(), &txn(), &[item("sku-1", "Rice")], &message_id, now)
                .unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["context"]["action"], "select");
        assert_eq!(json["context"]["transaction_id"], "T-1");
        assert_eq!(json["context"]["message_id"], message_id.as_str());
        assert_eq!(json["context"]["timestamp"], "2024-05-01T10:00:00.000Z");
        assert_eq!(json["message"]["order"]["provider"]["id"], "P1");
        assert_eq!(json["message"]["order"]["provider"]["locations"][0]["id"], "L1");
        let first = &json["message"]["order"]["items"][0];
        assert_eq!(first["id"], "sku-1");
        assert_eq!(first["quantity"]["selected"]["count"], 2);
        assert_eq!(first["tags"][0]["list"][0]["code"], "size");
        assert_eq!(first["tags"][0]["list"][0]["value"], "M");
        assert_eq!(
            json["message"]["order"]["fulfillments"][0]["end"]["location"]["address"]["area_code"],
            "560001"
        );
    }

    #[test]
    fn rejects_missing_id_or_name() {
        let err = build_select_payload(&context(), &txn(), &[item("", "Rice")]).unwrap_err();
        assert!(matches!(err, ClientError::Validation(CoreError::MissingField("id"))));
        let err = build_select_payload(&context(), &txn(), &[item("sku-1", " ")]).unwrap_err();
        assert!(matches!(err, ClientError::Validation(CoreError::MissingField("name"))));
    }

    #[test]
    fn rejects_quantity_outside_bounds() {
        for quantity in [0, 100] {
            let mut line = item("sku-1", "Rice");
            line.quantity = quantity;
            let err = build_select_payload(&context(), &txn(), &[line]).unwrap_err();
            assert!(matches!(
                err,
                ClientError::Validation(CoreError::InvalidQuantity { requested, min: 1, max: 99, .. })
                    if requested == quantity
            ));
        }
        let mut top = item("sku-1", "Rice");
        top.quantity = 99;
        assert!(build_select_payload(&context(), &txn(), &[top]).is_ok());
    }

    #[test]
    fn falls_back_to_default_provider() {
        let mut line = item("sku-1", "Rice");
        line.provider_id = None;
        let payload = build_select_payload(&context(), &txn(), &[line]).unwrap();
        assert_eq!(payload.message.order.provider.id, "P-default");
    }

    #[test]
    fn rejects_missing_provider_without_default() {
        let mut ctx = context();
        ctx.default_provider_id = None;
        let mut line = item("sku-1", "Rice");
        line.provider_id = None;
        let err = build_select_payload(&ctx, &txn(), &[line]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(CoreError::MissingField("provider_id"))
        ));
    }

    #[test]
    fn rejects_mixed_providers() {
        let mut other = item("sku-2", "Dal");
        other.provider_id = Some("P2".to_owned());
        let err = build_select_payload(&context(), &txn(), &[item("sku-1", "Rice"), other])
            .unwrap_err();
        assert!(matches!(err, ClientError::MixedProviders { ref providers } if providers.len() == 2));
    }

    #[test]
    fn empty_items_is_empty_cart() {
        assert!(matches!(
            build_select_payload(&context(), &txn(), &[]),
            Err(ClientError::EmptyCart)
        ));
    }

    #[test]
    fn message_ids_are_fresh_per_build() {
        let a = build_select_payload(&context(), &txn(), &[item("sku-1", "Rice")]).unwrap();
        let b = build_select_payload(&context(), &txn(), &[item("sku-1", "Rice")]).unwrap();
        assert_ne!(a.context.message_id, b.context.message_id);
    }

    #[test]
    fn items_without_options_have_no_tags() {
        let mut line = item("sku-1", "Rice");
        line.options = SelectOptions::new();
        let json =
            serde_json::to_value(build_select_payload(&context(), &txn(), &[line]).unwrap()).unwrap();
        assert!(json["message"]["order"]["items"][0].get("tags").is_none());
    }
}
