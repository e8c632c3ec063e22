//! Static ONDC context values for this buyer app, loaded from YAML.
//!
//! ```yaml
//! domain: "ONDC:RET10"
//! country: IND
//! city: "std:080"
//! core_version: "1.2.0"
//! bap_id: buyer.example.com
//! bap_uri: https://buyer.example.com/ondc
//! bpp_id: seller.example.com
//! bpp_uri: https://seller.example.com/ondc
//! default_provider_id: P1
//! fulfillment_end:
//!   gps: "12.9716,77.5946"
//!   area_code: "560001"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_ttl() -> String {
    "PT30S".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OndcContextConfig {
    pub domain: String,
    pub country: String,
    pub city: String,
    pub core_version: String,
    pub bap_id: String,
    pub bap_uri: String,
    pub bpp_id: String,
    pub bpp_uri: String,
    #[serde(default = "default_ttl")]
    pub ttl: String,
    /// Used for cart lines that carry no provider id of their own.
    #[serde(default)]
    pub default_provider_id: Option<String>,
    #[serde(default)]
    pub default_location_id: Option<String>,
    pub fulfillment_end: FulfillmentEnd,
}

/// Delivery location sent in the select order's fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentEnd {
    pub gps: String,
    pub area_code: String,
}

/// Load and validate the ONDC context from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_ondc_context(path: &Path) -> Result<OndcContextConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ContextFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let context: OndcContextConfig = serde_yaml::from_str(&content)?;
    validate_context(&context)?;
    Ok(context)
}

fn validate_context(ctx: &OndcContextConfig) -> Result<(), ConfigError> {
    let required = [
        ("domain", &ctx.domain),
        ("country", &ctx.country),
        ("city", &ctx.city),
        ("core_version", &ctx.core_version),
        ("bap_id", &ctx.bap_id),
        ("bpp_id", &ctx.bpp_id),
        ("fulfillment_end.gps", &ctx.fulfillment_end.gps),
        ("fulfillment_end.area_code", &ctx.fulfillment_end.area_code),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{name} must be non-empty")));
        }
    }

    for (name, uri) in [("bap_uri", &ctx.bap_uri), ("bpp_uri", &ctx.bpp_uri)] {
        if !(uri.starts_with("https://") || uri.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "{name} must be an absolute http(s) URI, got '{uri}'"
            )));
        }
    }

    if ctx.fulfillment_end.gps.split(',').count() != 2 {
        return Err(ConfigError::Validation(format!(
            "fulfillment_end.gps must be 'lat,lng', got '{}'",
            ctx.fulfillment_end.gps
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
domain: "ONDC:RET10"
country: IND
city: "std:080"
core_version: "1.2.0"
bap_id: buyer.example.com
bap_uri: https://buyer.example.com/ondc
bpp_id: seller.example.com
bpp_uri: https://seller.example.com/ondc
fulfillment_end:
  gps: "12.9716,77.5946"
  area_code: "560001"
"#;

    #[test]
    fn parses_valid_context_with_default_ttl() {
        let ctx: OndcContextConfig = serde_yaml::from_str(VALID).unwrap();
        validate_context(&ctx).unwrap();
        assert_eq!(ctx.ttl, "PT30S");
        assert_eq!(ctx.domain, "ONDC:RET10");
        assert!(ctx.default_provider_id.is_none());
    }

    #[test]
    fn rejects_relative_bpp_uri() {
        let yaml = VALID.replace("https://seller.example.com/ondc", "seller/ondc");
        let ctx: OndcContextConfig = serde_yaml::from_str(&yaml).unwrap();
        let err = validate_context(&ctx).unwrap_err();
        assert!(err.to_string().contains("bpp_uri"), "got: {err}");
    }

    #[test]
    fn rejects_blank_bap_id() {
        let yaml = VALID.replace("bap_id: buyer.example.com", "bap_id: \"\"");
        let ctx: OndcContextConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(matches!(
            validate_context(&ctx),
            Err(ConfigError::Validation(ref m)) if m.contains("bap_id")
        ));
    }

    #[test]
    fn rejects_malformed_gps() {
        let yaml = VALID.replace("12.9716,77.5946", "12.9716");
        let ctx: OndcContextConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(validate_context(&ctx).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_ondc_context(Path::new("/nonexistent/ondc.yaml"));
        assert!(matches!(result, Err(ConfigError::ContextFileIo { .. })));
    }

    #[test]
    fn shipped_context_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/ondc.yaml");
        let ctx = load_ondc_context(&path).expect("config/ondc.yaml should load");
        assert_eq!(ctx.default_provider_id.as_deref(), Some("P1"));
    }
}
