//! Fixed storage keys.

pub const CART: &str = "cart";
pub const TRANSACTION_ID: &str = "transaction_id";
pub const TRACKING_DATA: &str = "tracking_data";
pub const RETURN_REQUESTS: &str = "return_requests";
pub const USER_TOKEN: &str = "user_token";
pub const USER_PROFILE: &str = "user_profile";
