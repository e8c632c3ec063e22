//! Buyer-side ONDC client: select payloads, the duplicate-send guard, HTTP
//! dispatch, and the cart confirmation flow.

pub mod checkout;
pub mod client;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod payload;
pub mod retry;
pub mod types;

pub use checkout::{Checkout, Confirmation, ConfirmationSource};
pub use client::OndcClient;
pub use error::ClientError;
pub use guard::{SelectGuard, SelectKey, SelectOptions};
pub use payload::{build_select_payload, SelectItem, SelectRequest};
pub use retry::PollPolicy;
pub use types::{CartConfirmation, ConfirmationItem, Quote, QuotePrice, SelectAck};
