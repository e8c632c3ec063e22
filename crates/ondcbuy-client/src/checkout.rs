//! Select dispatch and the cart confirmation flow.
//!
//! [`Checkout`] owns the per-session [`SelectGuard`], so duplicate selects
//! are suppressed for as long as the object lives. Confirmation runs
//! select → settle delay → polling, and falls back to a locally synthesized
//! cart when enabled and the gateway keeps failing.

use std::sync::atomic::{AtomicU32, Ordering};

use ondcbuy_core::{OndcContextConfig, TransactionId};
use ondcbuy_store::{CartStore, SessionState};

use crate::client::OndcClient;
use crate::error::ClientError;
use crate::fallback::synthesize_confirmation;
use crate::guard::SelectGuard;
use crate::payload::{build_select_payload, SelectItem};
use crate::retry::{poll_with_backoff, PollPolicy};
use crate::types::CartConfirmation;

/// Where a confirmation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationSource {
    /// Returned by the gateway.
    Remote,
    /// Built locally after the gateway failed (degraded mode).
    Synthesized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub source: ConfirmationSource,
    pub cart: CartConfirmation,
    /// Confirmation fetches made, including failed ones.
    pub attempts: u32,
}

impl Confirmation {
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.source == ConfirmationSource::Synthesized
    }
}

pub struct Checkout {
    client: OndcClient,
    context: OndcContextConfig,
    session: SessionState,
    guard: SelectGuard,
    poll: PollPolicy,
    mock_fallback: bool,
}

impl Checkout {
    #[must_use]
    pub fn new(client: OndcClient, context: OndcContextConfig, session: SessionState) -> Self {
        Self {
            client,
            context,
            session,
            guard: SelectGuard::new(),
            poll: PollPolicy::default(),
            mock_fallback: true,
        }
    }

    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }

    #[must_use]
    pub fn guard(&self) -> &SelectGuard {
        &self.guard
    }

    #[must_use]
    pub fn client(&self) -> &OndcClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Sends a `select` for one item unless the same product, quantity and
    /// options were already selected in this session.
    ///
    /// Returns `Ok(false)` without touching the network for a duplicate,
    /// `Ok(true)` once the gateway acknowledged. The key is recorded only
    /// after an `ACK`, so any error leaves the select retryable.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] for a blank id/name, a quantity outside
    ///   `1..=99` or a missing provider.
    /// - [`ClientError::Nack`], [`ClientError::Status`] or
    ///   [`ClientError::Transport`] from the gateway.
    /// - [`ClientError::Store`] if the transaction id cannot be persisted.
    pub async fn attempt_select(&mut self, item: SelectItem) -> Result<bool, ClientError> {
        let key = item.key();
        if self.guard.contains(&key) {
            tracing::debug!(
                product_id = %key.product_id,
                quantity = key.quantity,
                "select already sent in this session, skipping"
            );
            return Ok(false);
        }

        let transaction_id = self.session.transaction_id()?;
        let request =
            build_select_payload(&self.context, &transaction_id, std::slice::from_ref(&item))?;
        self.client.select(&request).await?;

        tracing::info!(
            product_id = %item.id,
            quantity = item.quantity,
            transaction_id = %transaction_id,
            "select sent"
        );
        self.guard.record(key);
        Ok(true)
    }

    /// Selects every cart line as one order and waits for the seller's cart.
    ///
    /// The select is skipped when every line was already selected with the
    /// same quantity in this session. With mock fallback enabled, a status
    /// or transport failure, an unreadable body, or a confirmation that never
    /// fills in yields a [`ConfirmationSource::Synthesized`] result mirroring
    /// the local cart.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyCart`] when the cart has no lines.
    /// - [`ClientError::Validation`] / [`ClientError::MixedProviders`] when
    ///   the cart cannot form a single order.
    /// - [`ClientError::Nack`] when the gateway rejects the select.
    /// - Any gateway failure when fallback is disabled.
    pub async fn confirm_cart(&mut self, cart: &CartStore) -> Result<Confirmation, ClientError> {
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        let transaction_id = self.session.transaction_id()?;
        let lines: Vec<SelectItem> = cart
            .items()
            .iter()
            .map(SelectItem::from_cart_item)
            .collect();

        if let Err(err) = self.select_cart(&transaction_id, &lines).await {
            return self.degrade(cart, &transaction_id, err, 0);
        }

        let attempts = AtomicU32::new(0);
        let client = &self.client;
        let txn = &transaction_id;
        let polled = poll_with_backoff(&self.poll, || {
            attempts.fetch_add(1, Ordering::Relaxed);
            async move {
                let confirmation = client.fetch_cart(txn).await?;
                if confirmation.is_empty() {
                    return Err(ClientError::ConfirmationPending {
                        transaction_id: txn.to_string(),
                    });
                }
                Ok(confirmation)
            }
        })
        .await;

        match polled {
            Ok((confirmation, made)) => {
                tracing::info!(
                    transaction_id = %transaction_id,
                    attempts = made,
                    items = confirmation.items.len(),
                    "cart confirmed"
                );
                Ok(Confirmation {
                    source: ConfirmationSource::Remote,
                    cart: confirmation,
                    attempts: made,
                })
            }
            Err(err) => {
                let made = attempts.load(Ordering::Relaxed);
                self.degrade(cart, &transaction_id, err, made)
            }
        }
    }

    async fn select_cart(
        &mut self,
        transaction_id: &TransactionId,
        lines: &[SelectItem],
    ) -> Result<(), ClientError> {
        let keys: Vec<_> = lines.iter().map(SelectItem::key).collect();
        if keys.iter().all(|k| self.guard.contains(k)) {
            tracing::debug!(
                transaction_id = %transaction_id,
                "cart already selected in this session, skipping select"
            );
            return Ok(());
        }

        let request = build_select_payload(&self.context, transaction_id, lines)?;
        self.client.select(&request).await?;
        for key in keys {
            self.guard.record(key);
        }
        Ok(())
    }

    fn degrade(
        &self,
        cart: &CartStore,
        transaction_id: &TransactionId,
        err: ClientError,
        attempts: u32,
    ) -> Result<Confirmation, ClientError> {
        if !self.mock_fallback || !err.is_degradable() {
            return Err(err);
        }
        tracing::warn!(
            transaction_id = %transaction_id,
            attempts,
            error = %err,
            "confirmation unavailable, using locally synthesized cart"
        );
        Ok(Confirmation {
            source: ConfirmationSource::Synthesized,
            cart: synthesize_confirmation(cart.items(), &cart.summary(), transaction_id),
            attempts,
        })
    }
}
