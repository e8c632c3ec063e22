//! The shopping cart, persisted as a JSON array under [`keys::CART`].
//!
//! Every mutation builds the new array, persists it in full, and only then
//! swaps it into memory, so a failed write leaves both copies as they were.
//! Totals are recomputed on demand by [`CartStore::summary`].

use std::sync::Arc;

use ondcbuy_core::{
    clamp_quantity, summarize, CartItem, CartSummary, CoreError, FeeSchedule, MAX_QUANTITY,
    MIN_QUANTITY,
};

use crate::error::StoreError;
use crate::keys;
use crate::repair::RepairReport;
use crate::storage::{write_json, Storage};

pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: Vec<CartItem>,
    fees: FeeSchedule,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("fees", &self.fees)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Loads the cart, repairs it, and writes the corrected array back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only when the storage backend itself fails;
    /// malformed contents are repaired, never surfaced as errors.
    pub fn load(storage: Arc<dyn Storage>) -> Result<(Self, RepairReport), StoreError> {
        let raw = storage.get(keys::CART)?;
        let (items, report) = repair_items(raw.as_deref());

        if !report.is_clean() {
            tracing::warn!(
                reset = report.reset,
                dropped = report.dropped,
                defaulted_cod = report.defaulted_cod,
                clamped = report.clamped,
                merged_duplicates = report.merged_duplicates,
                "repaired stored cart"
            );
        }

        let store = Self {
            storage,
            items,
            fees: FeeSchedule::default(),
        };
        store.save()?;
        Ok((store, report))
    }

    #[must_use]
    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Persists the full array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::CART, &self.items)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item, or adds its quantity to an existing line with the same
    /// id. The resulting quantity is clamped to `1..=99`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] when `id`/`name` is blank or the price
    ///   cannot be parsed; nothing is stored.
    /// - [`StoreError`] from the backend write.
    pub fn add(&mut self, item: CartItem) -> Result<&CartItem, StoreError> {
        item.validate()?;

        let mut next = self.items.clone();
        let idx = if let Some(idx) = next.iter().position(|i| i.id == item.id) {
            let existing = &mut next[idx];
            existing.quantity = clamp_quantity(existing.quantity.saturating_add(item.quantity));
            idx
        } else {
            let mut item = item;
            item.quantity = clamp_quantity(item.quantity);
            next.push(item);
            next.len() - 1
        };

        self.commit(next)?;
        tracing::debug!(id = %self.items[idx].id, quantity = self.items[idx].quantity, "cart item added");
        Ok(&self.items[idx])
    }

    /// Sets the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when no line has `id`.
    /// - [`StoreError::Validation`] wrapping [`CoreError::QuantityOutOfRange`]
    ///   when `requested` is outside `1..=99`; the stored value is unchanged
    ///   and carried in the error as `current`.
    pub fn update_quantity(&mut self, id: &str, requested: i64) -> Result<(), StoreError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "cart item",
                id: id.to_owned(),
            })?;

        let in_range = u32::try_from(requested)
            .ok()
            .filter(|q| (MIN_QUANTITY..=MAX_QUANTITY).contains(q));
        let Some(quantity) = in_range else {
            return Err(CoreError::QuantityOutOfRange {
                id: id.to_owned(),
                requested,
                current: self.items[idx].quantity,
                min: MIN_QUANTITY,
                max: MAX_QUANTITY,
            }
            .into());
        };

        let mut next = self.items.clone();
        next[idx].quantity = quantity;
        self.commit(next)
    }

    /// # Errors
    ///
    /// Same as [`CartStore::update_quantity`]; rejected at 99.
    pub fn increment(&mut self, id: &str) -> Result<(), StoreError> {
        let current = self.current_quantity(id)?;
        self.update_quantity(id, i64::from(current) + 1)
    }

    /// # Errors
    ///
    /// Same as [`CartStore::update_quantity`]; rejected at 1.
    pub fn decrement(&mut self, id: &str) -> Result<(), StoreError> {
        let current = self.current_quantity(id)?;
        self.update_quantity(id, i64::from(current) - 1)
    }

    /// Removes the line with `id`, returning it. Removing an absent id is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn remove(&mut self, id: &str) -> Result<Option<CartItem>, StoreError> {
        let Some(idx) = self.items.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let mut next = self.items.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(Some(removed))
    }

    /// Empties the cart in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(Vec::new())
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        summarize(&self.items, &self.fees)
    }

    fn commit(&mut self, next: Vec<CartItem>) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::CART, &next)?;
        self.items = next;
        Ok(())
    }

    fn current_quantity(&self, id: &str) -> Result<u32, StoreError> {
        self.get(id)
            .map(|i| i.quantity)
            .ok_or_else(|| StoreError::NotFound {
                kind: "cart item",
                id: id.to_owned(),
            })
    }
}

/// Parses the stored cart text, dropping or fixing whatever is invalid.
fn repair_items(raw: Option<&str>) -> (Vec<CartItem>, RepairReport) {
    let mut report = RepairReport::default();
    let Some(raw) = raw else {
        return (Vec::new(), report);
    };

    let entries = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) | Err(_) => {
            report.reset = true;
            return (Vec::new(), report);
        }
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(entries.len());
    for entry in entries {
        let serde_json::Value::Object(mut fields) = entry else {
            report.dropped += 1;
            continue;
        };

        let cod_missing = !fields
            .get("available_on_cod")
            .is_some_and(serde_json::Value::is_boolean);
        if cod_missing {
            fields.insert(
                "available_on_cod".to_owned(),
                serde_json::Value::Bool(false),
            );
        }

        let mut item = match serde_json::from_value::<CartItem>(serde_json::Value::Object(fields))
        {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!(error = %e, "dropping undecodable cart entry");
                report.dropped += 1;
                continue;
            }
        };
        if let Err(e) = item.validate() {
            tracing::debug!(id = %item.id, error = %e, "dropping invalid cart entry");
            report.dropped += 1;
            continue;
        }
        if cod_missing {
            report.defaulted_cod += 1;
        }

        let clamped = clamp_quantity(item.quantity);
        if clamped != item.quantity {
            item.quantity = clamped;
            report.clamped += 1;
        }

        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = clamp_quantity(existing.quantity.saturating_add(item.quantity));
            report.merged_duplicates += 1;
        } else {
            items.push(item);
        }
    }

    (items, report)
}

#[cfg(test)]
#[path = "cart_store_test.rs"]
mod tests;
