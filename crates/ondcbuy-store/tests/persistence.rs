//! Cart and session state persisted through `JsonFileStorage` and reloaded,
//! as happens between two CLI invocations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ondcbuy_core::CartItem;
use ondcbuy_store::{CartStore, JsonFileStorage, SessionState, Storage};

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("ondcbuy-it-{}", uuid::Uuid::new_v4()));
        Self(dir)
    }

    fn storage_path(&self) -> PathBuf {
        self.0.join("state").join("storage.json")
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn open(path: &Path) -> Arc<dyn Storage> {
    Arc::new(JsonFileStorage::open(path).expect("storage should open"))
}

#[test]
fn cart_survives_reopen() {
    let dir = TempDir::new();
    let path = dir.storage_path();

    {
        let (mut cart, _) = CartStore::load(open(&path)).unwrap();
        cart.add(CartItem::new("sku-1", "Rice", "₹100", 2)).unwrap();
        cart.add(CartItem::new("sku-2", "Dal", "₹80", 1)).unwrap();
        cart.update_quantity("sku-2", 3).unwrap();
    }

    let (cart, report) = CartStore::load(open(&path)).unwrap();
    assert!(report.is_clean());
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get("sku-2").unwrap().quantity, 3);
}

#[test]
fn cleared_cart_reloads_empty() {
    let dir = TempDir::new();
    let path = dir.storage_path();

    {
        let (mut cart, _) = CartStore::load(open(&path)).unwrap();
        cart.add(CartItem::new("sku-1", "Rice", "₹100", 2)).unwrap();
        cart.clear().unwrap();
    }

    let (cart, _) = CartStore::load(open(&path)).unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.summary().item_count, 0);
}

#[test]
fn transaction_id_is_shared_between_sessions() {
    let dir = TempDir::new();
    let path = dir.storage_path();

    let first = SessionState::new(open(&path)).transaction_id().unwrap();
    let second = SessionState::new(open(&path)).transaction_id().unwrap();
    assert_eq!(first, second);
}
