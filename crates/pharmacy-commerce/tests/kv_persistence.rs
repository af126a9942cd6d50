//! Cart store backed by the key-value cache.
#![cfg(feature = "storage")]

use pharmacy_cache::Cache;
use pharmacy_commerce::prelude::*;

fn paracetamol() -> ItemDescriptor {
    ItemDescriptor::new("paracetamol-500", "Paracetamol", Money::new(499, Currency::USD))
        .with_brand("Panadol")
}

#[test]
fn cart_survives_a_new_store_on_the_same_cache() {
    let cache = Cache::in_memory();

    {
        let mut store = CartStore::open(Currency::USD, KvPersistence::new(cache.clone())).unwrap();
        store.add_to_cart(&paracetamol(), 3).unwrap();
    }

    let store = CartStore::open(Currency::USD, KvPersistence::new(cache.clone())).unwrap();
    assert_eq!(store.count(), 3);
    assert_eq!(store.items()[0].brand, "Panadol");
    assert_eq!(store.total().amount_cents, 1497);
}

#[test]
fn sessions_do_not_share_carts() {
    let cache = Cache::in_memory();
    let mut first =
        CartStore::open(Currency::USD, KvPersistence::for_session(cache.clone(), "one")).unwrap();
    first.add_one(&paracetamol()).unwrap();

    let second =
        CartStore::open(Currency::USD, KvPersistence::for_session(cache.clone(), "two")).unwrap();
    assert!(second.is_empty());
    assert!(cache.exists("shoppingCart:one").unwrap());
}

#[test]
fn clearing_removes_the_key() {
    let cache = Cache::in_memory();
    let mut store = CartStore::open(Currency::USD, KvPersistence::new(cache.clone())).unwrap();
    store.add_one(&paracetamol()).unwrap();
    assert!(cache.exists("shoppingCart").unwrap());

    store.clear_cart();
    assert!(!cache.exists("shoppingCart").unwrap());
}

#[test]
fn directory_cache_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = Cache::open_dir(dir.path()).unwrap();
        let mut store = CartStore::open(Currency::USD, KvPersistence::new(cache)).unwrap();
        store.add_to_cart(&paracetamol(), 2).unwrap();
    }

    let cache = Cache::open_dir(dir.path()).unwrap();
    let store = CartStore::open(Currency::USD, KvPersistence::new(cache)).unwrap();
    assert_eq!(store.count(), 2);
}

fn saved_line(id: &str, quantity: i64) -> String {
    format!(
        r#"{{"id":"{id}","name":"Aspirin","price":{{"amount_cents":1000,"currency":"USD"}},"quantity":{quantity},"brand":"Generic","dosage":"-","pack_size":"Standard Pack"}}"#
    )
}

#[test]
fn hand_edited_cart_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::open_dir(dir.path()).unwrap();
    let lines = [saved_line("a", 2), saved_line("a", -3), saved_line("a", 50_000)];
    let json = format!(r#"{{"items":[{}],"currency":"USD"}}"#, lines.join(","));
    cache.set_raw("shoppingCart", json.as_bytes()).unwrap();

    let result = CartStore::open(Currency::USD, KvPersistence::new(cache.clone()));
    assert!(matches!(result, Err(CommerceError::Persistence(_))));

    // A single well-formed line still loads.
    let json = format!(r#"{{"items":[{}],"currency":"USD"}}"#, saved_line("a", 2));
    cache.set_raw("shoppingCart", json.as_bytes()).unwrap();
    let store = CartStore::open(Currency::USD, KvPersistence::new(cache)).unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.count(), 2);
}
