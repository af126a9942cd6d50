//! End-to-end cart store behaviour as the storefront views use it.

use pharmacy_commerce::prelude::*;

fn usd(units: i64) -> Money {
    Money::from_major(units, Currency::USD)
}

fn aspirin() -> ItemDescriptor {
    ItemDescriptor::new("a", "Aspirin", usd(10))
}

fn bandages() -> ItemDescriptor {
    ItemDescriptor::new("b", "Bandages", usd(5))
}

fn assert_derived_values(store: &CartStore) {
    let count: i64 = store.items().iter().map(|i| i.quantity).sum();
    let total: i64 = store
        .items()
        .iter()
        .map(|i| i.price.amount_cents * i.quantity)
        .sum();
    assert_eq!(store.count(), count);
    assert_eq!(store.total().amount_cents, total);
}

#[test]
fn shopper_session_walkthrough() {
    let mut store = CartStore::new(Currency::USD);
    assert_eq!(store.state(), CartState::Empty);

    store.add_to_cart(&aspirin(), 2).unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.get(&ItemId::new("a")).unwrap().quantity, 2);
    assert_eq!(store.total(), usd(20));
    assert_derived_values(&store);

    store.add_to_cart(&aspirin(), 3).unwrap();
    assert_eq!(store.get(&ItemId::new("a")).unwrap().quantity, 5);
    assert_eq!(store.total(), usd(50));
    assert_derived_values(&store);

    store.add_to_cart(&bandages(), 1).unwrap();
    assert!(store.remove_from_cart(&ItemId::new("a")));
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].id, ItemId::new("b"));
    assert_eq!(store.total(), usd(5));
    assert_derived_values(&store);

    assert!(store.update_quantity(&ItemId::new("b"), 4).unwrap());
    assert_eq!(store.total(), usd(20));
    assert_eq!(store.count(), 4);
    assert_derived_values(&store);

    store.clear_cart();
    assert!(store.items().is_empty());
    assert_eq!(store.count(), 0);
    assert_eq!(store.total(), usd(0));
    assert_eq!(store.state(), CartState::Empty);
}

#[test]
fn removing_last_line_returns_to_empty() {
    let mut store = CartStore::new(Currency::USD);
    store.add_one(&aspirin()).unwrap();
    assert_eq!(store.state(), CartState::NonEmpty);

    store.remove_from_cart(&ItemId::new("a"));
    assert_eq!(store.state(), CartState::Empty);

    // Reusable after emptying.
    store.add_one(&bandages()).unwrap();
    assert_eq!(store.state(), CartState::NonEmpty);
}

#[test]
fn lines_keep_insertion_order() {
    let mut store = CartStore::new(Currency::USD);
    let catalog = Catalog::pharmacy();
    let ids = ["vitamin-d3-1000", "aspirin-300", "loratadine-10"];
    for id in ids {
        store.add_one(catalog.get(&ItemId::new(id)).unwrap()).unwrap();
    }
    store.add_one(catalog.get(&ItemId::new("aspirin-300")).unwrap()).unwrap();

    let order: Vec<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, ids);
    assert_derived_values(&store);
}

#[test]
fn catalog_metadata_flows_into_lines() {
    let mut store = CartStore::new(Currency::USD);
    let catalog = Catalog::pharmacy();

    store.add_one(catalog.get(&ItemId::new("ibuprofen-200")).unwrap()).unwrap();
    store.add_one(catalog.get(&ItemId::new("aspirin-300")).unwrap()).unwrap();

    let ibuprofen = store.get(&ItemId::new("ibuprofen-200")).unwrap();
    assert_eq!(ibuprofen.brand, "Advil");
    assert_eq!(ibuprofen.pack_size, "32 tablets");

    let aspirin = store.get(&ItemId::new("aspirin-300")).unwrap();
    assert_eq!(aspirin.brand, "Generic");
    assert_eq!(aspirin.pack_size, "Standard Pack");
}

#[test]
fn checkout_reads_the_same_store_the_views_use() {
    let persistence = MemoryPersistence::new();
    let mut store = CartStore::with_persistence(Currency::USD, persistence.clone());
    store.add_to_cart(&aspirin(), 3).unwrap();
    store.add_to_cart(&bandages(), 4).unwrap();

    let mut flow = CheckoutFlow::default();
    flow.details = CheckoutDetails {
        contact: Contact {
            full_name: "Alex Morgan".to_string(),
            email: "alex@example.org".to_string(),
            phone: "0161 496 0000".to_string(),
        },
        address: Address {
            line1: "3 Mill Lane".to_string(),
            line2: Some("Flat 2".to_string()),
            city: "Manchester".to_string(),
            postcode: "M1 1AA".to_string(),
            country: "UK".to_string(),
        },
        delivery: DeliveryOption::Standard,
        payment: Some(PaymentMethod::CashOnDelivery),
    };

    while flow.step != CheckoutStep::Review {
        flow.advance(store.cart()).unwrap();
    }
    let summary = flow.summary(store.cart()).unwrap();
    assert_eq!(summary.subtotal, usd(50));
    assert!(summary.shipping.is_zero());

    let order = flow.place_order(&mut store).unwrap();
    assert_eq!(order.item_count(), 7);
    assert_eq!(order.total(), usd(50));
    assert_eq!(order.payment, "Cash on delivery");

    assert!(store.is_empty());
    assert_eq!(persistence.stored(), None);
}
