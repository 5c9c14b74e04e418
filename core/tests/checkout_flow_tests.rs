// tests/checkout_flow_tests.rs
mod common;

use chrono::Utc;
use common::*;
use serial_test::serial;
use storefront::dispute::{is_disputed, resolve_dispute, DisputeOutcome};
use storefront::lifecycle::{apply_claim, change_status};
use storefront::models::{OrderStatus, Role};
use storefront::{build_orders, split_cart, BuyerClaim, Cart, ContactDetails, QuantityOverrides, TransitionPolicy};

fn contact() -> ContactDetails {
  ContactDetails {
    name: "Asha Buyer".into(),
    email: String::new(),
    phone: "+255 700 000 000".into(),
    address: "12 Uhuru St".into(),
  }
}

#[tokio::test]
#[serial]
async fn test_two_store_cart_places_two_orders_and_empties_cart() {
  setup_tracing();
  let fx = empty_catalog().await;
  let seller_one = register(&fx.catalog, "one@example.com", Role::Seller).await;
  let seller_two = register(&fx.catalog, "two@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let s1 = open_store(&fx.catalog, &seller_one, "S1").await;
  let s2 = open_store(&fx.catalog, &seller_two, "S2").await;
  let a = list_product(&fx.catalog, &seller_one, &s1, "A", 1000).await;
  let b = list_product(&fx.catalog, &seller_two, &s2, "B", 500).await;

  let mut cart = Cart::new();
  cart.add(&a);
  cart.add(&a);
  cart.add(&b);

  let details = contact().with_default_email(&buyer.email);
  details.validate().unwrap();
  let groups = split_cart(&cart, &QuantityOverrides::new(), |id| fx.catalog.store_name(id)).unwrap();
  let placed = fx
    .catalog
    .place_orders(build_orders(&groups, buyer.id, &details, Utc::now()))
    .await
    .unwrap();
  cart.clear();

  assert!(cart.is_empty());
  assert_eq!(placed.len(), 2);
  let o1 = placed.iter().find(|o| o.store_id == s1.id).unwrap();
  let o2 = placed.iter().find(|o| o.store_id == s2.id).unwrap();
  assert_eq!((o1.total, o1.items.len(), o1.items[0].id, o1.items[0].quantity), (2000, 1, a.id, 2));
  assert_eq!((o2.total, o2.items.len(), o2.items[0].id, o2.items[0].quantity), (500, 1, b.id, 1));
  assert_eq!(o1.customer_email, "buyer@example.com");
  assert_eq!(fx.catalog.orders_for_owner(seller_one.id).len(), 1);
  assert_eq!(fx.catalog.orders_for_owner(seller_two.id).len(), 1);
}

#[tokio::test]
#[serial]
async fn test_order_lifecycle_through_dispute_resolution() {
  setup_tracing();
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let store = open_store(&fx.catalog, &seller, "S").await;
  let product = list_product(&fx.catalog, &seller, &store, "Lamp", 4500).await;

  let mut cart = Cart::new();
  cart.add(&product);
  let groups = split_cart(&cart, &QuantityOverrides::new(), |id| fx.catalog.store_name(id)).unwrap();
  let details = contact().with_default_email(&buyer.email);
  let order = fx
    .catalog
    .place_orders(build_orders(&groups, buyer.id, &details, Utc::now()))
    .await
    .unwrap()
    .remove(0);

  let mut order = order;
  for next in [OrderStatus::Processing, OrderStatus::Shipped] {
    change_status(&mut order, next, TransitionPolicy::ForwardOnly).unwrap();
    order = fx.catalog.save_order(order).await.unwrap();
  }

  apply_claim(&mut order, BuyerClaim::NotReceived, Utc::now()).unwrap();
  let mut order = fx.catalog.save_order(order).await.unwrap();
  assert!(is_disputed(&order));
  assert_eq!(fx.catalog.disputed_orders().len(), 1);

  assert!(resolve_dispute(&mut order, DisputeOutcome::RefundToBuyer, "", Utc::now()).is_err());
  assert!(is_disputed(&order));

  resolve_dispute(&mut order, DisputeOutcome::RefundToBuyer, "Courier confirmed loss", Utc::now()).unwrap();
  fx.catalog.save_order(order).await.unwrap();
  assert!(fx.catalog.disputed_orders().is_empty());

  let stored = &fx.catalog.orders_for_customer(buyer.id)[0];
  assert_eq!(stored.status, OrderStatus::Cancelled);
  assert_eq!(stored.dispute_resolved_by.as_deref(), Some("admin"));
}

#[tokio::test]
#[serial]
async fn test_deleting_store_with_three_products_leaves_orders() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let store = open_store(&fx.catalog, &seller, "Gone Soon").await;
  let mut cart = Cart::new();
  for (name, price) in [("x", 100), ("y", 200), ("z", 300)] {
    cart.add(&list_product(&fx.catalog, &seller, &store, name, price).await);
  }
  let groups = split_cart(&cart, &QuantityOverrides::new(), |id| fx.catalog.store_name(id)).unwrap();
  let details = contact().with_default_email(&buyer.email);
  let placed = fx
    .catalog
    .place_orders(build_orders(&groups, buyer.id, &details, Utc::now()))
    .await
    .unwrap();

  assert_eq!(fx.catalog.delete_store(seller.id, store.id).await.unwrap(), 3);

  assert!(fx.catalog.store(store.id).is_none());
  assert!(fx.catalog.products().is_empty());
  let order = fx.catalog.order(placed[0].id).unwrap();
  assert_eq!(order.store_id, store.id);
  assert_eq!(order.total, 600);
  assert_eq!(order.items.len(), 3);
}
