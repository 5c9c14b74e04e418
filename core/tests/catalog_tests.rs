// tests/catalog_tests.rs
mod common;

use chrono::{Duration, Utc};
use common::*;
use serial_test::serial;
use storefront::catalog::seed::seed_if_empty;
use storefront::lifecycle::{apply_claim, change_status};
use storefront::models::{NewProduct, NewStore, ProductUpdate, Role, StoreStatus, StoreUpdate};
use storefront::{BuyerClaim, DocumentStore, StorefrontError, TransitionPolicy};
use uuid::Uuid;

const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

#[tokio::test]
#[serial]
async fn test_subscribers_see_writes() {
  setup_tracing();
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;

  let mut stores = fx.catalog.subscribe_stores();
  assert!(stores.borrow_and_update().is_empty());

  let store = open_store(&fx.catalog, &seller, "Tech Store").await;

  assert!(stores.has_changed().unwrap());
  let seen = stores.borrow_and_update().clone();
  assert_eq!(seen.len(), 1);
  assert_eq!(seen[0].id, store.id);
}

#[tokio::test]
#[serial]
async fn test_dropping_receivers_unsubscribes() {
  let fx = empty_catalog().await;
  let before = fx.catalog.subscriber_count();
  {
    let _users = fx.catalog.subscribe_users();
    let _orders = fx.catalog.subscribe_orders();
    assert_eq!(fx.catalog.subscriber_count(), before + 2);
  }
  assert_eq!(fx.catalog.subscriber_count(), before);
}

#[tokio::test]
#[serial]
async fn test_duplicate_email_is_a_conflict() {
  let fx = empty_catalog().await;
  register(&fx.catalog, "dup@example.com", Role::Buyer).await;

  let user = storefront::models::User {
    id: Uuid::new_v4(),
    email: "DUP@example.com".into(),
    role: Role::Seller,
    created_at: Utc::now(),
    last_active: None,
  };
  let credential = storefront::models::Credential {
    user_id: user.id,
    email: user.email.clone(),
    password_hash: "x".into(),
  };
  let err = fx.catalog.register_user(user, credential).await.unwrap_err();
  assert!(matches!(err, StorefrontError::Conflict(_)));
  assert_eq!(fx.catalog.users().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_only_sellers_create_stores() {
  let fx = empty_catalog().await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;

  let err = fx
    .catalog
    .create_store(&buyer, NewStore { name: "Nope".into(), ..NewStore::default() }, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, StorefrontError::Forbidden(_)));
  assert!(fx.catalog.stores().is_empty());
}

#[tokio::test]
#[serial]
async fn test_store_mutations_require_ownership() {
  let fx = empty_catalog().await;
  let owner = register(&fx.catalog, "owner@example.com", Role::Seller).await;
  let rival = register(&fx.catalog, "rival@example.com", Role::Seller).await;
  let store = open_store(&fx.catalog, &owner, "Owner's").await;

  let update = StoreUpdate { name: Some("Hijacked".into()), ..StoreUpdate::default() };
  assert!(matches!(
    fx.catalog.update_store(rival.id, store.id, update).await,
    Err(StorefrontError::Forbidden(_))
  ));
  assert!(matches!(
    fx.catalog
      .create_product(rival.id, NewProduct { name: "x".into(), store_id: store.id, ..NewProduct::default() }, Utc::now())
      .await,
    Err(StorefrontError::Forbidden(_))
  ));
  assert!(matches!(
    fx.catalog.delete_store(rival.id, store.id).await,
    Err(StorefrontError::Forbidden(_))
  ));
  assert_eq!(fx.catalog.store(store.id).unwrap().name, "Owner's");
}

#[tokio::test]
#[serial]
async fn test_data_url_assets_are_uploaded() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "s@example.com", Role::Seller).await;

  let store = fx
    .catalog
    .create_store(
      &seller,
      NewStore {
        name: "Pixels".into(),
        logo: Some(PIXEL.into()),
        banner: Some("https://cdn.example/banner.png".into()),
        ..NewStore::default()
      },
      Utc::now(),
    )
    .await
    .unwrap();
  let logo = store.logo.clone().unwrap();
  assert!(logo.starts_with("memory://logos/"));
  assert_eq!(store.banner.as_deref(), Some("https://cdn.example/banner.png"));

  let product = list_product(&fx.catalog, &seller, &store, "Poster", 500).await;
  let updated = fx
    .catalog
    .update_product(
      seller.id,
      product.id,
      ProductUpdate {
        images: Some(vec![PIXEL.into(), "https://cdn.example/p.png".into()]),
        ..ProductUpdate::default()
      },
    )
    .await
    .unwrap();
  assert!(updated.images[0].starts_with("memory://products/"));
  assert_eq!(updated.images[1], "https://cdn.example/p.png");
  assert_eq!(fx.blobs.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_delete_store_cascades_products_but_keeps_orders() {
  setup_tracing();
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let store = open_store(&fx.catalog, &seller, "Closing Down").await;
  let other = open_store(&fx.catalog, &seller, "Staying").await;
  list_product(&fx.catalog, &seller, &store, "A", 100).await;
  list_product(&fx.catalog, &seller, &store, "B", 200).await;
  let kept = list_product(&fx.catalog, &seller, &other, "C", 300).await;

  let mut cart = storefront::Cart::new();
  cart.add(&fx.catalog.products_in_store(store.id)[0]);
  let groups = storefront::split_cart(&cart, &Default::default(), |id| fx.catalog.store_name(id)).unwrap();
  let contact = storefront::ContactDetails {
    name: "B".into(),
    email: "buyer@example.com".into(),
    phone: "1".into(),
    address: "x".into(),
  };
  let orders = storefront::build_orders(&groups, buyer.id, &contact, Utc::now());
  fx.catalog.place_orders(orders).await.unwrap();

  let removed = fx.catalog.delete_store(seller.id, store.id).await.unwrap();

  assert_eq!(removed, 2);
  assert!(fx.catalog.store(store.id).is_none());
  assert!(fx.catalog.products_in_store(store.id).is_empty());
  assert_eq!(fx.catalog.products().len(), 1);
  assert_eq!(fx.catalog.products()[0].id, kept.id);
  assert_eq!(fx.catalog.orders_for_customer(buyer.id).len(), 1);
  assert_eq!(fx.backend.load_products().await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_search_is_case_insensitive_over_name_and_description() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  open_store(&fx.catalog, &seller, "Tech Store").await;
  fx.catalog
    .create_store(
      &seller,
      NewStore {
        name: "Corner Shop".into(),
        description: "Fresh TECHNOLOGY daily".into(),
        ..NewStore::default()
      },
      Utc::now(),
    )
    .await
    .unwrap();
  open_store(&fx.catalog, &seller, "Bakery").await;

  assert_eq!(fx.catalog.search_stores("tech").len(), 2);
  assert_eq!(fx.catalog.search_stores("BAKE").len(), 1);
  assert_eq!(fx.catalog.search_stores("").len(), 3);
  assert!(fx.catalog.search_stores("zzz").is_empty());
}

#[tokio::test]
#[serial]
async fn test_place_orders_is_all_or_nothing() {
  setup_tracing();
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let s1 = open_store(&fx.catalog, &seller, "S1").await;
  let s2 = open_store(&fx.catalog, &seller, "S2").await;
  let a = list_product(&fx.catalog, &seller, &s1, "A", 1000).await;
  let b = list_product(&fx.catalog, &seller, &s2, "B", 500).await;

  let mut cart = storefront::Cart::new();
  cart.add(&a);
  cart.add(&b);
  let groups = storefront::split_cart(&cart, &Default::default(), |id| fx.catalog.store_name(id)).unwrap();
  let contact = storefront::ContactDetails {
    name: "Buyer".into(),
    email: "buyer@example.com".into(),
    phone: "1".into(),
    address: "Somewhere".into(),
  };
  let first = storefront::build_orders(&groups, buyer.id, &contact, Utc::now());
  fx.catalog.place_orders(vec![first[0].clone()]).await.unwrap();

  // Reusing an id makes the second write collide; neither order may land.
  let mut retry = storefront::build_orders(&groups, buyer.id, &contact, Utc::now());
  retry[0].id = first[0].id;
  let err = fx.catalog.place_orders(retry.clone()).await.unwrap_err();

  assert!(matches!(err, StorefrontError::Conflict(_)));
  assert!(fx.catalog.order(retry[1].id).is_none());
  assert_eq!(fx.backend.load_orders().await.unwrap().len(), 1);
  assert_eq!(fx.catalog.orders().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_order_views_are_scoped_and_newest_first() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let other_seller = register(&fx.catalog, "other@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let mine = open_store(&fx.catalog, &seller, "Mine").await;
  let theirs = open_store(&fx.catalog, &other_seller, "Theirs").await;
  let a = list_product(&fx.catalog, &seller, &mine, "A", 100).await;
  let b = list_product(&fx.catalog, &other_seller, &theirs, "B", 100).await;

  let contact = storefront::ContactDetails {
    name: "Buyer".into(),
    email: "buyer@example.com".into(),
    phone: "1".into(),
    address: "Somewhere".into(),
  };
  let now = Utc::now();
  for (product, at) in [(&a, now - Duration::hours(2)), (&b, now - Duration::hours(1)), (&a, now)] {
    let mut cart = storefront::Cart::new();
    cart.add(product);
    let groups = storefront::split_cart(&cart, &Default::default(), |id| fx.catalog.store_name(id)).unwrap();
    fx.catalog
      .place_orders(storefront::build_orders(&groups, buyer.id, &contact, at))
      .await
      .unwrap();
  }

  let history = fx.catalog.orders_for_customer(buyer.id);
  assert_eq!(history.len(), 3);
  assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));

  let incoming = fx.catalog.orders_for_owner(seller.id);
  assert_eq!(incoming.len(), 2);
  assert!(incoming.iter().all(|o| o.store_id == mine.id));

  assert!(matches!(
    fx.catalog.delete_order(other_seller.id, incoming[0].id).await,
    Err(StorefrontError::Forbidden(_))
  ));
  fx.catalog.delete_order(seller.id, incoming[0].id).await.unwrap();
  assert_eq!(fx.catalog.orders_for_owner(seller.id).len(), 1);
}

#[tokio::test]
#[serial]
async fn test_claims_feed_the_dispute_view() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let buyer = register(&fx.catalog, "buyer@example.com", Role::Buyer).await;
  let store = open_store(&fx.catalog, &seller, "S").await;
  let product = list_product(&fx.catalog, &seller, &store, "P", 100).await;

  let mut cart = storefront::Cart::new();
  cart.add(&product);
  let groups = storefront::split_cart(&cart, &Default::default(), |id| fx.catalog.store_name(id)).unwrap();
  let contact = storefront::ContactDetails {
    name: "Buyer".into(),
    email: "buyer@example.com".into(),
    phone: "1".into(),
    address: "Somewhere".into(),
  };
  let placed = fx
    .catalog
    .place_orders(storefront::build_orders(&groups, buyer.id, &contact, Utc::now()))
    .await
    .unwrap();

  let mut order = placed[0].clone();
  change_status(&mut order, storefront::models::OrderStatus::Shipped, TransitionPolicy::Permissive).unwrap();
  let order = fx.catalog.save_order(order).await.unwrap();
  assert!(fx.catalog.disputed_orders().is_empty());

  let mut order = order;
  apply_claim(&mut order, BuyerClaim::NotReceived, Utc::now()).unwrap();
  fx.catalog.save_order(order.clone()).await.unwrap();

  let disputes = fx.catalog.disputed_orders();
  assert_eq!(disputes.len(), 1);
  assert_eq!(disputes[0].id, order.id);
}

#[tokio::test]
#[serial]
async fn test_admin_can_moderate_store_status_and_roles() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let store = open_store(&fx.catalog, &seller, "S").await;
  assert_eq!(store.status, StoreStatus::Active);

  let store = fx.catalog.set_store_status(store.id, StoreStatus::Pending).await.unwrap();
  assert_eq!(store.status, StoreStatus::Pending);

  let user = fx.catalog.set_user_role(seller.id, Role::Buyer).await.unwrap();
  assert_eq!(user.role, Role::Buyer);
  assert_eq!(fx.catalog.user(seller.id).unwrap().role, Role::Buyer);

  let touched = fx.catalog.touch_user(seller.id, Utc::now()).await.unwrap();
  assert!(touched.last_active.is_some());
}

#[tokio::test]
#[serial]
async fn test_seed_only_fills_empty_collections() {
  let fx = empty_catalog().await;
  let report = seed_if_empty(&fx.catalog, Uuid::nil(), Utc::now()).await.unwrap();
  assert_eq!((report.stores, report.products), (1, 4));

  let store = &fx.catalog.stores()[0];
  assert_eq!(store.name, "Tech Store");
  assert_eq!(fx.catalog.products_in_store(store.id).len(), 4);

  let again = seed_if_empty(&fx.catalog, Uuid::nil(), Utc::now()).await.unwrap();
  assert_eq!((again.stores, again.products), (0, 0));
}

#[tokio::test]
#[serial]
async fn test_refresh_reloads_from_backend() {
  let fx = empty_catalog().await;
  let seller = register(&fx.catalog, "seller@example.com", Role::Seller).await;
  let store = open_store(&fx.catalog, &seller, "S").await;

  let reopened = storefront::Catalog::load(fx.backend.clone(), fx.blobs.clone()).await.unwrap();
  assert_eq!(reopened.store(store.id).unwrap().name, "S");
  assert_eq!(reopened.user(seller.id).unwrap().email, "seller@example.com");
  assert!(reopened.credential("SELLER@example.com").await.unwrap().is_some());
}
