use std::sync::Arc;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use storefront::models::{NewProduct, Product};
use storefront::{
  build_orders, split_cart, Cart, ContactDetails, ContextData, Pipeline, PipelineControl, QuantityOverrides,
  StorefrontError, WorkflowError,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

fn build_cart(lines: usize, stores: usize) -> (Cart, Vec<Uuid>) {
  let store_ids: Vec<Uuid> = (0..stores).map(|_| Uuid::new_v4()).collect();
  let mut cart = Cart::new();
  for i in 0..lines {
    let product = Product::from_new(
      NewProduct {
        name: format!("product_{i}"),
        price: 100 + i as i64,
        store_id: store_ids[i % stores],
        ..NewProduct::default()
      },
      Utc::now(),
    )
    .unwrap();
    cart.add(&product);
    if i % 3 == 0 {
      cart.add(&product);
    }
  }
  (cart, store_ids)
}

fn contact() -> ContactDetails {
  ContactDetails {
    name: "Bench Buyer".into(),
    email: "bench@example.com".into(),
    phone: "000".into(),
    address: "Bench Lane".into(),
  }
}

fn bench_split_cart(c: &mut Criterion) {
  let mut group = c.benchmark_group("SplitCart");

  for lines in [10usize, 100, 1000] {
    for stores in [1usize, 10, 50] {
      let (cart, _) = build_cart(lines, stores);
      let overrides = QuantityOverrides::new();
      group.throughput(Throughput::Elements(lines as u64));
      group.bench_with_input(
        BenchmarkId::new(format!("{stores}stores"), lines),
        &cart,
        |b, cart| {
          b.iter(|| split_cart(cart, &overrides, |_| Some("Store".to_string())).unwrap());
        },
      );
    }
  }
  group.finish();
}

fn bench_build_orders(c: &mut Criterion) {
  let mut group = c.benchmark_group("BuildOrders");
  let details = contact();

  for stores in [1usize, 10, 50] {
    let (cart, _) = build_cart(500, stores);
    let groups = split_cart(&cart, &QuantityOverrides::new(), |_| None).unwrap();
    group.throughput(Throughput::Elements(stores as u64));
    group.bench_with_input(BenchmarkId::from_parameter(stores), &groups, |b, groups| {
      b.iter(|| build_orders(groups, Uuid::nil(), &details, Utc::now()));
    });
  }
  group.finish();
}

#[derive(Debug, thiserror::Error)]
enum BenchError {
  #[error(transparent)]
  Workflow(#[from] WorkflowError),
  #[error(transparent)]
  Storefront(#[from] StorefrontError),
}

#[derive(Default)]
struct CheckoutBenchContext {
  cart: Cart,
  group_count: usize,
}

fn bench_checkout_pipeline(c: &mut Criterion) {
  let mut group = c.benchmark_group("CheckoutPipeline");
  let rt = Runtime::new().unwrap();

  let mut pipeline = Pipeline::<CheckoutBenchContext, BenchError>::new(&[
    ("validate", false, None),
    ("split", false, None),
    ("audit", true, None),
  ]);
  pipeline
    .on("validate", |ctx: ContextData<CheckoutBenchContext>| async move {
      let empty = ctx.read().cart.is_empty();
      Ok::<_, BenchError>(if empty { PipelineControl::Stop } else { PipelineControl::Continue })
    })
    .unwrap();
  pipeline
    .on("split", |ctx: ContextData<CheckoutBenchContext>| async move {
      let mut guard = ctx.write();
      let groups = split_cart(&guard.cart, &QuantityOverrides::new(), |_| None)?;
      guard.group_count = groups.len();
      Ok::<_, BenchError>(PipelineControl::Continue)
    })
    .unwrap();
  let pipeline = Arc::new(pipeline);

  for lines in [10usize, 100] {
    let (cart, _) = build_cart(lines, 5);
    group.bench_with_input(BenchmarkId::from_parameter(lines), &cart, |b, cart| {
      b.to_async(&rt).iter_batched(
        || {
          ContextData::new(CheckoutBenchContext {
            cart: cart.clone(),
            group_count: 0,
          })
        },
        |ctx| {
          let p = pipeline.clone();
          async move { p.run(ctx).await.unwrap() }
        },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

criterion_group!(benches, bench_split_cart, bench_build_orders, bench_checkout_pipeline);
criterion_main!(benches);
