// storefront_server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  access_handlers, admin_handlers, auth_handlers, cart_handlers, checkout_handlers, dashboard_handlers,
  order_handlers, product_handlers, store_handlers, upload_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route(
      "/assets/{folder}/{file_name}",
      web::get().to(upload_handlers::serve_asset_handler),
    )
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/auth")
            .route("/signup", web::post().to(auth_handlers::signup_handler))
            .route("/signin", web::post().to(auth_handlers::signin_handler))
            .route("/signout", web::post().to(auth_handlers::signout_handler))
            .route("/me", web::get().to(auth_handlers::me_handler)),
        )
        .route("/access/{route}", web::get().to(access_handlers::check_access_handler))
        .service(
          web::scope("/stores")
            .route("", web::get().to(store_handlers::list_stores_handler))
            .route("", web::post().to(store_handlers::create_store_handler))
            .route("/{store_id}", web::get().to(store_handlers::get_store_handler))
            .route("/{store_id}", web::patch().to(store_handlers::update_store_handler))
            .route("/{store_id}", web::delete().to(store_handlers::delete_store_handler))
            .route(
              "/{store_id}/products",
              web::get().to(store_handlers::list_store_products_handler),
            ),
        )
        .service(
          web::scope("/products")
            .route("", web::post().to(product_handlers::create_product_handler))
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
            .route("/{product_id}", web::patch().to(product_handlers::update_product_handler))
            .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
        )
        .service(
          web::scope("/cart")
            .route("", web::get().to(cart_handlers::view_cart_handler))
            .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
            .route(
              "/items/{product_id}",
              web::delete().to(cart_handlers::remove_from_cart_handler),
            ),
        )
        .service(
          web::scope("/checkout")
            .route("", web::get().to(checkout_handlers::review_checkout_handler))
            .route("", web::post().to(checkout_handlers::place_orders_handler)),
        )
        .service(
          web::scope("/orders")
            .route("/mine", web::get().to(order_handlers::my_orders_handler))
            .route("/seller", web::get().to(order_handlers::seller_orders_handler))
            .route("/{order_id}/claim", web::post().to(order_handlers::claim_order_handler))
            .route(
              "/{order_id}/status",
              web::put().to(order_handlers::update_order_status_handler),
            )
            .route("/{order_id}", web::delete().to(order_handlers::delete_order_handler)),
        )
        .service(
          web::scope("/dashboard")
            .route("/seller", web::get().to(dashboard_handlers::seller_dashboard_handler))
            .route("/buyer", web::get().to(dashboard_handlers::buyer_dashboard_handler)),
        )
        .service(
          web::scope("/admin")
            .route("/stats", web::get().to(admin_handlers::admin_stats_handler))
            .route("/users", web::get().to(admin_handlers::admin_users_handler))
            .route("/disputes", web::get().to(admin_handlers::admin_disputes_handler))
            .route(
              "/disputes/{order_id}/resolve",
              web::post().to(admin_handlers::resolve_dispute_handler),
            )
            .route(
              "/stores/{store_id}/status",
              web::put().to(admin_handlers::set_store_status_handler),
            ),
        )
        .route("/uploads", web::post().to(upload_handlers::upload_asset_handler)),
    );
}
