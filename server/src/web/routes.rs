// server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  auth_handlers, catalog_handlers, checkout_handlers, domain_handlers, menu_handlers,
  transaction_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": "ok" }))
}

/// Configures the REST surface. Called from `main.rs`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      // Users & Authentication
      .service(
        web::scope("/users")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/me", web::get().to(auth_handlers::me_handler))
          .route("/me", web::put().to(auth_handlers::update_profile_handler))
          .route("", web::get().to(auth_handlers::list_users_handler)),
      )
      // Domain availability
      .service(
        web::scope("/domain")
          .route("/check-domain", web::get().to(domain_handlers::check_domain_handler)),
      )
      // TLD pricing catalog
      .service(
        web::scope("/domain-prices")
          .route("", web::get().to(domain_handlers::list_domain_prices_handler))
          .route("", web::post().to(domain_handlers::create_domain_price_handler))
          .route("/{id}", web::put().to(domain_handlers::update_domain_price_handler))
          .route("/{id}", web::delete().to(domain_handlers::delete_domain_price_handler)),
      )
      // Checkout
      .service(
        web::scope("/checkout")
          .route("", web::post().to(checkout_handlers::start_checkout_handler)),
      )
      // Registered domains and their follow-on ledger operations
      .service(
        web::scope("/domains")
          .route("", web::get().to(domain_handlers::list_domains_handler))
          .route("/{id}/renew", web::post().to(domain_handlers::renew_domain_handler))
          .route("/{id}/transfer", web::post().to(domain_handlers::transfer_domain_handler)),
      )
      // Transaction ledger
      .service(
        web::scope("/transactions")
          .route("", web::get().to(transaction_handlers::list_transactions_handler))
          .route("", web::post().to(transaction_handlers::create_transaction_handler))
          .route("/{id}", web::get().to(transaction_handlers::get_transaction_handler))
          .route("/{id}", web::delete().to(transaction_handlers::delete_transaction_handler)),
      )
      // Service catalog
      .service(
        web::scope("/services")
          .route("", web::get().to(catalog_handlers::list_services_handler))
          .route("", web::post().to(catalog_handlers::create_service_handler))
          .route("/{id}", web::get().to(catalog_handlers::get_service_handler))
          .route("/{id}", web::put().to(catalog_handlers::update_service_handler))
          .route("/{id}", web::delete().to(catalog_handlers::delete_service_handler)),
      )
      // Hosting catalog
      .service(
        web::scope("/hosting-packages")
          .route("", web::get().to(catalog_handlers::list_hosting_packages_handler))
          .route("", web::post().to(catalog_handlers::create_hosting_package_handler))
          .route("/{id}", web::get().to(catalog_handlers::get_hosting_package_handler))
          .route("/{id}", web::put().to(catalog_handlers::update_hosting_package_handler))
          .route("/{id}", web::delete().to(catalog_handlers::delete_hosting_package_handler)),
      )
      // Navigation administration
      .service(
        web::scope("/menus")
          .route("", web::get().to(menu_handlers::list_menus_handler))
          .route("", web::post().to(menu_handlers::create_menu_handler))
          .route("/{id}", web::put().to(menu_handlers::update_menu_handler))
          .route("/{id}", web::delete().to(menu_handlers::delete_menu_handler)),
      )
      .service(web::scope("/roles").route("", web::get().to(menu_handlers::list_roles_handler)))
      .service(
        web::scope("/permissions")
          .route("", web::get().to(menu_handlers::list_permissions_handler))
          .route("/{role_id}", web::get().to(menu_handlers::get_permission_handler))
          .route("/{role_id}", web::put().to(menu_handlers::upsert_permission_handler)),
      ),
  );
}
