//! main file for the server

mod controller;
mod model;
pub mod scheduler;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::backend::rest::RestBackend;
use crate::backend::OrderBackend;
use crate::model::config::ServerConfig;
use crate::server::controller::{cart, checkout, order, session};
use crate::server::scheduler::job::session_sweeper;
use crate::server::state::AppState;

/// Registers every route against a backend of type `B`.
pub fn configure<B: OrderBackend + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/v1/sessions").route(web::post().to(session::post_session::<B>)))
        .service(web::resource("/v1/sessions/{sid}").route(web::delete().to(session::delete_session::<B>)))
        .service(
            web::resource("/v1/sessions/{sid}/cart")
                .route(web::get().to(cart::get_cart::<B>))
                .route(web::delete().to(cart::delete_cart::<B>)),
        )
        .service(web::resource("/v1/sessions/{sid}/cart/items").route(web::post().to(cart::post_cart_item::<B>)))
        .service(
            web::resource("/v1/sessions/{sid}/cart/items/{menu_item_id}")
                .route(web::patch().to(cart::patch_cart_item::<B>))
                .route(web::delete().to(cart::delete_cart_item::<B>)),
        )
        .service(
            web::resource("/v1/sessions/{sid}/checkout")
                .route(web::get().to(checkout::get_checkout::<B>))
                .route(web::post().to(checkout::post_checkout::<B>))
                .route(web::delete().to(checkout::delete_checkout::<B>)),
        )
        .service(web::resource("/v1/orders/confirm").route(web::post().to(order::post_confirm::<B>)));
}

/// Run the server
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let ServerConfig {
        addr,
        backend,
        session_idle,
    } = config;
    info!("forwarding orders to {}", backend.base_url);
    let backend = RestBackend::new(backend).map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(AppState::new(backend));

    let cancel_token = CancellationToken::new();
    let sweeper = actix_web::rt::spawn(session_sweeper(state.clone(), session_idle, cancel_token.clone()));

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure::<RestBackend>)
    })
        .bind(addr)?
        .run()
        .await;

    cancel_token.cancel();
    sweeper.await.ok();
    result
}
