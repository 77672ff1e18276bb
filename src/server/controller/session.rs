use actix_web::{web, HttpResponse, Responder};
use log::info;

use crate::backend::OrderBackend;
use crate::server::controller::error::CustomError;
use crate::server::model::session::PostSessionResponse;
use crate::server::state::AppState;

/// start a guest session with an empty cart
pub(crate) async fn post_session<B: OrderBackend + 'static>(
    data: web::Data<AppState<B>>,
) -> impl Responder {
    let session_id = data.open_session().await;
    info!("opened session={}", session_id);
    web::Json(PostSessionResponse { session_id })
}

/// sign-out, the cart goes with the session
pub(crate) async fn delete_session<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let sid = sid.into_inner();
    if !data.close_session(&sid).await {
        return Err(CustomError::SessionNotFound);
    }
    info!("closed session={}", sid);
    Ok(HttpResponse::NoContent())
}
