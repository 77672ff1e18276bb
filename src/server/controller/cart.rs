use actix_web::{web, Responder};
use log::info;

use crate::backend::OrderBackend;
use crate::cart::AddOutcome;
use crate::model::item::validate_quantity;
use crate::server::controller::error::CustomError;
use crate::server::model::cart::{GetCartResponse, PatchCartItemRequest, PostCartItemRequest};
use crate::server::state::{AppState, Session};

fn view(session: &mut Session) -> GetCartResponse {
    session.flow.sync_with_cart(&session.cart);
    GetCartResponse::from(&session.cart)
}

/// get cart lines and totals
pub(crate) async fn get_cart<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let cart = data
        .with_session(&sid, |s| GetCartResponse::from(&s.cart))
        .await?;
    Ok(web::Json(cart))
}

/// add a menu item, replacing the cart when it comes from another restaurant
pub(crate) async fn post_cart_item<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    body: web::Json<PostCartItemRequest>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let PostCartItemRequest {
        item,
        quantity,
        notes,
    } = body.into_inner();
    item.validate()?;
    if let Some(quantity) = quantity {
        validate_quantity(i64::from(quantity))?;
    }
    let cart = data
        .with_session(&sid, |s| {
            let outcome = s
                .cart
                .add_item(&item, quantity.unwrap_or(1), notes.unwrap_or_default());
            if outcome == AddOutcome::Replaced {
                info!("session={} cart switched to restaurant={}", sid, item.restaurant_id);
            }
            view(s)
        })
        .await?;
    Ok(web::Json(cart))
}

/// update quantity and/or notes, a quantity of zero or less removes the line
pub(crate) async fn patch_cart_item<B: OrderBackend + 'static>(
    path: web::Path<(String, String)>,
    body: web::Json<PatchCartItemRequest>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let (sid, menu_item_id) = path.into_inner();
    let PatchCartItemRequest { quantity, notes } = body.into_inner();
    if let Some(quantity) = quantity {
        validate_quantity(quantity)?;
    }
    let cart = data
        .with_session(&sid, |s| {
            if let Some(notes) = notes {
                s.cart.update_notes(&menu_item_id, notes);
            }
            if let Some(quantity) = quantity {
                s.cart.update_quantity(&menu_item_id, quantity);
            }
            view(s)
        })
        .await?;
    Ok(web::Json(cart))
}

/// remove one line
pub(crate) async fn delete_cart_item<B: OrderBackend + 'static>(
    path: web::Path<(String, String)>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let (sid, menu_item_id) = path.into_inner();
    let cart = data
        .with_session(&sid, |s| {
            s.cart.remove_item(&menu_item_id);
            view(s)
        })
        .await?;
    Ok(web::Json(cart))
}

/// empty the cart
pub(crate) async fn delete_cart<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let cart = data
        .with_session(&sid, |s| {
            s.cart.clear();
            view(s)
        })
        .await?;
    Ok(web::Json(cart))
}
