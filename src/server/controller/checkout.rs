use actix_web::{web, Responder};
use log::warn;

use crate::backend::OrderBackend;
use crate::checkout::submit_checkout;
use crate::flow::FlowState;
use crate::server::controller::error::CustomError;
use crate::server::model::checkout::{GetCheckoutResponse, PostCheckoutRequest, PostCheckoutResponse};
use crate::server::state::AppState;
use crate::util::time::helper::get_utc_now;

/// create the order and hand back its QR payload
pub(crate) async fn post_checkout<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    body: web::Json<PostCheckoutRequest>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let PostCheckoutRequest {
        details,
        clear_cart,
    } = body.into_inner();

    let (lines, restaurant_id) = data
        .with_session(&sid, |s| {
            if matches!(s.flow.state(), FlowState::Failed { .. }) {
                s.flow.retry()?;
            }
            s.flow.sync_with_cart(&s.cart);
            s.flow.begin_submit()?;
            Ok::<_, CustomError>((
                s.cart.lines().to_vec(),
                s.cart.restaurant_id().map(str::to_string),
            ))
        })
        .await??;

    let result = submit_checkout(data.backend(), &lines, restaurant_id.as_deref(), &details).await;

    let recorded = data
        .with_session(&sid, |s| match &result {
            Ok(handle) => {
                if clear_cart {
                    s.cart.clear();
                }
                s.flow.submit_succeeded(handle.clone())
            }
            Err(e) => s.flow.submit_failed(e),
        })
        .await;
    // the order exists on the backend whatever happened to the session
    match recorded {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("could not record checkout on session={}, {}", sid, e),
        Err(e) => warn!("could not record checkout on session={}, {}", sid, e),
    }

    let handle = result?;
    Ok(web::Json(PostCheckoutResponse::new(handle, get_utc_now())?))
}

/// current checkout state with countdown
pub(crate) async fn get_checkout<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let now = get_utc_now();
    let view = data
        .with_session(&sid, |s| {
            GetCheckoutResponse::new(s.flow.state().clone(), s.flow.handle(), now)
        })
        .await??;
    Ok(web::Json(view))
}

/// close the QR view, discarding the order handle
pub(crate) async fn delete_checkout<B: OrderBackend + 'static>(
    sid: web::Path<String>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let now = get_utc_now();
    let view = data
        .with_session(&sid, |s| {
            s.flow.close(&s.cart)?;
            Ok::<_, CustomError>(GetCheckoutResponse::new(s.flow.state().clone(), None, now)?)
        })
        .await??;
    Ok(web::Json(view))
}
