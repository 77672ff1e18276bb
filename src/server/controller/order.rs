use actix_web::{web, Responder};
use log::{info, warn};

use crate::backend::OrderBackend;
use crate::confirmation::confirm;
use crate::error::OrderError;
use crate::flow::FlowState;
use crate::redemption;
use crate::server::controller::error::CustomError;
use crate::server::model::checkout::PostConfirmRequest;
use crate::server::state::AppState;

/// staff redeems a scanned order code
pub(crate) async fn post_confirm<B: OrderBackend + 'static>(
    body: web::Json<PostConfirmRequest>,
    data: web::Data<AppState<B>>,
) -> Result<impl Responder, CustomError> {
    let PostConfirmRequest {
        payload,
        staff_id,
        table_number,
    } = body.into_inner();
    let payload = redemption::decode(&payload)?;
    if staff_id.trim().is_empty() {
        return Err(OrderError::MissingStaff.into());
    }
    let table_number = table_number.filter(|t| !t.trim().is_empty());

    // a guest session showing this order follows along; orders created
    // elsewhere are confirmed without one
    let tracked = data
        .with_order_session(&payload.order_id, |s| {
            if matches!(s.flow.state(), FlowState::Failed { .. }) {
                s.flow.retry()?;
            }
            s.flow.begin_confirm(&payload.order_id)
        })
        .await
        .transpose()?
        .is_some();
    if !tracked {
        info!("order={} is not held by any session", payload.order_id);
    }

    let result = confirm(data.backend(), &payload, &staff_id, table_number.as_deref()).await;

    if tracked {
        let recorded = data
            .with_order_session(&payload.order_id, |s| match &result {
                Ok(_) => s.flow.confirm_succeeded(),
                Err(e) => s.flow.confirm_failed(e),
            })
            .await;
        if let Some(Err(e)) = recorded {
            warn!("could not record confirmation of order={}, {}", payload.order_id, e);
        }
    }

    Ok(web::Json(result?))
}
