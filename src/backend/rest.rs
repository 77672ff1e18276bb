use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::backend::{OrderBackend, CONFIRM_ORDER_PROCEDURE, CREATE_ORDER_PROCEDURE};
use crate::error::OrderError;
use crate::model::config::BackendConfig;
use crate::model::order::{CheckoutRequest, ConfirmRequest};

/// Calls the backend's RPC endpoints, `POST {base}/rest/v1/rpc/{procedure}`.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    config: BackendConfig,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Result<Self, OrderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OrderError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.config.base_url, procedure)
    }

    async fn call<P: Serialize>(&self, procedure: &str, params: &P) -> Result<Value, OrderError> {
        debug!("calling rpc {}", procedure);
        let res = self
            .client
            .post(self.procedure_url(procedure))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .json(params)
            .send()
            .await
            .map_err(|e| {
                error!("rpc {} failed to send, {}", procedure, e);
                OrderError::Transport {
                    reason: e.to_string(),
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| OrderError::Transport {
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let reason = rejection_reason(status, &body);
            warn!("rpc {} rejected with status={}, {}", procedure, status, reason);
            return Err(OrderError::RemoteRejection { reason });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| OrderError::malformed(format!("{procedure} returned invalid json, {e}")))
    }
}

/// Backend error bodies look like `{"code":"P0001","message":"..."}`.
fn rejection_reason(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
    match message {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.to_string(),
    }
}

impl OrderBackend for RestBackend {
    async fn create_order(&self, request: &CheckoutRequest) -> Result<Value, OrderError> {
        self.call(CREATE_ORDER_PROCEDURE, request).await
    }

    async fn confirm_order(&self, request: &ConfirmRequest) -> Result<Value, OrderError> {
        self.call(CONFIRM_ORDER_PROCEDURE, request).await
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::json;

    use super::*;

    async fn create(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
        if req.headers().get("apikey").and_then(|v| v.to_str().ok()) != Some("anon") {
            return HttpResponse::Unauthorized().finish();
        }
        if body["p_restaurant_id"] == "closed" {
            return HttpResponse::BadRequest()
                .json(json!({"code": "P0001", "message": "restaurant closed"}));
        }
        HttpResponse::Ok().json(json!({"order_id": "O1", "code": "XYZ"}))
    }

    async fn confirm(body: web::Json<Value>) -> HttpResponse {
        if body["p_table_number"].is_null() && body["p_code"] == "USED" {
            return HttpResponse::Conflict().body("code already used");
        }
        HttpResponse::Ok().json(json!(true))
    }

    fn start_fake() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/rest/v1/rpc/create_order_for_checkout", web::post().to(create))
                .route("/rest/v1/rpc/confirm_order", web::post().to(confirm))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/")
    }

    fn backend(url: String) -> RestBackend {
        RestBackend::new(BackendConfig::new(url, "anon", Duration::from_secs(5))).unwrap()
    }

    fn checkout(restaurant: &str) -> CheckoutRequest {
        CheckoutRequest {
            restaurant_id: restaurant.to_string(),
            items: vec![],
            guest_name: None,
            table_number: None,
            notes: None,
        }
    }

    fn confirm_req(code: &str) -> ConfirmRequest {
        ConfirmRequest {
            order_id: "O1".to_string(),
            code: code.to_string(),
            staff_id: "S1".to_string(),
            table_number: None,
        }
    }

    #[actix_web::test]
    async fn create_order_returns_record() {
        let backend = backend(start_fake());
        let value = backend.create_order(&checkout("R1")).await.unwrap();
        assert_eq!(value["order_id"], "O1");
    }

    #[actix_web::test]
    async fn rejection_message_is_extracted() {
        let backend = backend(start_fake());
        let err = backend.create_order(&checkout("closed")).await.unwrap_err();
        assert_eq!(
            err,
            OrderError::RemoteRejection {
                reason: "restaurant closed".to_string()
            }
        );
    }

    #[actix_web::test]
    async fn plain_text_rejection_is_kept_verbatim() {
        let backend = backend(start_fake());
        let err = backend.confirm_order(&confirm_req("USED")).await.unwrap_err();
        assert_eq!(err.to_string(), "code already used");
        assert_eq!(backend.confirm_order(&confirm_req("OK")).await.unwrap(), json!(true));
    }

    #[actix_web::test]
    async fn unreachable_backend_is_transport_error() {
        let backend = backend("http://127.0.0.1:9".to_string());
        let err = backend.confirm_order(&confirm_req("OK")).await.unwrap_err();
        assert!(matches!(err, OrderError::Transport { .. }));
    }
}
