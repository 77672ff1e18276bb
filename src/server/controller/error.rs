use actix_web::{error, HttpResponse};
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use derive_more::{Display, Error};

use crate::error::{ErrorKind, OrderError};

#[derive(Debug, Display, Error)]
pub(crate) enum CustomError {
    #[display("session not found")]
    SessionNotFound,
    #[display("{_0}")]
    Order(OrderError),
}

impl From<OrderError> for CustomError {
    fn from(e: OrderError) -> Self {
        CustomError::Order(e)
    }
}

impl error::ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::SessionNotFound => StatusCode::NOT_FOUND,
            CustomError::Order(e) => match e.kind() {
                ErrorKind::Validation | ErrorKind::Decode => StatusCode::BAD_REQUEST,
                ErrorKind::State => StatusCode::CONFLICT,
                ErrorKind::Remote => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Transport => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Body is the bare message so backend rejections reach the caller verbatim.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}
