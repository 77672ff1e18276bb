use derive_more::{Display, Error};

/// Failures of the order-assembly and redemption core.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[non_exhaustive]
pub enum OrderError {
    #[display("cart is empty, add something before checking out")]
    EmptyCart,
    #[display("restaurant could not be resolved for this cart")]
    MissingRestaurant,
    #[display("staff id is required to confirm an order")]
    MissingStaff,
    #[display("menu item rejected: {reason}")]
    InvalidItem { reason: String },
    #[display("could not encode order code: {reason}")]
    Encode { reason: String },
    #[display("unreadable order code: {reason}")]
    Decode { reason: String },
    /// Backend refused the call, `reason` is passed through untouched.
    #[display("{reason}")]
    RemoteRejection { reason: String },
    #[display("unexpected backend response: {reason}")]
    MalformedResponse { reason: String },
    #[display("backend unreachable: {reason}")]
    Transport { reason: String },
    #[display("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    Validation,
    Decode,
    Remote,
    Transport,
    State,
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyCart
            | OrderError::MissingRestaurant
            | OrderError::MissingStaff
            | OrderError::InvalidItem { .. } => ErrorKind::Validation,
            OrderError::Decode { .. } | OrderError::Encode { .. } => ErrorKind::Decode,
            OrderError::RemoteRejection { .. } => ErrorKind::Remote,
            OrderError::MalformedResponse { .. } | OrderError::Transport { .. } => {
                ErrorKind::Transport
            }
            OrderError::InvalidTransition { .. } => ErrorKind::State,
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        OrderError::Decode {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_item(reason: impl Into<String>) -> Self {
        OrderError::InvalidItem {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        OrderError::MalformedResponse {
            reason: reason.into(),
        }
    }
}
