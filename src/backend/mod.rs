//! Remote procedures the core delegates to.

use serde_json::Value;

use crate::error::OrderError;
use crate::model::order::{CheckoutRequest, ConfirmRequest};

pub mod rest;

pub const CREATE_ORDER_PROCEDURE: &str = "create_order_for_checkout";
pub const CONFIRM_ORDER_PROCEDURE: &str = "confirm_order";

/// Managed backend owning order creation and confirmation.
///
/// Both calls are single request/response round trips with no retry. A
/// rejected call must come back as [`OrderError::RemoteRejection`] carrying
/// the backend's own reason.
pub trait OrderBackend {
    /// Raw result of the order-creation procedure, either a JSON record or
    /// a JSON string holding one.
    async fn create_order(&self, request: &CheckoutRequest) -> Result<Value, OrderError>;

    async fn confirm_order(&self, request: &ConfirmRequest) -> Result<Value, OrderError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Scripted backend recording every call it receives.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub created: RefCell<Vec<CheckoutRequest>>,
        pub confirmed: RefCell<Vec<ConfirmRequest>>,
        create_replies: RefCell<VecDeque<Result<Value, OrderError>>>,
        confirm_replies: RefCell<VecDeque<Result<Value, OrderError>>>,
    }

    impl FakeBackend {
        pub fn reply_create(self, reply: Result<Value, OrderError>) -> Self {
            self.create_replies.borrow_mut().push_back(reply);
            self
        }

        pub fn reply_confirm(self, reply: Result<Value, OrderError>) -> Self {
            self.confirm_replies.borrow_mut().push_back(reply);
            self
        }

        pub fn calls(&self) -> usize {
            self.created.borrow().len() + self.confirmed.borrow().len()
        }
    }

    impl OrderBackend for FakeBackend {
        async fn create_order(&self, request: &CheckoutRequest) -> Result<Value, OrderError> {
            self.created.borrow_mut().push(request.clone());
            self.create_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(OrderError::Transport { reason: "no scripted reply".to_string() }))
        }

        async fn confirm_order(&self, request: &ConfirmRequest) -> Result<Value, OrderError> {
            self.confirmed.borrow_mut().push(request.clone());
            self.confirm_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(OrderError::Transport { reason: "no scripted reply".to_string() }))
        }
    }
}
