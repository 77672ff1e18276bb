//! Checkout lifecycle from an empty cart to a confirmed order.
//!
//! `Empty -> Reviewing -> Submitting -> AwaitingScan -> Confirming -> Confirmed`,
//! where a failed submission or confirmation parks the flow in `Failed` until
//! `retry` hands control back to the state before the call. Running out the
//! redemption countdown does not move the flow anywhere.

use serde::Serialize;

use crate::cart::Cart;
use crate::error::OrderError;
use crate::model::order::OrderHandle;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    Empty,
    Reviewing,
    Submitting,
    AwaitingScan { handle: OrderHandle },
    Confirming { handle: OrderHandle },
    Confirmed { order_id: String },
    Failed { prior: Box<FlowState>, reason: String },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Empty => "empty",
            FlowState::Reviewing => "reviewing",
            FlowState::Submitting => "submitting",
            FlowState::AwaitingScan { .. } => "awaiting scan",
            FlowState::Confirming { .. } => "confirming",
            FlowState::Confirmed { .. } => "confirmed",
            FlowState::Failed { .. } => "failed",
        }
    }

    fn for_cart(cart: &Cart) -> Self {
        if cart.is_empty() {
            FlowState::Empty
        } else {
            FlowState::Reviewing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutFlow {
    state: FlowState,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self {
            state: FlowState::Empty,
        }
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Order handle currently shown or being confirmed.
    pub fn handle(&self) -> Option<&OrderHandle> {
        match &self.state {
            FlowState::AwaitingScan { handle } | FlowState::Confirming { handle } => Some(handle),
            FlowState::Failed { prior, .. } => match prior.as_ref() {
                FlowState::AwaitingScan { handle } => Some(handle),
                _ => None,
            },
            _ => None,
        }
    }

    /// Follows cart edits while no order is outstanding.
    pub fn sync_with_cart(&mut self, cart: &Cart) {
        let idle = match &self.state {
            FlowState::Empty | FlowState::Reviewing | FlowState::Confirmed { .. } => true,
            FlowState::Failed { prior, .. } => {
                matches!(prior.as_ref(), FlowState::Empty | FlowState::Reviewing)
            }
            _ => false,
        };
        if idle {
            self.state = FlowState::for_cart(cart);
        }
    }

    pub fn begin_submit(&mut self) -> Result<(), OrderError> {
        match self.state {
            FlowState::Reviewing => {
                self.state = FlowState::Submitting;
                Ok(())
            }
            FlowState::Empty => Err(OrderError::EmptyCart),
            _ => Err(self.illegal("submit")),
        }
    }

    pub fn submit_succeeded(&mut self, handle: OrderHandle) -> Result<(), OrderError> {
        match self.state {
            FlowState::Submitting => {
                self.state = FlowState::AwaitingScan { handle };
                Ok(())
            }
            _ => Err(self.illegal("accept an order")),
        }
    }

    pub fn submit_failed(&mut self, error: &OrderError) -> Result<(), OrderError> {
        match self.state {
            FlowState::Submitting => {
                self.state = FlowState::Failed {
                    prior: Box::new(FlowState::Reviewing),
                    reason: error.to_string(),
                };
                Ok(())
            }
            _ => Err(self.illegal("fail a submission")),
        }
    }

    /// Starts confirming `order_id`. A second scan of the same order while
    /// the first is in flight is refused here.
    pub fn begin_confirm(&mut self, order_id: &str) -> Result<(), OrderError> {
        match &self.state {
            FlowState::AwaitingScan { handle } if handle.order_id == order_id => {
                self.state = FlowState::Confirming {
                    handle: handle.clone(),
                };
                Ok(())
            }
            _ => Err(self.illegal("confirm")),
        }
    }

    pub fn confirm_succeeded(&mut self) -> Result<(), OrderError> {
        match &self.state {
            FlowState::Confirming { handle } => {
                self.state = FlowState::Confirmed {
                    order_id: handle.order_id.clone(),
                };
                Ok(())
            }
            _ => Err(self.illegal("finish confirming")),
        }
    }

    pub fn confirm_failed(&mut self, error: &OrderError) -> Result<(), OrderError> {
        match &self.state {
            FlowState::Confirming { handle } => {
                self.state = FlowState::Failed {
                    prior: Box::new(FlowState::AwaitingScan {
                        handle: handle.clone(),
                    }),
                    reason: error.to_string(),
                };
                Ok(())
            }
            _ => Err(self.illegal("fail a confirmation")),
        }
    }

    /// Returns to the state the failed call started from.
    pub fn retry(&mut self) -> Result<(), OrderError> {
        match std::mem::replace(&mut self.state, FlowState::Empty) {
            FlowState::Failed { prior, .. } => {
                self.state = *prior;
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.illegal("retry"))
            }
        }
    }

    /// Drops the displayed order handle, back to reviewing the cart.
    pub fn close(&mut self, cart: &Cart) -> Result<(), OrderError> {
        let closable = match &self.state {
            FlowState::AwaitingScan { .. } | FlowState::Confirmed { .. } => true,
            FlowState::Failed { prior, .. } => {
                matches!(prior.as_ref(), FlowState::AwaitingScan { .. })
            }
            _ => false,
        };
        if !closable {
            return Err(self.illegal("close the order"));
        }
        self.state = FlowState::for_cart(cart);
        Ok(())
    }

    fn illegal(&self, action: &'static str) -> OrderError {
        OrderError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::DateTime;

    use super::*;
    use crate::cart::test::menu_item;
    use crate::error::ErrorKind;

    fn handle() -> OrderHandle {
        OrderHandle {
            order_id: "O1".to_string(),
            redemption_code: "XYZ".to_string(),
            expires_at: None,
            skipped_items: vec![],
            total: None,
            issued_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn reviewing() -> (CheckoutFlow, Cart) {
        let mut cart = Cart::new();
        cart.add_one(&menu_item("A", "R1", 3));
        let mut flow = CheckoutFlow::new();
        flow.sync_with_cart(&cart);
        (flow, cart)
    }

    #[test]
    fn happy_path_reaches_confirmed() {
        let (mut flow, _) = reviewing();
        assert_eq!(flow.state(), &FlowState::Reviewing);

        flow.begin_submit().unwrap();
        flow.submit_succeeded(handle()).unwrap();
        assert_eq!(flow.handle().map(|h| h.order_id.as_str()), Some("O1"));

        flow.begin_confirm("O1").unwrap();
        flow.confirm_succeeded().unwrap();
        assert_eq!(
            flow.state(),
            &FlowState::Confirmed {
                order_id: "O1".to_string()
            }
        );
    }

    #[test]
    fn empty_cart_cannot_submit() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.begin_submit().unwrap_err(), OrderError::EmptyCart);
    }

    #[test]
    fn failed_submission_retries_from_reviewing() {
        let (mut flow, _) = reviewing();
        flow.begin_submit().unwrap();
        flow.submit_failed(&OrderError::Transport {
            reason: "down".to_string(),
        })
        .unwrap();
        assert_eq!(flow.state().name(), "failed");

        flow.retry().unwrap();
        assert_eq!(flow.state(), &FlowState::Reviewing);
    }

    #[test]
    fn failed_confirmation_keeps_handle_for_retry() {
        let (mut flow, _) = reviewing();
        flow.begin_submit().unwrap();
        flow.submit_succeeded(handle()).unwrap();
        flow.begin_confirm("O1").unwrap();
        flow.confirm_failed(&OrderError::RemoteRejection {
            reason: "order expired".to_string(),
        })
        .unwrap();
        assert!(flow.handle().is_some());

        flow.retry().unwrap();
        assert_eq!(flow.state(), &FlowState::AwaitingScan { handle: handle() });
    }

    #[test]
    fn duplicate_scan_is_refused() {
        let (mut flow, _) = reviewing();
        flow.begin_submit().unwrap();
        flow.submit_succeeded(handle()).unwrap();
        flow.begin_confirm("O1").unwrap();

        let err = flow.begin_confirm("O1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(err.to_string(), "cannot confirm while confirming");
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let (mut flow, _) = reviewing();
        flow.begin_submit().unwrap();
        assert!(flow.begin_submit().is_err());
    }

    #[test]
    fn cart_edits_do_not_drop_displayed_order() {
        let (mut flow, mut cart) = reviewing();
        flow.begin_submit().unwrap();
        flow.submit_succeeded(handle()).unwrap();

        cart.clear();
        flow.sync_with_cart(&cart);
        assert!(flow.handle().is_some());

        flow.close(&cart).unwrap();
        assert_eq!(flow.state(), &FlowState::Empty);
    }

    #[test]
    fn retry_without_failure_is_illegal() {
        let (mut flow, _) = reviewing();
        assert!(flow.retry().is_err());
        assert_eq!(flow.state(), &FlowState::Reviewing);
    }
}
