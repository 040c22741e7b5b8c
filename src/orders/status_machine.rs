use crate::orders::{OrderError, OrderStatus};

/// Service for managing order status transitions
///
/// The transition table is closed: exactly four edges are legal. Repeating
/// the current status and anything out of `ready` or `cancelled` is
/// rejected.
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Preparing, Cancelled
    /// - Preparing → Ready, Cancelled
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Preparing, OrderStatus::Cancelled)
        )
    }

    /// Attempt to transition from one status to another
    ///
    /// Returns `Ok(to)` for a legal edge, otherwise `InvalidTransition`
    /// carrying the current status so the caller can resynchronize.
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(OrderError::InvalidTransition { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_pending_to_preparing() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Preparing
        ));
    }

    #[test]
    fn test_pending_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Cancelled
        ));
    }

    #[test]
    fn test_preparing_to_ready() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Ready
        ));
    }

    #[test]
    fn test_preparing_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Cancelled
        ));
    }

    #[test]
    fn test_pending_cannot_skip_to_ready() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Ready
        ));
    }

    #[test]
    fn test_ready_is_terminal() {
        for to in ALL {
            assert!(!StatusMachine::is_valid_transition(OrderStatus::Ready, to));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in ALL {
            assert!(!StatusMachine::is_valid_transition(
                OrderStatus::Cancelled,
                to
            ));
        }
    }

    #[test]
    fn test_same_status_is_rejected() {
        for status in ALL {
            assert!(!StatusMachine::is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Preparing,
            OrderStatus::Pending
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Ready,
            OrderStatus::Preparing
        ));
    }

    #[test]
    fn test_transition_valid() {
        let result = StatusMachine::transition(OrderStatus::Pending, OrderStatus::Preparing);
        assert_eq!(result.unwrap(), OrderStatus::Preparing);
    }

    #[test]
    fn test_transition_invalid_reports_current_status() {
        let result = StatusMachine::transition(OrderStatus::Ready, OrderStatus::Pending);
        match result {
            Err(OrderError::InvalidTransition { from, to }) => {
                assert_eq!(from, OrderStatus::Ready);
                assert_eq!(to, OrderStatus::Pending);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn order_status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Preparing),
            Just(OrderStatus::Ready),
            Just(OrderStatus::Cancelled),
        ]
    }

    /// The four legal edges are accepted by both entry points
    #[test]
    fn prop_legal_edges_are_allowed() {
        let legal = [
            (OrderStatus::Pending, OrderStatus::Preparing),
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Preparing, OrderStatus::Ready),
            (OrderStatus::Preparing, OrderStatus::Cancelled),
        ];

        for (from, to) in legal {
            assert!(StatusMachine::is_valid_transition(from, to));
            assert_eq!(StatusMachine::transition(from, to).unwrap(), to);
        }
    }

    /// Everything outside the four-edge table is rejected
    #[test]
    fn prop_everything_else_is_rejected() {
        let legal = [
            (OrderStatus::Pending, OrderStatus::Preparing),
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Preparing, OrderStatus::Ready),
            (OrderStatus::Preparing, OrderStatus::Cancelled),
        ];

        proptest!(|(
            from in order_status_strategy(),
            to in order_status_strategy()
        )| {
            let expected = legal.contains(&(from, to));
            prop_assert_eq!(StatusMachine::is_valid_transition(from, to), expected);
        });
    }

    /// transition() and is_valid_transition() always agree, and a rejection
    /// carries the pair it rejected
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in order_status_strategy(),
            to in order_status_strategy()
        )| {
            let result = StatusMachine::transition(from, to);
            if StatusMachine::is_valid_transition(from, to) {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                match result {
                    Err(OrderError::InvalidTransition { from: f, to: t }) => {
                        prop_assert_eq!(f, from);
                        prop_assert_eq!(t, to);
                    }
                    other => prop_assert!(false, "expected InvalidTransition, got {:?}", other),
                }
            }
        });
    }

    /// Cancellation is reachable from every non-terminal state
    #[test]
    fn prop_non_terminal_states_can_cancel() {
        for from in [OrderStatus::Pending, OrderStatus::Preparing] {
            assert!(StatusMachine::is_valid_transition(
                from,
                OrderStatus::Cancelled
            ));
        }
    }
}
