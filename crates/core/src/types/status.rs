//! Receipt status of an order.
//!
//! On the wire the status is carried by the `receivedByPOS` boolean; this
//! enum is the in-process view of the same two-state lifecycle.

/// Whether the point-of-sale system has acknowledged an order.
///
/// `Pending` is the initial state. The only transition is
/// `Pending -> Received`, and `Received` is terminal.
///
/// `Display` and `FromStr` use the lowercase names `pending` and `received`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReceiptStatus {
    #[default]
    Pending,
    Received,
}

impl ReceiptStatus {
    /// Status corresponding to a `receivedByPOS` flag.
    #[must_use]
    pub const fn from_flag(received: bool) -> Self {
        if received { Self::Received } else { Self::Pending }
    }

    /// Whether the order has been acknowledged.
    #[must_use]
    pub const fn is_received(self) -> bool {
        matches!(self, Self::Received)
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Received => write!(f, "received"),
        }
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "received" => Ok(Self::Received),
            _ => Err(format!("invalid receipt status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(ReceiptStatus::default(), ReceiptStatus::Pending);
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(ReceiptStatus::from_flag(false), ReceiptStatus::Pending);
        assert_eq!(ReceiptStatus::from_flag(true), ReceiptStatus::Received);
        assert!(ReceiptStatus::Received.is_received());
        assert!(!ReceiptStatus::Pending.is_received());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for status in [ReceiptStatus::Pending, ReceiptStatus::Received] {
            assert_eq!(status.to_string().parse::<ReceiptStatus>(), Ok(status));
        }
        assert!("delivered".parse::<ReceiptStatus>().is_err());
    }
}
