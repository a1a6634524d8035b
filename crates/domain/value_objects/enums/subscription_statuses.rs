use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Cancelled,
    Expired,
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}

impl SubscriptionStatus {
    /// Unknown values never entitle, so they read as `Expired`.
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "cancelled" => SubscriptionStatus::Cancelled,
            _ => SubscriptionStatus::Expired,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubscriptionStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_values() {
        assert_eq!(SubscriptionStatus::from_str("active"), SubscriptionStatus::Active);
        assert_eq!(
            SubscriptionStatus::from_str("cancelled"),
            SubscriptionStatus::Cancelled
        );
        assert_eq!(SubscriptionStatus::from_str("expired"), SubscriptionStatus::Expired);
        assert_eq!(SubscriptionStatus::from_str("garbage"), SubscriptionStatus::Expired);
    }

    #[test]
    fn only_active_is_not_terminal() {
        assert!(!SubscriptionStatus::Active.is_terminal());
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(SubscriptionStatus::Expired.is_terminal());
    }
}
