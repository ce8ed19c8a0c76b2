//! Status and delivery-slot enums.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed order.
///
/// Serialized in lowercase, matching the persisted profile records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Error parsing a [`DeliverySlot`] from its window string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown delivery window: {0}")]
pub struct DeliverySlotError(pub String);

/// One of the three fixed delivery windows offered at checkout.
///
/// Serialized as the literal window string (`"10:00-14:00"`, ...) so
/// persisted orders read the same way the storefront displays them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliverySlot {
    /// 10:00 - 14:00, the pre-selected default.
    #[default]
    #[serde(rename = "10:00-14:00")]
    Morning,
    /// 14:00 - 18:00.
    #[serde(rename = "14:00-18:00")]
    Afternoon,
    /// 18:00 - 22:00.
    #[serde(rename = "18:00-22:00")]
    Evening,
}

impl DeliverySlot {
    /// Every offered slot, in display order.
    pub const ALL: [Self; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    /// The slot's time window as displayed and persisted.
    #[must_use]
    pub const fn window(&self) -> &'static str {
        match self {
            Self::Morning => "10:00-14:00",
            Self::Afternoon => "14:00-18:00",
            Self::Evening => "18:00-22:00",
        }
    }
}

impl fmt::Display for DeliverySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.window())
    }
}

impl std::str::FromStr for DeliverySlot {
    type Err = DeliverySlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10:00-14:00" => Ok(Self::Morning),
            "14:00-18:00" => Ok(Self::Afternoon),
            "18:00-22:00" => Ok(Self::Evening),
            _ => Err(DeliverySlotError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_form() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_delivery_slot_default_is_first_window() {
        assert_eq!(DeliverySlot::default(), DeliverySlot::Morning);
        assert_eq!(DeliverySlot::default().window(), "10:00-14:00");
    }

    #[test]
    fn test_delivery_slot_serializes_as_window() {
        let json = serde_json::to_string(&DeliverySlot::Evening).unwrap();
        assert_eq!(json, "\"18:00-22:00\"");
        let back: DeliverySlot = serde_json::from_str("\"14:00-18:00\"").unwrap();
        assert_eq!(back, DeliverySlot::Afternoon);
    }

    #[test]
    fn test_delivery_slot_parse_roundtrip() {
        for slot in DeliverySlot::ALL {
            assert_eq!(slot.window().parse::<DeliverySlot>().unwrap(), slot);
        }
        assert!("09:00-12:00".parse::<DeliverySlot>().is_err());
    }
}
