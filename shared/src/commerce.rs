//! Commerce enums shared between the server and client-facing payloads
//!
//! Database rows store these as uppercase strings; `as_db`/`from_db` are the
//! single source of truth for that mapping.

use serde::{Deserialize, Serialize};

/// Product type of an order line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// Event entry ticket
    Ticket,
    /// Event sponsorship tier
    Sponsorship,
    /// Event hotel room reservation
    HotelRoom,
    /// Event exhibition booth
    Booth,
    /// Membership plan purchase
    Membership,
    /// Generic catalog product (non-event)
    Product,
}

impl ProductType {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Ticket => "TICKET",
            Self::Sponsorship => "SPONSORSHIP",
            Self::HotelRoom => "HOTEL_ROOM",
            Self::Booth => "BOOTH",
            Self::Membership => "MEMBERSHIP",
            Self::Product => "PRODUCT",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "TICKET" => Some(Self::Ticket),
            "SPONSORSHIP" => Some(Self::Sponsorship),
            "HOTEL_ROOM" => Some(Self::HotelRoom),
            "BOOTH" => Some(Self::Booth),
            "MEMBERSHIP" => Some(Self::Membership),
            "PRODUCT" => Some(Self::Product),
            _ => None,
        }
    }

    /// Classify a client-supplied type string against the fixed allow-list.
    /// The short spellings `SPONSOR` and `HOTEL` are accepted alongside the
    /// canonical tokens; unknown types fall back to the generic
    /// [`ProductType::Product`] bucket.
    pub fn classify(raw: &str) -> Self {
        let token = raw.trim().to_uppercase();
        match token.as_str() {
            "SPONSOR" => Self::Sponsorship,
            "HOTEL" => Self::HotelRoom,
            other => Self::from_db(other).unwrap_or(Self::Product),
        }
    }

    /// Event-scoped types can only be purchased through an event checkout,
    /// and they are the ones with an inventory counter to decrement.
    pub fn is_event_scoped(&self) -> bool {
        matches!(
            self,
            Self::Ticket | Self::Sponsorship | Self::HotelRoom | Self::Booth
        )
    }
}

/// Lifecycle status of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Coupon discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponKind {
    /// Fixed amount off the subtotal
    Fixed,
    /// Percentage off the subtotal
    Percent,
}

impl CouponKind {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Fixed => "FIXED",
            Self::Percent => "PERCENT",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "FIXED" => Some(Self::Fixed),
            "PERCENT" => Some(Self::Percent),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_db_roundtrip() {
        for pt in [
            ProductType::Ticket,
            ProductType::Sponsorship,
            ProductType::HotelRoom,
            ProductType::Booth,
            ProductType::Membership,
            ProductType::Product,
        ] {
            assert_eq!(ProductType::from_db(pt.as_db()), Some(pt));
        }
        assert_eq!(ProductType::from_db("GIFT_CARD"), None);
    }

    #[test]
    fn classify_defaults_unknown_to_product() {
        assert_eq!(ProductType::classify("ticket"), ProductType::Ticket);
        assert_eq!(ProductType::classify(" MEMBERSHIP "), ProductType::Membership);
        assert_eq!(ProductType::classify("hotel_room"), ProductType::HotelRoom);
        assert_eq!(ProductType::classify("SWAG"), ProductType::Product);
        assert_eq!(ProductType::classify(""), ProductType::Product);
    }

    #[test]
    fn classify_accepts_short_spellings() {
        assert_eq!(ProductType::classify("SPONSOR"), ProductType::Sponsorship);
        assert_eq!(ProductType::classify("hotel"), ProductType::HotelRoom);
        // canonical DB tokens still win
        assert_eq!(ProductType::classify("SPONSOR").as_db(), "SPONSORSHIP");
        assert_eq!(ProductType::classify("HOTEL").as_db(), "HOTEL_ROOM");
    }

    #[test]
    fn client_type_strings_classify_as_event_scoped() {
        for raw in ["TICKET", "SPONSOR", "SPONSORSHIP", "HOTEL", "HOTEL_ROOM", "BOOTH"] {
            assert!(
                ProductType::classify(raw).is_event_scoped(),
                "{raw} must be event-scoped"
            );
        }
    }

    #[test]
    fn event_scoped_types() {
        assert!(ProductType::Ticket.is_event_scoped());
        assert!(ProductType::Sponsorship.is_event_scoped());
        assert!(ProductType::HotelRoom.is_event_scoped());
        assert!(ProductType::Booth.is_event_scoped());
        assert!(!ProductType::Membership.is_event_scoped());
        assert!(!ProductType::Product.is_event_scoped());
    }

    #[test]
    fn order_status_db_roundtrip() {
        assert_eq!(OrderStatus::from_db("PENDING"), Some(OrderStatus::Pending));
        assert_eq!(
            OrderStatus::from_db("COMPLETED"),
            Some(OrderStatus::Completed)
        );
        assert_eq!(OrderStatus::from_db("VOIDED"), None);
    }

    #[test]
    fn coupon_kind_serde_matches_db() {
        let json = serde_json::to_string(&CouponKind::Percent).unwrap();
        assert_eq!(json, "\"PERCENT\"");
        assert_eq!(CouponKind::from_db("FIXED"), Some(CouponKind::Fixed));
    }
}
