//! Unified error codes for the Freightexpo platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Company / membership errors
//! - 4xxx: Order / checkout errors
//! - 5xxx: Payment / invoice errors
//! - 6xxx: Event / inventory / upload errors
//! - 7xxx: Inquiry errors
//! - 8xxx: Chat errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Resource limit exceeded
    ResourceLimitExceeded = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1006,
    /// Password too short
    PasswordTooShort = 1007,
    /// Email already registered
    EmailTaken = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Company / Membership ====================
    /// Company not found
    CompanyNotFound = 3001,
    /// Membership plan not found
    MembershipPlanNotFound = 3002,
    /// Membership has expired
    MembershipExpired = 3003,
    /// Company has no membership
    NoMembership = 3004,

    // ==================== 4xxx: Order / Checkout ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4002,
    /// Cart is empty
    OrderEmpty = 4003,
    /// Product type requires an event-scoped checkout
    EventRequired = 4004,
    /// Coupon not found
    CouponNotFound = 4101,
    /// Coupon is invalid
    CouponInvalid = 4102,

    // ==================== 5xxx: Payment / Invoice ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Invoice not found
    InvoiceNotFound = 5101,

    // ==================== 6xxx: Event / Inventory ====================
    /// Event not found
    EventNotFound = 6001,
    /// Product is out of stock
    OutOfStock = 6002,
    /// Product does not belong to this event
    ProductNotInEvent = 6003,
    /// Booth not found
    BoothNotFound = 6101,
    /// Ticket type not found
    TicketTypeNotFound = 6201,
    /// Sponsorship tier not found
    SponsorTypeNotFound = 6301,
    /// Hotel room type not found
    RoomTypeNotFound = 6401,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid file extension
    InvalidFileExtension = 6503,

    // ==================== 7xxx: Inquiry ====================
    /// Inquiry not found
    InquiryNotFound = 7001,

    // ==================== 8xxx: Chat ====================
    /// Conversation has not been joined
    ConversationNotJoined = 8001,
    /// Connection limit reached
    ConnectionLimitReached = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Email send failed
    EmailSendFailed = 9101,
    /// Object storage operation failed
    StorageFailed = 9201,
    /// Client disconnected
    ClientDisconnected = 9301,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::ResourceLimitExceeded => "Resource limit exceeded",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::EmailTaken => "Email is already registered",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Company / Membership
            ErrorCode::CompanyNotFound => "Company not found",
            ErrorCode::MembershipPlanNotFound => "Membership plan not found",
            ErrorCode::MembershipExpired => "Membership has expired",
            ErrorCode::NoMembership => "Company has no membership",

            // Order / Checkout
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderEmpty => "Cart is empty",
            ErrorCode::EventRequired => "This product type requires an event",
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponInvalid => "Coupon is invalid",

            // Payment / Invoice
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::InvoiceNotFound => "Invoice not found",

            // Event / Inventory
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::OutOfStock => "Product is out of stock",
            ErrorCode::ProductNotInEvent => "Product does not belong to this event",
            ErrorCode::BoothNotFound => "Booth not found",
            ErrorCode::TicketTypeNotFound => "Ticket type not found",
            ErrorCode::SponsorTypeNotFound => "Sponsorship tier not found",
            ErrorCode::RoomTypeNotFound => "Hotel room type not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidFileExtension => "Invalid file extension",

            // Inquiry
            ErrorCode::InquiryNotFound => "Inquiry not found",

            // Chat
            ErrorCode::ConversationNotJoined => "Conversation has not been joined",
            ErrorCode::ConnectionLimitReached => "Connection limit reached",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::EmailSendFailed => "Email send failed",
            ErrorCode::StorageFailed => "Object storage operation failed",
            ErrorCode::ClientDisconnected => "Client disconnected",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::ResourceLimitExceeded),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountDisabled),
            1007 => Ok(ErrorCode::PasswordTooShort),
            1008 => Ok(ErrorCode::EmailTaken),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Company / Membership
            3001 => Ok(ErrorCode::CompanyNotFound),
            3002 => Ok(ErrorCode::MembershipPlanNotFound),
            3003 => Ok(ErrorCode::MembershipExpired),
            3004 => Ok(ErrorCode::NoMembership),

            // Order / Checkout
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyCompleted),
            4003 => Ok(ErrorCode::OrderEmpty),
            4004 => Ok(ErrorCode::EventRequired),
            4101 => Ok(ErrorCode::CouponNotFound),
            4102 => Ok(ErrorCode::CouponInvalid),

            // Payment / Invoice
            5001 => Ok(ErrorCode::PaymentFailed),
            5101 => Ok(ErrorCode::InvoiceNotFound),

            // Event / Inventory
            6001 => Ok(ErrorCode::EventNotFound),
            6002 => Ok(ErrorCode::OutOfStock),
            6003 => Ok(ErrorCode::ProductNotInEvent),
            6101 => Ok(ErrorCode::BoothNotFound),
            6201 => Ok(ErrorCode::TicketTypeNotFound),
            6301 => Ok(ErrorCode::SponsorTypeNotFound),
            6401 => Ok(ErrorCode::RoomTypeNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidFileExtension),

            // Inquiry
            7001 => Ok(ErrorCode::InquiryNotFound),

            // Chat
            8001 => Ok(ErrorCode::ConversationNotJoined),
            8002 => Ok(ErrorCode::ConnectionLimitReached),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::EmailSendFailed),
            9201 => Ok(ErrorCode::StorageFailed),
            9301 => Ok(ErrorCode::ClientDisconnected),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::CompanyNotFound.code(), 3001);
        assert_eq!(ErrorCode::EventRequired.code(), 4004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_roundtrip_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::AdminRequired,
            ErrorCode::MembershipPlanNotFound,
            ErrorCode::OrderEmpty,
            ErrorCode::EventRequired,
            ErrorCode::CouponNotFound,
            ErrorCode::OutOfStock,
            ErrorCode::ConversationNotJoined,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(54321), Err(InvalidErrorCode(54321)));
    }

    #[test]
    fn test_event_required_message_contains_phrase() {
        // Clients match on this phrase when routing checkout errors.
        assert!(ErrorCode::EventRequired.message().contains("requires an event"));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(back, ErrorCode::OrderNotFound);
    }
}
