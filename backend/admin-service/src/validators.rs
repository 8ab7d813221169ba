use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Input validation utilities for the admin service

// Compile regex patterns once at startup.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}$").expect("hardcoded mobile regex is invalid - fix source code")
});

static PINCODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{6}$").expect("hardcoded pincode regex is invalid - fix source code")
});

static USER_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[AI]-[A-Z0-9]{6}$").expect("hardcoded user id regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate a 10-digit Indian mobile number
pub fn validate_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(mobile)
}

/// Validate a 6-digit postal pincode
pub fn validate_pincode(pincode: &str) -> bool {
    PINCODE_REGEX.is_match(pincode)
}

/// Validate a pre-issued login id (`A-XXXXXX` / `I-XXXXXX`)
pub fn validate_user_id(user_id: &str) -> bool {
    USER_ID_REGEX.is_match(user_id)
}

/// validator crate compatible adapter for mobile numbers
pub fn validate_mobile_validator(mobile: &str) -> Result<(), ValidationError> {
    if validate_mobile(mobile) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_mobile_number"))
    }
}

/// validator crate compatible adapter for pincodes
pub fn validate_pincode_validator(pincode: &str) -> Result<(), ValidationError> {
    if validate_pincode(pincode) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_pincode"))
    }
}
