use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

pub const QR_IMAGE_DIMENSION: u32 = 256;

lazy_static! {
    pub static ref PHONE_PATTERN: Regex =
        Regex::new(r"^\+?[0-9()\s\-]+$").expect("Failed to compile phone pattern");
    pub static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email pattern");
    // Largest tolerated drift between a client-declared total and the
    // server-side recomputation, in currency units.
    pub static ref TOTAL_EPSILON: BigDecimal = BigDecimal::from_str("0.01").unwrap();
}
