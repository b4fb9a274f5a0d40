use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for administrative region codes (Kemendagri format)
    /// Two digits per level, dotted or undotted, up to district depth
    /// - Valid: "32", "32.75", "32.75.01", "3275", "327501"
    /// - Invalid: "3", "32.7", "32..75", "32.75.01.1001", "ab"
    pub static ref REGION_CODE_REGEX: Regex =
        Regex::new(r"^\d{2}(?:(?:\.\d{2}){0,2}|\d{2}|\d{4})$").unwrap();
}
