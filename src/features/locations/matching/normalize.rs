use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

lazy_static! {
    static ref NON_ALNUM_REGEX: Regex = Regex::new(r"[^a-z0-9]+").unwrap();

    /// Leading administrative designators, longest alternatives first
    static ref ADMIN_PREFIX_REGEX: Regex = Regex::new(
        r"^(daerah khusus ibukota|daerah istimewa|kota administrasi|kabupaten administrasi|kabupaten|kotamadya|kota|kab|provinsi|prov|dki|d i|di|kecamatan|kec|distrik)\s+"
    )
    .unwrap();

    /// Trailing English designators used by OpenStreetMap names
    static ref ADMIN_SUFFIX_REGEX: Regex =
        Regex::new(r"\s+(regency|city|province|subdistrict|district)$").unwrap();
}

/// City-or-regency designation carried by a second-level name.
///
/// "Kota Bekasi" and "Kabupaten Bekasi" are different units sharing a base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Kota,
    Kabupaten,
}

/// A region name reduced to its comparable form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub base: String,
    pub kind: Option<RegionKind>,
}

impl NormalizedName {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Kinds conflict only when both sides state one and they differ
    pub fn kind_compatible(&self, other: &NormalizedName) -> bool {
        match (self.kind, other.kind) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Whitespace-separated tokens of at least three characters
    pub fn significant_tokens(&self) -> Vec<&str> {
        self.base
            .split_whitespace()
            .filter(|t| t.chars().count() >= 3)
            .collect()
    }
}

fn kind_of(designator: &str) -> Option<RegionKind> {
    match designator {
        "kota" | "kotamadya" | "kota administrasi" | "city" => Some(RegionKind::Kota),
        "kabupaten" | "kabupaten administrasi" | "kab" | "regency" => Some(RegionKind::Kabupaten),
        _ => None,
    }
}

fn leading_designator(name: &str) -> Option<(usize, String)> {
    ADMIN_PREFIX_REGEX
        .captures(name)
        .map(|caps| (caps[0].len(), caps[1].to_string()))
}

fn trailing_designator(name: &str) -> Option<(usize, String)> {
    ADMIN_SUFFIX_REGEX
        .captures(name)
        .map(|caps| (caps[0].len(), caps[1].to_string()))
}

/// Fold case and diacritics, turn punctuation into spaces, collapse whitespace
pub fn fold_text(raw: &str) -> String {
    let folded: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    NON_ALNUM_REGEX
        .replace_all(&folded, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a region name for comparison.
///
/// "Kota Administrasi Jakarta Selatan" and "jakarta selatan" reduce to the
/// same base; "Kota" and "Regency" also record the [`RegionKind`].
/// Designators are stripped repeatedly but never down to an empty name.
pub fn normalize_region_name(raw: &str) -> NormalizedName {
    let mut base = fold_text(raw);
    let mut kind = None;

    while let Some((len, designator)) = leading_designator(&base) {
        if len == base.len() {
            break;
        }
        kind = kind.or_else(|| kind_of(&designator));
        base.replace_range(..len, "");
    }

    while let Some((len, designator)) = trailing_designator(&base) {
        if len == base.len() {
            break;
        }
        kind = kind.or_else(|| kind_of(&designator));
        base.truncate(base.len() - len);
    }

    NormalizedName { base, kind }
}
