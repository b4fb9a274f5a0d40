use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Level in the Indonesian administrative hierarchy handled by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    /// Provinsi
    Province,
    /// Kabupaten/Kota
    Regency,
    /// Kecamatan
    District,
}

impl AdminLevel {
    /// Top-down order used by the resolver and the form binder
    pub const ALL: [AdminLevel; 3] = [AdminLevel::Province, AdminLevel::Regency, AdminLevel::District];

    pub fn parent(self) -> Option<AdminLevel> {
        match self {
            AdminLevel::Province => None,
            AdminLevel::Regency => Some(AdminLevel::Province),
            AdminLevel::District => Some(AdminLevel::Regency),
        }
    }

    /// Levels strictly below this one, top-down
    pub fn descendants(self) -> &'static [AdminLevel] {
        match self {
            AdminLevel::Province => &[AdminLevel::Regency, AdminLevel::District],
            AdminLevel::Regency => &[AdminLevel::District],
            AdminLevel::District => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdminLevel::Province => "province",
            AdminLevel::Regency => "regency",
            AdminLevel::District => "district",
        }
    }

    /// Number of code segments at this level (`32`, `32.75`, `32.75.01`)
    fn code_segments(self) -> usize {
        match self {
            AdminLevel::Province => 1,
            AdminLevel::Regency => 2,
            AdminLevel::District => 3,
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "province" | "provinsi" => Ok(AdminLevel::Province),
            "regency" | "city" | "kabupaten" | "kota" => Ok(AdminLevel::Regency),
            "district" | "kecamatan" => Ok(AdminLevel::District),
            other => Err(format!("Unknown administrative level '{}'", other)),
        }
    }
}

/// A province, regency, or district from the administrative directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeUnit {
    pub level: AdminLevel,
    pub code: String,
    pub name: String,
    /// Owning province (regencies) or regency (districts); `None` for provinces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

impl AdministrativeUnit {
    pub fn province(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            level: AdminLevel::Province,
            code: code.into(),
            name: name.into(),
            parent_code: None,
        }
    }

    pub fn regency(
        code: impl Into<String>,
        name: impl Into<String>,
        province_code: impl Into<String>,
    ) -> Self {
        Self {
            level: AdminLevel::Regency,
            code: code.into(),
            name: name.into(),
            parent_code: Some(province_code.into()),
        }
    }

    pub fn district(
        code: impl Into<String>,
        name: impl Into<String>,
        regency_code: impl Into<String>,
    ) -> Self {
        Self {
            level: AdminLevel::District,
            code: code.into(),
            name: name.into(),
            parent_code: Some(regency_code.into()),
        }
    }
}

/// Compare two region codes ignoring the dotted/undotted format difference
pub fn codes_equal(a: &str, b: &str) -> bool {
    a.chars()
        .filter(|c| *c != '.')
        .eq(b.chars().filter(|c| *c != '.'))
}

/// Derive the parent code from a Kemendagri code.
///
/// Dotted codes drop their last segment (`32.75.01` -> `32.75`). Undotted
/// codes are split into two-digit segments (`327501` -> `3275`). Returns
/// `None` for provinces and for codes whose shape does not fit the level.
pub fn derive_parent_code(code: &str, level: AdminLevel) -> Option<String> {
    let segments = level.code_segments();
    if segments < 2 {
        return None;
    }

    let code = code.trim();
    if code.contains('.') {
        let parts: Vec<&str> = code.split('.').collect();
        if parts.len() != segments || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        return Some(parts[..segments - 1].join("."));
    }

    if code.len() == segments * 2 && code.chars().all(|c| c.is_ascii_digit()) {
        return Some(code[..(segments - 1) * 2].to_string());
    }

    None
}
