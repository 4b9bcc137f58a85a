//! Location-code lookup.
//!
//! Maps free-text location descriptions ("Gerencia General", "1er piso
//! almacen") to short department codes. The table is immutable once built:
//! it is loaded at start-up (built-in or from a JSON file) and shared by
//! reference with the payload parser.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CoreError;

/// Code returned for empty or unrecognized locations (archive).
pub const DEFAULT_LOCATION_CODE: &str = "ARC";

/// Built-in variants, grouped by department code.
const BUILTIN_LOCATIONS: &[(&str, &[&str])] = &[
    (
        "ADMON",
        &["administracion", "administración", "1er piso administracion"],
    ),
    ("ALM", &["almacen", "almacén", "1er piso almacen"]),
    (
        "CRED",
        &[
            "credito y cobranza",
            "crédito y cobranza",
            "cuentas por pagar",
            "1er piso cuentas por pagar",
        ],
    ),
    ("DIR", &["direccion", "dirección", "2do piso direccion"]),
    (
        "GER",
        &["gerencia", "gerencia general", "2do piso gerencia general"],
    ),
    (
        "GV",
        &["gerencia de ventas", "1er piso gerencia de ventas"],
    ),
    (
        "PROY",
        &[
            "proyectos",
            "1er piso proyectos",
            "marketing",
            "1er piso marketing",
        ],
    ),
    (
        "MON",
        &[
            "monitoreo",
            "2do piso monitoreo",
            "site",
            "2do piso site",
            "video wall",
            "2do piso video wall",
        ],
    ),
    ("R.H.", &["1er piso r.h", "recursos humanos"]),
    ("SJ", &["sala de juntas", "2do piso sala juntas"]),
    ("VEN 1", &["ventas", "1er piso ventas"]),
];

/// One department code and the location spellings that map to it.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationEntry {
    pub code: String,
    pub variants: Vec<String>,
}

/// On-disk shape of a location table file.
#[derive(Debug, Deserialize)]
struct LocationTableFile {
    #[serde(default = "default_code")]
    default_code: String,
    entries: Vec<LocationEntry>,
}

fn default_code() -> String {
    DEFAULT_LOCATION_CODE.to_string()
}

/// Immutable location-variant → code table.
#[derive(Debug, Clone)]
pub struct LocationTable {
    default_code: String,
    by_variant: HashMap<String, String>,
}

impl LocationTable {
    /// Build a table from explicit entries.
    ///
    /// Rejects blank codes and a variant mapped to two different codes.
    pub fn new(
        default_code: impl Into<String>,
        entries: impl IntoIterator<Item = LocationEntry>,
    ) -> Result<Self, CoreError> {
        let default_code = default_code.into();
        if default_code.trim().is_empty() {
            return Err(CoreError::Validation(
                "Default location code must not be empty".to_string(),
            ));
        }

        let mut by_variant = HashMap::new();
        for entry in entries {
            let code = entry.code.trim();
            if code.is_empty() {
                return Err(CoreError::Validation(
                    "Location code must not be empty".to_string(),
                ));
            }
            for variant in &entry.variants {
                let key = normalize_location(variant);
                if key.is_empty() {
                    continue;
                }
                if let Some(previous) = by_variant.insert(key.clone(), code.to_string()) {
                    if previous != code {
                        return Err(CoreError::Validation(format!(
                            "Location '{key}' is mapped to both '{previous}' and '{code}'"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            default_code,
            by_variant,
        })
    }

    /// Parse a table from its JSON representation:
    /// `{ "default_code": "ARC", "entries": [{ "code": "...", "variants": [...] }] }`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let file: LocationTableFile = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid location table: {e}")))?;
        Self::new(file.default_code, file.entries)
    }

    /// Look up the code for a free-text location.
    ///
    /// Matching trims and ignores case. Empty or unknown locations yield the
    /// default code.
    pub fn code_for(&self, location: &str) -> &str {
        self.by_variant
            .get(&normalize_location(location))
            .map(String::as_str)
            .unwrap_or(&self.default_code)
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    /// Number of distinct location variants known to the table.
    pub fn len(&self) -> usize {
        self.by_variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty()
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        let by_variant = BUILTIN_LOCATIONS
            .iter()
            .flat_map(|(code, variants)| {
                variants
                    .iter()
                    .map(move |variant| (normalize_location(variant), (*code).to_string()))
            })
            .collect();

        Self {
            default_code: DEFAULT_LOCATION_CODE.to_string(),
            by_variant,
        }
    }
}

fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}
