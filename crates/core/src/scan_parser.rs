//! Scan payload interpretation.
//!
//! A decoded QR/barcode string can carry asset metadata in several shapes:
//!
//! - JSON: `{"codigo": "ACT001", "nombre": "Laptop", ...}`
//! - labeled text: `Activo: Escritorio en L Ubicación: 1er piso R.H. Marca: ...`
//! - pipe-delimited: `ACT001|Laptop Dell|Oficina 1|Dell|Latitude|SN123456`
//! - plain text: `ACT001 - Laptop Dell`, or any opaque code
//!
//! [`ScanParser::parse`] detects the shape, extracts what it can and always
//! returns a fully-populated [`AssetRecord`]: anything it cannot determine is
//! filled with a sentinel placeholder.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::locations::LocationTable;

// ---------------------------------------------------------------------------
// Sentinel values
// ---------------------------------------------------------------------------

pub const UNKNOWN_CODE: &str = "Sin código";
pub const UNKNOWN_NAME: &str = "Activo sin nombre";
pub const UNKNOWN_LOCATION: &str = "Sin ubicación";
pub const UNKNOWN_BRAND: &str = "Sin marca";
pub const UNKNOWN_MODEL: &str = "Sin modelo";
pub const UNKNOWN_SERIAL: &str = "Sin número de serie";

// ---------------------------------------------------------------------------
// JSON key synonyms (tried in order)
// ---------------------------------------------------------------------------

const CODE_KEYS: &[&str] = &["codigo", "code"];
const NAME_KEYS: &[&str] = &["nombre", "activo", "asset"];
const LOCATION_KEYS: &[&str] = &["ubicacion", "location"];
const BRAND_KEYS: &[&str] = &["marca", "brand"];
const MODEL_KEYS: &[&str] = &["modelo", "model"];
const SERIAL_KEYS: &[&str] = &["no_serie", "serial", "serie"];

// ---------------------------------------------------------------------------
// Labeled-text tokens
// ---------------------------------------------------------------------------

/// Presence of any of these (case-insensitive) selects the labeled-text format.
const LABEL_TRIGGERS: &[&str] = &[
    "activo:",
    "ubicación:",
    "ubicacion:",
    "marca:",
    "modelo:",
    "serie:",
];

/// Label synonyms per field. Within a field, the first label present wins.
const FIELD_LABELS: &[(Field, &[&str])] = &[
    (Field::Name, &["activo:", "asset:", "equipo:", "item:"]),
    (
        Field::Location,
        &["ubicación:", "ubicacion:", "location:", "lugar:"],
    ),
    (Field::Brand, &["marca:", "brand:", "fabricante:"]),
    (Field::Model, &["modelo:", "model:", "tipo:"]),
    (
        Field::SerialNumber,
        &[
            "n. serie:",
            "serie:",
            "serial:",
            "número de serie:",
            "numero de serie:",
            "sn:",
        ],
    ),
];

/// Raw text longer than this is truncated when used as a fallback code.
const FALLBACK_CODE_MAX_CHARS: usize = 20;

/// Minimum length of a code synthesized from the asset name.
const MIN_SYNTHESIZED_CODE_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Canonical asset fields extracted from a scan. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub code: String,
    pub name: String,
    pub location: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub location_code: String,
}

impl AssetRecord {
    /// A record with the given code and name and every other field unknown.
    fn with_code_and_name(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            location: UNKNOWN_LOCATION.to_string(),
            brand: UNKNOWN_BRAND.to_string(),
            model: UNKNOWN_MODEL.to_string(),
            serial_number: UNKNOWN_SERIAL.to_string(),
            location_code: String::new(),
        }
    }
}

/// Payload shapes, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    Json,
    Labeled,
    Delimited,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Location,
    Brand,
    Model,
    SerialNumber,
}

/// Why a structured attempt declined the payload.
#[derive(Debug, thiserror::Error)]
enum ParseFailure {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON payload is not an object")]
    NotAnObject,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Scan payload parser. Cheap to clone; the location table is shared.
#[derive(Debug, Clone)]
pub struct ScanParser {
    locations: Arc<LocationTable>,
}

impl ScanParser {
    pub fn new(locations: Arc<LocationTable>) -> Self {
        Self { locations }
    }

    /// The location table used to derive `location_code`.
    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Interpret a raw scan. Never fails and is deterministic.
    pub fn parse(&self, raw: &str) -> AssetRecord {
        let record = match detect_format(raw) {
            PayloadFormat::Json => parse_json(raw).unwrap_or_else(|err| {
                tracing::debug!(error = %err, "Scan looks like JSON but could not be read");
                raw_fallback(raw)
            }),
            PayloadFormat::Labeled => parse_labeled(raw),
            PayloadFormat::Delimited => parse_delimited(raw),
            PayloadFormat::Plain => parse_plain(raw),
        };
        self.complete(record)
    }

    /// Replace blank fields with sentinels and derive the location code.
    fn complete(&self, mut record: AssetRecord) -> AssetRecord {
        fill_blank(&mut record.code, UNKNOWN_CODE);
        fill_blank(&mut record.name, UNKNOWN_NAME);
        fill_blank(&mut record.location, UNKNOWN_LOCATION);
        fill_blank(&mut record.brand, UNKNOWN_BRAND);
        fill_blank(&mut record.model, UNKNOWN_MODEL);
        fill_blank(&mut record.serial_number, UNKNOWN_SERIAL);
        record.location_code = self.locations.code_for(&record.location).to_string();
        record
    }
}

impl Default for ScanParser {
    fn default() -> Self {
        Self::new(Arc::new(LocationTable::default()))
    }
}

/// Reject scans with no content. Registration callers must check this
/// before parsing; the parser itself accepts anything.
pub fn validate_raw_code(raw: &str) -> Result<&str, CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::Validation(
            "Scan code must not be empty".to_string(),
        ));
    }
    Ok(raw)
}

/// Decide which shape a payload has. First match wins.
pub fn detect_format(raw: &str) -> PayloadFormat {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return PayloadFormat::Json;
    }

    let lowered = raw.to_lowercase();
    if LABEL_TRIGGERS.iter().any(|token| lowered.contains(token)) {
        PayloadFormat::Labeled
    } else if raw.contains('|') {
        PayloadFormat::Delimited
    } else {
        PayloadFormat::Plain
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn parse_json(raw: &str) -> Result<AssetRecord, ParseFailure> {
    let map = match serde_json::from_str::<Value>(raw.trim())? {
        Value::Object(map) => map,
        _ => return Err(ParseFailure::NotAnObject),
    };

    let field = |keys: &[&str], default: &str| {
        json_field(&map, keys).unwrap_or_else(|| default.to_string())
    };

    Ok(AssetRecord {
        code: field(CODE_KEYS, raw),
        name: field(NAME_KEYS, UNKNOWN_NAME),
        location: field(LOCATION_KEYS, UNKNOWN_LOCATION),
        brand: field(BRAND_KEYS, UNKNOWN_BRAND),
        model: field(MODEL_KEYS, UNKNOWN_MODEL),
        serial_number: field(SERIAL_KEYS, UNKNOWN_SERIAL),
        location_code: String::new(),
    })
}

/// First key in `keys` holding a usable scalar.
fn json_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.get(*key).and_then(json_scalar))
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Labeled text
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LabeledFields {
    name: Option<String>,
    location: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    serial_number: Option<String>,
}

impl LabeledFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Location => &mut self.location,
            Field::Brand => &mut self.brand,
            Field::Model => &mut self.model,
            Field::SerialNumber => &mut self.serial_number,
        }
    }
}

fn parse_labeled(raw: &str) -> AssetRecord {
    // Search a one-char-per-char lowercase copy so positions map straight
    // back onto the original text.
    let original: Vec<char> = raw.chars().collect();
    let lowered: Vec<char> = original.iter().map(|c| fold_char(*c)).collect();

    let mut fields = LabeledFields::default();
    for (field, labels) in FIELD_LABELS {
        let Some((start, label_len)) = labels.iter().find_map(|label| {
            let label: Vec<char> = label.chars().collect();
            find_chars(&lowered, &label, 0).map(|pos| (pos, label.len()))
        }) else {
            continue;
        };

        let value_start = start + label_len;
        let value_end = FIELD_LABELS
            .iter()
            .filter(|(other, _)| other != field)
            .flat_map(|(_, other_labels)| other_labels.iter())
            .filter_map(|label| {
                let label: Vec<char> = label.chars().collect();
                find_chars(&lowered, &label, value_start)
            })
            .min()
            .unwrap_or(original.len());

        let value: String = original[value_start..value_end].iter().collect();
        let value = clean_labeled_value(&value);
        if !value.is_empty() {
            *fields.slot(*field) = Some(value.to_string());
        }
    }

    let fallback_code = truncated_code(raw);
    let (code, name) = match fields.name {
        Some(name) => {
            let code = synthesize_code(&name).unwrap_or(fallback_code);
            (code, name)
        }
        None => (fallback_code.clone(), fallback_code),
    };

    AssetRecord {
        code,
        name,
        location: fields.location.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        brand: fields.brand.unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
        model: fields.model.unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
        serial_number: fields
            .serial_number
            .unwrap_or_else(|| UNKNOWN_SERIAL.to_string()),
        location_code: String::new(),
    }
}

/// Lowercase a single char, keeping a 1:1 char mapping.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn clean_labeled_value(value: &str) -> &str {
    value
        .trim()
        .trim_end_matches(['.', ',', ';', ':'])
        .trim()
}

/// The raw text, cut to 20 chars with a trailing ellipsis when longer.
fn truncated_code(raw: &str) -> String {
    if raw.chars().count() > FALLBACK_CODE_MAX_CHARS {
        let head: String = raw.chars().take(FALLBACK_CODE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        raw.to_string()
    }
}

/// Upper-cased first three letters of each of the first three words of
/// `name`, skipping words that are not purely alphabetic.
fn synthesize_code(name: &str) -> Option<String> {
    let code: String = name
        .split_whitespace()
        .take(3)
        .filter(|word| word.chars().all(char::is_alphabetic))
        .map(|word| word.chars().take(3).collect::<String>().to_uppercase())
        .collect();

    (code.chars().count() >= MIN_SYNTHESIZED_CODE_CHARS).then_some(code)
}

// ---------------------------------------------------------------------------
// Pipe-delimited and plain text
// ---------------------------------------------------------------------------

fn parse_delimited(raw: &str) -> AssetRecord {
    let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
    let field = |index: usize, default: &str| -> String {
        match parts.get(index) {
            Some(part) if !part.is_empty() => (*part).to_string(),
            _ => default.to_string(),
        }
    };

    AssetRecord {
        code: field(0, UNKNOWN_CODE),
        name: field(1, UNKNOWN_NAME),
        location: field(2, UNKNOWN_LOCATION),
        brand: field(3, UNKNOWN_BRAND),
        model: field(4, UNKNOWN_MODEL),
        serial_number: field(5, UNKNOWN_SERIAL),
        location_code: String::new(),
    }
}

fn parse_plain(raw: &str) -> AssetRecord {
    match raw.split_once(" - ") {
        Some((code, name)) => AssetRecord::with_code_and_name(code.trim(), name.trim()),
        None => raw_fallback(raw),
    }
}

/// The whole payload, exactly as scanned, as both code and name.
fn raw_fallback(raw: &str) -> AssetRecord {
    AssetRecord::with_code_and_name(raw, raw)
}

fn fill_blank(value: &mut String, sentinel: &str) {
    if value.trim().is_empty() {
        *value = sentinel.to_string();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const LABELED_CHAIR: &str = "Activo: Silla Ejecutiva Ubicación: Gerencia General \
        Marca: Steelcase Modelo: Think Chair N. Serie: SC123456";

    fn parse(raw: &str) -> AssetRecord {
        ScanParser::default().parse(raw)
    }

    fn assert_fully_populated(record: &AssetRecord) {
        for value in [
            &record.code,
            &record.name,
            &record.location,
            &record.brand,
            &record.model,
            &record.serial_number,
            &record.location_code,
        ] {
            assert!(!value.trim().is_empty(), "blank field in {record:?}");
        }
    }

    // -- Format detection ----------------------------------------------------

    #[test]
    fn detects_each_format() {
        assert_eq!(detect_format(r#" {"codigo": "A1"} "#), PayloadFormat::Json);
        assert_eq!(detect_format(LABELED_CHAIR), PayloadFormat::Labeled);
        assert_eq!(detect_format("A|B|C"), PayloadFormat::Delimited);
        assert_eq!(detect_format("ACT-001"), PayloadFormat::Plain);
    }

    #[test]
    fn label_detection_ignores_case() {
        assert_eq!(detect_format("MARCA: HP"), PayloadFormat::Labeled);
        assert_eq!(detect_format("UBICACIÓN: Almacén"), PayloadFormat::Labeled);
    }

    #[test]
    fn labels_take_priority_over_pipes() {
        assert_eq!(detect_format("Marca: HP | Modelo: 840"), PayloadFormat::Labeled);
    }

    // -- JSON ----------------------------------------------------------------

    #[test]
    fn json_with_spanish_keys() {
        let record = parse(
            r#"{"codigo":"A1","nombre":"Laptop","ubicacion":"Oficina","marca":"Dell","modelo":"X1","no_serie":"S1"}"#,
        );
        assert_eq!(record.code, "A1");
        assert_eq!(record.name, "Laptop");
        assert_eq!(record.location, "Oficina");
        assert_eq!(record.brand, "Dell");
        assert_eq!(record.model, "X1");
        assert_eq!(record.serial_number, "S1");
        assert_eq!(record.location_code, "ARC");
    }

    #[test]
    fn json_with_english_synonyms() {
        let record = parse(
            r#"{"code":"B2","asset":"Monitor","location":"Almacen","brand":"LG","model":"27UL","serial":"LG-9"}"#,
        );
        assert_eq!(record.code, "B2");
        assert_eq!(record.name, "Monitor");
        assert_eq!(record.location, "Almacen");
        assert_eq!(record.brand, "LG");
        assert_eq!(record.model, "27UL");
        assert_eq!(record.serial_number, "LG-9");
        assert_eq!(record.location_code, "ALM");
    }

    #[test]
    fn json_prefers_first_synonym_present() {
        let record = parse(r#"{"activo":"Segundo","nombre":"Primero","serie":"S-2","no_serie":"S-1"}"#);
        assert_eq!(record.name, "Primero");
        assert_eq!(record.serial_number, "S-1");
    }

    #[test]
    fn json_missing_keys_take_sentinels() {
        let raw = r#"{"nombre":"Proyector"}"#;
        let record = parse(raw);
        assert_eq!(record.code, raw);
        assert_eq!(record.name, "Proyector");
        assert_eq!(record.location, UNKNOWN_LOCATION);
        assert_eq!(record.brand, UNKNOWN_BRAND);
        assert_eq!(record.model, UNKNOWN_MODEL);
        assert_eq!(record.serial_number, UNKNOWN_SERIAL);
    }

    #[test]
    fn json_numbers_are_rendered_and_nulls_ignored() {
        let record = parse(r#"{"codigo": 1042, "nombre": null, "marca": "  "}"#);
        assert_eq!(record.code, "1042");
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_eq!(record.brand, UNKNOWN_BRAND);
    }

    #[test]
    fn json_is_preferred_over_pipes() {
        let record = parse(r#"{"codigo":"A|1","nombre":"Switch|24p"}"#);
        assert_eq!(record.code, "A|1");
        assert_eq!(record.name, "Switch|24p");
    }

    #[test]
    fn malformed_json_falls_back_to_raw_not_next_format() {
        let raw = "{codigo: A1 | Laptop | Marca: Dell}";
        let record = parse(raw);
        assert_eq!(record.code, raw);
        assert_eq!(record.name, raw);
        assert_eq!(record.brand, UNKNOWN_BRAND);
        assert_eq!(record.location_code, "ARC");
    }

    #[test]
    fn json_attempt_reports_failures() {
        assert_matches!(parse_json("{oops}"), Err(ParseFailure::Json(_)));
    }

    // -- Labeled text --------------------------------------------------------

    #[test]
    fn labeled_text_extracts_every_field() {
        let record = parse(LABELED_CHAIR);
        assert_eq!(record.name, "Silla Ejecutiva");
        assert_eq!(record.location, "Gerencia General");
        assert_eq!(record.brand, "Steelcase");
        assert_eq!(record.model, "Think Chair");
        assert_eq!(record.serial_number, "SC123456");
        assert_eq!(record.code, "SILEJE");
        assert_eq!(record.location_code, "GER");
    }

    #[test]
    fn labeled_values_lose_trailing_punctuation() {
        let record = parse(
            "Activo: Escritorio en L Ubicación: 1er piso R.H. Marca: Techni mobili Modelo: Havano N. Serie: -.",
        );
        assert_eq!(record.name, "Escritorio en L");
        assert_eq!(record.location, "1er piso R.H");
        assert_eq!(record.location_code, "R.H.");
        assert_eq!(record.brand, "Techni mobili");
        assert_eq!(record.model, "Havano");
        assert_eq!(record.serial_number, "-");
        // "en" has only two letters; "L" one.
        assert_eq!(record.code, "ESCENL");
    }

    #[test]
    fn labeled_fields_may_appear_in_any_order() {
        let record = parse("marca: HP; equipo: Laptop Elitebook; sn: 5CG123");
        assert_eq!(record.brand, "HP");
        assert_eq!(record.name, "Laptop Elitebook");
        assert_eq!(record.serial_number, "5CG123");
        assert_eq!(record.code, "LAPELI");
    }

    #[test]
    fn labeled_without_name_uses_truncated_text() {
        let raw = "Marca: Lenovo Modelo: ThinkCentre M70";
        let record = parse(raw);
        assert_eq!(record.brand, "Lenovo");
        assert_eq!(record.model, "ThinkCentre M70");
        assert_eq!(record.code, "Marca: Lenovo Modelo...");
        assert_eq!(record.name, record.code);
    }

    #[test]
    fn short_synthesized_code_keeps_fallback() {
        let raw = "Activo: PC 01";
        let record = parse(raw);
        assert_eq!(record.name, "PC 01");
        // "PC" gives only two letters and "01" is not alphabetic.
        assert_eq!(record.code, raw);
    }

    #[test]
    fn labeled_empty_value_takes_sentinel() {
        let record = parse("Activo: Silla Marca: Modelo: X");
        assert_eq!(record.name, "Silla");
        assert_eq!(record.brand, UNKNOWN_BRAND);
        assert_eq!(record.model, "X");
    }

    #[test]
    fn labeled_handles_multibyte_text() {
        let record = parse("Activo: Cámara Ñandú Ubicación: Almacén Serie: ÄÖ-1");
        assert_eq!(record.name, "Cámara Ñandú");
        assert_eq!(record.location, "Almacén");
        assert_eq!(record.location_code, "ALM");
        assert_eq!(record.serial_number, "ÄÖ-1");
        assert_eq!(record.code, "CÁMÑAN");
    }

    // -- Pipe-delimited ------------------------------------------------------

    #[test]
    fn pipe_fields_are_positional() {
        let record = parse("ACT002|Impresora Canon|Sala de Juntas|Canon|PIXMA G6020|CN987654");
        assert_eq!(record.code, "ACT002");
        assert_eq!(record.name, "Impresora Canon");
        assert_eq!(record.location, "Sala de Juntas");
        assert_eq!(record.brand, "Canon");
        assert_eq!(record.model, "PIXMA G6020");
        assert_eq!(record.serial_number, "CN987654");
        assert_eq!(record.location_code, "SJ");
    }

    #[test]
    fn pipe_missing_trailing_fields_take_sentinels() {
        let record = parse("ACT003| Teclado ");
        assert_eq!(record.code, "ACT003");
        assert_eq!(record.name, "Teclado");
        assert_eq!(record.location, UNKNOWN_LOCATION);
        assert_eq!(record.serial_number, UNKNOWN_SERIAL);
    }

    #[test]
    fn pipe_blank_fields_take_sentinels() {
        let record = parse("|||HP");
        assert_eq!(record.code, UNKNOWN_CODE);
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_eq!(record.brand, "HP");
    }

    // -- Plain text ----------------------------------------------------------

    #[test]
    fn dash_separates_code_and_name() {
        let record = parse("EQUIPO-008 - Router WiFi");
        assert_eq!(record.code, "EQUIPO-008");
        assert_eq!(record.name, "Router WiFi");
        assert_eq!(record.brand, UNKNOWN_BRAND);
    }

    #[test]
    fn opaque_code_is_code_and_name() {
        let record = parse("7501234567890");
        assert_eq!(record.code, "7501234567890");
        assert_eq!(record.name, "7501234567890");
        assert_eq!(record.location_code, "ARC");
    }

    #[test]
    fn opaque_code_keeps_surrounding_whitespace() {
        let record = parse("  ACT-9  ");
        assert_eq!(record.code, "  ACT-9  ");
        assert_eq!(record.name, "  ACT-9  ");
    }

    #[test]
    fn json_without_code_uses_payload_as_sent() {
        let raw = r#" {"nombre":"Mesa"} "#;
        assert_eq!(parse(raw).code, raw);
    }

    #[test]
    fn empty_scan_is_all_sentinels() {
        let record = parse("");
        assert_eq!(record.code, UNKNOWN_CODE);
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_fully_populated(&record);
    }

    // -- Properties ----------------------------------------------------------

    #[test]
    fn parsing_is_deterministic_and_complete() {
        let samples = [
            "",
            "   ",
            "{",
            "{}",
            "{\"nombre\": []}",
            "[1, 2]",
            "|",
            "a|b|c|d|e|f|g|h",
            " - ",
            "serie:",
            "Activo:",
            LABELED_CHAIR,
            "ACT001 - Laptop | Dell",
            "İSTANBUL ubicación: İzmir",
        ];
        let parser = ScanParser::default();
        for raw in samples {
            let first = parser.parse(raw);
            assert_eq!(first, parser.parse(raw), "non-deterministic for {raw:?}");
            assert_fully_populated(&first);
        }
    }

    #[test]
    fn custom_location_table_is_used() {
        let table = LocationTable::from_json(
            r#"{ "entries": [{ "code": "LAB", "variants": ["laboratorio"] }] }"#,
        )
        .unwrap();
        let parser = ScanParser::new(Arc::new(table));
        let record = parser.parse("X1|Microscopio|Laboratorio");
        assert_eq!(record.location_code, "LAB");
    }

    #[test]
    fn blank_raw_code_is_rejected() {
        assert_matches!(validate_raw_code("  \n"), Err(CoreError::Validation(_)));
        assert_eq!(validate_raw_code("A1").unwrap(), "A1");
    }
}
