//! Duplicate detection for scanned assets.
//!
//! Two scans describe the same physical asset when their descriptive fields
//! agree, regardless of which payload format each one used. Comparison is
//! exact text equality after trimming and ignoring case; serial numbers only
//! count when both sides actually have one.
//!
//! [`DuplicateResolver::find_existing`] is the registration-time check: a
//! linear pass over stored registrations. [`DuplicateIndex`] answers the same
//! question through a hash of the normalized fields, for bulk imports.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;

use crate::scan_parser::{AssetRecord, ScanParser, UNKNOWN_SERIAL};

/// Anything that carries the raw scan it was registered from.
pub trait RawScan {
    fn raw_code(&self) -> &str;
}

impl RawScan for String {
    fn raw_code(&self) -> &str {
        self
    }
}

impl RawScan for str {
    fn raw_code(&self) -> &str {
        self
    }
}

impl<T: RawScan + ?Sized> RawScan for &T {
    fn raw_code(&self) -> &str {
        (**self).raw_code()
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn same_text(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Whether a serial number is real enough to tell assets apart.
fn has_serial(serial: &str) -> bool {
    let serial = normalize(serial);
    !serial.is_empty() && serial != normalize(UNKNOWN_SERIAL)
}

fn serials_match(a: &AssetRecord, b: &AssetRecord) -> bool {
    if has_serial(&a.serial_number) && has_serial(&b.serial_number) {
        same_text(&a.serial_number, &b.serial_number)
    } else {
        true
    }
}

/// Whether two records describe the same asset.
pub fn assets_match(candidate: &AssetRecord, existing: &AssetRecord) -> bool {
    same_text(&candidate.name, &existing.name)
        && same_text(&candidate.location, &existing.location)
        && same_text(&candidate.brand, &existing.brand)
        && same_text(&candidate.model, &existing.model)
        && serials_match(candidate, existing)
}

// ---------------------------------------------------------------------------
// Linear resolver
// ---------------------------------------------------------------------------

/// Finds stored registrations that describe the same asset as a new scan.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateResolver<'p> {
    parser: &'p ScanParser,
}

impl<'p> DuplicateResolver<'p> {
    pub fn new(parser: &'p ScanParser) -> Self {
        Self { parser }
    }

    /// Return the first stored registration matching `candidate`.
    ///
    /// `stored` is walked in order. Unreadable items and items with a blank
    /// raw code are logged and skipped; they never end the search.
    pub fn find_existing<I, R, E>(&self, candidate: &AssetRecord, stored: I) -> Option<R>
    where
        I: IntoIterator<Item = Result<R, E>>,
        R: RawScan,
        E: Display,
    {
        stored
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| self.readable(position, item))
            .find(|(_, existing)| assets_match(candidate, existing))
            .map(|(registration, _)| registration)
    }

    /// [`find_existing`](Self::find_existing) over an in-memory slice.
    pub fn find_existing_in<'a, R: RawScan>(
        &self,
        candidate: &AssetRecord,
        stored: &'a [R],
    ) -> Option<&'a R> {
        self.find_existing(candidate, stored.iter().map(Ok::<_, Infallible>))
    }

    /// Parse every readable stored registration into an index.
    pub fn build_index<I, R, E>(&self, stored: I) -> DuplicateIndex<R>
    where
        I: IntoIterator<Item = Result<R, E>>,
        R: RawScan,
        E: Display,
    {
        let mut index = DuplicateIndex::new();
        for (position, item) in stored.into_iter().enumerate() {
            if let Some((registration, record)) = self.readable(position, item) {
                index.insert(&record, registration);
            }
        }
        index
    }

    fn readable<R, E>(&self, position: usize, item: Result<R, E>) -> Option<(R, AssetRecord)>
    where
        R: RawScan,
        E: Display,
    {
        let registration = match item {
            Ok(registration) => registration,
            Err(err) => {
                tracing::warn!(position, error = %err, "Skipping unreadable stored registration");
                return None;
            }
        };

        if registration.raw_code().trim().is_empty() {
            tracing::warn!(position, "Skipping stored registration with blank code");
            return None;
        }

        let record = self.parser.parse(registration.raw_code());
        Some((registration, record))
    }
}

// ---------------------------------------------------------------------------
// Normalized-key index
// ---------------------------------------------------------------------------

/// Lower-cased, trimmed name, location, brand and model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    name: String,
    location: String,
    brand: String,
    model: String,
}

impl MatchKey {
    pub fn from_record(record: &AssetRecord) -> Self {
        Self {
            name: normalize(&record.name),
            location: normalize(&record.location),
            brand: normalize(&record.brand),
            model: normalize(&record.model),
        }
    }
}

/// Hash index over asset records. Same matching rules as
/// [`assets_match`]; earlier inserts win.
#[derive(Debug)]
pub struct DuplicateIndex<T> {
    buckets: HashMap<MatchKey, Vec<(String, T)>>,
    len: usize,
}

impl<T> DuplicateIndex<T> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, record: &AssetRecord, value: T) {
        self.buckets
            .entry(MatchKey::from_record(record))
            .or_default()
            .push((record.serial_number.clone(), value));
        self.len += 1;
    }

    /// The first indexed value describing the same asset as `candidate`.
    pub fn find(&self, candidate: &AssetRecord) -> Option<&T> {
        let bucket = self.buckets.get(&MatchKey::from_record(candidate))?;
        let candidate_has_serial = has_serial(&candidate.serial_number);

        bucket
            .iter()
            .find(|(serial, _)| {
                !(candidate_has_serial && has_serial(serial))
                    || same_text(serial, &candidate.serial_number)
            })
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for DuplicateIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
