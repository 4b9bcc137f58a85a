//! Domain logic for the asset scan registry.
//!
//! Everything in this crate is pure: no database, no HTTP. The payload
//! parser turns a decoded QR/barcode string into an [`scan_parser::AssetRecord`],
//! the duplicate resolver decides whether that record is already known, and
//! the export module renders registrations as CSV.

pub mod duplicates;
pub mod error;
pub mod export;
pub mod locations;
pub mod scan_parser;
pub mod types;
