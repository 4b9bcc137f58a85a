//! Request handlers.
//!
//! Handlers delegate parsing and duplicate detection to `activos_core`,
//! persistence to `activos_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod registrations;
pub mod scans;

/// The first value that is present and not blank, returned as sent.
///
/// Request bodies accept several spellings of the same field; callers list
/// them in priority order.
pub(crate) fn first_filled<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}
