use crate::types::DbId;

/// Domain errors raised by the scan registry.
///
/// Parsing never fails; these cover lookups of stored registrations and
/// input or configuration that cannot be accepted.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A registration (or other stored entity) does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A blank scan, a malformed location table, and similar rejected input.
    #[error("Validation failed: {0}")]
    Validation(String),
}
