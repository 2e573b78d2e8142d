//! Core types used throughout the system

/// Money amount in minor currency units (e.g. cents).
///
/// # Constraints:
/// - **Integer only**: balances never go through floating point
/// - **Signed**: deltas are expressed as negative/positive values of the same type
/// - **Checked**: every balance mutation uses checked arithmetic, overflow is a
///   constraint violation, never a wrap
pub type MinorUnits = i64;
