//! Database ID type definition.

/// Alias for the integer type used as the sales table's primary key.
///
/// Unlike an auto-increment row ID, sale IDs are chosen by the user when an
/// entry is created.
pub type SaleId = i64;
