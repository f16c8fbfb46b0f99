//! Defines the core data model and database queries for sales.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, database_id::SaleId, money::Cents};

// ============================================================================
// MODEL
// ============================================================================

/// One sales transaction: a row in the ledger.
///
/// The amount is held in cents and the date as a calendar date; both are
/// formatted as ledger text only at the presentation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    /// The user-chosen ID of the sale.
    pub id: SaleId,
    /// The code of the store the sale was made at.
    pub store_code: String,
    /// The value of the sale in cents.
    pub amount: Cents,
    /// When the sale happened.
    pub date: Date,
}

/// The number of table rows changed by a write.
pub type RowsAffected = usize;

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the sales table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sales_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sales (
                id INTEGER PRIMARY KEY,
                store_code TEXT NOT NULL,
                amount INTEGER NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Index used by the date range queries.
    connection.execute("CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);", ())?;

    Ok(())
}

/// Create a new sale in the database.
///
/// The ID is supplied by the caller; the primary key constraint rejects
/// duplicates in the same statement as the insert, so there is no window
/// between checking for an existing ID and writing the row.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateSaleId] if a sale with the given ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_sale(sale: Sale, connection: &Connection) -> Result<Sale, Error> {
    connection
        .prepare(
            "INSERT INTO sales (id, store_code, amount, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, store_code, amount, date",
        )?
        .query_row(
            (sale.id, &sale.store_code, sale.amount, sale.date),
            map_sale_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                },
                _,
            ) => Error::DuplicateSaleId(sale.id),
            error => error.into(),
        })
}

/// Retrieve a sale from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a sale in the ledger,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_sale(id: SaleId, connection: &Connection) -> Result<Sale, Error> {
    let sale = connection
        .prepare("SELECT id, store_code, amount, date FROM sales WHERE id = :id")?
        .query_one(&[(":id", &id)], map_sale_row)?;

    Ok(sale)
}

/// Retrieve every sale in the ledger, ordered by ID ascending.
///
/// No paging happens at this layer; the callers slice the result afterward.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_sales(connection: &Connection) -> Result<Vec<Sale>, Error> {
    connection
        .prepare("SELECT id, store_code, amount, date FROM sales ORDER BY id ASC")?
        .query_map([], map_sale_row)?
        .map(|sale_result| sale_result.map_err(Error::SqlError))
        .collect()
}

/// Retrieve the sales whose transaction date falls within `[start, end]`
/// inclusive, ordered by date ascending.
///
/// Assumes the caller supplies `start <= end`; the range is not re-validated.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_sales_in_range(
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Sale>, Error> {
    // Sort by date, and then ID to keep the order stable between same-day sales.
    connection
        .prepare(
            "SELECT id, store_code, amount, date FROM sales
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC, id ASC",
        )?
        .query_map([start.to_string(), end.to_string()], map_sale_row)?
        .map(|sale_result| sale_result.map_err(Error::SqlError))
        .collect()
}

/// Overwrite every non-ID field of the sale matching `sale.id`.
///
/// Returns the number of rows affected: 0 when the ID is not in the ledger,
/// which callers treat as a failure.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn update_sale(sale: &Sale, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE sales SET store_code = ?1, amount = ?2, date = ?3 WHERE id = ?4",
            (&sale.store_code, sale.amount, sale.date, sale.id),
        )
        .map_err(|error| error.into())
}

/// Delete the sale matching `id`.
///
/// Returns the number of rows affected: 0 when the ID is not in the ledger.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_sale(id: SaleId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM sales WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Get the total number of sales in the ledger.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_sales(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM sales;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to a [Sale].
fn map_sale_row(row: &Row) -> Result<Sale, rusqlite::Error> {
    Ok(Sale {
        id: row.get(0)?,
        store_code: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
