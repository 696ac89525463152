/// All database primary keys and subject ids are PostgreSQL BIGINT.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Virtual-currency amounts are exact decimals (`NUMERIC(18,2)` in the store).
pub type Amount = rust_decimal::Decimal;
