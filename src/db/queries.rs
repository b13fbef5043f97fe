//! SQL text for the clients table.
//!
//! Every function here is pure. Values are always bound as `?` parameters;
//! the only identifiers spliced into the text are the table name chosen by
//! the caller and the `&'static str` columns of [`SearchField`].

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Mutable columns in bind order for insert and update.
pub const MUTABLE_COLUMNS: [&str; 12] = [
    "firstName",
    "middleName",
    "lastName",
    "companyName",
    "address",
    "region",
    "city",
    "nationality",
    "dateOfBirth",
    "gender",
    "phone",
    "email",
];

/// Columns that may be used for a substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    FirstName,
    LastName,
    CompanyName,
    Region,
    City,
    DateOfBirth,
    Gender,
    Phone,
    Email,
}

impl SearchField {
    pub const ALL: [SearchField; 10] = [
        SearchField::Id,
        SearchField::FirstName,
        SearchField::LastName,
        SearchField::CompanyName,
        SearchField::Region,
        SearchField::City,
        SearchField::DateOfBirth,
        SearchField::Gender,
        SearchField::Phone,
        SearchField::Email,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::FirstName => "firstName",
            SearchField::LastName => "lastName",
            SearchField::CompanyName => "companyName",
            SearchField::Region => "region",
            SearchField::City => "city",
            SearchField::DateOfBirth => "dateOfBirth",
            SearchField::Gender => "gender",
            SearchField::Phone => "phone",
            SearchField::Email => "email",
        }
    }
}

impl FromStr for SearchField {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchField::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| ClientError::InvalidField(s.to_string()))
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

pub fn create_table(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            firstName   TEXT NOT NULL,
            middleName  TEXT,
            lastName    TEXT NOT NULL,
            companyName TEXT NOT NULL,
            address     TEXT NOT NULL,
            region      TEXT NOT NULL,
            city        TEXT NOT NULL,
            nationality TEXT,
            dateOfBirth TEXT,
            gender      TEXT,
            phone       TEXT NOT NULL,
            email       TEXT,
            created_at  TEXT,
            updated_at  TEXT
        )
        "#
    )
}

pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {table}")
}

/// The bound parameter is expected to carry its own `%` wildcards.
pub fn select_by_field(table: &str, column: &str) -> String {
    format!("SELECT * FROM {table} WHERE {column} LIKE ?")
}

pub fn select_by_id(table: &str) -> String {
    format!("SELECT * FROM {table} WHERE id = ?")
}

/// Binds [`MUTABLE_COLUMNS`] followed by `created_at` and `updated_at`.
pub fn insert(table: &str) -> String {
    let columns = MUTABLE_COLUMNS.join(", ");
    let placeholders = vec!["?"; MUTABLE_COLUMNS.len() + 2].join(", ");
    format!(
        "INSERT INTO {table} ({columns}, created_at, updated_at) \
         VALUES ({placeholders}) RETURNING id"
    )
}

/// Binds [`MUTABLE_COLUMNS`], then `updated_at`, then `id`.
pub fn update(table: &str) -> String {
    let assignments = MUTABLE_COLUMNS
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {table} SET {assignments}, updated_at = ? WHERE id = ? RETURNING *")
}

pub fn delete(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = ?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_statements() {
        assert_eq!(select_all("clients"), "SELECT * FROM clients");
        assert_eq!(
            select_by_field("clients", SearchField::City.column()),
            "SELECT * FROM clients WHERE city LIKE ?"
        );
        assert_eq!(select_by_id("clients"), "SELECT * FROM clients WHERE id = ?");
        assert_eq!(delete("clients"), "DELETE FROM clients WHERE id = ?");
    }

    #[test]
    fn insert_binds_every_mutable_column_and_timestamps() {
        let sql = insert("clients");
        assert!(sql.starts_with("INSERT INTO clients (firstName, middleName, lastName"));
        assert!(sql.contains("email, created_at, updated_at)"));
        assert_eq!(sql.matches('?').count(), MUTABLE_COLUMNS.len() + 2);
        assert!(sql.ends_with("RETURNING id"));
    }

    #[test]
    fn update_targets_id_and_refreshes_updated_at() {
        let sql = update("clients");
        assert!(sql.starts_with("UPDATE clients SET firstName = ?"));
        assert!(sql.contains("updated_at = ? WHERE id = ?"));
        assert!(!sql.contains("created_at"));
        assert_eq!(sql.matches('?').count(), MUTABLE_COLUMNS.len() + 2);
    }

    #[test]
    fn search_field_parses_only_allowed_columns() {
        for field in SearchField::ALL {
            assert_eq!(field.column().parse::<SearchField>().unwrap(), field);
        }
        assert!(matches!(
            "dropTable".parse::<SearchField>(),
            Err(ClientError::InvalidField(name)) if name == "dropTable"
        ));
        // address is stored but not searchable
        assert!("address".parse::<SearchField>().is_err());
        assert!("City".parse::<SearchField>().is_err());
    }
}
