//! Row to entity mapping for the clients table.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::models::{Client, PHONE_DELIMITER};

/// Raw shape of a `clients` row. Every column is nullable and timestamps are
/// kept as text here so that rows written by other tools still load.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
    #[sqlx(rename = "firstName")]
    pub first_name: Option<String>,
    #[sqlx(rename = "middleName")]
    pub middle_name: Option<String>,
    #[sqlx(rename = "lastName")]
    pub last_name: Option<String>,
    #[sqlx(rename = "companyName")]
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub nationality: Option<String>,
    #[sqlx(rename = "dateOfBirth")]
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            first_name: row.first_name.unwrap_or_default(),
            middle_name: row.middle_name,
            last_name: row.last_name.unwrap_or_default(),
            company_name: row.company_name.unwrap_or_default(),
            address: row.address.unwrap_or_default(),
            region: row.region.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            nationality: row.nationality,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            phone: row.phone.as_deref().map(decode_phones).unwrap_or_default(),
            email: row.email,
            created_at: row.created_at.as_deref().and_then(decode_timestamp),
            updated_at: row.updated_at.as_deref().and_then(decode_timestamp),
        }
    }
}

pub fn encode_phones(phones: &[String]) -> String {
    phones.join(PHONE_DELIMITER)
}

pub fn decode_phones(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(PHONE_DELIMITER).map(str::to_string).collect()
}

pub fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.fff]` (taken as UTC).
/// Anything else maps to `None`.
pub fn decode_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_row(id: i64) -> ClientRow {
        ClientRow {
            id,
            first_name: None,
            middle_name: None,
            last_name: None,
            company_name: None,
            address: None,
            region: None,
            city: None,
            nationality: None,
            date_of_birth: None,
            gender: None,
            phone: None,
            email: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn phones_keep_their_order() {
        let phones = vec!["111".to_string(), "222".to_string(), "333".to_string()];
        let encoded = encode_phones(&phones);
        assert_eq!(encoded, "111,222,333");
        assert_eq!(decode_phones(&encoded), phones);
    }

    #[test]
    fn empty_phone_text_is_an_empty_list() {
        assert!(decode_phones("").is_empty());
        assert_eq!(encode_phones(&[]), "");
    }

    #[test]
    fn timestamps_round_trip_through_text() {
        let now = Utc::now();
        assert_eq!(decode_timestamp(&encode_timestamp(now)), Some(now));
    }

    #[test]
    fn sqlite_style_timestamps_are_read_as_utc() {
        let ts = decode_timestamp("2024-01-02 03:04:05").unwrap();
        assert_eq!(encode_timestamp(ts), "2024-01-02T03:04:05Z");
        assert!(decode_timestamp("2024-01-02 03:04:05.250").is_some());
    }

    #[test]
    fn unparseable_timestamp_becomes_absent() {
        let mut row = bare_row(9);
        row.first_name = Some("Ola".to_string());
        row.created_at = Some("not-a-date".to_string());
        row.updated_at = Some("2024-01-02 03:04:05".to_string());

        let client = Client::from(row);
        assert_eq!(client.first_name, "Ola");
        assert_eq!(client.created_at, None);
        assert!(client.updated_at.is_some());
    }

    #[test]
    fn null_columns_map_to_defaults() {
        let client = Client::from(bare_row(7));
        assert_eq!(client.id, 7);
        assert_eq!(client.first_name, "");
        assert_eq!(client.middle_name, None);
        assert!(client.phone.is_empty());
        assert_eq!(client.created_at, None);
    }

    #[test]
    fn populated_row_is_copied_field_by_field() {
        let mut row = bare_row(3);
        row.first_name = Some("Grace".to_string());
        row.last_name = Some("Hopper".to_string());
        row.city = Some("Arlington".to_string());
        row.gender = Some("F".to_string());
        row.phone = Some("555,556".to_string());

        let client = Client::from(row);
        assert_eq!(client.first_name, "Grace");
        assert_eq!(client.last_name, "Hopper");
        assert_eq!(client.city, "Arlington");
        assert_eq!(client.gender.as_deref(), Some("F"));
        assert_eq!(client.phone, vec!["555".to_string(), "556".to_string()]);
    }
}
