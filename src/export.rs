use std::fs;
use std::path::Path;

use tracing::info;

use crate::db::mapper::encode_phones;
use crate::error::{ClientError, Result};
use crate::models::Client;

pub const HEADERS: [&str; 15] = [
    "ID",
    "First Name",
    "Middle Name",
    "Last Name",
    "Company",
    "Address",
    "Region",
    "City",
    "Nationality",
    "Date of Birth",
    "Gender",
    "Phone",
    "Email",
    "Created At",
    "Updated At",
];

/// Write `records` as CSV to `path`, replacing any previous export.
///
/// The parent directory is created if it does not exist. An empty slice
/// produces a header-only file.
pub fn export_all(records: &[Client], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ClientError::export(format!("cannot create {}", parent.display()), e)
        })?;
    }

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| ClientError::export(format!("cannot open {}", path.display()), e))?;
    let write_err =
        |e: csv::Error| ClientError::export(format!("cannot write {}", path.display()), e);

    wtr.write_record(HEADERS).map_err(write_err)?;
    for client in records {
        wtr.write_record(row(client)).map_err(write_err)?;
    }

    wtr.flush()
        .map_err(|e| ClientError::export(format!("cannot flush {}", path.display()), e))?;
    info!(count = records.len(), path = %path.display(), "clients exported");

    Ok(())
}

fn row(client: &Client) -> [String; 15] {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    let timestamp = |value: &Option<chrono::DateTime<chrono::Utc>>| {
        value.map(|t| t.to_rfc3339()).unwrap_or_default()
    };

    [
        client.id.to_string(),
        client.first_name.clone(),
        opt(&client.middle_name),
        client.last_name.clone(),
        client.company_name.clone(),
        client.address.clone(),
        client.region.clone(),
        client.city.clone(),
        opt(&client.nationality),
        opt(&client.date_of_birth),
        opt(&client.gender),
        encode_phones(&client.phone),
        opt(&client.email),
        timestamp(&client.created_at),
        timestamp(&client.updated_at),
    ]
}
