use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::db::mapper::{ClientRow, encode_phones, encode_timestamp};
use crate::db::queries::{self, SearchField};
use crate::db::{CLIENTS_TABLE, Database};
use crate::error::Result;
use crate::models::{Client, ClientFields, DeletionResult};

/// Bind the mutable columns in `queries::MUTABLE_COLUMNS` order.
macro_rules! bind_fields {
    ($query:expr, $fields:expr) => {
        $query
            .bind($fields.first_name.clone())
            .bind($fields.middle_name.clone())
            .bind($fields.last_name.clone())
            .bind($fields.company_name.clone())
            .bind($fields.address.clone())
            .bind($fields.region.clone())
            .bind($fields.city.clone())
            .bind($fields.nationality.clone())
            .bind($fields.date_of_birth.clone())
            .bind($fields.gender.clone())
            .bind(encode_phones(&$fields.phone))
            .bind($fields.email.clone())
    };
}

/// CRUD and search over the clients table.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: Arc<Database>,
    table: &'static str,
}

impl ClientRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            table: CLIENTS_TABLE,
        }
    }

    /// Every client, in storage order.
    pub async fn list_all(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(&queries::select_all(self.table))
            .fetch_all(self.db.get_pool())
            .await?;
        debug!(count = rows.len(), "listed clients");

        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Substring search on an allow-listed column named by the caller.
    ///
    /// Fails with `InvalidField` before touching storage when `field` is not
    /// searchable.
    pub async fn search_by_field(&self, field: &str, value: &str) -> Result<Vec<Client>> {
        let field: SearchField = field.parse().inspect_err(|_| {
            warn!(field, "rejected search on a field outside the allow-list");
        })?;

        self.search(field, value).await
    }

    pub async fn search(&self, field: SearchField, value: &str) -> Result<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(&queries::select_by_field(
            self.table,
            field.column(),
        ))
        .bind(format!("%{value}%"))
        .fetch_all(self.db.get_pool())
        .await?;
        debug!(%field, value, count = rows.len(), "searched clients");

        Ok(rows.into_iter().map(Client::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(&queries::select_by_id(self.table))
            .bind(id)
            .fetch_optional(self.db.get_pool())
            .await?;

        Ok(row.map(Client::from))
    }

    /// Insert a new client. Returns `None` when the insert produced no row.
    pub async fn create(&self, mut fields: ClientFields) -> Result<Option<Client>> {
        fields.validate()?;

        let now = Utc::now();
        let id = bind_fields!(
            sqlx::query_scalar::<_, i64>(&queries::insert(self.table)),
            fields
        )
        .bind(encode_timestamp(now))
        .bind(encode_timestamp(now))
        .fetch_optional(self.db.get_pool())
        .await?;

        let Some(id) = id else {
            warn!("insert did not produce a client row");
            return Ok(None);
        };
        info!(id, "client created");

        Ok(Some(Client {
            id,
            first_name: fields.first_name,
            middle_name: fields.middle_name,
            last_name: fields.last_name,
            company_name: fields.company_name,
            address: fields.address,
            region: fields.region,
            city: fields.city,
            nationality: fields.nationality,
            date_of_birth: fields.date_of_birth,
            gender: fields.gender,
            phone: fields.phone,
            email: fields.email,
            created_at: Some(now),
            updated_at: Some(now),
        }))
    }

    /// Overwrite every mutable column of client `id`. Returns `None` when no
    /// such client exists.
    pub async fn update(&self, id: i64, mut fields: ClientFields) -> Result<Option<Client>> {
        fields.validate()?;

        let row = bind_fields!(
            sqlx::query_as::<_, ClientRow>(&queries::update(self.table)),
            fields
        )
        .bind(encode_timestamp(Utc::now()))
        .bind(id)
        .fetch_optional(self.db.get_pool())
        .await?;

        match row {
            Some(row) => {
                info!(id, "client updated");
                Ok(Some(Client::from(row)))
            }
            None => {
                warn!(id, "no client to update");
                Ok(None)
            }
        }
    }

    /// Hard delete. Succeeds whether or not the row existed.
    pub async fn delete(&self, id: i64) -> Result<DeletionResult> {
        let result = sqlx::query(&queries::delete(self.table))
            .bind(id)
            .execute(self.db.get_pool())
            .await?;
        info!(id, rows = result.rows_affected(), "client delete executed");

        Ok(DeletionResult {
            id,
            rows_affected: result.rows_affected(),
            message: format!("Client {id} Deleted Successfully"),
        })
    }
}
