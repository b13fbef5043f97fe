use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ClientError, Result};

/// Separator used when the phone list is stored as a single column.
pub const PHONE_DELIMITER: &str = ",";

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub company_name: String,
    pub address: String,
    pub region: String,
    pub city: String,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Vec<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Mutable attributes of a client, as supplied to create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFields {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub company_name: String,
    pub address: String,
    pub region: String,
    pub city: String,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Vec<String>,
    pub email: Option<String>,
}

impl ClientFields {
    /// Check the payload before it is written.
    ///
    /// Blank phone entries are dropped first, so `["", "111"]` is accepted
    /// and stored as `["111"]`.
    pub fn validate(&mut self) -> Result<()> {
        self.phone.retain(|p| !p.trim().is_empty());

        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("companyName", &self.company_name),
            ("address", &self.address),
            ("region", &self.region),
            ("city", &self.city),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        if self.phone.is_empty() {
            return Err(ClientError::Validation(
                "at least one phone number is required".to_string(),
            ));
        }
        if let Some(bad) = self.phone.iter().find(|p| p.contains(PHONE_DELIMITER)) {
            return Err(ClientError::Validation(format!(
                "phone number {bad:?} must not contain '{PHONE_DELIMITER}'"
            )));
        }

        if let Some(dob) = self.date_of_birth.as_deref().filter(|d| !d.is_empty()) {
            NaiveDate::parse_from_str(dob, "%Y-%m-%d").map_err(|_| {
                ClientError::Validation(format!("dateOfBirth {dob:?} is not a YYYY-MM-DD date"))
            })?;
        }

        Ok(())
    }
}

/// Outcome of a delete. A missing id is still reported as deleted,
/// `rows_affected` tells the two cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionResult {
    pub id: i64,
    pub rows_affected: u64,
    pub message: String,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = match self.middle_name.as_deref().filter(|m| !m.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        };
        write!(
            f,
            "#{} {} | {} | {}, {}, {} | {}",
            self.id,
            full_name,
            self.company_name,
            self.address,
            self.city,
            self.region,
            self.phone.join(", ")
        )?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            write!(f, " | {email}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> ClientFields {
        ClientFields {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            company_name: "Analytical".to_string(),
            address: "1 Engine Way".to_string(),
            region: "Greater London".to_string(),
            city: "London".to_string(),
            phone: vec!["111".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn accepts_complete_payload() {
        assert!(valid_fields().validate().is_ok());
    }

    #[test]
    fn reports_every_missing_required_field() {
        let mut fields = valid_fields();
        fields.first_name.clear();
        fields.city = "   ".to_string();
        match fields.validate() {
            Err(ClientError::Validation(msg)) => {
                assert!(msg.contains("firstName"));
                assert!(msg.contains("city"));
                assert!(!msg.contains("lastName"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn requires_a_phone_after_dropping_blanks() {
        let mut fields = valid_fields();
        fields.phone = vec![String::new(), " ".to_string()];
        assert!(matches!(fields.validate(), Err(ClientError::Validation(_))));

        let mut fields = valid_fields();
        fields.phone = vec![String::new(), "222".to_string()];
        fields.validate().unwrap();
        assert_eq!(fields.phone, vec!["222".to_string()]);
    }

    #[test]
    fn rejects_delimiter_inside_phone() {
        let mut fields = valid_fields();
        fields.phone = vec!["111,222".to_string()];
        assert!(matches!(fields.validate(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn date_of_birth_must_be_iso_date() {
        let mut fields = valid_fields();
        fields.date_of_birth = Some("1815-12-10".to_string());
        assert!(fields.validate().is_ok());

        fields.date_of_birth = Some("10/12/1815".to_string());
        assert!(matches!(fields.validate(), Err(ClientError::Validation(_))));
    }
}
