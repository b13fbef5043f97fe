//! Frequency tables over a snapshot of clients.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::Client;

/// Bucket for clients whose attribute is missing or empty.
pub const UNSPECIFIED: &str = "";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analytics {
    pub total_count: usize,
    pub by_gender: BTreeMap<String, usize>,
    pub by_city: BTreeMap<String, usize>,
    pub by_region: BTreeMap<String, usize>,
}

pub fn aggregate(records: &[Client]) -> Analytics {
    let mut analytics = Analytics {
        total_count: records.len(),
        ..Default::default()
    };

    for client in records {
        bump(&mut analytics.by_gender, client.gender.as_deref());
        bump(&mut analytics.by_city, Some(client.city.as_str()));
        bump(&mut analytics.by_region, Some(client.region.as_str()));
    }

    analytics
}

fn bump(table: &mut BTreeMap<String, usize>, key: Option<&str>) {
    let key = key.filter(|k| !k.is_empty()).unwrap_or(UNSPECIFIED);
    *table.entry(key.to_string()).or_insert(0) += 1;
}

impl fmt::Display for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total clients: {}", self.total_count)?;
        for (title, table) in [
            ("Gender", &self.by_gender),
            ("City", &self.by_city),
            ("Region", &self.by_region),
        ] {
            writeln!(f, "\n{title}:")?;
            for (key, count) in table {
                let label = if key == UNSPECIFIED { "(unspecified)" } else { key.as_str() };
                writeln!(f, "  {label:<24} {count}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(gender: Option<&str>, city: &str, region: &str) -> Client {
        Client {
            id: 0,
            first_name: "A".to_string(),
            middle_name: None,
            last_name: "B".to_string(),
            company_name: "C".to_string(),
            address: "D".to_string(),
            region: region.to_string(),
            city: city.to_string(),
            nationality: None,
            date_of_birth: None,
            gender: gender.map(str::to_string),
            phone: vec!["1".to_string()],
            email: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn counts_genders_with_missing_bucket() {
        let records = vec![
            client(Some("M"), "Oslo", "Viken"),
            client(Some("F"), "Oslo", "Viken"),
            client(Some("M"), "Bergen", "Vestland"),
            client(None, "Bergen", "Vestland"),
        ];

        let analytics = aggregate(&records);
        assert_eq!(analytics.total_count, 4);
        assert_eq!(analytics.by_gender.get("M"), Some(&2));
        assert_eq!(analytics.by_gender.get("F"), Some(&1));
        assert_eq!(analytics.by_gender.get(UNSPECIFIED), Some(&1));
        assert_eq!(analytics.by_gender.len(), 3);
    }

    #[test]
    fn region_table_is_keyed_by_region() {
        let records = vec![
            client(Some("M"), "Oslo", "Viken"),
            client(Some("F"), "Drammen", "Viken"),
            client(Some("F"), "Bergen", ""),
        ];

        let analytics = aggregate(&records);
        assert_eq!(analytics.by_region.get("Viken"), Some(&2));
        assert_eq!(analytics.by_region.get(UNSPECIFIED), Some(&1));
        assert_eq!(analytics.by_city.len(), 3);
    }

    #[test]
    fn empty_snapshot_gives_zero_counts() {
        let analytics = aggregate(&[]);
        assert_eq!(analytics, Analytics::default());
    }

    #[test]
    fn order_of_records_does_not_matter() {
        let mut records = vec![
            client(Some("M"), "Oslo", "Viken"),
            client(Some("F"), "Bergen", "Vestland"),
            client(None, "Oslo", "Viken"),
        ];
        let forward = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), forward);
    }

    #[test]
    fn display_labels_missing_bucket() {
        let text = aggregate(&[client(None, "Oslo", "Viken")]).to_string();
        assert!(text.starts_with("Total clients: 1"));
        assert!(text.contains("(unspecified)"));
        assert!(text.contains("Oslo"));
    }
}
