//! In-memory users and calculation history.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub calc_type: String,
    pub inputs: Map<String, Value>,
    pub result: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct StoredRecord {
    owner: Option<String>,
    record: HistoryRecord,
}

/// Why an owned-record lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    UnknownUser,
    NotFound,
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    users: HashSet<String>,
    records: Vec<StoredRecord>,
}

impl Store {
    /// Records a calculation. A named owner is registered on first use;
    /// anonymous records are kept but never listed.
    pub fn save(
        &mut self,
        owner: Option<String>,
        calc_type: &str,
        inputs: Map<String, Value>,
        result: Map<String, Value>,
    ) -> i64 {
        if let Some(name) = &owner {
            self.users.insert(name.clone());
        }
        self.last_id += 1;
        let record = HistoryRecord {
            id: self.last_id,
            calc_type: calc_type.to_string(),
            inputs,
            result,
            created_at: Utc::now(),
        };
        self.records.push(StoredRecord { owner, record });
        self.last_id
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.users.contains(username)
    }

    /// Newest first.
    pub fn list(&self, username: &str, limit: usize, offset: usize) -> Vec<HistoryRecord> {
        self.records
            .iter()
            .rev()
            .filter(|stored| stored.owner.as_deref() == Some(username))
            .skip(offset)
            .take(limit)
            .map(|stored| stored.record.clone())
            .collect()
    }

    pub fn get(&self, id: i64, username: &str) -> Result<&HistoryRecord, Lookup> {
        self.position(id, username).map(|index| &self.records[index].record)
    }

    pub fn update(
        &mut self,
        id: i64,
        username: &str,
        inputs: Option<Map<String, Value>>,
        result: Option<Map<String, Value>>,
    ) -> Result<HistoryRecord, Lookup> {
        let index = self.position(id, username)?;
        let record = &mut self.records[index].record;
        if let Some(inputs) = inputs {
            record.inputs = inputs;
        }
        if let Some(result) = result {
            record.result = result;
        }
        Ok(record.clone())
    }

    pub fn delete(&mut self, id: i64, username: &str) -> Result<(), Lookup> {
        let index = self.position(id, username)?;
        self.records.remove(index);
        Ok(())
    }

    fn position(&self, id: i64, username: &str) -> Result<usize, Lookup> {
        if !self.has_user(username) {
            return Err(Lookup::UnknownUser);
        }
        self.records
            .iter()
            .position(|stored| stored.record.id == id && stored.owner.as_deref() == Some(username))
            .ok_or(Lookup::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn list_is_newest_first_and_paged() {
        let mut store = Store::default();
        for n in 0..5 {
            store.save(Some("alice".into()), "bmi", fields(json!({"n": n})), Map::new());
        }
        store.save(Some("bob".into()), "bmr", Map::new(), Map::new());

        let page = store.list("alice", 2, 1);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].inputs["n"], 3);
        assert_eq!(page[1].inputs["n"], 2);
        assert!(store.list("carol", 100, 0).is_empty());
    }

    #[test]
    fn anonymous_records_are_not_owned_by_anyone() {
        let mut store = Store::default();
        let id = store.save(None, "bmi", Map::new(), Map::new());
        store.save(Some("alice".into()), "bmi", Map::new(), Map::new());
        assert_eq!(store.get(id, "alice").unwrap_err(), Lookup::NotFound);
    }

    #[test]
    fn update_replaces_only_supplied_parts() {
        let mut store = Store::default();
        let id = store.save(
            Some("alice".into()),
            "bmi",
            fields(json!({"age_years": 30})),
            fields(json!({"bmi_value": 22.86})),
        );
        let updated = store
            .update(id, "alice", None, Some(fields(json!({"bmi_value": 23.0}))))
            .unwrap();
        assert_eq!(updated.inputs["age_years"], 30);
        assert_eq!(updated.result["bmi_value"], 23.0);
    }

    #[test]
    fn delete_checks_owner() {
        let mut store = Store::default();
        let id = store.save(Some("alice".into()), "bmi", Map::new(), Map::new());
        store.save(Some("bob".into()), "bmi", Map::new(), Map::new());
        assert_eq!(store.delete(id, "bob").unwrap_err(), Lookup::NotFound);
        assert_eq!(store.delete(id, "mallory").unwrap_err(), Lookup::UnknownUser);
        assert!(store.delete(id, "alice").is_ok());
        assert_eq!(store.get(id, "alice").unwrap_err(), Lookup::NotFound);
    }
}
