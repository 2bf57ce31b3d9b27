use dumpwatch_shared::models::{Incident, IncidentStatus};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const INCIDENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("incidents");

pub struct Storage {
    db: Database,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, String> {
        let db = Database::create(path)
            .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;

        // Ensure table exists
        let write_txn = db.begin_write().map_err(|e| e.to_string())?;
        {
            write_txn
                .open_table(INCIDENTS_TABLE)
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;

        Ok(Arc::new(Storage { db }))
    }

    pub fn save_incident(&self, incident: &Incident) -> Result<(), String> {
        let json = serde_json::to_vec(incident).map_err(|e| e.to_string())?;

        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        {
            let mut table = write_txn
                .open_table(INCIDENTS_TABLE)
                .map_err(|e| e.to_string())?;
            table
                .insert(incident.id.as_str(), json.as_slice())
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn get_incident(&self, id: &str) -> Result<Option<Incident>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn
            .open_table(INCIDENTS_TABLE)
            .map_err(|e| e.to_string())?;

        match table.get(id).map_err(|e| e.to_string())? {
            Some(value) => {
                let incident: Incident =
                    serde_json::from_slice(value.value()).map_err(|e| e.to_string())?;
                Ok(Some(incident))
            }
            None => Ok(None),
        }
    }

    /// All incidents, oldest report first.
    pub fn list_incidents(&self) -> Result<Vec<Incident>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn
            .open_table(INCIDENTS_TABLE)
            .map_err(|e| e.to_string())?;

        let mut incidents = Vec::new();
        for entry in table.iter().map_err(|e| e.to_string())? {
            let (_, value) = entry.map_err(|e| e.to_string())?;
            let incident: Incident =
                serde_json::from_slice(value.value()).map_err(|e| e.to_string())?;
            incidents.push(incident);
        }
        incidents.sort_by(|a, b| {
            a.reported_at
                .cmp(&b.reported_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(incidents)
    }

    pub fn count_incidents(&self) -> Result<u64, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn
            .open_table(INCIDENTS_TABLE)
            .map_err(|e| e.to_string())?;
        table.len().map_err(|e| e.to_string())
    }

    /// Set the status of an incident. Returns `None` if it does not exist.
    pub fn update_status(
        &self,
        id: &str,
        status: IncidentStatus,
        now: &str,
    ) -> Result<Option<Incident>, String> {
        let Some(mut incident) = self.get_incident(id)? else {
            return Ok(None);
        };
        if incident.status != status {
            incident.status = status;
            incident.resolved_at = match status {
                IncidentStatus::Resolved => Some(now.to_string()),
                IncidentStatus::Reported => None,
            };
            self.save_incident(&incident)?;
        }
        Ok(Some(incident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str, reported_at: &str) -> Incident {
        Incident {
            id: id.to_string(),
            coordinates: "(100, 200)".to_string(),
            status: IncidentStatus::Reported,
            description: "Mattress by the canal".to_string(),
            reported_at: Some(reported_at.to_string()),
            resolved_at: None,
        }
    }

    fn temp_storage() -> (tempfile::TempDir, Arc<Storage>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("incidents.redb")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_save_and_get() {
        let (_dir, storage) = temp_storage();
        let inc = incident("a", "2024-01-01T00:00:00+00:00");
        storage.save_incident(&inc).unwrap();
        assert_eq!(storage.get_incident("a").unwrap(), Some(inc));
        assert_eq!(storage.get_incident("missing").unwrap(), None);
    }

    #[test]
    fn test_list_is_ordered_by_report_time() {
        let (_dir, storage) = temp_storage();
        storage
            .save_incident(&incident("zzz", "2024-01-01T00:00:00+00:00"))
            .unwrap();
        storage
            .save_incident(&incident("aaa", "2024-02-01T00:00:00+00:00"))
            .unwrap();
        let ids: Vec<String> = storage
            .list_incidents()
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["zzz", "aaa"]);
        assert_eq!(storage.count_incidents().unwrap(), 2);
    }

    #[test]
    fn test_update_status_sets_and_clears_resolved_at() {
        let (_dir, storage) = temp_storage();
        storage
            .save_incident(&incident("a", "2024-01-01T00:00:00+00:00"))
            .unwrap();

        let resolved = storage
            .update_status("a", IncidentStatus::Resolved, "2024-01-02T00:00:00+00:00")
            .unwrap()
            .unwrap();
        assert_eq!(resolved.status, IncidentStatus::Resolved);
        assert_eq!(resolved.resolved_at.as_deref(), Some("2024-01-02T00:00:00+00:00"));

        let reopened = storage
            .update_status("a", IncidentStatus::Reported, "2024-01-03T00:00:00+00:00")
            .unwrap()
            .unwrap();
        assert!(reopened.resolved_at.is_none());
        assert_eq!(storage.get_incident("a").unwrap(), Some(reopened));
    }

    #[test]
    fn test_update_status_missing() {
        let (_dir, storage) = temp_storage();
        let r = storage
            .update_status("nope", IncidentStatus::Resolved, "2024-01-01T00:00:00+00:00")
            .unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.redb");
        {
            let storage = Storage::open(&path).unwrap();
            storage
                .save_incident(&incident("a", "2024-01-01T00:00:00+00:00"))
                .unwrap();
        }
        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.count_incidents().unwrap(), 1);
    }
}
