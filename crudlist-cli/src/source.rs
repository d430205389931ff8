//! JSON file collections

use std::path::PathBuf;

use async_trait::async_trait;
use crudlist_lib::crud::RemoveFn;
use crudlist_lib::error::DeleteError;
use crudlist_lib::error::LoadError;
use crudlist_lib::loader::Fetcher;
use crudlist_lib::loader::LoaderContext;
use crudlist_lib::model::Record;
use crudlist_lib::model::Row;
use crudlist_lib::model::Value;
use tokio::sync::Mutex;

/// A collection stored as a JSON array of objects.
///
/// Params narrow the fetched records to those whose fields equal the param
/// values. Removals rewrite the file, one at a time.
pub struct JsonFile {
    path: PathBuf,
    id_field: String,
    lock: Mutex<()>,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>, id_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id_field: id_field.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Vec<Record>, LoadError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, records: &[Record]) -> Result<(), LoadError> {
        let json = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    fn id_of(&self, record: &Record) -> Option<String> {
        match record.get(&self.id_field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[async_trait]
impl Fetcher for JsonFile {
    async fn fetch(&self, ctx: &LoaderContext) -> Result<Vec<Row>, LoadError> {
        log::debug!("reading {}", self.path.display());
        let records = self.read().await?;
        Ok(records
            .into_iter()
            .filter(|record| {
                ctx.params
                    .iter()
                    .all(|(field, value)| record.lookup(field) == Some(value))
            })
            .map(Row::new)
            .collect())
    }
}

#[async_trait]
impl RemoveFn for JsonFile {
    async fn remove(&self, id: &str) -> Result<(), DeleteError> {
        let _guard = self.lock.lock().await;
        let fail = |err: LoadError| DeleteError::new(id, err.to_string());

        let mut records = self.read().await.map_err(fail)?;
        let before = records.len();
        records.retain(|record| self.id_of(record).as_deref() != Some(id));
        if records.len() == before {
            return Err(DeleteError::new(id, "no such record"));
        }
        self.write(&records).await.map_err(fail)?;
        log::info!("deleted {id} from {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crudlist_lib::loader::ContextLoader;
    use crudlist_lib::loader::DataLoader;
    use crudlist_lib::loader::LoaderOptions;
    use crudlist_lib::loader::Params;

    use super::*;

    fn collection() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[
                {"id": 1, "name": "web-01", "status": "active"},
                {"id": 2, "name": "web-02", "status": "shutoff"},
                {"id": 3, "name": "db-01", "status": "active"}
            ]"#,
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_fetch_with_params() {
        let file = collection();
        let source = Arc::new(JsonFile::new(file.path(), "id"));
        let loader = DataLoader::new(
            ContextLoader::new("servers", source),
            LoaderOptions::new().with_params(Params::new().with("status", "active")),
        );
        loader.activate().await;
        assert_eq!(loader.data().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_rewrites_file() {
        let file = collection();
        let source = JsonFile::new(file.path(), "id");

        source.remove("2").await.unwrap();
        let left = source.read().await.unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|record| record.get_str("name") != Some("web-02")));

        let err = source.remove("2").await.unwrap_err();
        assert_eq!(err.id, "2");
    }

    #[tokio::test]
    async fn test_concurrent_removes() {
        let file = collection();
        let source = JsonFile::new(file.path(), "id");

        let (a, b) = tokio::join!(source.remove("1"), source.remove("3"));
        a.unwrap();
        b.unwrap();
        assert_eq!(source.read().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = JsonFile::new("/nonexistent/records.json", "id");
        assert!(matches!(source.read().await, Err(LoadError::Io(_))));
    }
}
