//! Create/read/update/delete plumbing around a list

mod controller;

pub use controller::*;

use async_trait::async_trait;

use crate::error::DeleteError;
use crate::model::Row;

/// Removes one row from its source, by unique identifier.
#[async_trait]
pub trait RemoveFn: Send + Sync {
    async fn remove(&self, id: &str) -> Result<(), DeleteError>;
}

/// Confirmation text for deleting rows, listing their names.
pub fn confirm_text(rows: &[Row]) -> String {
    let names: Vec<String> = rows
        .iter()
        .map(|row| row.lookup("name").map(ToString::to_string).unwrap_or_default())
        .collect();
    format!("This will permanently delete the following: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_confirm_text() {
        let rows = vec![
            Row::new(Record::new().set("name", "web-01")),
            Row::new(Record::new().set("name", "web-02")),
        ];
        assert_eq!(
            confirm_text(&rows),
            "This will permanently delete the following: web-01, web-02"
        );
    }
}
