// Live schema of a target SQLite database, read on every call
use crate::domain::error::SchemaKoError;
use crate::domain::model::{ColumnInfo, TableInfo};
use crate::domain::traits::SchemaIntrospection;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio_rusqlite::{params, Connection};

pub struct SqliteSchemaIntrospection {
    connections: HashMap<String, PathBuf>,
}

impl SqliteSchemaIntrospection {
    pub fn new(connections: HashMap<String, PathBuf>) -> Self {
        Self { connections }
    }

    async fn open(&self, connection_id: &str) -> Result<Connection, SchemaKoError> {
        let path = self
            .connections
            .get(connection_id)
            .ok_or_else(|| SchemaKoError::NotFound(format!("connection '{}'", connection_id)))?;
        if !path.exists() {
            return Err(SchemaKoError::NotFound(format!(
                "database file {} for connection '{}'",
                path.display(),
                connection_id
            )));
        }
        Ok(Connection::open(path.clone()).await?)
    }
}

#[async_trait]
impl SchemaIntrospection for SqliteSchemaIntrospection {
    async fn get_tables(&self, connection_id: &str) -> Result<Vec<TableInfo>, SchemaKoError> {
        let db = self.open(connection_id).await?;
        let names = db
            .call(|conn| -> rusqlite::Result<Vec<String>> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                     ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(names)
            })
            .await?;

        Ok(names.into_iter().map(|name| TableInfo { name }).collect())
    }

    async fn get_columns(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnInfo>, SchemaKoError> {
        let db = self.open(connection_id).await?;
        let table = table_name.to_string();
        let columns = db
            .call(move |conn| -> rusqlite::Result<Vec<ColumnInfo>> {
                let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?)")?;
                let columns = stmt
                    .query_map(params![table], |row| {
                        Ok(ColumnInfo {
                            name: row.get(0)?,
                            data_type: row.get(1)?,
                            comment: None,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(columns)
            })
            .await?;

        if columns.is_empty() {
            return Err(SchemaKoError::NotFound(format!(
                "table '{}' in connection '{}'",
                table_name, connection_id
            )));
        }

        Ok(columns)
    }
}
