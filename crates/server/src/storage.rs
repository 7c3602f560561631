//! # Prediction History Storage
//!
//! Persists prediction results in a local SQLite database (via Turso) and
//! serves the history listing and deletion routes. The schema is created
//! idempotently at startup.

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use turso::{Database, Value as TursoValue};

const CREATE_PREDICTIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        youtube_url TEXT NOT NULL,
        video_title TEXT NOT NULL,
        final_label TEXT NOT NULL,
        probability_high REAL NOT NULL,
        probability_low REAL NOT NULL,
        prediction_date TEXT NOT NULL
    );
";

/// One stored prediction, as returned by the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub youtube_url: String,
    pub video_title: String,
    pub final_label: String,
    pub probability_high: f64,
    pub probability_low: f64,
    pub prediction_date: String,
}

/// A store for prediction history over a shared Turso database.
#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Database>,
}

impl HistoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Ensures the predictions table exists. Safe to call on every startup.
    pub async fn initialize_schema(&self) -> Result<()> {
        let conn = self.db.connect()?;
        conn.execute(CREATE_PREDICTIONS_TABLE, ()).await?;
        Ok(())
    }

    /// Records one prediction. The timestamp is taken at insert time.
    pub async fn insert(
        &self,
        youtube_url: &str,
        video_title: &str,
        final_label: &str,
        probability_high: f64,
        probability_low: f64,
    ) -> Result<()> {
        let conn = self.db.connect()?;
        let prediction_date = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let params: Vec<TursoValue> = vec![
            youtube_url.to_string().into(),
            video_title.to_string().into(),
            final_label.to_string().into(),
            probability_high.into(),
            probability_low.into(),
            prediction_date.into(),
        ];
        conn.execute(
            "INSERT INTO predictions
                (youtube_url, video_title, final_label, probability_high, probability_low, prediction_date)
             VALUES (?, ?, ?, ?, ?, ?)",
            params,
        )
        .await?;
        debug!(video_title, final_label, "Prediction saved to history");
        Ok(())
    }

    /// Lists all stored predictions, newest first unless `ascending`.
    pub async fn list(&self, ascending: bool) -> Result<Vec<HistoryEntry>> {
        let conn = self.db.connect()?;
        let order = if ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "SELECT id, youtube_url, video_title, final_label,
                    probability_high, probability_low, prediction_date
             FROM predictions
             ORDER BY prediction_date {order}, id {order}"
        );

        let mut rows = conn.query(&sql, ()).await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(HistoryEntry {
                id: match row.get_value(0)? {
                    TursoValue::Integer(i) => i,
                    other => return Err(anyhow!("unexpected id column value: {other:?}")),
                },
                youtube_url: text_or_empty(row.get_value(1)?),
                video_title: text_or_empty(row.get_value(2)?),
                final_label: text_or_empty(row.get_value(3)?),
                probability_high: real_or_zero(row.get_value(4)?),
                probability_low: real_or_zero(row.get_value(5)?),
                prediction_date: text_or_empty(row.get_value(6)?),
            });
        }
        Ok(entries)
    }

    /// Deletes one prediction; returns false when the id does not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        let params: Vec<TursoValue> = vec![id.into()];
        let affected = conn
            .execute("DELETE FROM predictions WHERE id = ?", params)
            .await?;
        Ok(affected > 0)
    }

    /// Deletes the entire history; returns the number of removed records.
    pub async fn clear(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        let affected = conn.execute("DELETE FROM predictions", ()).await?;
        Ok(affected)
    }
}

fn text_or_empty(value: TursoValue) -> String {
    match value {
        TursoValue::Text(s) => s,
        _ => String::new(),
    }
}

fn real_or_zero(value: TursoValue) -> f64 {
    match value {
        TursoValue::Real(f) => f,
        TursoValue::Integer(i) => i as f64,
        _ => 0.0,
    }
}
