use chrono::Utc;

use super::Database;
use crate::theme::ThemeMode;
use crate::Result;

/// Persistent storage key for the theme preference
pub const THEME_KEY: &str = "APP_THEME";

/// Repository for persisted user preferences
pub struct PreferencesRepository<'a> {
    db: &'a Database,
}

impl<'a> PreferencesRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE
            SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Read the persisted theme, if any.
    /// An unparseable stored value reads as unset rather than failing.
    pub async fn theme(&self) -> Result<Option<ThemeMode>> {
        let value = self.get(THEME_KEY).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    pub async fn set_theme(&self, mode: ThemeMode) -> Result<()> {
        self.set(THEME_KEY, mode.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = PreferencesRepository::new(&db);

        assert!(repo.get("missing").await.unwrap().is_none());

        repo.set("greeting", "hello").await.unwrap();
        assert_eq!(repo.get("greeting").await.unwrap().unwrap(), "hello");

        repo.set("greeting", "goodbye").await.unwrap();
        assert_eq!(repo.get("greeting").await.unwrap().unwrap(), "goodbye");
    }

    #[tokio::test]
    async fn test_theme_roundtrip() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = PreferencesRepository::new(&db);

        assert!(repo.theme().await.unwrap().is_none());

        repo.set_theme(ThemeMode::Light).await.unwrap();
        assert_eq!(repo.theme().await.unwrap(), Some(ThemeMode::Light));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_persisted_value() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = PreferencesRepository::new(&db);

        repo.set_theme(ThemeMode::Dark).await.unwrap();

        let original = repo.theme().await.unwrap().unwrap();
        repo.set_theme(original.toggle()).await.unwrap();
        repo.set_theme(repo.theme().await.unwrap().unwrap().toggle())
            .await
            .unwrap();

        assert_eq!(repo.theme().await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_garbage_theme_value_reads_as_unset() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = PreferencesRepository::new(&db);

        repo.set(THEME_KEY, "sepia").await.unwrap();
        assert!(repo.theme().await.unwrap().is_none());
    }
}
