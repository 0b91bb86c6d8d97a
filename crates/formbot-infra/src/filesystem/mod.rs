//! Filesystem adapters for formbot.
//!
//! Forms are stored one per file as pretty-printed JSON named
//! `form_{id}.json` inside the forms directory.

use std::path::{Path, PathBuf};

use formbot_core::repository::form::FormRepository;
use formbot_types::error::RepositoryError;
use formbot_types::form::{Form, FormId, form_file_name};

/// Form repository backed by a directory of JSON files.
pub struct JsonFormRepository {
    forms_dir: PathBuf,
}

impl JsonFormRepository {
    pub fn new(forms_dir: impl Into<PathBuf>) -> Self {
        Self {
            forms_dir: forms_dir.into(),
        }
    }

    pub fn forms_dir(&self) -> &Path {
        &self.forms_dir
    }

    /// Path of the file a form with this id is stored in.
    pub fn form_path(&self, id: &FormId) -> PathBuf {
        self.forms_dir.join(form_file_name(id))
    }

    /// Every parsable form in the directory, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Form>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(&self.forms_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };

        let mut forms = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if !is_form_file(&path) {
                continue;
            }
            match read_form(&path).await {
                Ok(form) => forms.push(form),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "skipping unreadable form file: {err}");
                }
            }
        }

        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(forms)
    }
}

fn is_form_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("form_") && n.ends_with(".json"))
}

async fn read_form(path: &Path) -> Result<Form, RepositoryError> {
    let content = tokio::fs::read_to_string(path).await.map_err(io_error)?;
    serde_json::from_str(&content).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn io_error(err: std::io::Error) -> RepositoryError {
    RepositoryError::Io(err.to_string())
}

impl FormRepository for JsonFormRepository {
    async fn save(&self, form: &Form) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.forms_dir)
            .await
            .map_err(io_error)?;
        let json = serde_json::to_string_pretty(form)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let path = self.form_path(&form.id);
        tokio::fs::write(&path, json).await.map_err(io_error)?;
        tracing::debug!(path = %path.display(), "form saved");
        Ok(())
    }

    async fn get(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
        let path = self.form_path(id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err)),
        }
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Form>, RepositoryError> {
        let mut forms = self.list_all().await?;
        forms.retain(|f| f.user_id == user_id);
        Ok(forms)
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FORMBOT_DATA_DIR` environment variable
/// 2. `~/.formbot`
/// 3. `.formbot` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FORMBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".formbot");
    }

    PathBuf::from(".formbot")
}
