use serde::{Deserialize, Deserializer};
use serde_with::{serde_as, DefaultOnNull};

mod error;
mod http;
#[cfg(test)]
pub(crate) mod memory;

pub use error::StoreError;
pub use http::HttpNoteStore;

pub type NoteId = String;

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: NoteId,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub content: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub date: String,
}

/// The four operations the remote note store exposes.
pub trait NoteStore {
    fn list(&self) -> Result<Vec<Note>, StoreError>;
    fn create(&self, title: &str, content: &str) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
    fn update(&self, note: &Note) -> Result<(), StoreError>;
}

/// Lists the store, creating a placeholder note whenever it comes back empty.
/// Gives up after `attempts` creations rather than looping forever.
pub fn fetch_or_seed(
    store: &dyn NoteStore,
    placeholder: &str,
    attempts: u32,
) -> Result<Vec<Note>, StoreError> {
    let mut notes = store.list()?;
    let mut seeded = 0;
    while notes.is_empty() {
        if seeded == attempts {
            return Err(StoreError::Seeding { attempts });
        }
        tracing::info!(attempt = seeded + 1, "note store empty, seeding placeholder");
        store.create(placeholder, "")?;
        seeded += 1;
        notes = store.list()?;
    }
    Ok(notes)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Rows(Vec<Note>),
    Wrapped { entries: Vec<Note> },
}

pub(crate) fn decode_list(endpoint: &str, body: &str) -> Result<Vec<Note>, StoreError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let envelope: ListEnvelope =
        serde_json::from_str(trimmed).map_err(|source| StoreError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
    Ok(match envelope {
        ListEnvelope::Rows(notes) => notes,
        ListEnvelope::Wrapped { entries } => entries,
    })
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<NoteId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
