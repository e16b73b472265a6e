/// Config rows the desktop application expects to find on first start.
///
/// Seeded once per key. Values are stored as text, exactly as the
/// application writes them itself.
pub const DEFAULT_CONFIG: [(&str, &str); 7] = [
    ("prompt_update_check", "1"),
    ("update_check", "0"),
    ("startup_minimized", "0"),
    ("startup_autoconnect", "0"),
    ("smart_layers_enabled", "1"),
    ("api_enabled", "0"),
    ("api_port", "50051"),
];

/// A row of the `config` table.
///
/// Both columns are nullable in the schema, so rows written by something
/// other than us may come back without a value.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct ConfigEntry {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: Some(key.into()), value: Some(value.into()) }
    }
}

/// Outcome of [`Repository::upsert_revision`](crate::Repository::upsert_revision).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevisionWrite {
    /// No row existed for the revision identifier.
    Inserted,
    /// The existing row's data was replaced.
    Replaced,
}
