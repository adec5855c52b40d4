use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A canonical vocabulary entry. `skill_name` is the unique matching key;
/// `canonical_name` is the display form. Immutable once created, the
/// vocabulary only grows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub skill_name: String,
    pub canonical_name: Option<String>,
}
