//! Audit metadata recorded on every catalog record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor name recorded when no authenticated principal is present.
pub const FALLBACK_ACTOR: &str = "admin";

/// Creation/update bookkeeping carried by every stored record.
///
/// Serialized in camelCase like the rest of the wire surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl AuditStamp {
    /// Fresh stamp for a record created now by `actor`.
    pub fn new(actor: &str) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: actor.to_owned(),
            updated_at: now,
            updated_by: actor.to_owned(),
        }
    }

    /// Record a mutation by `actor`. Creation bookkeeping is never rewritten.
    pub fn touch(&mut self, actor: &str) {
        self.updated_at = Utc::now();
        self.updated_by = actor.to_owned();
    }
}
