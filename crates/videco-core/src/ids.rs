//! Job identifier newtype.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Job, assigned at enumeration time.
///
/// Results reference jobs by this id, so two jobs with identical paths
/// (a re-enumerated grid, say) still produce distinguishable results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Generate a new random JobId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_generate() {
        let id1 = JobId::generate();
        let id2 = JobId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_display_is_the_generated_uuid() {
        let id = JobId::generate();
        let text = format!("{id}");
        assert!(Uuid::parse_str(&text).is_ok());
    }
}
