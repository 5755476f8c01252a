use thiserror::Error;

/// Failures surfaced by resolution and reconciliation.
///
/// None of these are retried. Probe and apply failures carry the
/// collaborator's error untouched so its message reaches the user verbatim.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(
        "unknown {noun} {token}. Supported {}: {}",
        plural(.noun),
        .supported.join(", ")
    )]
    UnknownCapability {
        token: String,
        noun: String,
        supported: Vec<String>,
    },

    /// Reading the current state failed; nothing was mutated.
    #[error(transparent)]
    ProbeFailed(anyhow::Error),

    /// The full-replace call failed after a divergence was detected. Remote
    /// state is unspecified afterwards.
    #[error(transparent)]
    ApplyFailed(anyhow::Error),
}

impl ReconcileError {
    pub fn unknown_capability(token: &str, noun: &str, supported: Vec<String>) -> Self {
        Self::UnknownCapability {
            token: token.to_string(),
            noun: noun.to_string(),
            supported,
        }
    }

    /// The offending token for `UnknownCapability`.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnknownCapability { token, .. } => Some(token),
            _ => None,
        }
    }
}

fn plural(noun: &str) -> String {
    match noun.strip_suffix('y') {
        Some(stem) => format!("{stem}ies"),
        None => format!("{noun}s"),
    }
}
