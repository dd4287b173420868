// Worker lifecycle states

use serde::{Deserialize, Serialize};

/// Lifecycle state of the worker version this controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// No version provisioned (also the state after a failed install).
    Uninstalled,
    /// Install transition in progress.
    Installing,
    /// Installed, ready to supersede the prior version.
    Waiting,
    /// Activate transition in progress.
    Activating,
    /// Controlling clients and serving intercepted requests.
    Active,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Uninstalled => "uninstalled",
            WorkerState::Installing => "installing",
            WorkerState::Waiting => "waiting",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(WorkerState::Waiting.as_str(), "waiting");
        assert_eq!(
            serde_json::to_string(&WorkerState::Active).unwrap(),
            "\"active\""
        );
    }
}
