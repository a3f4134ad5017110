//! TN agent roster: which cluster names map to which reachable agent
//! address. Same "file optional, empty roster is a valid answer" shape as
//! [`crate::sites::SiteCatalog`] — a orchestrator run with no agents
//! configured still completes, just without a transport-network fan-out.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AgentFile {
    agent: Vec<AgentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentEntry {
    pub cluster: String,
    pub addr: String,
}

pub fn load(path: Option<&Path>) -> Vec<AgentEntry> {
    let default_path = Path::new("config/agents.toml");
    let path = path.unwrap_or(default_path);

    if !path.exists() {
        tracing::warn!(?path, "agent roster not found, running with no TN agents registered");
        return Vec::new();
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(?path, %err, "failed to read agent roster, running with no TN agents registered");
            return Vec::new();
        }
    };

    match toml::from_str::<AgentFile>(&raw) {
        Ok(parsed) => parsed.agent,
        Err(err) => {
            tracing::warn!(?path, %err, "failed to parse agent roster, running with no TN agents registered");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_roster() {
        assert!(load(Some(Path::new("/nonexistent/agents.toml"))).is_empty());
    }
}
