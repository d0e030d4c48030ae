//! Outbound command delivery.

use thiserror::Error;

use crate::types::Command;
use crate::AgentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Cannot open command channel for agent {agent}: {reason}")]
    ChannelUnavailable { agent: AgentId, reason: String },

    #[error("Failed to publish command for agent {agent}: {reason}")]
    PublishFailed { agent: AgentId, reason: String },
}

/// Transport collaborator that delivers commands to agents.
///
/// The controller opens a channel once per agent (retrying on later ticks if
/// opening fails) and only publishes on agents whose channel is open.
pub trait CommandSink {
    /// Opens the command channel of `agent`.
    fn open_channel(&mut self, _agent: &str) -> Result<(), SinkError> {
        Ok(())
    }

    /// Delivers one command.
    fn publish(&mut self, agent: &str, command: &Command) -> Result<(), SinkError>;
}

/// Sink that keeps every published command, in publication order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    opened: Vec<AgentId>,
    published: Vec<(AgentId, Command)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agents whose channel has been opened, in opening order.
    pub fn opened(&self) -> &[AgentId] {
        &self.opened
    }

    pub fn published(&self) -> &[(AgentId, Command)] {
        &self.published
    }

    /// Most recent command published to `agent`.
    pub fn last_for(&self, agent: &str) -> Option<&Command> {
        self.published
            .iter()
            .rev()
            .find(|(id, _)| id == agent)
            .map(|(_, cmd)| cmd)
    }

    /// Removes and returns everything published so far.
    pub fn drain(&mut self) -> Vec<(AgentId, Command)> {
        std::mem::take(&mut self.published)
    }
}

impl CommandSink for RecordingSink {
    fn open_channel(&mut self, agent: &str) -> Result<(), SinkError> {
        self.opened.push(agent.to_string());
        Ok(())
    }

    fn publish(&mut self, agent: &str, command: &Command) -> Result<(), SinkError> {
        self.published.push((agent.to_string(), *command));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec2;

    #[test]
    fn records_in_order() {
        let mut sink = RecordingSink::new();
        sink.open_channel("a1").unwrap();
        sink.publish("a1", &Command::new(Vec2::new(0.1, 0.0), 0.0))
            .unwrap();
        sink.publish("a1", &Command::new(Vec2::new(0.2, 0.0), 0.0))
            .unwrap();

        assert_eq!(sink.opened(), ["a1".to_string()]);
        assert_eq!(sink.published().len(), 2);
        assert_eq!(sink.last_for("a1").unwrap().vn, 0.2);
        assert!(sink.last_for("a2").is_none());

        assert_eq!(sink.drain().len(), 2);
        assert!(sink.published().is_empty());
    }

    #[test]
    fn error_display() {
        let e = SinkError::ChannelUnavailable {
            agent: "a1".into(),
            reason: "topic busy".into(),
        };
        assert_eq!(
            e.to_string(),
            "Cannot open command channel for agent a1: topic busy"
        );
    }
}
