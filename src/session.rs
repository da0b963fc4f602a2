use crate::common::Sides;

/// How long a criticality directive stays in effect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Until [`SessionState::reset`] is called.
    Persistent,
    /// Until the end of the current command.
    Command,
}

/// Die sizes whose natural 1s and maxima should be reported.
///
/// Each independent session (a REPL, a chat channel, ...) owns its own value.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SessionState {
    persistent: Vec<String>,
    command: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags a die-size tag such as `"d20"`.
    pub fn mark_critical(&mut self, tag: &str, scope: Scope) {
        let tag = tag.to_ascii_lowercase();
        let set = match scope {
            Scope::Persistent => &mut self.persistent,
            Scope::Command => &mut self.command,
        };
        if !set.contains(&tag) {
            set.push(tag);
        }
    }

    pub fn is_critical(&self, sides: Sides) -> bool {
        let tag = format!("d{}", sides);
        self.persistent.contains(&tag) || self.command.contains(&tag)
    }

    pub fn persistent(&self) -> &[String] {
        &self.persistent
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Drops the command-local directives.
    pub fn end_command(&mut self) {
        self.command.clear();
    }

    /// Drops every directive.
    pub fn reset(&mut self) {
        self.persistent.clear();
        self.command.clear();
    }
}
