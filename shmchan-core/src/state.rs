// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Channel handle state machine with typed state transitions.
//!
//! Implements the handle lifecycle:
//! Uninitialized → Open → Connected ⇄ Disconnected → Closed.
//! Closed is terminal.

/// Channel handle lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// No transport handle has been allocated yet.
    Uninitialized,

    /// Handle allocated by the transport.
    Open,

    /// Handle associated with its mode; transfers are allowed.
    Connected,

    /// Handle alive but association released.
    Disconnected,

    /// Handle released. Terminal.
    Closed,
}

impl ChannelState {
    /// Get the state name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Open => "Open",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
            Self::Closed => "Closed",
        }
    }

    /// Check if transition to the target state is valid.
    pub fn can_transition_to(&self, target: ChannelState) -> bool {
        matches!(
            (self, target),
            (Self::Uninitialized, Self::Open)
                | (Self::Open, Self::Connected)
                | (Self::Open, Self::Closed)
                | (Self::Connected, Self::Disconnected)
                | (Self::Connected, Self::Closed)
                | (Self::Disconnected, Self::Connected)
                | (Self::Disconnected, Self::Closed)
        )
    }

    /// A transport handle exists in this state.
    pub const fn has_handle(&self) -> bool {
        matches!(self, Self::Open | Self::Connected | Self::Disconnected)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State machine tracking one channel's lifecycle.
#[derive(Debug)]
pub struct ChannelStateMachine {
    current_state: ChannelState,
    transition_count: u64,
}

impl ChannelStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: ChannelState::Uninitialized,
            transition_count: 0,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.current_state
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `false` and leaves the state untouched if the transition is
    /// not allowed. `channel` is only used for logging.
    pub fn transition_to(&mut self, channel: &str, target: ChannelState) -> bool {
        if !self.current_state.can_transition_to(target) {
            tracing::warn!(
                channel = %channel,
                from = self.current_state.name(),
                to = target.name(),
                "Refused invalid channel state transition"
            );
            return false;
        }

        tracing::debug!(
            channel = %channel,
            from = self.current_state.name(),
            to = target.name(),
            "State transition"
        );

        self.current_state = target;
        self.transition_count += 1;
        true
    }
}

impl Default for ChannelStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = ChannelStateMachine::new();
        assert_eq!(sm.state(), ChannelState::Uninitialized);
        assert_eq!(sm.transition_count(), 0);
        assert!(!sm.state().has_handle());
    }

    #[test]
    fn test_valid_transitions() {
        let mut sm = ChannelStateMachine::new();

        assert!(sm.transition_to("t", ChannelState::Open));
        assert!(sm.transition_to("t", ChannelState::Connected));
        assert!(sm.transition_to("t", ChannelState::Disconnected));
        assert!(sm.transition_to("t", ChannelState::Connected));
        assert!(sm.transition_to("t", ChannelState::Closed));
        assert_eq!(sm.transition_count(), 5);
        assert!(sm.state().is_terminal());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut sm = ChannelStateMachine::new();

        // Uninitialized → Connected skips Open
        assert!(!sm.transition_to("t", ChannelState::Connected));
        assert_eq!(sm.state(), ChannelState::Uninitialized);

        sm.transition_to("t", ChannelState::Open);
        sm.transition_to("t", ChannelState::Closed);

        // Closed is terminal
        assert!(!sm.transition_to("t", ChannelState::Connected));
        assert!(!sm.transition_to("t", ChannelState::Open));
        assert_eq!(sm.state(), ChannelState::Closed);
    }

    #[test]
    fn test_has_handle() {
        assert!(ChannelState::Open.has_handle());
        assert!(ChannelState::Connected.has_handle());
        assert!(ChannelState::Disconnected.has_handle());
        assert!(!ChannelState::Closed.has_handle());
    }
}
