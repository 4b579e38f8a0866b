//! Acquisition state machine for the dashboard.
//!
//! Ensures only one acquisition runs at a time; input controls are disabled
//! whenever the state is not `Idle`.

/// What the dashboard is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    /// Waiting for the user's position
    Locating,
    /// Waiting for a speech transcript
    Listening,
    /// Resolving a city and fetching weather
    Acquiring,
}

impl OpState {
    /// True if a new search/locate/voice intent can be started.
    pub fn can_start_acquire(self) -> bool {
        matches!(self, OpState::Idle)
    }

    /// Inputs (search box, buttons) are only enabled while idle.
    pub fn controls_enabled(self) -> bool {
        self.can_start_acquire()
    }

    /// State after a position was obtained and the fetch began.
    pub fn on_located(self) -> Self {
        match self {
            OpState::Locating => OpState::Acquiring,
            other => other,
        }
    }

    /// State after a transcript was recognized and the search began.
    pub fn on_heard(self) -> Self {
        match self {
            OpState::Listening => OpState::Acquiring,
            other => other,
        }
    }

    /// State after processing any completion message, success or failure.
    pub fn on_acquire_done(self) -> Self {
        OpState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_allows_acquire() {
        assert!(OpState::Idle.can_start_acquire());
        assert!(OpState::Idle.controls_enabled());
    }

    #[test]
    fn busy_states_block_acquire() {
        for s in [OpState::Locating, OpState::Listening, OpState::Acquiring] {
            assert!(!s.can_start_acquire(), "{:?} should block", s);
            assert!(!s.controls_enabled());
        }
    }

    #[test]
    fn located_and_heard_move_to_acquiring() {
        assert_eq!(OpState::Locating.on_located(), OpState::Acquiring);
        assert_eq!(OpState::Listening.on_heard(), OpState::Acquiring);
        assert_eq!(OpState::Idle.on_located(), OpState::Idle);
    }

    #[test]
    fn done_transitions_to_idle() {
        for s in [OpState::Locating, OpState::Listening, OpState::Acquiring] {
            assert_eq!(s.on_acquire_done(), OpState::Idle);
        }
    }
}
