/// Fail penalty added to a round-end caller who does not hold the lowest hand.
pub const ROUND_END_PENALTY: u32 = 10;

/// Turn cap applied to bot-only tables.
pub const DEFAULT_MAX_TURNS: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    pub penalty: u32,
    /// Once the deck runs dry, bot-only tables can cycle forever; this caps the round.
    /// Ignored while a round-end call is pending.
    pub max_turns: Option<u32>,
}

impl RulesConfig {
    /// Keeps an explicit cap, otherwise falls back to [`DEFAULT_MAX_TURNS`].
    pub fn capped(self) -> Self {
        Self {
            max_turns: self.max_turns.or(Some(DEFAULT_MAX_TURNS)),
            ..self
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            penalty: ROUND_END_PENALTY,
            max_turns: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_TURNS, RulesConfig};

    #[test]
    fn interactive_rules_have_no_turn_cap() {
        assert_eq!(RulesConfig::default().max_turns, None);
    }

    #[test]
    fn capped_keeps_explicit_limit() {
        assert_eq!(
            RulesConfig::default().capped().max_turns,
            Some(DEFAULT_MAX_TURNS)
        );
        let tight = RulesConfig {
            max_turns: Some(12),
            ..RulesConfig::default()
        };
        assert_eq!(tight.capped().max_turns, Some(12));
    }
}
