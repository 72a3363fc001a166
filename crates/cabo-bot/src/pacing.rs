use std::time::Duration;

/// Display pacing for bot turns and reveals. Never affects the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Pause before a bot starts its turn.
    pub bot_turn_delay: Duration,
    /// How long a peeked card stays on screen.
    pub reveal_delay: Duration,
    /// Pause after a turn is handed on.
    pub advance_delay: Duration,
}

impl PacingConfig {
    pub const fn instant() -> Self {
        Self {
            bot_turn_delay: Duration::ZERO,
            reveal_delay: Duration::ZERO,
            advance_delay: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            bot_turn_delay: Duration::from_millis(1500),
            reveal_delay: Duration::from_millis(2000),
            advance_delay: Duration::from_millis(500),
        }
    }
}

/// Applies pacing delays; headless runs swap in [`NoopPacer`].
pub trait Pacer: Send {
    fn pause(&mut self, delay: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleepPacer;

impl Pacer for ThreadSleepPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&mut self, _delay: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::{NoopPacer, PacingConfig, Pacer, ThreadSleepPacer};
    use std::time::{Duration, Instant};

    #[test]
    fn default_pacing_matches_table_speed() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.bot_turn_delay, Duration::from_millis(1500));
        assert_eq!(pacing.reveal_delay, Duration::from_millis(2000));
        assert_eq!(pacing.advance_delay, Duration::from_millis(500));
        assert_eq!(PacingConfig::instant().reveal_delay, Duration::ZERO);
    }

    #[test]
    fn noop_pacer_returns_immediately() {
        let started = Instant::now();
        NoopPacer.pause(Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn sleep_pacer_skips_zero_delays() {
        let started = Instant::now();
        ThreadSleepPacer.pause(Duration::ZERO);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
