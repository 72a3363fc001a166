/// Tunable thresholds for the heuristic bot.
///
/// Every field has an environment override read by [`BotParams::from_env`]; values that fail
/// to parse or fall outside their valid range keep the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Win probability at which the bot calls the end of the round (default: 0.70)
    pub round_end_threshold: f64,

    /// Minimum probability gain required before a multi-swap is executed (default: 0.10)
    pub multi_swap_gain: f64,

    /// Highest discard-pile value worth taking (default: 4)
    pub discard_take_max: u8,

    /// Highest drawn value the bot will swap blindly into an unknown slot (default: 4)
    pub speculative_swap_max: u8,

    /// A swap ability is only used when the best known own card is above this (default: 6)
    pub swap_ability_min: u8,

    /// Monte-Carlo samples per decision estimate (default: 3000)
    pub decision_samples: usize,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            round_end_threshold: 0.70,
            multi_swap_gain: 0.10,
            discard_take_max: 4,
            speculative_swap_max: 4,
            swap_ability_min: 6,
            decision_samples: 3000,
        }
    }
}

impl BotParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let round_end_threshold = read("CABO_BOT_ROUND_END_THRESHOLD")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0 && *value <= 1.0)
            .unwrap_or(defaults.round_end_threshold);

        let multi_swap_gain = read("CABO_BOT_MULTI_SWAP_GAIN")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0 && *value < 1.0)
            .unwrap_or(defaults.multi_swap_gain);

        let decision_samples = read("CABO_BOT_SAMPLES")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.decision_samples);

        Self {
            round_end_threshold,
            multi_swap_gain,
            decision_samples,
            ..defaults
        }
    }
}
