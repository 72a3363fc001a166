use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cabo_bot::bot::BotParams;
use cabo_bot::controller::GameController;
use cabo_bot::policy::{HeuristicPolicy, Policy};
use cabo_core::estimator::EstimatorConfig;
use cabo_core::game::rules::RulesConfig;
use cabo_core::model::player::PlayerId;
use cabo_core::model::score::RoundResult;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs, SEAT_COUNT};
use crate::rotation::SeatRotations;

/// Plays seeded bot-only rounds and records one JSONL row per seat per round.
pub struct SelfPlayRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    rotations: SeatRotations,
    rules: RulesConfig,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rounds_played: usize,
    pub rotations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub agents: Vec<AgentSummary>,
}

impl SelfPlayRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEAT_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        let rotations = SeatRotations::new(config.games.rotations);
        let rules = RulesConfig {
            max_turns: config.games.max_turns,
            ..RulesConfig::default()
        }
        .capped();

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            rotations,
            rules,
        })
    }

    /// Play every configured round under every rotation, streaming rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut tallies: Vec<AgentTally> = self
            .agents
            .iter()
            .map(|agent| AgentTally::new(&agent.name))
            .collect();
        let mut rows_written = 0usize;

        for round_index in 0..self.config.games.rounds {
            let base_seed = rng.next_u64();

            for (rotation_index, rotation) in self.rotations.as_slice().iter().enumerate() {
                let round_id = format!("R{round_index:05}_S{rotation_index}");
                let outcome = self.play_round(&round_id, base_seed, rotation)?;
                for (seat, agent_index) in rotation.iter().enumerate() {
                    tallies[*agent_index].record(&outcome, PlayerId::LOOP[seat]);
                }
                rows_written += write_round_rows(
                    &mut writer,
                    &self.config.run_id,
                    &round_id,
                    base_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let agents: Vec<AgentSummary> = tallies.iter().map(AgentTally::summarize).collect();
        write_summary_markdown(&self.outputs.summary_md, &self.config.run_id, &agents)?;

        Ok(RunSummary {
            rounds_played: self.config.games.rounds,
            rotations: self.rotations.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            agents,
        })
    }

    fn play_round(
        &self,
        round_id: &str,
        base_seed: u64,
        rotation: &[usize; SEAT_COUNT],
    ) -> Result<RoundOutcome, RunnerError> {
        let policies: [Box<dyn Policy>; SEAT_COUNT] =
            std::array::from_fn(|seat| self.agents[rotation[seat]].spawn_policy());
        let mut controller =
            GameController::headless(base_seed, policies, EstimatorConfig::default(), self.rules);

        let result = controller
            .autoplay_round()
            .ok_or_else(|| RunnerError::Stalled {
                round_id: round_id.to_string(),
                turn: controller.round().turn_number(),
            })?;
        let turns = controller.round().turn_number();
        let events = controller.take_events();

        if self.logging_enabled && tracing::enabled!(Level::DEBUG) {
            for line in events.iter().map(|event| event.describe()) {
                event!(
                    target: "cabo_bench::event",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    round_id,
                    text = %line
                );
            }
        }

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "cabo_bench::round",
                Level::INFO,
                run_id = %self.config.run_id,
                round_id,
                seed = base_seed,
                turns,
                raw = ?result.raw,
                penalties = ?result.penalties,
                caller = ?result.caller.map(|seat| seat.index())
            );
        }

        let agent_names = std::array::from_fn(|seat| self.agents[rotation[seat]].name.clone());
        Ok(RoundOutcome {
            agent_names,
            result,
            turns,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Finished round with the agent seated at each position.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub agent_names: [String; SEAT_COUNT],
    pub result: RoundResult,
    pub turns: u32,
}

#[derive(Debug, Serialize)]
struct RoundLogRow<'a> {
    run_id: &'a str,
    round_id: &'a str,
    seed: u64,
    seat: usize,
    agent: &'a str,
    raw: u32,
    penalty: u32,
    total: u32,
    called: bool,
    won: bool,
    turns: u32,
}

fn write_round_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    round_id: &str,
    seed: u64,
    outcome: &RoundOutcome,
) -> Result<usize, RunnerError> {
    let result = &outcome.result;
    let mut rows_written = 0usize;
    for seat in PlayerId::LOOP {
        let index = seat.index();
        let row = RoundLogRow {
            run_id,
            round_id,
            seed,
            seat: index,
            agent: &outcome.agent_names[index],
            raw: result.raw[index],
            penalty: result.penalties[index],
            total: result.round_total(seat),
            called: result.caller == Some(seat),
            won: result.is_winner(seat),
            turns: outcome.turns,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

struct AgentTally {
    name: String,
    totals: Vec<f64>,
    wins: usize,
    calls: usize,
    successful_calls: usize,
}

impl AgentTally {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            totals: Vec::new(),
            wins: 0,
            calls: 0,
            successful_calls: 0,
        }
    }

    fn record(&mut self, outcome: &RoundOutcome, seat: PlayerId) {
        let result = &outcome.result;
        self.totals.push(f64::from(result.round_total(seat)));
        if result.is_winner(seat) {
            self.wins += 1;
        }
        if result.caller == Some(seat) {
            self.calls += 1;
            if !result.caller_failed() {
                self.successful_calls += 1;
            }
        }
    }

    fn summarize(&self) -> AgentSummary {
        let rounds = self.totals.len();
        let mean_total = if rounds == 0 {
            0.0
        } else {
            self.totals.iter().mean()
        };
        let std_dev = if rounds < 2 {
            0.0
        } else {
            self.totals.iter().std_dev()
        };
        AgentSummary {
            name: self.name.clone(),
            rounds,
            mean_total,
            std_dev,
            wins: self.wins,
            calls: self.calls,
            successful_calls: self.successful_calls,
        }
    }
}

/// Per-agent aggregate over every seat it occupied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub rounds: usize,
    pub mean_total: f64,
    pub std_dev: f64,
    pub wins: usize,
    pub calls: usize,
    pub successful_calls: usize,
}

impl AgentSummary {
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.rounds)
    }

    pub fn call_success_rate(&self) -> f64 {
        ratio(self.successful_calls, self.calls)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn write_summary_markdown(
    path: &Path,
    run_id: &str,
    agents: &[AgentSummary],
) -> Result<(), RunnerError> {
    let mut text = String::new();
    text.push_str(&format!("# Self-play Summary: {run_id}\n\n"));
    text.push_str("Lower round totals are better.\n\n");
    text.push_str("| Agent | Rounds | Mean total | Std dev | Win % | Calls | Successful calls |\n");
    text.push_str("|-------|--------|------------|---------|-------|-------|------------------|\n");

    for agent in agents {
        text.push_str(&format!(
            "| {name} | {rounds} | {mean:.3} | {std:.3} | {win:.1}% | {calls} | {ok} ({ok_rate:.1}%) |\n",
            name = agent.name,
            rounds = agent.rounds,
            mean = agent.mean_total,
            std = agent.std_dev,
            win = agent.win_rate() * 100.0,
            calls = agent.calls,
            ok = agent.successful_calls,
            ok_rate = agent.call_success_rate() * 100.0,
        ));
    }

    fs::write(path, text)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("round {round_id} stopped making progress at turn {turn}")]
    Stalled { round_id: String, turn: u32 },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
}

struct AgentBlueprint {
    name: String,
    params: BotParams,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        Ok(Self {
            name: config.name.clone(),
            params: params_from_yaml(&config.name, &config.params)?,
        })
    }

    fn spawn_policy(&self) -> Box<dyn Policy> {
        Box::new(HeuristicPolicy::named(self.name.clone(), self.params))
    }
}

/// Applies YAML overrides on top of the default thresholds.
fn params_from_yaml(name: &str, value: &serde_yaml::Value) -> Result<BotParams, AgentError> {
    let mut params = BotParams::default();
    if value.is_null() {
        return Ok(params);
    }

    let invalid = |message: String| AgentError::InvalidParam {
        name: name.to_string(),
        message,
    };
    let mapping = value
        .as_mapping()
        .ok_or_else(|| invalid("expected mapping for params".to_string()))?;

    for (key, value) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| invalid("parameter names must be strings".to_string()))?;
        match key {
            "round_end_threshold" => {
                params.round_end_threshold = value
                    .as_f64()
                    .filter(|v| *v > 0.0 && *v <= 1.0)
                    .ok_or_else(|| invalid(format!("{key} must be in (0, 1]")))?;
            }
            "multi_swap_gain" => {
                params.multi_swap_gain = value
                    .as_f64()
                    .filter(|v| *v >= 0.0 && *v < 1.0)
                    .ok_or_else(|| invalid(format!("{key} must be in [0, 1)")))?;
            }
            "discard_take_max" | "speculative_swap_max" | "swap_ability_min" => {
                let card = value
                    .as_u64()
                    .filter(|v| *v <= 13)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| invalid(format!("{key} must be a card value from 0 to 13")))?;
                match key {
                    "discard_take_max" => params.discard_take_max = card,
                    "speculative_swap_max" => params.speculative_swap_max = card,
                    _ => params.swap_ability_min = card,
                }
            }
            "decision_samples" => {
                params.decision_samples = value
                    .as_u64()
                    .filter(|v| *v > 0)
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(|| invalid(format!("{key} must be a positive integer")))?;
            }
            other => return Err(invalid(format!("unknown parameter '{other}'"))),
        }
    }

    Ok(params)
}
