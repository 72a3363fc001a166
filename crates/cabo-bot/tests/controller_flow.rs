use cabo_bot::{
    BotParams, GameController, HeuristicPolicy, NoopPacer, Pacer, PacingConfig, Policy,
};
use cabo_core::estimator::{EstimatorConfig, WinProbabilityEstimator};
use cabo_core::game::action::{Action, ActionError, ActionOutcome};
use cabo_core::game::events::GameEvent;
use cabo_core::game::match_state::MatchState;
use cabo_core::game::rules::{DEFAULT_MAX_TURNS, RulesConfig};
use cabo_core::model::player::PlayerId;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn fast_policy(name: &str) -> Box<dyn Policy> {
    Box::new(HeuristicPolicy::named(
        name,
        BotParams {
            decision_samples: 150,
            ..BotParams::default()
        },
    ))
}

fn fast_estimator() -> EstimatorConfig {
    EstimatorConfig {
        decision_samples: 150,
        history_samples: 100,
        ..EstimatorConfig::default()
    }
}

#[derive(Clone, Default)]
struct RecordingPacer {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, delay: Duration) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(delay);
        }
    }
}

fn interactive(seed: u64, pacer: Box<dyn Pacer>) -> GameController {
    GameController::with_parts(
        MatchState::with_seed(seed),
        [
            None,
            Some(fast_policy("bot1")),
            Some(fast_policy("bot2")),
            Some(fast_policy("bot3")),
        ],
        WinProbabilityEstimator::new(fast_estimator()),
        PacingConfig::default(),
        pacer,
    )
}

#[test]
fn headless_rounds_finish_and_accumulate_scores() {
    let mut controller = GameController::headless(
        7,
        [fast_policy("a"), fast_policy("b"), fast_policy("c"), fast_policy("d")],
        fast_estimator(),
        RulesConfig::default(),
    );

    let first = controller.autoplay_round().unwrap();
    assert_eq!(controller.standings(), first.round_totals());
    assert!(controller.history().is_empty());

    controller.next_round();
    let second = controller.autoplay_round().unwrap();
    let expected: Vec<u32> = first
        .round_totals()
        .iter()
        .zip(second.round_totals())
        .map(|(a, b)| a + b)
        .collect();
    assert_eq!(controller.standings().to_vec(), expected);
    assert_eq!(controller.match_state().round_number(), 2);
}

#[test]
fn only_headless_tables_are_turn_capped() {
    let headless = GameController::headless(
        5,
        [fast_policy("a"), fast_policy("b"), fast_policy("c"), fast_policy("d")],
        fast_estimator(),
        RulesConfig::default(),
    );
    assert_eq!(
        headless.match_state().rules().max_turns,
        Some(DEFAULT_MAX_TURNS)
    );

    let human = interactive(5, Box::new(NoopPacer));
    assert_eq!(human.match_state().rules().max_turns, None);
    assert_eq!(human.round().rules().max_turns, None);
}

#[test]
fn headless_play_is_deterministic_per_seed() {
    let play = || {
        let mut controller = GameController::headless(
            99,
            [fast_policy("a"), fast_policy("b"), fast_policy("c"), fast_policy("d")],
            fast_estimator(),
            RulesConfig::default(),
        );
        controller.autoplay_round().unwrap()
    };
    assert_eq!(play(), play());
}

#[test]
fn bots_hand_control_back_to_the_human() {
    let mut controller = interactive(11, Box::new(NoopPacer));
    assert!(!controller.is_bot_turn());
    assert_eq!(controller.history().len(), 1);

    assert_eq!(controller.act(Action::DrawFromDeck), Ok(ActionOutcome::Continue));
    assert_eq!(controller.act(Action::DiscardDrawn), Ok(ActionOutcome::TurnEnded));
    assert!(controller.is_bot_turn());

    let reports = controller.run_bots();
    if !controller.round().is_over() {
        assert_eq!(reports.len(), 3);
        assert_eq!(controller.round().current_player(), PlayerId::HUMAN);
        assert_eq!(controller.history().len(), 5);
    }

    let events = controller.take_events();
    assert!(events.iter().any(|event| matches!(event, GameEvent::RoundStarted { .. })));
    assert!(events.iter().any(|event| event.actor() == Some(PlayerId::LOOP[3])));
    assert!(controller.take_events().is_empty());
}

#[test]
fn human_cannot_act_on_a_bot_turn() {
    let mut controller = interactive(12, Box::new(NoopPacer));
    controller.act(Action::DeclareRoundEnd).unwrap();
    assert!(matches!(
        controller.act(Action::DrawFromDeck),
        Err(ActionError::NotYourTurn { .. })
    ));
    assert_eq!(
        controller.autoplay_round().map(|result| result.caller),
        Some(Some(PlayerId::HUMAN))
    );
}

#[test]
fn pacing_delays_go_through_the_pacer() {
    let pacer = RecordingPacer::default();
    let pauses = pacer.pauses.clone();
    let mut controller = interactive(13, Box::new(pacer));

    controller.act(Action::DrawFromDeck).unwrap();
    controller.act(Action::DiscardDrawn).unwrap();
    controller.step_bot().unwrap();

    let recorded = pauses.lock().unwrap().clone();
    let pacing = PacingConfig::default();
    assert_eq!(recorded[0], pacing.advance_delay);
    assert_eq!(recorded[1], pacing.bot_turn_delay);
    assert!(recorded.contains(&pacing.advance_delay));
}

#[test]
fn snapshot_reports_totals_and_viewer_probability() {
    let mut controller = interactive(14, Box::new(NoopPacer));
    let p = controller.win_probability(PlayerId::HUMAN);
    let snapshot = controller.snapshot(PlayerId::HUMAN, Some(p));
    assert_eq!(snapshot.win_probability, Some(p));
    assert_eq!(snapshot.seats.len(), 4);
    assert!(snapshot.seats[1].is_bot);
    assert_eq!(snapshot.seats[0].slots.iter().filter(|slot| slot.known).count(), 2);
}
