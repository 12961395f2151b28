/// Draw cycle behaviour: uniqueness, exhaustion, re-entrancy, cue and
/// render ordering, and reveal pacing on a manual clock.

use bingo_roulette::clock::{Clock, ManualClock};
use bingo_roulette::draw::{DrawOrchestrator, TriggerOutcome, GAME_COMPLETE_DELAY};
use bingo_roulette::game::MAX_NUMBER;
use bingo_roulette::rng::{NumberSource, SeededSource};
use bingo_roulette::roulette::PhaseTable;
use bingo_roulette::stage::Notice;
use bingo_roulette::testing::{RecordingCues, RecordingStage, ScriptedSource, StageCall};
use bingo_roulette::tone::Cue;
use std::collections::BTreeSet;
use std::time::Duration;

/// Helper: orchestrator on a manual clock with a seeded source
fn seeded_game(seed: u64) -> (DrawOrchestrator, ManualClock) {
    let clock = ManualClock::new();
    let game = DrawOrchestrator::new(
        PhaseTable::default(),
        Box::new(clock.clone()),
        Box::new(SeededSource::from_seed(seed)),
    );
    (game, clock)
}

/// Helper: jump from deadline to deadline until the running draw commits
fn finish_draw(
    game: &mut DrawOrchestrator,
    clock: &ManualClock,
    stage: &mut RecordingStage,
    cues: &RecordingCues,
) -> Option<u8> {
    while let Some(due) = game.next_deadline() {
        clock.set(due);
        if let Some(number) = game.poll(stage, cues) {
            return Some(number);
        }
    }
    None
}

// ============================================================================
// Single draw
// ============================================================================

#[test]
fn test_single_draw_commits_the_preselected_number() {
    let (mut game, clock) = seeded_game(1);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    let outcome = game.trigger(&mut stage, &cues);
    let TriggerOutcome::Started { target } = outcome else {
        panic!("expected a draw to start, got {:?}", outcome);
    };
    assert!(game.state().is_drawing());
    assert!(!stage.trigger_enabled());
    assert_eq!(game.state().drawn().len(), 0, "nothing is committed before the reveal");

    let committed = finish_draw(&mut game, &clock, &mut stage, &cues);

    assert_eq!(committed, Some(target));
    assert!((1..=75).contains(&target));
    assert_eq!(game.state().drawn().len(), 1);
    assert!(game.state().drawn().contains(target));
    assert_eq!(game.state().current(), Some(target));
    assert!(!game.state().is_drawing());
    assert!(stage.trigger_enabled());
    assert_eq!(game.next_deadline(), None);
}

#[test]
fn test_last_decoy_does_not_become_the_result() {
    let clock = ManualClock::new();
    // First index picks the target (11); decoys alternate between 1 and 11
    let mut game = DrawOrchestrator::new(
        PhaseTable::default(),
        Box::new(clock.clone()),
        Box::new(ScriptedSource::new(vec![10, 0], vec![0.3])),
    );
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    assert_eq!(
        game.trigger(&mut stage, &cues),
        TriggerOutcome::Started { target: 11 }
    );
    let committed = finish_draw(&mut game, &clock, &mut stage, &cues);

    assert_eq!(committed, Some(11));
    assert!(stage.decoys().contains(&1));
    assert!(stage.decoys().contains(&11));
}

#[test]
fn test_cue_order_within_a_cycle() {
    let (mut game, clock) = seeded_game(2);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    game.trigger(&mut stage, &cues);
    // The first tick fires immediately with the trigger
    let at_trigger = cues.cues();
    assert_eq!(at_trigger[0], Cue::ButtonClick);
    assert_eq!(at_trigger[1], Cue::DrumRoll);
    assert!(matches!(at_trigger[2], Cue::Tick { .. }));
    assert_eq!(at_trigger.len(), 3);

    finish_draw(&mut game, &clock, &mut stage, &cues);

    assert_eq!(
        cues.events(),
        vec![Cue::ButtonClick, Cue::DrumRoll, Cue::Fanfare]
    );
    assert_eq!(cues.cues().last(), Some(&Cue::Fanfare));
    for frequency in cues.ticks() {
        assert!((400.0..1200.0).contains(&frequency), "tick at {frequency} Hz");
    }
}

#[test]
fn test_stage_order_within_a_cycle() {
    let (mut game, clock) = seeded_game(3);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    let TriggerOutcome::Started { target } = game.trigger(&mut stage, &cues) else {
        panic!("draw should start");
    };
    finish_draw(&mut game, &clock, &mut stage, &cues);

    let calls = stage.calls();
    assert_eq!(calls[0], StageCall::TriggerEnabled(false));
    assert!(matches!(calls[1], StageCall::ShowDecoy { .. }));

    let tail: Vec<StageCall> = calls
        .iter()
        .skip_while(|call| matches!(call, StageCall::ShowDecoy { .. } | StageCall::TriggerEnabled(false)))
        .cloned()
        .collect();
    assert_eq!(
        tail,
        vec![
            StageCall::ShowFinal(target),
            StageCall::ClearFinalHighlight,
            StageCall::MarkDrawn(target),
            StageCall::Celebrate(target),
            StageCall::TriggerEnabled(true),
        ]
    );
}

// ============================================================================
// Pacing
// ============================================================================

#[test]
fn test_tick_intervals_follow_the_phase_table() {
    let (mut game, clock) = seeded_game(4);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    game.trigger(&mut stage, &cues);

    let mut last = Duration::ZERO;
    let mut intervals = Vec::new();
    let mut landed_at = None;
    let mut committed_at = None;

    while let Some(due) = game.next_deadline() {
        intervals.push((last, due - last));
        clock.set(due);
        last = due;
        let before = stage.calls().len();
        if game.poll(&mut stage, &cues).is_some() {
            committed_at = Some(clock.now());
        }
        if stage.calls()[before..]
            .iter()
            .any(|call| matches!(call, StageCall::ShowFinal(_)))
        {
            landed_at = Some(clock.now());
        }
    }

    // Steady 50 ms ticks for the first 70 % of the spin
    for (at, interval) in &intervals {
        if *at < Duration::from_millis(2100) {
            assert_eq!(*interval, Duration::from_millis(50), "tick scheduled at {:?}", at);
        }
    }
    // At exactly 70 % the interval jumps to the 100 ms ramp
    let boundary = intervals
        .iter()
        .find(|(at, _)| *at == Duration::from_millis(2100))
        .expect("a tick lands exactly on the 70 % mark");
    assert_eq!(boundary.1, Duration::from_millis(100));

    // Intervals never shrink once the ramp starts
    let slowing: Vec<Duration> = intervals
        .iter()
        .filter(|(at, _)| *at >= Duration::from_millis(2100) && *at < Duration::from_millis(3000))
        .map(|(_, interval)| *interval)
        .collect();
    assert!(slowing.windows(2).all(|w| w[0] <= w[1]));
    assert!(slowing.iter().all(|i| *i < Duration::from_millis(400)));

    let landed_at = landed_at.expect("the number landed");
    let committed_at = committed_at.expect("the draw committed");
    assert!(landed_at >= Duration::from_millis(3000));
    assert_eq!(committed_at - landed_at, Duration::from_millis(500));
}

#[test]
fn test_late_poll_catches_up_in_one_call() {
    let (mut game, clock) = seeded_game(5);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    let TriggerOutcome::Started { target } = game.trigger(&mut stage, &cues) else {
        panic!("draw should start");
    };

    // Jump past the spin: the next step lands, the settle is still pending
    clock.set(Duration::from_secs(10));
    assert_eq!(game.poll(&mut stage, &cues), None);
    assert!(game.state().is_drawing());

    clock.advance(Duration::from_millis(500));
    assert_eq!(game.poll(&mut stage, &cues), Some(target));
}

// ============================================================================
// Re-entrancy
// ============================================================================

#[test]
fn test_trigger_during_draw_is_ignored() {
    let (mut game, clock) = seeded_game(6);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    game.trigger(&mut stage, &cues);
    clock.advance(Duration::from_millis(1000));
    game.poll(&mut stage, &cues);

    let calls_before = stage.calls().len();
    let cues_before = cues.cues().len();
    let deadline_before = game.next_deadline();

    assert_eq!(game.trigger(&mut stage, &cues), TriggerOutcome::Ignored);
    assert_eq!(stage.calls().len(), calls_before);
    assert_eq!(cues.cues().len(), cues_before);
    assert_eq!(game.next_deadline(), deadline_before);
    assert_eq!(game.state().drawn().len(), 0);

    finish_draw(&mut game, &clock, &mut stage, &cues);
    assert_eq!(game.state().drawn().len(), 1);
    assert_eq!(cues.events().iter().filter(|c| **c == Cue::Fanfare).count(), 1);
}

#[test]
fn test_new_game_refused_while_drawing() {
    let (mut game, clock) = seeded_game(7);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();

    game.trigger(&mut stage, &cues);
    assert!(!game.new_game(&mut stage));
    assert!(game.state().is_drawing());

    finish_draw(&mut game, &clock, &mut stage, &cues);
    assert!(game.is_in_progress());

    assert!(game.new_game(&mut stage));
    assert_eq!(game.state().drawn().len(), 0);
    assert_eq!(game.state().current(), None);
    assert!(!game.is_in_progress());
    assert!(stage.calls().contains(&StageCall::ResetBoard));
}

// ============================================================================
// Whole game
// ============================================================================

#[test]
fn test_seventy_five_draws_then_exhaustion() {
    let (mut game, clock) = seeded_game(8);
    let mut stage = RecordingStage::default();
    let cues = RecordingCues::default();
    let mut seen = BTreeSet::new();

    for draw in 1..=MAX_NUMBER as usize {
        let called_before: BTreeSet<u8> = game.state().drawn().iter().collect();
        stage.clear();

        assert!(matches!(
            game.trigger(&mut stage, &cues),
            TriggerOutcome::Started { .. }
        ));
        let number = finish_draw(&mut game, &clock, &mut stage, &cues)
            .expect("every draw commits");

        assert!(seen.insert(number), "{number} drawn twice");
        assert_eq!(game.state().drawn().len(), draw);
        // Decoys only ever show numbers that were still open
        for decoy in stage.decoys() {
            assert!(!called_before.contains(&decoy));
        }
        cues.clear();
    }

    assert_eq!(seen, (1..=75).collect::<BTreeSet<u8>>());
    assert!(game.state().is_complete());
    assert!(!game.is_in_progress());

    // Game-over notice waits half a second after the last commit
    let committed_at = clock.now();
    assert_eq!(game.next_deadline(), Some(committed_at + GAME_COMPLETE_DELAY));
    assert!(stage.notices().is_empty());
    clock.advance(GAME_COMPLETE_DELAY);
    game.poll(&mut stage, &cues);
    assert_eq!(stage.notices(), vec![Notice::GameComplete]);

    // The 76th attempt only produces the exhaustion notice
    stage.clear();
    let current = game.state().current();
    assert_eq!(game.trigger(&mut stage, &cues), TriggerOutcome::Exhausted);
    assert_eq!(stage.calls(), &[StageCall::Notify(Notice::AllNumbersDrawn)]);
    assert!(cues.cues().is_empty());
    assert_eq!(game.state().drawn().len(), 75);
    assert_eq!(game.state().current(), current);
    assert!(!game.state().is_drawing());
}

#[test]
fn test_first_draw_is_roughly_uniform() {
    let clock = ManualClock::new();
    let mut counts = [0u32; 75];
    let mut rng = SeededSource::from_seed(99);

    // The outcome is picked at trigger time, so only the trigger is needed
    for _ in 0..7500 {
        let mut game = DrawOrchestrator::new(
            PhaseTable::default(),
            Box::new(clock.clone()),
            Box::new(SeededSource::from_seed(rng.next_u32_range(0, u32::MAX) as u64)),
        );
        let mut stage = RecordingStage::default();
        let cues = RecordingCues::default();
        if let TriggerOutcome::Started { target } = game.trigger(&mut stage, &cues) {
            counts[target as usize - 1] += 1;
        }
    }

    assert_eq!(counts.iter().sum::<u32>(), 7500);
    for (index, count) in counts.iter().enumerate() {
        assert!(
            (40..=170).contains(count),
            "number {} drawn {} times out of 7500",
            index + 1,
            count
        );
    }
}
