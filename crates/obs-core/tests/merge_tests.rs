//! Pruebas del merge cronológico k-vías.
//!
//! Verificamos: orden no-decreciente, preservación exacta de elementos
//! (permutación sin duplicados ni pérdidas) y la regla de desempate por
//! prioridad de fuente.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use obs_core::merge::{merge_by_timestamp, merge_history, HistoryEvent};
use obs_domain::{
    AtomId, AtomRecord, GuideState, Offset, ProtoStep, SequenceCommand, SequenceEvent,
    SequenceType, StepExecutionState, StepId, StepRecord, VisitRecord,
};

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn visit(secs: i64) -> VisitRecord {
    VisitRecord {
        visit_id: Uuid::new_v4(),
        created_at: ts(secs),
    }
}

fn seq_event(secs: i64) -> SequenceEvent {
    SequenceEvent {
        event_id: Uuid::new_v4(),
        visit_id: Uuid::new_v4(),
        command: SequenceCommand::Start,
        created_at: ts(secs),
    }
}

fn step(secs: i64) -> StepRecord<u8> {
    StepRecord {
        step_id: StepId(Uuid::new_v4()),
        atom_id: AtomId(Uuid::new_v4()),
        sequence_type: SequenceType::Science,
        proto: ProtoStep::science(0u8, Offset::ZERO, GuideState::Enabled),
        execution_state: StepExecutionState::Completed,
        created_at: ts(secs),
    }
}

fn atom(secs: i64) -> AtomRecord {
    AtomRecord {
        atom_id: AtomId(Uuid::new_v4()),
        visit_id: Uuid::new_v4(),
        sequence_type: SequenceType::Science,
        created_at: ts(secs),
    }
}

#[test]
fn merged_output_is_nondecreasing_by_timestamp() {
    let merged: Vec<HistoryEvent<u8>> = merge_history(
        vec![visit(1), visit(50)],
        vec![seq_event(2), seq_event(40)],
        vec![step(3), step(10), step(45)],
        vec![atom(3), atom(44)],
    )
    .collect();

    assert_eq!(merged.len(), 9, "no element may be dropped or duplicated");
    let stamps: Vec<_> = merged.iter().map(HistoryEvent::timestamp).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted, "merged stream must be sorted by timestamp");
}

#[test]
fn merge_preserves_every_element_exactly_once() {
    let steps: Vec<StepRecord<u8>> = (0..5).map(|i| step(i * 7)).collect();
    let step_ids: Vec<StepId> = steps.iter().map(|s| s.step_id).collect();

    let merged: Vec<HistoryEvent<u8>> =
        merge_history(vec![visit(3)], vec![], steps, vec![]).collect();

    let mut seen = Vec::new();
    for ev in &merged {
        if let HistoryEvent::Step(s) = ev {
            seen.push(s.step_id);
        }
    }
    assert_eq!(seen, step_ids, "steps keep their relative order");
}

#[test]
fn equal_timestamps_break_ties_by_source_priority() {
    // Visit > SequenceEvent > Step > Atom en el mismo instante.
    let merged: Vec<HistoryEvent<u8>> = merge_history(
        vec![visit(10)],
        vec![seq_event(10)],
        vec![step(10)],
        vec![atom(10)],
    )
    .collect();

    assert!(matches!(merged[0], HistoryEvent::Visit(_)));
    assert!(matches!(merged[1], HistoryEvent::Sequence(_)));
    assert!(matches!(merged[2], HistoryEvent::Step(_)));
    assert!(matches!(merged[3], HistoryEvent::Atom(_)));
}

#[test]
fn generic_merge_supports_arbitrary_source_count() {
    let sources: Vec<std::vec::IntoIter<(i64, &str)>> = vec![
        vec![(1, "a"), (4, "a")].into_iter(),
        vec![(2, "b")].into_iter(),
        vec![(3, "c"), (5, "c")].into_iter(),
        vec![(0, "d")].into_iter(),
        vec![(6, "e")].into_iter(),
    ];
    let merged: Vec<_> = merge_by_timestamp(sources, |(s, _)| {
        Utc.timestamp_opt(*s, 0).unwrap()
    })
    .map(|(_, tag)| tag)
    .collect();
    assert_eq!(merged, vec!["d", "a", "b", "c", "a", "c", "e"]);
}
