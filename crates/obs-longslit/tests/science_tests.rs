//! Pruebas del generador de ciencia: fórmula de ciclos, estructura de
//! bloques, calibración intermedia y estabilidad de ids bajo replay.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use obs_core::{GeneratorError, SequenceGenerator, SequenceIds};
use obs_domain::{
    AtomId, GuideState, Offset, ProtoStep, SequenceType, SmartGcalType, StepConfig,
    StepExecutionState, StepId, StepRecord,
};
use obs_longslit::{
    required_cycles, Filter, Fpu, Grating, LongslitDynamic, LongslitStatic, ReadoutMode, Science,
};

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn config(exposure_secs: u64, exposure_count: u32) -> LongslitStatic {
    LongslitStatic::new(
        Grating::R831,
        Some(Filter::GG455),
        Fpu::LongSlit050,
        Duration::from_secs(exposure_secs),
        exposure_count,
        ReadoutMode::Slow,
        obs_longslit::config::DEFAULT_DITHER_Q_UAS,
        None,
    )
    .expect("valid config")
}

fn science_record(
    cfg: &LongslitStatic,
    atom: AtomId,
    offset: Offset,
    secs: i64,
) -> StepRecord<LongslitDynamic> {
    StepRecord {
        step_id: StepId(Uuid::new_v4()),
        atom_id: atom,
        sequence_type: SequenceType::Science,
        proto: ProtoStep::science(cfg.science_dynamic(), offset, GuideState::Enabled),
        execution_state: StepExecutionState::Completed,
        created_at: ts(secs),
    }
}

fn arc_record(cfg: &LongslitStatic, atom: AtomId, secs: i64) -> StepRecord<LongslitDynamic> {
    StepRecord {
        step_id: StepId(Uuid::new_v4()),
        atom_id: atom,
        sequence_type: SequenceType::Science,
        proto: ProtoStep::smart_gcal(cfg.science_dynamic(), SmartGcalType::Arc),
        execution_state: StepExecutionState::Completed,
        created_at: ts(secs),
    }
}

fn descriptions(science: &Science, as_of: DateTime<Utc>) -> Vec<String> {
    science
        .generate(as_of)
        .map(|a| a.description.unwrap_or_default())
        .collect()
}

#[test]
fn required_cycles_uses_ceiling_division() {
    assert_eq!(required_cycles(10, 3), 4);
    assert_eq!(required_cycles(16, 4), 4);
    assert_eq!(required_cycles(17, 4), 5);
}

#[test]
fn short_sequence_is_one_block_closed_by_a_calibration() {
    // 16 exposiciones de 60 s: 4 ciclos, muy por debajo del período de
    // calibración, sin calibración intermedia.
    let sci = Science::new(Uuid::new_v4(), config(60, 16)).expect("constructible");

    let atoms: Vec<_> = sci.generate(ts(0)).collect();
    assert_eq!(atoms.len(), 5, "4 cycles plus the closing calibration");
    for cycle in &atoms[..4] {
        assert_eq!(cycle.steps.len(), 4);
        assert_eq!(cycle.description.as_deref(), Some("ABBA cycle"));
    }
    let cal = &atoms[4];
    assert_eq!(cal.steps.len(), 1);
    assert!(matches!(
        cal.steps[0].proto.step_config,
        StepConfig::SmartGcal(SmartGcalType::Arc)
    ));
}

#[test]
fn long_block_gets_a_mid_block_calibration() {
    // Exposiciones de 600 s: un ciclo ≈ 2558 s, 4 ciclos ≈ 2.8 h > 90 min ⇒
    // calibración intermedia en el límite de ciclo más cercano a la mitad.
    let sci = Science::new(Uuid::new_v4(), config(600, 16)).expect("constructible");

    let descs = descriptions(&sci, ts(0));
    assert_eq!(
        descs,
        vec!["ABBA cycle", "ABBA cycle", "Arc", "ABBA cycle", "ABBA cycle", "Arc"],
        "calibration lands at the halfway cycle boundary"
    );
}

#[test]
fn multi_block_sequences_close_every_block_with_a_calibration() {
    // 40 exposiciones de 600 s: 10 ciclos en bloques de a lo sumo 4.
    let sci = Science::new(Uuid::new_v4(), config(600, 40)).expect("constructible");

    let descs = descriptions(&sci, ts(0));
    let arcs = descs.iter().filter(|d| *d == "Arc").count();
    let cycles = descs.iter().filter(|d| *d == "ABBA cycle").count();
    assert_eq!(cycles, 10);
    // Dos bloques de 4 (con intermedia cada uno) y uno de 2 (sin).
    assert_eq!(arcs, 5);
    assert_eq!(descs.last().map(String::as_str), Some("Arc"));
}

#[test]
fn replayed_partial_cycle_resumes_mid_pattern_with_stable_ids() {
    let cfg = config(60, 16);
    let ns = Uuid::new_v4();
    let sci = Science::new(ns, cfg.clone()).expect("constructible");

    // Las dos primeras posiciones (A, B) del primer ciclo ya ejecutadas.
    let atom = AtomId(Uuid::new_v4());
    let [a, b, _, _] = cfg.cycle_offsets();
    let sci = sci
        .record_step(&science_record(&cfg, atom, a, 10))
        .record_step(&science_record(&cfg, atom, b, 20));
    assert_eq!(sci.completed_science(), 2);

    let first = sci.generate(ts(30)).next().expect("sequence continues");
    assert_eq!(first.steps.len(), 2, "only the B, A remainder of the cycle");

    // Átomo de continuación: índice 1 (el átomo 0 ya comenzó), pasos 2 y 3.
    let ids = SequenceIds::new(ns, SequenceType::Science);
    assert_eq!(first.id, ids.atom_id(1));
    assert_eq!(first.steps[0].id, ids.step_id(1, 2));
    assert_eq!(first.steps[1].id, ids.step_id(1, 3));

    // Reiniciable y determinista.
    let again = sci.generate(ts(30)).next().expect("same remainder");
    assert_eq!(first, again);
}

#[test]
fn completed_sequence_generates_nothing() {
    let cfg = config(60, 8);
    let mut sci = Science::new(Uuid::new_v4(), cfg.clone()).expect("constructible");

    let [a, b, _, _] = cfg.cycle_offsets();
    let offsets = [a, b, b, a, a, b, b, a];
    for (i, offset) in offsets.into_iter().enumerate() {
        let atom = AtomId(Uuid::new_v4());
        sci = sci.record_step(&science_record(&cfg, atom, offset, i as i64));
    }
    assert_eq!(sci.completed_science(), 8);
    assert_eq!(sci.generate(ts(100)).count(), 0);
}

#[test]
fn stale_calibration_prepends_an_arc() {
    let cfg = config(60, 16);
    let sci = Science::new(Uuid::new_v4(), cfg.clone()).expect("constructible");

    // Un ciclo completo ejecutado, arco tomado en t=100.
    let atom = AtomId(Uuid::new_v4());
    let [a, b, _, _] = cfg.cycle_offsets();
    let mut sci = sci;
    for (i, offset) in [a, b, b, a].into_iter().enumerate() {
        sci = sci.record_step(&science_record(&cfg, atom, offset, 10 + i as i64));
    }
    let sci = sci.record_step(&arc_record(&cfg, AtomId(Uuid::new_v4()), 100));

    // Dentro del período: sin arco inicial.
    let soon = descriptions(&sci, ts(100 + 60));
    assert_eq!(soon.first().map(String::as_str), Some("ABBA cycle"));

    // Pasado el período de 90 minutos: arco inicial.
    let late = descriptions(&sci, ts(100 + 91 * 60));
    assert_eq!(late.first().map(String::as_str), Some("Arc"));
}

#[test]
fn acquisition_steps_are_ignored_by_the_science_machine() {
    let cfg = config(60, 16);
    let sci = Science::new(Uuid::new_v4(), cfg.clone()).expect("constructible");

    let mut rec = science_record(&cfg, AtomId(Uuid::new_v4()), Offset::ZERO, 5);
    rec.sequence_type = SequenceType::Acquisition;

    let sci = sci.record_step(&rec);
    assert_eq!(sci.completed_science(), 0);
    assert_eq!(sci.tracker().total_steps(), 0);
}

#[test]
fn oversized_cycle_is_a_configuration_error() {
    // 3000 s por exposición: un solo ciclo ABBA supera las 3 horas.
    let err = Science::new(Uuid::new_v4(), config(3000, 16)).unwrap_err();
    assert!(matches!(err, GeneratorError::CycleTooLong { .. }));
}
