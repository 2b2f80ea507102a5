//! Demo ejecutable de ObsFlow: configura un long-slit, reproduce una
//! historia corta y muestra las secuencias restantes con sus estimaciones.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use obs_core::{execution_config, expand_sequence, TimeEstimateCalculator};
use obs_domain::{
    AtomId, GuideState, ProtoAtom, ProtoStep, SequenceType, SmartGcalType, StepExecutionState,
    StepId, StepRecord, VisitRecord,
};
use obs_longslit::{
    Acquisition, Filter, Fpu, Grating, LongslitCost, LongslitStatic, ReadoutMode, Science,
    DEFAULT_GCAL_TABLE,
};

fn main() {
    // Configuración estática de la observación: R831 + GG455, rendija de
    // 0.50", 16 exposiciones de 300 s.
    let static_config = LongslitStatic::new(
        Grating::R831,
        Some(Filter::GG455),
        Fpu::LongSlit050,
        Duration::from_secs(300),
        16,
        ReadoutMode::Slow,
        obs_longslit::config::DEFAULT_DITHER_Q_UAS,
        None,
    )
    .expect("static config");

    let observation = Uuid::new_v4();
    let acquisition = Acquisition::new(observation, static_config.clone());
    let science = Science::new(observation, static_config.clone()).expect("science generator");

    // Historia mínima: una visita y el paso de imagen de adquisición
    // completado.
    let visit = VisitRecord {
        visit_id: Uuid::new_v4(),
        created_at: Utc.timestamp_opt(1_000, 0).single().expect("timestamp"),
    };
    let image = StepRecord {
        step_id: StepId(Uuid::new_v4()),
        atom_id: AtomId(Uuid::new_v4()),
        sequence_type: SequenceType::Acquisition,
        proto: ProtoStep::acquisition(
            static_config.acquisition_image(),
            obs_domain::Offset::ZERO,
        ),
        execution_state: StepExecutionState::Completed,
        created_at: Utc.timestamp_opt(1_060, 0).single().expect("timestamp"),
    };

    let cost = LongslitCost;
    let config = execution_config(
        static_config.clone(),
        cost.setup_time(&static_config),
        acquisition,
        science,
        vec![visit],
        Vec::new(),
        vec![image],
        Vec::new(),
    );

    let as_of = Utc.timestamp_opt(2_000, 0).single().expect("timestamp");
    println!("Estado de ejecución: {:?}", config.execution_state());
    println!(
        "Setup completo: {} s, re-adquisición: {} s",
        config.setup().full.as_secs(),
        config.setup().reacquisition.as_secs()
    );

    // La adquisición ya completó el paso de imagen: continúa en la rendija.
    println!("\nAdquisición restante (primeros 3 átomos):");
    for atom in config.acquisition(as_of).take(3) {
        println!(
            "  {} [{}] {} pasos, {} s",
            atom.id,
            atom.description.as_deref().unwrap_or("-"),
            atom.steps.len(),
            atom.estimate.as_secs()
        );
    }

    println!("\nCiencia completa planificada:");
    let mut total = Duration::ZERO;
    for atom in config.science(as_of) {
        total += atom.estimate;
        println!(
            "  {} [{}] {} pasos, {} s",
            atom.id,
            atom.description.as_deref().unwrap_or("-"),
            atom.steps.len(),
            atom.estimate.as_secs()
        );
    }
    println!("Tiempo de ciencia estimado: {} s", total.as_secs());

    // Expansión smart-gcal sobre proto-átomos: el marcador Arc se resuelve
    // contra la tabla por defecto; una configuración de imagen no tiene
    // mapeo y falla sólo para su átomo.
    let science_dynamic = static_config.science_dynamic();
    let mapped = ProtoAtom::single(
        Some("Arc".to_string()),
        ProtoStep::smart_gcal(science_dynamic.clone(), SmartGcalType::Arc),
    );
    let unmapped = ProtoAtom::single(
        Some("Arc (imaging)".to_string()),
        ProtoStep::smart_gcal(static_config.acquisition_image(), SmartGcalType::Arc),
    );
    let science_step = ProtoAtom::single(
        Some("passthrough".to_string()),
        ProtoStep::science(science_dynamic, obs_domain::Offset::ZERO, GuideState::Enabled),
    );

    println!("\nExpansión smart-gcal:");
    let table: &obs_longslit::LongslitGcalTable = &DEFAULT_GCAL_TABLE;
    for result in expand_sequence(table, vec![mapped, unmapped, science_step].into_iter()) {
        match result {
            Ok(atom) => println!(
                "  ok  [{}] {} pasos",
                atom.description().unwrap_or("-"),
                atom.len()
            ),
            Err(e) => println!("  err {}", e),
        }
    }
}
