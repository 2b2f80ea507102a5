//! Generador de la secuencia de ciencia long-slit (ciclos ABBA con
//! calibraciones periódicas).
//!
//! La secuencia restante se organiza en bloques de ciclos de a lo sumo
//! `MAX_SCIENCE_BLOCK`, cada uno cerrado por un átomo de calibración
//! (arco smart-gcal). Si el tiempo de ciencia de un bloque excede
//! `GCAL_PERIOD`, se inserta una calibración adicional en el límite de ciclo
//! más cercano a la mitad del bloque. La numeración de átomos persiste entre
//! bloques y regeneraciones vía el `IndexTracker` compartido, así los ids se
//! mantienen estables.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use obs_core::constants::{GCAL_PERIOD, MAX_SCIENCE_BLOCK};
use obs_core::{
    estimate_total, Atom, AtomBuilder, EstimatorState, GeneratorError, IndexTracker,
    SequenceGenerator, SequenceIds,
};
use obs_domain::{
    GuideState, ObserveClass, ProtoAtom, ProtoStep, SequenceEvent, SequenceType, SmartGcalType,
    StepRecord, VisitRecord,
};

use crate::config::{LongslitDynamic, LongslitStatic};
use crate::cost::LongslitCost;

/// Ciclos completos requeridos: exposiciones pedidas sobre exposiciones por
/// ciclo, redondeado hacia arriba a un ciclo entero.
pub fn required_cycles(exposure_count: u32, exposures_per_cycle: u32) -> u32 {
    exposure_count.div_ceil(exposures_per_cycle)
}

/// Elemento del plan de generación: un ciclo (posiblemente parcial, si la
/// historia dejó un ciclo a medio ejecutar) o una calibración.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanItem {
    /// `skip` pasos iniciales del patrón ya ejecutados.
    Cycle { skip: usize },
    Calibration,
}

/// Generador de la sub-secuencia de ciencia. Valor inmutable.
#[derive(Debug, Clone)]
pub struct Science {
    ids: SequenceIds,
    tracker: IndexTracker,
    estimator: EstimatorState<LongslitDynamic>,
    static_config: LongslitStatic,
    cost: LongslitCost,
    cycle_steps: Vec<ProtoStep<LongslitDynamic>>,
    calibration: ProtoStep<LongslitDynamic>,
    completed_science: u32,
    last_calibration: Option<DateTime<Utc>>,
}

impl Science {
    /// Valida la configuración contra el modelo de costo: un solo ciclo no
    /// puede exceder el bloque máximo de ciencia, o la partición en bloques
    /// sería imposible.
    pub fn new(
        observation_namespace: Uuid,
        static_config: LongslitStatic,
    ) -> Result<Self, GeneratorError> {
        let science = static_config.science_dynamic();
        let cycle_steps: Vec<ProtoStep<LongslitDynamic>> = static_config
            .cycle_offsets()
            .into_iter()
            .map(|offset| ProtoStep::science(science.clone(), offset, GuideState::Enabled))
            .collect();
        let calibration = ProtoStep::smart_gcal(science, SmartGcalType::Arc);

        let cost = LongslitCost;
        let (_, _, cycle_duration) = estimate_total(
            &cost,
            &static_config,
            EstimatorState::empty(),
            &cycle_steps,
        );
        if cycle_duration > MAX_SCIENCE_BLOCK {
            return Err(GeneratorError::CycleTooLong {
                cycle_seconds: cycle_duration.as_secs(),
                max_seconds: MAX_SCIENCE_BLOCK.as_secs(),
            });
        }

        Ok(Science {
            ids: SequenceIds::new(observation_namespace, SequenceType::Science),
            tracker: IndexTracker::empty(),
            estimator: EstimatorState::empty(),
            static_config,
            cost,
            cycle_steps,
            calibration,
            completed_science: 0,
            last_calibration: None,
        })
    }

    pub fn completed_science(&self) -> u32 {
        self.completed_science
    }

    pub fn tracker(&self) -> IndexTracker {
        self.tracker
    }

    fn exposures_per_cycle(&self) -> u32 {
        self.cycle_steps.len() as u32
    }

    /// Duración nominal de un ciclo completo, desde memo vacío. Se usa para
    /// particionar en bloques; las duraciones reales de cada átomo se
    /// calculan después con el memo enhebrado.
    fn nominal_cycle_duration(&self) -> f64 {
        let (_, _, total) = estimate_total(
            &self.cost,
            &self.static_config,
            EstimatorState::empty(),
            &self.cycle_steps,
        );
        total.as_secs_f64()
    }

    /// ¿La última calibración quedó vieja respecto de `as_of`? Sin
    /// calibración previa no hay nada que refrescar: los arcos del primer
    /// bloque llegan en sus límites normales.
    fn calibration_is_stale(&self, as_of: DateTime<Utc>) -> bool {
        match self.last_calibration {
            None => false,
            Some(t) => {
                as_of.signed_duration_since(t) > TimeDelta::seconds(GCAL_PERIOD.as_secs() as i64)
            }
        }
    }

    /// Límite de ciclo más cercano a la mitad del bloque, para la
    /// calibración intermedia. Desempate: se prefiere incluir el ciclo del
    /// límite si el sobrante excede medio ciclo.
    fn mid_block_boundary(block_cycles: usize, cycle_secs: f64) -> usize {
        let half = block_cycles as f64 * cycle_secs / 2.0;
        let mut boundary = (half / cycle_secs).floor() as usize;
        let leftover = half - boundary as f64 * cycle_secs;
        if leftover > cycle_secs / 2.0 {
            boundary += 1;
        }
        boundary.clamp(1, block_cycles - 1)
    }

    /// Plan de la secuencia restante: ciclos agrupados en bloques, cada
    /// bloque cerrado por una calibración, con calibración intermedia si el
    /// bloque excede el período permitido.
    fn plan(&self, as_of: DateTime<Utc>) -> Vec<PlanItem> {
        let per_cycle = self.exposures_per_cycle();
        let total_required = required_cycles(self.static_config.exposure_count(), per_cycle)
            .saturating_mul(per_cycle);
        let remaining = total_required.saturating_sub(self.completed_science);
        if remaining == 0 {
            return Vec::new();
        }

        // Continuación de un ciclo a medio ejecutar.
        let partial_skip = (self.completed_science % per_cycle) as usize;
        let full_remaining = if partial_skip > 0 {
            remaining.saturating_sub(per_cycle - partial_skip as u32)
        } else {
            remaining
        };
        let full_cycles = full_remaining.div_ceil(per_cycle) as usize;
        let mut cycles: Vec<PlanItem> = Vec::new();
        if partial_skip > 0 {
            cycles.push(PlanItem::Cycle { skip: partial_skip });
        }
        cycles.extend(std::iter::repeat(PlanItem::Cycle { skip: 0 }).take(full_cycles));

        let cycle_secs = self.nominal_cycle_duration();
        let max_block_secs = MAX_SCIENCE_BLOCK.as_secs_f64();
        let cycles_per_block = (max_block_secs / cycle_secs).floor() as usize;
        // Invariante interno: el constructor garantiza que un ciclo entra en
        // un bloque; no avanzar aquí sería un bug del modelo, no mala
        // entrada.
        assert!(
            cycles_per_block >= 1,
            "science block generation cannot make forward progress: \
             cycle of {cycle_secs} s exceeds block of {max_block_secs} s"
        );

        let mut plan: Vec<PlanItem> = Vec::new();
        if self.calibration_is_stale(as_of) {
            plan.push(PlanItem::Calibration);
        }

        for block in cycles.chunks(cycles_per_block) {
            let block_secs = block.len() as f64 * cycle_secs;
            let mid = if block.len() > 1 && block_secs > GCAL_PERIOD.as_secs_f64() {
                Some(Self::mid_block_boundary(block.len(), cycle_secs))
            } else {
                None
            };
            for (i, item) in block.iter().enumerate() {
                if mid == Some(i) {
                    plan.push(PlanItem::Calibration);
                }
                plan.push(*item);
            }
            plan.push(PlanItem::Calibration);
        }
        plan
    }
}

impl SequenceGenerator<LongslitDynamic> for Science {
    fn sequence_type(&self) -> SequenceType {
        SequenceType::Science
    }

    fn record_visit(mut self, _visit: &VisitRecord) -> Self {
        // La secuencia recomienza: el memo del estimador vuelve a vacío. El
        // progreso de ciencia y el tracker se conservan.
        self.estimator = EstimatorState::empty();
        self
    }

    fn record_sequence_event(self, _event: &SequenceEvent) -> Self {
        self
    }

    fn record_step(mut self, step: &StepRecord<LongslitDynamic>) -> Self {
        if !step.belongs_to(SequenceType::Science) {
            return self;
        }
        self.tracker = self.tracker.record_step(step);
        self.estimator = self.estimator.next(&step.proto);
        if step.is_successfully_completed() {
            match step.proto.observe_class {
                ObserveClass::Science => self.completed_science += 1,
                ObserveClass::NightCal | ObserveClass::DayCal => {
                    self.last_calibration = Some(step.created_at);
                }
                ObserveClass::Acquisition => {}
            }
        }
        self
    }

    fn generate(&self, as_of: DateTime<Utc>) -> Box<dyn Iterator<Item = Atom<LongslitDynamic>> + '_> {
        let plan = self.plan(as_of);
        let builder = AtomBuilder::new(self.ids, &self.cost, &self.static_config);
        let base_index = self.tracker.next_atom_index();
        let first_step_index = self.tracker.steps_in_current_atom();
        let cycle_steps = self.cycle_steps.clone();
        let calibration = self.calibration.clone();

        let iter = plan.into_iter().scan(
            (self.estimator.clone(), base_index),
            move |(memo, index), item| {
                let (proto, step_base) = match item {
                    PlanItem::Cycle { skip } => {
                        let steps: Vec<_> = cycle_steps[skip..].to_vec();
                        let proto = ProtoAtom::from_vec(
                            Some("ABBA cycle".to_string()),
                            steps,
                        )
                        .ok()?;
                        // Sólo la continuación de un ciclo parcial (a lo sumo
                        // una por plan) arranca en un índice de paso no nulo.
                        let step_base = if skip > 0 { first_step_index } else { 0 };
                        (proto, step_base)
                    }
                    PlanItem::Calibration => (
                        ProtoAtom::single(Some("Arc".to_string()), calibration.clone()),
                        0,
                    ),
                };
                let (next_memo, atom) = builder.build(memo.clone(), *index, step_base, &proto);
                *memo = next_memo;
                *index += 1;
                Some(atom)
            },
        );
        Box::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_cycles_rounds_up_to_whole_cycles() {
        assert_eq!(required_cycles(10, 3), 4);
        assert_eq!(required_cycles(12, 4), 3);
        assert_eq!(required_cycles(1, 4), 1);
    }

    #[test]
    fn mid_block_boundary_rounds_to_nearest_cycle() {
        // 5 ciclos de 100 s: mitad en 250 s, sobrante 50 s = medio ciclo →
        // no se incluye el ciclo del límite.
        assert_eq!(Science::mid_block_boundary(5, 100.0), 2);
        // 4 ciclos: mitad exacta en el límite 2.
        assert_eq!(Science::mid_block_boundary(4, 100.0), 2);
        // 2 ciclos: el clamp evita calibrar antes del primer ciclo.
        assert_eq!(Science::mid_block_boundary(2, 100.0), 1);
    }
}
