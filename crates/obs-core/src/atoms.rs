//! Construcción de átomos con identidad y estimación agregada.
//!
//! El Atom Builder toma un `ProtoAtom`, el índice de átomo y el índice del
//! primer paso, y produce un [`Atom`] realizado: id determinista, pasos con
//! sus propios ids y duraciones, y la duración total. El memo del estimador
//! entra y sale para enhebrarse en el átomo siguiente.

use std::time::Duration;

use obs_domain::{AtomId, ProtoAtom, ProtoStep, SequenceType, StepId};

use crate::estimate::{estimate_total, EstimatorState, TimeEstimateCalculator};
use crate::ids::SequenceIds;

/// Paso realizado: id estable, contenido y duración estimada.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<D> {
    pub id: StepId,
    pub proto: ProtoStep<D>,
    pub estimate: Duration,
}

/// Átomo realizado: unidad indivisible de ejecución con id estable.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom<D> {
    pub id: AtomId,
    pub description: Option<String>,
    pub sequence_type: SequenceType,
    pub steps: Vec<Step<D>>,
    pub estimate: Duration,
}

/// Constructor de átomos para una sub-secuencia.
///
/// Invariante: dos llamadas a [`AtomBuilder::build`] con idénticos
/// (namespace, índice de átomo, índice de primer paso, pasos) producen ids
/// bit a bit idénticos. Es lo que permite a los clientes retener referencias
/// estables entre regeneraciones, aunque los átomos ya ejecutados no se
/// vuelvan a emitir.
pub struct AtomBuilder<'a, S, D> {
    ids: SequenceIds,
    calculator: &'a dyn TimeEstimateCalculator<S, D>,
    static_config: &'a S,
}

impl<'a, S, D: Clone> AtomBuilder<'a, S, D> {
    pub fn new(
        ids: SequenceIds,
        calculator: &'a dyn TimeEstimateCalculator<S, D>,
        static_config: &'a S,
    ) -> Self {
        AtomBuilder {
            ids,
            calculator,
            static_config,
        }
    }

    pub fn ids(&self) -> &SequenceIds {
        &self.ids
    }

    /// Construye el átomo y devuelve el memo actualizado del estimador.
    pub fn build(
        &self,
        state: EstimatorState<D>,
        atom_index: u32,
        first_step_index: u32,
        proto: &ProtoAtom<ProtoStep<D>>,
    ) -> (EstimatorState<D>, Atom<D>) {
        let (next_state, durations, total) =
            estimate_total(self.calculator, self.static_config, state, proto.steps());

        let steps = proto
            .steps()
            .iter()
            .zip(durations)
            .enumerate()
            .map(|(i, (step, estimate))| Step {
                id: self.ids.step_id(atom_index, first_step_index + i as u32),
                proto: step.clone(),
                estimate,
            })
            .collect();

        let atom = Atom {
            id: self.ids.atom_id(atom_index),
            description: proto.description().map(str::to_string),
            sequence_type: self.ids.sequence_type(),
            steps,
            estimate: total,
        };
        (next_state, atom)
    }
}
