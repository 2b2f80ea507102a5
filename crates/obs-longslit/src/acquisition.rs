//! Máquina de estados de adquisición long-slit (patrón de 3 pasos).
//!
//! Estados: `Init` (absorbiendo historia anterior al marcador de reinicio) →
//! `ExpectImage` → `ExpectSlit` → `ExpectFine`. Cada estado avanza sólo ante
//! un paso *completado con éxito* cuyo contenido coincide con el esperado;
//! cualquier otro paso se registra únicamente para contabilidad (índices y
//! estimador). Llegar a `ExpectFine { initial: false }` significa que empezó
//! el lazo de ajuste fino: `generate` emite desde entonces sólo el paso fino
//! repetido como átomo de un paso, indefinidamente.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use obs_core::{
    Atom, AtomBuilder, EstimatorState, IndexTracker, SequenceGenerator, SequenceIds,
};
use obs_domain::{
    Offset, ProtoAtom, ProtoStep, SequenceCommand, SequenceEvent, SequenceType, StepRecord,
    VisitRecord,
};

use crate::config::{LongslitDynamic, LongslitStatic};
use crate::cost::LongslitCost;

/// Estado discreto de la máquina de adquisición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionNode {
    /// Aún alcanzando el punto de reinicio: pasos con timestamp anterior al
    /// marcador se absorben sin transición.
    Init { reset_marker: Option<DateTime<Utc>> },
    ExpectImage,
    ExpectSlit,
    ExpectFine { initial: bool },
}

/// Generador de la sub-secuencia de adquisición. Valor inmutable: cada hecho
/// replayado devuelve un generador nuevo.
#[derive(Debug, Clone)]
pub struct Acquisition {
    ids: SequenceIds,
    tracker: IndexTracker,
    estimator: EstimatorState<LongslitDynamic>,
    node: AcquisitionNode,
    static_config: LongslitStatic,
    cost: LongslitCost,
    image: ProtoStep<LongslitDynamic>,
    slit: ProtoStep<LongslitDynamic>,
    fine: ProtoStep<LongslitDynamic>,
}

impl Acquisition {
    pub fn new(observation_namespace: Uuid, static_config: LongslitStatic) -> Self {
        let image = ProtoStep::acquisition(static_config.acquisition_image(), Offset::ZERO);
        let slit = ProtoStep::acquisition(static_config.acquisition_slit(), Offset::ZERO);
        let fine = ProtoStep::acquisition(static_config.acquisition_fine(), Offset::ZERO);
        Acquisition {
            ids: SequenceIds::new(observation_namespace, SequenceType::Acquisition),
            tracker: IndexTracker::empty(),
            estimator: EstimatorState::empty(),
            node: AcquisitionNode::Init { reset_marker: None },
            static_config,
            cost: LongslitCost,
            image,
            slit,
            fine,
        }
    }

    pub fn node(&self) -> AcquisitionNode {
        self.node
    }

    pub fn tracker(&self) -> IndexTracker {
        self.tracker
    }

    /// Reinicio del progreso transitorio; el tracker de índices se conserva
    /// (los ids nunca se reutilizan).
    fn reset(mut self, marker: DateTime<Utc>) -> Self {
        self.node = AcquisitionNode::Init {
            reset_marker: Some(marker),
        };
        self.estimator = EstimatorState::empty();
        self
    }

    fn transition(&self, node: AcquisitionNode, step: &StepRecord<LongslitDynamic>) -> AcquisitionNode {
        let matched = |expected: &ProtoStep<LongslitDynamic>| {
            step.is_successfully_completed() && step.proto == *expected
        };
        match node {
            AcquisitionNode::Init { reset_marker } => {
                if let Some(marker) = reset_marker {
                    if step.created_at < marker {
                        return AcquisitionNode::Init { reset_marker };
                    }
                }
                // Alcanzado el punto de reinicio: re-despachar al primer
                // estado esperado.
                self.transition(AcquisitionNode::ExpectImage, step)
            }
            AcquisitionNode::ExpectImage => {
                if matched(&self.image) {
                    AcquisitionNode::ExpectSlit
                } else {
                    node
                }
            }
            AcquisitionNode::ExpectSlit => {
                if matched(&self.slit) {
                    AcquisitionNode::ExpectFine { initial: true }
                } else {
                    node
                }
            }
            AcquisitionNode::ExpectFine { .. } => {
                if matched(&self.fine) {
                    AcquisitionNode::ExpectFine { initial: false }
                } else {
                    node
                }
            }
        }
    }

    /// Pasos restantes del átomo en curso según el estado discreto, como
    /// (primero, resto) para garantizar no-vacuidad por construcción. `None`
    /// en el estado terminal (sólo queda el lazo de ajuste fino).
    fn remaining_steps(
        &self,
    ) -> Option<(ProtoStep<LongslitDynamic>, Vec<ProtoStep<LongslitDynamic>>)> {
        match self.node {
            AcquisitionNode::Init { .. } | AcquisitionNode::ExpectImage => Some((
                self.image.clone(),
                vec![self.slit.clone(), self.fine.clone()],
            )),
            AcquisitionNode::ExpectSlit => {
                Some((self.slit.clone(), vec![self.fine.clone()]))
            }
            AcquisitionNode::ExpectFine { initial: true } => Some((self.fine.clone(), Vec::new())),
            AcquisitionNode::ExpectFine { initial: false } => None,
        }
    }
}

impl SequenceGenerator<LongslitDynamic> for Acquisition {
    fn sequence_type(&self) -> SequenceType {
        SequenceType::Acquisition
    }

    fn record_visit(self, visit: &VisitRecord) -> Self {
        let marker = visit.created_at;
        self.reset(marker)
    }

    fn record_sequence_event(self, event: &SequenceEvent) -> Self {
        match event.command {
            SequenceCommand::Stop | SequenceCommand::Abort => {
                let marker = event.created_at;
                self.reset(marker)
            }
            SequenceCommand::Start => self,
        }
    }

    fn record_step(mut self, step: &StepRecord<LongslitDynamic>) -> Self {
        if !step.belongs_to(SequenceType::Acquisition) {
            return self;
        }
        self.tracker = self.tracker.record_step(step);
        self.estimator = self.estimator.next(&step.proto);
        self.node = self.transition(self.node, step);
        self
    }

    fn generate(&self, _as_of: DateTime<Utc>) -> Box<dyn Iterator<Item = Atom<LongslitDynamic>> + '_> {
        let builder = AtomBuilder::new(self.ids, &self.cost, &self.static_config);
        let base_index = self.tracker.next_atom_index();

        // El patrón completo se describe como adquisición inicial; un resto
        // a mitad de patrón (tras replay) se distingue como continuación.
        let description = match self.node {
            AcquisitionNode::Init { .. } | AcquisitionNode::ExpectImage => "Initial Acquisition",
            _ => "Acquisition Continuation",
        };
        let (head, state, tail_base) = match self.remaining_steps() {
            None => (None, self.estimator.clone(), base_index),
            Some((first, rest)) => {
                let proto = ProtoAtom::new(Some(description.to_string()), first, rest);
                let first_step_index = self.tracker.steps_in_current_atom();
                let (state, atom) =
                    builder.build(self.estimator.clone(), base_index, first_step_index, &proto);
                (Some(atom), state, base_index + 1)
            }
        };

        let fine = self.fine.clone();
        let tail = (0u32..).scan(state, move |memo, i| {
            let proto = ProtoAtom::single(Some("Fine Adjustments".to_string()), fine.clone());
            let (next_memo, atom) = builder.build(memo.clone(), tail_base + i, 0, &proto);
            *memo = next_memo;
            Some(atom)
        });

        Box::new(head.into_iter().chain(tail))
    }
}
