//! Derivación determinista de identificadores de átomos y pasos.
//!
//! Los ids se derivan de un namespace UUID fijo más el índice de átomo y de
//! paso — nunca de un hash del contenido. Invariante: la misma tupla
//! (namespace, índice de átomo, índice de paso) produce siempre el mismo id,
//! incluso tras regeneraciones donde los átomos ya ejecutados fueron
//! filtrados. Por eso los índices se llevan explícitos (ver `IndexTracker`)
//! en vez de recomputarse desde la posición en la lista.

use uuid::Uuid;

use obs_domain::{AtomId, SequenceType, StepId};

/// Namespace de una sub-secuencia (adquisición o ciencia) de una observación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceIds {
    namespace: Uuid,
    sequence_type: SequenceType,
}

impl SequenceIds {
    /// Deriva el namespace de la sub-secuencia a partir del namespace de la
    /// observación y la etiqueta del tipo de secuencia.
    pub fn new(observation_namespace: Uuid, sequence_type: SequenceType) -> Self {
        let label: &[u8] = match sequence_type {
            SequenceType::Acquisition => b"acquisition",
            SequenceType::Science => b"science",
        };
        SequenceIds {
            namespace: Uuid::new_v5(&observation_namespace, label),
            sequence_type,
        }
    }

    pub fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }

    pub fn atom_id(&self, atom_index: u32) -> AtomId {
        AtomId(Uuid::new_v5(
            &self.namespace,
            format!("atom/{atom_index}").as_bytes(),
        ))
    }

    pub fn step_id(&self, atom_index: u32, step_index: u32) -> StepId {
        StepId(Uuid::new_v5(
            &self.namespace,
            format!("atom/{atom_index}/step/{step_index}").as_bytes(),
        ))
    }
}
