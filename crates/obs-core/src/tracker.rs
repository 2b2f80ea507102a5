//! Conteo corrido de átomos y pasos consumidos.
//!
//! El `IndexTracker` es el único estado que determina el próximo índice de
//! átomo/paso a acuñar. Avanza replayando `StepRecord`s: un cambio de
//! `atom_id` marca el comienzo de un átomo nuevo. No se reinicia en límites
//! de visita — los índices (y por lo tanto los ids) nunca se reutilizan.

use obs_domain::{AtomId, StepRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTracker {
    atoms_seen: u32,
    steps_in_current: u32,
    total_steps: u32,
    current_atom: Option<AtomId>,
}

impl IndexTracker {
    pub fn empty() -> Self {
        IndexTracker {
            atoms_seen: 0,
            steps_in_current: 0,
            total_steps: 0,
            current_atom: None,
        }
    }

    /// Actualización funcional por paso replayado (exitoso o no).
    pub fn record_step<D>(&self, step: &StepRecord<D>) -> Self {
        if self.current_atom == Some(step.atom_id) {
            IndexTracker {
                steps_in_current: self.steps_in_current + 1,
                total_steps: self.total_steps + 1,
                ..*self
            }
        } else {
            IndexTracker {
                atoms_seen: self.atoms_seen + 1,
                steps_in_current: 1,
                total_steps: self.total_steps + 1,
                current_atom: Some(step.atom_id),
            }
        }
    }

    /// Índice (base 0) del próximo átomo a acuñar. Si hay un átomo a medio
    /// ejecutar, sus pasos restantes re-emergen bajo este índice fresco.
    pub fn next_atom_index(&self) -> u32 {
        self.atoms_seen
    }

    /// Pasos ya consumidos del átomo en curso: índice del primer paso del
    /// átomo de continuación.
    pub fn steps_in_current_atom(&self) -> u32 {
        self.steps_in_current
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }
}

impl Default for IndexTracker {
    fn default() -> Self {
        IndexTracker::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use obs_domain::{
        GuideState, Offset, ProtoStep, SequenceType, StepExecutionState, StepId,
    };
    use uuid::Uuid;

    fn step(atom: AtomId) -> StepRecord<u8> {
        StepRecord {
            step_id: StepId(Uuid::new_v4()),
            atom_id: atom,
            sequence_type: SequenceType::Science,
            proto: ProtoStep::science(0u8, Offset::ZERO, GuideState::Enabled),
            execution_state: StepExecutionState::Completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn atom_boundary_advances_atom_count() {
        let a = AtomId(Uuid::new_v4());
        let b = AtomId(Uuid::new_v4());
        let t = IndexTracker::empty()
            .record_step(&step(a))
            .record_step(&step(a))
            .record_step(&step(b));
        assert_eq!(t.next_atom_index(), 2);
        assert_eq!(t.steps_in_current_atom(), 1);
        assert_eq!(t.total_steps(), 3);
    }

    #[test]
    fn empty_tracker_mints_from_zero() {
        let t = IndexTracker::empty();
        assert_eq!(t.next_atom_index(), 0);
        assert_eq!(t.steps_in_current_atom(), 0);
    }
}
