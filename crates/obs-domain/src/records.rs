//! Hechos históricos append-only del sistema de ejecución.
//!
//! Rol en el flujo:
//! - El sistema circundante persiste visitas, eventos de secuencia, átomos y
//!   pasos ejecutados; el motor los consume como streams ordenados por llegada
//!   y los re-ordena por timestamp (merge cronológico).
//! - Replay de estos registros reconstruye el estado de los generadores sin
//!   estructuras mutables compartidas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{AtomId, StepId};
use crate::step::ProtoStep;

/// Sub-secuencia a la que pertenece un átomo o paso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    Acquisition,
    Science,
}

/// Estado de ejecución registrado para un paso.
///
/// Sólo `Completed` avanza la máquina de estados discreta; cualquier otro
/// estado se absorbe como contabilidad (índices y estimador).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepExecutionState {
    Ongoing,
    Completed,
    Failed,
    Aborted,
}

/// Límite de visita: el instrumento fue apuntado/configurado de nuevo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub visit_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Comando a nivel de secuencia emitido durante una visita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceCommand {
    Start,
    Stop,
    Abort,
}

/// Evento de secuencia (start/stop/abort) con su momento de recepción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEvent {
    pub event_id: Uuid,
    pub visit_id: Uuid,
    pub command: SequenceCommand,
    pub created_at: DateTime<Utc>,
}

/// Apertura de un átomo durante la ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub atom_id: AtomId,
    pub visit_id: Uuid,
    pub sequence_type: SequenceType,
    pub created_at: DateTime<Utc>,
}

/// Un paso ejecutado (o en ejecución), con el contenido que se ejecutó.
///
/// `atom_id` enlaza el paso con su átomo: el `IndexTracker` detecta límites
/// de átomo observando cambios de este campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord<D> {
    pub step_id: StepId,
    pub atom_id: AtomId,
    pub sequence_type: SequenceType,
    pub proto: ProtoStep<D>,
    pub execution_state: StepExecutionState,
    pub created_at: DateTime<Utc>,
}

impl<D> StepRecord<D> {
    pub fn is_successfully_completed(&self) -> bool {
        self.execution_state == StepExecutionState::Completed
    }

    pub fn belongs_to(&self, sequence_type: SequenceType) -> bool {
        self.sequence_type == sequence_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::{GuideState, Offset};
    use chrono::Utc;

    #[test]
    fn step_record_round_trips_through_json() {
        let record = StepRecord {
            step_id: StepId(Uuid::new_v4()),
            atom_id: AtomId(Uuid::new_v4()),
            sequence_type: SequenceType::Science,
            proto: ProtoStep::science(7u8, Offset::from_uas(0, 15_000_000), GuideState::Enabled),
            execution_state: StepExecutionState::Completed,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).expect("records serialize to JSON");
        let back: StepRecord<u8> = serde_json::from_str(&json).expect("and deserialize back");
        assert_eq!(back, record);
    }

    #[test]
    fn sequence_event_round_trips_through_json() {
        let event = SequenceEvent {
            event_id: Uuid::new_v4(),
            visit_id: Uuid::new_v4(),
            command: SequenceCommand::Abort,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).expect("events serialize to JSON");
        let back: SequenceEvent = serde_json::from_str(&json).expect("and deserialize back");
        assert_eq!(back, event);
    }
}
