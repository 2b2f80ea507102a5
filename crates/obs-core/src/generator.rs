//! Contrato de los generadores de secuencia por instrumento.
//!
//! Un generador es un valor: cada hecho replayado devuelve un generador
//! nuevo (disciplina de actualización funcional), y `generate` puede
//! invocarse en cualquier punto para producir la secuencia restante.

use chrono::{DateTime, Utc};

use obs_domain::{SequenceEvent, SequenceType, StepRecord, VisitRecord};

use crate::atoms::Atom;

/// Máquina de estados de una sub-secuencia (adquisición o ciencia).
///
/// El replay nunca falla: pasos inesperados o fallidos se absorben como
/// contabilidad (índices y estimador) sin afectar la generación futura.
pub trait SequenceGenerator<D>: Sized {
    /// Sub-secuencia que atiende este generador.
    fn sequence_type(&self) -> SequenceType;

    /// Límite de visita: típicamente reinicia marcadores transitorios de
    /// progreso, pero no el tracker de índices.
    fn record_visit(self, visit: &VisitRecord) -> Self;

    /// Evento de secuencia (start/stop/abort).
    fn record_sequence_event(self, event: &SequenceEvent) -> Self;

    /// Paso replayado. No-op si pertenece a la otra sub-secuencia; avanza
    /// tracker y estimador para todo paso propio, y el estado discreto sólo
    /// en pasos completados con éxito.
    fn record_step(self, step: &StepRecord<D>) -> Self;

    /// Secuencia restante de átomos, perezosa y posiblemente infinita.
    ///
    /// Reiniciable: cada llamada recomputa desde el estado actual, sin
    /// efectos secundarios; no retoma un consumo parcial previo.
    fn generate(&self, as_of: DateTime<Utc>) -> Box<dyn Iterator<Item = Atom<D>> + '_>;
}
