//! Merge cronológico k-vías de streams de eventos heterogéneos.
//!
//! Rol en el flujo:
//! - La historia persistida llega como cuatro streams tipados (visitas,
//!   eventos de secuencia, pasos, átomos) ordenados por llegada.
//! - Antes del replay hay que fusionarlos en un único stream ordenado por
//!   timestamp, sin materializar las entradas y sin perder ni duplicar nada.
//!
//! Desempate para timestamps idénticos: prioridad fija por stream de origen,
//! en el orden de los argumentos de [`merge_history`] (visitas primero, luego
//! eventos de secuencia, luego pasos, luego átomos). La regla es estable y
//! está cubierta por tests; afecta qué actualización de estado se aplica
//! primero cuando dos hechos comparten timestamp.

use chrono::{DateTime, Utc};
use std::iter::Peekable;

use obs_domain::{AtomRecord, SequenceEvent, StepRecord, VisitRecord};

/// Unión etiquetada de los cuatro tipos de hecho histórico.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent<D> {
    Visit(VisitRecord),
    Sequence(SequenceEvent),
    Step(StepRecord<D>),
    Atom(AtomRecord),
}

impl<D> HistoryEvent<D> {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryEvent::Visit(v) => v.created_at,
            HistoryEvent::Sequence(e) => e.created_at,
            HistoryEvent::Step(s) => s.created_at,
            HistoryEvent::Atom(a) => a.created_at,
        }
    }
}

/// Iterador de merge k-vías por timestamp.
///
/// Mantiene un `Peekable` por fuente y en cada `next` elige la cabeza con el
/// timestamp mínimo; a igualdad de timestamp gana la fuente de menor índice.
/// Streaming puro: nunca consume más de un elemento por delante por fuente.
pub struct MergeByTimestamp<I, F>
where
    I: Iterator,
{
    sources: Vec<Peekable<I>>,
    timestamp_of: F,
}

impl<I, F> Iterator for MergeByTimestamp<I, F>
where
    I: Iterator,
    F: Fn(&I::Item) -> DateTime<Utc>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let mut best: Option<(usize, DateTime<Utc>)> = None;
        for (idx, source) in self.sources.iter_mut().enumerate() {
            if let Some(item) = source.peek() {
                let ts = (self.timestamp_of)(item);
                match best {
                    // Desempate: estrictamente menor, así gana el índice bajo.
                    Some((_, best_ts)) if ts >= best_ts => {}
                    _ => best = Some((idx, ts)),
                }
            }
        }
        best.and_then(|(idx, _)| self.sources[idx].next())
    }
}

/// Fusiona un número arbitrario pero fijo de fuentes ya etiquetadas con un
/// mismo tipo de elemento, ordenando globalmente por el timestamp extraído.
///
/// Cada fuente debe venir ordenada por su propio timestamp; el resultado es
/// no-decreciente y preserva cada elemento exactamente una vez.
pub fn merge_by_timestamp<I, F>(sources: Vec<I>, timestamp_of: F) -> MergeByTimestamp<I, F>
where
    I: Iterator,
    F: Fn(&I::Item) -> DateTime<Utc>,
{
    MergeByTimestamp {
        sources: sources.into_iter().map(Iterator::peekable).collect(),
        timestamp_of,
    }
}

/// Punto de entrada de cuatro streams: etiqueta cada registro y fusiona.
///
/// El orden de los argumentos fija la prioridad de desempate: Visit >
/// SequenceEvent > Step > Atom.
pub fn merge_history<D: 'static>(
    visits: Vec<VisitRecord>,
    events: Vec<SequenceEvent>,
    steps: Vec<StepRecord<D>>,
    atoms: Vec<AtomRecord>,
) -> impl Iterator<Item = HistoryEvent<D>> {
    let sources: Vec<Box<dyn Iterator<Item = HistoryEvent<D>>>> = vec![
        Box::new(visits.into_iter().map(HistoryEvent::Visit)),
        Box::new(events.into_iter().map(HistoryEvent::Sequence)),
        Box::new(steps.into_iter().map(HistoryEvent::Step)),
        Box::new(atoms.into_iter().map(HistoryEvent::Atom)),
    ];
    merge_by_timestamp(sources, HistoryEvent::timestamp)
}
