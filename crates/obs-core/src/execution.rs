//! Orquestador: de la historia persistida a la configuración de ejecución.
//!
//! Fusiona los cuatro streams históricos en orden de timestamp, pliega cada
//! evento en ambos generadores de forma independiente (cada uno ignora lo
//! que pertenece a la otra sub-secuencia) y deriva el estado global de
//! ejecución. Terminado el fold, `acquisition`/`science` invocan el
//! `generate` de cada generador para producir las secuencias restantes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use obs_domain::{AtomRecord, SequenceEvent, StepRecord, VisitRecord};

use crate::atoms::Atom;
use crate::estimate::SetupTime;
use crate::generator::SequenceGenerator;
use crate::merge::{merge_history, HistoryEvent};

/// Estado global de ejecución de la observación.
///
/// Pasa de `NotStarted` a `Ongoing` con el primer hecho histórico de
/// cualquier tipo y nunca revierte. No hay estado terminal en esta capa: la
/// completitud es propiedad de la lógica de conteo externa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    NotStarted,
    Ongoing,
}

/// Resultado del fold: configuración estática, ambos generadores ya
/// alimentados con la historia, y el estado derivado.
///
/// Las secuencias se exponen como iteradores perezosos y reiniciables; el
/// consumidor decide cuántos átomos extraer.
#[derive(Debug)]
pub struct ExecutionConfig<S, D, A, C>
where
    A: SequenceGenerator<D>,
    C: SequenceGenerator<D>,
{
    static_config: S,
    setup: SetupTime,
    acquisition: A,
    science: C,
    state: ExecutionState,
    _dynamic: PhantomData<D>,
}

impl<S, D, A, C> ExecutionConfig<S, D, A, C>
where
    A: SequenceGenerator<D>,
    C: SequenceGenerator<D>,
{
    pub fn static_config(&self) -> &S {
        &self.static_config
    }

    pub fn setup(&self) -> SetupTime {
        self.setup
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.state
    }

    /// Secuencia de adquisición restante al momento `as_of`.
    pub fn acquisition(&self, as_of: DateTime<Utc>) -> Box<dyn Iterator<Item = Atom<D>> + '_> {
        self.acquisition.generate(as_of)
    }

    /// Secuencia de ciencia restante al momento `as_of`.
    pub fn science(&self, as_of: DateTime<Utc>) -> Box<dyn Iterator<Item = Atom<D>> + '_> {
        self.science.generate(as_of)
    }
}

/// Fold completo de la historia en ambos generadores.
///
/// Los registros de átomo participan del merge (y del flip de estado) pero
/// no alteran a los generadores: el tracker de índices detecta los límites
/// de átomo por los `StepRecord`s mismos.
pub fn execution_config<S, D: 'static, A, C>(
    static_config: S,
    setup: SetupTime,
    acquisition: A,
    science: C,
    visits: Vec<VisitRecord>,
    events: Vec<SequenceEvent>,
    steps: Vec<StepRecord<D>>,
    atoms: Vec<AtomRecord>,
) -> ExecutionConfig<S, D, A, C>
where
    A: SequenceGenerator<D>,
    C: SequenceGenerator<D>,
{
    let mut acq = acquisition;
    let mut sci = science;
    let mut state = ExecutionState::NotStarted;

    for event in merge_history(visits, events, steps, atoms) {
        state = ExecutionState::Ongoing;
        match event {
            HistoryEvent::Visit(v) => {
                acq = acq.record_visit(&v);
                sci = sci.record_visit(&v);
            }
            HistoryEvent::Sequence(e) => {
                acq = acq.record_sequence_event(&e);
                sci = sci.record_sequence_event(&e);
            }
            HistoryEvent::Step(s) => {
                acq = acq.record_step(&s);
                sci = sci.record_step(&s);
            }
            HistoryEvent::Atom(_) => {}
        }
    }

    ExecutionConfig {
        static_config,
        setup,
        acquisition: acq,
        science: sci,
        state,
        _dynamic: PhantomData,
    }
}
