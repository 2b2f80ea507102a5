//! Tabla smart-gcal del espectrógrafo long-slit.
//!
//! Mapea (red, filtro, rendija) a las configuraciones de lámpara concretas
//! que reemplazan a los marcadores `SmartGcal`. Respaldo en memoria con una
//! instancia global perezosa de defaults; el servicio real es un colaborador
//! externo con la misma interfaz.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use obs_core::SmartGcalLookup;
use obs_domain::{GcalConfig, GcalLamp, GcalShutter, SmartGcalType};

use crate::config::{Filter, Fpu, Grating, LongslitDynamic};

/// Clave de búsqueda derivada de la configuración dinámica actual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongslitKey {
    pub grating: Option<Grating>,
    pub filter: Option<Filter>,
    pub fpu: Option<Fpu>,
}

impl LongslitKey {
    pub fn of(instrument: &LongslitDynamic) -> Self {
        LongslitKey {
            grating: instrument.grating,
            filter: instrument.filter,
            fpu: instrument.fpu,
        }
    }
}

/// Tabla en memoria, extensible en tests.
#[derive(Debug, Clone, Default)]
pub struct LongslitGcalTable {
    entries: HashMap<(SmartGcalType, LongslitKey), Vec<GcalConfig>>,
}

impl LongslitGcalTable {
    pub fn empty() -> Self {
        LongslitGcalTable {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, kind: SmartGcalType, key: LongslitKey, configs: Vec<GcalConfig>) {
        self.entries.insert((kind, key), configs);
    }

    /// Defaults: un arco (obturador cerrado) y un flat (obturador abierto)
    /// para cada combinación espectroscópica red × filtro × rendija.
    pub fn with_defaults() -> Self {
        let arc = vec![GcalConfig {
            lamp: GcalLamp::ArcLamp,
            shutter: GcalShutter::Closed,
        }];
        let flat = vec![GcalConfig {
            lamp: GcalLamp::FlatLamp,
            shutter: GcalShutter::Open,
        }];

        let mut table = LongslitGcalTable::empty();
        for grating in Grating::ALL {
            for fpu in Fpu::ALL {
                let mut filters: Vec<Option<Filter>> =
                    Filter::ALL.iter().copied().map(Some).collect();
                filters.push(None);
                for filter in filters {
                    let key = LongslitKey {
                        grating: Some(grating),
                        filter,
                        fpu: Some(fpu),
                    };
                    table.insert(SmartGcalType::Arc, key, arc.clone());
                    table.insert(SmartGcalType::Flat, key, flat.clone());
                }
            }
        }
        table
    }
}

/// Tabla global por defecto, evaluada una sola vez.
pub static DEFAULT_GCAL_TABLE: Lazy<LongslitGcalTable> = Lazy::new(LongslitGcalTable::with_defaults);

impl SmartGcalLookup<LongslitDynamic> for LongslitGcalTable {
    fn lookup(&self, kind: SmartGcalType, instrument: &LongslitDynamic) -> Option<Vec<GcalConfig>> {
        self.entries
            .get(&(kind, LongslitKey::of(instrument)))
            .cloned()
    }

    fn key_description(&self, kind: SmartGcalType, instrument: &LongslitDynamic) -> String {
        let key = LongslitKey::of(instrument);
        format!(
            "{kind:?} (grating: {:?}, filter: {:?}, fpu: {:?})",
            key.grating, key.filter, key.fpu
        )
    }
}
