//! obs-longslit: modo long-slit concreto sobre el motor obs-core
pub mod acquisition;
pub mod config;
pub mod cost;
pub mod science;
pub mod smartgcal;

pub use acquisition::{Acquisition, AcquisitionNode};
pub use config::{Filter, Fpu, Grating, LongslitDynamic, LongslitStatic, ReadoutMode};
pub use cost::LongslitCost;
pub use science::{required_cycles, Science};
pub use smartgcal::{LongslitGcalTable, LongslitKey, DEFAULT_GCAL_TABLE};
