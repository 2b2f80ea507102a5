//! obs-core: Motor de generación de secuencias determinista
pub mod atoms;
pub mod constants;
pub mod errors;
pub mod estimate;
pub mod execution;
pub mod generator;
pub mod ids;
pub mod merge;
pub mod offsets;
pub mod smartgcal;
pub mod tracker;

pub use atoms::{Atom, AtomBuilder, Step};
pub use errors::{GeneratorError, SmartGcalError};
pub use estimate::{estimate_total, EstimatorState, SetupTime, TimeEstimateCalculator};
pub use execution::{execution_config, ExecutionConfig, ExecutionState};
pub use generator::SequenceGenerator;
pub use ids::SequenceIds;
pub use merge::{merge_by_timestamp, merge_history, HistoryEvent};
pub use offsets::OffsetGenerator;
pub use smartgcal::{expand_atom, expand_sequence, expand_step, SmartGcalLookup};
pub use tracker::IndexTracker;
