// obs-domain library entry point
pub mod error;
pub mod ids;
pub mod offset;
pub mod records;
pub mod step;

pub use error::DomainError;
pub use ids::{AtomId, StepId};
pub use offset::{GuideState, Offset};
pub use records::{
    AtomRecord, SequenceCommand, SequenceEvent, SequenceType, StepExecutionState, StepRecord,
    VisitRecord,
};
pub use step::{
    Breakpoint, GcalConfig, GcalLamp, GcalShutter, ObserveClass, ProtoAtom, ProtoStep,
    SmartGcalType, StepConfig,
};
