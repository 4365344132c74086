mod case_definition;
mod events;
mod objective;
mod snapshot;
mod testimony;
mod theory;
mod verdict;

pub use case_definition::{CaseDefinition, CaseRewards, CaseStatus, SolutionRef};
pub use events::{CaseEvent, FxCue, InboundEvent};
pub use objective::{Objective, ObjectiveKind};
pub use snapshot::{CaseSnapshot, CasebookSnapshot, ObjectiveState};
pub use testimony::{
    contradiction_key, synthesize_fact_id, ContradictionRef, FactAssertion, RawStatement,
    Statement, Testimony, TestimonyContradiction, TestimonyPayload,
};
pub use theory::{
    connection_key, Connection, ConnectionType, NormalizedTheory, RawConnection, RawTheory,
    TheoryGraph,
};
pub use verdict::{InvalidConnection, RejectionReason, SolutionScore, TheoryVerdict, ValidateOptions};
