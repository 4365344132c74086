use crate::models::{CaseDefinition, RawTheory, TheoryVerdict, ValidateOptions};

/// Scores a player theory against the solution graphs of a case.
///
/// Implementations are stateless between calls.
pub trait ITheoryValidator: Send + Sync {
    fn validate(
        &self,
        theory: &RawTheory,
        case: &CaseDefinition,
        options: &ValidateOptions,
    ) -> TheoryVerdict;
}
