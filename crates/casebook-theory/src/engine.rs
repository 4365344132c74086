//! TheoryValidator, the ITheoryValidator implementation. Normalizes a player theory,
//! scores it against every solution, and explains the result.

use casebook_core::config::{is_threshold, ValidatorConfig};
use casebook_core::models::{CaseDefinition, RawTheory, TheoryVerdict, ValidateOptions};
use casebook_core::traits::ITheoryValidator;

use crate::feedback::feedback_message;
use crate::hints::{build_hints, HintInputs};
use crate::normalize::{normalize, Universe};
use crate::scoring::{best_match, score_solution};

/// Stateless theory checker. Holds only its scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct TheoryValidator {
    config: ValidatorConfig,
}

impl TheoryValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Threshold precedence: caller, then case, then configured default.
    /// Out-of-range values are ignored with a warning.
    pub fn resolve_threshold(&self, case: &CaseDefinition, options: &ValidateOptions) -> f64 {
        let case_id = case.id.as_deref().unwrap_or_default();
        let usable = |source: &'static str, value: Option<f64>| {
            value.filter(|t| {
                let ok = is_threshold(*t);
                if !ok {
                    tracing::warn!(case_id, source, threshold = *t, "ignoring out-of-range accuracy threshold");
                }
                ok
            })
        };
        usable("options", options.threshold)
            .or_else(|| usable("case", case.accuracy_threshold))
            .unwrap_or(self.config.default_threshold)
    }

    /// Check `theory` against every solution graph of `case`.
    pub fn validate(
        &self,
        theory: &RawTheory,
        case: &CaseDefinition,
        options: &ValidateOptions,
    ) -> TheoryVerdict {
        let case_id = case.id.as_deref().unwrap_or_default();
        let _span = tracing::debug_span!("casebook.theory.validate", case_id).entered();

        let threshold = self.resolve_threshold(case, options);
        let solutions = case.solution_graphs();
        let universe = if solutions.is_empty() {
            Universe::unrestricted()
        } else {
            Universe::for_case(case, options)
        };
        let normalized = normalize(theory, &universe);

        let best = best_match(
            solutions
                .iter()
                .map(|s| score_solution(s, &normalized.theory, &self.config)),
        );

        let Some(mut best) = best else {
            // No deduction gameplay for this case: any theory is accepted.
            tracing::debug!(case_id, "case has no solution graph; theory accepted");
            return TheoryVerdict {
                valid: true,
                accuracy: 1.0,
                threshold,
                feedback: feedback_message(true, 1.0, &[], &[]),
                hints: Vec::new(),
                matched_connections: Vec::new(),
                missing_connections: Vec::new(),
                extra_connections: Vec::new(),
                invalid_connections: normalized.invalid,
                missing_nodes: Vec::new(),
                unknown_nodes: normalized.unknown_nodes,
                solution_id: None,
                score: None,
                normalized_theory: normalized.theory,
            };
        };

        let penalty = self.config.invalid_penalty(normalized.invalid.len());
        best.score.penalty = penalty;
        let accuracy = (best.accuracy() - penalty).clamp(0.0, 1.0);
        let valid = accuracy >= threshold && normalized.invalid.is_empty();

        let mut clue_titles = case.clue_titles.clone();
        clue_titles.extend(options.clue_titles.clone());
        let hints = build_hints(&HintInputs {
            case,
            clue_titles: &clue_titles,
            invalid: &normalized.invalid,
            missing_connections: &best.missing,
            missing_nodes: &best.missing_nodes,
            unknown_nodes: &normalized.unknown_nodes,
            valid,
            max_hints: self.config.max_hints,
        });
        let feedback = feedback_message(
            valid,
            accuracy,
            &normalized.invalid,
            &normalized.unknown_nodes,
        );

        tracing::debug!(
            case_id,
            solution_id = %best.solution_id,
            accuracy,
            threshold,
            valid,
            invalid = normalized.invalid.len(),
            "theory scored"
        );

        TheoryVerdict {
            valid,
            accuracy,
            threshold,
            feedback,
            hints,
            matched_connections: best.matched,
            missing_connections: best.missing,
            extra_connections: best.extra,
            invalid_connections: normalized.invalid,
            missing_nodes: best.missing_nodes,
            unknown_nodes: normalized.unknown_nodes,
            solution_id: Some(best.solution_id),
            score: Some(best.score),
            normalized_theory: normalized.theory,
        }
    }
}

impl ITheoryValidator for TheoryValidator {
    fn validate(
        &self,
        theory: &RawTheory,
        case: &CaseDefinition,
        options: &ValidateOptions,
    ) -> TheoryVerdict {
        TheoryValidator::validate(self, theory, case, options)
    }
}
