//! CaseManager: owns every registered case and announces state changes.
//!
//! Announcements are queued while a case is being mutated and delivered to
//! the bus only after the mutation finishes, so a subscriber never observes
//! a half-applied update.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use casebook_core::config::{CasebookConfig, CasesConfig};
use casebook_core::constants::SNAPSHOT_VERSION;
use casebook_core::errors::{CasebookError, CasebookResult};
use casebook_core::models::{
    CaseDefinition, CaseEvent, CaseStatus, CasebookSnapshot, FxCue, InboundEvent, RawTheory,
    Testimony, TestimonyContradiction, TestimonyPayload, TheoryVerdict, ValidateOptions,
};
use casebook_core::traits::{IEventBus, ITheoryValidator, NullEventBus};
use casebook_observability::tracing_setup::events;
use casebook_theory::TheoryValidator;

use crate::case_file::{CaseFile, CaseProgress};
use crate::objectives::{self, ObjectivePass};
use crate::snapshot;

/// How [`CaseManager::register_case`] treats the new case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Make the case active after registering it.
    pub activate: bool,
    /// Replace an existing case with the same id, discarding its progress.
    pub overwrite: bool,
}

impl RegisterOptions {
    pub fn activate() -> Self {
        Self {
            activate: true,
            ..Self::default()
        }
    }

    pub fn with_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

const FX_INTENSITY_MINOR: f64 = 0.6;
const FX_INTENSITY_MAJOR: f64 = 1.0;

/// Case registry and event router. One per game session.
pub struct CaseManager {
    cases: HashMap<String, CaseFile>,
    registration_order: Vec<String>,
    active_case_id: Option<String>,
    validator: Arc<dyn ITheoryValidator>,
    bus: Arc<dyn IEventBus>,
    config: CasesConfig,
    outbox: Vec<CaseEvent>,
}

impl CaseManager {
    /// Manager with default configuration announcing on `bus`.
    pub fn new(bus: Arc<dyn IEventBus>) -> Self {
        Self::with_config(&CasebookConfig::default(), bus)
    }

    pub fn with_config(config: &CasebookConfig, bus: Arc<dyn IEventBus>) -> Self {
        Self {
            cases: HashMap::new(),
            registration_order: Vec::new(),
            active_case_id: None,
            validator: Arc::new(TheoryValidator::new(config.validator.clone())),
            bus,
            config: config.cases.clone(),
            outbox: Vec::new(),
        }
    }

    /// Replace the theory checker.
    pub fn with_validator(mut self, validator: Arc<dyn ITheoryValidator>) -> Self {
        self.validator = validator;
        self
    }

    // ── registry ─────────────────────────────────────────────────────────

    /// Register a case definition and return its id.
    ///
    /// Registering an id that already exists is a no-op unless
    /// `options.overwrite` is set.
    pub fn register_case(
        &mut self,
        definition: CaseDefinition,
        options: RegisterOptions,
    ) -> CasebookResult<String> {
        let case_id = definition
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or(CasebookError::MissingCaseId)?;

        if self.cases.contains_key(&case_id) && !options.overwrite {
            tracing::debug!(case_id = %case_id, "case already registered; keeping existing state");
            return Ok(case_id);
        }

        let case = CaseFile::new(
            case_id.clone(),
            definition,
            self.config.default_accuracy_threshold,
            Utc::now(),
        );
        for objective in objectives::unrecognized(&case.objectives) {
            events::authoring_problem(
                &case_id,
                &format!(
                    "objective '{}' has unrecognized type '{}'",
                    objective.id,
                    objective.kind.type_name()
                ),
            );
        }
        events::case_registered(
            &case_id,
            case.objectives.len(),
            case.definition.solution_graphs().len(),
        );

        self.outbox.push(CaseEvent::CaseCreated {
            case_id: case_id.clone(),
            title: case.title().to_string(),
        });
        if !self.cases.contains_key(&case_id) {
            self.registration_order.push(case_id.clone());
        }
        self.cases.insert(case_id.clone(), case);

        if options.activate {
            self.activate(&case_id);
        }
        self.flush();
        Ok(case_id)
    }

    /// Register with default options, activating the case if none is active.
    pub fn create_case(&mut self, definition: CaseDefinition) -> CasebookResult<String> {
        let options = RegisterOptions {
            activate: self.active_case_id.is_none(),
            overwrite: false,
        };
        self.register_case(definition, options)
    }

    /// Make `case_id` the active case. Unknown ids are rejected with a warning.
    pub fn set_active_case(&mut self, case_id: &str) -> bool {
        if !self.cases.contains_key(case_id) {
            tracing::warn!(case_id, "cannot activate unknown case");
            return false;
        }
        self.activate(case_id);
        self.flush();
        true
    }

    fn activate(&mut self, case_id: &str) {
        if self.active_case_id.as_deref() == Some(case_id) {
            return;
        }
        let previous_case_id = self.active_case_id.replace(case_id.to_string());
        tracing::info!(case_id, previous = ?previous_case_id, "case activated");
        self.outbox.push(CaseEvent::CaseActivated {
            case_id: case_id.to_string(),
            previous_case_id,
        });
    }

    pub fn active_case_id(&self) -> Option<&str> {
        self.active_case_id.as_deref()
    }

    pub fn active_case(&self) -> Option<&CaseFile> {
        self.active_case_id
            .as_deref()
            .and_then(|id| self.cases.get(id))
    }

    pub fn case(&self, case_id: &str) -> Option<&CaseFile> {
        self.cases.get(case_id)
    }

    /// Registered ids in registration order.
    pub fn case_ids(&self) -> Vec<String> {
        self.registration_order.clone()
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn progress(&self, case_id: &str) -> Option<CaseProgress> {
        self.cases.get(case_id).map(CaseFile::progress)
    }

    /// All testimonies of a case; empty for unknown cases.
    pub fn testimonies(&self, case_id: &str) -> &[Testimony] {
        self.cases
            .get(case_id)
            .map(|c| c.testimony.testimonies())
            .unwrap_or_default()
    }

    /// All contradictions of a case; empty for unknown cases.
    pub fn contradictions(&self, case_id: &str) -> &[TestimonyContradiction] {
        self.cases
            .get(case_id)
            .map(|c| c.testimony.contradictions())
            .unwrap_or_default()
    }

    // ── gameplay ─────────────────────────────────────────────────────────

    /// Add evidence to a case's collected set.
    ///
    /// Returns `false` for unknown cases, evidence outside the case's
    /// universe, and evidence already collected.
    pub fn on_evidence_collected(&mut self, case_id: &str, evidence_id: &str) -> bool {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, evidence_id, "evidence collected for unknown case");
            return false;
        };
        let evidence_id = evidence_id.trim();
        if !case.evidence_ids.contains(evidence_id) {
            tracing::warn!(case_id, evidence_id, "evidence is not part of this case; ignored");
            return false;
        }
        if !case.collected_evidence.insert(evidence_id.to_string()) {
            return false;
        }
        tracing::debug!(case_id, evidence_id, "evidence collected");

        let pass = objectives::evaluate(case);
        self.outbox.extend(objective_events(case_id, &pass, emit_fx));
        self.flush();
        true
    }

    /// Add a clue to a case's discovered set. Returns `false` for unknown
    /// cases and clues already discovered.
    pub fn on_clue_derived(&mut self, case_id: &str, clue_id: &str) -> bool {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, clue_id, "clue derived for unknown case");
            return false;
        };
        let clue_id = clue_id.trim();
        if clue_id.is_empty() || !case.discovered_clues.insert(clue_id.to_string()) {
            return false;
        }
        tracing::debug!(case_id, clue_id, "clue derived");

        let pass = objectives::evaluate(case);
        self.outbox.extend(objective_events(case_id, &pass, emit_fx));
        self.flush();
        true
    }

    /// Store an NPC testimony and detect contradictions against every
    /// earlier testimony of the same case.
    pub fn record_testimony(&mut self, payload: TestimonyPayload) -> Option<Testimony> {
        let emit_fx = self.config.emit_fx_cues;
        let case_id = payload.case_id.trim().to_string();
        let Some(case) = self.cases.get_mut(&case_id) else {
            tracing::warn!(case_id = %case_id, npc_id = %payload.npc_id, "testimony for unknown case");
            return None;
        };
        if payload.npc_id.trim().is_empty() {
            events::authoring_problem(&case_id, "testimony payload without npc id");
            return None;
        }
        let _span = casebook_observability::testimony_span!(case_id, payload.npc_id).entered();

        let outcome = case.testimony.record(payload, Utc::now());
        tracing::debug!(
            case_id = %case_id,
            testimony_id = %outcome.testimony.id,
            accepted = outcome.accepted_statements,
            "testimony recorded"
        );

        self.outbox.push(CaseEvent::TestimonyRecorded {
            case_id: case_id.clone(),
            testimony_id: outcome.testimony.id.clone(),
            npc_id: outcome.testimony.npc_id.clone(),
            statement_count: outcome.testimony.statements.len(),
        });
        for contradiction in outcome.new_contradictions {
            events::contradiction_detected(
                &case_id,
                &contradiction.fact_id,
                &contradiction.first.testimony_id,
                &contradiction.second.testimony_id,
            );
            self.outbox.push(CaseEvent::TestimonyContradiction {
                case_id: case_id.clone(),
                contradiction,
            });
            if emit_fx {
                self.outbox
                    .push(fx(&case_id, FxCue::TestimonyContradiction, FX_INTENSITY_MINOR));
            }
        }
        self.flush();
        Some(outcome.testimony)
    }

    /// Re-run objective predicates and return the ids that completed now.
    pub fn check_objective_completion(&mut self, case_id: &str) -> Vec<String> {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, "objective check for unknown case");
            return Vec::new();
        };
        let pass = objectives::evaluate(case);
        self.outbox.extend(objective_events(case_id, &pass, emit_fx));
        self.flush();
        pass.ids()
    }

    /// Validate with the case's own threshold and vocabulary.
    pub fn validate_theory(&mut self, case_id: &str, theory: &RawTheory) -> Option<TheoryVerdict> {
        self.validate_theory_with(case_id, theory, &ValidateOptions::default())
    }

    /// Check `theory` against the case, store the result, and solve the case
    /// when the verdict is valid and the case has a solution graph.
    ///
    /// Cases that already closed still return a verdict, but their stored
    /// theory and accuracy stay as they were at closing.
    pub fn validate_theory_with(
        &mut self,
        case_id: &str,
        theory: &RawTheory,
        options: &ValidateOptions,
    ) -> Option<TheoryVerdict> {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, "theory submitted for unknown case");
            return None;
        };
        let _span = casebook_observability::validation_span!(case_id).entered();

        let mut options = options.clone();
        if options.threshold.is_none() {
            options.threshold = Some(case.accuracy_threshold);
        }
        let verdict = self.validator.validate(theory, &case.definition, &options);
        events::theory_validated(case_id, verdict.accuracy, verdict.threshold, verdict.valid);

        if case.is_active() {
            case.player_theory = Some(verdict.normalized_theory.clone());
            case.accuracy = Some(verdict.accuracy);
        }

        self.outbox.push(CaseEvent::TheoryValidated {
            case_id: case_id.to_string(),
            accuracy: verdict.accuracy,
            valid: verdict.valid,
            threshold: verdict.threshold,
            hints: verdict.hints.clone(),
            missing_connections: verdict.missing_connections.clone(),
            extra_connections: verdict.extra_connections.clone(),
            invalid_connections: verdict.invalid_connections.clone(),
            solution_id: verdict.solution_id.clone(),
        });
        if emit_fx {
            let cue = if verdict.valid {
                FxCue::TheoryValid
            } else {
                FxCue::TheoryInvalid
            };
            self.outbox.push(fx(case_id, cue, FX_INTENSITY_MINOR));
        }

        if verdict.valid && case.definition.has_solution() && case.is_active() {
            let solved = solve(case, verdict.accuracy, Utc::now(), emit_fx);
            self.outbox.extend(solved);
        }
        self.flush();
        Some(verdict)
    }

    /// Mark a case solved at `accuracy`.
    ///
    /// Only an active case can be solved; a second call leaves the first
    /// accuracy and solve time in place and returns `false`.
    pub fn solve_case(&mut self, case_id: &str, accuracy: f64) -> bool {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, "cannot solve unknown case");
            return false;
        };
        match case.status {
            CaseStatus::Solved => {
                tracing::debug!(case_id, "case already solved");
                return false;
            }
            CaseStatus::Failed => {
                tracing::warn!(case_id, "cannot solve a failed case");
                return false;
            }
            CaseStatus::Active => {}
        }
        if !accuracy.is_finite() {
            tracing::warn!(case_id, accuracy, "refusing to solve with non-finite accuracy");
            return false;
        }

        let solved = solve(case, accuracy, Utc::now(), emit_fx);
        self.outbox.extend(solved);
        self.flush();
        true
    }

    /// Close an active case as failed.
    pub fn fail_case(&mut self, case_id: &str, reason: &str) -> bool {
        let emit_fx = self.config.emit_fx_cues;
        let Some(case) = self.cases.get_mut(case_id) else {
            tracing::warn!(case_id, "cannot fail unknown case");
            return false;
        };
        if !case.is_active() {
            tracing::debug!(case_id, status = ?case.status, "case already closed");
            return false;
        }

        case.status = CaseStatus::Failed;
        case.failure_reason = Some(reason.to_string());
        events::case_closed(case_id, "failed", case.accuracy);

        self.outbox.push(CaseEvent::CaseFailed {
            case_id: case_id.to_string(),
            reason: reason.to_string(),
        });
        if emit_fx {
            self.outbox
                .push(fx(case_id, FxCue::CaseFailed, FX_INTENSITY_MAJOR));
        }
        self.flush();
        true
    }

    /// Route an inbound gameplay event. Returns whether it changed state.
    pub fn handle_event(&mut self, event: InboundEvent) -> bool {
        tracing::trace!(event = event.name(), "inbound event");
        match event {
            InboundEvent::EvidenceCollected {
                case_id,
                evidence_id,
            } => self.on_evidence_collected(&case_id, &evidence_id),
            InboundEvent::ClueDerived { case_id, clue_id } => {
                self.on_clue_derived(&case_id, &clue_id)
            }
            InboundEvent::TestimonyCompleted(payload) => self.record_testimony(payload).is_some(),
        }
    }

    // ── persistence ──────────────────────────────────────────────────────

    /// Capture the state of every registered case.
    pub fn serialize(&self) -> CasebookSnapshot {
        let _span = casebook_observability::snapshot_span!("save", self.cases.len()).entered();
        CasebookSnapshot {
            version: SNAPSHOT_VERSION,
            active_case_id: self.active_case_id.clone(),
            cases: self
                .cases
                .iter()
                .map(|(id, case)| (id.clone(), snapshot::capture(case)))
                .collect(),
        }
    }

    /// Restore case state from `snapshot`. Definitions must already be
    /// registered; unknown case ids are skipped. Nothing is announced.
    ///
    /// Returns `false` only for snapshots written by a newer format.
    pub fn deserialize(&mut self, snapshot: CasebookSnapshot) -> bool {
        let _span =
            casebook_observability::snapshot_span!("restore", snapshot.cases.len()).entered();
        if snapshot.version > SNAPSHOT_VERSION {
            tracing::warn!(
                version = snapshot.version,
                supported = SNAPSHOT_VERSION,
                "snapshot written by a newer version; ignored"
            );
            return false;
        }

        for (case_id, state) in snapshot.cases {
            match self.cases.get_mut(&case_id) {
                Some(case) => snapshot::apply(case, state),
                None => tracing::warn!(case_id = %case_id, "snapshot names an unregistered case; skipped"),
            }
        }

        self.active_case_id = match snapshot.active_case_id {
            Some(id) if self.cases.contains_key(&id) => Some(id),
            Some(id) => {
                tracing::warn!(case_id = %id, "saved active case is not registered");
                None
            }
            None => None,
        };
        true
    }

    /// [`serialize`](Self::serialize) as JSON.
    pub fn snapshot_json(&self) -> CasebookResult<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// [`deserialize`](Self::deserialize) from JSON.
    pub fn restore_json(&mut self, json: &str) -> CasebookResult<bool> {
        let snapshot: CasebookSnapshot = serde_json::from_str(json)?;
        Ok(self.deserialize(snapshot))
    }

    fn flush(&mut self) {
        for event in std::mem::take(&mut self.outbox) {
            self.bus.emit(&event);
        }
    }
}

impl Default for CaseManager {
    fn default() -> Self {
        Self::new(Arc::new(NullEventBus))
    }
}

impl std::fmt::Debug for CaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseManager")
            .field("cases", &self.registration_order)
            .field("active_case_id", &self.active_case_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Close `case` as solved and return the announcements in delivery order.
fn solve(case: &mut CaseFile, accuracy: f64, now: DateTime<Utc>, emit_fx: bool) -> Vec<CaseEvent> {
    let accuracy = accuracy.clamp(0.0, 1.0);
    case.status = CaseStatus::Solved;
    case.accuracy = Some(accuracy);
    case.solve_time = Some(now);
    events::case_closed(&case.id, "solved", Some(accuracy));

    let mut out = vec![CaseEvent::CaseSolved {
        case_id: case.id.clone(),
        accuracy,
        solve_time: now,
    }];
    if emit_fx {
        out.push(fx(&case.id, FxCue::CaseSolved, FX_INTENSITY_MAJOR));
    }
    let pass = objectives::evaluate(case);
    out.extend(objective_events(&case.id, &pass, emit_fx));
    out.push(CaseEvent::CaseCompleted {
        case_id: case.id.clone(),
        rewards: case.definition.rewards.clone(),
    });
    out
}

fn objective_events(case_id: &str, pass: &ObjectivePass, emit_fx: bool) -> Vec<CaseEvent> {
    let mut out = Vec::new();
    for (objective_id, objective_type) in &pass.newly_completed {
        events::objective_completed(case_id, objective_id, objective_type);
        out.push(CaseEvent::ObjectiveCompleted {
            case_id: case_id.to_string(),
            objective_id: objective_id.clone(),
            objective_type: objective_type.clone(),
        });
        if emit_fx {
            out.push(fx(case_id, FxCue::ObjectiveComplete, FX_INTENSITY_MINOR));
        }
    }
    if pass.all_complete {
        out.push(CaseEvent::ObjectivesComplete {
            case_id: case_id.to_string(),
        });
        if emit_fx {
            out.push(fx(case_id, FxCue::ObjectivesComplete, FX_INTENSITY_MAJOR));
        }
    }
    out
}

fn fx(case_id: &str, cue: FxCue, intensity: f64) -> CaseEvent {
    CaseEvent::Fx {
        case_id: case_id.to_string(),
        cue,
        intensity,
    }
}
