//! Mount orchestrator - drives one mount run through its state machine
//!
//! ```text
//! Idle -> Probing -> Mounting -> Verifying -> Succeeded
//!            |           |
//!            |           +-> (all candidates exhausted) -> Failed
//!            +-> (already mounted) -> Succeeded
//! ```
//!
//! Every external call goes through the [`CommandPort`], so a run is fully
//! determined by the outputs it is fed. Failures never escape as errors: they
//! are recorded in the attempt trail and the run moves on.

use super::candidates::select_candidates;
use super::{MountAttempt, MountResult, MountState, MountStrategy};
use crate::command::{argv, CommandPort};
use crate::config::EngineConfig;
use crate::drives::DeviceEnumerator;
use crate::error::{ElevationGate, ErrorClass, ErrorClassifier};
use crate::locator::{most_recent_volume, EfiLocator};
use crate::parsers::{parse_device_id, parse_mount_table, parse_properties};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

pub struct MountOrchestrator<'a, P: CommandPort + ?Sized> {
    port: &'a P,
    config: &'a EngineConfig,
    classifier: ErrorClassifier,
}

/// Mutable state of a single run.
struct Run {
    id: Uuid,
    state: MountState,
    gate: ElevationGate,
    attempts: Vec<MountAttempt>,
}

impl Run {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: MountState::Idle,
            gate: ElevationGate::new(),
            attempts: Vec::new(),
        }
    }

    fn transition(&mut self, next: MountState) {
        tracing::debug!(run_id = %self.id, from = %self.state, to = %next, "Mount state transition");
        self.state = next;
    }

    fn succeed(mut self, path: Option<PathBuf>, unverified_path: bool) -> MountResult {
        self.transition(MountState::Succeeded);
        tracing::info!(
            run_id = %self.id,
            path = ?path,
            unverified = unverified_path,
            attempts = self.attempts.len(),
            "Mount succeeded"
        );
        MountResult {
            run_id: self.id,
            success: true,
            path,
            unverified_path,
            final_state: self.state,
            failure: None,
            attempts: self.attempts,
        }
    }

    fn fail(mut self, reason: &str) -> MountResult {
        self.transition(MountState::Failed);
        tracing::warn!(
            run_id = %self.id,
            reason = %reason,
            attempts = self.attempts.len(),
            skipped_privileged = self.gate.skipped(),
            "Mount failed"
        );
        MountResult {
            run_id: self.id,
            success: false,
            path: None,
            unverified_path: false,
            final_state: self.state,
            failure: Some(ErrorClass::NoCandidateFound),
            attempts: self.attempts,
        }
    }
}

/// Outcome of running the strategies against one candidate.
enum CandidateOutcome {
    Mounted,
    /// Found mounted before the forced strategy ran
    AlreadyMounted(PathBuf),
    Exhausted,
}

impl<'a, P: CommandPort + ?Sized> MountOrchestrator<'a, P> {
    pub fn new(port: &'a P, config: &'a EngineConfig) -> Self {
        Self {
            port,
            config,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Mounts `target`, or the most plausible EFI partition when `None`.
    pub fn mount_efi(&self, target: Option<&str>) -> MountResult {
        let mut run = Run::new();
        tracing::info!(run_id = %run.id, target = ?target, "Starting mount run");

        run.transition(MountState::Probing);
        let candidates = match target {
            None => {
                if let Some(path) = EfiLocator::new(self.port, self.config).locate() {
                    return run.succeed(Some(path), false);
                }
                let drives = match DeviceEnumerator::new(self.port, self.config).enumerate() {
                    Ok(drives) => drives,
                    Err(e) => {
                        tracing::warn!(error = %e, "Enumeration failed");
                        Vec::new()
                    }
                };
                select_candidates(&drives, self.config.include_boot_disk)
            }
            Some(raw) => {
                let Some(partition) = canonical_identifier(raw) else {
                    return run.fail(&format!("{} is not a device identifier", raw));
                };
                match self.probe_target(&partition) {
                    TargetProbe::Missing => {
                        return run.fail(&format!("{} no longer exists", partition));
                    }
                    TargetProbe::Mounted(path) => return run.succeed(Some(path), false),
                    TargetProbe::Unmounted => vec![partition],
                }
            }
        };

        if candidates.is_empty() {
            return run.fail("no candidate partitions");
        }
        tracing::info!(run_id = %run.id, candidates = ?candidates, "Mount candidates selected");

        run.transition(MountState::Mounting);
        for partition in &candidates {
            match self.mount_candidate(&mut run, partition) {
                CandidateOutcome::Mounted => {
                    run.transition(MountState::Verifying);
                    let (path, unverified) = self.verify(partition);
                    if let Some(last) = run.attempts.last_mut() {
                        last.mount_path = path.clone();
                    }
                    return run.succeed(path, unverified);
                }
                CandidateOutcome::AlreadyMounted(path) => {
                    run.transition(MountState::Verifying);
                    return run.succeed(Some(path), false);
                }
                CandidateOutcome::Exhausted => {
                    tracing::warn!(partition = %partition, "All strategies failed, trying next candidate");
                }
            }
        }

        run.fail("every candidate exhausted every strategy")
    }

    fn mount_candidate(&self, run: &mut Run, partition: &str) -> CandidateOutcome {
        for strategy in MountStrategy::enabled(self.config) {
            if strategy.is_elevated() {
                if let Err(e) = run.gate.check() {
                    tracing::debug!(partition = %partition, strategy = ?strategy, reason = %e, "Skipping privileged strategy");
                    continue;
                }
            }

            if strategy == MountStrategy::PrivilegedForced {
                if let Some(path) = self.current_mount_point(partition) {
                    tracing::info!(partition = %partition, path = %path.display(), "Partition mounted before forced strategy");
                    return CandidateOutcome::AlreadyMounted(path);
                }
            }

            let attempt = self.attempt(partition, strategy);
            let succeeded = attempt.success;
            if attempt.error_class == Some(ErrorClass::ElevationRefused) {
                let reason = match attempt.diagnostic.trim() {
                    "" => "elevation front-end returned nothing".to_string(),
                    text => text.to_string(),
                };
                run.gate.trip(reason);
            }
            run.attempts.push(attempt);

            if succeeded {
                return CandidateOutcome::Mounted;
            }
        }
        CandidateOutcome::Exhausted
    }

    fn attempt(&self, partition: &str, strategy: MountStrategy) -> MountAttempt {
        let elevated = strategy.is_elevated();
        let started_at = Utc::now();
        let clock = Instant::now();

        tracing::debug!(partition = %partition, strategy = ?strategy, elevated, "Attempting mount");
        let out = self
            .port
            .run(&strategy.command(partition, self.config), elevated);
        let error_class = self.classifier.classify_attempt(&out, elevated);

        match error_class {
            None => tracing::info!(partition = %partition, strategy = ?strategy, "Mount strategy succeeded"),
            Some(class) => tracing::warn!(
                partition = %partition,
                strategy = ?strategy,
                class = %class,
                output = %out.output.trim(),
                "Mount strategy failed, trying next"
            ),
        }

        MountAttempt {
            partition: partition.to_string(),
            strategy,
            elevated,
            success: out.success,
            mount_path: None,
            diagnostic: out.output,
            error_class,
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
        }
    }

    fn probe_target(&self, partition: &str) -> TargetProbe {
        let out = self
            .port
            .run(&argv(&[self.config.tools.diskutil.as_str(), "info", partition]), false);
        let Some(text) = out.text() else {
            return TargetProbe::Missing;
        };
        match parse_properties(text).mount_point() {
            Some(path) => TargetProbe::Mounted(path),
            None => TargetProbe::Unmounted,
        }
    }

    fn current_mount_point(&self, partition: &str) -> Option<PathBuf> {
        let out = self
            .port
            .run(&argv(&[self.config.tools.diskutil.as_str(), "info", partition]), false);
        parse_properties(out.text()?).mount_point()
    }

    /// Where `partition` ended up, and whether that answer is only a guess.
    fn verify(&self, partition: &str) -> (Option<PathBuf>, bool) {
        if let Some(path) = self.current_mount_point(partition) {
            return (Some(path), false);
        }

        let out = self.port.run(&argv(&[self.config.tools.mount.as_str()]), false);
        if let Some(entry) = out
            .text()
            .map(parse_mount_table)
            .unwrap_or_default()
            .into_iter()
            .find(|e| e.device_name() == partition)
        {
            return (Some(entry.mount_point), false);
        }

        let guess = most_recent_volume(&self.config.volumes_root);
        tracing::warn!(partition = %partition, guess = ?guess, "Mount path could not be verified");
        (guess, true)
    }
}

enum TargetProbe {
    Missing,
    Mounted(PathBuf),
    Unmounted,
}

/// `disk2s1` from `disk2s1` or `/dev/disk2s1`; anything else is rejected.
fn canonical_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix("/dev/").unwrap_or(trimmed);
    let id = parse_device_id(bare)?;
    let canonical = match id.slot {
        Some(slot) => format!("{}s{}", id.disk, slot),
        None => id.disk,
    };
    (canonical == bare).then_some(canonical)
}
