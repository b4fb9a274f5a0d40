use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::locations::models::{FieldValue, FormBinding, LocationForm, SyncStatus};
use crate::features::locations::services::{LocationQuery, LocationResolution, LocationService};
use crate::features::regions::models::{codes_equal, derive_parent_code, AdminLevel};

/// A report form's location section plus its request sequence bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    pub id: Uuid,
    pub form: LocationForm,
    /// Sequence number of the most recently initiated resolution
    pub latest_sequence: u64,
    /// Sequence number of the last resolution written into the form
    pub applied_sequence: u64,
    /// Status of the last applied resolution; cleared by manual edits
    pub status: Option<SyncStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            form: LocationForm::default(),
            latest_sequence: 0,
            applied_sequence: 0,
            status: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        (now - self.updated_at)
            .to_std()
            .map_or(false, |idle| idle > ttl)
    }

    fn issue_sequence(&mut self) -> u64 {
        self.latest_sequence += 1;
        self.latest_sequence
    }

    /// Clear every level below `level`, except those listed in `keep`
    fn clear_descendants(&mut self, level: AdminLevel, keep: &[AdminLevel]) -> Vec<AdminLevel> {
        let mut cleared = Vec::new();
        for descendant in level.descendants() {
            if keep.contains(descendant) || self.form.get(*descendant).is_none() {
                continue;
            }
            self.form.set(*descendant, None);
            cleared.push(*descendant);
        }
        cleared
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied {
        applied_fields: Vec<AdminLevel>,
        cleared_fields: Vec<AdminLevel>,
    },
    /// A newer resolution was initiated, or the user edited the form meanwhile
    Stale { sequence: u64, latest_sequence: u64 },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Result of resolving a location on behalf of a session
#[derive(Debug, Clone)]
pub struct SessionResolution {
    pub sequence: u64,
    pub resolution: LocationResolution,
    pub outcome: ApplyOutcome,
    pub session: FormSession,
}

#[derive(Debug, Clone)]
pub struct FieldEdit {
    pub session: FormSession,
    pub cleared_fields: Vec<AdminLevel>,
}

/// In-memory form sessions.
///
/// Owns every mutation of form state. Each resolution takes a sequence number
/// when it starts and may only be applied while that number is still the
/// latest issued, so the form always reflects the most recently initiated
/// request. The session lock is never held while the pipeline awaits the
/// network.
pub struct FormSessionService {
    sessions: Arc<RwLock<HashMap<Uuid, FormSession>>>,
    location_service: Arc<LocationService>,
    ttl: Duration,
}

impl FormSessionService {
    pub fn new(location_service: Arc<LocationService>, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            location_service,
            ttl,
        }
    }

    pub async fn create(&self) -> FormSession {
        let session = FormSession::new();
        let mut sessions = self.sessions.write().await;
        self.prune_expired(&mut sessions);
        sessions.insert(session.id, session.clone());
        tracing::debug!("Created form session {}", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<FormSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl, Utc::now()))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    /// Issue the sequence number for a new resolution request
    pub async fn begin_resolution(&self, id: Uuid) -> Result<u64> {
        self.with_session(id, |session| Ok(session.issue_sequence()))
            .await
    }

    /// Apply a binding produced by the resolution that was issued `sequence`.
    ///
    /// Stale bindings leave the form untouched. Changing a level's code clears
    /// the levels below it unless the same binding sets them.
    pub async fn apply_resolution(
        &self,
        id: Uuid,
        sequence: u64,
        binding: &FormBinding,
        status: Option<SyncStatus>,
    ) -> Result<ApplyOutcome> {
        self.with_session(id, |session| {
            if sequence != session.latest_sequence || sequence <= session.applied_sequence {
                tracing::warn!(
                    "Discarding stale resolution for session {}: sequence {} (latest {}, applied {})",
                    id,
                    sequence,
                    session.latest_sequence,
                    session.applied_sequence
                );
                return Ok(ApplyOutcome::Stale {
                    sequence,
                    latest_sequence: session.latest_sequence,
                });
            }

            let mut cleared_fields = Vec::new();
            for update in &binding.updates {
                let changed = session.form.code(update.field) != Some(update.value.code.as_str());
                if changed {
                    cleared_fields.extend(
                        session.clear_descendants(update.field, &binding.applied_fields),
                    );
                }
                session.form.set(update.field, Some(update.value.clone()));
            }

            session.applied_sequence = sequence;
            session.status = status;

            Ok(ApplyOutcome::Applied {
                applied_fields: binding.applied_fields.clone(),
                cleared_fields,
            })
        })
        .await
    }

    /// Resolve `query` and apply the result to the session if still current
    pub async fn resolve_and_apply(&self, id: Uuid, query: &LocationQuery) -> Result<SessionResolution> {
        let sequence = self.begin_resolution(id).await?;

        // Transport failures leave the form as it was
        let resolution = match self.location_service.resolve(query).await {
            Ok(resolution) => resolution,
            Err(e) => {
                if e.is_recoverable() {
                    tracing::warn!(
                        "Resolution {} for session {} failed, form left untouched: {}",
                        sequence,
                        id,
                        e
                    );
                }
                return Err(e);
            }
        };

        let outcome = self
            .apply_resolution(id, sequence, &resolution.binding, Some(resolution.status))
            .await?;
        let session = self.get(id).await?;

        Ok(SessionResolution {
            sequence,
            resolution,
            outcome,
            session,
        })
    }

    /// Explicit user edit of one field; `None` clears it.
    ///
    /// Any resolution still in flight becomes stale. The parent level must be
    /// set first, and a code that implies a different parent is rejected.
    pub async fn edit_field(
        &self,
        id: Uuid,
        level: AdminLevel,
        value: Option<FieldValue>,
    ) -> Result<FieldEdit> {
        self.with_session(id, |session| {
            if let Some(value) = &value {
                validate_parent(&session.form, level, value)?;
            }

            session.issue_sequence();

            let changed =
                session.form.code(level) != value.as_ref().map(|v| v.code.as_str());
            let cleared_fields = if changed {
                session.clear_descendants(level, &[])
            } else {
                Vec::new()
            };

            session.form.set(level, value);
            session.status = None;

            tracing::debug!(
                "Session {} edited {} (cleared {:?})",
                id,
                level,
                cleared_fields
            );

            Ok(FieldEdit {
                session: session.clone(),
                cleared_fields,
            })
        })
        .await
    }

    async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        let session = sessions
            .get_mut(&id)
            .filter(|s| !s.is_expired(self.ttl, now))
            .ok_or_else(|| not_found(id))?;

        let result = f(session)?;
        session.updated_at = now;
        Ok(result)
    }

    fn prune_expired(&self, sessions: &mut HashMap<Uuid, FormSession>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} expired form sessions", pruned);
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Form session {} not found", id))
}

fn validate_parent(form: &LocationForm, level: AdminLevel, value: &FieldValue) -> Result<()> {
    let Some(parent_level) = level.parent() else {
        return Ok(());
    };

    let parent = form.get(parent_level).ok_or_else(|| {
        AppError::Validation(format!("Select the {} before the {}", parent_level, level))
    })?;

    if let Some(implied) = derive_parent_code(&value.code, level) {
        if !codes_equal(&implied, &parent.code) {
            return Err(AppError::Validation(format!(
                "{} {} does not belong to {} {}",
                level, value.code, parent_level, parent.code
            )));
        }
    }

    Ok(())
}
