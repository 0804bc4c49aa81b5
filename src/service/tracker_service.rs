//! Tracker service: puzzle, session, and event operations plus statistics.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Dataset, Event, EventType, Puzzle, PuzzleId, PuzzleStats, Seconds, Session, SessionId,
};
use crate::error::TrackerError;
use crate::persistence::Store;

/// Result of undoing the last event of a session.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UndoOutcome {
    /// The event that was removed.
    pub removed: Event,
    /// Events left in the session afterwards.
    pub remaining_events: usize,
}

/// Orchestration layer for every tracker operation.
///
/// Stateless coordinator over a [`Store`]. Every mutation is a single
/// `Store::update` cycle (load → mutate → save, serialized with other
/// mutations); every query loads the dataset and projects a view from it.
#[derive(Debug, Clone)]
pub struct TrackerService {
    store: Arc<Store>,
}

impl TrackerService {
    /// Creates a new `TrackerService`.
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Returns a reference to the inner [`Store`].
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Returns the full dataset.
    pub async fn dataset(&self) -> Dataset {
        self.store.load().await
    }

    /// Creates a puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PersistenceError`] if the dataset could not
    /// be saved.
    pub async fn create_puzzle(
        &self,
        name: String,
        total_pieces: u32,
    ) -> Result<Puzzle, TrackerError> {
        let puzzle = Puzzle::new(name, total_pieces);
        let created = puzzle.clone();
        self.store
            .update(move |dataset| {
                dataset.puzzles.push(puzzle);
                Ok::<_, TrackerError>(())
            })
            .await?;

        tracing::info!(puzzle_id = %created.id, total_pieces, "puzzle created");
        Ok(created)
    }

    /// Deletes a puzzle and all of its sessions.
    ///
    /// Deleting an unknown puzzle succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PersistenceError`] if the dataset could not
    /// be saved.
    pub async fn delete_puzzle(&self, id: &PuzzleId) -> Result<(), TrackerError> {
        let removed_sessions = self
            .store
            .update(|dataset| Ok::<_, TrackerError>(dataset.remove_puzzle(id)))
            .await?;

        tracing::info!(puzzle_id = %id, removed_sessions, "puzzle deleted");
        Ok(())
    }

    /// Starts a new active session. The puzzle is not required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PersistenceError`] if the dataset could not
    /// be saved.
    pub async fn start_session(&self, puzzle_id: PuzzleId) -> Result<Session, TrackerError> {
        let session = Session::start(puzzle_id);
        let started = session.clone();
        self.store
            .update(move |dataset| {
                dataset.sessions.push(session);
                Ok::<_, TrackerError>(())
            })
            .await?;

        tracing::info!(session_id = %started.id, puzzle_id = %started.puzzle_id, "session started");
        Ok(started)
    }

    /// Ends a session, stamping `ended_at` with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::SessionNotFound`] if no session has this id,
    /// or [`TrackerError::PersistenceError`] if the save failed.
    pub async fn end_session(&self, id: &SessionId) -> Result<Session, TrackerError> {
        let session = self
            .store
            .update(|dataset| {
                let session = dataset
                    .session_mut(id)
                    .ok_or_else(|| TrackerError::SessionNotFound(id.clone()))?;
                session.end();
                Ok::<_, TrackerError>(session.clone())
            })
            .await?;

        tracing::info!(session_id = %id, events = session.events.len(), "session ended");
        Ok(session)
    }

    /// Returns the first active session of a puzzle, if any.
    pub async fn active_session(&self, puzzle_id: &PuzzleId) -> Option<Session> {
        self.store.load().await.active_session(puzzle_id).cloned()
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::SessionNotFound`] if no session has this id,
    /// or [`TrackerError::PersistenceError`] if the save failed.
    pub async fn delete_session(&self, id: &SessionId) -> Result<(), TrackerError> {
        self.store
            .update(|dataset| {
                dataset
                    .remove_session(id)
                    .map(|_| ())
                    .ok_or_else(|| TrackerError::SessionNotFound(id.clone()))
            })
            .await?;

        tracing::info!(session_id = %id, "session deleted");
        Ok(())
    }

    /// Appends an event to a session's log.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidRequest`] if `elapsed` is negative or
    /// not finite, [`TrackerError::SessionNotFound`] if no session has this
    /// id, or [`TrackerError::PersistenceError`] if the save failed.
    pub async fn record_event(
        &self,
        session_id: &SessionId,
        kind: EventType,
        elapsed: impl Into<Seconds>,
    ) -> Result<Event, TrackerError> {
        let elapsed = elapsed.into();
        if !elapsed.is_valid_duration() {
            return Err(TrackerError::InvalidRequest(format!(
                "elapsed must be a non-negative number of seconds, got {elapsed}"
            )));
        }

        let event = self
            .store
            .update(|dataset| {
                dataset
                    .session_mut(session_id)
                    .map(|session| session.record(kind, elapsed))
                    .ok_or_else(|| TrackerError::SessionNotFound(session_id.clone()))
            })
            .await?;

        tracing::info!(session_id = %session_id, kind = kind.as_str(), elapsed = %elapsed, "event recorded");
        Ok(event)
    }

    /// Removes the last event of a session.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::SessionNotFound`] if no session has this id,
    /// [`TrackerError::EmptyEventLog`] if the session has no events, or
    /// [`TrackerError::PersistenceError`] if the save failed.
    pub async fn undo_last_event(&self, session_id: &SessionId) -> Result<UndoOutcome, TrackerError> {
        let outcome = self
            .store
            .update(|dataset| {
                let session = dataset
                    .session_mut(session_id)
                    .ok_or_else(|| TrackerError::SessionNotFound(session_id.clone()))?;
                let removed = session
                    .undo()
                    .ok_or_else(|| TrackerError::EmptyEventLog(session_id.clone()))?;
                Ok::<_, TrackerError>(UndoOutcome {
                    removed,
                    remaining_events: session.events.len(),
                })
            })
            .await?;

        tracing::info!(
            session_id = %session_id,
            remaining = outcome.remaining_events,
            "event undone"
        );
        Ok(outcome)
    }

    /// Computes statistics for a puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PuzzleNotFound`] if no puzzle has this id.
    pub async fn puzzle_stats(&self, puzzle_id: &PuzzleId) -> Result<PuzzleStats, TrackerError> {
        self.store
            .load()
            .await
            .stats(puzzle_id)
            .ok_or_else(|| TrackerError::PuzzleNotFound(puzzle_id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::{FileBackend, MemoryBackend, StorageBackend};

    fn make_service() -> (TrackerService, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::new(Arc::clone(&backend) as Arc<dyn StorageBackend>);
        (TrackerService::new(Arc::new(store)), backend)
    }

    async fn puzzle(service: &TrackerService, pieces: u32) -> Puzzle {
        let Ok(puzzle) = service.create_puzzle("Test".to_string(), pieces).await else {
            panic!("puzzle creation failed");
        };
        puzzle
    }

    async fn session(service: &TrackerService, puzzle_id: &PuzzleId) -> Session {
        let Ok(session) = service.start_session(puzzle_id.clone()).await else {
            panic!("session start failed");
        };
        session
    }

    #[tokio::test]
    async fn create_puzzle_persists() {
        let (service, backend) = make_service();
        let created = puzzle(&service, 1000).await;

        let dataset = service.dataset().await;
        assert_eq!(dataset.puzzles, vec![created]);
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn delete_puzzle_cascades_and_hides_stats() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let other = puzzle(&service, 10).await;
        let _ = session(&service, &p.id).await;
        let _ = session(&service, &p.id).await;
        let kept = session(&service, &other.id).await;

        assert!(service.delete_puzzle(&p.id).await.is_ok());

        assert!(matches!(
            service.puzzle_stats(&p.id).await,
            Err(TrackerError::PuzzleNotFound(_))
        ));
        let dataset = service.dataset().await;
        assert!(dataset.sessions.iter().all(|s| s.puzzle_id != p.id));
        assert_eq!(dataset.sessions, vec![kept]);
    }

    #[tokio::test]
    async fn delete_unknown_puzzle_succeeds() {
        let (service, _) = make_service();
        assert!(service.delete_puzzle(&PuzzleId::from("nope")).await.is_ok());
    }

    #[tokio::test]
    async fn delete_unknown_session_is_not_found() {
        let (service, backend) = make_service();
        let result = service.delete_session(&SessionId::from("nope")).await;
        assert!(matches!(result, Err(TrackerError::SessionNotFound(_))));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn delete_session_removes_it() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let s = session(&service, &p.id).await;

        assert!(service.delete_session(&s.id).await.is_ok());
        assert!(service.dataset().await.sessions.is_empty());
    }

    #[tokio::test]
    async fn start_session_does_not_require_puzzle() {
        let (service, _) = make_service();
        let s = session(&service, &PuzzleId::from("ghost")).await;
        assert!(s.is_active());
        assert_eq!(service.dataset().await.sessions.len(), 1);
    }

    #[tokio::test]
    async fn active_session_lifecycle() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        assert!(service.active_session(&p.id).await.is_none());

        let s = session(&service, &p.id).await;
        assert_eq!(service.active_session(&p.id).await.map(|a| a.id), Some(s.id.clone()));

        let Ok(ended) = service.end_session(&s.id).await else {
            panic!("end failed");
        };
        assert!(ended.ended_at.is_some());
        assert!(service.active_session(&p.id).await.is_none());
    }

    #[tokio::test]
    async fn repeated_starts_allow_multiple_active_sessions() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let first = session(&service, &p.id).await;
        let _second = session(&service, &p.id).await;

        let dataset = service.dataset().await;
        assert_eq!(dataset.sessions.iter().filter(|s| s.is_active()).count(), 2);
        assert_eq!(service.active_session(&p.id).await.map(|a| a.id), Some(first.id));
    }

    #[tokio::test]
    async fn end_unknown_session_is_not_found() {
        let (service, _) = make_service();
        assert!(matches!(
            service.end_session(&SessionId::from("nope")).await,
            Err(TrackerError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn record_event_into_unknown_session_is_not_found() {
        let (service, _) = make_service();
        assert!(matches!(
            service
                .record_event(&SessionId::from("nope"), EventType::PiecePlaced, 1.0)
                .await,
            Err(TrackerError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn negative_elapsed_is_rejected() {
        let (service, backend) = make_service();
        let p = puzzle(&service, 10).await;
        let s = session(&service, &p.id).await;
        let writes = backend.write_count();

        assert!(matches!(
            service.record_event(&s.id, EventType::PiecePlaced, -1.0).await,
            Err(TrackerError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.record_event(&s.id, EventType::PiecePlaced, f64::NAN).await,
            Err(TrackerError::InvalidRequest(_))
        ));
        assert_eq!(backend.write_count(), writes);
    }

    #[tokio::test]
    async fn whole_elapsed_is_stored_as_sent() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let s = session(&service, &p.id).await;

        let Ok(event) = service.record_event(&s.id, EventType::PiecePlaced, 7_i64).await else {
            panic!("record failed");
        };
        assert_eq!(event.elapsed, Seconds::Whole(7));
        let Ok(stats) = service.puzzle_stats(&p.id).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total_time, Seconds::Whole(7));
    }

    #[tokio::test]
    async fn mutation_over_unreadable_document_fails_without_saving() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let path = dir.path().join("data.json");
        let corrupt = r#"{"puzzles": [{"id": "p1", "name": "Keep me""#;
        assert!(std::fs::write(&path, corrupt).is_ok());
        let store = Store::new(Arc::new(FileBackend::new(&path)));
        let service = TrackerService::new(Arc::new(store));

        assert!(matches!(
            service.create_puzzle("New".to_string(), 1).await,
            Err(TrackerError::PersistenceError(_))
        ));
        assert!(matches!(
            service.delete_puzzle(&PuzzleId::from("p1")).await,
            Err(TrackerError::PersistenceError(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).ok().as_deref(), Some(corrupt));
        assert_eq!(service.dataset().await, Dataset::default());
    }

    #[tokio::test]
    async fn undo_pops_tail_until_empty() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let s = session(&service, &p.id).await;

        let Ok(e1) = service.record_event(&s.id, EventType::PiecePlaced, 5.0).await else {
            panic!("record failed");
        };
        let Ok(e2) = service.record_event(&s.id, EventType::PieceFailed, 2.0).await else {
            panic!("record failed");
        };

        let Ok(first) = service.undo_last_event(&s.id).await else {
            panic!("undo failed");
        };
        assert_eq!(first.removed, e2);
        assert_eq!(first.remaining_events, 1);
        let events = service
            .dataset()
            .await
            .sessions
            .first()
            .map(|s| s.events.clone());
        assert_eq!(events, Some(vec![e1.clone()]));

        let Ok(second) = service.undo_last_event(&s.id).await else {
            panic!("undo failed");
        };
        assert_eq!(second.removed, e1);
        assert_eq!(second.remaining_events, 0);

        assert!(matches!(
            service.undo_last_event(&s.id).await,
            Err(TrackerError::EmptyEventLog(_))
        ));
    }

    #[tokio::test]
    async fn undo_on_unknown_session_is_not_found() {
        let (service, _) = make_service();
        assert!(matches!(
            service.undo_last_event(&SessionId::from("nope")).await,
            Err(TrackerError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn stats_reflect_recorded_events() {
        let (service, _) = make_service();
        let p = puzzle(&service, 10).await;
        let s = session(&service, &p.id).await;
        for (kind, elapsed) in [
            (EventType::PiecePlaced, 5.0),
            (EventType::PiecePlaced, 3.0),
            (EventType::PieceFailed, 2.0),
        ] {
            assert!(service.record_event(&s.id, kind, elapsed).await.is_ok());
        }

        let Ok(stats) = service.puzzle_stats(&p.id).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total_pieces_placed, 2);
        assert_eq!(stats.total_pieces_failed, 1);
        assert!((stats.total_time.as_f64() - 10.0).abs() < f64::EPSILON);
        assert!((stats.avg_time_per_piece - 4.0).abs() < f64::EPSILON);
        assert!((stats.success_rate - 66.7).abs() < f64::EPSILON);
        assert!((stats.progress - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn concurrent_events_are_not_lost() {
        let (service, _) = make_service();
        let p = puzzle(&service, 100).await;
        let s = session(&service, &p.id).await;

        let mut handles = Vec::new();
        for _ in 0..25 {
            let service = service.clone();
            let id = s.id.clone();
            handles.push(tokio::spawn(async move {
                service.record_event(&id, EventType::PiecePlaced, 1.0).await
            }));
        }
        for handle in handles {
            let Ok(Ok(_)) = handle.await else {
                panic!("record failed");
            };
        }

        let Ok(stats) = service.puzzle_stats(&p.id).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total_pieces_placed, 25);
    }
}
