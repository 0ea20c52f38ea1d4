//! The project store: an ordered list of projects, most recent first,
//! persisted as a single serialized array.

use std::sync::{Arc, Mutex, MutexGuard};

use founderval_core::{AnalysisResult, IdeaSubmission, Project};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::blob::{BlobStore, keys, load_json, save_json};
use crate::StoreError;

/// Owns the project list.
///
/// Every mutation rewrites the full persisted array and notifies
/// subscribers with the new snapshot. `complete_project` and `fail_project`
/// are silent no-ops for unknown ids and for projects already in a terminal
/// state.
pub struct ProjectStore {
    blob: Arc<dyn BlobStore>,
    projects: Mutex<Vec<Project>>,
    changes: watch::Sender<Vec<Project>>,
}

impl ProjectStore {
    /// Load the persisted list.
    ///
    /// A persisted document that fails to parse is logged and discarded;
    /// the store starts empty rather than failing.
    pub fn open(blob: Arc<dyn BlobStore>) -> Result<Self, StoreError> {
        let projects = match load_json::<Vec<Project>>(blob.as_ref(), keys::PROJECTS) {
            Ok(Some(list)) => list,
            Ok(None) => Vec::new(),
            Err(StoreError::Json(e)) => {
                warn!(error = %e, "failed to load projects; starting empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        info!(count = projects.len(), "loaded projects");
        let (changes, _) = watch::channel(projects.clone());
        Ok(Self {
            blob,
            projects: Mutex::new(projects),
            changes,
        })
    }

    /// Insert a new `processing` project at the head of the list and return it.
    pub fn create_project(&self, submission: IdeaSubmission) -> Result<Project, StoreError> {
        let project = Project::new(submission);
        let mut projects = self.lock()?;
        let mut next = Vec::with_capacity(projects.len() + 1);
        next.push(project.clone());
        next.extend(projects.iter().cloned());
        self.commit(&mut projects, next)?;
        info!(id = %project.id, title = %project.submission.title, "project created");
        Ok(project)
    }

    /// Attach an analysis and mark the project completed.
    pub fn complete_project(&self, id: &str, analysis: AnalysisResult) -> Result<(), StoreError> {
        self.update(id, |p| p.complete(analysis))
    }

    /// Mark the project failed; its analysis stays absent.
    pub fn fail_project(&self, id: &str) -> Result<(), StoreError> {
        self.update(id, Project::fail)
    }

    /// Snapshot of every project, most recent first.
    pub fn list(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.lock()?.iter().find(|p| p.id == id).cloned())
    }

    /// Most recent project that has an analysis.
    pub fn latest_completed(&self) -> Result<Option<Project>, StoreError> {
        Ok(self.lock()?.iter().find(|p| p.analysis.is_some()).cloned())
    }

    /// Receive the full list after every successful write.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Project>> {
        self.changes.subscribe()
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut Project) -> bool) -> Result<(), StoreError> {
        let mut projects = self.lock()?;
        let Some(index) = projects.iter().position(|p| p.id == id) else {
            return Ok(());
        };
        let mut next = projects.clone();
        if !apply(&mut next[index]) {
            warn!(id, status = %next[index].status, "project already settled; ignoring update");
            return Ok(());
        }
        let status = next[index].status;
        self.commit(&mut projects, next)?;
        info!(id, %status, "project updated");
        Ok(())
    }

    /// Persist `next`, then publish it in memory and to subscribers.
    ///
    /// On a failed write the in-memory list and subscribers keep the last
    /// persisted snapshot.
    fn commit(&self, current: &mut Vec<Project>, next: Vec<Project>) -> Result<(), StoreError> {
        save_json(self.blob.as_ref(), keys::PROJECTS, &next)?;
        *current = next;
        self.changes.send_replace(current.clone());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Project>>, StoreError> {
        self.projects
            .lock()
            .map_err(|e| StoreError::Other(format!("project list lock poisoned: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileBlobStore, MemoryBlobStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use founderval_core::{
        FinancialYear, LegalStep, ProjectStatus, Risk, Severity, StartupScores,
    };
    use pretty_assertions::assert_eq;

    fn submission(title: &str) -> IdeaSubmission {
        IdeaSubmission {
            title: title.into(),
            description: "Same-day laundry pickup.".into(),
            industry: "Consumer services".into(),
            target_market: "Students in Karachi".into(),
            budget: "Bootstrapped (< $1k)".into(),
            location: "Pakistan".into(),
        }
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            executive_summary: "Thin margins, strong demand.".into(),
            scores: StartupScores {
                market: 70,
                feasibility: 80,
                financial: 45,
                uniqueness: 30,
                team_requirement: 40,
            },
            financials: vec![
                FinancialYear {
                    year: "2025".into(),
                    revenue: 10_000.0,
                    cost: 12_000.0,
                    profit: -2_000.0,
                },
                FinancialYear {
                    year: "2026".into(),
                    revenue: 30_000.0,
                    cost: 24_000.0,
                    profit: 6_000.0,
                },
                FinancialYear {
                    year: "2027".into(),
                    revenue: 60_000.0,
                    cost: 40_000.0,
                    profit: 20_000.0,
                },
            ],
            market_analysis: "Fragmented local market.".into(),
            competitors: vec!["Washmen".into()],
            legal_steps: vec![LegalStep {
                title: "FBR registration".into(),
                description: "Obtain an NTN.".into(),
            }],
            risks: vec![Risk {
                risk: "Price war".into(),
                mitigation: "Subscription bundles.".into(),
                severity: Severity::Medium,
            }],
            investment_verdict: "Pivot to B2B hostels".into(),
            recommended_stack: vec!["Flutter".into()],
            hiring_plan: vec!["Ops manager".into()],
        }
    }

    /// Memory store whose writes start failing once `broken` is set.
    #[derive(Default)]
    struct FlakyBlobStore {
        inner: MemoryBlobStore,
        broken: AtomicBool,
    }

    impl BlobStore for FlakyBlobStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StoreError::Other("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn persisted(blob: &dyn BlobStore) -> Vec<Project> {
        load_json(blob, keys::PROJECTS).unwrap().unwrap_or_default()
    }

    fn memory_store() -> ProjectStore {
        ProjectStore::open(Arc::new(MemoryBlobStore::new())).unwrap()
    }

    #[test]
    fn create_prepends_processing_project() {
        let store = memory_store();
        let first = store.create_project(submission("first")).unwrap();
        let second = store.create_project(submission("second")).unwrap();

        assert_eq!(first.status, ProjectStatus::Processing);
        let list = store.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn complete_attaches_analysis_unchanged() {
        let store = memory_store();
        let p = store.create_project(submission("laundry")).unwrap();
        store.complete_project(&p.id, analysis()).unwrap();

        let stored = store.get(&p.id).unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Completed);
        assert_eq!(stored.analysis, Some(analysis()));
    }

    #[test]
    fn fail_leaves_analysis_absent() {
        let store = memory_store();
        let p = store.create_project(submission("laundry")).unwrap();
        store.fail_project(&p.id).unwrap();

        let stored = store.get(&p.id).unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Failed);
        assert!(stored.analysis.is_none());
    }

    #[test]
    fn unknown_id_is_silent_noop() {
        let store = memory_store();
        let p = store.create_project(submission("laundry")).unwrap();
        store.complete_project("missing", analysis()).unwrap();
        store.fail_project("missing").unwrap();
        assert_eq!(store.list().unwrap(), vec![p]);
    }

    #[test]
    fn settled_project_ignores_later_updates() {
        let store = memory_store();
        let p = store.create_project(submission("laundry")).unwrap();
        store.fail_project(&p.id).unwrap();
        store.complete_project(&p.id, analysis()).unwrap();

        let stored = store.get(&p.id).unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Failed);
        assert!(stored.analysis.is_none());
    }

    #[test]
    fn persisted_list_round_trips_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blob: Arc<dyn BlobStore> = Arc::new(FileBlobStore::open(tmp.path()).unwrap());

        let store = ProjectStore::open(blob.clone()).unwrap();
        let a = store.create_project(submission("a")).unwrap();
        store.create_project(submission("b")).unwrap();
        store.complete_project(&a.id, analysis()).unwrap();
        let before = store.list().unwrap();
        drop(store);

        let reopened = ProjectStore::open(blob).unwrap();
        assert_eq!(reopened.list().unwrap(), before);
    }

    #[test]
    fn corrupt_blob_resets_to_empty() {
        let blob = Arc::new(MemoryBlobStore::new());
        blob.set(keys::PROJECTS, "[{\"id\": ").unwrap();

        let store = ProjectStore::open(blob.clone()).unwrap();
        assert!(store.list().unwrap().is_empty());

        // The next write replaces the corrupt document.
        store.create_project(submission("fresh")).unwrap();
        let raw = blob.get(keys::PROJECTS).unwrap().unwrap();
        let parsed: Vec<Project> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn latest_completed_skips_pending_and_failed() {
        let store = memory_store();
        let done = store.create_project(submission("done")).unwrap();
        store.complete_project(&done.id, analysis()).unwrap();
        let failed = store.create_project(submission("failed")).unwrap();
        store.fail_project(&failed.id).unwrap();
        store.create_project(submission("pending")).unwrap();

        let latest = store.latest_completed().unwrap().unwrap();
        assert_eq!(latest.id, done.id);
    }

    #[tokio::test]
    async fn subscribers_see_every_write() {
        let store = memory_store();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let p = store.create_project(submission("watched")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].status, ProjectStatus::Processing);

        store.complete_project(&p.id, analysis()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].status, ProjectStatus::Completed);
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let blob = Arc::new(FlakyBlobStore::default());
        let store = ProjectStore::open(blob.clone()).unwrap();
        let mut rx = store.subscribe();
        let p = store.create_project(submission("laundry")).unwrap();
        let _ = rx.borrow_and_update();

        blob.broken.store(true, Ordering::SeqCst);
        assert!(store.fail_project(&p.id).is_err());
        assert!(store.complete_project(&p.id, analysis()).is_err());
        assert!(store.create_project(submission("second")).is_err());

        let in_memory = store.list().unwrap();
        assert_eq!(in_memory.len(), 1);
        assert_eq!(in_memory[0].status, ProjectStatus::Processing);
        assert_eq!(persisted(blob.as_ref()), in_memory);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), in_memory);

        // Once writes succeed again the update goes through normally.
        blob.broken.store(false, Ordering::SeqCst);
        store.fail_project(&p.id).unwrap();
        assert_eq!(persisted(blob.as_ref())[0].status, ProjectStatus::Failed);
    }
}
