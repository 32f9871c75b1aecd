//! Headless controller for the attendance page.
//!
//! Owns the fetched view state (subjects, class lists, calendar,
//! analytics), the optimistic snapshot layer and the polling engine for
//! the statistics jobs the server spawns on every mutation. Mutations
//! follow the optimistic path: patch locally, send the request, poll
//! the returned job, then replace the optimistic value with an
//! authoritative refetch or roll it back on failure.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::BoxFuture;
use uuid::Uuid;

use crate::alert::ErrorChannel;
use crate::api::error::Result as ApiResult;
use crate::api::types::{
    AnalyticsInsights, AttendanceRecord, AttendanceStatus, CalendarDay, ClassInstance,
    NewClassInstance, NewSubject, Subject,
};
use crate::api::AttendanceApi;
use crate::error::Result;
use crate::jobs::{JobCallback, JobPoller, JobSnapshot, JobStatusSource, NoopObserver, PendingRegistry};
use crate::optimistic::OptimisticLayer;

/// Adapts the attendance statistics endpoint to the polling engine.
pub struct AttendanceJobSource<A> {
    api: Arc<A>,
}

#[async_trait]
impl<A: AttendanceApi> JobStatusSource for AttendanceJobSource<A> {
    async fn job_status(&self, job_id: &str) -> ApiResult<JobSnapshot> {
        self.api.attendance_job_status(job_id).await
    }
}

/// Everything the attendance page renders from.
#[derive(Debug, Clone)]
pub struct AttendanceView {
    pub subjects: Vec<Subject>,
    pub selected_date: NaiveDate,
    pub class_instances: Vec<ClassInstance>,
    pub todays_classes: Vec<ClassInstance>,
    pub calendar: Vec<CalendarDay>,
    pub analytics: Option<AnalyticsInsights>,
}

impl AttendanceView {
    fn new(today: NaiveDate) -> Self {
        Self {
            subjects: Vec::new(),
            selected_date: today,
            class_instances: Vec::new(),
            todays_classes: Vec::new(),
            calendar: Vec::new(),
            analytics: None,
        }
    }
}

pub struct AttendanceTracker<A: AttendanceApi + 'static> {
    api: Arc<A>,
    state: Arc<RwLock<AttendanceView>>,
    optimistic: Arc<OptimisticLayer<i64, ClassInstance>>,
    pending: Arc<PendingRegistry>,
    errors: ErrorChannel,
    poller: JobPoller<AttendanceJobSource<A>>,
}

impl<A: AttendanceApi + 'static> AttendanceTracker<A> {
    pub fn new(api: Arc<A>, errors: ErrorChannel, poll_interval: Duration) -> Self {
        let source = Arc::new(AttendanceJobSource {
            api: Arc::clone(&api),
        });
        Self {
            api,
            state: Arc::new(RwLock::new(AttendanceView::new(today()))),
            optimistic: Arc::new(OptimisticLayer::new()),
            pending: PendingRegistry::new(),
            errors: errors.clone(),
            poller: JobPoller::new(source, errors, poll_interval),
        }
    }

    /// Clone of the current view state.
    pub fn view(&self) -> AttendanceView {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// True while a mutation for this class instance is in flight; the
    /// corresponding control should be disabled.
    pub fn is_instance_pending(&self, instance_id: i64) -> bool {
        self.pending.is_pending(&instance_id.to_string())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub async fn refresh_subjects(&self) -> Result<()> {
        match self.api.subjects().await {
            Ok(subjects) => {
                self.write_state(|view| view.subjects = subjects);
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Fetches the class list for `date` and makes it the selected day.
    pub async fn refresh_instances(&self, date: NaiveDate) -> Result<()> {
        match self.api.class_instances(date).await {
            Ok(instances) => {
                self.write_state(|view| {
                    view.selected_date = date;
                    view.class_instances = instances.clone();
                    if date == today() {
                        view.todays_classes = instances;
                    }
                });
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Fetches the class list for the current day into the today slot,
    /// independent of the selected date.
    pub async fn refresh_today(&self) -> Result<()> {
        let date = today();
        match self.api.class_instances(date).await {
            Ok(instances) => {
                self.write_state(|view| view.todays_classes = instances);
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn refresh_calendar(&self, month: u32, year: i32) -> Result<()> {
        match self.api.calendar_view(month, year).await {
            Ok(days) => {
                self.write_state(|view| view.calendar = days);
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn refresh_analytics(&self) -> Result<()> {
        match self.api.analytics_insights().await {
            Ok(insights) => {
                self.write_state(|view| view.analytics = Some(insights));
                Ok(())
            }
            Err(e) => {
                self.errors.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Creates a subject and refetches the list. No job is involved.
    pub async fn add_subject(&self, subject: NewSubject) -> Result<()> {
        if let Err(e) = self.api.create_subject(&subject).await {
            self.errors.raise(e.user_message());
            return Err(e.into());
        }
        self.refresh_subjects().await
    }

    /// Creates a class occurrence. The server responds with a
    /// statistics job that is polled under a synthetic pending key; on
    /// success the affected lists are refetched.
    pub async fn add_class(&self, instance: NewClassInstance) -> Result<()> {
        let key = format!("add-class-{}", Uuid::new_v4());
        let guard = self.pending.begin(key);

        let created = match self.api.create_class_instance(&instance).await {
            Ok(created) => created,
            Err(e) => {
                self.errors.raise(e.user_message());
                return Err(e.into());
            }
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let errors = self.errors.clone();
        let date = instance.date;
        let on_success: JobCallback = Box::new(move || {
            Box::pin(async move {
                refetch_day(&*api, &state, &errors, date).await;
                refetch_subjects(&*api, &state, &errors).await;
            }) as BoxFuture<'static, ()>
        });

        self.poller
            .start(&created.job.id.to_string(), guard, Arc::new(NoopObserver), on_success, None);
        Ok(())
    }

    /// Marks attendance for a class instance along the optimistic path:
    /// local patch first, then the request, then job polling. The
    /// authoritative refetch after job success supersedes the
    /// optimistic value; any failure rolls the patch back.
    pub async fn mark_attendance(&self, instance_id: i64, status: AttendanceStatus) -> Result<()> {
        let key = instance_id.to_string();
        if self.pending.is_pending(&key) {
            // A mutation for this instance is already in flight.
            return Ok(());
        }

        let previous = self.find_instance(instance_id);
        let Some(previous) = previous else {
            self.errors
                .raise(format!("Class instance {} is not loaded", instance_id));
            return Ok(());
        };

        self.optimistic.capture(instance_id, previous.clone());
        let patched_record = AttendanceRecord {
            id: previous.attendance_record.as_ref().map(|r| r.id).unwrap_or(0),
            class_instance_id: instance_id,
            status,
            created_at: chrono::Local::now().naive_local(),
        };
        self.write_state(|view| patch_record(view, instance_id, Some(patched_record.clone())));

        let guard = self.pending.begin(key);

        let update = match self.api.mark_attendance(instance_id, status).await {
            Ok(update) => update,
            Err(e) => {
                // Immediate rejection: synchronous rollback, guard drops
                // on return.
                if let Some(snapshot) = self.optimistic.revert(&instance_id) {
                    self.write_state(|view| restore_instance(view, snapshot));
                }
                self.errors.raise(e.user_message());
                return Err(e.into());
            }
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let errors = self.errors.clone();
        let optimistic = Arc::clone(&self.optimistic);
        let date = self.view().selected_date;
        let on_success: JobCallback = Box::new(move || {
            Box::pin(async move {
                refetch_day(&*api, &state, &errors, date).await;
                refetch_subjects(&*api, &state, &errors).await;
                optimistic.confirm(&instance_id);
            }) as BoxFuture<'static, ()>
        });

        let state = Arc::clone(&self.state);
        let optimistic = Arc::clone(&self.optimistic);
        let on_failure: JobCallback = Box::new(move || {
            Box::pin(async move {
                if let Some(snapshot) = optimistic.revert(&instance_id) {
                    if let Ok(mut view) = state.write() {
                        restore_instance(&mut view, snapshot);
                    }
                }
            }) as BoxFuture<'static, ()>
        });

        self.poller.start(
            &update.job.id.to_string(),
            guard,
            Arc::new(NoopObserver),
            on_success,
            Some(on_failure),
        );
        Ok(())
    }

    /// Cancels all polling. Pending keys are released by the aborted
    /// tasks' guards.
    pub fn shutdown(&self) {
        self.poller.stop_all();
    }

    fn find_instance(&self, instance_id: i64) -> Option<ClassInstance> {
        let view = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        view.class_instances
            .iter()
            .chain(view.todays_classes.iter())
            .find(|instance| instance.id == instance_id)
            .cloned()
    }

    fn write_state(&self, mutate: impl FnOnce(&mut AttendanceView)) {
        let mut view = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        mutate(&mut view);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn patch_record(view: &mut AttendanceView, instance_id: i64, record: Option<AttendanceRecord>) {
    for instance in view
        .class_instances
        .iter_mut()
        .chain(view.todays_classes.iter_mut())
    {
        if instance.id == instance_id {
            instance.attendance_record = record.clone();
        }
    }
}

fn restore_instance(view: &mut AttendanceView, snapshot: ClassInstance) {
    for instance in view
        .class_instances
        .iter_mut()
        .chain(view.todays_classes.iter_mut())
    {
        if instance.id == snapshot.id {
            *instance = snapshot.clone();
        }
    }
}

async fn refetch_day<A: AttendanceApi>(
    api: &A,
    state: &RwLock<AttendanceView>,
    errors: &ErrorChannel,
    date: NaiveDate,
) {
    match api.class_instances(date).await {
        Ok(instances) => {
            if let Ok(mut view) = state.write() {
                if view.selected_date == date {
                    view.class_instances = instances.clone();
                }
                if date == today() {
                    view.todays_classes = instances;
                }
            }
        }
        Err(e) => errors.raise(e.user_message()),
    }
}

async fn refetch_subjects<A: AttendanceApi>(
    api: &A,
    state: &RwLock<AttendanceView>,
    errors: &ErrorChannel,
) {
    match api.subjects().await {
        Ok(subjects) => {
            if let Ok(mut view) = state.write() {
                view.subjects = subjects;
            }
        }
        Err(e) => errors.raise(e.user_message()),
    }
}
