use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::action::ActionResult;
use super::dispatcher::{
    perform, ActionDispatcher, CollaboratorCall, CollaboratorReply, Directive, NotificationRequest,
};
use super::event::Event;
use super::telemetry::{
    CallOutcome, LifecycleEvent, NotificationEventKind, TelemetryEvent, TelemetryRecorder,
};
use super::time::Round;
use crate::config::EngineConfig;
use crate::context::{build_context, ActivityEvent, ActivityTracker, ContextSnapshot, KvStore};
use crate::error::{HeraldError, Result};
use crate::facts::{install_defaults, FactStore};
use crate::notify::{
    DismissReason, Notification, NotificationId, NotificationQueue, QueueEffect, ToastSurface,
};
use crate::rules::{automated_actions, register_builtin_rules, ErrorPatterns, RuleSet};
use crate::services::Collaborators;

const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Evaluating,
}

/// What one inference round did.
#[derive(Debug, Clone, Default)]
pub struct RoundReport {
    pub round: Round,
    /// Rules invoked, in invocation order.
    pub evaluated: Vec<String>,
    /// Rules that returned an error or panicked.
    pub failed: Vec<String>,
    /// Results handed to the dispatcher, in rule order.
    pub dispatched: Vec<ActionResult>,
    /// Collaborator calls the driver still has to run.
    pub calls: Vec<CollaboratorCall>,
}

/// Rule engine plus notification queue. One instance per page lifecycle.
///
/// All mutation happens through `&mut self`, so rounds, queue transitions and
/// events never interleave. `start` moves the engine into a driver task and
/// `EngineHandle::stop` hands it back.
pub struct Engine {
    pub facts: FactStore,
    pub rules: RuleSet,
    pub queue: NotificationQueue,
    pub telemetry: TelemetryRecorder,
    pub round: Round,
    state: LoopState,
    dispatcher: ActionDispatcher,
    store: Box<dyn KvStore>,
    activity: ActivityTracker,
    page: String,
    surface: Arc<dyn ToastSurface>,
    collaborators: Collaborators,
    config: EngineConfig,
}

impl Engine {
    /// Empty engine: no facts, no rules. Fails on an invalid config.
    pub fn new(
        config: EngineConfig,
        store: Box<dyn KvStore>,
        collaborators: Collaborators,
        surface: Arc<dyn ToastSurface>,
    ) -> Result<Self> {
        config.validate()?;
        let activity = ActivityTracker::load(store.as_ref());
        Ok(Self {
            facts: FactStore::new(),
            rules: RuleSet::new(),
            queue: NotificationQueue::new(config.cooldown(), config.queue_capacity),
            telemetry: TelemetryRecorder::with_capacity(config.telemetry_capacity),
            round: Round::new(),
            state: LoopState::Idle,
            dispatcher: ActionDispatcher::new(config.notify_on_collaborator_failure),
            store,
            activity,
            page: "/".to_string(),
            surface,
            collaborators,
            config,
        })
    }

    /// Engine seeded with the default fact base and the built-in rules.
    pub fn with_defaults(
        config: EngineConfig,
        store: Box<dyn KvStore>,
        collaborators: Collaborators,
        surface: Arc<dyn ToastSurface>,
    ) -> Result<Self> {
        let mut engine = Self::new(config, store, collaborators, surface)?;
        install_defaults(&mut engine.facts);
        register_builtin_rules(&mut engine.rules);
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        self.store.as_mut()
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    pub fn build_context(&self) -> ContextSnapshot {
        build_context(&self.page, self.store.as_ref(), &self.activity, &self.facts)
    }

    /// One inference round.
    ///
    /// Every rule runs exactly once against the same snapshot, in registration
    /// order. A rule that errors or panics is logged and skipped; the others
    /// still run.
    pub fn run_round(&mut self, now: Instant) -> RoundReport {
        self.state = LoopState::Evaluating;
        self.round = self.round.next();
        let ctx = self.build_context();

        let mut report = RoundReport {
            round: self.round,
            ..RoundReport::default()
        };

        for (name, rule) in self.rules.iter() {
            report.evaluated.push(name.to_string());

            match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(&ctx))) {
                Ok(Ok(Some(result))) => report.dispatched.push(result),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!("Rule {} failed: {}", name, e);
                    report.failed.push(name.to_string());
                }
                Err(_) => {
                    warn!("Rule {} panicked", name);
                    report.failed.push(name.to_string());
                }
            }
        }

        for name in &report.failed {
            self.telemetry.record(TelemetryEvent::RuleFailed {
                round: self.round,
                rule: name.clone(),
            });
        }

        for result in &report.dispatched {
            if let Some(call) = self.execute_action(result, now) {
                report.calls.push(call);
            }
        }

        self.telemetry.record(TelemetryEvent::RoundCompleted {
            round: self.round,
            evaluated: report.evaluated.len(),
            failed: report.failed.len(),
            dispatched: report.dispatched.len(),
        });
        debug!(
            round = self.round.number,
            evaluated = report.evaluated.len(),
            failed = report.failed.len(),
            dispatched = report.dispatched.len(),
            "inference round complete"
        );

        self.state = LoopState::Idle;
        report
    }

    /// Applies one action. Notifications are enqueued here; collaborator calls
    /// are returned for the driver to spawn.
    pub fn execute_action(&mut self, result: &ActionResult, now: Instant) -> Option<CollaboratorCall> {
        match self.dispatcher.execute(result)? {
            Directive::Notify(request) => {
                self.notify(request, now);
                None
            }
            Directive::Call(call) => Some(call),
        }
    }

    /// Enqueues a notification. Returns its id, or `None` if the queue is full.
    pub fn notify(&mut self, request: NotificationRequest, now: Instant) -> Option<NotificationId> {
        let notification = Notification::new(request.message, request.kind, request.critical);
        let id = notification.id;

        match self.queue.enqueue(notification, now) {
            Ok(effects) => {
                self.record_notification(Some(id), NotificationEventKind::Queued);
                self.apply(effects);
                Some(id)
            }
            Err(full) => {
                warn!("Dropped notification: {}", full);
                self.record_notification(None, NotificationEventKind::Rejected);
                self.apply(full.effects);
                None
            }
        }
    }

    /// Idempotent: only the visible notification can be dismissed.
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) {
        let effects = self.queue.dismiss(id, now);
        self.apply(effects);
    }

    pub fn poll_queue(&mut self, now: Instant) {
        let effects = self.queue.poll(now);
        self.apply(effects);
    }

    pub fn navigate(&mut self, page: impl Into<String>) {
        let page = page.into();
        self.record_activity(ActivityEvent::PageView(page.clone()));
        self.page = page;
    }

    pub fn record_activity(&mut self, event: ActivityEvent) {
        self.activity.record(&event, self.store.as_mut());
    }

    /// Runs the automated steps for a click whose intent clears the
    /// confidence gate. Returns collaborator calls to spawn.
    pub fn automate(&mut self, click: &str, now: Instant) -> Vec<CollaboratorCall> {
        let ctx = self.build_context();
        let actions = automated_actions(click, &ctx);
        if !actions.is_empty() {
            debug!(click, steps = actions.len(), "automating click");
        }
        actions
            .iter()
            .filter_map(|result| self.execute_action(result, now))
            .collect()
    }

    pub fn handle_reply(&mut self, reply: CollaboratorReply, now: Instant) {
        let outcome = match reply.error() {
            Some(e) => {
                warn!("Collaborator {:?} call failed: {}", reply.kind(), e);
                CallOutcome::Failed
            }
            None => CallOutcome::Succeeded,
        };
        self.telemetry.record(TelemetryEvent::Collaborator {
            call: reply.kind(),
            outcome,
        });

        let patterns = ErrorPatterns::from_facts(&self.facts);
        if let Some(request) = self.dispatcher.on_reply(&reply, &patterns) {
            self.notify(request, now);
        }
    }

    /// Applies an external event. Returns collaborator calls to spawn.
    pub fn handle_event(&mut self, event: Event, now: Instant) -> Vec<CollaboratorCall> {
        match event {
            Event::Navigate(page) => self.navigate(page),
            Event::Activity(ActivityEvent::Click(action)) => {
                self.record_activity(ActivityEvent::Click(action.clone()));
                return self.automate(&action, now);
            }
            Event::Activity(activity) => self.record_activity(activity),
            Event::Dismiss(id) => self.dismiss(id, now),
            Event::DismissCurrent => {
                if let Some(id) = self.queue.current().map(|n| n.id) {
                    self.dismiss(id, now);
                }
            }
            Event::Action(result) => return self.execute_action(&result, now).into_iter().collect(),
            Event::Reply(reply) => self.handle_reply(reply, now),
        }
        Vec::new()
    }

    fn apply(&mut self, effects: Vec<QueueEffect>) {
        for effect in effects {
            match effect {
                QueueEffect::Show {
                    notification,
                    duration,
                } => {
                    self.surface.show(&notification, duration);
                    self.record_notification(Some(notification.id), NotificationEventKind::Shown);
                }
                QueueEffect::Hide { id, reason } => {
                    self.surface.hide(id, reason);
                    let kind = match reason {
                        DismissReason::Expired => NotificationEventKind::Expired,
                        DismissReason::Manual => NotificationEventKind::Dismissed,
                    };
                    self.record_notification(Some(id), kind);
                }
            }
        }
    }

    fn record_notification(&mut self, id: Option<NotificationId>, event: NotificationEventKind) {
        self.telemetry
            .record(TelemetryEvent::NotificationLifecycle { id, event });
    }

    /// Moves the engine into a driver task.
    pub fn start(self) -> EngineHandle {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(rx, tx.clone(), cancel.clone()));
        EngineHandle { tx, cancel, task }
    }

    /// Async driver loop. Returns the engine once cancelled.
    async fn run(
        mut self,
        mut rx: mpsc::Receiver<Event>,
        tx: mpsc::Sender<Event>,
        cancel: CancellationToken,
    ) -> Self {
        let period = self.config.inference_period();
        info!("Herald engine started. Inference every {}ms", period.as_millis());
        self.telemetry
            .record(TelemetryEvent::Lifecycle(LifecycleEvent::Started));

        let started = Instant::now();
        // First round one full period after start.
        let mut cadence = interval_at(started + period, period);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let deadline = self.queue.next_deadline();

            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = cadence.tick() => {
                    let report = self.run_round(Instant::now());
                    for call in report.calls {
                        self.spawn_call(call, tx.clone(), cancel.clone());
                    }
                }

                _ = wait_for(deadline) => self.poll_queue(Instant::now()),

                Some(event) = rx.recv() => {
                    for call in self.handle_event(event, Instant::now()) {
                        self.spawn_call(call, tx.clone(), cancel.clone());
                    }
                }
            }
        }

        let elapsed = started.elapsed().as_secs();
        if elapsed > 0 {
            self.record_activity(ActivityEvent::TimeSpent(elapsed));
        }
        self.telemetry
            .record(TelemetryEvent::Lifecycle(LifecycleEvent::Stopped));
        info!("Herald engine stopped after {} rounds", self.round.number);
        self
    }

    fn spawn_call(&self, call: CollaboratorCall, tx: mpsc::Sender<Event>, cancel: CancellationToken) {
        let collaborators = self.collaborators.clone();
        let patterns = ErrorPatterns::from_facts(&self.facts);
        debug!(call = ?call.kind(), "collaborator call dispatched");

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                reply = perform(call, &collaborators, &patterns) => {
                    let _ = tx.send(Event::Reply(reply)).await;
                }
            }
        });
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Owner-side handle of a running engine.
pub struct EngineHandle {
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
    task: JoinHandle<Engine>,
}

impl EngineHandle {
    pub async fn send(&self, event: Event) -> Result<()> {
        self.tx.send(event).await.map_err(|_| HeraldError::Stopped)
    }

    pub async fn navigate(&self, page: impl Into<String>) -> Result<()> {
        self.send(Event::Navigate(page.into())).await
    }

    pub async fn record(&self, activity: ActivityEvent) -> Result<()> {
        self.send(Event::Activity(activity)).await
    }

    pub async fn dismiss(&self, id: NotificationId) -> Result<()> {
        self.send(Event::Dismiss(id)).await
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the driver and returns the engine with its final state.
    pub async fn stop(self) -> Result<Engine> {
        self.cancel.cancel();
        self.task.await.map_err(|_| HeraldError::Stopped)
    }
}
