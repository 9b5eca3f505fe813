//! Shared world state for board BDD scenarios.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use corkboard::{
    account::domain::{DisplayName, EmailAddress, User, UserId},
    error::ErrorKind,
    group::{domain::GroupId, services::MembershipService},
    reminder::{
        ports::{ChatNotifier, DeliveryError},
        services::ReminderService,
    },
    store::{
        adapters::InMemoryStore,
        ports::{Store, StoreError, UserStore},
    },
    task::{
        domain::TaskId,
        services::{RelationService, TaskService},
    },
};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Target channel.
    pub channel_id: String,
    /// Message body.
    pub text: String,
}

/// Chat notifier that records every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    /// Returns the messages recorded so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    async fn send_message(
        &self,
        _token: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Transport("recorder poisoned".to_owned()))?;
        sent.push(SentMessage {
            channel_id: channel_id.to_owned(),
            text: text.to_owned(),
        });
        Ok(())
    }
}

/// Scenario world for board behaviour tests.
pub struct BoardWorld {
    pub store: Arc<InMemoryStore>,
    pub memberships: MembershipService<InMemoryStore, DefaultClock>,
    pub tasks: TaskService<InMemoryStore, DefaultClock>,
    pub relations: RelationService<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub users: HashMap<String, UserId>,
    pub groups: HashMap<String, (GroupId, UserId)>,
    pub task_ids: HashMap<String, TaskId>,
    pub last_error: Option<ErrorKind>,
}

impl BoardWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            memberships: MembershipService::new(Arc::clone(&store), Arc::clone(&clock)),
            tasks: TaskService::new(Arc::clone(&store), clock),
            relations: RelationService::new(Arc::clone(&store)),
            notifier: Arc::new(RecordingNotifier::default()),
            store,
            users: HashMap::new(),
            groups: HashMap::new(),
            task_ids: HashMap::new(),
            last_error: None,
        }
    }

    /// Returns a reminder service delivering into the recorder.
    pub fn reminders(&self) -> ReminderService<InMemoryStore> {
        let notifier: Arc<dyn ChatNotifier> = self.notifier.clone();
        ReminderService::new(Arc::clone(&self.store), notifier)
    }

    /// Stores an active user.
    pub fn add_user(&mut self, name: &str) -> Result<UserId, eyre::Report> {
        let user = User::new(
            DisplayName::new(name).wrap_err("display name")?,
            EmailAddress::new(format!("{name}@example.test")).wrap_err("email")?,
            "unused-hash".to_owned(),
            &DefaultClock,
        );
        let user_id = user.id();
        run_async(
            self.store
                .transaction(move |tx| -> Result<(), StoreError> { tx.insert_user(&user) }),
        )
        .wrap_err("insert user")?;
        self.users.insert(name.to_owned(), user_id);
        Ok(user_id)
    }

    /// Looks up a user seeded earlier in the scenario.
    pub fn user(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.users
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("unknown user {name} in scenario world"))
    }

    /// Looks up a group and its creator.
    pub fn group(&self, name: &str) -> Result<(GroupId, UserId), eyre::Report> {
        self.groups
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("unknown group {name} in scenario world"))
    }

    /// Looks up a task scheduled earlier in the scenario.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(title)
            .copied()
            .ok_or_else(|| eyre!("unknown task {title} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a `YYYY-MM-DD` scenario date.
pub fn parse_day(raw: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").wrap_err_with(|| format!("invalid date {raw}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
