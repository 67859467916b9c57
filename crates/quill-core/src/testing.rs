//! In-memory host used by unit and integration tests.
//!
//! Every fake records what Quill asked of it so tests can assert on the
//! exact sequence of host calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{QuillError, Result};
use crate::host::{
    AlertLevel, CommandExecutor, CommandResult, ConfigurationCatalog, ConfigurationKind,
    ControlHandle, ExecuteOptions, FieldRef, HostCapabilities, LastMessageState, SwipeControl,
    TextField, UserNotifier,
};

// ============================================================================
// Commands
// ============================================================================

#[derive(Default)]
pub struct FakeCommands {
    pub executed: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
    pub response: Mutex<CommandResult>,
}

impl FakeCommands {
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn set_response(&self, response: CommandResult) {
        *self.response.lock().unwrap() = response;
    }
}

#[async_trait]
impl CommandExecutor for FakeCommands {
    async fn execute_command(
        &self,
        command: &str,
        _options: ExecuteOptions,
    ) -> Result<CommandResult> {
        self.executed.lock().unwrap().push(command.to_string());
        if *self.fail.lock().unwrap() {
            return Err(QuillError::host("execute_command", "interpreter unavailable"));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

// ============================================================================
// Configuration catalogs
// ============================================================================

pub struct FakeCatalog {
    kind: ConfigurationKind,
    pub names: Mutex<Vec<String>>,
    pub current: Mutex<Option<String>>,
    pub selections: Mutex<Vec<String>>,
    pub fail_listing: Mutex<bool>,
    pub fail_select: Mutex<bool>,
    /// When false the change event never fires, forcing the settle timeout.
    pub fires_change_event: Mutex<bool>,
    waiters: Mutex<Vec<oneshot::Sender<()>>>,
}

impl FakeCatalog {
    pub fn new(kind: ConfigurationKind, names: &[&str], current: Option<&str>) -> Self {
        Self {
            kind,
            names: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            current: Mutex::new(current.map(str::to_string)),
            selections: Mutex::new(Vec::new()),
            fail_listing: Mutex::new(false),
            fail_select: Mutex::new(false),
            fires_change_event: Mutex::new(true),
            waiters: Mutex::new(Vec::new()),
        }
    }

    pub fn selections(&self) -> Vec<String> {
        self.selections.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    /// Changes the active configuration behind Quill's back.
    pub fn set_current(&self, name: &str) {
        *self.current.lock().unwrap() = Some(name.to_string());
    }
}

#[async_trait]
impl ConfigurationCatalog for FakeCatalog {
    fn kind(&self) -> ConfigurationKind {
        self.kind
    }

    async fn current_name(&self) -> Result<Option<String>> {
        if *self.fail_listing.lock().unwrap() {
            return Err(QuillError::host("current_name", "catalog unavailable"));
        }
        Ok(self.current.lock().unwrap().clone())
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        if *self.fail_listing.lock().unwrap() {
            return Err(QuillError::host("list_names", "catalog unavailable"));
        }
        Ok(self.names.lock().unwrap().clone())
    }

    async fn select(&self, name: &str) -> Result<()> {
        self.selections.lock().unwrap().push(name.to_string());
        if *self.fail_select.lock().unwrap() {
            return Err(QuillError::host("select", "selection rejected"));
        }
        *self.current.lock().unwrap() = Some(name.to_string());
        if *self.fires_change_event.lock().unwrap() {
            for waiter in self.waiters.lock().unwrap().drain(..) {
                let _ = waiter.send(());
            }
        }
        Ok(())
    }

    fn subscribe_changed(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().unwrap().push(tx);
        rx
    }
}

// ============================================================================
// Swipes
// ============================================================================

/// Models the host's swipe list: a click moves right, a click on the last
/// swipe generates a new one.
pub struct FakeSwipes {
    pub state: Mutex<Option<LastMessageState>>,
    pub control_present: Mutex<bool>,
    pub triggers: Mutex<usize>,
    /// Number of upcoming clicks the host swallows without effect.
    pub dropped_clicks: Mutex<usize>,
    pub fail_reads: Mutex<bool>,
}

impl FakeSwipes {
    pub fn new(swipe_id: usize, swipe_count: usize) -> Self {
        Self {
            state: Mutex::new(Some(LastMessageState::new(swipe_id, swipe_count))),
            control_present: Mutex::new(true),
            triggers: Mutex::new(0),
            dropped_clicks: Mutex::new(0),
            fail_reads: Mutex::new(false),
        }
    }

    pub fn triggers(&self) -> usize {
        *self.triggers.lock().unwrap()
    }

    pub fn state(&self) -> Option<LastMessageState> {
        *self.state.lock().unwrap()
    }
}

#[async_trait]
impl SwipeControl for FakeSwipes {
    async fn read_last_message_state(&self) -> Result<Option<LastMessageState>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(QuillError::host("read_last_message_state", "chat not loaded"));
        }
        Ok(*self.state.lock().unwrap())
    }

    async fn locate_advance_control(&self) -> Result<Option<ControlHandle>> {
        let present = *self.control_present.lock().unwrap();
        Ok(present.then(|| ControlHandle(".last_mes .swipe_right".to_string())))
    }

    async fn fire_advance_trigger(&self, _control: &ControlHandle) -> Result<()> {
        *self.triggers.lock().unwrap() += 1;

        let mut dropped = self.dropped_clicks.lock().unwrap();
        if *dropped > 0 {
            *dropped -= 1;
            return Ok(());
        }

        let mut state = self.state.lock().unwrap();
        if let Some(LastMessageState {
            swipe_id: Some(id),
            swipe_count: Some(count),
        }) = *state
        {
            let next = if id + 1 >= count {
                LastMessageState::new(id + 1, count + 1)
            } else {
                LastMessageState::new(id + 1, count)
            };
            *state = Some(next);
        }
        Ok(())
    }
}

// ============================================================================
// Fields and notifications
// ============================================================================

#[derive(Default)]
pub struct FakeFields {
    pub values: Mutex<HashMap<FieldRef, String>>,
    pub notifications: Mutex<Vec<FieldRef>>,
    pub fail: Mutex<bool>,
}

impl FakeFields {
    pub fn with_value(field: &FieldRef, value: &str) -> Self {
        let fields = Self::default();
        fields.set(field, value);
        fields
    }

    pub fn set(&self, field: &FieldRef, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(field.clone(), value.to_string());
    }

    pub fn get(&self, field: &FieldRef) -> Option<String> {
        self.values.lock().unwrap().get(field).cloned()
    }

    pub fn remove(&self, field: &FieldRef) {
        self.values.lock().unwrap().remove(field);
    }

    pub fn notifications(&self) -> Vec<FieldRef> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextField for FakeFields {
    async fn read_field(&self, field: &FieldRef) -> Result<Option<String>> {
        if *self.fail.lock().unwrap() {
            return Err(QuillError::host("read_field", "page unavailable"));
        }
        Ok(self.get(field))
    }

    async fn write_field(&self, field: &FieldRef, value: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(QuillError::host("write_field", "page unavailable"));
        }
        let mut values = self.values.lock().unwrap();
        match values.get_mut(field) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(QuillError::not_found("field", field.as_str())),
        }
    }

    async fn notify_change(&self, field: &FieldRef) -> Result<()> {
        self.notifications.lock().unwrap().push(field.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub alerts: Mutex<Vec<(AlertLevel, String)>>,
}

impl FakeNotifier {
    pub fn alerts(&self) -> Vec<(AlertLevel, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserNotifier for FakeNotifier {
    fn alert(&self, level: AlertLevel, message: &str) {
        self.alerts.lock().unwrap().push((level, message.to_string()));
    }
}

// ============================================================================
// Whole host
// ============================================================================

/// A complete fake host with handles to each fake for assertions.
pub struct FakeHost {
    pub commands: Arc<FakeCommands>,
    pub presets: Arc<FakeCatalog>,
    pub profiles: Arc<FakeCatalog>,
    pub swipes: Arc<FakeSwipes>,
    pub fields: Arc<FakeFields>,
    pub notifier: Arc<FakeNotifier>,
}

impl FakeHost {
    /// A host with two presets, two profiles, a three-swipe last message and
    /// an empty chat input.
    pub fn new() -> Self {
        Self {
            commands: Arc::new(FakeCommands::default()),
            presets: Arc::new(FakeCatalog::new(
                ConfigurationKind::Preset,
                &["Default", "GGSytemPrompt"],
                Some("Default"),
            )),
            profiles: Arc::new(FakeCatalog::new(
                ConfigurationKind::Profile,
                &["Main", "Summarizer"],
                Some("Main"),
            )),
            swipes: Arc::new(FakeSwipes::new(0, 3)),
            fields: Arc::new(FakeFields::with_value(&FieldRef::chat_input(), "")),
            notifier: Arc::new(FakeNotifier::default()),
        }
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            commands: self.commands.clone(),
            presets: self.presets.clone(),
            profiles: self.profiles.clone(),
            swipes: self.swipes.clone(),
            fields: self.fields.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}
