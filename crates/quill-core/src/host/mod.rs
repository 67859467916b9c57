//! Typed capability interface of the chat host.
//!
//! Quill never talks to the page directly. Everything it needs from the host
//! is expressed by the traits in this module, and a [`HostCapabilities`]
//! bundle is assembled once at startup. A host that lacks a capability fails
//! at [`HostCapabilitiesBuilder::build`] instead of at the first call site that
//! happens to need it.

pub mod model;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{QuillError, Result};

pub use model::{
    AlertLevel, CommandResult, ConfigurationHandle, ConfigurationKind, ControlHandle,
    ExecuteOptions, FieldRef, LastMessageState,
};

/// Runs command strings through the host's script interpreter.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Executes `command` and returns the interpreter result.
    ///
    /// The command string is opaque to Quill.
    async fn execute_command(&self, command: &str, options: ExecuteOptions)
    -> Result<CommandResult>;
}

/// Enumeration and selection of one kind of named configuration.
///
/// The host keeps two mutually exclusive configuration formats; a catalog only
/// ever lists the entries of the format that is currently active.
#[async_trait]
pub trait ConfigurationCatalog: Send + Sync {
    /// Kind served by this catalog.
    fn kind(&self) -> ConfigurationKind;

    /// Name of the active configuration, `None` if nothing is selected.
    async fn current_name(&self) -> Result<Option<String>>;

    /// Names selectable in the active format.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Asks the host to activate `name`. Completion is signalled through
    /// [`ConfigurationCatalog::subscribe_changed`].
    async fn select(&self, name: &str) -> Result<()>;

    /// One-shot notification fired after the next selection takes effect.
    ///
    /// Subscribe before calling `select` so the event cannot be missed.
    fn subscribe_changed(&self) -> oneshot::Receiver<()>;
}

/// Primitives over the last chat message's swipe list.
#[async_trait]
pub trait SwipeControl: Send + Sync {
    /// Reads the swipe state of the last message; `None` when the chat is empty.
    async fn read_last_message_state(&self) -> Result<Option<LastMessageState>>;

    /// Finds the advance control of the last message, `None` if it is not rendered.
    async fn locate_advance_control(&self) -> Result<Option<ControlHandle>>;

    /// Fires one low-level advance trigger (a click) on the control.
    async fn fire_advance_trigger(&self, control: &ControlHandle) -> Result<()>;
}

/// Read/write access to text fields of the host page.
#[async_trait]
pub trait TextField: Send + Sync {
    /// Current value, `None` if the field does not exist.
    async fn read_field(&self, field: &FieldRef) -> Result<Option<String>>;

    /// Writes a value; fails with `NotFound` when the field does not exist.
    async fn write_field(&self, field: &FieldRef, value: &str) -> Result<()>;

    /// Emits a change notification so observers re-render.
    async fn notify_change(&self, field: &FieldRef) -> Result<()>;
}

/// Surfaces messages to the user (toast/alert equivalent).
pub trait UserNotifier: Send + Sync {
    fn alert(&self, level: AlertLevel, message: &str);
}

/// The complete set of capabilities Quill requires from its host.
#[derive(Clone)]
pub struct HostCapabilities {
    pub commands: Arc<dyn CommandExecutor>,
    pub presets: Arc<dyn ConfigurationCatalog>,
    pub profiles: Arc<dyn ConfigurationCatalog>,
    pub swipes: Arc<dyn SwipeControl>,
    pub fields: Arc<dyn TextField>,
    pub notifier: Arc<dyn UserNotifier>,
}

impl HostCapabilities {
    pub fn builder() -> HostCapabilitiesBuilder {
        HostCapabilitiesBuilder::default()
    }

    /// Returns the catalog serving `kind`.
    pub fn catalog(&self, kind: ConfigurationKind) -> Arc<dyn ConfigurationCatalog> {
        match kind {
            ConfigurationKind::Preset => self.presets.clone(),
            ConfigurationKind::Profile => self.profiles.clone(),
        }
    }
}

/// Builder for [`HostCapabilities`].
#[derive(Default)]
pub struct HostCapabilitiesBuilder {
    commands: Option<Arc<dyn CommandExecutor>>,
    presets: Option<Arc<dyn ConfigurationCatalog>>,
    profiles: Option<Arc<dyn ConfigurationCatalog>>,
    swipes: Option<Arc<dyn SwipeControl>>,
    fields: Option<Arc<dyn TextField>>,
    notifier: Option<Arc<dyn UserNotifier>>,
}

impl HostCapabilitiesBuilder {
    pub fn commands(mut self, commands: Arc<dyn CommandExecutor>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn presets(mut self, presets: Arc<dyn ConfigurationCatalog>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn profiles(mut self, profiles: Arc<dyn ConfigurationCatalog>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn swipes(mut self, swipes: Arc<dyn SwipeControl>) -> Self {
        self.swipes = Some(swipes);
        self
    }

    pub fn fields(mut self, fields: Arc<dyn TextField>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn UserNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Assembles the bundle.
    ///
    /// # Errors
    ///
    /// Returns `QuillError::MissingCapability` naming the first absent
    /// capability, or `QuillError::Config` when a catalog is registered under
    /// the wrong kind.
    pub fn build(self) -> Result<HostCapabilities> {
        let presets = self
            .presets
            .ok_or(QuillError::MissingCapability("presets"))?;
        let profiles = self
            .profiles
            .ok_or(QuillError::MissingCapability("profiles"))?;

        if presets.kind() != ConfigurationKind::Preset {
            return Err(QuillError::config(format!(
                "preset catalog reports kind '{}'",
                presets.kind()
            )));
        }
        if profiles.kind() != ConfigurationKind::Profile {
            return Err(QuillError::config(format!(
                "profile catalog reports kind '{}'",
                profiles.kind()
            )));
        }

        Ok(HostCapabilities {
            commands: self
                .commands
                .ok_or(QuillError::MissingCapability("commands"))?,
            presets,
            profiles,
            swipes: self.swipes.ok_or(QuillError::MissingCapability("swipes"))?,
            fields: self.fields.ok_or(QuillError::MissingCapability("fields"))?,
            notifier: self
                .notifier
                .ok_or(QuillError::MissingCapability("notifier"))?,
        })
    }
}
