//! Temporary preset/profile switch with guaranteed restore.

use std::sync::Arc;
use std::time::Duration;

use crate::host::{ConfigurationCatalog, ConfigurationHandle, HostCapabilities};
use crate::settle::settle;

use super::resolver::resolve;

/// Default time to wait for the host's change event after a selection.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(1000);

/// One configuration kind inside an override session.
struct ScopedSwitch {
    catalog: Arc<dyn ConfigurationCatalog>,
    target: ConfigurationHandle,
    /// Outer `None`: not captured yet. Inner `None`: host had nothing active.
    original: Option<Option<String>>,
}

impl ScopedSwitch {
    async fn switch(&mut self, timeout: Duration) {
        let current = match self.catalog.current_name().await {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(
                    kind = %self.target.kind,
                    error = %e,
                    "could not read active configuration, skipping switch"
                );
                return;
            }
        };

        if self.original.is_none() {
            self.original = Some(current.clone());
        }

        if current.as_deref() == Some(self.target.name.as_str()) {
            tracing::debug!(kind = %self.target.kind, target = %self.target.name, "already on target");
            return;
        }

        select_and_settle(self.catalog.as_ref(), &self.target.name, timeout).await;
    }

    async fn restore(&mut self, timeout: Duration) {
        let Some(Some(original)) = self.original.as_ref() else {
            return;
        };

        let current = match self.catalog.current_name().await {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(
                    kind = %self.target.kind,
                    error = %e,
                    "could not read active configuration, skipping restore"
                );
                return;
            }
        };

        if current.as_deref() == Some(original.as_str()) {
            return;
        }

        select_and_settle(self.catalog.as_ref(), original, timeout).await;
    }
}

async fn select_and_settle(catalog: &dyn ConfigurationCatalog, name: &str, timeout: Duration) {
    let changed = catalog.subscribe_changed();
    if let Err(e) = catalog.select(name).await {
        tracing::warn!(kind = %catalog.kind(), config = name, error = %e, "configuration select failed");
        return;
    }
    let settlement = settle(changed, timeout).await;
    tracing::debug!(kind = %catalog.kind(), config = name, ?settlement, "configuration switched");
}

/// Runs host operations under a temporary preset and/or profile.
///
/// Build one with [`OverrideSession::prepare`], call [`switch`](Self::switch)
/// before the host operation and [`restore`](Self::restore) afterwards on
/// every path. Neither ever fails: this subsystem must not be the reason a
/// user-visible operation fails.
pub struct OverrideSession {
    preset: Option<ScopedSwitch>,
    profile: Option<ScopedSwitch>,
    settle_timeout: Duration,
    completed: bool,
}

impl OverrideSession {
    /// Resolves the requested names without changing anything on the host.
    ///
    /// Empty or unresolvable names leave the respective half of the session
    /// inert.
    pub async fn prepare(
        host: &HostCapabilities,
        preset_name: &str,
        profile_name: Option<&str>,
    ) -> Self {
        let preset = resolve(host.presets.as_ref(), preset_name)
            .await
            .map(|target| ScopedSwitch {
                catalog: host.presets.clone(),
                target,
                original: None,
            });

        let profile = match profile_name {
            Some(name) => resolve(host.profiles.as_ref(), name)
                .await
                .map(|target| ScopedSwitch {
                    catalog: host.profiles.clone(),
                    target,
                    original: None,
                }),
            None => None,
        };

        Self {
            preset,
            profile,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            completed: false,
        }
    }

    /// A session that never touches the host.
    pub fn inert() -> Self {
        Self {
            preset: None,
            profile: None,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            completed: false,
        }
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Whether any part of this session resolved to a host configuration.
    pub fn is_active(&self) -> bool {
        self.preset.is_some() || self.profile.is_some()
    }

    pub fn preset_target(&self) -> Option<&ConfigurationHandle> {
        self.preset.as_ref().map(|s| &s.target)
    }

    pub fn profile_target(&self) -> Option<&ConfigurationHandle> {
        self.profile.as_ref().map(|s| &s.target)
    }

    /// Activates the targets: profile first, then preset, each settled before
    /// the next.
    ///
    /// The configuration active before the first call is captured once;
    /// repeated calls never overwrite it.
    pub async fn switch(&mut self) {
        self.completed = false;
        if let Some(profile) = self.profile.as_mut() {
            profile.switch(self.settle_timeout).await;
        }
        if let Some(preset) = self.preset.as_mut() {
            preset.switch(self.settle_timeout).await;
        }
    }

    /// Reinstates the captured originals in reverse order: preset, then
    /// profile.
    ///
    /// No-op when nothing was switched or the session was already restored.
    pub async fn restore(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;

        if let Some(preset) = self.preset.as_mut() {
            preset.restore(self.settle_timeout).await;
        }
        if let Some(profile) = self.profile.as_mut() {
            profile.restore(self.settle_timeout).await;
        }
    }
}
