//! Config ownership with explicit change listeners.
//!
//! Components that mirror settings (a toolbar toggle, a radius slider)
//! register a listener here instead of intercepting writes to a shared
//! settings object. Persisting the config is the host's job; it plugs in a
//! save hook.
//!
//! A session does not subscribe itself. The host forwards changes to each
//! view with [`LayoutSession::reconfigure`](crate::LayoutSession::reconfigure).

use super::layout::{ConfigError, LayoutConfig};

/// Identifies a registered listener so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&LayoutConfig) + Send + Sync>;
type SaveHook = Box<dyn FnMut(&LayoutConfig) + Send>;

/// Owns a [`LayoutConfig`] and notifies listeners on every update.
pub struct ConfigHandle {
    config: LayoutConfig,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
    save_hook: Option<SaveHook>,
}

impl ConfigHandle {
    /// Wrap a config. No listeners, no save hook.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            listeners: Vec::new(),
            next_id: 0,
            save_hook: None,
        }
    }

    /// Install the callback that persists the config after each update.
    pub fn with_save_hook(mut self, hook: impl FnMut(&LayoutConfig) + Send + 'static) -> Self {
        self.save_hook = Some(Box::new(hook));
        self
    }

    /// Current config.
    pub fn get(&self) -> &LayoutConfig {
        &self.config
    }

    /// Register a listener called after every successful update.
    pub fn subscribe(&mut self, listener: impl Fn(&LayoutConfig) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Mutate the config, validate, notify listeners, then save.
    ///
    /// An update that fails validation is discarded and nobody is notified.
    pub fn update(&mut self, f: impl FnOnce(&mut LayoutConfig)) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        f(&mut next);
        next.validate()?;
        if next == self.config {
            return Ok(());
        }
        self.config = next;
        tracing::debug!(
            params_hash = %self.config.params_hash(),
            listeners = self.listeners.len(),
            "Layout config updated"
        );
        for (_, listener) in &self.listeners {
            listener(&self.config);
        }
        if let Some(hook) = self.save_hook.as_mut() {
            hook(&self.config);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("save_hook", &self.save_hook.is_some())
            .finish()
    }
}
