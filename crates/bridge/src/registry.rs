//! Automation endpoint registry
//!
//! Process-wide slot for the currently connected automation capability.
//! The host platform's service lifecycle owns the capability itself; the
//! registry only holds a weak reference, set on connect and cleared on
//! disconnect. Every gesture or overlay invocation issued by a command
//! handler goes through `with_capability`, so no handler ever dereferences
//! a stale endpoint.

use gesture::{DispatchError, StrokeInjector};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::info;

/// Host-platform-granted ability to synthesize input events, represented
/// only by its injection surface.
pub type AutomationCapability = dyn StrokeInjector + Send + Sync;

/// Two-state registry: `Disconnected` (empty slot, the initial state) and
/// `Connected` (a weak reference that still upgrades).
///
/// The slot is behind a mutex because some hosts deliver lifecycle
/// callbacks on a different thread than commands; on a single UI-affine
/// thread the lock is uncontended and costs nothing.
pub struct EndpointRegistry<C: ?Sized> {
    slot: Mutex<Option<Weak<C>>>,
}

impl<C: ?Sized> EndpointRegistry<C> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// `Disconnected -> Connected`; invoked by the host platform's
    /// "service connected" callback.
    pub fn connect(&self, capability: &Arc<C>) {
        *self.slot.lock() = Some(Arc::downgrade(capability));
    }

    /// `Connected -> Disconnected`; invoked by the "service unbound"
    /// callback. Not an error, merely "capability currently unavailable".
    pub fn disconnect(&self) {
        *self.slot.lock() = None;
    }

    /// Pure availability probe. Also false once the host has dropped the
    /// capability without a disconnect callback.
    pub fn is_available(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .map_or(false, |weak| weak.strong_count() > 0)
    }

    /// The single access gate: runs `f` against the live capability, or
    /// reports `NoCapability` without touching anything.
    pub fn with_capability<T>(
        &self,
        f: impl FnOnce(&C) -> T,
    ) -> Result<T, DispatchError> {
        let capability = self
            .slot
            .lock()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(DispatchError::NoCapability)?;
        Ok(f(&capability))
    }
}

impl<C: ?Sized> Default for EndpointRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: Lazy<Arc<EndpointRegistry<AutomationCapability>>> =
    Lazy::new(|| Arc::new(EndpointRegistry::new()));

/// The process-wide registry instance.
pub fn registry() -> Arc<EndpointRegistry<AutomationCapability>> {
    Arc::clone(&REGISTRY)
}

/// Host-platform lifecycle adapter: service connected.
pub fn on_capability_connected(capability: &Arc<AutomationCapability>) {
    REGISTRY.connect(capability);
    info!("automation endpoint connected");
}

/// Host-platform lifecycle adapter: service unbound or destroyed.
pub fn on_capability_disconnected() {
    REGISTRY.disconnect();
    info!("automation endpoint disconnected");
}
