//! The Kernel — the heart of the desktop.
//!
//! The Kernel owns and coordinates all core components:
//! - VFS router (the composed mount table)
//! - App registry (manifests from `/system/apps`)
//! - Capability registry (file-kind → handler dispatch)
//! - Event bus (lifecycle broadcasts)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Kernel                           │
//! │  ┌──────────────┐  ┌───────────────┐  ┌───────────────┐  │
//! │  │  MountableFs │  │  AppRegistry  │  │  Capability   │  │
//! │  │  /system     │  │  (app.json)   │  │  Registry     │  │
//! │  │  /home /music│  │               │  │               │  │
//! │  └──────────────┘  └───────────────┘  └───────────────┘  │
//! │  ┌──────────────┐                                        │
//! │  │   EventBus   │                                        │
//! │  └──────────────┘                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global kernel. The boot sequencer constructs one and
//! threads it (or just its filesystem handle) to whoever needs it.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio::sync::RwLock;
use tracing::info;

use deskos_types::{AppManifest, FileDescriptor, FileKind};

use crate::apps::{AppRegistry, load_entry_source, seed_home};
use crate::capability::{Capability, CapabilityError, CapabilityRegistry};
use crate::events::{DEFAULT_EVENT_CAPACITY, EventBus, KernelEvent};
use crate::image::SystemImage;
use crate::vfs::{Filesystem, MemoryFs, MountInfo, MountableFs, OverlayFs};

/// Configuration for kernel boot.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Name of this kernel (shows up in logs).
    pub name: String,
    /// Image unpacked into the read-only lower layer of `/system`.
    pub system_image: Option<SystemImage>,
    /// Event bus capacity.
    pub event_capacity: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: "desktop".to_string(),
            system_image: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl KernelConfig {
    /// A kernel with an empty `/system` — useful in tests.
    pub fn bare() -> Self {
        Self::default()
    }

    /// A kernel whose `/system` is seeded from the given image.
    pub fn with_image(image: SystemImage) -> Self {
        Self {
            system_image: Some(image),
            ..Self::default()
        }
    }
}

/// What `launch` hands back: the manifest plus the entry source text,
/// ready for the shell to turn into a running module.
#[derive(Debug, Clone)]
pub struct LaunchedApp {
    pub manifest: AppManifest,
    pub source: String,
}

/// The Kernel — owns the composed filesystem and the desktop registries.
pub struct Kernel {
    name: String,
    fs: Arc<MountableFs>,
    events: EventBus,
    apps: RwLock<AppRegistry>,
    capabilities: RwLock<CapabilityRegistry>,
}

impl Kernel {
    /// Boot a kernel: compose the filesystem, scan for apps, announce.
    ///
    /// The mount layout is fixed:
    /// - `/system` — an overlay whose lower layer is the unpacked system
    ///   image (never mutated) and whose upper layer absorbs every write;
    /// - `/home` — volatile memory, lazily seeded per app;
    /// - `/music` — volatile memory for the media library.
    pub async fn boot(config: KernelConfig) -> Result<Self> {
        let lower = match &config.system_image {
            Some(image) => image
                .unpack()
                .await
                .context("failed to unpack system image")?,
            None => Arc::new(MemoryFs::new()),
        };
        let upper = Arc::new(MemoryFs::new());

        let mut router = MountableFs::new();
        router
            .mount_arc("/system", Arc::new(OverlayFs::new(upper, lower)))
            .mount("/home", MemoryFs::new())
            .mount("/music", MemoryFs::new());
        let fs = Arc::new(router);

        let mut apps = AppRegistry::new();
        let loaded = apps
            .load_from_system(fs.as_ref())
            .await
            .context("failed to scan /system/apps")?;

        let events = EventBus::new(config.event_capacity);
        for manifest in apps.list() {
            events.emit(KernelEvent::AppRegistered {
                id: manifest.id.clone(),
            });
        }

        info!(name = %config.name, apps = loaded, "kernel booted");
        events.emit(KernelEvent::Booted);

        Ok(Self {
            name: config.name,
            fs,
            events,
            apps: RwLock::new(apps),
            capabilities: RwLock::new(CapabilityRegistry::new()),
        })
    }

    /// Kernel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The composed filesystem — the sole handle the rest of the system
    /// gets.
    pub fn fs(&self) -> Arc<dyn Filesystem> {
        Arc::clone(&self.fs) as Arc<dyn Filesystem>
    }

    /// Current mount table.
    pub fn mounts(&self) -> Vec<MountInfo> {
        self.fs.list_mounts()
    }

    /// The kernel's event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Register an app manifest directly (beyond the boot-time scan).
    pub async fn register_app(&self, manifest: AppManifest) -> Result<()> {
        manifest.validate().map_err(|e| anyhow!(e))?;
        let id = manifest.id.clone();
        self.apps.write().await.register(manifest);
        self.events.emit(KernelEvent::AppRegistered { id });
        Ok(())
    }

    /// All registered apps, sorted by id.
    pub async fn apps(&self) -> Vec<AppManifest> {
        self.apps.read().await.list().into_iter().cloned().collect()
    }

    /// Register a capability handler for a file kind.
    pub async fn register_capability(&self, kind: FileKind, handler: impl Capability + 'static) {
        self.capabilities.write().await.register(kind, handler);
    }

    /// Open a file through the capability registry.
    pub async fn open_file(&self, file: &FileDescriptor) -> Result<(), CapabilityError> {
        self.capabilities.read().await.open(file).await?;
        self.events.emit(KernelEvent::FileOpened {
            kind: file.kind,
            name: file.name.clone(),
        });
        Ok(())
    }

    /// Launch an app: seed its home if needed, load its entry source.
    pub async fn launch(&self, id: &str) -> Result<LaunchedApp> {
        let manifest = self
            .apps
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown app: {id}"))?;

        if seed_home(self.fs.as_ref(), id)
            .await
            .context("failed to seed app home")?
        {
            self.events.emit(KernelEvent::HomeSeeded { id: id.to_string() });
        }

        let source = load_entry_source(self.fs.as_ref(), &manifest)
            .await
            .with_context(|| format!("failed to load entry for app {id}"))?;

        self.events.emit(KernelEvent::AppLaunched { id: id.to_string() });
        Ok(LaunchedApp { manifest, source })
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("name", &self.name)
            .field("mounts", &self.mounts().len())
            .finish()
    }
}
