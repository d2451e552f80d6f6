//! Headless host - drives the plugin over JSON lines
//!
//! The host owns the file-backed component registry and preference store,
//! tracks whether an activity is attached, and runs deferred switches when
//! the `appClosing` lifecycle event arrives (or stdin closes).

pub mod protocol;

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use dynicon_app::config::load_settings;
use dynicon_app::{
    take_latest, ChannelTrigger, DeferredTask, DynamicIconPlugin, HostContext, IconSwitcher,
    MethodCall,
};
use dynicon_core::prelude::*;
use dynicon_core::DeviceIdentity;
use dynicon_registry::{EnablementStore, FilePreferences, FileRegistry, Manifest, PreferenceStore};

pub use protocol::{HostMessage, HostReply, LifecycleEvent, LifecycleSummary, ReplyError};

/// Run the host against the project's configured backends on stdin/stdout
pub async fn run_host(project_path: &Path) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("dynicon host serving");
    info!("Project: {}", project_path.display());
    info!("═══════════════════════════════════════════════════════");

    let mut host = Host::open(project_path)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = host.serve(stdin, tokio::io::stdout()).await;

    if let Err(ref e) = result {
        error!("Host error: {:?}", e);
    }

    info!("dynicon host exiting");
    result
}

/// Plugin host state
pub struct Host {
    store: Box<dyn EnablementStore>,
    preferences: Box<dyn PreferenceStore>,
    device: DeviceIdentity,
    attached: bool,
    plugin: DynamicIconPlugin,
    deferred_rx: mpsc::UnboundedReceiver<DeferredTask>,
}

impl Host {
    pub fn new(
        store: Box<dyn EnablementStore>,
        preferences: Box<dyn PreferenceStore>,
        device: DeviceIdentity,
        attached: bool,
    ) -> Self {
        let (trigger, deferred_rx) = ChannelTrigger::new();
        let switcher = Arc::new(IconSwitcher::new(Arc::new(trigger)));

        Self {
            store,
            preferences,
            device,
            attached,
            plugin: DynamicIconPlugin::new(switcher),
            deferred_rx,
        }
    }

    /// Build a host from `.dynicon/config.toml` and the manifest it names
    pub fn open(project_path: &Path) -> Result<Self> {
        let settings = load_settings(project_path);
        let manifest_path = settings.manifest_path(project_path);
        let manifest = Manifest::load(&manifest_path)
            .with_context(|| format!("Loading manifest {}", manifest_path.display()))?;
        let state_dir = settings.state_dir(project_path);

        let registry = FileRegistry::open(manifest, &state_dir)
            .with_context(|| format!("Opening state directory {}", state_dir.display()))?;
        let preferences = FilePreferences::new(&state_dir);
        let device = settings.device.identity();
        info!(
            "Host ready: package {}, device {}, attached {}",
            registry.package_name(),
            device,
            settings.host.attach_on_start
        );

        Ok(Self::new(
            Box::new(registry),
            Box::new(preferences),
            device,
            settings.host.attach_on_start,
        ))
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn context(&self) -> HostContext<'_> {
        HostContext::new(self.store.as_ref(), self.preferences.as_ref(), &self.device)
    }

    /// Read messages until EOF, writing one reply per non-blank line
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(&line) {
                write_reply(&mut writer, &reply).await?;
            }
        }

        debug!("Input closed");
        self.shutdown();
        Ok(())
    }

    /// Parse and dispatch one input line; blank lines produce no reply
    pub fn handle_line(&mut self, line: &str) -> Option<HostReply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        Some(match serde_json::from_str::<HostMessage>(line) {
            Ok(message) => self.dispatch(message),
            Err(e) => {
                warn!("Malformed host message {:?}: {}", line, e);
                HostReply::malformed(format!("Malformed message: {}", e))
            }
        })
    }

    pub fn dispatch(&mut self, message: HostMessage) -> HostReply {
        match message {
            HostMessage::Call {
                id,
                method,
                arguments,
            } => {
                let call = MethodCall::new(method, arguments);
                let ctx = self.attached.then(|| self.context());
                let response = self.plugin.handle(&call, ctx.as_ref());
                HostReply::from_response(id, response)
            }
            HostMessage::Event { event } => self.lifecycle(event),
        }
    }

    fn lifecycle(&mut self, event: LifecycleEvent) -> HostReply {
        match event {
            LifecycleEvent::AppClosing => {
                let report = self.run_deferred();
                HostReply::closing(report.as_ref())
            }
            LifecycleEvent::ActivityAttached => {
                debug!("Activity attached");
                self.attached = true;
                HostReply::attachment(event, true)
            }
            LifecycleEvent::ActivityDetached => {
                debug!("Activity detached");
                self.attached = false;
                HostReply::attachment(event, false)
            }
        }
    }

    fn run_deferred(&mut self) -> Option<dynicon_app::SwitchReport> {
        let task = take_latest(&mut self.deferred_rx)?;
        info!("Running deferred task: {:?}", task);

        let report = self.plugin.switcher().run_deferred(&self.context(), task);
        let failed = report.failed_components();
        if !failed.is_empty() {
            warn!("Deferred switch left components unswitched: {:?}", failed);
        }
        Some(report)
    }

    /// Run queued deferred work before the process ends
    pub fn shutdown(&mut self) {
        if let Some(report) = self.run_deferred() {
            info!("Deferred task on shutdown: {:?}", report.outcome);
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("package", &self.store.package_name())
            .field("device", &self.device)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &HostReply) -> Result<()> {
    let mut json = serde_json::to_string(reply)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
