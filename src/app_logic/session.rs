/*
 * The export session: one user-initiated export from profile selection to
 * archive on disk. The session owns its state explicitly (assembled
 * profiles, an optional message sink toward a UI) and its lifecycle —
 * `open` registers the sink, `close` releases it — so nothing about an
 * export survives as hidden global state between sessions.
 *
 * Interactive collaborators are behind `UiOperations`: the profile picker,
 * the save-destination dialogs, resource opening, and notices. Dismissing
 * any prompt yields the distinguished `ExportError::Cancelled`, which the
 * outcome reporter treats as a warning, never an error.
 */
use crate::app_logic::messages::{
    BridgeMessage, NoticeLevel, SaveFilePayload,
};
use crate::core::exporter::{self, ExportWriter, ExporterError};
use crate::core::file_system::{FileSystemError, FileSystemOperations};
use crate::core::locator::ResourceLocator;
use crate::core::merge::{MergeEngine, MergeError};
use crate::core::models::{ExportGroup, ExportMode, Profile, ResourceKind, UserDataProfile};
use crate::core::reader::InstalledExtensionsOperations;
use crate::core::assembler::ProfileAssembler;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExportError {
    /// An interactive prompt was dismissed. Not an error condition.
    Cancelled,
    /// A recoverable validation failure, e.g. nothing selected for export.
    Aborted(String),
    Fs(FileSystemError),
    Export(ExporterError),
}

impl From<FileSystemError> for ExportError {
    fn from(err: FileSystemError) -> Self {
        ExportError::Fs(err)
    }
}

impl From<ExporterError> for ExportError {
    fn from(err: ExporterError) -> Self {
        ExportError::Export(err)
    }
}

impl From<MergeError> for ExportError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::NothingSelected => ExportError::Aborted(err.to_string()),
            MergeError::Serialize(e) => ExportError::Export(ExporterError::Serialize(e)),
        }
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Cancelled => write!(f, "Cancel"),
            ExportError::Aborted(message) => write!(f, "{message}"),
            ExportError::Fs(e) => write!(f, "{e}"),
            ExportError::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Fs(e) => Some(e),
            ExportError::Export(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/*
 * Interactive shell operations the session depends on. A `None` from any
 * prompt means the user dismissed it. Implemented by the console frontend
 * and mocked in tests.
 */
pub trait UiOperations: Send + Sync {
    /// Multi-pick from the profile catalog.
    fn pick_profiles(&self, catalog: &[UserDataProfile]) -> Option<Vec<UserDataProfile>>;
    /// Destination file for a merged export. `default_file_name` carries the
    /// archive extension already.
    fn prompt_save_file(&self, default_file_name: &str) -> Option<PathBuf>;
    /// Destination folder for per-profile exports.
    fn prompt_save_folder(&self) -> Option<PathBuf>;
    /// Open a discovered resource in the host (file path or extension id).
    fn open_resource(&self, kind: ResourceKind, target: &str);
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Outbound half of the host bridge: where core → UI messages go while the
/// session is open.
pub trait MessageSink: Send + Sync {
    fn post_message(&self, message: &BridgeMessage);
}

pub struct ExportSession<'a> {
    fs: &'a dyn FileSystemOperations,
    ui: &'a dyn UiOperations,
    live: &'a dyn InstalledExtensionsOperations,
    locator: ResourceLocator,
    profiles: Vec<Profile>,
    sink: Option<Box<dyn MessageSink + 'a>>,
}

impl<'a> ExportSession<'a> {
    pub fn new(
        fs: &'a dyn FileSystemOperations,
        ui: &'a dyn UiOperations,
        live: &'a dyn InstalledExtensionsOperations,
        locator: ResourceLocator,
    ) -> Self {
        ExportSession {
            fs,
            ui,
            live,
            locator,
            profiles: Vec::new(),
            sink: None,
        }
    }

    /// Registers the UI message sink and pushes the current profile list.
    pub fn open(&mut self, sink: Box<dyn MessageSink + 'a>) {
        log::debug!("ExportSession: Opening bridge");
        self.sink = Some(sink);
        self.refresh_profiles();
    }

    /// Releases the sink; subsequent core → UI messages are dropped.
    pub fn close(&mut self) {
        if self.sink.take().is_some() {
            log::debug!("ExportSession: Bridge closed");
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    fn post_message(&self, message: BridgeMessage) {
        if let Some(sink) = &self.sink {
            sink.post_message(&message);
        }
    }

    pub fn refresh_profiles(&self) {
        self.post_message(BridgeMessage::RefreshProfiles(self.profiles.clone()));
    }

    /*
     * Loads the profile catalog, lets the user pick which profiles to
     * export, and assembles them into full in-memory snapshots. The picker
     * being dismissed cancels the whole operation.
     */
    pub fn load_profiles(&mut self) -> Result<()> {
        let assembler = ProfileAssembler::new(self.fs, self.live, &self.locator);
        let catalog = assembler.load_profile_catalog()?;
        let selected = self
            .ui
            .pick_profiles(&catalog)
            .ok_or(ExportError::Cancelled)?;
        log::debug!(
            "ExportSession: Selected profiles: {:?}",
            selected.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );
        self.profiles = assembler.assemble_profiles(&selected);
        self.refresh_profiles();
        Ok(())
    }

    /// Dispatches one inbound bridge message. Core → UI commands arriving
    /// inbound are ignored.
    pub fn handle_message(&mut self, message: BridgeMessage) {
        match message {
            BridgeMessage::Ping => self.post_message(BridgeMessage::Pong),
            BridgeMessage::OpenResource(payload) => {
                self.ui.open_resource(payload.kind, &payload.data);
            }
            BridgeMessage::ShowMessage(payload) => {
                self.ui.notify(payload.level, &payload.message);
            }
            BridgeMessage::SaveFile(payload) => {
                let result = self.save_file(&payload);
                self.report_outcome(result);
            }
            BridgeMessage::RefreshProfiles(_) | BridgeMessage::Pong => {
                log::trace!("ExportSession: Ignoring outbound-only message on inbound channel");
            }
        }
    }

    pub fn save_file(&self, payload: &SaveFilePayload) -> Result<()> {
        log::debug!(
            "ExportSession: Export requested, mode {:?}, profiles {:?}",
            payload.export_type,
            payload
                .export_profiles
                .iter()
                .map(|g| g.title.as_str())
                .collect::<Vec<_>>()
        );
        match payload.export_type {
            ExportMode::Merge => self.merge_export(&payload.export_profiles),
            ExportMode::Single => self.single_export(&payload.export_profiles),
        }
    }

    /// Exports every profile in the session in full, without a narrowing UI.
    pub fn export_all(&self, mode: ExportMode) -> Result<()> {
        let groups = self
            .profiles
            .iter()
            .map(|profile| ExportGroup {
                title: profile.title.clone(),
                keys: profile.all_resource_keys(),
            })
            .collect();
        self.save_file(&SaveFilePayload {
            export_type: mode,
            export_profiles: groups,
        })
    }

    /// One archive combining all groups; prompts once for the destination
    /// file, whose stem becomes the archive name.
    fn merge_export(&self, groups: &[ExportGroup]) -> Result<()> {
        let engine = MergeEngine::new(self.fs);
        let document = engine.merge(&self.profiles, groups)?;

        let default_name = exporter::default_merge_file_name(groups);
        let destination = self
            .ui
            .prompt_save_file(&default_name)
            .ok_or(ExportError::Cancelled)?;

        let written = ExportWriter::new(self.fs).write_document(document, &destination)?;
        log::info!(
            "ExportSession: Wrote merged archive '{}' to {destination:?}",
            written.name
        );
        Ok(())
    }

    /// One archive per group, named after the profile title, into a
    /// user-chosen folder.
    fn single_export(&self, groups: &[ExportGroup]) -> Result<()> {
        let folder = self
            .ui
            .prompt_save_folder()
            .ok_or(ExportError::Cancelled)?;

        let engine = MergeEngine::new(self.fs);
        let writer = ExportWriter::new(self.fs);
        for group in groups {
            let document = engine.merge(&self.profiles, std::slice::from_ref(group))?;
            let destination = exporter::profile_destination(&folder, &group.title);
            let written = writer.write_document(document, &destination)?;
            log::info!(
                "ExportSession: Wrote archive '{}' to {destination:?}",
                written.name
            );
        }
        Ok(())
    }

    /*
     * Surfaces the outcome of an export. Cancellation and validation aborts
     * are warnings (and never logged at error severity); everything else is
     * a genuine failure, reported with the underlying message and logged
     * with full detail. A successful export closes the session bridge.
     */
    pub fn report_outcome(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                self.ui.notify(NoticeLevel::Info, "Export complete");
                log::info!("ExportSession: Export complete");
                self.close();
            }
            Err(ExportError::Cancelled) => {
                self.ui.notify(NoticeLevel::Warn, "Cancel");
                log::warn!("ExportSession: Cancelled by user");
            }
            Err(ExportError::Aborted(message)) => {
                self.ui.notify(NoticeLevel::Warn, &message);
                log::warn!("ExportSession: Aborted: {message}");
            }
            Err(error) => {
                self.ui
                    .notify(NoticeLevel::Error, &format!("Export error: {error}"));
                log::error!("ExportSession: Export error: {error:?}");
            }
        }
    }
}
