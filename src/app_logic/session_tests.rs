/*
 * Unit tests for `ExportSession` from the `super::session` module. The UI
 * and the bridge sink are mocks; the filesystem is the real implementation
 * over tempfile fixtures, so the tests cover the whole pipeline from catalog
 * loading to the archive on disk.
 */
use super::messages::{BridgeMessage, NoticeLevel, SaveFilePayload, ShowMessagePayload};
use super::session::{ExportError, ExportSession, MessageSink, UiOperations};
use crate::core::{
    CoreFileSystem, ExportMode, MergedDocument, NoLiveExtensions, ResourceKind, ResourceLocator,
    UserDataProfile,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

// --- Mock UI ---

struct MockUi {
    cancel_pick: bool,
    save_file: Option<PathBuf>,
    save_folder: Option<PathBuf>,
    notices: Mutex<Vec<(NoticeLevel, String)>>,
    opened: Mutex<Vec<(ResourceKind, String)>>,
}

impl MockUi {
    fn new() -> Self {
        MockUi {
            cancel_pick: false,
            save_file: None,
            save_folder: None,
            notices: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }
}

impl UiOperations for MockUi {
    fn pick_profiles(&self, catalog: &[UserDataProfile]) -> Option<Vec<UserDataProfile>> {
        if self.cancel_pick {
            None
        } else {
            Some(catalog.to_vec())
        }
    }

    fn prompt_save_file(&self, _default_file_name: &str) -> Option<PathBuf> {
        self.save_file.clone()
    }

    fn prompt_save_folder(&self) -> Option<PathBuf> {
        self.save_folder.clone()
    }

    fn open_resource(&self, kind: ResourceKind, target: &str) {
        self.opened.lock().unwrap().push((kind, target.to_string()));
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

// --- Mock bridge sink ---

struct RecordingSink(Arc<Mutex<Vec<BridgeMessage>>>);

impl MessageSink for RecordingSink {
    fn post_message(&self, message: &BridgeMessage) {
        self.0.lock().unwrap().push(message.clone());
    }
}

// --- Fixture ---

/// A user-data directory with global resources and one named profile that
/// overrides settings and snippets.
fn write_fixture(root: &Path) {
    let user = root.join("User");
    fs::create_dir_all(user.join("snippets")).unwrap();
    fs::create_dir_all(user.join("globalStorage")).unwrap();
    fs::create_dir_all(user.join("profiles/w1/snippets")).unwrap();

    fs::write(user.join("settings.json"), r#"{ "editor.fontSize": 14 }"#).unwrap();
    fs::write(
        user.join("keybindings.json"),
        r#"[ { "key": "ctrl+k", "command": "noop" } ]"#,
    )
    .unwrap();
    fs::write(user.join("snippets/global.json"), "{\"g\": {}}").unwrap();
    fs::write(
        user.join("globalStorage/storage.json"),
        r#"{ "userDataProfiles": [ { "location": "w1", "name": "Work" } ] }"#,
    )
    .unwrap();
    fs::write(
        user.join("profiles/w1/settings.json"),
        r#"{ "editor.fontSize": 16 }"#,
    )
    .unwrap();
    fs::write(user.join("profiles/w1/snippets/rust.json"), "{\"r\": {}}").unwrap();
}

fn locator_for(root: &Path) -> ResourceLocator {
    ResourceLocator::new(root.join("User"), root.join("home"))
}

fn archive_files_in(folder: &Path) -> Vec<PathBuf> {
    if !folder.exists() {
        return Vec::new();
    }
    fs::read_dir(folder)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == "code-profile")
        })
        .collect()
}

// --- Tests ---

#[test]
fn merge_export_writes_one_archive_named_from_destination() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let mut ui = MockUi::new();
    ui.save_file = Some(out.join("My Export.code-profile"));

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.load_profiles().unwrap();
    session.export_all(ExportMode::Merge).unwrap();

    let written = archive_files_in(&out);
    assert_eq!(written.len(), 1);
    let document: MergedDocument =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(document.name, "My Export");
    assert!(document.settings.is_some());
    assert!(document.keybindings.is_some());
    assert!(document.snippets.is_some());

    // The Work override wins the shallow settings merge (it comes after
    // Default in catalog order).
    let wrapper: serde_json::Value =
        serde_json::from_str(document.settings.as_ref().unwrap()).unwrap();
    let inner: serde_json::Value =
        serde_json::from_str(wrapper["settings"].as_str().unwrap()).unwrap();
    assert_eq!(inner["editor.fontSize"], 16);
}

#[test]
fn single_export_writes_one_archive_per_profile() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let mut ui = MockUi::new();
    ui.save_folder = Some(out.clone());

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.load_profiles().unwrap();
    session.export_all(ExportMode::Single).unwrap();

    assert!(out.join("Default.code-profile").exists());
    assert!(out.join("Work.code-profile").exists());

    let work: MergedDocument =
        serde_json::from_str(&fs::read_to_string(out.join("Work.code-profile")).unwrap()).unwrap();
    assert_eq!(work.name, "Work");
    // The Work profile has no keybindings override and no default flag.
    assert!(work.keybindings.is_none());
    assert!(work.settings.is_some());
}

#[test]
fn dismissed_save_dialog_cancels_silently_and_writes_nothing() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = MockUi::new(); // save_file stays None: prompt dismissed

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.load_profiles().unwrap();
    let result = session.export_all(ExportMode::Merge);
    assert!(matches!(result, Err(ExportError::Cancelled)));

    session.report_outcome(result);
    let notices = ui.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, NoticeLevel::Warn);
    // Never surfaced as an error, and the filesystem is untouched.
    assert!(notices.iter().all(|(level, _)| *level != NoticeLevel::Error));
    assert!(archive_files_in(&out).is_empty());
    assert!(archive_files_in(dir.path()).is_empty());
}

#[test]
fn dismissed_profile_picker_cancels_loading() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let mut ui = MockUi::new();
    ui.cancel_pick = true;

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    let result = session.load_profiles();
    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(session.profiles().is_empty());
}

#[test]
fn export_with_no_resources_aborts_as_nothing_selected() {
    // Empty user directory: even the Default profile resolves zero resources.
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let mut ui = MockUi::new();
    ui.save_file = Some(out.join("empty.code-profile"));

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.load_profiles().unwrap();
    let result = session.export_all(ExportMode::Merge);
    assert!(matches!(result, Err(ExportError::Aborted(_))));

    session.report_outcome(result);
    let notices = ui.notices();
    assert_eq!(notices[0].0, NoticeLevel::Warn);
    assert!(archive_files_in(&out).is_empty());
}

#[test]
fn ping_is_answered_with_pong_while_bridge_is_open() {
    let dir = tempdir().unwrap();
    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = MockUi::new();
    let messages = Arc::new(Mutex::new(Vec::new()));

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.open(Box::new(RecordingSink(messages.clone())));
    session.handle_message(BridgeMessage::Ping);

    let posted = messages.lock().unwrap();
    // Opening pushes the profile list, then the probe answer.
    assert!(matches!(posted[0], BridgeMessage::RefreshProfiles(_)));
    assert!(matches!(posted[1], BridgeMessage::Pong));
}

#[test]
fn closed_bridge_drops_outbound_messages() {
    let dir = tempdir().unwrap();
    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = MockUi::new();
    let messages = Arc::new(Mutex::new(Vec::new()));

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.open(Box::new(RecordingSink(messages.clone())));
    session.close();
    session.refresh_profiles();
    session.handle_message(BridgeMessage::Ping);

    // Only the refresh posted at open time made it through.
    assert_eq!(messages.lock().unwrap().len(), 1);
}

#[test]
fn show_message_routes_to_the_ui() {
    let dir = tempdir().unwrap();
    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = MockUi::new();

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.handle_message(BridgeMessage::ShowMessage(ShowMessagePayload {
        level: NoticeLevel::Warn,
        message: "pick something first".into(),
    }));

    let notices = ui.notices();
    assert_eq!(
        notices,
        vec![(NoticeLevel::Warn, "pick something first".to_string())]
    );
}

#[test]
fn save_file_message_runs_the_export_and_reports_completion() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let mut ui = MockUi::new();
    ui.save_file = Some(out.join("bridge.code-profile"));

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.load_profiles().unwrap();
    let groups = session
        .profiles()
        .iter()
        .map(|p| crate::core::ExportGroup {
            title: p.title.clone(),
            keys: p.all_resource_keys(),
        })
        .collect();
    session.handle_message(BridgeMessage::SaveFile(SaveFilePayload {
        export_type: ExportMode::Merge,
        export_profiles: groups,
    }));

    assert!(out.join("bridge.code-profile").exists());
    let notices = ui.notices();
    assert_eq!(notices.last().unwrap().0, NoticeLevel::Info);
    assert_eq!(notices.last().unwrap().1, "Export complete");
}

#[test]
fn open_resource_messages_reach_the_shell() {
    let dir = tempdir().unwrap();
    let fs_ops = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = MockUi::new();

    let mut session = ExportSession::new(&fs_ops, &ui, &live, locator_for(dir.path()));
    session.handle_message(BridgeMessage::OpenResource(
        super::messages::OpenResourcePayload {
            kind: ResourceKind::Extension,
            data: "pub.ext".into(),
        },
    ));

    let opened = ui.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0], (ResourceKind::Extension, "pub.ext".to_string()));
}
