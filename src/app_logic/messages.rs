/*
 * The host-bridge message vocabulary exchanged between the export core and
 * a selection UI. The command set is a closed enum dispatched through a
 * match, so an unknown or misspelled command is a deserialization error
 * rather than a silently ignored lookup. On the wire each message is a
 * tagged JSON object: `{"command": "...", "data": ...}`.
 */
use crate::core::models::{ExportGroup, ExportMode, Profile, ResourceKind};
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// UI request to open one discovered resource: a file path for file
/// resources, an extension id for extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResourcePayload {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub data: String,
}

/// UI request to run an export with the narrowed resource selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFilePayload {
    pub export_type: ExportMode,
    pub export_profiles: Vec<ExportGroup>,
}

/// UI request to surface a message through the host's notification UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowMessagePayload {
    #[serde(rename = "type")]
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum BridgeMessage {
    /// core → UI: the assembled profiles to display.
    RefreshProfiles(Vec<Profile>),
    /// UI → core: open a resource in the host editor.
    OpenResource(OpenResourcePayload),
    /// UI → core: run the export.
    SaveFile(SaveFilePayload),
    /// UI → core: health probe.
    Ping,
    /// core → UI: health probe answer.
    Pong,
    /// UI → core: show a notice.
    ShowMessage(ShowMessagePayload),
}
