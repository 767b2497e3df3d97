/*
 * This module provides the application-logic layer above the export core:
 * the host-bridge message vocabulary, the `ExportSession` orchestrating one
 * export end to end, and the console frontend implementing the interactive
 * shell operations. Unit tests for `ExportSession` are in `session_tests.rs`.
 */
pub mod console;
pub mod messages;
pub mod session;

#[cfg(test)]
mod session_tests;

pub use console::ConsoleUi;
pub use messages::{BridgeMessage, NoticeLevel, SaveFilePayload};
pub use session::{ExportError, ExportSession, MessageSink, UiOperations};
