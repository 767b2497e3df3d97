/*
 * This module resolves which filesystem locations back each resource
 * category of a profile. The routing rule is the same for every category:
 * when the profile's `useDefaultFlags` entry for the category is set, the
 * shared global location under the user root is used; otherwise the
 * profile-specific override under `<user-root>/profiles/<location>/` is
 * used. Settings and keybindings resolve to a single file, snippets to a
 * directory, and extensions to the global manifest plus an optional
 * per-profile manifest layered on top.
 *
 * The locator only computes paths; existence checks and reads belong to the
 * reader and assembler. Non-existent locations are therefore a concern of
 * the callers, which treat them as empty results, never as errors.
 */
use crate::core::models::UserDataProfile;
use std::path::PathBuf;

const PROFILES_SUBFOLDER_NAME: &str = "profiles";
const SNIPPETS_SUBFOLDER_NAME: &str = "snippets";
const GLOBAL_STORAGE_SUBFOLDER_NAME: &str = "globalStorage";
const STORAGE_FILENAME: &str = "storage.json";
const SETTINGS_FILENAME: &str = "settings.json";
const KEYBINDINGS_FILENAME: &str = "keybindings.json";
const EXTENSIONS_MANIFEST_FILENAME: &str = "extensions.json";

/// A resolved location plus whether it is the shared global one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct ResourceLocator {
    user_root: PathBuf,
    home: PathBuf,
}

impl ResourceLocator {
    /// `user_root` is the editor's user-data directory (the one holding
    /// `settings.json` and `profiles/`); `home` is the user's home directory,
    /// under which the global extension manifest lives.
    pub fn new(user_root: PathBuf, home: PathBuf) -> Self {
        log::debug!("ResourceLocator: user root {user_root:?}, home {home:?}");
        ResourceLocator { user_root, home }
    }

    /// Path of the profile catalog (`globalStorage/storage.json`).
    pub fn storage_path(&self) -> PathBuf {
        self.user_root
            .join(GLOBAL_STORAGE_SUBFOLDER_NAME)
            .join(STORAGE_FILENAME)
    }

    /// Path of the global installed-extension manifest
    /// (`<home>/.vscode/extensions/extensions.json`).
    pub fn global_extensions_manifest(&self) -> PathBuf {
        self.home
            .join(".vscode")
            .join("extensions")
            .join(EXTENSIONS_MANIFEST_FILENAME)
    }

    /// Path of a profile's own extension manifest. Only meaningful when the
    /// profile does not use the default extension list.
    pub fn profile_extensions_manifest(&self, profile: &UserDataProfile) -> PathBuf {
        self.profile_override_dir(profile)
            .join(EXTENSIONS_MANIFEST_FILENAME)
    }

    /// Resolves the settings file for the given profile: the global file
    /// when the profile's settings flag is set, the profile override otherwise.
    pub fn settings_location(&self, profile: &UserDataProfile) -> ResolvedLocation {
        self.single_file_location(profile, SETTINGS_FILENAME, profile.use_default_flags.settings)
    }

    /// Resolves the keybindings file for the given profile, with the same
    /// flag routing as settings.
    pub fn keybindings_location(&self, profile: &UserDataProfile) -> ResolvedLocation {
        self.single_file_location(
            profile,
            KEYBINDINGS_FILENAME,
            profile.use_default_flags.keybindings,
        )
    }

    fn single_file_location(
        &self,
        profile: &UserDataProfile,
        file_name: &str,
        use_default: bool,
    ) -> ResolvedLocation {
        if use_default {
            ResolvedLocation {
                path: self.user_root.join(file_name),
                is_default: true,
            }
        } else {
            ResolvedLocation {
                path: self.profile_override_dir(profile).join(file_name),
                is_default: false,
            }
        }
    }

    /// Resolves the snippets directory for the given profile (listed
    /// non-recursively by the assembler; subdirectories are ignored).
    pub fn snippets_location(&self, profile: &UserDataProfile) -> ResolvedLocation {
        if profile.use_default_flags.snippets {
            ResolvedLocation {
                path: self.user_root.join(SNIPPETS_SUBFOLDER_NAME),
                is_default: true,
            }
        } else {
            ResolvedLocation {
                path: self
                    .profile_override_dir(profile)
                    .join(SNIPPETS_SUBFOLDER_NAME),
                is_default: false,
            }
        }
    }

    fn profile_override_dir(&self, profile: &UserDataProfile) -> PathBuf {
        self.user_root
            .join(PROFILES_SUBFOLDER_NAME)
            .join(&profile.location)
    }
}
