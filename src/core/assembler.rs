/*
 * This module turns profile descriptors from the catalog into fully resolved
 * in-memory `Profile` snapshots by driving the locator and reader across all
 * four resource categories. Assembly is best-effort: a category whose
 * backing location is missing or unreadable contributes an empty list (the
 * failure is logged and attributed), and the remaining categories still
 * resolve. Every discovered resource is stamped with a freshly minted
 * session-scoped key.
 */
use crate::core::file_system::{self, FileSystemOperations};
use crate::core::keygen::RandomKeyGenerator;
use crate::core::locator::{ResolvedLocation, ResourceLocator};
use crate::core::models::{
    ExtensionRecord, ExtensionResource, FileResource, Profile, ProfileStorage, ResourceCategory,
    ResourceKind, UserDataProfile,
};
use crate::core::reader::{self, InstalledExtensionsOperations};
use std::collections::HashSet;

pub struct ProfileAssembler<'a> {
    fs: &'a dyn FileSystemOperations,
    live: &'a dyn InstalledExtensionsOperations,
    locator: &'a ResourceLocator,
    keygen: RandomKeyGenerator,
}

impl<'a> ProfileAssembler<'a> {
    pub fn new(
        fs: &'a dyn FileSystemOperations,
        live: &'a dyn InstalledExtensionsOperations,
        locator: &'a ResourceLocator,
    ) -> Self {
        ProfileAssembler {
            fs,
            live,
            locator,
            keygen: RandomKeyGenerator::resource_keys(),
        }
    }

    /*
     * Loads the profile catalog from `globalStorage/storage.json` and
     * prepends the synthetic "Default" profile, so the baseline configuration
     * is always exportable even when no named profile exists (including when
     * the storage file itself is absent).
     */
    pub fn load_profile_catalog(&self) -> file_system::Result<Vec<UserDataProfile>> {
        let storage_path = self.locator.storage_path();
        let mut catalog = vec![UserDataProfile::synthetic_default()];

        if !self.fs.exists(&storage_path) {
            log::debug!("ProfileAssembler: No profile catalog at {storage_path:?}");
            return Ok(catalog);
        }

        let storage: ProfileStorage = file_system::read_json_as(self.fs, &storage_path)?;
        log::debug!(
            "ProfileAssembler: Catalog lists {} named profile(s)",
            storage.user_data_profiles.len()
        );
        catalog.extend(storage.user_data_profiles);
        Ok(catalog)
    }

    /// Assembles one `Profile` per descriptor, in descriptor order.
    pub fn assemble_profiles(&self, descriptors: &[UserDataProfile]) -> Vec<Profile> {
        descriptors
            .iter()
            .map(|descriptor| self.assemble_profile(descriptor))
            .collect()
    }

    pub fn assemble_profile(&self, descriptor: &UserDataProfile) -> Profile {
        log::debug!("ProfileAssembler: Assembling profile '{}'", descriptor.name);
        Profile {
            title: descriptor.name.clone(),
            is_default: descriptor.is_default,
            use_default_flags: descriptor.use_default_flags,
            settings: self.collect_config_file(
                descriptor,
                ResourceCategory::Settings,
                self.locator.settings_location(descriptor),
            ),
            keybindings: self.collect_config_file(
                descriptor,
                ResourceCategory::Keybindings,
                self.locator.keybindings_location(descriptor),
            ),
            snippets: self.collect_snippets(descriptor),
            extensions: self.collect_extensions(descriptor),
        }
    }

    /// Wraps the 0-or-1 file backing `settings` or `keybindings`. An absent
    /// file is omitted, never represented as a placeholder entry.
    fn collect_config_file(
        &self,
        descriptor: &UserDataProfile,
        category: ResourceCategory,
        location: ResolvedLocation,
    ) -> Vec<FileResource> {
        log::trace!(
            "ProfileAssembler: Collecting {category} for '{}'",
            descriptor.name
        );
        if !self.fs.exists(&location.path) {
            return Vec::new();
        }
        let name = location
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        vec![FileResource {
            key: self.keygen.generate(),
            kind: ResourceKind::File,
            name,
            path: location.path,
            is_default: location.is_default,
        }]
    }

    /// Lists the resolved snippets directory non-recursively; plain files
    /// become resources, subdirectories are ignored.
    fn collect_snippets(&self, descriptor: &UserDataProfile) -> Vec<FileResource> {
        log::trace!(
            "ProfileAssembler: Collecting {} for '{}'",
            ResourceCategory::Snippets,
            descriptor.name
        );
        let location = self.locator.snippets_location(descriptor);
        if !self.fs.exists(&location.path) {
            return Vec::new();
        }
        let entries = match self.fs.list_dir(&location.path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "ProfileAssembler: Cannot list snippets for '{}': {e}",
                    descriptor.name
                );
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .filter(|entry| entry.is_file)
            .map(|entry| FileResource {
                key: self.keygen.generate(),
                kind: ResourceKind::File,
                path: location.path.join(&entry.name),
                name: entry.name,
                is_default: location.is_default,
            })
            .collect()
    }

    /*
     * Resolves the extension list for a profile. With the default flag set,
     * the global manifest is taken as-is. Without it, profile isolation
     * applies: only application-scoped global extensions carry over, and the
     * profile's own manifest supplies the rest. The combined list is deduped
     * by identifier id, first occurrence winning.
     */
    fn collect_extensions(&self, descriptor: &UserDataProfile) -> Vec<ExtensionResource> {
        log::trace!(
            "ProfileAssembler: Collecting {} for '{}'",
            ResourceCategory::Extensions,
            descriptor.name
        );
        let global_manifest = self.locator.global_extensions_manifest();
        let global = self.read_manifest_or_empty(&global_manifest, &descriptor.name);

        let mut records: Vec<ExtensionRecord> = Vec::new();
        if descriptor.use_default_flags.extensions {
            records.extend(global);
        } else {
            records.extend(
                global
                    .into_iter()
                    .filter(|record| record.metadata.is_application_scoped),
            );
            let profile_manifest = self.locator.profile_extensions_manifest(descriptor);
            records.extend(self.read_manifest_or_empty(&profile_manifest, &descriptor.name));
        }

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut resources = Vec::new();
        for record in records {
            if !seen_ids.insert(record.identifier.id.clone()) {
                continue;
            }
            let display_name = reader::resolve_display_name(self.fs, self.live, &record);
            resources.push(ExtensionResource {
                key: self.keygen.generate(),
                kind: ResourceKind::Extension,
                identifier: record.identifier,
                display_name,
            });
        }
        resources
    }

    fn read_manifest_or_empty(
        &self,
        manifest_path: &std::path::Path,
        profile_name: &str,
    ) -> Vec<ExtensionRecord> {
        match reader::read_extension_records(self.fs, manifest_path) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "ProfileAssembler: Unreadable extension manifest for '{profile_name}': {e}"
                );
                Vec::new()
            }
        }
    }
}
