//! Named section profiles and their file-backed store.
//!
//! A profile is a reusable section definition keyed by name. The store
//! persists all profiles as a single JSON object keyed by profile name;
//! updates always replace the whole profile (no partial merge).

use crate::geometry::{compute_section, BoundingBox, SectionSpec};
use crate::util::{LogoLocError, LogoLocResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn default_section_thickness() -> u32 {
    3
}

/// Named, reusable section definition relative to a detected logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile name; identity of the profile.
    pub name: String,
    /// Section multipliers, tagged by mode.
    #[serde(flatten)]
    pub section: SectionSpec,
    /// Border thickness used when the section is rendered by an adapter.
    #[serde(default = "default_section_thickness")]
    pub section_thickness: u32,
}

impl Profile {
    /// Computes this profile's section rectangle for a detected logo.
    ///
    /// Returns `None` when the clamped section is degenerate.
    pub fn compute_section(
        &self,
        logo: BoundingBox,
        image_width: u32,
        image_height: u32,
    ) -> Option<BoundingBox> {
        compute_section(logo, image_width, image_height, &self.section)
    }
}

/// File-backed profile store: one JSON document mapping name to profile.
///
/// A missing file reads as an empty store, so the first `upsert` creates it.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Opens a store at the given path without touching the filesystem.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all profiles, keyed by name.
    pub fn load(&self) -> LogoLocResult<BTreeMap<String, Profile>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|err| LogoLocError::ProfileStore {
            reason: err.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|err| LogoLocError::ProfileStore {
            reason: err.to_string(),
        })
    }

    /// Looks up a profile by name.
    pub fn get(&self, name: &str) -> LogoLocResult<Profile> {
        self.load()?
            .remove(name)
            .ok_or_else(|| LogoLocError::ProfileNotFound {
                name: name.to_owned(),
            })
    }

    /// Inserts or fully replaces a profile under its own name.
    pub fn upsert(&self, profile: Profile) -> LogoLocResult<()> {
        let mut profiles = self.load()?;
        profiles.insert(profile.name.clone(), profile);
        self.save(&profiles)
    }

    /// Deletes a profile by name; a miss is `ProfileNotFound`.
    pub fn delete(&self, name: &str) -> LogoLocResult<()> {
        let mut profiles = self.load()?;
        if profiles.remove(name).is_none() {
            return Err(LogoLocError::ProfileNotFound {
                name: name.to_owned(),
            });
        }
        self.save(&profiles)
    }

    fn save(&self, profiles: &BTreeMap<String, Profile>) -> LogoLocResult<()> {
        let text =
            serde_json::to_string_pretty(profiles).map_err(|err| LogoLocError::ProfileStore {
                reason: err.to_string(),
            })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| LogoLocError::ProfileStore {
                    reason: err.to_string(),
                })?;
            }
        }
        fs::write(&self.path, text).map_err(|err| LogoLocError::ProfileStore {
            reason: err.to_string(),
        })
    }
}
