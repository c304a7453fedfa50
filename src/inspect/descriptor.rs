use anyhow::{Context, Result};
use serde::Deserialize;

/// Path of the module manifest inside a packaged module.
pub const MANIFEST_PATH: &str = "fabric.mod.json";

/// Identity of a module found in the uploaded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDescriptor {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    /// Name of the archive entry the module was read from.
    pub archive_entry: String,
}

/// Manifest fields the updater cares about. Everything else is ignored.
#[derive(Deserialize, Debug)]
struct RawManifest {
    #[serde(default)]
    id: String,
    #[serde(default)]
    version: String,
    name: Option<String>,
    description: Option<String>,
}

impl ModDescriptor {
    /// Parses a `fabric.mod.json` document.
    ///
    /// Only malformed JSON is an error. Missing fields become empty strings,
    /// except `name`, which falls back to the id and then to the entry's
    /// file stem so the module can still be looked up.
    pub fn parse(manifest: &str, archive_entry: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(manifest)
            .with_context(|| format!("Invalid {} in {}", MANIFEST_PATH, archive_entry))?;

        let name = match raw.name {
            Some(name) => name,
            None if !raw.id.is_empty() => raw.id.clone(),
            None => entry_stem(archive_entry).to_string(),
        };

        Ok(Self {
            name,
            description: raw.description.unwrap_or_default(),
            id: raw.id,
            version: raw.version,
            archive_entry: archive_entry.to_string(),
        })
    }
}

/// "mods/sodium-0.5.jar" -> "sodium-0.5"
fn entry_stem(archive_entry: &str) -> &str {
    let file = archive_entry.rsplit('/').next().unwrap_or(archive_entry);
    file.strip_suffix(".jar").unwrap_or(file)
}
