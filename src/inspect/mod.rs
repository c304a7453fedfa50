//! Discovery of modules inside an uploaded archive.

mod descriptor;

use anyhow::{Context, Result};
use log::debug;

use crate::archive::{ZipReader, is_package};
use crate::runlog::RunLog;

pub use descriptor::{MANIFEST_PATH, ModDescriptor};

/// Lists the modules packaged in `archive`.
///
/// Every `.jar` entry is opened as a nested archive. Entries without a
/// manifest are not modules and are skipped. Any unreadable nested archive
/// or malformed manifest fails the whole inspection.
#[tracing::instrument(skip(archive, log))]
pub fn inspect(archive: Vec<u8>, log: &mut RunLog) -> Result<Vec<ModDescriptor>> {
    let mut outer = ZipReader::from_bytes(archive).context("Uploaded file is not a ZIP archive")?;
    let mut descriptors = Vec::new();

    for entry in outer.entry_names() {
        if !is_package(&entry) {
            debug!("Skipping non-package entry {}", entry);
            continue;
        }

        let jar = outer.read_bytes(&entry)?;
        let mut inner = ZipReader::from_bytes(jar)
            .with_context(|| format!("Failed to open package {}", entry))?;

        if !inner.contains(MANIFEST_PATH) {
            debug!("{} has no {}, skipping", entry, MANIFEST_PATH);
            continue;
        }

        let manifest = inner.read_text(MANIFEST_PATH)?;
        let descriptor = ModDescriptor::parse(&manifest, &entry)?;
        debug!(
            "Found {} {} ({}) in {}",
            descriptor.id, descriptor.version, descriptor.name, entry
        );
        descriptors.push(descriptor);
    }

    log.info(format!("Found {} mods in archive", descriptors.len()));
    Ok(descriptors)
}
