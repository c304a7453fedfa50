use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// In-memory zip archive opened for reading.
pub struct ZipReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipReader {
    /// Opens an archive from its raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let archive =
            ZipArchive::new(Cursor::new(bytes)).context("Failed to parse ZIP archive")?;
        Ok(Self { archive })
    }

    /// Names of all file entries, in central directory order.
    /// Directory entries are left out.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    pub fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(name)
            .with_context(|| format!("Failed to open ZIP entry {}", name))?;

        let mut buffer = Vec::new();
        entry
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read ZIP entry {}", name))?;
        Ok(buffer)
    }

    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let bytes = self.read_bytes(name)?;
        String::from_utf8(bytes).with_context(|| format!("ZIP entry {} is not valid UTF-8", name))
    }
}

/// In-memory zip archive being assembled.
pub struct ZipBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: Vec::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Writes a deflated entry. Entry names must be unique.
    pub fn add(&mut self, name: &str, contents: &[u8]) -> Result<()> {
        if self.contains(name) {
            bail!("Duplicate ZIP entry: {}", name);
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .with_context(|| format!("Failed to start ZIP entry {}", name))?;
        self.writer
            .write_all(contents)
            .with_context(|| format!("Failed to write ZIP entry {}", name))?;

        debug!("Added {} ({} bytes)", name, contents.len());
        self.names.push(name.to_string());
        Ok(())
    }

    /// Serializes the archive, returning its bytes and the entry names in
    /// insertion order.
    pub fn finish(self) -> Result<(Vec<u8>, Vec<String>)> {
        let cursor = self
            .writer
            .finish()
            .context("Failed to finalize ZIP archive")?;
        Ok((cursor.into_inner(), self.names))
    }
}
