//! Destinations for exported assets
//!
//! A sink is only handed bytes after the exporter succeeded, and a
//! [`DirectorySink`] never leaves a partially written file under the final
//! name.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Somewhere an exported asset can be saved
pub trait AssetSink {
    /// Store `bytes` as `file_name`; returns where it ended up
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes assets into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetSink for DirectorySink {
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{}.partial", file_name));

        let written = fs::File::create(&partial).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        log::info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}

/// Keeps assets in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl AssetSink for MemorySink {
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
