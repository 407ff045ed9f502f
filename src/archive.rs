use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid zip archive {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("failed to read entry {entry} in {path}: {source}")]
    Entry {
        path: PathBuf,
        entry: String,
        #[source]
        source: ZipError,
    },
}

/// One open JAR (ZIP) archive, backed by a read-only memory map.
///
/// A failure opening or reading one archive is confined to that archive:
/// callers skip it and continue with the rest of the batch.
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<Cursor<Mmap>>,
}

impl ArchiveReader {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ArchiveError::NotFound(path.to_path_buf())
            } else {
                ArchiveError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        // SAFETY: The file is opened read-only and remains valid for the lifetime
        // of the mmap. The mmap is owned by the archive cursor, ensuring memory
        // safety.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ArchiveError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let archive = ZipArchive::new(Cursor::new(mmap)).map_err(|e| ArchiveError::Corrupt {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entry names in central-directory order.
    pub fn entry_names(&mut self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            if let Ok(entry) = self.archive.by_index_raw(i) {
                names.push(entry.name().to_string());
            }
        }
        names
    }

    /// Decompressed bytes of one entry. An error here is scoped to the entry;
    /// sibling entries in the same archive stay readable.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| ArchiveError::Entry {
                path: self.path.clone(),
                entry: name.to_string(),
                source: e,
            })?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .map_err(|e| ArchiveError::Entry {
                path: self.path.clone(),
                entry: name.to_string(),
                source: ZipError::Io(e),
            })?;
        Ok(buf)
    }
}

/// Reads a plain (non-archive) file as text: UTF-8 first, latin-1 fallback
/// when the bytes are not valid UTF-8. Latin-1 maps every byte to the code
/// point of the same value, so the fallback cannot fail; only I/O errors
/// surface.
pub fn read_text_file(path: &Path) -> Result<String, ArchiveError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ArchiveError::NotFound(path.to_path_buf())
        } else {
            ArchiveError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}
