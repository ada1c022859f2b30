//! The persistent file pair and its open/create/recovery protocol.
//!
//! A cache generation is an index log plus a blob store. Both are strictly
//! append-only: bytecode goes to the end of the blob file, then the matching
//! [`IndexRecord`] goes to the end of the index file, each flushed before the
//! next step. A crash can therefore leave at most orphaned blob bytes or one
//! trailing partial record, and the latter is caught by the validation in
//! [`open`] which then rebuilds the pair from scratch.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::CacheError;
use crate::index::CacheIndex;
use crate::key::{CacheKey, CacheLocation};
use crate::paths::CachePaths;
use crate::record::{
    decode_header, encode_header, IndexRecord, FORMAT_VERSION, HEADER_SIZE, RECORD_SIZE,
};

/// How a cache instance came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// A valid existing pair was loaded.
    OpenedExisting,
    /// The pair was missing or invalid and a fresh empty one was created.
    CreatedNew,
    /// No pair could be created. Lookups miss and nothing is persisted.
    Degraded,
}

impl CacheState {
    /// Returns `true` if compiled shaders are written to disk.
    pub fn is_persistent(self) -> bool {
        !matches!(self, CacheState::Degraded)
    }
}

/// The two open cache files, owned together.
///
/// Handles are released when the bundle is dropped, including when
/// construction fails halfway.
#[derive(Debug)]
pub struct CacheFiles {
    paths: CachePaths,
    index_file: File,
    blob_file: File,
    index_len: u64,
    blob_len: u64,
}

/// Result of [`open`].
#[derive(Debug)]
pub struct OpenedStore {
    /// The file bundle, absent when degraded.
    pub files: Option<CacheFiles>,
    /// Entries loaded from the index.
    pub index: CacheIndex,
    /// Which path the protocol took.
    pub state: CacheState,
}

/// Opens the pair at `paths`, rebuilding it if it is missing or invalid.
///
/// Never fails: if not even a fresh pair can be created the store comes up
/// [`CacheState::Degraded`].
pub fn open(paths: &CachePaths) -> OpenedStore {
    match CacheFiles::read_existing(paths) {
        Ok((files, index)) => {
            info!(
                path = %paths.index.display(),
                entries = index.len(),
                "loaded shader cache"
            );
            return OpenedStore {
                files: Some(files),
                index,
                state: CacheState::OpenedExisting,
            };
        }
        Err(CacheError::Io { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %paths.index.display(), "no shader cache found, creating one");
        }
        Err(e) => {
            warn!(error = %e, "discarding shader cache");
        }
    }

    match CacheFiles::create_new(paths) {
        Ok(files) => OpenedStore {
            files: Some(files),
            index: CacheIndex::new(),
            state: CacheState::CreatedNew,
        },
        Err(e) => {
            warn!(error = %e, "shader cache disabled, shaders will be compiled on every run");
            OpenedStore {
                files: None,
                index: CacheIndex::new(),
                state: CacheState::Degraded,
            }
        }
    }
}

impl CacheFiles {
    /// Opens and validates an existing pair.
    fn read_existing(paths: &CachePaths) -> Result<(Self, CacheIndex), CacheError> {
        let mut index_file = File::options()
            .read(true)
            .write(true)
            .open(&paths.index)
            .map_err(|source| io_error(&paths.index, source))?;

        let blob_file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .open(&paths.blob)
            .map_err(|source| io_error(&paths.blob, source))?;
        let blob_len = blob_file
            .metadata()
            .map_err(|source| io_error(&paths.blob, source))?
            .len();

        let (index, records) =
            load_index(BufReader::new(&mut index_file), blob_len, &paths.index)?;
        let index_len = (HEADER_SIZE + records * RECORD_SIZE) as u64;

        Ok((
            Self {
                paths: paths.clone(),
                index_file,
                blob_file,
                index_len,
                blob_len,
            },
            index,
        ))
    }

    /// Replaces whatever is at `paths` with an empty pair.
    fn create_new(paths: &CachePaths) -> Result<Self, CacheError> {
        remove_stale(&paths.index, "index");
        remove_stale(&paths.blob, "blob");

        let mut index_file =
            File::create(&paths.index).map_err(|source| create_error(&paths.index, source))?;
        if let Err(source) = index_file
            .write_all(&encode_header())
            .and_then(|()| index_file.flush())
        {
            drop(index_file);
            discard(&paths.index);
            return Err(create_error(&paths.index, source));
        }

        let blob_file = match File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&paths.blob)
        {
            Ok(file) => file,
            Err(source) => {
                drop(index_file);
                discard(&paths.index);
                return Err(create_error(&paths.blob, source));
            }
        };

        Ok(Self {
            paths: paths.clone(),
            index_file,
            blob_file,
            index_len: HEADER_SIZE as u64,
            blob_len: 0,
        })
    }

    /// Reads the bytecode stored at `location`.
    pub fn read_blob(&mut self, location: CacheLocation) -> Result<Vec<u8>, CacheError> {
        let mut data = vec![0u8; location.size as usize];
        self.blob_file
            .seek(SeekFrom::Start(location.offset))
            .and_then(|_| self.blob_file.read_exact(&mut data))
            .map_err(|source| CacheError::Read {
                offset: location.offset,
                size: location.size,
                source,
            })?;
        Ok(data)
    }

    /// Appends `bytecode` and its index record, returning where it landed.
    ///
    /// On failure both files are cut back to their previous length so no
    /// partial record is left behind.
    pub fn append(&mut self, key: &CacheKey, bytecode: &[u8]) -> Result<CacheLocation, CacheError> {
        let size = u32::try_from(bytecode.len()).map_err(|_| CacheError::OffsetOverflow {
            offset: self.blob_len,
            size: bytecode.len() as u64,
        })?;
        let location = CacheLocation {
            offset: self.blob_len,
            size,
        };
        let record = IndexRecord::new(key, &location)?.encode()?;

        append_at(&mut self.blob_file, self.blob_len, bytecode, &self.paths.blob)?;
        if let Err(e) = append_at(&mut self.index_file, self.index_len, &record, &self.paths.index)
        {
            roll_back(&self.blob_file, self.blob_len, &self.paths.blob);
            return Err(e);
        }

        self.blob_len += u64::from(size);
        self.index_len += RECORD_SIZE as u64;
        Ok(location)
    }

    /// Current blob file length.
    pub fn blob_len(&self) -> u64 {
        self.blob_len
    }

    /// Current index file length.
    pub fn index_len(&self) -> u64 {
        self.index_len
    }
}

/// Read-only view of a pair, as produced by [`scan`].
#[derive(Debug)]
pub struct CacheSummary {
    /// Format version found in the index header.
    pub version: u32,
    /// Number of records in the index file, duplicates included.
    pub records: usize,
    /// Size of the index file.
    pub index_bytes: u64,
    /// Size of the blob file.
    pub blob_bytes: u64,
    /// The loaded entries.
    pub index: CacheIndex,
}

impl CacheSummary {
    /// Blob bytes that no index entry points at.
    pub fn unreferenced_bytes(&self) -> u64 {
        self.blob_bytes
            .saturating_sub(self.index.referenced_bytes())
    }
}

/// Validates the pair at `paths` without creating, truncating or deleting anything.
pub fn scan(paths: &CachePaths) -> Result<CacheSummary, CacheError> {
    let index_file = File::open(&paths.index).map_err(|source| io_error(&paths.index, source))?;
    let index_bytes = index_file
        .metadata()
        .map_err(|source| io_error(&paths.index, source))?
        .len();
    // Opening creates a missing blob, so it reads as empty here.
    let blob_bytes = match std::fs::metadata(&paths.blob) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(source) => return Err(io_error(&paths.blob, source)),
    };

    let (index, records) = load_index(BufReader::new(index_file), blob_bytes, &paths.index)?;
    Ok(CacheSummary {
        version: FORMAT_VERSION,
        records,
        index_bytes,
        blob_bytes,
        index,
    })
}

/// Deletes both files of the pair. Returns how many files existed.
pub fn remove_pair(paths: &CachePaths) -> Result<usize, CacheError> {
    let mut removed = 0;
    for path in [&paths.index, &paths.blob] {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(io_error(path, source)),
        }
    }
    Ok(removed)
}

/// Checks the header and decodes every record of an index stream.
///
/// Returns the entries plus the number of records read. A record that is
/// truncated, names an unknown stage, or reaches past `blob_len` makes the
/// whole index corrupt.
fn load_index<R: Read>(
    mut reader: R,
    blob_len: u64,
    path: &Path,
) -> Result<(CacheIndex, usize), CacheError> {
    let mut header = [0u8; HEADER_SIZE];
    let got = read_full(&mut reader, &mut header).map_err(|source| io_error(path, source))?;
    if got != HEADER_SIZE {
        return Err(corrupt(path, format!("header is {got} bytes long")));
    }
    let version = decode_header(header);
    if version != FORMAT_VERSION {
        return Err(CacheError::VersionMismatch {
            path: path.to_path_buf(),
            expected: FORMAT_VERSION,
            actual: version,
        });
    }

    let mut index = CacheIndex::new();
    let mut records = 0usize;
    let mut buf = [0u8; RECORD_SIZE];
    loop {
        let got = read_full(&mut reader, &mut buf).map_err(|source| io_error(path, source))?;
        if got == 0 {
            break;
        }
        if got < RECORD_SIZE {
            return Err(corrupt(
                path,
                format!("record {records} is truncated ({got} of {RECORD_SIZE} bytes)"),
            ));
        }

        let record = IndexRecord::decode(&buf)
            .map_err(|reason| corrupt(path, format!("record {records}: {reason}")))?;
        let (key, location) = record
            .entry()
            .map_err(|e| corrupt(path, format!("record {records}: {e}")))?;
        if location.end() > blob_len {
            return Err(corrupt(
                path,
                format!(
                    "record {records} spans {}..{} past blob end {blob_len}",
                    location.offset,
                    location.end()
                ),
            ));
        }

        index.insert(key, location);
        records += 1;
    }

    Ok((index, records))
}

/// Reads until `buf` is full or the stream ends. Returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes `data` at `at` and flushes; truncates back to `at` on failure.
fn append_at(file: &mut File, at: u64, data: &[u8], path: &Path) -> Result<(), CacheError> {
    let result = file
        .seek(SeekFrom::Start(at))
        .and_then(|_| file.write_all(data))
        .and_then(|()| file.flush());
    if let Err(source) = result {
        roll_back(file, at, path);
        return Err(CacheError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Cuts `file` back to `len` after a failed append.
fn roll_back(file: &File, len: u64, path: &Path) {
    if let Err(e) = file.set_len(len) {
        warn!(
            path = %path.display(),
            len,
            error = %e,
            "failed to roll back partial cache write"
        );
    }
}

/// Removes a half-created file.
fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove partial cache file");
        }
    }
}

fn remove_stale(path: &Path, what: &str) {
    if !path.exists() {
        return;
    }
    warn!(path = %path.display(), "removing existing {what} file");
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove {what} file");
    }
}

fn io_error(path: &Path, source: io::Error) -> CacheError {
    CacheError::Io {
        path: PathBuf::from(path),
        source,
    }
}

fn create_error(path: &Path, source: io::Error) -> CacheError {
    CacheError::Create {
        path: PathBuf::from(path),
        source,
    }
}

fn corrupt(path: &Path, reason: String) -> CacheError {
    CacheError::Corrupt {
        path: PathBuf::from(path),
        reason,
    }
}
