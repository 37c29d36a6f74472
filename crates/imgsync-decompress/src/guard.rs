use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use imgsync_fs::NamedTempFile;

use crate::codecs::wrap_reader;
use crate::{Compression, Error, Result};

/// Absolute ceiling on decoded output: 50 GiB.
pub const DEFAULT_MAX_OUTPUT_BYTES: u64 = 50 * 1024 * 1024 * 1024;

const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct DecompressOptions {
    max_output_bytes: u64,
    temp_dir:         Option<PathBuf>,
}

impl Default for DecompressOptions {
    fn default() -> Self { Self::new() }
}

impl DecompressOptions {
    pub fn new() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            temp_dir:         None,
        }
    }

    pub fn max_output_bytes(mut self, limit: u64) -> Self {
        self.max_output_bytes = limit;
        self
    }

    /// Directory for the decoded output file; defaults to the system temp dir.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

/// Decoded payload in a disposable file.
#[derive(Debug)]
pub struct Decompressed {
    pub file: NamedTempFile,
    pub size: u64,
}

impl Decompressed {
    pub fn path(&self) -> &Path { self.file.path() }
}

/// Decode `reader` into a new temporary file.
///
/// At most `limit + 1` bytes are ever pulled from the decoder; seeing the
/// extra byte fails the whole operation and the partial file is removed.
/// Size headers inside the compressed stream are never consulted.
pub fn decompress<R: Read>(
    reader: R,
    compression: Compression,
    options: &DecompressOptions,
) -> Result<Decompressed> {
    let decoder = wrap_reader(reader, compression)?;
    let mut limited = decoder.take(options.max_output_bytes.saturating_add(1));

    let mut file = match &options.temp_dir {
        Some(dir) => imgsync_fs::temp_file_in(dir, "decompress")?,
        None => imgsync_fs::temp_file("decompress")?,
    };

    let size = copy_bounded(&mut limited, &mut file, compression, options.max_output_bytes)?;
    file.as_file().sync_all().map_err(|e| write_error(&file, e))?;

    Ok(Decompressed { file, size })
}

/// Same as [`decompress`] with the format given as its manifest spelling.
pub fn decompress_named<R: Read>(
    reader: R,
    format: &str,
    options: &DecompressOptions,
) -> Result<Decompressed> {
    decompress(reader, format.parse()?, options)
}

fn copy_bounded(
    decoder: &mut impl Read,
    out: &mut NamedTempFile,
    format: Compression,
    limit: u64,
) -> Result<u64> {
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match decoder.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(Error::Codec { format, source }),
        };
        total += n as u64;
        if total > limit {
            return Err(Error::LimitExceeded { limit });
        }
        out.write_all(&buf[..n]).map_err(|e| write_error(out, e))?;
    }
    Ok(total)
}

fn write_error(file: &NamedTempFile, source: io::Error) -> Error {
    Error::Fs(imgsync_fs::Error::Write {
        path: file.path().to_path_buf(),
        source,
    })
}
