use std::io::Read;

use crate::{Compression, Error, Result};

/// Wrap `reader` in the streaming decoder for `codec`.
///
/// Concatenated gzip members and xz streams are decoded as one payload.
pub fn wrap_reader<'a, R: Read + 'a>(reader: R, codec: Compression) -> Result<Box<dyn Read + 'a>> {
    match codec {
        #[cfg(feature = "gzip")]
        Compression::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(reader))),
        #[cfg(feature = "xz")]
        Compression::Xz => Ok(Box::new(xz2::read::XzDecoder::new_multi_decoder(reader))),
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(reader).map_err(|source| Error::Codec {
                format: codec,
                source,
            })?;
            Ok(Box::new(decoder))
        }
        #[allow(unreachable_patterns)]
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}
