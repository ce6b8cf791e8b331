use std::{
    fmt,
    io::{self, Write},
};

use bstr::ByteSlice;
use cqdb::CQDB;

use crate::error::{Error, Result};
use crate::vector::SparseVector;

pub(crate) const MAGIC: &[u8; 4] = b"lPRC";
pub(crate) const MODEL_TYPE: &[u8; 4] = b"SPWV";
pub(crate) const WEIGHTS_CHUNK: &[u8; 4] = b"WGHT";
pub(crate) const VERSION: u32 = 1;
pub(crate) const HEADER_SIZE: usize = 28;
pub(crate) const CHUNK_SIZE: usize = 12;
pub(crate) const WEIGHT_SIZE: usize = 8;

#[inline]
pub(crate) fn unpack_u32(buf: &[u8]) -> io::Result<u32> {
    if buf.len() < 4 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "not enough data for unpacking u32",
        ));
    }
    Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

#[inline]
fn unpack_f64(buf: &[u8]) -> io::Result<f64> {
    if buf.len() < 8 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "not enough data for unpacking f64",
        ));
    }
    Ok(f64::from_le_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ]))
}

#[derive(Debug, Clone)]
struct Header {
    magic: [u8; 4],
    size: u32,
    r#type: [u8; 4],
    version: u32,
    num_features: u32,
    off_weights: u32,
    off_features: u32,
}

/// Read-only view of a persisted weight vector
///
/// The buffer is validated once in [`Model::new`]; feature names are looked
/// up lazily through the embedded CQDB.
#[derive(Clone)]
pub struct Model<'a> {
    buffer: &'a [u8],
    header: Header,
    features: Option<CQDB<'a>>,
}

impl<'a> fmt::Debug for Model<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("size", &self.buffer.len())
            .field("header", &self.header)
            .field("features", &self.features)
            .finish()
    }
}

impl<'a> Model<'a> {
    /// Create a model view from a buffer produced by the model writer
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let size = buf.len();
        if size < HEADER_SIZE {
            return Err(Error::format("buffer too small for model header"));
        }
        if &buf[0..4] != MAGIC {
            return Err(Error::format("magic mismatch"));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        let declared_size = unpack_u32(&buf[4..])?;
        let mut r#type = [0u8; 4];
        r#type.copy_from_slice(&buf[8..12]);
        if &r#type != MODEL_TYPE {
            return Err(Error::format("unknown model type"));
        }
        let version = unpack_u32(&buf[12..])?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        if declared_size as usize != size {
            return Err(Error::format(format!(
                "declared size {} does not match buffer size {}",
                declared_size, size
            )));
        }
        let header = Header {
            magic,
            size: declared_size,
            r#type,
            version,
            num_features: unpack_u32(&buf[16..])?,
            off_weights: unpack_u32(&buf[20..])?,
            off_features: unpack_u32(&buf[24..])?,
        };

        // Weights chunk must be complete
        let off_weights = header.off_weights as usize;
        let weights_end = (header.num_features as usize)
            .checked_mul(WEIGHT_SIZE)
            .and_then(|n| n.checked_add(off_weights + CHUNK_SIZE))
            .ok_or_else(|| Error::format("weights chunk size overflow"))?;
        if off_weights < HEADER_SIZE || weights_end > size {
            return Err(Error::format("weights chunk out of bounds"));
        }
        if &buf[off_weights..off_weights + 4] != WEIGHTS_CHUNK {
            return Err(Error::format("weights chunk magic mismatch"));
        }
        let count = unpack_u32(&buf[off_weights + 8..])?;
        if count != header.num_features {
            return Err(Error::format("weights chunk count mismatch"));
        }

        let features = if header.num_features == 0 {
            None
        } else {
            let off_features = header.off_features as usize;
            if off_features < weights_end || off_features >= size {
                return Err(Error::format("feature dictionary out of bounds"));
            }
            Some(CQDB::new(&buf[off_features..size])?)
        };

        Ok(Self {
            buffer: buf,
            header,
            features,
        })
    }

    /// Number of stored features
    pub fn num_features(&self) -> u32 {
        self.header.num_features
    }

    /// Format version of the buffer
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Convert a feature ID to its name
    pub fn to_feature(&self, fid: u32) -> Option<&str> {
        self.features
            .as_ref()
            .and_then(|db| db.to_str(fid))
            .and_then(|s| s.to_str().ok())
    }

    /// Convert a feature name to its ID
    pub fn to_feature_id(&self, name: &str) -> Option<u32> {
        self.features.as_ref().and_then(|db| db.to_id(name))
    }

    /// Weight stored under a feature ID
    pub fn weight(&self, fid: u32) -> Result<f64> {
        if fid >= self.header.num_features {
            return Err(Error::format(format!("feature id {} out of range", fid)));
        }
        let index = self.header.off_weights as usize + CHUNK_SIZE + WEIGHT_SIZE * fid as usize;
        Ok(unpack_f64(&self.buffer[index..])?)
    }

    /// Decode the complete weight vector
    pub fn weights(&self) -> Result<SparseVector> {
        let mut weights = SparseVector::with_capacity(self.header.num_features as usize);
        for fid in 0..self.header.num_features {
            let name = self
                .to_feature(fid)
                .ok_or_else(|| Error::format(format!("no feature name for id {}", fid)))?;
            if weights.insert(name, self.weight(fid)?).is_some() {
                return Err(Error::format(format!("duplicate feature {:?}", name)));
            }
        }
        Ok(weights)
    }

    /// Print the model in human-readable format
    pub fn dump<W: Write>(&self, w: &mut W) -> Result<()> {
        let header = &self.header;
        writeln!(w, "FILEHEADER = {{")?;
        writeln!(w, "  magic: {}", header.magic[..].as_bstr())?;
        writeln!(w, "  size: {}", header.size)?;
        writeln!(w, "  type: {}", header.r#type[..].as_bstr())?;
        writeln!(w, "  version: {}", header.version)?;
        writeln!(w, "  num_features: {}", header.num_features)?;
        writeln!(w, "  off_weights: {:#X}", header.off_weights)?;
        writeln!(w, "  off_features: {:#X}", header.off_features)?;
        writeln!(w, "}}\n")?;
        writeln!(w, "WEIGHTS = {{")?;
        for fid in 0..header.num_features {
            let name = self.to_feature(fid).unwrap_or("<unknown>");
            writeln!(w, "  {:>5}: {} = {:.6}", fid, name, self.weight(fid)?)?;
        }
        writeln!(w, "}}\n")?;
        Ok(())
    }
}
