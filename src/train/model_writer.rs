use std::io::{self, Cursor, Seek, SeekFrom, Write};

use cqdb::CQDBWriter;

use super::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::model::{CHUNK_SIZE, MAGIC, MODEL_TYPE, VERSION, WEIGHTS_CHUNK, WEIGHT_SIZE};
use crate::vector::SparseVector;

/// Convert a stream position to u32 with overflow check
fn pos_to_u32(pos: u64) -> Result<u32> {
    u32::try_from(pos).map_err(|_| Error::format("model size exceeds u32::MAX"))
}

/// Write a weight vector in the binary model format
pub struct ModelWriter;

impl ModelWriter {
    /// Encode `weights` and write the bytes to `writer`
    ///
    /// The whole model is encoded in memory first, so nothing reaches the
    /// sink when encoding fails.
    pub fn write<W: Write>(writer: &mut W, weights: &SparseVector) -> Result<()> {
        let buf = Self::encode(weights)?;
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode `weights` into a standalone buffer
    ///
    /// Feature IDs follow the sorted feature order. Zero weights are kept.
    pub fn encode(weights: &SparseVector) -> Result<Vec<u8>> {
        let dict = Dictionary::sorted(weights.iter().map(|(feature, _)| feature));
        let num_features = u32::try_from(dict.len())
            .map_err(|_| Error::format("number of features exceeds u32::MAX"))?;

        let mut cursor = Cursor::new(Vec::new());

        // Header placeholder, offsets are patched once known
        Self::write_header(&mut cursor, 0, num_features, 0, 0)?;

        let off_weights = pos_to_u32(cursor.stream_position()?)?;
        Self::write_weights(&mut cursor, &dict, weights)?;

        let off_features = if dict.is_empty() {
            0
        } else {
            let offset = pos_to_u32(cursor.stream_position()?)?;
            Self::write_cqdb(&mut cursor, &dict)?;
            offset
        };

        let size = pos_to_u32(cursor.get_ref().len() as u64)?;
        cursor.seek(SeekFrom::Start(0))?;
        Self::write_header(&mut cursor, size, num_features, off_weights, off_features)?;

        Ok(cursor.into_inner())
    }

    fn write_header<W: Write>(
        out: &mut W,
        size: u32,
        num_features: u32,
        off_weights: u32,
        off_features: u32,
    ) -> io::Result<()> {
        out.write_all(MAGIC)?;
        out.write_all(&size.to_le_bytes())?;
        out.write_all(MODEL_TYPE)?;
        out.write_all(&VERSION.to_le_bytes())?;
        out.write_all(&num_features.to_le_bytes())?;
        out.write_all(&off_weights.to_le_bytes())?;
        out.write_all(&off_features.to_le_bytes())?;
        Ok(())
    }

    /// Write the weights chunk, one f64 per feature ID
    fn write_weights<W: Write>(
        out: &mut W,
        dict: &Dictionary,
        weights: &SparseVector,
    ) -> Result<()> {
        let count = dict.len() as u64;
        let chunk_size = u32::try_from(CHUNK_SIZE as u64 + count * WEIGHT_SIZE as u64)
            .map_err(|_| Error::format("weights chunk size exceeds u32::MAX"))?;

        out.write_all(WEIGHTS_CHUNK)?;
        out.write_all(&chunk_size.to_le_bytes())?;
        out.write_all(&(count as u32).to_le_bytes())?;
        for (feature, _) in dict.iter() {
            out.write_all(&weights.get(feature).to_le_bytes())?;
        }
        Ok(())
    }

    /// Write the feature dictionary as a CQDB
    fn write_cqdb(cursor: &mut Cursor<Vec<u8>>, dict: &Dictionary) -> Result<()> {
        let mut writer = CQDBWriter::new(cursor)?;
        for (feature, id) in dict.iter() {
            writer.put(feature.as_str(), id)?;
        }
        // CQDBWriter writes the database when dropped and swallows I/O errors
        // there. Writing into memory cannot fail, and `Model::new` validates
        // the result on the way back in.
        Ok(())
    }
}
