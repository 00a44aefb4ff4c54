//! Binary save slot
//!
//! A single overwritable snapshot of an in-progress run. Versioned
//! fixed-width layout, all fields little-endian:
//!
//! ```text
//! magic "SNKP" | u16 version | i32 score | i32 tickIntervalMs
//! | i32 cellCount | cellCount x (i32 x, i32 y), head to tail
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::PersistError;
use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::sim::Cell;

const MAGIC: [u8; 4] = *b"SNKP";
const VERSION: u16 = 1;

/// Payload of the save slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub score: u32,
    pub tick_interval_ms: u64,
    /// Snake body, head first
    pub cells: Vec<Cell>,
}

/// Single save slot backed by one file; each save overwrites the last
#[derive(Debug, Clone)]
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize the run snapshot, replacing any previous slot
    pub fn save(&self, data: &SaveData) -> Result<(), PersistError> {
        let mut buf = Vec::with_capacity(18 + data.cells.len() * 8);
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&(data.score as i32).to_le_bytes());
        buf.extend_from_slice(&(data.tick_interval_ms as i32).to_le_bytes());
        buf.extend_from_slice(&(data.cells.len() as i32).to_le_bytes());
        for cell in &data.cells {
            buf.extend_from_slice(&cell.x.to_le_bytes());
            buf.extend_from_slice(&cell.y.to_le_bytes());
        }
        fs::write(&self.path, buf)?;
        log::info!("run saved to {}", self.path.display());
        Ok(())
    }

    /// Read the slot back.
    ///
    /// `NoSaveData` when the slot file does not exist; `CorruptSaveData`
    /// when the record is malformed, leaving the caller's state untouched.
    pub fn load(&self) -> Result<SaveData, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(PersistError::NoSaveData),
            Err(err) => return Err(err.into()),
        };
        let mut reader = Reader::new(&bytes);

        if reader.chunk(4)? != MAGIC {
            return Err(PersistError::CorruptSaveData("bad magic"));
        }
        let version = u16::from_le_bytes(reader.array()?);
        if version != VERSION {
            return Err(PersistError::CorruptSaveData("unsupported version"));
        }

        let score = reader.i32()?;
        let tick_interval_ms = reader.i32()?;
        let cell_count = reader.i32()?;
        if score < 0 || tick_interval_ms <= 0 {
            return Err(PersistError::CorruptSaveData("negative field"));
        }
        if cell_count <= 0 || cell_count > GRID_WIDTH * GRID_HEIGHT {
            return Err(PersistError::CorruptSaveData("implausible cell count"));
        }

        let mut cells = Vec::with_capacity(cell_count as usize);
        for _ in 0..cell_count {
            let cell = Cell::new(reader.i32()?, reader.i32()?);
            if !cell.in_bounds() {
                return Err(PersistError::CorruptSaveData("cell out of range"));
            }
            cells.push(cell);
        }
        if !reader.at_end() {
            return Err(PersistError::CorruptSaveData("trailing bytes"));
        }

        Ok(SaveData {
            score: score as u32,
            tick_interval_ms: tick_interval_ms as u64,
            cells,
        })
    }
}

/// Bounds-checked cursor over the raw record
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn chunk(&mut self, len: usize) -> Result<&'a [u8], PersistError> {
        let chunk = self
            .bytes
            .get(self.pos..self.pos + len)
            .ok_or(PersistError::CorruptSaveData("truncated record"))?;
        self.pos += len;
        Ok(chunk)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], PersistError> {
        Ok(self.chunk(N)?.try_into().expect("chunk length checked"))
    }

    fn i32(&mut self) -> Result<i32, PersistError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> SaveData {
        SaveData {
            score: 120,
            tick_interval_ms: 90,
            cells: vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let slot = SaveSlot::new(dir.path().join("save.dat"));

        slot.save(&sample()).unwrap();
        let loaded = slot.load().unwrap();

        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_slot_is_no_save_data() {
        let dir = tempdir().unwrap();
        let slot = SaveSlot::new(dir.path().join("save.dat"));

        assert!(matches!(slot.load(), Err(PersistError::NoSaveData)));
    }

    #[test]
    fn test_save_overwrites_previous_slot() {
        let dir = tempdir().unwrap();
        let slot = SaveSlot::new(dir.path().join("save.dat"));

        slot.save(&sample()).unwrap();
        let second = SaveData {
            score: 300,
            tick_interval_ms: 50,
            cells: vec![Cell::new(1, 1)],
        };
        slot.save(&second).unwrap();

        assert_eq!(slot.load().unwrap(), second);
    }

    #[test]
    fn test_truncated_record_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.dat");
        let slot = SaveSlot::new(&path);

        slot.save(&sample()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        assert!(matches!(
            slot.load(),
            Err(PersistError::CorruptSaveData(_))
        ));
    }

    #[test]
    fn test_bad_magic_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.dat");
        std::fs::write(&path, b"JUNKJUNKJUNKJUNKJUNK").unwrap();

        let slot = SaveSlot::new(&path);
        assert!(matches!(
            slot.load(),
            Err(PersistError::CorruptSaveData("bad magic"))
        ));
    }

    #[test]
    fn test_zero_cells_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.dat");
        let slot = SaveSlot::new(&path);

        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&10i32.to_le_bytes());
        buf.extend_from_slice(&150i32.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        std::fs::write(&path, buf).unwrap();

        assert!(matches!(
            slot.load(),
            Err(PersistError::CorruptSaveData("implausible cell count"))
        ));
    }
}
