//! # `.agmff` map codec
//!
//! ```text
//! u16 width  (LE)
//! u16 height (LE)
//! repeat { u32 run_length (LE), i8 tile_code }   until width*height cells
//! ```
//!
//! * Runs are taken over the grid in row-major order and may span rows.
//! * No header magic, no version, no checksum: the declared size and the
//!   run total must agree exactly, anything else is [`Corruption`].
//! * Run records are (de)serialised with **bincode 2** in its legacy
//!   fixed-width little-endian configuration.

use bincode::{Decode, Encode, config, decode_from_slice, encode_into_std_write};
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::{fs, io, path::Path};
use thiserror::Error;

use crate::world::{GridError, MapGrid, TileKind};

/// Default file name used by the viewer and the generator.
pub const DEFAULT_MAP_PATH: &str = "map.agmff";

/// Size (in bytes) of the width/height header.
const HEADER_SIZE: usize = 4;
/// Size (in bytes) of one run record.
const RUN_SIZE: usize = 5;

/// One run record as it sits on disk.
#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    len: u32,
    code: i8,
}

/// Ways a byte stream can fail to describe a grid.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Corruption {
    #[error("stream ends inside {what} at byte {offset}")]
    Truncated { what: &'static str, offset: usize },

    #[error("declared size {width}x{height} is empty")]
    EmptyDimensions { width: usize, height: usize },

    #[error("unknown tile code {code} at byte {offset}")]
    UnknownTile { code: i8, offset: usize },

    #[error("run of {len} at byte {offset} overruns the grid ({filled}/{expected} cells filled)")]
    RunOverflow {
        len: u32,
        offset: usize,
        filled: usize,
        expected: usize,
    },

    #[error("{extra} trailing bytes after the last run")]
    TrailingBytes { extra: usize },
}

/// Map loader / encoder errors.
#[derive(Error, Debug)]
pub enum MapError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A code outside {1, 2, 4, 7} was handed to the encoder.
    #[error("cannot encode tile code {code} at ({x}, {y})")]
    Encoding { code: i8, x: usize, y: usize },

    #[error("corrupt map: {0}")]
    Corrupt(#[from] Corruption),

    #[error("{width}x{height} does not fit the 16-bit header")]
    TooLarge { width: usize, height: usize },

    #[error("cannot allocate {cells} cells")]
    Alloc { cells: usize },

    #[error("encoder received {got} cells, grid needs {expected}")]
    CellCount { got: usize, expected: usize },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("run serialisation failed: {0}")]
    Serialize(#[from] bincode::error::EncodeError),
}

/*──────────────────────────── encoding ───────────────────────────────*/

/// Streaming run-length encoder fed one code at a time in row-major order.
///
/// The generator pushes cells as it decides them, so the full grid never
/// has to exist as raw codes.
pub struct RunEncoder {
    out: Vec<u8>,
    current: Option<Run>,
    width: usize,
    expected: usize,
    cells: usize,
}

impl RunEncoder {
    pub fn new(width: usize, height: usize) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height }.into());
        }
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(MapError::TooLarge { width, height }),
        };
        let mut out = Vec::with_capacity(HEADER_SIZE + RUN_SIZE * 64);
        out.write_u16::<LE>(w)?;
        out.write_u16::<LE>(h)?;
        Ok(Self {
            out,
            current: None,
            width,
            expected: width * height,
            cells: 0,
        })
    }

    /// Append one raw code; rejects anything that is not a tile code.
    pub fn push(&mut self, code: i8) -> Result<(), MapError> {
        if TileKind::from_code(code).is_none() {
            return Err(MapError::Encoding {
                code,
                x: self.cells % self.width,
                y: self.cells / self.width,
            });
        }
        if self.cells == self.expected {
            return Err(MapError::CellCount {
                got: self.cells + 1,
                expected: self.expected,
            });
        }
        self.cells += 1;

        match &mut self.current {
            Some(run) if run.code == code && run.len < u32::MAX => run.len += 1,
            _ => {
                self.flush()?;
                self.current = Some(Run { len: 1, code });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn push_kind(&mut self, kind: TileKind) -> Result<(), MapError> {
        self.push(kind.code())
    }

    /// Flush the open run and hand back the finished byte stream.
    pub fn finish(mut self) -> Result<Vec<u8>, MapError> {
        if self.cells != self.expected {
            return Err(MapError::CellCount {
                got: self.cells,
                expected: self.expected,
            });
        }
        self.flush()?;
        Ok(self.out)
    }

    fn flush(&mut self) -> Result<(), MapError> {
        if let Some(run) = self.current.take() {
            encode_into_std_write(run, &mut self.out, config::legacy())?;
        }
        Ok(())
    }
}

/// Encode a typed grid.
pub fn encode(grid: &MapGrid) -> Result<Vec<u8>, MapError> {
    let mut enc = RunEncoder::new(grid.width(), grid.height())?;
    for &kind in grid.tiles() {
        enc.push_kind(kind)?;
    }
    enc.finish()
}

/// Encode a raw row-major code array (e.g. from an external editor).
pub fn encode_codes(width: usize, height: usize, codes: &[i8]) -> Result<Vec<u8>, MapError> {
    let mut enc = RunEncoder::new(width, height)?;
    for &code in codes {
        enc.push(code)?;
    }
    enc.finish()
}

/*──────────────────────────── decoding ───────────────────────────────*/

/// Decode a complete map. No partial grid is ever returned.
pub fn decode(bytes: &[u8]) -> Result<MapGrid, MapError> {
    /*----------- 1. header ------------------------------------------*/
    if bytes.len() < HEADER_SIZE {
        return Err(Corruption::Truncated {
            what: "header",
            offset: bytes.len(),
        }
        .into());
    }
    let mut cursor = &bytes[..HEADER_SIZE];
    let width = cursor.read_u16::<LE>()? as usize;
    let height = cursor.read_u16::<LE>()? as usize;
    if width == 0 || height == 0 {
        return Err(Corruption::EmptyDimensions { width, height }.into());
    }

    /*----------- 2. runs until every cell is filled -----------------*/
    // capacity grows with the runs actually read, never from the header alone
    let expected = width * height;
    let mut tiles = Vec::new();
    let mut offset = HEADER_SIZE;

    while tiles.len() < expected {
        if bytes.len() - offset < RUN_SIZE {
            return Err(Corruption::Truncated {
                what: "run record",
                offset,
            }
            .into());
        }
        let (run, used): (Run, usize) = decode_from_slice(&bytes[offset..], config::legacy())
            .map_err(|_| Corruption::Truncated {
                what: "run record",
                offset,
            })?;

        let kind = TileKind::from_code(run.code).ok_or(Corruption::UnknownTile {
            code: run.code,
            offset: offset + 4,
        })?;
        if run.len as usize > expected - tiles.len() {
            return Err(Corruption::RunOverflow {
                len: run.len,
                offset,
                filled: tiles.len(),
                expected,
            }
            .into());
        }

        tiles
            .try_reserve(run.len as usize)
            .map_err(|_| MapError::Alloc {
                cells: tiles.len() + run.len as usize,
            })?;
        tiles.resize(tiles.len() + run.len as usize, kind);
        offset += used;
    }

    /*----------- 3. nothing may follow the last run -----------------*/
    if offset != bytes.len() {
        return Err(Corruption::TrailingBytes {
            extra: bytes.len() - offset,
        }
        .into());
    }

    Ok(MapGrid::from_tiles(width, height, tiles)?)
}

/*──────────────────────────── file helpers ───────────────────────────*/

/// Read and decode the map at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MapGrid, MapError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let grid = decode(&bytes)?;
    log::info!(
        "loaded map {} ({}x{}, {} bytes)",
        path.display(),
        grid.width(),
        grid.height(),
        bytes.len()
    );
    Ok(grid)
}

/// Encode `grid` and write it to `path`, replacing any existing file.
pub fn save<P: AsRef<Path>>(path: P, grid: &MapGrid) -> Result<(), MapError> {
    let path = path.as_ref();
    let bytes = encode(grid)?;
    fs::write(path, &bytes)?;
    log::info!(
        "saved map {} ({}x{}, {} bytes)",
        path.display(),
        grid.width(),
        grid.height(),
        bytes.len()
    );
    Ok(())
}

// ==========================================================================
// Unit tests
// ==========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn header(w: u16, h: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend(&w.to_le_bytes());
        v.extend(&h.to_le_bytes());
        v
    }

    fn run(v: &mut Vec<u8>, len: u32, code: i8) {
        v.extend(&len.to_le_bytes());
        v.push(code as u8);
    }

    fn sample_grid() -> MapGrid {
        let mut g = MapGrid::new(5, 4, TileKind::Empty).unwrap();
        g.set(4, 0, TileKind::Tree).unwrap();
        g.set(0, 1, TileKind::Tree).unwrap();
        g.set(2, 2, TileKind::Wall).unwrap();
        g.set(1, 3, TileKind::PlayerSpawn).unwrap();
        g.set(2, 3, TileKind::PlayerSpawn).unwrap();
        g
    }

    /*------------------------------------------------------------------*/
    /* 1. Byte layout                                                    */
    /*------------------------------------------------------------------*/
    #[test]
    fn layout_matches_format() {
        let g = MapGrid::new(3, 2, TileKind::Empty).unwrap();
        let mut expected = header(3, 2);
        run(&mut expected, 6, 1);
        assert_eq!(encode(&g).unwrap(), expected);
    }

    #[test]
    fn runs_span_rows_and_merge() {
        // row 0 ends with a tree, row 1 starts with one: a single run of 2
        let bytes = encode(&sample_grid()).unwrap();
        let mut expected = header(5, 4);
        run(&mut expected, 4, 1);
        run(&mut expected, 2, 2);
        run(&mut expected, 6, 1);
        run(&mut expected, 1, 4);
        run(&mut expected, 3, 1);
        run(&mut expected, 2, 7);
        run(&mut expected, 2, 1);
        assert_eq!(bytes, expected);
    }

    /*------------------------------------------------------------------*/
    /* 2. Round trip                                                     */
    /*------------------------------------------------------------------*/
    #[test]
    fn decode_inverts_encode() {
        for g in [
            sample_grid(),
            MapGrid::new(1, 1, TileKind::Wall).unwrap(),
            MapGrid::new(7, 3, TileKind::Tree).unwrap(),
        ] {
            assert_eq!(decode(&encode(&g).unwrap()).unwrap(), g);
        }
    }

    #[test]
    fn file_round_trip() {
        let tmp = tempfile::NamedTempFile::new().expect("tempfile");
        save(tmp.path(), &sample_grid()).unwrap();
        assert_eq!(load(tmp.path()).unwrap(), sample_grid());
    }

    /*------------------------------------------------------------------*/
    /* 3. Encoder guards                                                 */
    /*------------------------------------------------------------------*/
    #[test]
    fn encoder_rejects_unknown_code() {
        let err = encode_codes(2, 2, &[1, 1, 3, 1]).unwrap_err();
        assert!(matches!(err, MapError::Encoding { code: 3, x: 0, y: 1 }));
    }

    #[test]
    fn encoder_rejects_wrong_cell_count() {
        assert!(matches!(
            encode_codes(2, 2, &[1, 1, 1]),
            Err(MapError::CellCount { got: 3, expected: 4 })
        ));
        assert!(matches!(
            encode_codes(1, 1, &[1, 1]),
            Err(MapError::CellCount { got: 2, expected: 1 })
        ));
    }

    #[test]
    fn encoder_rejects_oversized_grid() {
        assert!(matches!(
            RunEncoder::new(70_000, 1),
            Err(MapError::TooLarge { .. })
        ));
    }

    /*------------------------------------------------------------------*/
    /* 4. Decoder guards                                                 */
    /*------------------------------------------------------------------*/
    fn corruption(bytes: &[u8]) -> Corruption {
        match decode(bytes) {
            Err(MapError::Corrupt(c)) => c,
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[test]
    fn short_run_total_is_corrupt() {
        let mut bytes = header(3, 3);
        run(&mut bytes, 8, 1);
        assert!(matches!(corruption(&bytes), Corruption::Truncated { .. }));
    }

    #[test]
    fn long_run_total_is_corrupt() {
        let mut bytes = header(3, 3);
        run(&mut bytes, 5, 1);
        run(&mut bytes, 5, 2);
        assert!(matches!(
            corruption(&bytes),
            Corruption::RunOverflow {
                len: 5,
                filled: 5,
                expected: 9,
                ..
            }
        ));
    }

    #[test]
    fn truncated_record_is_corrupt() {
        let mut bytes = header(2, 2);
        run(&mut bytes, 4, 1);
        bytes.pop();
        assert!(matches!(corruption(&bytes), Corruption::Truncated { .. }));
        assert!(matches!(corruption(&[1, 0, 1]), Corruption::Truncated { .. }));
    }

    #[test]
    fn unknown_code_is_corrupt() {
        let mut bytes = header(2, 1);
        run(&mut bytes, 2, 0);
        assert!(matches!(
            corruption(&bytes),
            Corruption::UnknownTile { code: 0, offset: 8 }
        ));
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let mut bytes = header(2, 1);
        run(&mut bytes, 2, 1);
        run(&mut bytes, 1, 1);
        assert!(matches!(
            corruption(&bytes),
            Corruption::TrailingBytes { extra: 5 }
        ));
    }

    #[test]
    fn huge_header_without_runs_is_truncated() {
        // 65535 x 65535 declared, nothing behind it
        assert!(matches!(
            corruption(&[0xff; 4]),
            Corruption::Truncated { offset: 4, .. }
        ));
    }

    #[test]
    fn zero_dimensions_are_corrupt() {
        assert!(matches!(
            corruption(&header(0, 4)),
            Corruption::EmptyDimensions { .. }
        ));
    }

    #[test]
    fn zero_length_runs_are_skipped() {
        let mut bytes = header(2, 1);
        run(&mut bytes, 0, 4);
        run(&mut bytes, 2, 2);
        let g = decode(&bytes).unwrap();
        assert_eq!(g, MapGrid::new(2, 1, TileKind::Tree).unwrap());
    }
}
