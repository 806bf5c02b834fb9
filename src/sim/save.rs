/// Map persistence: one JSON file per level.
///
/// ## File format
///
/// An object with exactly three fields:
///   - `tilemap`:  `"x;y"` key → `{type, variant, pos: [x, y]}` with grid
///     coordinates matching the key
///   - `tile_size`: integer pixel edge length
///   - `offgrid`:  ordered array of the same tile objects with pixel `pos`
///
/// Saving reproduces exactly this shape (keys emitted in sorted order so
/// files are deterministic); loading accepts it verbatim.
///
/// ## Errors
///
/// A missing file and a directory path are distinguishable, recoverable
/// conditions; callers fall back to an empty map. Anything structurally
/// wrong with the content is `Malformed` and propagates: it means a
/// corrupted asset, not a runtime condition.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::tile::{GridPos, OffgridTile, TileKind};
use crate::domain::tilemap::Tilemap;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map file not found: {0}")]
    NotFound(PathBuf),
    #[error("map path is a directory: {0}")]
    IsDirectory(PathBuf),
    #[error("malformed map data in {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },
    #[error("map io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MapError {
    /// Recoverable conditions fall back to an empty map upstream.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MapError::NotFound(_) | MapError::IsDirectory(_))
    }
}

// ══════════════════════════════════════════════════════════════
// JSON schema (wire shape, separate from the runtime Tilemap)
// ══════════════════════════════════════════════════════════════

#[derive(Serialize, Deserialize, Debug)]
struct MapFile {
    tilemap: BTreeMap<String, TileRecord>,
    tile_size: u32,
    offgrid: Vec<OffgridRecord>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u8,
    pos: (i32, i32),
}

#[derive(Serialize, Deserialize, Debug)]
struct OffgridRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u8,
    pos: (f32, f32),
}

fn grid_key(pos: GridPos) -> String {
    format!("{};{}", pos.0, pos.1)
}

fn parse_grid_key(key: &str) -> Option<GridPos> {
    let (x, y) = key.split_once(';')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

// ══════════════════════════════════════════════════════════════
// Load / save
// ══════════════════════════════════════════════════════════════

pub fn load_map(path: &Path) -> Result<Tilemap, MapError> {
    if path.is_dir() {
        return Err(MapError::IsDirectory(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MapError::NotFound(path.to_path_buf())
        } else {
            MapError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let file: MapFile = serde_json::from_str(&text).map_err(|e| MapError::Malformed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut map = Tilemap::new(file.tile_size);
    for (key, rec) in file.tilemap {
        let from_key = parse_grid_key(&key).ok_or_else(|| MapError::Malformed {
            path: path.to_path_buf(),
            detail: format!("bad grid key {key:?}"),
        })?;
        if from_key != rec.pos {
            return Err(MapError::Malformed {
                path: path.to_path_buf(),
                detail: format!("grid key {key:?} disagrees with pos {:?}", rec.pos),
            });
        }
        map.set_tile(rec.pos, rec.kind, rec.variant);
    }
    for rec in file.offgrid {
        map.push_offgrid(OffgridTile {
            kind: rec.kind,
            variant: rec.variant,
            pos: rec.pos,
        });
    }

    Ok(map)
}

pub fn save_map(map: &Tilemap, path: &Path) -> Result<(), MapError> {
    let file = MapFile {
        tilemap: map
            .ongrid_iter()
            .map(|(&pos, tile)| {
                (
                    grid_key(pos),
                    TileRecord {
                        kind: tile.kind,
                        variant: tile.variant,
                        pos,
                    },
                )
            })
            .collect(),
        tile_size: map.tile_size(),
        offgrid: map
            .offgrid_iter()
            .map(|t| OffgridRecord {
                kind: t.kind,
                variant: t.variant,
                pos: t.pos,
            })
            .collect(),
    };

    let text = serde_json::to_string(&file).map_err(|e| MapError::Malformed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    std::fs::write(path, text).map_err(|e| MapError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
