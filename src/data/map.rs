//! Map source: named tile and object layers.
//!
//! Level building only talks to `MapSource`; `MapData` is the RON-backed
//! implementation shipped in `assets/maps/`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::LoadError;

/// One tile cell of a tile layer, in grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTile {
    pub col: usize,
    pub row: usize,
    /// Asset path of the tile image. `None` for logic-only layers.
    pub image: Option<String>,
}

/// One free-placed object, in pixels (top-left origin).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapObject {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

pub trait MapSource {
    /// `(cols, rows)`.
    fn size_in_tiles(&self) -> (usize, usize);
    fn ground_image(&self) -> Option<&str>;
    /// Empty when the layer does not exist.
    fn tiles(&self, layer: &str) -> Vec<MapTile>;
    fn objects(&self, layer: &str) -> &[MapObject];
}

/// Tile layer entry on disk. `Area` fills a rectangle of cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum TileEntry {
    Tile {
        col: usize,
        row: usize,
        #[serde(default)]
        image: Option<String>,
    },
    Area {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
        #[serde(default)]
        image: Option<String>,
    },
}

impl TileEntry {
    fn expand(&self, out: &mut Vec<MapTile>) {
        match self {
            TileEntry::Tile { col, row, image } => out.push(MapTile {
                col: *col,
                row: *row,
                image: image.clone(),
            }),
            TileEntry::Area {
                col,
                row,
                cols,
                rows,
                image,
            } => {
                for r in *row..row + rows {
                    for c in *col..col + cols {
                        out.push(MapTile {
                            col: c,
                            row: r,
                            image: image.clone(),
                        });
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapData {
    pub cols: usize,
    pub rows: usize,
    #[serde(default)]
    pub ground: Option<String>,
    #[serde(default)]
    pub tile_layers: BTreeMap<String, Vec<TileEntry>>,
    #[serde(default)]
    pub object_layers: BTreeMap<String, Vec<MapObject>>,
}

impl MapData {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let src = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::parse(path, &src)
    }

    pub fn parse(path: &Path, src: &str) -> Result<Self, LoadError> {
        let map: MapData = ron::from_str(src).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        map.validate().map_err(|reason| LoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), String> {
        for layer in self.tile_layers.keys() {
            for tile in self.tiles(layer) {
                if tile.col >= self.cols || tile.row >= self.rows {
                    return Err(format!(
                        "tile ({}, {}) in layer {layer} is outside the {}x{} map",
                        tile.col, tile.row, self.cols, self.rows
                    ));
                }
            }
        }
        Ok(())
    }
}

impl MapSource for MapData {
    fn size_in_tiles(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn ground_image(&self) -> Option<&str> {
        self.ground.as_deref()
    }

    fn tiles(&self, layer: &str) -> Vec<MapTile> {
        let mut out = Vec::new();
        if let Some(entries) = self.tile_layers.get(layer) {
            for entry in entries {
                entry.expand(&mut out);
            }
        }
        out
    }

    fn objects(&self, layer: &str) -> &[MapObject] {
        self.object_layers.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAP: &str = r#"(
        cols: 4,
        rows: 3,
        tile_layers: {
            "Farmable": [Area(col: 1, row: 1, cols: 2, rows: 2)],
            "Fence": [Tile(col: 0, row: 0, image: Some("fence.png"))],
        },
        object_layers: {
            "Player": [(x: 10.0, y: 20.0, width: 0.0, height: 0.0, name: "Start")],
        },
    )"#;

    #[test]
    fn test_area_entries_expand_row_major() {
        let map = MapData::parse(Path::new("small.ron"), SMALL_MAP).unwrap();
        let cells: Vec<(usize, usize)> = map
            .tiles("Farmable")
            .iter()
            .map(|t| (t.col, t.row))
            .collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert_eq!(map.tiles("Fence")[0].image.as_deref(), Some("fence.png"));
        assert_eq!(map.objects("Player")[0].name, "Start");
    }

    #[test]
    fn test_missing_layers_are_empty() {
        let map = MapData::parse(Path::new("small.ron"), SMALL_MAP).unwrap();
        assert!(map.tiles("Water").is_empty());
        assert!(map.objects("Trees").is_empty());
        assert_eq!(map.ground_image(), None);
    }

    #[test]
    fn test_out_of_bounds_tile_is_invalid() {
        let src = r#"(cols: 2, rows: 2, tile_layers: { "Farmable": [Tile(col: 2, row: 0)] })"#;
        let err = MapData::parse(Path::new("bad.ron"), src).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }
}
