//! Farm grid cells and the soil autotile rule.

use bevy::prelude::*;
use crate::shared::*;

/// Tags on one grid cell.
///
/// Fields are private so the tag invariants hold: a cell is only tilled if
/// farmable, only watered or planted if tilled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCell {
    farmable: bool,
    tilled: bool,
    watered: bool,
    planted: bool,
}

impl GridCell {
    pub fn is_farmable(&self) -> bool {
        self.farmable
    }

    pub fn is_tilled(&self) -> bool {
        self.tilled
    }

    pub fn is_watered(&self) -> bool {
        self.watered
    }

    pub fn is_planted(&self) -> bool {
        self.planted
    }

    /// Returns true only when the cell was newly tilled.
    pub fn till(&mut self) -> bool {
        if !self.farmable || self.tilled {
            return false;
        }
        self.tilled = true;
        true
    }

    pub fn water(&mut self) -> bool {
        if !self.tilled || self.watered {
            return false;
        }
        self.watered = true;
        true
    }

    pub fn dry(&mut self) {
        self.watered = false;
    }

    pub fn plant(&mut self) -> bool {
        if !self.tilled || self.planted {
            return false;
        }
        self.planted = true;
        true
    }

    pub fn clear_plant(&mut self) {
        self.planted = false;
    }
}

/// Row-major grid of cells covering the whole map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilGrid {
    cols: usize,
    rows: usize,
    cells: Vec<GridCell>,
}

impl SoilGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![GridCell::default(); cols * rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        (pos.col < self.cols && pos.row < self.rows).then(|| pos.row * self.cols + pos.col)
    }

    pub fn get(&self, pos: TilePos) -> Option<&GridCell> {
        let i = self.index(pos)?;
        Some(&self.cells[i])
    }

    pub fn get_mut(&mut self, pos: TilePos) -> Option<&mut GridCell> {
        let i = self.index(pos)?;
        Some(&mut self.cells[i])
    }

    pub fn mark_farmable(&mut self, pos: TilePos) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                cell.farmable = true;
                true
            }
            None => false,
        }
    }

    /// Tile under a world point, if it is on the grid.
    pub fn tile_at(&self, point: Vec2, tile_size: f32) -> Option<TilePos> {
        if point.x < 0.0 || point.y < 0.0 || tile_size <= 0.0 {
            return None;
        }
        let pos = TilePos::new(
            (point.x / tile_size).floor() as usize,
            (point.y / tile_size).floor() as usize,
        );
        self.index(pos).map(|_| pos)
    }

    /// Off-grid cells count as untilled.
    fn tilled_at(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        self.get(TilePos::new(col as usize, row as usize))
            .is_some_and(GridCell::is_tilled)
    }

    pub fn tilled_neighbors(&self, pos: TilePos) -> Neighbors {
        let (c, r) = (pos.col as isize, pos.row as isize);
        Neighbors {
            top: self.tilled_at(c, r - 1),
            bottom: self.tilled_at(c, r + 1),
            left: self.tilled_at(c - 1, r),
            right: self.tilled_at(c + 1, r),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &GridCell)> {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (TilePos::new(i % cols, i / cols), cell))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut GridCell> {
        self.cells.iter_mut()
    }
}

/// Which orthogonal neighbours are tilled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// One of the 16 soil tile images, named after its asset stem.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilVariant {
    O,
    X,
    L,
    R,
    LR,
    T,
    B,
    TB,
    TL,
    TR,
    BL,
    BR,
    TBL,
    TBR,
    LRT,
    LRB,
}

impl SoilVariant {
    /// Later rules override earlier ones, so the order of checks matters.
    pub fn from_neighbors(n: Neighbors) -> Self {
        let Neighbors {
            top: t,
            bottom: b,
            left: l,
            right: r,
        } = n;
        let mut variant = SoilVariant::O;

        if t && b && l && r {
            variant = SoilVariant::X;
        }

        // Horizontal runs
        if l && !t && !b && !r {
            variant = SoilVariant::R;
        }
        if r && !t && !b && !l {
            variant = SoilVariant::L;
        }
        if r && l && !t && !b {
            variant = SoilVariant::LR;
        }

        // Vertical runs
        if t && !r && !l && !b {
            variant = SoilVariant::B;
        }
        if b && !r && !l && !t {
            variant = SoilVariant::T;
        }
        if b && t && !r && !l {
            variant = SoilVariant::TB;
        }

        // Corners
        if l && b && !t && !r {
            variant = SoilVariant::TR;
        }
        if r && b && !t && !l {
            variant = SoilVariant::TL;
        }
        if l && t && !b && !r {
            variant = SoilVariant::BR;
        }
        if r && t && !b && !l {
            variant = SoilVariant::BL;
        }

        // T shapes
        if t && b && r && !l {
            variant = SoilVariant::TBR;
        }
        if t && b && l && !r {
            variant = SoilVariant::TBL;
        }
        if l && r && t && !b {
            variant = SoilVariant::LRB;
        }
        if l && r && b && !t {
            variant = SoilVariant::LRT;
        }

        variant
    }

    pub fn code(self) -> &'static str {
        match self {
            SoilVariant::O => "o",
            SoilVariant::X => "x",
            SoilVariant::L => "l",
            SoilVariant::R => "r",
            SoilVariant::LR => "lr",
            SoilVariant::T => "t",
            SoilVariant::B => "b",
            SoilVariant::TB => "tb",
            SoilVariant::TL => "tl",
            SoilVariant::TR => "tr",
            SoilVariant::BL => "bl",
            SoilVariant::BR => "br",
            SoilVariant::TBL => "tbl",
            SoilVariant::TBR => "tbr",
            SoilVariant::LRT => "lrt",
            SoilVariant::LRB => "lrb",
        }
    }
}
