/// Per-pixel transparency masks for exact overlap tests.
///
/// Spike sprites are visually much smaller than their tile bounding box;
/// bounding-box-only collision would produce false deaths. Masks carry the
/// opaque-pixel grid of a sprite so two sprites collide only where opaque
/// pixels coincide once aligned by their relative offset.
///
/// Masks are read-only geometry handed to the simulation at construction;
/// the core never touches image data or a display.

/// Opaque-pixel grid of one sprite.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SpriteMask {
    /// Fully opaque mask, degrading the exact test to a bounding-box test.
    pub fn solid(width: u32, height: u32) -> Self {
        SpriteMask {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build from rows of `.` (transparent) and `#` (opaque).
    /// All rows must have the same length.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let mut bits = Vec::with_capacity((width * height) as usize);
        for row in rows {
            assert_eq!(row.len() as u32, width, "ragged mask rows");
            bits.extend(row.chars().map(|c| c == '#'));
        }
        SpriteMask { width, height, bits }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Is the pixel at (x, y) opaque? Out of bounds reads as transparent.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Do any opaque pixels of `self` and `other` coincide, with `other`
    /// placed at `offset` relative to `self`'s origin?
    ///
    /// Sub-pixel offsets are truncated toward zero before the walk, the way
    /// the original runtime coerces them.
    pub fn overlap(&self, other: &SpriteMask, offset: (f32, f32)) -> bool {
        let ox = offset.0 as i32;
        let oy = offset.1 as i32;

        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }
}

/// The sprite masks the simulation needs: the actor's and one per spike
/// direction variant (0=up, 1=right, 2=down, 3=left).
#[derive(Clone, Debug)]
pub struct MaskTable {
    pub actor: SpriteMask,
    pub spikes: [SpriteMask; 4],
}

impl MaskTable {
    /// Fully opaque masks for callers that do not need pixel accuracy
    /// (editors, headless tests).
    pub fn solid(actor_size: (u32, u32), tile_size: u32) -> Self {
        MaskTable {
            actor: SpriteMask::solid(actor_size.0, actor_size.1),
            spikes: [
                SpriteMask::solid(tile_size, tile_size),
                SpriteMask::solid(tile_size, tile_size),
                SpriteMask::solid(tile_size, tile_size),
                SpriteMask::solid(tile_size, tile_size),
            ],
        }
    }

    /// Mask for a spike direction variant. Variants wrap modulo 4 so the
    /// moving-spike seed variants (4-7) map onto their direction sprite.
    pub fn spike(&self, variant: u8) -> &SpriteMask {
        &self.spikes[(variant % 4) as usize]
    }
}
