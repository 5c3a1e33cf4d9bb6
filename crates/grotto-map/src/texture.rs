use crate::skeleton::Extremes;

/// Horizontal texture bands stacked from the bottom of the skeleton. Band 0 is the deepest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureBands {
    pub bottom_y: f32,
    pub band_height: f32,
    pub count: usize,
}

/// The pair of adjacent bands a chunk blends between.
///
/// `bottom` and `top` are band coordinates in `[band, band + 1]` at the chunk's lower and upper faces; the fractional part
/// is the weight of the upper texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureBlend {
    pub band: usize,
    pub bottom: f32,
    pub top: f32,
}

impl TextureBlend {
    pub fn lower(&self) -> usize {
        self.band
    }

    pub fn upper(&self) -> usize {
        self.band + 1
    }
}

impl TextureBands {
    /// Splits the skeleton's height, padded by one chunk above and below, into `count` equal bands.
    pub fn new(extremes: &Extremes, chunk_edge: i32, count: usize) -> Self {
        let span = extremes.height() + 2.0 * chunk_edge as f32;
        let band_height = if count == 0 {
            span
        } else {
            span / count as f32
        };
        Self {
            bottom_y: extremes.lowest.y,
            band_height: band_height.max(f32::EPSILON),
            count,
        }
    }

    /// Blend for the chunk whose lower face sits at `chunk_min_y`. `None` when there are no textures.
    pub fn blend(&self, chunk_min_y: f32, chunk_edge: i32) -> Option<TextureBlend> {
        if self.count == 0 {
            return None;
        }
        if self.count == 1 {
            return Some(TextureBlend {
                band: 0,
                bottom: 0.0,
                top: 0.0,
            });
        }

        let max_band = (self.count - 2) as f32;
        let center_y = chunk_min_y + (chunk_edge / 2) as f32;
        let band = ((center_y - self.bottom_y) / self.band_height)
            .floor()
            .clamp(0.0, max_band);

        let lo = band;
        let hi = band + 1.0;
        let mut bottom = ((chunk_min_y - self.bottom_y) / self.band_height).clamp(lo, hi);
        let mut top =
            ((chunk_min_y + chunk_edge as f32 - self.bottom_y) / self.band_height).clamp(lo, hi);

        // Snap to the band boundary when half of the chunk's own blend span would overshoot it.
        let span = top - bottom;
        if top + 0.5 * span > hi {
            top = hi;
        }
        if bottom - 0.5 * span < lo {
            bottom = lo;
        }

        Some(TextureBlend {
            band: band as usize,
            bottom,
            top,
        })
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
