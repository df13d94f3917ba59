use std::time::Duration;

use glam::{I64Vec2, UVec2};
use image::{Rgba, RgbaImage};

use super::tile_images::TileImageCache;
use super::viewport::ViewportController;
use crate::error::Result;
use crate::world::World;

/// Animation frame shown after `elapsed`, advancing once per `period`.
pub fn animation_frame(elapsed: Duration, period: Duration, frames: u8) -> u8 {
    if frames == 0 {
        return 0;
    }
    let step = elapsed.as_millis() / period.as_millis().max(1);
    (step % frames as u128) as u8
}

/// Builds the fixed-size output frame from the active-area composite.
///
/// Animated tiles go onto the canvas first, straight from their sheets, and
/// the static composite is laid over them. Cells covered by an animated tile
/// are transparent in the composite, so the animation shows through.
#[derive(Clone, Debug)]
pub struct FrameAssembler {
    canvas: RgbaImage,
    period: Duration,
}

impl FrameAssembler {
    pub fn new(view: UVec2, period: Duration) -> Self {
        Self { canvas: RgbaImage::new(view.x, view.y), period }
    }

    /// The last assembled frame.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn assemble(
        &mut self,
        world: &World,
        viewport: &ViewportController,
        composite: &RgbaImage,
        cache: &mut TileImageCache,
        elapsed: Duration,
    ) -> Result<&RgbaImage> {
        self.canvas.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));

        let active = world.active_area();
        let area = world.area();
        let catalog = world.catalog();
        let tile = viewport.tile_size().as_i64vec2();
        let (first, remainder) = viewport.relative_tiles(active);
        let span = viewport.view_tiles().as_i64vec2();
        let size = I64Vec2::new(area.width() as i64, area.height() as i64);

        // One tile of margin on every side covers partially visible cells.
        for j in -1..=span.y {
            for i in -1..=span.x {
                let cell = first + I64Vec2::new(i, j);
                if cell.x < 0 || cell.y < 0 || cell.x >= size.x || cell.y >= size.y {
                    continue;
                }
                let Some(ty) = area.tile_at(cell.x as i32, cell.y as i32).and_then(|id| catalog.get(id))
                else {
                    continue;
                };
                if !ty.animated() {
                    continue;
                }
                let frame = animation_frame(elapsed, self.period, ty.variants());
                let at = I64Vec2::new(i, j) * tile - remainder;
                let set = cache.get(ty)?;
                image::imageops::overlay(&mut self.canvas, set.main(frame), at.x, at.y);
            }
        }

        let offset = viewport.relative_offset(active);
        image::imageops::overlay(&mut self.canvas, composite, -offset.x, -offset.y);
        Ok(&self.canvas)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
