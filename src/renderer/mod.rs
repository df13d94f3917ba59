pub mod assets;
pub mod compositor;
pub mod frame;
pub mod tile_images;
pub mod viewport;

use std::time::{Duration, Instant};

use glam::IVec2;
use image::RgbaImage;
use log::{debug, info};

use assets::AssetSource;
use frame::FrameAssembler;
use tile_images::TileImageCache;
use viewport::ViewportController;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::world::World;

/// Scrolling terrain renderer over one attached [`World`].
///
/// Static terrain of the active area is composited once per active-area
/// change and kept as a single image; every frame only re-draws animated
/// tiles and lays that image over them at the current scroll offset.
pub struct WorldRenderer {
    config: RenderConfig,
    world: Option<World>,
    cache: TileImageCache,
    viewport: ViewportController,
    frame: FrameAssembler,
    /// Composite of the current active area; `None` until a world is attached.
    composite: Option<RgbaImage>,
    recomposes: u64,
    /// Wall-clock origin for tile animations.
    clock: Instant,
}

impl WorldRenderer {
    /// Renderer with no world attached. Fails if `config` does not validate.
    pub fn new(config: RenderConfig, assets: impl AssetSource + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: TileImageCache::new(Box::new(assets), config.tile_size()),
            viewport: ViewportController::new(&config),
            frame: FrameAssembler::new(config.view_size(), config.animation_frame()),
            world: None,
            composite: None,
            recomposes: 0,
            clock: Instant::now(),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Attach `world`, returning the previously attached one.
    ///
    /// The active area is placed around the current scroll position and
    /// composited immediately. If that fails, `world` is dropped and the
    /// previously attached world stays in place with its composite.
    pub fn attach_world(&mut self, mut world: World) -> Result<Option<World>> {
        let image = Self::recomposite(&self.viewport, &mut self.cache, &mut world)?;
        self.composite = Some(image);
        self.recomposes += 1;
        Ok(self.world.replace(world))
    }

    pub fn detach_world(&mut self) -> Option<World> {
        self.composite = None;
        self.world.take()
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn scroll_position(&self) -> IVec2 {
        self.viewport.view_top_left()
    }

    /// Move the view's top-left corner to world pixel `(x, y)`.
    ///
    /// Returns `true` when the view reached an edge of the active area and
    /// the area was moved and recomposited. After a failed recomposition the
    /// next call retries, even at the same position.
    pub fn set_scroll_position(&mut self, x: i32, y: i32) -> Result<bool> {
        self.viewport.set_view_top_left(IVec2::new(x, y));
        let Some(world) = &self.world else {
            return Ok(false);
        };
        if self.composite.is_some() && !self.viewport.needs_shift(world.active_area(), world.size()) {
            return Ok(false);
        }
        debug!("renderer: view at ({x}, {y}) needs a new active area");
        self.change_active_area()?;
        Ok(true)
    }

    /// Frame for the current scroll position, animated by wall-clock time.
    ///
    /// `None` when no world is attached.
    pub fn render_frame(&mut self) -> Result<Option<&RgbaImage>> {
        let elapsed = self.clock.elapsed();
        self.render_frame_at(elapsed)
    }

    /// Frame for the current scroll position with animations at `elapsed`.
    ///
    /// A composite lost to an earlier failure is rebuilt first; if that fails
    /// again the error is returned.
    pub fn render_frame_at(&mut self, elapsed: Duration) -> Result<Option<&RgbaImage>> {
        if self.world.is_some() && self.composite.is_none() {
            self.change_active_area()?;
        }
        let (Some(world), Some(composite)) = (&self.world, &self.composite) else {
            return Ok(None);
        };
        let canvas = self.frame.assemble(world, &self.viewport, composite, &mut self.cache, elapsed)?;
        Ok(Some(canvas))
    }

    /// Composite of the current active area.
    pub fn composite(&self) -> Option<&RgbaImage> {
        self.composite.as_ref()
    }

    /// Number of full recompositions since creation.
    pub fn recompose_count(&self) -> u64 {
        self.recomposes
    }

    /// Re-slice the attached world around the view and rebuild the composite.
    ///
    /// The old composite is dropped first, so a failure leaves none.
    fn change_active_area(&mut self) -> Result<()> {
        let Some(world) = self.world.as_mut() else {
            return Ok(());
        };
        self.composite = None;
        let image = Self::recomposite(&self.viewport, &mut self.cache, world)?;
        self.composite = Some(image);
        self.recomposes += 1;
        Ok(())
    }

    fn recomposite(
        viewport: &ViewportController,
        cache: &mut TileImageCache,
        world: &mut World,
    ) -> Result<RgbaImage> {
        let rect = viewport.active_area_for(world.size());
        world.set_active_area(rect);
        let image = compositor::composite(world.area(), world.catalog(), cache)?;
        info!(
            "renderer: recomposited {}x{} tiles at [{}, {}] ({} tile sheets cached)",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            cache.len()
        );
        Ok(image)
    }
}

impl std::fmt::Debug for WorldRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldRenderer")
            .field("config", &self.config)
            .field("world", &self.world.as_ref().map(World::size))
            .field("scroll", &self.viewport.view_top_left())
            .field("recomposes", &self.recomposes)
            .finish()
    }
}
