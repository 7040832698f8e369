#![forbid(unsafe_code)]

//! Animated particle background.
//!
//! The canvas tracks its parent's size. Every frame moves the field one step,
//! then draws dots and proximity links. Link drawing is O(n²) in the pool
//! size; see `folio_core::particles::COMFORT_POOL_LIMIT`.

use folio_core::PageConfig;
use folio_core::particles::{ParticleField, ParticleParams};
use tracing::debug;

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{Document, Surface};

const NAME: &str = "particles";

/// Seed used when the configuration does not fix one.
pub const DEFAULT_PARTICLE_SEED: u64 = 0x5EED_F011_0C0D_E5;

pub struct ParticleCanvas<N> {
    canvas_id: String,
    params: ParticleParams,
    canvas: Option<N>,
    surface: Option<Box<dyn Surface>>,
    field: Option<ParticleField>,
    stopped: bool,
}

impl<N> ParticleCanvas<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            canvas_id: config.selectors.particle_canvas_id.clone(),
            params: config.particles.clone(),
            canvas: None,
            surface: None,
            field: None,
            stopped: false,
        }
    }

    fn render(&mut self) {
        let (Some(field), Some(surface)) = (self.field.as_mut(), self.surface.as_mut()) else {
            return;
        };
        field.step();
        surface.clear();

        let params = field.params();
        for p in field.particles() {
            surface.fill_circle(p.x, p.y, p.size, &params.color.css_rgba(p.opacity));
        }
        let particles = field.particles();
        for link in field.links() {
            let (a, b) = (&particles[link.a], &particles[link.b]);
            surface.stroke_line(
                (a.x, a.y),
                (b.x, b.y),
                params.link_width,
                &params.color.css_rgba(link.opacity),
            );
        }
    }
}

impl<D: Document> Component<D> for ParticleCanvas<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::RESIZE | Interest::FRAME
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        let canvas = require_id(&*cx.doc, NAME, &self.canvas_id)?;
        let mut surface = cx
            .doc
            .surface(&canvas)
            .ok_or(PageError::NoSurface { component: NAME })?;
        let (width, height) = cx.doc.parent_size(&canvas);
        surface.set_size(width, height);

        self.field = Some(ParticleField::new(
            self.params.clone(),
            width,
            height,
            DEFAULT_PARTICLE_SEED,
        ));
        self.surface = Some(surface);
        self.canvas = Some(canvas);
        debug!(width, height, count = self.params.count, "particle field ready");
        self.render();
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        if self.stopped {
            return;
        }
        match event {
            PageEvent::Resize => {
                let Some(canvas) = self.canvas.as_ref() else {
                    return;
                };
                let (width, height) = cx.doc.parent_size(canvas);
                if let Some(surface) = self.surface.as_mut() {
                    surface.set_size(width, height);
                }
                if let Some(field) = self.field.as_mut() {
                    field.resize(width, height);
                }
            }
            PageEvent::Frame => self.render(),
            _ => {}
        }
    }

    fn shutdown(&mut self, _cx: &mut Context<'_, D>) {
        self.stopped = true;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
    }
}
