#![forbid(unsafe_code)]

//! The eight landing-page behaviors.
//!
//! Each component owns its state, finds its elements in `mount`, and only
//! touches the document from its own callbacks. They share nothing but the
//! document and the preference storage.

mod counter;
mod mobile_nav;
mod navbar;
mod particles;
mod reveal;
mod scroll_spy;
mod smooth_scroll;
mod theme;
mod typewriter;

pub use counter::{COUNTER_OBSERVER, CounterAnimator};
pub use mobile_nav::MobileNav;
pub use navbar::NavbarScroll;
pub use particles::{DEFAULT_PARTICLE_SEED, ParticleCanvas};
pub use reveal::{REVEAL_OBSERVER, RevealOnScroll};
pub use scroll_spy::ScrollSpy;
pub use smooth_scroll::SmoothScroll;
pub use theme::ThemeToggle;
pub use typewriter::TypewriterEffect;

use folio_core::PageConfig;

use crate::PageError;
use crate::component::Component;
use crate::host::Document;

/// The standard component set, in mount order.
#[must_use]
pub fn standard<D: Document + 'static>(config: &PageConfig) -> Vec<Box<dyn Component<D>>> {
    vec![
        Box::new(TypewriterEffect::<D::Node>::new(config)),
        Box::new(NavbarScroll::<D::Node>::new(config)),
        Box::new(ScrollSpy::<D::Node>::new(config)),
        Box::new(MobileNav::<D::Node>::new(config)),
        Box::new(RevealOnScroll::<D::Node>::new(config)),
        Box::new(CounterAnimator::<D::Node>::new(config)),
        Box::new(ParticleCanvas::<D::Node>::new(config)),
        Box::new(SmoothScroll::<D::Node>::new(config)),
        Box::new(ThemeToggle::<D::Node>::new(config)),
    ]
}

/// Look up a required element by id.
fn require_id<D: Document>(
    doc: &D,
    component: &'static str,
    id: &str,
) -> Result<D::Node, PageError> {
    doc.element_by_id(id)
        .ok_or_else(|| PageError::missing(component, format!("#{id}")))
}
