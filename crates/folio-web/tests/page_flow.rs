//! End-to-end behavior of the standard components on the sample page.

use std::time::Duration;

use folio_core::PageConfig;
use folio_core::smooth_scroll::ScrollMode;
use folio_web::components::{COUNTER_OBSERVER, REVEAL_OBSERVER};
use folio_web::memory::{DrawOp, ElementSpec, MemoryDocument, sample_page};
use folio_web::simulator::Simulator;
use folio_web::{
    DomEventKind, Document, MemoryStorage, Page, PageError, ScrollBehavior, StorageBackend,
    UnavailableStorage,
};
use pretty_assertions::assert_eq;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn mounted(config: &PageConfig) -> (Simulator, folio_web::memory::SamplePage) {
    let (mut sim, page) = Simulator::sample(config).unwrap();
    let report = sim.mount().unwrap();
    assert!(report.skipped.is_empty(), "skipped: {:?}", report.skipped);
    (sim, page)
}

// ---------------------------------------------------------------------------
// Mounting
// ---------------------------------------------------------------------------

#[test]
fn sample_page_mounts_every_component() {
    let (mut sim, _) = Simulator::sample(&PageConfig::default()).unwrap();
    let report = sim.mount().unwrap();
    assert_eq!(
        report.mounted,
        vec![
            "typewriter",
            "navbar",
            "scroll-spy",
            "mobile-nav",
            "reveal",
            "counter",
            "particles",
            "smooth-scroll",
            "theme",
        ]
    );

    let doc = sim.doc();
    let listeners = doc.listeners();
    assert!(listeners.contains(&(None, DomEventKind::Scroll)));
    assert!(listeners.contains(&(None, DomEventKind::Resize)));
    assert_eq!(doc.observed(REVEAL_OBSERVER).len(), 2);
    assert_eq!(doc.observed(COUNTER_OBSERVER).len(), 3);
    assert_eq!(
        doc.observer_options(REVEAL_OBSERVER)
            .map(|o| o.root_margin.to_css()),
        Some("0px 0px -50px 0px".to_string())
    );
    assert!(sim.page().wants_frames());
}

#[test]
fn missing_elements_disable_only_their_component() {
    let config = PageConfig::default();
    let mut sim =
        Simulator::new(&config, MemoryDocument::new(800.0, 600.0), MemoryStorage::new()).unwrap();
    let report = sim.mount().unwrap();

    assert_eq!(report.mounted, vec!["reveal", "counter", "smooth-scroll"]);
    let skipped: Vec<&str> = report.skipped.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        skipped,
        vec!["typewriter", "navbar", "scroll-spy", "mobile-nav", "particles", "theme"]
    );
    assert_eq!(
        report.skipped[0].1,
        PageError::missing("typewriter", "#typingText")
    );
    assert!(!sim.page().wants_frames());
    assert_eq!(sim.page().pending_timers(), 0);
}

#[test]
fn strict_mode_fails_on_first_missing_element() {
    let config = PageConfig {
        strict: true,
        ..PageConfig::default()
    };
    let mut sim =
        Simulator::new(&config, MemoryDocument::new(800.0, 600.0), MemoryStorage::new()).unwrap();
    let err = sim.mount().unwrap_err();
    assert_eq!(err, PageError::missing("typewriter", "#typingText"));
    assert!(!sim.page().is_running());
}

#[test]
fn canvas_without_surface_is_reported() {
    let mut doc = MemoryDocument::new(800.0, 600.0);
    doc.append_to_body(ElementSpec::new("div").id("particleCanvas"));
    let mut sim = Simulator::new(&PageConfig::default(), doc, MemoryStorage::new()).unwrap();
    let report = sim.mount().unwrap();
    assert!(report.skipped.contains(&(
        "particles",
        PageError::NoSurface {
            component: "particles"
        }
    )));
}

#[test]
fn invalid_config_is_rejected_before_mount() {
    let mut config = PageConfig::default();
    config.counter.steps = 0;
    let err = Simulator::sample(&config).err().unwrap();
    assert!(matches!(err, PageError::Config(_)));
}

// ---------------------------------------------------------------------------
// Typewriter
// ---------------------------------------------------------------------------

#[test]
fn typewriter_types_holds_and_deletes() {
    let mut config = PageConfig::default();
    config.typewriter.texts = vec!["abc".into()];
    let (mut sim, page) = mounted(&config);

    sim.advance(ms(1499));
    assert_eq!(sim.doc().text(page.typing), "");
    sim.advance(ms(1));
    assert_eq!(sim.doc().text(page.typing), "a");
    sim.advance(ms(160));
    assert_eq!(sim.doc().text(page.typing), "abc");

    sim.advance(ms(1999));
    assert_eq!(sim.doc().text(page.typing), "abc");
    sim.advance(ms(1));
    assert_eq!(sim.doc().text(page.typing), "ab");
    sim.advance(ms(80));
    assert_eq!(sim.doc().text(page.typing), "");
    sim.advance(ms(80));
    assert_eq!(sim.doc().text(page.typing), "a");
}

#[test]
fn typewriter_moves_to_next_line() {
    let mut config = PageConfig::default();
    config.typewriter.texts = vec!["ab".into(), "xyz".into()];
    let (mut sim, page) = mounted(&config);

    // type a, ab (hold), delete to a, "", then type the next line
    sim.advance(ms(1500 + 80 + 2000 + 40));
    assert_eq!(sim.doc().text(page.typing), "");
    sim.advance(ms(80));
    assert_eq!(sim.doc().text(page.typing), "x");
}

#[test]
fn stalled_typewriter_replays_missed_ticks_by_default() {
    let mut config = PageConfig::default();
    config.typewriter.texts = vec!["abc".into()];
    let (mut sim, _) = mounted(&config);

    sim.advance(ms(1580));
    let r = sim.advance(Duration::from_secs(600));
    assert!(r.timers_fired > 1000, "fired {}", r.timers_fired);
}

#[test]
fn stalled_typewriter_resyncs_past_lag_limit() {
    let mut config = PageConfig::default();
    config.typewriter.texts = vec!["abc".into()];
    let (mut sim, page) = mounted(&config);
    sim.page_mut().set_max_timer_lag(Some(ms(250)));

    sim.advance(ms(1580));
    assert_eq!(sim.doc().text(page.typing), "ab");

    let r = sim.advance(Duration::from_secs(600));
    assert_eq!(r.timers_fired, 1);
    assert_eq!(sim.doc().text(page.typing), "abc");

    // The hold is measured from the resync, not from the missed deadline.
    sim.advance(ms(1999));
    assert_eq!(sim.doc().text(page.typing), "abc");
    sim.advance(ms(1));
    assert_eq!(sim.doc().text(page.typing), "ab");
}

#[test]
fn typewriter_with_no_lines_stays_idle() {
    let mut config = PageConfig::default();
    config.typewriter.texts = vec![String::new()];
    let (mut sim, page) = mounted(&config);
    sim.advance(Duration::from_secs(10));
    assert_eq!(sim.doc().text(page.typing), "");
}

// ---------------------------------------------------------------------------
// Scrolling
// ---------------------------------------------------------------------------

#[test]
fn navbar_tracks_scroll_threshold() {
    let (mut sim, page) = mounted(&PageConfig::default());
    sim.scroll_to(50.0);
    assert!(!sim.doc().has_class(&page.navbar, "scrolled"));
    sim.scroll_to(51.0);
    assert!(sim.doc().has_class(&page.navbar, "scrolled"));
    sim.scroll_to(51.0);
    assert_eq!(
        sim.doc()
            .classes(page.navbar)
            .iter()
            .filter(|c| *c == "scrolled")
            .count(),
        1
    );
    sim.scroll_to(10.0);
    assert!(!sim.doc().has_class(&page.navbar, "scrolled"));
}

#[test]
fn scroll_spy_highlights_current_section() {
    let (mut sim, page) = mounted(&PageConfig::default());

    sim.scroll_to(750.0);
    let colors: Vec<Option<&str>> = page
        .links
        .iter()
        .map(|l| sim.doc().style(*l, "color"))
        .collect();
    assert_eq!(colors, vec![None, Some("#00d4ff"), None, None]);

    sim.scroll_to(0.0);
    let colors: Vec<Option<&str>> = page
        .links
        .iter()
        .map(|l| sim.doc().style(*l, "color"))
        .collect();
    assert_eq!(colors, vec![Some("#00d4ff"), None, None, None]);
}

#[test]
fn scroll_spy_with_no_passed_section_highlights_nothing() {
    let mut doc = MemoryDocument::new(1000.0, 600.0);
    let panel = doc.append_to_body(ElementSpec::new("ul").id("navLinks"));
    let link = doc.append(panel, ElementSpec::new("a").attr("href", "#a"));
    doc.append_to_body(
        ElementSpec::new("section")
            .id("a")
            .class("section")
            .rect(0.0, 500.0, 1000.0, 2000.0),
    );
    let mut sim = Simulator::new(&PageConfig::default(), doc, MemoryStorage::new()).unwrap();
    sim.mount().unwrap();

    sim.scroll_to(399.0);
    assert_eq!(sim.doc().style(link, "color"), None);
    sim.scroll_to(400.0);
    assert_eq!(sim.doc().style(link, "color"), Some("#00d4ff"));
}

// ---------------------------------------------------------------------------
// Mobile navigation
// ---------------------------------------------------------------------------

#[test]
fn mobile_nav_toggles_and_closes_on_link() {
    let (mut sim, page) = mounted(&PageConfig::default());

    sim.click(page.nav_toggle);
    assert!(sim.doc().has_class(&page.nav_toggle, "active"));
    assert!(sim.doc().has_class(&page.nav_links, "active"));

    sim.click(page.nav_toggle);
    assert!(!sim.doc().has_class(&page.nav_toggle, "active"));
    assert!(!sim.doc().has_class(&page.nav_links, "active"));

    sim.click(page.nav_toggle);
    sim.click(page.links[2]);
    assert!(!sim.doc().has_class(&page.nav_toggle, "active"));
    assert!(!sim.doc().has_class(&page.nav_links, "active"));

    // Link clicks always close, even when already closed.
    sim.click(page.links[0]);
    assert!(!sim.doc().has_class(&page.nav_links, "active"));
}

// ---------------------------------------------------------------------------
// Reveal
// ---------------------------------------------------------------------------

#[test]
fn reveal_is_add_only() {
    let (mut sim, page) = mounted(&PageConfig::default());
    let card = page.reveals[0];
    assert!(!sim.doc().has_class(&card, "active"));

    // Bottom margin of -50px: 900 is not yet inside 0..750.
    sim.scroll_to(149.0);
    assert!(!sim.doc().has_class(&card, "active"));

    sim.scroll_to(200.0);
    assert!(sim.doc().has_class(&card, "active"));
    assert!(!sim.doc().has_class(&page.reveals[1], "active"));

    sim.scroll_to(0.0);
    assert!(sim.doc().has_class(&card, "active"));
    assert_eq!(sim.doc().observed(REVEAL_OBSERVER).len(), 2);
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

fn parse_shown(text: &str) -> f64 {
    text.trim_end_matches('+').parse().unwrap()
}

#[test]
fn counters_count_up_once() {
    let (mut sim, page) = mounted(&PageConfig::default());
    let first = page.counters[0];
    assert_eq!(sim.doc().text(first), "0");

    sim.scroll_to(1200.0);
    assert!(sim.doc().observed(COUNTER_OBSERVER).is_empty());

    sim.advance(ms(50));
    assert_eq!(sim.doc().text(first), "4+");
    assert_eq!(sim.doc().text(page.counters[1]), "1+");

    let mut last = 4.0;
    for _ in 0..45 {
        sim.advance(ms(50));
        let shown = parse_shown(sim.doc().text(first));
        assert!(shown >= last, "{shown} < {last}");
        last = shown;
    }
    assert_eq!(sim.doc().text(first), "150+");
    assert_eq!(sim.doc().text(page.counters[1]), "40+");
    assert_eq!(sim.doc().text(page.counters[2]), "7+");

    // Only the typewriter still has a timer.
    assert_eq!(sim.page().pending_timers(), 1);

    sim.scroll_to(0.0);
    sim.scroll_to(1200.0);
    sim.advance(ms(500));
    assert_eq!(sim.doc().text(first), "150+");
    assert_eq!(sim.page().pending_timers(), 1);
}

#[test]
fn zero_target_finishes_on_first_tick() {
    let mut doc = MemoryDocument::new(800.0, 600.0);
    let stat = doc.append_to_body(
        ElementSpec::new("span")
            .class("stat-number")
            .attr("data-count", "0")
            .text("0")
            .rect(0.0, 100.0, 100.0, 40.0),
    );
    let mut sim = Simulator::new(&PageConfig::default(), doc, MemoryStorage::new()).unwrap();
    sim.mount().unwrap();
    assert_eq!(sim.page().pending_timers(), 1);

    sim.advance(ms(50));
    assert_eq!(sim.doc().text(stat), "0+");
    assert_eq!(sim.page().pending_timers(), 0);
}

#[tracing_test::traced_test]
#[test]
fn invalid_counter_target_is_skipped() {
    let mut doc = MemoryDocument::new(800.0, 600.0);
    let stat = doc.append_to_body(
        ElementSpec::new("span")
            .class("stat-number")
            .attr("data-count", "lots")
            .text("0")
            .rect(0.0, 100.0, 100.0, 40.0),
    );
    let mut sim = Simulator::new(&PageConfig::default(), doc, MemoryStorage::new()).unwrap();
    sim.mount().unwrap();

    assert!(sim.doc().observed(COUNTER_OBSERVER).is_empty());
    assert_eq!(sim.page().pending_timers(), 0);
    sim.advance(ms(500));
    assert_eq!(sim.doc().text(stat), "0");
    assert!(logs_contain("counter target ignored"));
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

#[test]
fn particles_draw_dots_and_links_every_frame() {
    let (mut sim, page) = mounted(&PageConfig::default());
    let log = sim.doc().canvas_log(page.canvas).unwrap();
    assert_eq!((log.width, log.height), (1280.0, 800.0));
    assert_eq!(log.circles().count(), 80);

    let before = log.clears;
    sim.frames(3);
    let log = sim.doc().canvas_log(page.canvas).unwrap();
    assert_eq!(log.clears, before + 3);
    assert_eq!(log.circles().count(), 80);
    for op in &log.ops {
        match op {
            DrawOp::Circle { color, radius, .. } => {
                assert!(color.starts_with("rgba(0, 212, 255, "));
                assert!((0.5..=2.5).contains(radius));
            }
            DrawOp::Line { width, color, .. } => {
                assert_eq!(*width, 0.5);
                assert!(color.starts_with("rgba(0, 212, 255, "));
            }
        }
    }
    assert_eq!(sim.page().frame_idx(), 3);
}

#[test]
fn particles_are_deterministic_for_a_seed() {
    let mut config = PageConfig::default();
    config.particles.seed = Some(42);
    let (mut a, page) = mounted(&config);
    let (mut b, _) = mounted(&config);
    a.frames(5);
    b.frames(5);
    assert_eq!(a.doc().canvas_log(page.canvas), b.doc().canvas_log(page.canvas));
}

#[test]
fn canvas_follows_parent_on_resize() {
    let (mut sim, page) = mounted(&PageConfig::default());
    sim.page_mut()
        .doc_mut()
        .set_rect(page.hero, folio_core::viewport::Rect::new(0.0, 0.0, 600.0, 900.0));
    sim.resize(600.0, 900.0);
    let log = sim.doc().canvas_log(page.canvas).unwrap();
    assert_eq!((log.width, log.height), (600.0, 900.0));
}

// ---------------------------------------------------------------------------
// Smooth scroll
// ---------------------------------------------------------------------------

#[test]
fn anchor_click_scrolls_below_navbar() {
    let (mut sim, page) = mounted(&PageConfig::default());
    let d = sim.click(page.links[1]);
    assert!(d.default_prevented);
    assert_eq!(sim.doc().scroll_log().last(), Some(&(730.0, ScrollBehavior::Smooth)));
    assert_eq!(sim.doc().scroll_y(), 730.0);
    // The programmatic scroll fires a scroll event.
    assert!(sim.doc().has_class(&page.navbar, "scrolled"));
    assert_eq!(sim.doc().style(page.links[1], "color"), Some("#00d4ff"));

    sim.click(page.cta);
    assert_eq!(sim.doc().scroll_log().last(), Some(&(2230.0, ScrollBehavior::Smooth)));
    assert_eq!(sim.doc().scroll_y(), 2200.0);
    assert_eq!(sim.doc().style(page.links[3], "color"), Some("#00d4ff"));
}

#[test]
fn anchor_to_missing_target_is_a_noop() {
    let (mut doc, _) = sample_page();
    let dead = doc.append_to_body(ElementSpec::new("a").attr("href", "#nowhere"));
    let bare = doc.append_to_body(ElementSpec::new("a").attr("href", "#"));
    let mut sim = Simulator::new(&PageConfig::default(), doc, MemoryStorage::new()).unwrap();
    sim.mount().unwrap();

    assert!(sim.click(dead).default_prevented);
    assert!(sim.click(bare).default_prevented);
    assert!(sim.doc().scroll_log().is_empty());
    assert_eq!(sim.doc().scroll_y(), 0.0);
}

#[test]
fn tween_mode_scrolls_over_frames() {
    let mut config = PageConfig::default();
    config.smooth_scroll.mode = ScrollMode::Tween { duration_ms: 300 };
    let (mut sim, page) = mounted(&config);

    sim.click(page.links[1]);
    assert!(sim.doc().scroll_log().is_empty());

    let mut last = 0.0;
    for _ in 0..19 {
        sim.frame(ms(16));
        let y = sim.doc().scroll_y();
        assert!(y >= last);
        last = y;
    }
    assert_eq!(sim.doc().scroll_y(), 730.0);
    assert_eq!(sim.doc().scroll_log().last(), Some(&(730.0, ScrollBehavior::Instant)));

    let logged = sim.doc().scroll_log().len();
    sim.frames(5);
    assert_eq!(sim.doc().scroll_log().len(), logged);
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[test]
fn theme_defaults_dark_and_toggles() {
    let (mut sim, page) = mounted(&PageConfig::default());
    let root = sim.doc().root();
    assert_eq!(sim.doc().attribute(&root, "data-theme"), None);

    sim.click(page.theme_toggle);
    assert_eq!(sim.doc().attribute(&root, "data-theme").as_deref(), Some("light"));
    assert_eq!(sim.storage().get("theme").unwrap().as_deref(), Some("light"));

    sim.click(page.theme_toggle);
    assert_eq!(sim.doc().attribute(&root, "data-theme"), None);
    assert_eq!(sim.storage().get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn stored_light_theme_is_applied_at_startup() {
    let (doc, _) = sample_page();
    let storage = MemoryStorage::with_entries([("theme", "light")]);
    let mut sim = Simulator::new(&PageConfig::default(), doc, storage).unwrap();
    sim.mount().unwrap();
    let root = sim.doc().root();
    assert_eq!(sim.doc().attribute(&root, "data-theme").as_deref(), Some("light"));
}

#[test]
fn stored_theme_applies_without_toggle() {
    let storage = MemoryStorage::with_entries([("theme", "light")]);
    let mut sim =
        Simulator::new(&PageConfig::default(), MemoryDocument::new(800.0, 600.0), storage).unwrap();
    let report = sim.mount().unwrap();
    assert!(report.skipped.iter().any(|(name, _)| *name == "theme"));
    let root = sim.doc().root();
    assert_eq!(sim.doc().attribute(&root, "data-theme").as_deref(), Some("light"));
}

#[tracing_test::traced_test]
#[test]
fn theme_survives_unavailable_storage() {
    let (doc, handles) = sample_page();
    let mut page = Page::new(&PageConfig::default(), doc, Box::new(UnavailableStorage)).unwrap();
    page.mount().unwrap();
    assert!(page.is_active("theme"));

    page.dispatch(folio_web::PageEvent::Click(handles.theme_toggle));
    let root = page.doc().root();
    assert_eq!(page.doc().attribute(&root, "data-theme").as_deref(), Some("light"));
    assert!(logs_contain("theme preference not saved"));
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[test]
fn shutdown_stops_loops_and_observers() {
    let (mut sim, page) = mounted(&PageConfig::default());
    sim.advance(ms(1500));
    assert_eq!(sim.doc().text(page.typing), "I");

    sim.shutdown();
    assert_eq!(sim.page().pending_timers(), 0);
    assert!(!sim.page().wants_frames());
    assert!(sim.doc().observed(REVEAL_OBSERVER).is_empty());
    assert!(sim.doc().observed(COUNTER_OBSERVER).is_empty());

    sim.advance(Duration::from_secs(5));
    assert_eq!(sim.doc().text(page.typing), "I");
    let frames = sim.page().frame_idx();
    sim.frames(3);
    assert_eq!(sim.page().frame_idx(), frames);
}
