use std::time::{Duration, Instant};

use blockfall::term::RenderThrottle;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn render_throttle_renders_first_frame() {
    let mut t = RenderThrottle::new(ms(16));
    assert!(t.should_render(Instant::now()));
}

#[test]
fn render_throttle_skips_frames_inside_interval() {
    let t0 = Instant::now();
    let mut t = RenderThrottle::new(ms(16));
    assert!(t.should_render(t0));
    assert!(!t.should_render(t0 + ms(1)));
    assert!(!t.should_render(t0 + ms(15)));
    assert!(t.should_render(t0 + ms(16)));
    // Measured from the last rendered frame.
    assert!(!t.should_render(t0 + ms(31)));
    assert!(t.should_render(t0 + ms(32)));
}

#[test]
fn render_throttle_invalidate_forces_next_frame() {
    let t0 = Instant::now();
    let mut t = RenderThrottle::new(ms(250));
    assert!(t.should_render(t0));
    t.invalidate();
    assert!(t.should_render(t0 + ms(1)));
    assert!(!t.should_render(t0 + ms(2)));
}
