use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::time::{Duration, Instant};

use blockfall::config::EngineConfig;
use blockfall::core::{GameSnapshot, GameState};
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::{GameAction, PieceKind};

struct CountingAlloc;

// Per thread, so tests running in parallel don't count each other.
thread_local! {
    static COUNT_ENABLED: Cell<bool> = const { Cell::new(false) };
    static ALLOC_COUNT: Cell<usize> = const { Cell::new(0) };
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn count_alloc() {
    let _ = COUNT_ENABLED.try_with(|enabled| {
        if enabled.get() {
            ALLOC_COUNT.with(|count| count.set(count.get() + 1));
        }
    });
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        count_alloc();
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        count_alloc();
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.with(|count| count.set(0));
    COUNT_ENABLED.with(|enabled| enabled.set(true));
    f();
    COUNT_ENABLED.with(|enabled| enabled.set(false));
    ALLOC_COUNT.with(Cell::get)
}

#[test]
fn frame_loop_does_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let t0 = Instant::now();
    let mut gs = GameState::with_seed(EngineConfig::default(), 1, t0);
    let view = GameView::default();
    let vp = Viewport::new(80, 30);
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(vp.width, vp.height);

    // Warm-up.
    gs.snapshot_into(t0, &mut snap);
    view.render_into(&snap, vp, &mut fb);
    let _ = gs.tick(t0, Some(GameAction::HardDrop));

    let mut now = t0;
    let allocs = with_alloc_counting(|| {
        for frame in 0..300u32 {
            now += Duration::from_millis(16);
            let action = match frame % 6 {
                0 => Some(GameAction::MoveLeft),
                2 => Some(GameAction::Rotate),
                4 => Some(GameAction::MoveRight),
                _ => None,
            };
            let _ = gs.tick(now, action);
            gs.snapshot_into(now, &mut snap);
            view.render_into(&snap, vp, &mut fb);
        }

        // Locking without a line clear and spawning the next piece.
        for _ in 0..5 {
            if gs.game_over() {
                break;
            }
            let _ = gs.tick(now, Some(GameAction::HardDrop));
            gs.snapshot_into(now, &mut snap);
            view.render_into(&snap, vp, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}

#[test]
fn line_clearing_lock_does_not_allocate() {
    // On a 4-wide board a horizontal I fills its whole landing row.
    let t0 = Instant::now();
    let config = EngineConfig {
        board_width: 4,
        board_height: 40,
        ..EngineConfig::default()
    };
    let mut gs = GameState::with_seed(config, 11, t0);
    let view = GameView::default();
    let vp = Viewport::new(80, 44);
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(vp.width, vp.height);

    gs.snapshot_into(t0, &mut snap);
    view.render_into(&snap, vp, &mut fb);

    let allocs = with_alloc_counting(|| {
        for _ in 0..14 {
            if gs.lines() > 0 || gs.game_over() {
                break;
            }
            if gs.active().kind == PieceKind::I {
                let _ = gs.tick(t0, Some(GameAction::Rotate));
            }
            let _ = gs.tick(t0, Some(GameAction::HardDrop));
            gs.snapshot_into(t0, &mut snap);
            view.render_into(&snap, vp, &mut fb);
        }
    });

    assert!(gs.lines() > 0, "no line was cleared");
    assert!(!snap.flashing_rows.is_empty());
    assert_eq!(allocs, 0);
}
