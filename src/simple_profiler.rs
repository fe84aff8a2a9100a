//! Simple profiling guards using thread-local storage
//!
//! This module provides lightweight profiling without changing function signatures.
//! Enable with environment variable: DEEPBOX_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Categories tracked by the profiler, in report order
pub const CATEGORIES: [&str; 6] = [
    "graph_build",
    "classify",
    "canonical",
    "leaf_eval",
    "alpha_beta",
    "rollout",
];

thread_local! {
    static LOCAL_TIME: RefCell<[u64; 6]> = RefCell::new([0; 6]);
    static LOCAL_COUNT: RefCell<[usize; 6]> = RefCell::new([0; 6]);
    static ALPHA_BETA_CUTOFFS: RefCell<usize> = RefCell::new(0);
}

// Global aggregators
static GLOBAL_TIME: [AtomicU64; 6] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_COUNT: [AtomicUsize; 6] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];
static GLOBAL_ALPHA_BETA_CUTOFFS: AtomicUsize = AtomicUsize::new(0);

static ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("DEEPBOX_PROFILE").is_ok())
}

fn category_index(category: &str) -> Option<usize> {
    CATEGORIES.iter().position(|&c| c == category)
}

pub struct ProfileGuard {
    start: Instant,
    index: usize,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }
        category_index(category).map(|index| ProfileGuard {
            start: Instant::now(),
            index,
        })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let index = self.index;

        LOCAL_TIME.with(|t| t.borrow_mut()[index] += elapsed_ns);
        LOCAL_COUNT.with(|c| c.borrow_mut()[index] += 1);
    }
}

#[inline]
pub fn record_alpha_beta_cutoff() {
    if is_profiling_enabled() {
        ALPHA_BETA_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

/// Folds this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        let mut t = t.borrow_mut();
        for (i, slot) in t.iter_mut().enumerate() {
            GLOBAL_TIME[i].fetch_add(*slot, Ordering::Relaxed);
            *slot = 0;
        }
    });
    LOCAL_COUNT.with(|c| {
        let mut c = c.borrow_mut();
        for (i, slot) in c.iter_mut().enumerate() {
            GLOBAL_COUNT[i].fetch_add(*slot, Ordering::Relaxed);
            *slot = 0;
        }
    });
    ALPHA_BETA_CUTOFFS.with(|c| {
        GLOBAL_ALPHA_BETA_CUTOFFS.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for (i, name) in CATEGORIES.iter().enumerate() {
        let time = GLOBAL_TIME[i].load(Ordering::Relaxed);
        let count = GLOBAL_COUNT[i].load(Ordering::Relaxed);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!("{:<12} {:>10.2}ms ({:>5.1}%) - {} calls, {:.2}µs avg",
            name, ms, pct, count, avg_us);
    }

    eprintln!("\nAlpha-Beta Cutoffs: {}",
        GLOBAL_ALPHA_BETA_CUTOFFS.load(Ordering::Relaxed));
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for i in 0..CATEGORIES.len() {
        GLOBAL_TIME[i].store(0, Ordering::Relaxed);
        GLOBAL_COUNT[i].store(0, Ordering::Relaxed);
    }
    GLOBAL_ALPHA_BETA_CUTOFFS.store(0, Ordering::Relaxed);
}
