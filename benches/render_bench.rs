use criterion::{black_box, Criterion};
use std::time::Instant;
use textshot::font::FontSource;
use textshot::rendering::{render_text_png, TextStyle};
use textshot::wrap::wrap_text_infallible;

// Run with: cargo bench

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation \
ullamco laboris nisi ut aliquip ex ea commodo consequat.\n\nDuis aute irure dolor in reprehenderit.";

/// Bench: wrapping with a fixed-width measure (no font involved)
fn bench_wrap_fixed(c: &mut Criterion) {
    c.bench_function("wrap_text_fixed_width", |b| {
        b.iter(|| wrap_text_infallible(black_box(LOREM), 400, |s| s.len() as u32 * 9))
    });
}

/// Bench: wrapping with real glyph measurement
fn bench_wrap_font(c: &mut Criterion) {
    let Ok(font) = FontSource::default().resolve() else {
        println!("[wrap_text_font] no font available; skipping");
        return;
    };
    let sized = font.sized(72.0);
    c.bench_function("wrap_text_font", |b| {
        b.iter(|| wrap_text_infallible(black_box(LOREM), 1520, |s| sized.measure(s)))
    });
}

/// Bench: full pipeline at the default 800x1000 size, printing percentiles
fn bench_render_percentiles() {
    let Ok(font) = FontSource::default().resolve() else {
        println!("[render_percentiles] no font available; skipping");
        return;
    };
    let style = TextStyle::default();

    let mut samples = Vec::with_capacity(20);
    for _ in 0..20 {
        let t0 = Instant::now();
        render_text_png(&font, LOREM, &style).expect("render failed");
        samples.push(t0.elapsed().as_millis() as u64);
    }

    samples.sort_unstable();
    println!(
        "[render_percentiles] p50={}ms p95={}ms max={}ms",
        percentile(&samples, 50.0),
        percentile(&samples, 95.0),
        samples.last().copied().unwrap_or(0)
    );
}

fn percentile(samples: &[u64], pct: f64) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let n = samples.len();
    let rank = ((pct / 100.0) * (n as f64)).ceil() as usize;
    samples[rank.saturating_sub(1).min(n - 1)]
}

fn main() {
    let mut c = Criterion::default();

    bench_wrap_fixed(&mut c);
    bench_wrap_font(&mut c);

    c.final_summary();

    bench_render_percentiles();
}
