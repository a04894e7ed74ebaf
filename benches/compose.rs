use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use scan_grid::compositor::{Compositor, LabeledFrame, Panel};
use scan_grid::models::{Frame, Symbol};
use scan_grid::{FramePipeline, PipelineConfig, SymbolDecoder, TextRenderer};
use std::sync::Arc;

struct NeverDecoder;

impl SymbolDecoder for NeverDecoder {
    fn decode(&self, _frame: &Frame) -> Vec<Symbol> {
        Vec::new()
    }
}

fn camera_frame() -> Frame {
    Frame::Rgb(RgbImage::from_fn(640, 480, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn renderer() -> Arc<TextRenderer> {
    match TextRenderer::bundled() {
        Ok(text) => Arc::new(text),
        Err(err) => panic!("bundled font rejected: {}", err),
    }
}

fn bench_compose(c: &mut Criterion) {
    let compositor = Compositor::new(&PipelineConfig::default(), renderer());
    let frames: Vec<LabeledFrame> = Panel::ALL
        .iter()
        .map(|panel| LabeledFrame::unburned(camera_frame(), panel.caption()))
        .collect();

    c.bench_function("compose_7x640x480", |b| {
        b.iter(|| compositor.compose(black_box(&frames)))
    });
}

fn bench_full_tick(c: &mut Criterion) {
    let pipeline = match FramePipeline::with_text_renderer(
        &PipelineConfig::default(),
        NeverDecoder,
        renderer(),
    ) {
        Ok(pipeline) => pipeline,
        Err(err) => panic!("default config rejected: {}", err),
    };
    let frame = camera_frame();

    c.bench_function("tick_640x480_no_decode", |b| {
        b.iter(|| pipeline.process(black_box(&frame)))
    });
}

criterion_group!(benches, bench_compose, bench_full_tick);
criterion_main!(benches);
