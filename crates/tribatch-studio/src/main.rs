use anyhow::Result;
use tribatch_engine::device::{Device, RecordingDevice, WgpuDevice, WgpuDeviceInit};
use tribatch_engine::logging::{init_logging, LoggingConfig};
use tribatch_engine::paint::Color;
use tribatch_engine::render::{BatchRenderer, RendererConfig, Vertex};

const FRAMES: u32 = 3;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RendererConfig::default();

    match WgpuDevice::new_blocking(WgpuDeviceInit::default()) {
        Ok(device) => {
            log::info!("rendering on {}", device.adapter_name());
            let mut renderer = BatchRenderer::new(device, config)?;
            run(&mut renderer)?;
            log::info!("gpu frames completed: {}", renderer.device().frames_completed());
        }
        Err(err) => {
            log::warn!("no GPU available ({err:#}); dry run with a recording device");
            let mut renderer = BatchRenderer::new(RecordingDevice::new(), config)?;
            run(&mut renderer)?;
            log::info!("recorded {} draw calls", renderer.device().draw_count());
        }
    }

    Ok(())
}

fn run<D: Device>(renderer: &mut BatchRenderer<D>) -> Result<()> {
    for frame in 0..FRAMES {
        let shade = (frame * 40) as u8;
        renderer.set_clear_color(Color::rgb(shade, shade / 2, 32));

        renderer.begin_frame()?;
        draw_grid(renderer, frame)?;
        draw_fan(renderer)?;
        renderer.end_frame()?;

        let stats = renderer.stats();
        log::info!(
            "frame {frame}: {} draw calls, {} vertices ({} auto flushes)",
            stats.draw_calls,
            stats.vertices_submitted,
            stats.auto_flushes
        );
    }
    Ok(())
}

/// 40x24 cells of 10x10 px: 960 rects, more than one buffer's worth.
fn draw_grid<D: Device>(renderer: &mut BatchRenderer<D>, frame: u32) -> Result<()> {
    for row in 0..24u32 {
        for col in 0..40u32 {
            let r = (col * 6) as u8;
            let g = (row * 10) as u8;
            let b = ((col + row + frame * 7) % 2 * 255) as u8;
            renderer.rect(
                col as f32 * 10.0 + 1.0,
                row as f32 * 10.0 + 1.0,
                8.0,
                8.0,
                Color::rgb(r, g, b),
            )?;
        }
    }
    Ok(())
}

/// Hexagon around the target center, pushed as shared vertices plus indices.
fn draw_fan<D: Device>(renderer: &mut BatchRenderer<D>) -> Result<()> {
    let (cx, cy, radius) = (200.0f32, 120.0f32, 60.0f32);

    let mut vertices = vec![Vertex::from_xy(cx, cy, Color::WHITE)];
    for i in 0..6 {
        let angle = i as f32 * std::f32::consts::TAU / 6.0;
        vertices.push(Vertex::from_xy(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
            Color::new(255, 160, 0, 200),
        ));
    }

    let indices: Vec<u32> = (1..=6u32).flat_map(|i| [0, i, i % 6 + 1]).collect();
    renderer.push_indexed(&vertices, &indices)?;
    Ok(())
}
