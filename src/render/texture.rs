use std::path::Path;

use image::RgbaImage;
use vello::wgpu;

use crate::{
  Error, Plot, Result,
  render::{GpuHandle, Render, RenderConfig},
};

pub fn render(plot: &Plot, config: RenderConfig, path: &Path) -> Result<()> {
  let handle = GpuHandle::new(&config, None)?;

  let mut render = Render::new();
  plot.draw(&mut render, config.size());

  let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())
    .map_err(|e| Error::Gpu(format!("failed to create renderer: {e}")))?;
  renderer
    .render_to_texture(
      &handle.device,
      &handle.queue,
      &render.scene,
      &handle.view,
      &config.params(render.background),
    )
    .map_err(|e| Error::Gpu(format!("failed to render to a texture: {e}")))?;

  let pixels = read_texture(&handle, config)?;
  let image = RgbaImage::from_raw(config.width, config.height, pixels)
    .ok_or_else(|| Error::Gpu("texture readback has the wrong size".to_string()))?;
  image.save(path)?;

  log::info!("wrote {}x{} chart to {}", config.width, config.height, path.display());
  Ok(())
}

/// Copies the render texture back into tightly packed RGBA rows.
fn read_texture(handle: &GpuHandle, config: RenderConfig) -> Result<Vec<u8>> {
  let row_bytes = 4 * config.width;
  let padded_row_bytes = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded_row_bytes) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded_row_bytes),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let slice = buffer.slice(..);
  let (sender, receiver) = std::sync::mpsc::channel();
  slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = sender.send(result);
  });

  handle
    .device
    .poll(wgpu::PollType::Wait)
    .map_err(|e| Error::Gpu(format!("failed to wait for the device: {e}")))?;
  receiver
    .recv()
    .map_err(|e| Error::Gpu(e.to_string()))?
    .map_err(|e| Error::Gpu(format!("failed to map output buffer: {e}")))?;

  let data = slice.get_mapped_range();
  let mut pixels = Vec::with_capacity((row_bytes * config.height) as usize);
  for row in data.chunks_exact(padded_row_bytes as usize) {
    pixels.extend_from_slice(&row[..row_bytes as usize]);
  }
  drop(data);
  buffer.unmap();

  Ok(pixels)
}
