use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use byteorder::{LittleEndian, WriteBytesExt};
use crate::core::common::{Float, clamp, gamma_correct};

/// Writes a row-major linear RGB image. The format follows the extension:
/// png, bmp and tga are gamma corrected to 8 bits, pfm stays linear.
pub fn write_image<P: AsRef<Path>>(name: P, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    let ext = name.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("Failed to get filename extension \"{}\"", name.as_ref().display()))?;

    if rgb.len() != 3 * width * height {
        return Err(anyhow!(
            "Image \"{}\" has {} values, expected {}",
            name.as_ref().display(), rgb.len(), 3 * width * height));
    }

    match ext.to_ascii_lowercase().as_str() {
        "png" | "bmp" | "tga" => write_image_8bit(name, rgb, width, height),
        "pfm" => write_image_pfm(name, rgb, width, height),
        _ => Err(anyhow!("Unsupported file format \"{}\"", ext))
    }
}

fn write_image_8bit<P: AsRef<Path>>(name: P, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    let buf = rgb.iter().map(|v| clamp(
        255.0 * gamma_correct(*v) + 0.5, 0.0, 255.0) as u8
    ).collect::<Vec<_>>();

    image::save_buffer(
        name.as_ref(),
        &buf,
        width as u32,
        height as u32,
        image::ColorType::Rgb8
    )
        .with_context(|| format!("Error writing image \"{}\"", name.as_ref().display()))
}

fn write_image_pfm<P: AsRef<Path>>(name: P, rgb: &[Float], width: usize, height: usize) -> Result<()> {
    let mut f = File::create(name.as_ref())
        .with_context(|| format!("Unable to open output PFM file \"{}\"", name.as_ref().display()))?;

    let mut buf = Vec::with_capacity(32 + 12 * width * height);
    buf.extend_from_slice(format!("PF\n{} {}\n-1\n", width, height).as_bytes());

    // rows run bottom to top
    for row in rgb.chunks(3 * width).rev() {
        for v in row {
            buf.write_f32::<LittleEndian>(*v)?;
        }
    }

    f.write_all(&buf).with_context(||
        format!("Error writing PFM file \"{}\"", name.as_ref().display()))
}
