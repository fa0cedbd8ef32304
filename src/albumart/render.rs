//! Half-block encoding of images into 24-bit ANSI strings.
//!
//! Every terminal cell prints `▀` with the foreground set to the upper pixel
//! and the background set to the lower one, so a frame of `rows` lines holds
//! `2 * rows` pixel rows.

use std::fmt::Write;

use image::{DynamicImage, RgbaImage, imageops::FilterType};

pub const HALF_BLOCK: char = '▀';
pub const RESET: &str = "\x1b[0m";

pub type Rgb = [u8; 3];

pub const PLACEHOLDER_TOP: Rgb = [60, 60, 60];
pub const PLACEHOLDER_BOTTOM: Rgb = [40, 40, 40];

/// Uniform dim-gray frame used when there is no artwork to show.
pub fn render_placeholder(cols: u16, rows: u16) -> String {
    encode_rows(cols, rows, |_, _| (PLACEHOLDER_TOP, PLACEHOLDER_BOTTOM))
}

/// Resamples `img` to `cols x 2*rows` pixels and encodes it.
pub fn render_image(img: &DynamicImage, cols: u16, rows: u16) -> String {
    // No cells to sample, only the line layout.
    if cols == 0 || rows == 0 {
        return render_placeholder(cols, rows);
    }

    let pixel_rows = u32::from(rows) * 2;
    let resized = resize(img, u32::from(cols), pixel_rows);

    encode_rows(cols, rows, |x, y| {
        let top = pixel(&resized, u32::from(x), u32::from(y) * 2);
        let bottom_y = u32::from(y) * 2 + 1;
        let bottom = if bottom_y < resized.height() {
            pixel(&resized, u32::from(x), bottom_y)
        } else {
            top
        };
        (top, bottom)
    })
}

/// Catmull-Rom resample composited over a transparent canvas.
fn resize(img: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let mut resized = image::imageops::resize(&img.to_rgba8(), width, height, FilterType::CatmullRom);
    for p in resized.pixels_mut() {
        let [r, g, b, a] = p.0;
        p.0 = [premultiply(r, a), premultiply(g, a), premultiply(b, a), a];
    }
    resized
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

fn pixel(img: &RgbaImage, x: u32, y: u32) -> Rgb {
    let [r, g, b, _] = img.get_pixel(x, y).0;
    [r, g, b]
}

fn encode_rows(cols: u16, rows: u16, mut cell: impl FnMut(u16, u16) -> (Rgb, Rgb)) -> String {
    // Each cell is at most 41 bytes of escapes plus the 3-byte block.
    let mut out = String::with_capacity(usize::from(cols) * usize::from(rows) * 44);

    for y in 0..rows {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..cols {
            let (top, bottom) = cell(x, y);
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{HALF_BLOCK}",
                top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]
            );
        }
        out.push_str(RESET);
    }

    out
}

/// Decodes a frame produced by this module back into per-cell colors.
///
/// Each returned row holds `(top, bottom)` pairs. Cells that don't follow
/// the expected escape layout are skipped.
pub fn parse_frame(frame: &str) -> Vec<Vec<(Rgb, Rgb)>> {
    frame
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split(HALF_BLOCK)
                .filter_map(|cell| {
                    let rest = cell.strip_prefix("\x1b[38;2;")?;
                    let (top, rest) = parse_rgb(rest)?;
                    let rest = rest.strip_prefix("\x1b[48;2;")?;
                    let (bottom, _) = parse_rgb(rest)?;
                    Some((top, bottom))
                })
                .collect()
        })
        .collect()
}

fn parse_rgb(s: &str) -> Option<(Rgb, &str)> {
    let (params, rest) = s.split_once('m')?;
    let mut parts = params.split(';').map(str::parse::<u8>);
    let rgb = [parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?];
    parts.next().is_none().then_some((rgb, rest))
}
