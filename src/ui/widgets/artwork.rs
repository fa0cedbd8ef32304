use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::albumart::{parse_frame, render::HALF_BLOCK};

/// Paints a half-block frame into the buffer, clipped to `area`.
pub struct Artwork<'a> {
    frame: &'a str,
}

impl<'a> Artwork<'a> {
    pub fn new(frame: &'a str) -> Self {
        Self { frame }
    }
}

impl Widget for Artwork<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut symbol = [0; 4];
        let symbol = HALF_BLOCK.encode_utf8(&mut symbol);

        for (dy, row) in parse_frame(self.frame).into_iter().enumerate() {
            let Ok(dy) = u16::try_from(dy) else { break };
            if dy >= area.height {
                break;
            }
            for (dx, ([tr, tg, tb], [br, bg, bb])) in row.into_iter().enumerate() {
                let Ok(dx) = u16::try_from(dx) else { break };
                if dx >= area.width {
                    break;
                }
                if let Some(cell) = buf.cell_mut((area.x + dx, area.y + dy)) {
                    cell.set_symbol(symbol)
                        .set_fg(Color::Rgb(tr, tg, tb))
                        .set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}
