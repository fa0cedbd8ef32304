//! Serialises a ratatui [`Buffer`] into a plain ANSI string, for transports
//! that take whole frames instead of driving a terminal backend.

use std::fmt::Write;

use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier},
};
use unicode_width::UnicodeWidthStr;

use crate::albumart::render::RESET;

/// One line per buffer row, joined with `\n`, each ending in a reset.
pub fn buffer_to_ansi(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::with_capacity(usize::from(area.width) * usize::from(area.height) * 4);

    for y in area.top()..area.bottom() {
        if y > area.top() {
            out.push('\n');
        }

        let mut style = (Color::Reset, Color::Reset, Modifier::empty());
        let mut skip = 0;
        for x in area.left()..area.right() {
            if skip > 0 {
                skip -= 1;
                continue;
            }

            let cell = &buf[(x, y)];
            let cell_style = (cell.fg, cell.bg, cell.modifier);
            if cell_style != style {
                out.push_str(RESET);
                push_modifiers(&mut out, cell.modifier);
                push_color(&mut out, cell.fg, 38);
                push_color(&mut out, cell.bg, 48);
                style = cell_style;
            }

            let symbol = cell.symbol();
            out.push_str(symbol);
            skip = symbol.width().saturating_sub(1);
        }

        out.push_str(RESET);
    }

    out
}

fn push_modifiers(out: &mut String, modifier: Modifier) {
    for (flag, code) in [
        (Modifier::BOLD, 1),
        (Modifier::DIM, 2),
        (Modifier::ITALIC, 3),
        (Modifier::UNDERLINED, 4),
        (Modifier::REVERSED, 7),
    ] {
        if modifier.contains(flag) {
            let _ = write!(out, "\x1b[{code}m");
        }
    }
}

fn push_color(out: &mut String, color: Color, base: u8) {
    let index = match color {
        Color::Reset => return,
        Color::Rgb(r, g, b) => {
            let _ = write!(out, "\x1b[{base};2;{r};{g};{b}m");
            return;
        }
        Color::Indexed(i) => i,
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        Color::White => 15,
    };
    let _ = write!(out, "\x1b[{base};5;{index}m");
}
