use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x001db954);
pub const NEUTRAL: Color = Color::from_u32(0x00535353);
pub const SECONDARY: Color = Color::from_u32(0x00b3b3b3);
pub const FOREGROUND: Color = Color::from_u32(0x00ffffff);
