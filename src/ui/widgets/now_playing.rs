use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Padding, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    albumart::parse_frame,
    spotify::Track,
    ui::widgets::artwork::Artwork,
    util::{colors, text::truncate},
};

pub const FOOTER: &str = " Press q or Enter to quit ";
pub const EMPTY_TITLE: &str = "♫ Spotify";
pub const EMPTY_MESSAGE: &str = "No track";

const TEXT_WIDTH: u16 = 28;
const TEXT_PADDING: u16 = 2;
const MAX_TEXT: usize = 26;
const KEEP_TEXT: usize = 23;

/// The whole screen: the track card (or the empty card) with the footer
/// underneath, centred horizontally and vertically.
pub struct NowPlaying<'a> {
    track: Option<&'a Track>,
    artwork: &'a str,
}

impl<'a> NowPlaying<'a> {
    pub fn new(track: Option<&'a Track>, artwork: &'a str) -> Self {
        Self { track, artwork }
    }

    fn art_size(&self) -> (u16, u16) {
        let rows = parse_frame(self.artwork);
        let height = rows.len() as u16;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u16;
        (width, height)
    }

    fn card_size(&self) -> (u16, u16) {
        match self.track {
            Some(_) => {
                let (cols, rows) = self.art_size();
                // art frame + text column, double border, padding (1, 2)
                (cols + 2 + TEXT_WIDTH + 2 + 4, rows + 2 + 2 + 2)
            }
            None => {
                let content = EMPTY_TITLE.width().max(EMPTY_MESSAGE.width()) as u16;
                (content + 2 + 4, 3 + 2 + 2)
            }
        }
    }

    fn render_track(&self, track: &Track, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(Style::new().fg(colors::PRIMARY))
            .padding(Padding::new(2, 2, 1, 1));
        let inner = block.inner(area);
        block.render(area, buf);

        let (cols, _) = self.art_size();
        let [art_area, text_area] = Layout::horizontal([
            Constraint::Length(cols + 2),
            Constraint::Length(TEXT_WIDTH),
        ])
        .areas(inner);

        let art_frame = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(colors::NEUTRAL));
        let art_inner = art_frame.inner(art_area);
        art_frame.render(art_area, buf);
        Artwork::new(self.artwork).render(art_inner, buf);

        let lines = vec![
            Line::from(truncate(&track.name, MAX_TEXT, KEEP_TEXT))
                .fg(colors::FOREGROUND)
                .bold(),
            Line::from(truncate(&track.artist, MAX_TEXT, KEEP_TEXT)).fg(colors::SECONDARY),
            Line::from(truncate(&track.album, MAX_TEXT, KEEP_TEXT))
                .fg(colors::NEUTRAL)
                .italic(),
        ];
        let text_height = (lines.len() as u16).min(text_area.height);
        let text_area = Rect {
            y: text_area.y + (text_area.height - text_height) / 2,
            height: text_height,
            ..text_area
        };
        Paragraph::new(lines)
            .block(Block::new().padding(Padding::left(TEXT_PADDING)))
            .render(text_area, buf);
    }

    fn render_empty(area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(colors::NEUTRAL))
            .padding(Padding::new(2, 2, 1, 1));

        let lines = vec![
            Line::from(EMPTY_TITLE).fg(colors::PRIMARY).bold(),
            Line::default(),
            Line::from(EMPTY_MESSAGE).fg(colors::SECONDARY),
        ];
        Paragraph::new(lines)
            .centered()
            .block(block)
            .render(area, buf);
    }
}

impl Widget for NowPlaying<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (card_width, card_height) = self.card_size();
        let footer_width = FOOTER.width() as u16;
        let content_height = card_height + 1;

        let top = area.y + area.height.saturating_sub(content_height) / 2;
        let centred = |width: u16, y: u16, height: u16| {
            Rect::new(
                area.x + area.width.saturating_sub(width) / 2,
                y,
                width,
                height,
            )
            .intersection(area)
        };

        let card = centred(card_width, top, card_height);
        match self.track {
            Some(track) => self.render_track(track, card, buf),
            None => Self::render_empty(card, buf),
        }

        let footer = centred(footer_width, top.saturating_add(card_height), 1);
        Line::from(FOOTER).fg(colors::NEUTRAL).render(footer, buf);
    }
}
