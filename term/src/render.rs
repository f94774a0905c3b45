//! Board drawing on a raw terminal.
//!
//! The renderer keeps the last screen it drew and only queues cursor moves and prints
//! for the cells that changed. A backdrop change repaints everything.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use kioku_core::{
    Backdrop, CellContent, Color, Coord, Coord2, Hud, Icon, Renderer, Shape, in_bounds,
};

pub const HELP: &str = "click or arrows+enter: flip   h: hint   r: restart   q: quit";

const COVERED: &str = "..";
const TEXT: style::Color = rgb(255, 255, 255);
const HIGHLIGHT: style::Color = rgb(0, 0, 255);

/// Where each tile sits on the terminal, shared by drawing and mouse hit-testing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    size: Coord2,
}

impl BoardLayout {
    const LEFT: u16 = 4;
    const TOP: u16 = 2;
    const CELL_WIDTH: u16 = 4;
    const CELL_HEIGHT: u16 = 2;

    pub fn new(size: Coord2) -> Self {
        Self { size }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    /// Top-left terminal position of a tile, including its highlight brackets.
    pub fn cell_origin(&self, (x, y): Coord2) -> (u16, u16) {
        (
            Self::LEFT + u16::from(x) * Self::CELL_WIDTH,
            Self::TOP + u16::from(y) * Self::CELL_HEIGHT,
        )
    }

    /// Tile under a terminal position. The blank rows between tiles hit nothing.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Coord2> {
        let dx = column.checked_sub(Self::LEFT)?;
        let dy = row.checked_sub(Self::TOP)?;
        if dy % Self::CELL_HEIGHT != 0 {
            return None;
        }
        let coords = (
            Coord::try_from(dx / Self::CELL_WIDTH).ok()?,
            Coord::try_from(dy / Self::CELL_HEIGHT).ok()?,
        );
        in_bounds(coords, self.size).then_some(coords)
    }

    pub fn hud_row(&self) -> u16 {
        Self::TOP + u16::from(self.size.1) * Self::CELL_HEIGHT
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Drawn {
    content: CellContent,
    highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Screen {
    backdrop: Backdrop,
    cells: BTreeMap<Coord2, Drawn>,
    hud: Hud,
}

pub struct TerminalRenderer<W> {
    out: W,
    layout: BoardLayout,
    cells: BTreeMap<Coord2, CellContent>,
    highlights: BTreeSet<Coord2>,
    hud: Hud,
    backdrop: Backdrop,
    message: String,
    last: Option<Screen>,
    error: Option<io::Error>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(layout: BoardLayout) -> Self {
        Self::new(io::stdout(), layout)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, layout: BoardLayout) -> Self {
        Self {
            out,
            layout,
            cells: BTreeMap::new(),
            highlights: BTreeSet::new(),
            hud: Hud::default(),
            backdrop: Backdrop::Normal,
            message: String::new(),
            last: None,
            error: None,
        }
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.out
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(EnableMouseCapture)?;
        self.out.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        self.out
            .queue(ResetColor)?
            .queue(DisableMouseCapture)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }

    /// Force the next frame to be a full redraw, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Surfaces the first write error since the last call.
    pub fn take_error(&mut self) -> io::Result<()> {
        self.error.take().map_or(Ok(()), Err)
    }

    /// Shows a line under the board until the next message replaces it.
    pub fn message(&mut self, text: &str) {
        self.message.clear();
        self.message.push_str(text);
        let backdrop = self.backdrop;
        let result = self.queue_message(backdrop).and_then(|()| self.out.flush());
        self.record(result);
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    fn draw(&mut self, next: &Screen) -> io::Result<()> {
        match self.last.take() {
            Some(prev) if prev == *next => return Ok(()),
            Some(prev) if prev.backdrop == next.backdrop => {
                for (&coords, &drawn) in &next.cells {
                    if prev.cells.get(&coords) != Some(&drawn) {
                        self.queue_cell(coords, drawn, next.backdrop)?;
                    }
                }
                if prev.hud != next.hud {
                    self.queue_hud(next.hud, next.backdrop)?;
                }
            }
            _ => self.queue_full(next)?,
        }
        self.out.queue(ResetColor)?;
        self.out.flush()
    }

    fn queue_full(&mut self, next: &Screen) -> io::Result<()> {
        self.out
            .queue(SetBackgroundColor(backdrop_color(next.backdrop)))?
            .queue(terminal::Clear(terminal::ClearType::All))?
            .queue(SetForegroundColor(TEXT))?
            .queue(cursor::MoveTo(0, 0))?
            .queue(Print("kioku"))?;

        let (width, height) = self.layout.size();
        for x in 0..width {
            let (column, _) = self.layout.cell_origin((x, 0));
            self.out
                .queue(cursor::MoveTo(column, BoardLayout::TOP - 1))?
                .queue(Print(format!("{x:^4}")))?;
        }
        for y in 0..height {
            let (_, row) = self.layout.cell_origin((0, y));
            self.out
                .queue(cursor::MoveTo(0, row))?
                .queue(Print(format!("{y:>2}")))?;
        }

        for (&coords, &drawn) in &next.cells {
            self.queue_cell(coords, drawn, next.backdrop)?;
        }
        self.queue_hud(next.hud, next.backdrop)?;
        self.out
            .queue(cursor::MoveTo(0, self.layout.hud_row() + 1))?
            .queue(SetForegroundColor(TEXT))?
            .queue(Print(HELP))?;
        self.queue_message(next.backdrop)
    }

    fn queue_cell(&mut self, coords: Coord2, drawn: Drawn, backdrop: Backdrop) -> io::Result<()> {
        let (column, row) = self.layout.cell_origin(coords);
        let (left, right) = if drawn.highlighted {
            ('[', ']')
        } else {
            (' ', ' ')
        };
        self.out
            .queue(cursor::MoveTo(column, row))?
            .queue(SetBackgroundColor(backdrop_color(backdrop)))?
            .queue(SetForegroundColor(HIGHLIGHT))?
            .queue(Print(left))?
            .queue(SetForegroundColor(content_color(drawn.content)))?
            .queue(Print(cell_glyph(drawn.content)))?
            .queue(SetForegroundColor(HIGHLIGHT))?
            .queue(Print(right))?;
        Ok(())
    }

    fn queue_hud(&mut self, hud: Hud, backdrop: Backdrop) -> io::Result<()> {
        self.out
            .queue(cursor::MoveTo(0, self.layout.hud_row()))?
            .queue(SetBackgroundColor(backdrop_color(backdrop)))?
            .queue(SetForegroundColor(TEXT))?
            .queue(Print(hud_line(hud)))?
            .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        Ok(())
    }

    fn queue_message(&mut self, backdrop: Backdrop) -> io::Result<()> {
        self.out
            .queue(cursor::MoveTo(0, self.layout.hud_row() + 2))?
            .queue(SetBackgroundColor(backdrop_color(backdrop)))?
            .queue(SetForegroundColor(TEXT))?
            .queue(Print(&self.message))?
            .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_frame(&mut self, backdrop: Backdrop) {
        self.cells.clear();
        self.highlights.clear();
        self.backdrop = backdrop;
    }

    fn draw_cell(&mut self, coords: Coord2, content: CellContent) {
        self.cells.insert(coords, content);
    }

    fn draw_highlight(&mut self, coords: Coord2) {
        self.highlights.insert(coords);
    }

    fn draw_score_hud(&mut self, hud: Hud) {
        self.hud = hud;
    }

    fn end_frame(&mut self) {
        let cells = self
            .cells
            .iter()
            .map(|(&coords, &content)| {
                let highlighted = self.highlights.contains(&coords);
                (coords, Drawn { content, highlighted })
            })
            .collect();
        let next = Screen {
            backdrop: self.backdrop,
            cells,
            hud: self.hud,
        };
        match self.draw(&next) {
            Ok(()) => self.last = Some(next),
            Err(err) => {
                self.record(Err(err));
                self.last = None;
            }
        }
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> style::Color {
    style::Color::Rgb { r, g, b }
}

fn backdrop_color(backdrop: Backdrop) -> style::Color {
    match backdrop {
        Backdrop::Normal => rgb(60, 60, 100),
        Backdrop::Flash => rgb(100, 100, 100),
    }
}

fn content_color(content: CellContent) -> style::Color {
    match content {
        CellContent::Covered => TEXT,
        CellContent::Icon(icon) | CellContent::Sliding { icon, .. } => icon_color(icon.color),
    }
}

fn icon_color(color: Color) -> style::Color {
    match color {
        Color::Red => rgb(255, 0, 0),
        Color::Green => rgb(0, 255, 0),
        Color::Blue => rgb(0, 0, 255),
        Color::Yellow => rgb(255, 255, 0),
        Color::Orange => rgb(255, 128, 0),
        Color::Purple => rgb(255, 0, 255),
        Color::Cyan => rgb(0, 255, 255),
        Color::Pink => rgb(114, 117, 166),
        Color::Lime => rgb(177, 255, 94),
        Color::Teal => rgb(0, 200, 180),
        Color::Gold => rgb(230, 210, 40),
    }
}

fn hud_line(hud: Hud) -> String {
    let Hud {
        score,
        streak,
        round,
        pairs_left,
        hint_available,
    } = hud;
    let mut line =
        format!("round {round}  score {score}  streak {streak}  pairs left {pairs_left}");
    if hint_available {
        line.push_str("  (hint available)");
    }
    line
}

fn cell_glyph(content: CellContent) -> String {
    match content {
        CellContent::Covered => COVERED.to_owned(),
        CellContent::Icon(icon) => icon_glyph(icon),
        // the cover slides over from the right
        CellContent::Sliding { icon, cover } => {
            let mut glyph: Vec<char> = icon_glyph(icon).chars().collect();
            if cover >= 0.5 {
                glyph[0] = '.';
            }
            glyph[1] = '.';
            glyph.into_iter().collect()
        }
    }
}

/// Shape mark followed by a color letter, readable without color support.
fn icon_glyph(icon: Icon) -> String {
    let shape = match icon.shape {
        Shape::Donut => 'o',
        Shape::Square => '#',
        Shape::Diamond => '<',
        Shape::Lines => '/',
        Shape::Oval => '0',
        Shape::Ball => '@',
        Shape::Triangle => '^',
    };
    let color = match icon.color {
        Color::Red => 'r',
        Color::Green => 'g',
        Color::Blue => 'b',
        Color::Yellow => 'y',
        Color::Orange => 'o',
        Color::Purple => 'p',
        Color::Cyan => 'c',
        Color::Pink => 'k',
        Color::Lime => 'l',
        Color::Teal => 't',
        Color::Gold => 'd',
    };
    [shape, color].into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: Icon = Icon::new(Shape::Ball, Color::Red);

    fn renderer() -> TerminalRenderer<Vec<u8>> {
        TerminalRenderer::new(Vec::new(), BoardLayout::new((2, 1)))
    }

    fn draw(renderer: &mut TerminalRenderer<Vec<u8>>, backdrop: Backdrop, highlight: bool) {
        renderer.begin_frame(backdrop);
        renderer.draw_cell((0, 0), CellContent::Icon(ICON));
        renderer.draw_cell((1, 0), CellContent::Covered);
        if highlight {
            renderer.draw_highlight((1, 0));
        }
        renderer.draw_score_hud(Hud {
            score: 4,
            streak: 2,
            round: 1,
            pairs_left: 3,
            hint_available: false,
        });
        renderer.end_frame();
    }

    fn text(renderer: &TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(&renderer.out).into_owned()
    }

    #[test]
    fn layout_hit_tests_what_it_draws() {
        let layout = BoardLayout::new((3, 2));

        assert_eq!(layout.cell_origin((2, 1)), (12, 4));
        assert_eq!(layout.cell_at(12, 4), Some((2, 1)));
        assert_eq!(layout.cell_at(15, 4), Some((2, 1)));
        assert_eq!(layout.cell_at(4, 2), Some((0, 0)));
        assert_eq!(layout.cell_at(12, 3), None);
        assert_eq!(layout.cell_at(16, 4), None);
        assert_eq!(layout.cell_at(2, 2), None);
        assert_eq!(layout.hud_row(), 6);
    }

    #[test]
    fn first_frame_paints_board_and_hud() {
        let mut renderer = renderer();
        draw(&mut renderer, Backdrop::Normal, true);
        renderer.take_error().unwrap();

        let text = text(&renderer);
        assert!(text.contains("kioku"));
        assert!(text.contains("@r"));
        assert!(text.contains("round 1  score 4  streak 2  pairs left 3"));
        assert!(text.contains(HELP));
    }

    #[test]
    fn unchanged_frames_write_nothing_and_changes_stay_small() {
        let mut renderer = renderer();
        draw(&mut renderer, Backdrop::Normal, false);
        let full = renderer.out.len();

        draw(&mut renderer, Backdrop::Normal, false);
        assert_eq!(renderer.out.len(), full);

        draw(&mut renderer, Backdrop::Normal, true);
        let changed = renderer.out.len() - full;
        assert!(changed > 0 && changed < full, "{changed} of {full} bytes");
        assert_eq!(text(&renderer).matches("kioku").count(), 1);
    }

    #[test]
    fn backdrop_change_repaints_everything() {
        let mut renderer = renderer();
        draw(&mut renderer, Backdrop::Normal, false);
        draw(&mut renderer, Backdrop::Flash, false);
        assert_eq!(text(&renderer).matches("kioku").count(), 2);

        renderer.invalidate();
        draw(&mut renderer, Backdrop::Flash, false);
        assert_eq!(text(&renderer).matches("kioku").count(), 3);
    }

    #[test]
    fn messages_survive_full_redraws() {
        let mut renderer = renderer();
        renderer.message("Round 1 cleared");
        draw(&mut renderer, Backdrop::Flash, false);
        assert_eq!(text(&renderer).matches("Round 1 cleared").count(), 2);
    }

    #[test]
    fn sliding_tiles_cover_from_the_right() {
        assert_eq!(
            cell_glyph(CellContent::Sliding {
                icon: ICON,
                cover: 0.25
            }),
            "@."
        );
        assert_eq!(
            cell_glyph(CellContent::Sliding {
                icon: ICON,
                cover: 0.75
            }),
            ".."
        );
    }
}
