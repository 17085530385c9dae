use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::fmt::Write as _;
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Character-cell drawing surface backed by the real terminal
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Take over the terminal (raw mode + alternate screen) when `alternate_screen` is set
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self::blank(width, height, alternate_screen))
    }

    /// Off-screen buffer of a fixed size, never touches the tty
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self::blank(width, height, false)
    }

    fn blank(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Reallocate the buffer for new dimensions (contents are dropped)
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.buffer.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Set a character; out-of-bounds writes are ignored
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bold };
        }
    }

    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Flush the whole buffer to the screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }

                match cell.fg {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?,
                    None => queue!(out, Print(cell.ch))?,
                }

                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Next input event, waiting at most `timeout_ms`. Key releases are dropped.
    pub fn poll_event(&self, timeout_ms: u64) -> io::Result<Option<Event>> {
        if poll(Duration::from_millis(timeout_ms))? {
            match read()? {
                Event::Key(KeyEvent { kind: KeyEventKind::Release, .. }) => return Ok(None),
                event => return Ok(Some(event)),
            }
        }
        Ok(None)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        match self.poll_event(timeout_ms)? {
            Some(Event::Key(key_event)) => Ok(Some(key_event.code)),
            _ => Ok(None),
        }
    }

    /// Buffer as ANSI-colored text lines (for print mode)
    pub fn to_ansi_lines(&self) -> Vec<String> {
        self.buffer
            .iter()
            .map(|row| {
                let mut line = String::new();
                for cell in row {
                    if cell.ch == ' ' {
                        line.push(' ');
                        continue;
                    }
                    if cell.bold {
                        line.push_str("\x1b[1m");
                    }
                    if let Some(code) = cell.fg.and_then(ansi_fg) {
                        line.push_str(&code);
                    }
                    line.push(cell.ch);
                    line.push_str("\x1b[0m");
                }
                line.trim_end().to_string()
            })
            .collect()
    }

    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        for line in self.to_ansi_lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

fn ansi_fg(color: Color) -> Option<String> {
    let mut code = String::new();
    match color {
        Color::Rgb { r, g, b } => write!(code, "\x1b[38;2;{};{};{}m", r, g, b).ok()?,
        Color::AnsiValue(v) => write!(code, "\x1b[38;5;{}m", v).ok()?,
        Color::DarkGreen => code.push_str("\x1b[32m"),
        Color::DarkYellow => code.push_str("\x1b[33m"),
        Color::Grey => code.push_str("\x1b[37m"),
        Color::DarkGrey => code.push_str("\x1b[90m"),
        Color::Green => code.push_str("\x1b[92m"),
        Color::Yellow => code.push_str("\x1b[93m"),
        Color::White => code.push_str("\x1b[97m"),
        _ => return None,
    }
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut term = Terminal::offscreen(4, 2);
        term.set(-1, 0, 'x', None, false);
        term.set(4, 1, 'x', None, false);
        term.set(3, 1, 'y', None, false);
        assert_eq!(term.get(3, 1).map(|c| c.ch), Some('y'));
        assert!(term.get(4, 1).is_none());
    }

    #[test]
    fn ansi_lines_carry_rgb_and_trim() {
        let mut term = Terminal::offscreen(5, 1);
        term.set(1, 0, '⣿', Some(Color::Rgb { r: 1, g: 2, b: 3 }), false);
        let lines = term.to_ansi_lines();
        assert_eq!(lines[0], " \x1b[38;2;1;2;3m⣿\x1b[0m");
    }

    #[test]
    fn resize_reallocates() {
        let mut term = Terminal::offscreen(2, 2);
        term.set(0, 0, 'a', None, true);
        term.resize(3, 4);
        assert_eq!(term.size(), (3, 4));
        assert_eq!(term.get(0, 0), Some(&Cell::default()));
        assert!(term.get(2, 3).is_some());
    }
}
