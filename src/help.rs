use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Position and size of a centered box around `text`
fn help_box(width: u16, height: u16, text: &str) -> (usize, usize, usize, Vec<&str>) {
    let lines: Vec<&str> = text.lines().collect();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = inner + 4;
    let box_height = lines.len() + 2;
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;
    (start_x, start_y, inner, lines)
}

/// Show the help box over the current frame until it is dismissed.
/// Returns true if the user asked to quit while it was open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    draw_help_box(width, height, help_text)?;

    loop {
        match term.wait_key(50)? {
            Some(KeyCode::Char('?')) | Some(KeyCode::F(1)) | Some(KeyCode::Enter) => break,
            Some(KeyCode::Esc) => return Ok(true),
            _ => {}
        }
    }

    // The back buffer still holds the tree
    term.render()?;
    Ok(false)
}

fn draw_help_box(width: u16, height: u16, help_text: &str) -> io::Result<()> {
    let (x, y, inner, lines) = help_box(width, height, help_text);
    let right = (x + inner + 3) as u16;
    let bottom = (y + lines.len() + 1) as u16;
    let rule = "─".repeat(inner + 2);

    let mut out = stdout();
    queue!(
        out,
        SetForegroundColor(Color::White),
        MoveTo(x as u16, y as u16),
        Print(format!("┌{}┐", rule))
    )?;

    for (i, line) in lines.iter().enumerate() {
        let row = (y + 1 + i) as u16;
        let padding = inner - line.chars().count();
        queue!(
            out,
            MoveTo(x as u16, row),
            SetForegroundColor(Color::White),
            Print('│'),
            SetForegroundColor(Color::Grey),
            Print(format!(" {}{} ", line, " ".repeat(padding))),
            SetForegroundColor(Color::White),
            MoveTo(right, row),
            Print('│')
        )?;
    }

    queue!(out, MoveTo(x as u16, bottom), Print(format!("└{}┘", rule)))?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}
