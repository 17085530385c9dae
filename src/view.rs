//! Interactive session: the tree on top, a four-field form underneath
//!
//! Controls:
//! - Type to edit the focused field, Backspace to delete
//! - Tab/Down, Shift+Tab/Up: Move between fields
//! - Enter: Redraw with the form values
//! - ?/F1: Help
//! - Esc/Ctrl+C: Quit

use crate::config::{colors, RawInputs, TreeConfig};
use crate::help::show_help_modal;
use crate::raster::{blit, CanvasCache};
use crate::session::{Field, Session};
use crate::terminal::Terminal;
use crate::tree::Scene;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use std::io;

const HELP: &str = "\
FRACTAL TREE
─────────────────────────
Type     Edit focused field
Bksp     Delete character
Tab/↓    Next field
S-Tab/↑  Previous field
Enter    Redraw tree
Esc      Quit
?        Close help";

// Form row plus status row
const FORM_ROWS: u16 = 2;
const MAX_FIELD_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    None,
    Redraw,
    Help,
    Quit,
}

/// The text fields and which one has focus
struct Form {
    inputs: RawInputs,
    focus: Field,
}

impl Form {
    fn new(inputs: RawInputs) -> Self {
        Self {
            inputs,
            focus: Field::Depth,
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Depth => &self.inputs.depth,
            Field::Probability => &self.inputs.probability,
            Field::Angle => &self.inputs.angle,
            Field::Branches => &self.inputs.branches,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Depth => &mut self.inputs.depth,
            Field::Probability => &mut self.inputs.probability,
            Field::Angle => &mut self.inputs.angle,
            Field::Branches => &mut self.inputs.branches,
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> FormAction {
        match code {
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return FormAction::Quit,
            KeyCode::Enter => return FormAction::Redraw,
            KeyCode::Char('?') | KeyCode::F(1) => return FormAction::Help,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Backspace => {
                self.value_mut(self.focus).pop();
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                let value = self.value_mut(self.focus);
                if value.chars().count() < MAX_FIELD_LEN {
                    value.push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }
}

/// Run the interactive tree session
pub fn run(config: TreeConfig) -> io::Result<()> {
    let mut session = Session::new(config.params, config.canvas, config.seed_or_clock());
    let mut scene = Scene::new(config.canvas.width, config.canvas.height);
    let mut form = Form::new(RawInputs::from_params(&config.params));
    let mut canvas = CanvasCache::default();

    // First tree is there before anyone presses Enter
    session.redraw(&mut scene);

    let mut term = Terminal::new(true)?;
    term.clear_screen()?;
    let (mut prev_w, mut prev_h) = term.size();

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or((prev_w, prev_h));
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
        }

        compose(&mut term, &mut canvas, &scene, &form, &session);
        term.render()?;

        let Some(event) = term.poll_event(100)? else {
            continue;
        };
        let Event::Key(key) = event else {
            // Resizes are picked up at the top of the loop
            continue;
        };

        match form.handle_key(key.code, key.modifiers) {
            FormAction::Quit => break,
            FormAction::Redraw => {
                session.reset(&form.inputs, &mut scene);
            }
            FormAction::Help => {
                if show_help_modal(&mut term, HELP)? {
                    break;
                }
            }
            FormAction::None => {}
        }
    }

    Ok(())
}

fn compose(term: &mut Terminal, canvas: &mut CanvasCache, scene: &Scene, form: &Form, session: &Session) {
    let (width, height) = term.size();
    term.clear();

    // Only a redraw or a resize costs a new rasterization
    let canvas_rows = height.saturating_sub(FORM_ROWS);
    if canvas.refresh(scene, width, canvas_rows) {
        tracing::debug!(cols = width, rows = canvas_rows, segments = scene.len(), "rasterized scene");
    }
    blit(canvas.grid(), term, 0);

    draw_form(term, form, height.saturating_sub(FORM_ROWS) as i32);
    draw_status(term, session, height.saturating_sub(1) as i32, width);
}

fn draw_form(term: &mut Terminal, form: &Form, y: i32) {
    let mut x = 1;
    for field in Field::ALL {
        let label = format!("{}: ", field.label());
        term.set_str(x, y, &label, Some(colors::LABEL), false);
        x += label.chars().count() as i32;

        let focused = field == form.focus;
        let mut text = format!("[{}", form.value(field));
        if focused {
            text.push('_');
        }
        text.push(']');
        let color = if focused { colors::FIELD_FOCUSED } else { colors::FIELD };
        term.set_str(x, y, &text, Some(color), focused);
        x += text.chars().count() as i32 + 2;
    }
}

fn draw_status(term: &mut Terminal, session: &Session, y: i32, width: u16) {
    let stats = session.last_stats();
    let p = session.params();
    let status = format!(
        "{} segments  depth {} p {} angle {} x{}  seed {}  Enter redraw  ? help  Esc quit",
        stats.segments,
        p.recursion_depth,
        p.branch_probability,
        p.base_angle,
        p.branches_per_node,
        session.seed()
    );
    term.set_str(1, y, &status, Some(colors::STATUS), false);

    if stats.truncated {
        let note = "[segment budget reached]";
        let x = (width as i32 - note.len() as i32 - 1).max(status.chars().count() as i32 + 2);
        term.set_str(x, y, note, Some(colors::WARNING), true);
    }
}
