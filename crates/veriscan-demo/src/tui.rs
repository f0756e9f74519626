#![forbid(unsafe_code)]

//! Interactive terminal front end.
//!
//! Raw mode, alternate screen, and mouse capture are acquired on entry and
//! released by a drop guard on every exit path, including panics. Input is
//! translated to the canonical event types at this boundary; the model
//! never sees crossterm.

use std::io::{self, Write};
use std::time::Instant;

use crossterm::event as ct;
use crossterm::{cursor, execute, queue, style, terminal};
use veriscan_core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent, MouseKind};

use crate::app::{App, TICK_INTERVAL};

/// Restores the terminal on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            ct::EnableMouseCapture,
            cursor::Hide,
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            ct::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive loop until the user quits.
pub fn run(app: &mut App) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut out = io::stdout();
    let mut last_tick = Instant::now();

    draw(&mut out, app)?;
    while !app.should_quit() {
        let timeout = TICK_INTERVAL.saturating_sub(last_tick.elapsed());
        if ct::poll(timeout)? {
            if let Some(event) = map_event(ct::read()?) {
                app.update(event);
            }
        }
        if last_tick.elapsed() >= TICK_INTERVAL {
            app.advance(last_tick.elapsed());
            let _ = app.drain_events();
            last_tick = Instant::now();
            draw(&mut out, app)?;
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, app: &App) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0))?;
    for line in app.render_lines() {
        queue!(
            out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(line),
            cursor::MoveToNextLine(1),
        )?;
    }
    out.flush()
}

fn map_event(event: ct::Event) -> Option<Event> {
    match event {
        ct::Event::Key(key) if key.kind != ct::KeyEventKind::Release => {
            map_key(key).map(Event::Key)
        }
        ct::Event::Mouse(mouse) => map_mouse(mouse).map(Event::Mouse),
        ct::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

fn map_key(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Esc => KeyCode::Escape,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::BackTab,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        _ => return None,
    };

    let mut modifiers = Modifiers::NONE;
    if key.modifiers.contains(ct::KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if key.modifiers.contains(ct::KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if key.modifiers.contains(ct::KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    Some(KeyEvent::new(code).with_modifiers(modifiers))
}

fn map_mouse(mouse: ct::MouseEvent) -> Option<MouseEvent> {
    let kind = match mouse.kind {
        ct::MouseEventKind::Down(ct::MouseButton::Left) => MouseKind::Down,
        ct::MouseEventKind::Up(ct::MouseButton::Left) => MouseKind::Up,
        ct::MouseEventKind::ScrollUp => MouseKind::ScrollUp,
        ct::MouseEventKind::ScrollDown => MouseKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent::new(kind, mouse.column, mouse.row))
}
