#![forbid(unsafe_code)]

//! Application model: one page, one dialog, one reveal scheduler.
//!
//! `App` owns the controllers and the shared resources they borrow, maps
//! canonical input events onto them, and renders the whole screen as plain
//! text lines. Both front ends (terminal and headless script) drive this
//! same model, so everything here is deterministic under test.

use std::time::Duration;

use tracing::trace;
use veriscan_core::capability::HostCapabilities;
use veriscan_core::event::{Event, KeyCode, KeyEvent, MouseEvent, MouseKind};
use veriscan_core::geometry::Rect;
use veriscan_ui::focus::FocusRegistry;
use veriscan_ui::keys::KeyRouter;
use veriscan_ui::overlay::OverlayHost;
use veriscan_ui::reveal::{ObserverConfig, RevealEvent, RevealScheduler};
use veriscan_ui::scan_dialog::{
    DialogEvent, DialogHost, DialogPhase, ScanDialog, ScanDialogConfig, layout,
};
use veriscan_ui::theme::Theme;

use crate::page::{
    HEADER_HEIGHT, NavMenu, Page, demo_button_id, nav_toggle_id,
};

/// Interval the front ends aim to tick the model at.
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Screen rect of the nav toggle in the header.
const NAV_TOGGLE_RECT: Rect = Rect::new(0, 0, 8, 1);

/// Short blurb rendered under each section heading.
fn section_blurb(anchor: &str) -> &'static str {
    match anchor {
        "hero" => "Counterfeit-proof product authentication for every shelf.",
        "how-it-works" => "Tag. Scan. Verify. Three steps from factory to customer.",
        "features" => "Tamper-evident codes, instant results, zero app installs.",
        "demo" => "[ Launch demo scan (d) ]",
        "contact" => "hello@veriscan.example",
        _ => "",
    }
}

/// The whole application state.
pub struct App {
    width: u16,
    height: u16,
    page: Page,
    nav: NavMenu,
    dialog: ScanDialog,
    reveals: RevealScheduler,
    overlays: OverlayHost,
    focus: FocusRegistry,
    keys: KeyRouter,
    theme: Theme,
    quit: bool,
}

impl App {
    /// Build the app for a screen of the given size.
    ///
    /// Registers every section with the reveal scheduler and performs the
    /// initial observation, so above-the-fold sections start their
    /// staggered entrance on the first ticks.
    #[must_use]
    pub fn new(
        width: u16,
        height: u16,
        dialog_config: ScanDialogConfig,
        caps: HostCapabilities,
    ) -> Self {
        let page = Page::new(width, height);
        let mut reveals = RevealScheduler::new(ObserverConfig::default());
        reveals.register(page.reveal_targets(), &caps);
        reveals.observe(page.viewport());

        let mut focus = FocusRegistry::new();
        focus.attach(nav_toggle_id());
        focus.attach(demo_button_id());
        focus.focus(&demo_button_id());

        Self {
            width,
            height,
            page,
            nav: NavMenu::new(),
            dialog: ScanDialog::new(dialog_config),
            reveals,
            overlays: OverlayHost::new(),
            focus,
            keys: KeyRouter::new(),
            theme: Theme::with_defaults(),
            quit: false,
        }
    }

    /// Whether the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Read access to the dialog, for front ends and tests.
    #[must_use]
    pub fn dialog(&self) -> &ScanDialog {
        &self.dialog
    }

    /// Read access to the reveal scheduler.
    #[must_use]
    pub fn reveals(&self) -> &RevealScheduler {
        &self.reveals
    }

    /// Read access to the page.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Handle one canonical input event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Tick => self.advance(TICK_INTERVAL),
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.page.resize(width, height);
                self.reveals.observe(self.page.viewport());
            }
        }
    }

    /// Advance all timers and animations by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let mut host = DialogHost {
            overlays: &mut self.overlays,
            focus: &mut self.focus,
            keys: &mut self.keys,
            theme: &mut self.theme,
        };
        self.dialog.tick(dt, &mut host);
        self.reveals.tick(dt);
    }

    /// Drain queued lifecycle events from both controllers.
    pub fn drain_events(&mut self) -> (Vec<DialogEvent>, Vec<RevealEvent>) {
        (self.dialog.drain_events(), self.reveals.drain_events())
    }

    fn on_key(&mut self, key: KeyEvent) {
        // The dialog's scoped subscriptions come first; while it is up,
        // Escape belongs to it.
        let mut host = DialogHost {
            overlays: &mut self.overlays,
            focus: &mut self.focus,
            keys: &mut self.keys,
            theme: &mut self.theme,
        };
        if self.dialog.handle_key(&key, &mut host) {
            return;
        }

        if key.ctrl() && key.is_char('c') {
            self.quit = true;
            return;
        }

        if key.code == KeyCode::Escape {
            self.nav.close_on_escape(&mut self.focus);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('d') => self.open_dialog(),
            KeyCode::Char('r') => self.dialog.reset(),
            KeyCode::Char('m') => self.nav.toggle(&mut self.focus),
            KeyCode::Down => self.scroll(1),
            KeyCode::Up => self.scroll(-1),
            KeyCode::PageDown => self.scroll(i32::from(self.height)),
            KeyCode::PageUp => self.scroll(-i32::from(self.height)),
            KeyCode::Home => self.scroll(-100_000),
            KeyCode::End => self.scroll(100_000),
            KeyCode::Char(c @ '1'..='5') => self.jump_to_section(c as usize - '1' as usize),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let screen = Rect::from_size(self.width, self.height);
        if self.dialog.handle_mouse(&mouse, screen) {
            return;
        }

        match mouse.kind {
            MouseKind::ScrollDown => self.scroll(3),
            MouseKind::ScrollUp => self.scroll(-3),
            MouseKind::Down => {
                if NAV_TOGGLE_RECT.contains(mouse.x, mouse.y) {
                    self.nav.toggle(&mut self.focus);
                } else if self.nav.is_open()
                    && !self.nav.bounds(self.width).contains(mouse.x, mouse.y)
                {
                    self.nav.close_on_outside_click(&mut self.focus);
                } else if self
                    .demo_button_screen_rect()
                    .is_some_and(|r| r.contains(mouse.x, mouse.y))
                {
                    self.open_dialog();
                }
            }
            MouseKind::Up => {}
        }
    }

    /// Jump to a section by index (nav link activation).
    fn jump_to_section(&mut self, index: usize) {
        let Some(anchor) = self.page.sections().get(index).map(|s| s.anchor) else {
            return;
        };
        // Following a nav link collapses the menu.
        self.nav.close_on_outside_click(&mut self.focus);
        if self.page.scroll_to_anchor(anchor).is_ok() {
            self.reveals.observe(self.page.viewport());
        }
    }

    fn open_dialog(&mut self) {
        let mut host = DialogHost {
            overlays: &mut self.overlays,
            focus: &mut self.focus,
            keys: &mut self.keys,
            theme: &mut self.theme,
        };
        // A presentation failure was already logged; the launch degrades to
        // a no-op rather than disturbing the rest of the page.
        let _ = self.dialog.open(&mut host);
    }

    fn scroll(&mut self, delta: i32) {
        self.page.scroll_by(delta);
        self.reveals.observe(self.page.viewport());
        trace!(scroll_y = self.page.scroll_y(), "scrolled");
    }

    /// Screen rect of the demo-section launch button, if on screen.
    ///
    /// The button is the blurb line rendered one row under the section
    /// heading.
    fn demo_button_screen_rect(&self) -> Option<Rect> {
        let section = self.page.sections().iter().find(|s| s.anchor == "demo")?;
        let page_row = section.bounds.y.saturating_add(1);
        let scroll = self.page.scroll_y();
        if page_row < scroll.saturating_add(HEADER_HEIGHT)
            || page_row >= scroll.saturating_add(self.height)
        {
            return None;
        }
        Some(Rect::new(2, page_row - scroll, 28, 1))
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Render the whole screen as `height` text lines.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut grid = vec![vec![' '; w]; h];

        self.render_page(&mut grid);
        self.render_header(&mut grid);
        if self.nav.is_open() {
            self.render_nav(&mut grid);
        }
        if self.dialog.is_open() {
            self.render_dialog(&mut grid);
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    fn render_header(&self, grid: &mut [Vec<char>]) {
        put_str(grid, 0, 0, "☰ menu  VeriScan — every product, verified");
        let hint = "[d]emo [q]uit";
        let x = (self.width as usize).saturating_sub(hint.len() + 1);
        put_str(grid, x as u16, 0, hint);

        let rule = if self.page.header_elevated() { '═' } else { '─' };
        if let Some(row) = grid.get_mut(1) {
            row.fill(rule);
        }
    }

    fn render_page(&self, grid: &mut [Vec<char>]) {
        let scroll = self.page.scroll_y();
        for section in self.page.sections() {
            if !self.reveals.is_revealed(section.id) {
                continue;
            }
            let settled = self.reveals.progress(section.id) >= 1.0;
            let marker = if settled { '▌' } else { '░' };

            for (offset, text) in [
                (0, format!("{marker} {}", section.title)),
                (1, format!("  {}", section_blurb(section.anchor))),
            ] {
                let page_row = section.bounds.y.saturating_add(offset);
                if page_row < scroll {
                    continue;
                }
                let screen_row = page_row - scroll;
                if screen_row >= self.height || screen_row < HEADER_HEIGHT {
                    continue;
                }
                put_str(grid, 2, screen_row, &text);
            }
        }
    }

    fn render_nav(&self, grid: &mut [Vec<char>]) {
        let bounds = self.nav.bounds(self.width);
        for (index, section) in self.page.sections().iter().enumerate() {
            let row = bounds.y.saturating_add(index as u16);
            if row < bounds.bottom() {
                clear_row_span(grid, bounds, row);
                put_str(grid, bounds.x, row, &format!(" {} » {}", index + 1, section.anchor));
            }
        }
    }

    fn render_dialog(&self, grid: &mut [Vec<char>]) {
        let l = layout(Rect::from_size(self.width, self.height));
        let panel = l.panel;
        if panel.is_empty() {
            return;
        }

        for row in panel.y..panel.bottom() {
            clear_row_span(grid, panel, row);
        }
        draw_box(grid, panel);

        put_str(
            grid,
            panel.x.saturating_add(2),
            panel.y.saturating_add(1),
            "Demo Scanner",
        );
        put_str(grid, l.close_button.x, l.close_button.y, "[x]");

        match self.dialog.phase() {
            DialogPhase::Scanning => {
                put_str(grid, l.scanner.x, l.scanner.y, "┌─ scanning ─┐");
                put_str(
                    grid,
                    l.scanner.x,
                    l.scanner.y.saturating_add(1),
                    "Point the scanner at a VeriScan code",
                );
            }
            DialogPhase::Result => {
                put_str(grid, l.scanner.x, l.scanner.y, "✓ Product authenticated");
                put_str(
                    grid,
                    l.scanner.x,
                    l.scanner.y.saturating_add(1),
                    "This product is genuine and verified.",
                );
                put_str(grid, l.action_button.x, l.action_button.y, "[ Scan another (r) ]");
            }
            DialogPhase::Closed => {}
        }
    }
}

/// Write a string into the grid at `(x, y)`, clipped to the grid.
fn put_str(grid: &mut [Vec<char>], x: u16, y: u16, text: &str) {
    let Some(row) = grid.get_mut(y as usize) else {
        return;
    };
    for (i, ch) in text.chars().enumerate() {
        let Some(cell) = row.get_mut(x as usize + i) else {
            break;
        };
        *cell = ch;
    }
}

/// Blank the cells of `row` covered by `area`.
fn clear_row_span(grid: &mut [Vec<char>], area: Rect, row: u16) {
    let Some(cells) = grid.get_mut(row as usize) else {
        return;
    };
    for x in area.x..area.right() {
        if let Some(cell) = cells.get_mut(x as usize) {
            *cell = ' ';
        }
    }
}

/// Draw a box border along the edges of `area`.
fn draw_box(grid: &mut [Vec<char>], area: Rect) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (top, bottom) = (area.y, area.bottom() - 1);
    let (left, right) = (area.x, area.right() - 1);
    for x in left..=right {
        put_char(grid, x, top, '─');
        put_char(grid, x, bottom, '─');
    }
    for y in top..=bottom {
        put_char(grid, left, y, '│');
        put_char(grid, right, y, '│');
    }
    put_char(grid, left, top, '┌');
    put_char(grid, right, top, '┐');
    put_char(grid, left, bottom, '└');
    put_char(grid, right, bottom, '┘');
}

fn put_char(grid: &mut [Vec<char>], x: u16, y: u16, ch: char) {
    if let Some(cell) = grid.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
        *cell = ch;
    }
}
