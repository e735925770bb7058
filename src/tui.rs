use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use crate::engine::Game;
use crate::types::{GameState, GameStatus, TileStatus};

struct Wrestler {
    name: &'static str,
    tagline: &'static str,
}

const WRESTLERS: [Wrestler; 4] = [
    Wrestler { name: "The Eliminator", tagline: "Knocking out the competition!" },
    Wrestler { name: "The Masked Bomber", tagline: "Striking from the shadows!" },
    Wrestler { name: "The Powerhouse", tagline: "Unstoppable strength!" },
    Wrestler { name: "The High Flyer", tagline: "Soaring to victory!" },
];

enum Screen {
    ChooseWrestler,
    Match,
}

pub fn run_tui(size: usize, mines: usize, seed: u64) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let _guard = TermGuard;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let built = if seed == 0 { Game::new(size, mines) } else { Game::seeded(size, mines, seed) };
    let mut game = built.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut screen = Screen::ChooseWrestler;
    let mut choice = 0usize;
    let mut cursor = (0usize, 0usize);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);
    let autodemo = std::env::var("RINGSWEEPER_TUI_AUTODEMO").ok().is_some();
    let mut demo_step = 0usize;

    let mut last_inner_board = Rect::default();
    let res = loop {
        let snap = game.snapshot();
        terminal.draw(|f| match screen {
            Screen::ChooseWrestler => draw_choose(f, choice),
            Screen::Match => { last_inner_board = draw_match(f, &snap, &game, choice, cursor); }
        })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
                    match screen {
                        Screen::ChooseWrestler => match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                            KeyCode::Char('k') | KeyCode::Up => {
                                if choice > 0 { choice -= 1; }
                            }
                            KeyCode::Char('j') | KeyCode::Down => {
                                if choice + 1 < WRESTLERS.len() { choice += 1; }
                            }
                            KeyCode::Enter | KeyCode::Char(' ') => { screen = Screen::Match; }
                            _ => {}
                        },
                        Screen::Match => match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                            KeyCode::Char('h') | KeyCode::Left => {
                                if cursor.0 > 0 { cursor.0 -= 1; }
                            }
                            KeyCode::Char('l') | KeyCode::Right => {
                                if cursor.0 + 1 < game.board_size() { cursor.0 += 1; }
                            }
                            KeyCode::Char('k') | KeyCode::Up => {
                                if cursor.1 > 0 { cursor.1 -= 1; }
                            }
                            KeyCode::Char('j') | KeyCode::Down => {
                                if cursor.1 + 1 < game.board_size() { cursor.1 += 1; }
                            }
                            KeyCode::Char('f') => { let _ = game.toggle_flag(cursor.0, cursor.1); }
                            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => {
                                let _ = game.reveal(cursor.0, cursor.1);
                            }
                            KeyCode::Char('n') => game.reset(),
                            KeyCode::Char('R') if shift => game.reset(),
                            _ => {}
                        },
                    }
                }
                Event::Mouse(m) => {
                    // Map mouse to cell coordinates within the inner board area
                    if let (Screen::Match, MouseEventKind::Down(btn)) = (&screen, m.kind) {
                        let side = game.board_size() as u16;
                        if let Some((cx, cy)) = pos_to_cell(m.column, m.row, last_inner_board, side, side) {
                            match btn {
                                MouseButton::Left => { let _ = game.reveal(cx as usize, cy as usize); }
                                MouseButton::Right => { let _ = game.toggle_flag(cx as usize, cy as usize); }
                                MouseButton::Middle => { /* reserved for future chording */ }
                            }
                        }
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if autodemo {
                // simple scripted steps then exit
                match demo_step {
                    0 => { screen = Screen::Match; }
                    1 => { let _ = game.reveal(0, 0); cursor = (1.min(size - 1), 1.min(size - 1)); }
                    2 => { let _ = game.reveal(cursor.0, cursor.1); }
                    3 => { let _ = game.toggle_flag((size / 2).min(size - 1), (size / 2).min(size - 1)); }
                    4 => { /* pause frame */ }
                    _ => break Ok(()),
                }
                demo_step += 1;
            }
        }
    };

    // teardown via guard; just ensure cursor visible
    terminal.show_cursor()?;
    res
}

fn draw_choose(f: &mut ratatui::Frame, choice: usize) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(WRESTLERS.len() as u16 * 2 + 2),
            Constraint::Length(2),
        ])
        .split(f.size());

    let header = Paragraph::new("Choose Your Wrestler")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Ringsweeper"));
    f.render_widget(header, root[0]);

    let mut lines: Vec<Line> = Vec::with_capacity(WRESTLERS.len() * 2);
    for (i, w) in WRESTLERS.iter().enumerate() {
        let style = if i == choice {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("{:^30}", w.name), style)));
        lines.push(Line::from(Span::styled(
            format!("{:^30}", w.tagline),
            style.add_modifier(Modifier::ITALIC),
        )));
    }
    let roster = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(roster, root[1]);

    let footer = Paragraph::new("Up/Down pick • Enter step into the ring • q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, root[2]);
}

fn draw_match(f: &mut ratatui::Frame, snap: &GameState, game: &Game, choice: usize, cursor: (usize, usize)) -> Rect {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    // Header
    let status = match snap.status {
        GameStatus::Lost => "You've been pinned! n for a rematch, q to quit",
        GameStatus::Won => "The crowd goes wild! You win! n for a rematch, q to quit",
        GameStatus::Playing => "Mouse: left=reveal, right=flag • Arrows/HJKL move • Enter/Space reveal • f flag • n new • q quit",
    };
    let wrestler = &WRESTLERS[choice];
    let header = Paragraph::new(status)
        .style(match snap.status {
            GameStatus::Lost => Style::default().fg(Color::Red),
            GameStatus::Won => Style::default().fg(Color::Green),
            GameStatus::Playing => Style::default().fg(Color::Cyan),
        })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!("{} — {}", wrestler.name, wrestler.tagline)));
    f.render_widget(header, root[0]);

    // Board area
    let side = snap.board.size() as u16;
    let area = centered_grid_area(root[1], side, side);
    let inner = inner_area(area);
    draw_board(f, snap, area, cursor);

    // The timer is display-only: elapsed wall time while the match runs,
    // the engine's recorded duration once it ends.
    let ring_time = if snap.status.is_over() {
        game.duration().unwrap_or(0)
    } else {
        snap.started_at.elapsed().as_secs()
    };
    let footer = Paragraph::new(format!(
        "Ring: {}x{}  Opponents left: {}  Ring time: {}s",
        snap.board.size(),
        snap.board.size(),
        snap.mines_left,
        ring_time
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);
    inner
}

fn centered_grid_area(parent: Rect, cols: u16, rows: u16) -> Rect {
    let cell_w = 2; // one char + one space
    let cell_h = 1;
    let grid_w = cols * cell_w;
    let grid_h = rows * cell_h;
    let x = parent.x.saturating_add((parent.width.saturating_sub(grid_w)) / 2);
    let y = parent.y.saturating_add((parent.height.saturating_sub(grid_h)) / 2);
    Rect { x, y, width: grid_w.min(parent.width), height: grid_h.min(parent.height) }
}

fn draw_board(f: &mut ratatui::Frame, snap: &GameState, area: Rect, cursor: (usize, usize)) {
    let size = snap.board.size();
    let mut lines: Vec<Line> = Vec::with_capacity(size);
    for y in 0..size {
        let mut spans: Vec<Span> = Vec::with_capacity(size * 2);
        for x in 0..size {
            let tile = &snap.board[(x, y)];

            let mut ch = match tile.status {
                TileStatus::Mine => '*',
                TileStatus::Flagged => 'F',
                TileStatus::Hidden => '·',
                TileStatus::Number => {
                    if tile.adjacent_mines == 0 { ' ' } else { char::from_digit(tile.adjacent_mines as u32, 10).unwrap_or('?') }
                }
            };

            // Color by state
            let mut style = match tile.status {
                TileStatus::Mine => Style::default().fg(Color::Red),
                TileStatus::Flagged => Style::default().fg(Color::Yellow),
                TileStatus::Number => number_style(tile.adjacent_mines),
                TileStatus::Hidden => Style::default().fg(Color::DarkGray),
            };

            // Highlight selected cell
            if cursor.0 == x && cursor.1 == y {
                style = style.add_modifier(Modifier::REVERSED);
                if ch == ' ' { ch = '·'; }
            }

            spans.push(Span::styled(format!("{} ", ch), style));
        }
        lines.push(Line::from(spans));
    }

    let board_block = Block::default().borders(Borders::ALL).title("The Ring");
    let para = Paragraph::new(lines).block(board_block);
    f.render_widget(para, area);
}

fn number_style(n: u8) -> Style {
    match n {
        0 => Style::default().fg(Color::Gray),
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Green),
        3 => Style::default().fg(Color::Red),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Yellow),
        6 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    }
}

fn inner_area(area: Rect) -> Rect {
    // Match Block::inner() for Borders::ALL: shrink by 1 on each side
    Rect { x: area.x.saturating_add(1), y: area.y.saturating_add(1), width: area.width.saturating_sub(2), height: area.height.saturating_sub(2) }
}

fn pos_to_cell(mx: u16, my: u16, inner: Rect, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if mx < inner.x || my < inner.y { return None; }
    let rel_x = mx - inner.x;
    let rel_y = my - inner.y;
    let cell_w = 2u16; // must match centered_grid_area and rendering width
    let cx = rel_x / cell_w;
    let cy = rel_y / 1u16;
    if cx < cols && cy < rows { Some((cx, cy)) } else { None }
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        use crossterm::ExecutableCommand;
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
