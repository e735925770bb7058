use std::fmt::Write as _;
use std::io::{self, Write};

use clap::Parser;
use ringsweeper::engine::{Game, RevealResult};
use ringsweeper::tui;
use ringsweeper::types::{GameState, GameStatus, TileStatus};

#[derive(Parser, Debug)]
#[command(name = "ringsweeper", about = "Wrestling-themed CLI/TUI Minesweeper", version)]
struct Args {
    /// Launch TUI mode
    #[arg(long)]
    tui: bool,
    /// Board side length (the ring is always square)
    #[arg(long, default_value_t = 10)]
    size: usize,
    /// Number of opposing wrestlers (mines)
    #[arg(long, default_value_t = 10)]
    mines: usize,
    /// Seed (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn print_help() {
    println!("Commands:");
    println!("  r x y   - reveal tile at column x, row y (1-based)");
    println!("  f x y   - toggle flag at x, y (1-based)");
    println!("  n       - restart the match");
    println!("  q       - quit");
    println!("  h/help  - show this help");
}

/// Text rendering of a state snapshot. `show_all` exposes every mine, for
/// the post-match board.
fn render_board(state: &GameState, show_all: bool) -> String {
    let size = state.board.size();
    let mut s = String::new();
    // Column header
    s.push_str("    ");
    for x in 0..size {
        let _ = write!(s, "{:>2} ", x + 1);
    }
    s.push('\n');
    s.push_str("   ");
    s.push_str(&"-".repeat(size * 3 + 1));
    s.push('\n');

    for y in 0..size {
        let _ = write!(s, "{:>2} | ", y + 1);
        for x in 0..size {
            let tile = &state.board[(x, y)];
            let ch = if show_all && tile.mine {
                '*'
            } else {
                match tile.status {
                    TileStatus::Mine => '*',
                    TileStatus::Flagged => 'F',
                    TileStatus::Hidden => '.',
                    TileStatus::Number => {
                        if tile.adjacent_mines == 0 { ' ' } else { char::from_digit(tile.adjacent_mines as u32, 10).unwrap_or('?') }
                    }
                }
            };
            let _ = write!(s, "{}  ", ch);
        }
        s.push('\n');
    }
    s
}

fn main() {
    let args = Args::parse();
    if args.tui {
        if let Err(e) = tui::run_tui(args.size, args.mines, args.seed) {
            eprintln!("TUI error: {}", e);
        }
        return;
    }
    let built = if args.seed == 0 { Game::new(args.size, args.mines) } else { Game::seeded(args.size, args.mines, args.seed) };
    let mut game = match built {
        Ok(g) => g,
        Err(e) => { eprintln!("{}", e); return; }
    };

    println!("Ringsweeper: a {}x{} ring with {} opponents lying in wait{}", args.size, args.size, args.mines, if args.seed != 0 { format!(" (seed {})", args.seed) } else { String::new() });
    println!("Coordinates are 1-based. Type 'h' for help.");
    print_help();

    let mut input = String::new();
    loop {
        let snap = game.snapshot();
        println!("\n{}", render_board(&snap, false));
        println!("Opponents left: {}", snap.mines_left);
        match snap.status {
            GameStatus::Lost => {
                println!("You've been pinned! Better luck next time.");
                println!("Ring time: {}s\n", game.duration().unwrap_or(0));
                println!("Final board (opponents shown):\n{}", render_board(&snap, true));
                break;
            }
            GameStatus::Won => {
                println!("And the winner is... YOU! The crowd goes wild!");
                println!("Ring time: {}s\n", game.duration().unwrap_or(0));
                println!("Final board (opponents shown):\n{}", render_board(&snap, true));
                break;
            }
            GameStatus::Playing => {}
        }

        print!("> ");
        let _ = io::stdout().flush();
        input.clear();
        if io::stdin().read_line(&mut input).is_err() { break; }
        let line = input.trim();
        if line.is_empty() { continue; }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0].to_lowercase().as_str() {
            "q" | "quit" | "exit" => break,
            "h" | "help" => { print_help(); continue; },
            "n" | "new" | "restart" => { game.reset(); continue; },
            "r" | "reveal" => {
                if parts.len() < 3 { println!("Usage: r x y"); continue; }
                let x = match parts[1].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid x"); continue; } };
                let y = match parts[2].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid y"); continue; } };
                if x == 0 || y == 0 { println!("Use 1-based coordinates"); continue; }
                let res = game.reveal(x - 1, y - 1);
                match res {
                    RevealResult::HitMine | RevealResult::Won => { /* handled at loop top */ },
                    RevealResult::Revealed => { /* ok */ },
                    RevealResult::NoOp => { /* ignore */ },
                }
            }
            "f" | "flag" => {
                if parts.len() < 3 { println!("Usage: f x y"); continue; }
                let x = match parts[1].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid x"); continue; } };
                let y = match parts[2].parse::<usize>() { Ok(v) => v, Err(_) => { println!("Invalid y"); continue; } };
                if x == 0 || y == 0 { println!("Use 1-based coordinates"); continue; }
                if !game.toggle_flag(x - 1, y - 1) { println!("Cannot flag a revealed tile or out of bounds"); }
            }
            other => {
                println!("Unknown command '{}'. Type 'h' for help.", other);
            }
        }
    }
}
