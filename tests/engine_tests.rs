use ringsweeper::engine::{Game, GameError, RevealResult};
use ringsweeper::types::{GameStatus, TileStatus};

fn neighbors(size: usize, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    let x = x as isize; let y = y as isize; let size = size as isize;
    let mut out = Vec::new();
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 { continue; }
            let nx = x + dx; let ny = y + dy;
            if nx >= 0 && ny >= 0 && nx < size && ny < size { out.push((nx as usize, ny as usize)); }
        }
    }
    out.into_iter()
}

fn count_mines(game: &Game) -> usize {
    game.snapshot().board.tiles().filter(|t| t.mine).count()
}

#[test]
fn first_reveal_is_never_a_loss() {
    for seed in [1, 7, 999, 12345] {
        for start in [(0, 0), (4, 4), (8, 8), (0, 8)] {
            let mut game = Game::seeded(9, 10, seed).expect("game");
            let _ = game.reveal(start.0, start.1);
            assert_ne!(game.status(), GameStatus::Lost, "seed {} start {:?}", seed, start);
            let tile = game.tile(start.0, start.1).unwrap();
            assert!(!tile.mine);
            assert_eq!(tile.status, TileStatus::Number);
        }
    }
}

#[test]
fn mines_are_placed_lazily_and_exactly_once() {
    let mut game = Game::seeded(8, 10, 42).expect("game");
    assert_eq!(count_mines(&game), 0, "no mines before the first reveal");
    let _ = game.reveal(3, 3);
    assert_eq!(count_mines(&game), 10);
    // Further reveals never re-place
    let _ = game.reveal(0, 0);
    assert_eq!(count_mines(&game), 10);
}

#[test]
fn adjacency_matches_neighbor_recount() {
    let mut game = Game::seeded(8, 10, 999).expect("game");
    let _ = game.reveal(0, 0); // trigger placement
    let snap = game.snapshot();
    let size = snap.board.size();
    let mut mine_count = 0;
    for y in 0..size {
        for x in 0..size {
            let tile = &snap.board[(x, y)];
            assert_eq!((tile.x, tile.y), (x, y));
            if tile.mine { mine_count += 1; continue; }
            let adj = neighbors(size, x, y).filter(|&(nx, ny)| snap.board[(nx, ny)].mine).count();
            assert_eq!(tile.adjacent_mines as usize, adj, "adjacency mismatch at ({},{})", x, y);
        }
    }
    assert_eq!(mine_count, game.total_mines());
}

#[test]
fn opening_reveal_can_clear_the_whole_board() {
    // 4x4 ring, single opponent in the far corner: one reveal wins.
    let mut game = Game::with_mines(4, &[(3, 3)]).expect("game");
    let res = game.reveal(0, 0);
    assert_eq!(res, RevealResult::Won);
    assert_eq!(game.status(), GameStatus::Won);
    let snap = game.snapshot();
    let revealed = snap.board.tiles().filter(|t| t.status == TileStatus::Number).count();
    assert_eq!(revealed, 15);
    assert_eq!(snap.board[(3, 3)].status, TileStatus::Hidden);
    assert!(game.duration().is_some());
}

#[test]
fn single_numbered_reveal_does_not_expand() {
    let mut game = Game::with_mines(2, &[(1, 1)]).expect("game");
    assert_eq!(game.reveal(0, 0), RevealResult::Revealed);
    let snap = game.snapshot();
    assert_eq!(snap.board[(0, 0)].status, TileStatus::Number);
    assert_eq!(snap.board[(0, 0)].adjacent_mines, 1);
    assert_eq!(snap.board[(0, 1)].status, TileStatus::Hidden);
    assert_eq!(snap.board[(1, 0)].status, TileStatus::Hidden);
    assert_eq!(game.status(), GameStatus::Playing);

    assert_eq!(game.reveal(0, 1), RevealResult::Revealed);
    assert_eq!(game.reveal(1, 0), RevealResult::Won);
    assert_eq!(game.status(), GameStatus::Won);
    assert!(game.duration().is_some());
}

#[test]
fn flood_fill_opens_zero_region_and_numbered_border_only() {
    // Wall of mines down column 2 splits a 5x5 board in half.
    let wall: Vec<(usize, usize)> = (0..5).map(|y| (2, y)).collect();
    let mut game = Game::with_mines(5, &wall).expect("game");
    let _ = game.reveal(0, 0);
    let snap = game.snapshot();
    for y in 0..5 {
        assert_eq!(snap.board[(0, y)].status, TileStatus::Number, "zero region at (0,{})", y);
        assert_eq!(snap.board[(1, y)].status, TileStatus::Number, "numbered border at (1,{})", y);
        assert_eq!(snap.board[(2, y)].status, TileStatus::Hidden, "mine wall at (2,{})", y);
        assert_eq!(snap.board[(3, y)].status, TileStatus::Hidden, "far side at (3,{})", y);
        assert_eq!(snap.board[(4, y)].status, TileStatus::Hidden, "far side at (4,{})", y);
    }
    assert_eq!(game.status(), GameStatus::Playing);
}

#[test]
fn flagged_tile_blocks_flood_fill_and_stays_flagged() {
    let wall: Vec<(usize, usize)> = (0..5).map(|y| (2, y)).collect();
    let mut game = Game::with_mines(5, &wall).expect("game");
    assert!(game.toggle_flag(0, 2));
    let _ = game.reveal(0, 0);
    let snap = game.snapshot();
    assert_eq!(snap.board[(0, 2)].status, TileStatus::Flagged);
    // The flag cuts the only zero-path down the left column.
    assert_eq!(snap.board[(0, 3)].status, TileStatus::Hidden);
    assert_eq!(snap.board[(0, 4)].status, TileStatus::Hidden);
    assert_eq!(snap.board[(0, 1)].status, TileStatus::Number);
    assert_eq!(snap.board[(1, 2)].status, TileStatus::Number);
}

#[test]
fn revealing_a_mine_discloses_every_mine_even_flagged_ones() {
    let mut game = Game::with_mines(3, &[(0, 0), (2, 2)]).expect("game");
    assert!(game.toggle_flag(0, 0));
    assert_eq!(game.reveal(2, 2), RevealResult::HitMine);
    assert_eq!(game.status(), GameStatus::Lost);
    let snap = game.snapshot();
    assert_eq!(snap.board[(0, 0)].status, TileStatus::Mine);
    assert_eq!(snap.board[(2, 2)].status, TileStatus::Mine);
    // Safe tiles keep whatever status they had.
    assert_eq!(snap.board[(1, 1)].status, TileStatus::Hidden);
    assert!(game.duration().is_some());
}

#[test]
fn finished_matches_ignore_further_commands() {
    let mut game = Game::with_mines(3, &[(2, 2)]).expect("game");
    let _ = game.reveal(2, 2); // first reveal places the preset layout, so this loses
    assert_eq!(game.status(), GameStatus::Lost);
    let before = game.snapshot();

    assert_eq!(game.reveal(0, 0), RevealResult::NoOp);
    assert!(!game.toggle_flag(0, 0));
    let after = game.snapshot();
    assert_eq!(before.board, after.board);
    assert_eq!(before.mines_left, after.mines_left);
    assert_eq!(before.ended_at, after.ended_at);

    // Same for a won match.
    let mut game = Game::with_mines(2, &[(1, 1)]).expect("game");
    let _ = game.reveal(0, 0);
    let _ = game.reveal(0, 1);
    let _ = game.reveal(1, 0);
    assert_eq!(game.status(), GameStatus::Won);
    let before = game.snapshot();
    assert_eq!(game.reveal(1, 1), RevealResult::NoOp);
    assert!(!game.toggle_flag(1, 1));
    assert_eq!(before.board, game.snapshot().board);
}

#[test]
fn flag_counter_tracks_flags_not_mines() {
    let mut game = Game::seeded(5, 3, 7).expect("game");
    assert_eq!(game.mines_left(), 3);
    assert!(game.toggle_flag(0, 0));
    assert!(game.toggle_flag(1, 1));
    assert_eq!(game.mines_left(), 1);
    assert!(game.toggle_flag(0, 0));
    assert_eq!(game.mines_left(), 2);

    // Over-flagging goes negative; the counter is an estimate, not a recount.
    for x in 0..5 {
        let _ = game.toggle_flag(x, 4);
    }
    assert_eq!(game.mines_left(), -3);
}

#[test]
fn flags_cannot_touch_revealed_tiles_and_block_reveals() {
    let mut game = Game::with_mines(3, &[(2, 2)]).expect("game");
    let _ = game.reveal(0, 0);
    assert_eq!(game.tile(0, 0).unwrap().status, TileStatus::Number);
    let left = game.mines_left();
    assert!(!game.toggle_flag(0, 0), "revealed tiles cannot be flagged");
    assert_eq!(game.mines_left(), left);

    let mut game = Game::with_mines(3, &[(2, 2)]).expect("game");
    assert!(game.toggle_flag(1, 1));
    assert_eq!(game.reveal(1, 1), RevealResult::NoOp, "flagged tiles cannot be revealed");
    assert_eq!(game.tile(1, 1).unwrap().status, TileStatus::Flagged);
}

#[test]
fn reset_starts_a_fresh_unplaced_match() {
    let mut game = Game::seeded(6, 5, 11).expect("game");
    let _ = game.reveal(0, 0);
    let _ = game.toggle_flag(5, 5);
    game.reset();

    let snap = game.snapshot();
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.mines_left, 5);
    assert!(snap.ended_at.is_none());
    assert!(snap.board.tiles().all(|t| t.status == TileStatus::Hidden));
    assert_eq!(count_mines(&game), 0, "mines unplaced again after reset");

    // The next opening move is safe again.
    let _ = game.reveal(3, 3);
    assert_ne!(game.status(), GameStatus::Lost);
    assert_eq!(count_mines(&game), 5);
}

#[test]
fn reset_leaves_a_lost_match() {
    let mut game = Game::with_mines(3, &[(1, 1)]).expect("game");
    let _ = game.reveal(1, 1);
    assert_eq!(game.status(), GameStatus::Lost);
    game.reset();
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.duration().is_none());
}

#[test]
fn duration_is_none_while_playing() {
    let mut game = Game::seeded(5, 3, 21).expect("game");
    assert!(game.duration().is_none());
    let _ = game.reveal(2, 2);
    if game.status() == GameStatus::Playing {
        assert!(game.duration().is_none());
    }
}

#[test]
fn win_accepts_any_mix_of_hidden_and_flagged_mines() {
    // Flags are never validated; a flagged mine and a hidden mine both count.
    let mut game = Game::with_mines(2, &[(1, 1)]).expect("game");
    let _ = game.reveal(0, 0);
    assert!(game.toggle_flag(1, 1));
    let _ = game.reveal(0, 1);
    assert_eq!(game.reveal(1, 0), RevealResult::Won);
    assert_eq!(game.tile(1, 1).unwrap().status, TileStatus::Flagged);
}

#[test]
fn invalid_configurations_fail_fast() {
    assert_eq!(Game::new(0, 0).unwrap_err(), GameError::ZeroBoardSize);
    assert_eq!(
        Game::seeded(3, 9, 1).unwrap_err(),
        GameError::TooManyMines { mines: 9, tiles: 9 }
    );
    assert!(matches!(Game::new(3, 100).unwrap_err(), GameError::TooManyMines { .. }));
    assert_eq!(
        Game::with_mines(3, &[(0, 0), (3, 0)]).unwrap_err(),
        GameError::MineOutOfBounds(3, 0)
    );
}

#[test]
fn out_of_bounds_commands_are_no_ops() {
    let mut game = Game::seeded(5, 3, 77).expect("game");
    assert_eq!(game.reveal(5, 0), RevealResult::NoOp);
    assert_eq!(game.reveal(99, 99), RevealResult::NoOp);
    assert!(!game.toggle_flag(0, 5));
    assert_eq!(game.mines_left(), 3);
    assert_eq!(count_mines(&game), 0, "an out-of-bounds reveal must not place mines");
}

#[test]
fn snapshots_are_independent_of_the_engine() {
    let mut game = Game::with_mines(3, &[(2, 2)]).expect("game");
    let mut snap = game.snapshot();
    snap.board[(0, 0)].status = TileStatus::Flagged;
    assert_eq!(game.tile(0, 0).unwrap().status, TileStatus::Hidden, "mutating a snapshot must not reach the engine");

    let before = game.snapshot();
    let _ = game.reveal(0, 0);
    assert_eq!(before.board[(0, 0)].status, TileStatus::Hidden, "old snapshots must not see later moves");
    assert_eq!(game.tile(0, 0).unwrap().status, TileStatus::Number);
}

#[test]
fn same_seed_and_opening_give_the_same_board() {
    let mut a = Game::seeded(9, 10, 4242).expect("game");
    let mut b = Game::seeded(9, 10, 4242).expect("game");
    let _ = a.reveal(4, 4);
    let _ = b.reveal(4, 4);
    assert_eq!(a.snapshot().board, b.snapshot().board);
}
