use solver_2048::engine::{self, Board};
use solver_2048::strategy::{ExpectimaxDepth, Strategy};
use solver_2048::heuristics;

fn main() {
    engine::init();
    let mut policy = ExpectimaxDepth::new(4, heuristics::corner);
    let mut rng = rand::thread_rng();
    let mut board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    println!("{}", board);
    let mut move_count = 0u32;
    while !board.is_game_over() {
        let dir = policy.pick_move(board);
        board = board.make_move(dir, &mut rng);
        move_count += 1;
        println!("{}", board);
    }
    println!(
        "Moves made: {}, final score: {}, highest tile: {}",
        move_count,
        board.score(),
        board.highest_tile()
    );
}
