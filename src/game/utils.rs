use chess::{Board, BoardStatus, Color, Piece};

use crate::game::oracle::{ChessBoard, LegalityOracle};

/// Convert a chess color to a string
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Get the game status as a string
pub fn get_game_status(board: &ChessBoard) -> String {
    let position = board.position();
    match position.status() {
        BoardStatus::Checkmate => match position.side_to_move() {
            Color::White => "black_wins".to_string(),
            Color::Black => "white_wins".to_string(),
        },
        BoardStatus::Stalemate => "stalemate".to_string(),
        BoardStatus::Ongoing => {
            if board.is_draw() {
                "draw".to_string()
            } else if position.checkers().popcnt() > 0 {
                "check".to_string()
            } else if board.side_to_move() == Color::White {
                "white_turn".to_string()
            } else {
                "black_turn".to_string()
            }
        }
    }
}

/// Check if neither side has material left to deliver mate
pub fn has_insufficient_material(board: &Board) -> bool {
    // Any pawn, rook or queen keeps mate possible
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }

    let knights = *board.pieces(Piece::Knight);
    let bishops = *board.pieces(Piece::Bishop);

    // King and a single minor piece against a bare king
    if knights.popcnt() + bishops.popcnt() <= 1 {
        return true;
    }

    // Bishops only, all on squares of one color
    if knights.popcnt() == 0 {
        let mut on_dark = 0;
        let mut on_light = 0;
        for square in bishops {
            if (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 0 {
                on_dark += 1;
            } else {
                on_light += 1;
            }
        }
        return on_dark == 0 || on_light == 0;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn insufficient(fen: &str) -> bool {
        has_insufficient_material(&Board::from_str(fen).unwrap())
    }

    #[test]
    fn minor_piece_endings() {
        assert!(insufficient("8/8/8/4k3/8/8/8/4K3 w - - 0 1"));
        assert!(insufficient("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
        assert!(insufficient("8/8/8/4k3/8/8/8/1N2K3 w - - 0 1"));
        // Bishops on c1 and f8 share a square color
        assert!(insufficient("5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
        // Bishops on c1 and c8 do not
        assert!(!insufficient("2b5/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
        assert!(!insufficient("8/8/8/4k3/8/8/8/1NB1K3 w - - 0 1"));
        assert!(!insufficient("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"));
    }

    #[test]
    fn status_strings() {
        assert_eq!(get_game_status(&ChessBoard::new()), "white_turn");

        let mate = ChessBoard::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert_eq!(get_game_status(&mate), "black_wins");

        let stalemate = ChessBoard::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(get_game_status(&stalemate), "stalemate");

        let bare = ChessBoard::from_fen("8/8/8/4k3/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(get_game_status(&bare), "draw");
    }

    #[test]
    fn color_names() {
        assert_eq!(color_to_string(Color::White), "white");
        assert_eq!(color_to_string(Color::Black), "black");
    }
}
