//! Plain-text board view: draws the position whenever the session pushes one.

use widget_core::{BoardView, Color, START_FEN};

pub struct TextBoard {
    orientation: Color,
}

impl TextBoard {
    pub fn new() -> Self {
        Self {
            orientation: Color::White,
        }
    }

    fn draw(&self, fen: &str) {
        let placement = fen.split_whitespace().next().unwrap_or("");
        let mut grid: Vec<Vec<char>> = Vec::with_capacity(8);
        for rank in placement.split('/') {
            let mut row = Vec::with_capacity(8);
            for ch in rank.chars() {
                match ch.to_digit(10) {
                    Some(n) => row.extend(std::iter::repeat('.').take(n as usize)),
                    None => row.push(ch),
                }
            }
            grid.push(row);
        }

        // FEN lists rank 8 first; flip everything for the black seat
        if self.orientation == Color::Black {
            grid.reverse();
            for row in &mut grid {
                row.reverse();
            }
        }

        println!();
        for (i, row) in grid.iter().enumerate() {
            let rank_label = match self.orientation {
                Color::White => 8 - i,
                Color::Black => i + 1,
            };
            let cells: String = row.iter().map(|c| format!("{c} ")).collect();
            println!("  {rank_label}  {cells}");
        }
        let files = match self.orientation {
            Color::White => "a b c d e f g h",
            Color::Black => "h g f e d c b a",
        };
        println!("     {files}");
        println!();
    }
}

impl BoardView for TextBoard {
    fn set_position(&mut self, fen: &str) {
        self.draw(fen);
    }

    fn set_orientation(&mut self, color: Color) {
        self.orientation = color;
    }

    fn reset_to_start(&mut self) {
        self.draw(START_FEN);
    }
}
