use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 1,
        }
    }
    pub fn is_red(self) -> bool {
        self == Color::Red
    }
    /// The two diagonal directions a piece of this color moves in.
    /// Red moves toward increasing rows, black toward decreasing rows.
    pub fn forward(self) -> &'static [Vector; 2] {
        match self {
            Color::Red => &VECTORS_RED,
            Color::Black => &VECTORS_BLACK,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A square on the board. Valid iff both coordinates are in `[0, board_size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Place {
    pub row: i32,
    pub column: i32,
}

impl Place {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn offset(self, v: Vector) -> Place {
        Place {
            row: self.row + v.delta_row,
            column: self.column + v.delta_column,
        }
    }

    pub fn on_board(self, board_size: usize) -> bool {
        let n = board_size as i64;
        (0..n).contains(&(self.row as i64)) && (0..n).contains(&(self.column as i64))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vector {
    pub delta_row: i32,
    pub delta_column: i32,
}

pub const VECTORS_RED: [Vector; 2] = [
    Vector {
        delta_row: 1,
        delta_column: -1,
    },
    Vector {
        delta_row: 1,
        delta_column: 1,
    },
];
pub const VECTORS_BLACK: [Vector; 2] = [
    Vector {
        delta_row: -1,
        delta_column: -1,
    },
    Vector {
        delta_row: -1,
        delta_column: 1,
    },
];

/// A single diagonal step or jump.
///
/// `capture` is set iff the move jumps an opposing piece; it then lies
/// exactly between `from` and `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub from: Place,
    pub to: Place,
    pub capture: Option<Place>,
}

impl Move {
    pub fn new(from: Place, to: Place) -> Self {
        Self {
            from,
            to,
            capture: None,
        }
    }

    pub fn jump(from: Place, over: Place, to: Place) -> Self {
        Self {
            from,
            to,
            capture: Some(over),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }
}
