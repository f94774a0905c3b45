use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Donut,
    Square,
    Diamond,
    Lines,
    Oval,
    Ball,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Donut,
        Shape::Square,
        Shape::Diamond,
        Shape::Lines,
        Shape::Oval,
        Shape::Ball,
        Shape::Triangle,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Cyan,
    Pink,
    Lime,
    Teal,
    Gold,
}

impl Color {
    pub const ALL: [Color; 11] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Orange,
        Color::Purple,
        Color::Cyan,
        Color::Pink,
        Color::Lime,
        Color::Teal,
        Color::Gold,
    ];
}

/// Hidden content of a tile. Two tiles match when both fields are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Icon {
    pub shape: Shape,
    pub color: Color,
}

impl Icon {
    pub const fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }
}

/// Shapes and colors a board may draw its icons from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPool")]
pub struct IconPool {
    shapes: Vec<Shape>,
    colors: Vec<Color>,
}

impl IconPool {
    /// Builds a pool, collapsing repeated shapes or colors.
    pub fn new(
        shapes: impl IntoIterator<Item = Shape>,
        colors: impl IntoIterator<Item = Color>,
    ) -> Self {
        let mut shapes: Vec<_> = shapes.into_iter().collect();
        shapes.sort_unstable();
        shapes.dedup();
        let mut colors: Vec<_> = colors.into_iter().collect();
        colors.sort_unstable();
        colors.dedup();
        Self { shapes, colors }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of distinct icons this pool can produce.
    pub fn capacity(&self) -> usize {
        self.shapes.len() * self.colors.len()
    }

    /// Every shape paired with every color, colors outer.
    pub fn icons(&self) -> Vec<Icon> {
        self.colors
            .iter()
            .flat_map(|&color| self.shapes.iter().map(move |&shape| Icon::new(shape, color)))
            .collect()
    }
}

#[derive(Deserialize)]
struct RawPool {
    shapes: Vec<Shape>,
    colors: Vec<Color>,
}

impl From<RawPool> for IconPool {
    fn from(raw: RawPool) -> Self {
        Self::new(raw.shapes, raw.colors)
    }
}

impl Default for IconPool {
    fn default() -> Self {
        Self::new(Shape::ALL, Color::ALL)
    }
}
