use crate::draw::{Shape, Surface};

/// Command that draws exactly one shape.
///
/// Operations are immutable and are moved, never copied, between the applied
/// and undone stacks. The surface is supplied at apply time by the history
/// engine, which is the surface's only owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOperation {
    shape: Shape,
}

impl DrawOperation {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Renders the shape on top of the surface's current content.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.draw(&self.shape);
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }
}

impl From<Shape> for DrawOperation {
    fn from(shape: Shape) -> Self {
        Self::new(shape)
    }
}
