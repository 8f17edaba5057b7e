//! The rendering capability the history engine draws onto.

use super::shape::Shape;

/// Anything that can render shapes and be wiped clean.
///
/// Calls are synchronous; implementations must finish drawing before
/// returning. Marshalling onto another thread, if a host needs it, is the
/// implementation's job.
pub trait Surface {
    /// Draws one shape on top of whatever is already there.
    fn draw(&mut self, shape: &Shape);

    /// Erases the whole surface.
    fn clear(&mut self);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn draw(&mut self, shape: &Shape) {
        (**self).draw(shape);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn draw(&mut self, shape: &Shape) {
        (**self).draw(shape);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
