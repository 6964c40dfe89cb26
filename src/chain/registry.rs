//! Handler chain
//!
//! Ordered (handler, mask) registrations with first-consumer-wins dispatch.

use crate::protocol::Frame;

use super::Mask;

/// What a handler reports back for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// Stop dispatch; later handlers don't see the frame
    Consumed,
    /// Keep walking the chain
    #[default]
    NotConsumed,
}

impl Verdict {
    pub fn is_consumed(self) -> bool {
        self == Verdict::Consumed
    }
}

impl From<bool> for Verdict {
    fn from(consumed: bool) -> Self {
        if consumed {
            Verdict::Consumed
        } else {
            Verdict::NotConsumed
        }
    }
}

/// Handlers that return nothing never consume
impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::NotConsumed
    }
}

/// A frame handler
///
/// Implemented for any `FnMut(&Frame) -> R` where `R` is a [`Verdict`], a
/// `bool` (true = consumed) or `()`.
pub trait FrameHandler {
    fn handle(&mut self, frame: &Frame) -> Verdict;
}

impl<F, R> FrameHandler for F
where
    F: FnMut(&Frame) -> R,
    R: Into<Verdict>,
{
    fn handle(&mut self, frame: &Frame) -> Verdict {
        self(frame).into()
    }
}

/// Where a registration sends matching frames
enum Target<B> {
    /// Handler owned by the chain's owner, identified by tag
    Builtin(B),
    /// Handler owned by the chain
    External(Box<dyn FrameHandler + Send>),
}

struct Registration<B> {
    target: Target<B>,
    mask: Mask,
}

/// Result of dispatching one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of handlers whose mask matched and that were invoked
    pub invoked: usize,

    /// Registration index of the handler that consumed the frame
    pub consumed_by: Option<usize>,
}

/// Ordered list of handler registrations
///
/// Registrations are only ever appended. Handlers must not register new
/// handlers while a dispatch is running.
pub struct HandlerChain<B> {
    registrations: Vec<Registration<B>>,
}

impl<B> HandlerChain<B> {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Append a built-in registration; returns its index
    pub fn register_builtin(&mut self, tag: B, mask: impl Into<Mask>) -> usize {
        self.push(Target::Builtin(tag), mask.into())
    }

    /// Append an external handler; returns its index
    pub fn register<H>(&mut self, handler: H, mask: impl Into<Mask>) -> usize
    where
        H: FrameHandler + Send + 'static,
    {
        self.push(Target::External(Box::new(handler)), mask.into())
    }

    fn push(&mut self, target: Target<B>, mask: Mask) -> usize {
        self.registrations.push(Registration { target, mask });
        self.registrations.len() - 1
    }

    /// Walk the chain in registration order
    ///
    /// Every registration whose mask matches is invoked until one reports
    /// [`Verdict::Consumed`]. Built-in tags are resolved through `builtin`.
    pub fn dispatch<F>(&mut self, frame: &Frame, mut builtin: F) -> DispatchOutcome
    where
        F: FnMut(&B, &Frame) -> Verdict,
    {
        let mut outcome = DispatchOutcome::default();

        for (index, registration) in self.registrations.iter_mut().enumerate() {
            if !registration.mask.matches(frame) {
                continue;
            }

            outcome.invoked += 1;
            let verdict = match &mut registration.target {
                Target::Builtin(tag) => builtin(tag, frame),
                Target::External(handler) => handler.handle(frame),
            };

            if verdict.is_consumed() {
                tracing::trace!("Frame {} consumed by handler #{}", frame, index);
                outcome.consumed_by = Some(index);
                break;
            }
        }

        outcome
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl<B> Default for HandlerChain<B> {
    fn default() -> Self {
        Self::new()
    }
}
