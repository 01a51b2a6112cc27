/// Result of running an operation against a [`crate::model::Root`].
///
/// The variant carries the fall-through decision the caller needs: whether to
/// run the change applicator and whether the host editor's default handling
/// of the triggering key should still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The tree and/or selections were mutated; run the applicator.
    Applied,
    /// Nothing changed, but the event is consumed (the host default must not
    /// run). The reason is a short diagnostic for logs.
    Blocked(&'static str),
    /// A precondition was unmet; the caller falls through to the host
    /// editor's default behavior.
    NoOp,
}

impl Outcome {
    /// Whether the applicator needs to reconcile the tree with the buffer.
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Whether the triggering event is consumed.
    pub fn stops_propagation(&self) -> bool {
        !matches!(self, Outcome::NoOp)
    }
}
