//! Background tasks attached to a running session.

pub(crate) mod stderr;
pub(crate) mod wait;
pub(crate) mod write;
