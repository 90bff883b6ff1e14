//! Discussion subdomain: the append-only [`DiscussionLog`](log::DiscussionLog)
//! and the derived [`Whiteboard`](whiteboard::Whiteboard).

pub mod log;
pub mod whiteboard;
