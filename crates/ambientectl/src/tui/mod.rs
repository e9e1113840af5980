//! Terminal dashboard
//!
//! The page holds a readings table and five chart mounts. The route decides
//! which one is shown; `t` and `m` navigate between them without restarting.

pub mod event_loop;
pub mod layout;
pub mod render;
pub mod state;

pub use event_loop::run;
