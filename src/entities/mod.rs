//! Relational entity definitions for the asset store.
//!
//! Status columns are closed `DeriveActiveEnum` types; the transition
//! tables live next to each status enum and are consulted by the
//! lifecycle commands.

pub mod assignment;
pub mod category;
pub mod disposal;
pub mod item;
pub mod item_return;
pub mod location;
pub mod maintenance;
pub mod request;
pub mod request_comment;
pub mod user;
