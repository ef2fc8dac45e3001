#![allow(clippy::needless_range_loop)]

mod bounding_box;
mod cache;
mod document;
mod error;
mod landmark;
mod mesh;
mod misc;
mod session;
mod store;
mod tps;

pub mod prelude {
    pub use crate::bounding_box::*;
    pub use crate::cache::*;
    pub use crate::document::*;
    pub use crate::error::*;
    pub use crate::landmark::*;
    pub use crate::mesh::*;
    pub use crate::misc::*;
    pub use crate::session::*;
    pub use crate::store::*;
    pub use crate::tps::*;
}
