//! Foundation utilities
//!
//! Core building blocks shared by every subsystem: math types, color
//! packing, object pooling, handle-based collections, and logging setup.

pub mod collections;
pub mod color;
pub mod logging;
pub mod math;
pub mod pool;

pub use color::Color;
pub use math::{Mat4, Rect, Size, Transform, Vec2, Vec3, Vec4};
pub use pool::RecyclePool;
