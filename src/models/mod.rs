/// Pixel buffers
pub mod frame;
/// Points and rectangles
pub mod point;
/// Decoded symbols
pub mod symbol;

pub use frame::{ChannelLayout, Frame};
pub use point::{BoundingRect, Point, PointI};
pub use symbol::{Symbol, SymbolKind};
