//! DNS 模式磁贴：决策引擎、显示投影与宿主事件

pub mod engine;
pub mod host;
pub mod projection;

pub use engine::{next_in_list, ModeCycleEngine, Transition};
pub use host::{Notice, TileHost, TileUpdate};
pub use projection::{TileIcon, TileLabels, TileProjection};
