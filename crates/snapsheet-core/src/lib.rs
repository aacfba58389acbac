pub mod animation;
pub mod compensation;
pub mod config;
pub mod destination;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod settle;
pub mod snap_points;

pub use config::{
    AnimationConfig, EasingType, Platform, SheetConfig, SnapPointSpec, SpringConfig, TimingConfig,
};
pub use engine::{BottomSheetEngine, ContentCommand, EngineOutput};
pub use error::{Error, Result};
pub use gesture::{Channel, DragSample, GestureState, ScrollSample};
pub use settle::{DecelerationPolicy, FixedDeceleration};
pub use snap_points::SnapPointTable;
