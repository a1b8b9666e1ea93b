//! Drawstring Core Library
//!
//! Platform-agnostic data structures and interaction logic for the Drawstring
//! sketchpad: shapes, camera, undo history and the pointer state machine.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod shapes;
pub mod shortcuts;
pub mod store;
pub mod tools;

pub use camera::Camera;
pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use history::History;
pub use input::{KeyInput, ModifierKey, Modifiers, PointerButton, PointerInput, WheelInput};
pub use interaction::{Command, Engine, InteractionState, MoveState, Response, Viewport};
pub use shapes::{Shape, ShapeColor, ShapeId, ShapeStyle, Stroke, StrokePoint};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use store::ShapeStore;
pub use tools::{ToolKind, ToolManager};
