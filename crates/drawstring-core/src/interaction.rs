//! Pointer interaction state machine and toolbar commands.
//!
//! [`Engine`] owns every piece of mutable sketchpad state. Hosts feed it
//! pointer, wheel, key and resize events and toolbar [`Command`]s; each
//! handler runs to completion and returns a [`Response`] saying whether the
//! canvas needs to be redrawn.

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::error::CoreResult;
use crate::geometry;
use crate::history::History;
use crate::input::{KeyInput, PointerButton, PointerInput, TapTracker, WheelInput};
use crate::shapes::{Shape, ShapeColor, ShapeId, ShapeStyle, Stroke};
use crate::shortcuts::ShortcutRegistry;
use crate::store::ShapeStore;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Vec2};

/// What the host should do after an event was handled.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The event was not for the canvas (chrome, unbound key, malformed input).
    Ignored,
    /// State changed without visible effect.
    Handled,
    /// The canvas must be redrawn.
    Redraw,
    /// Render the canvas and hand the pixels to the exporter.
    Export,
}

impl Response {
    pub fn needs_redraw(self) -> bool {
        matches!(self, Response::Redraw | Response::Export)
    }
}

/// Toolbar and keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Undo,
    /// Remove every shape.
    Clear,
    /// Export the rendered canvas as PNG.
    Download,
    DeleteSelected,
    SetTool(ToolKind),
    /// Brush color for new strokes; also recolors the selection.
    SetColor(ShapeColor),
    /// Brush size for new strokes; also resizes the selection.
    SetBrushSize(f64),
    /// Abort the gesture in progress.
    Cancel,
}

/// State of a select-and-move drag.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveState {
    /// World point where the drag started.
    pub start_point: Point,
    /// World point of the last applied move.
    pub current_point: Point,
    /// Selected shapes as they were before the drag, for cancellation.
    pub original_shapes: Vec<Shape>,
    /// Whether any non-zero translation was applied.
    pub moved: bool,
}

impl MoveState {
    pub fn new(start_point: Point, original_shapes: Vec<Shape>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_shapes,
            moved: false,
        }
    }

    /// Total drag delta in world units.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}

/// Gesture state of the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging the camera; `last` is the previous screen position.
    Panning { last: Point },
    /// Building the active stroke.
    Drawing,
    /// Moving the selected shapes.
    SelectingDrag(MoveState),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::Drawing => "drawing",
            InteractionState::SelectingDrag(_) => "selecting-drag",
        }
    }
}

/// Canvas size in logical pixels and the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale_factor: 1.0,
        }
    }
}

impl Viewport {
    /// Backing-store size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = |v: f64| (v * self.scale_factor).round().max(0.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

/// The sketchpad engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    camera: Camera,
    store: ShapeStore,
    history: History,
    tools: ToolManager,
    state: InteractionState,
    taps: TapTracker,
    viewport: Viewport,
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let color = config.initial_color.unwrap_or_else(ShapeColor::random);
        let style = ShapeStyle::new(color, config.default_brush_size);
        log::debug!(
            "engine created: brush {} size {}",
            color.to_hex(),
            config.default_brush_size
        );
        Self {
            camera: Camera::with_limits(config.zoom_min, config.zoom_max),
            store: ShapeStore::new(),
            history: History::new(config.history_capacity),
            tools: ToolManager::new(style),
            state: InteractionState::Idle,
            taps: TapTracker::new(config.double_tap_window(), config.double_tap_distance),
            viewport: Viewport::default(),
            config,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn selection(&self) -> &[ShapeId] {
        self.store.selection()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Style applied to the next stroke.
    pub fn brush(&self) -> &ShapeStyle {
        &self.tools.current_style
    }

    /// The stroke being drawn, not yet in the store.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.tools.active_stroke()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // --- Host events ---

    /// The canvas was resized to `width` x `height` logical pixels.
    pub fn resize(&mut self, width: f64, height: f64, scale_factor: f64) -> Response {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            log::debug!("resize: invalid scale factor {scale_factor}, using 1.0");
            1.0
        };
        self.viewport = Viewport {
            width: sanitize(width),
            height: sanitize(height),
            scale_factor,
        };
        Response::Redraw
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> Response {
        if input.over_chrome {
            return Response::Ignored;
        }
        if !geometry::is_finite_point(input.position) {
            log::debug!("pointer_down: dropping non-finite position {:?}", input.position);
            return Response::Ignored;
        }
        if !self.is_idle() {
            // A second contact while a gesture is running.
            return Response::Ignored;
        }

        let pan_requested = input.button == PointerButton::Middle
            || (input.button == PointerButton::Primary
                && self.config.pan_modifier.is_held(&input.modifiers));
        if pan_requested {
            self.set_state(InteractionState::Panning {
                last: input.position,
            });
            return Response::Handled;
        }
        if input.button != PointerButton::Primary {
            return Response::Ignored;
        }

        match self.tools.current_tool {
            ToolKind::Draw => self.begin_stroke(&input),
            ToolKind::Select => self.begin_select(&input),
        }
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> Response {
        if input.over_chrome {
            return Response::Ignored;
        }
        if !geometry::is_finite_point(input.position) {
            log::debug!("pointer_move: dropping non-finite position {:?}", input.position);
            return Response::Ignored;
        }

        let world = self.camera.screen_to_world(input.position);
        match &mut self.state {
            InteractionState::Idle => Response::Ignored,
            InteractionState::Panning { last } => {
                let delta = input.position - *last;
                *last = input.position;
                self.camera.pan(delta);
                Response::Redraw
            }
            InteractionState::Drawing => {
                match self.tools.update(world, input.normalized_pressure()) {
                    Ok(true) => Response::Redraw,
                    Ok(false) => Response::Ignored,
                    Err(err) => {
                        log::debug!("pointer_move: {err}");
                        Response::Ignored
                    }
                }
            }
            InteractionState::SelectingDrag(move_state) => {
                let delta = world - move_state.current_point;
                move_state.current_point = world;
                if delta == Vec2::ZERO {
                    return Response::Handled;
                }
                move_state.moved = true;
                self.store.translate_selected(delta);
                Response::Redraw
            }
        }
    }

    /// Pointer released: commit the gesture.
    ///
    /// Releases over chrome are ignored like every other chrome event; the
    /// gesture ends on the next release or leave over the canvas.
    pub fn pointer_up(&mut self, input: PointerInput) -> Response {
        if input.over_chrome {
            return Response::Ignored;
        }
        self.finish_gesture()
    }

    /// Pointer left the canvas: same as release.
    pub fn pointer_leave(&mut self) -> Response {
        self.finish_gesture()
    }

    /// The platform aborted the pointer (e.g. touch cancel).
    pub fn pointer_cancel(&mut self) -> Response {
        self.cancel_gesture()
    }

    pub fn wheel(&mut self, input: WheelInput) -> Response {
        if input.over_chrome {
            return Response::Ignored;
        }
        if !geometry::is_finite_point(input.position) || !geometry::is_finite_vec(input.delta) {
            log::debug!("wheel: dropping non-finite input {:?}", input);
            return Response::Ignored;
        }

        if self.config.zoom_modifier.is_held(&input.modifiers) {
            let factor = (-input.delta.y * self.config.wheel_zoom_sensitivity).exp();
            if self.camera.zoom_at(input.position, factor) {
                Response::Redraw
            } else {
                Response::Handled
            }
        } else if input.delta == Vec2::ZERO {
            Response::Handled
        } else {
            self.camera.pan(-input.delta);
            Response::Redraw
        }
    }

    pub fn key(&mut self, input: &KeyInput) -> Response {
        match ShortcutRegistry::lookup(input) {
            Some(command) => self.execute(command),
            None => Response::Ignored,
        }
    }

    /// Run a toolbar or keyboard command.
    pub fn execute(&mut self, command: Command) -> Response {
        log::debug!("command: {command:?}");
        match command {
            Command::Undo => self.undo(),
            Command::Clear => self.clear(),
            Command::Download => Response::Export,
            Command::DeleteSelected => self.delete_selected(),
            Command::SetTool(tool) => self.set_tool(tool),
            Command::SetColor(color) => self.set_color(color),
            Command::SetBrushSize(size) => self.set_brush_size(size),
            Command::Cancel => self.cancel_gesture(),
        }
    }

    // --- Operations ---

    /// Restore the previous snapshot.
    pub fn undo(&mut self) -> Response {
        let cancelled = self.cancel_gesture();
        match self.history.undo() {
            Some(shapes) => {
                log::info!("undo: restoring {} shapes", shapes.len());
                self.store.replace_shapes(shapes);
                Response::Redraw
            }
            None if cancelled.needs_redraw() => Response::Redraw,
            None => Response::Handled,
        }
    }

    /// Remove every shape. Only recorded in history when something was removed.
    pub fn clear(&mut self) -> Response {
        let cancelled = self.cancel_gesture();
        if self.store.is_empty() {
            return if cancelled.needs_redraw() {
                Response::Redraw
            } else {
                Response::Handled
            };
        }
        log::info!("clearing {} shapes", self.store.len());
        self.store.clear();
        self.commit();
        Response::Redraw
    }

    pub fn delete_selected(&mut self) -> Response {
        let cancelled = self.cancel_gesture();
        let removed = self.store.delete_selected();
        if removed == 0 {
            return if cancelled.needs_redraw() {
                Response::Redraw
            } else {
                Response::Handled
            };
        }
        log::info!("deleted {removed} selected shapes");
        self.commit();
        Response::Redraw
    }

    pub fn set_tool(&mut self, tool: ToolKind) -> Response {
        let _ = self.cancel_gesture();
        self.tools.set_tool(tool);
        self.store.clear_selection();
        self.taps.reset();
        log::debug!("tool: {}", tool.name());
        Response::Redraw
    }

    pub fn set_color(&mut self, color: ShapeColor) -> Response {
        self.tools.set_color(color);
        if !self.is_idle() || self.store.recolor_selected(color) == 0 {
            return Response::Handled;
        }
        self.commit();
        Response::Redraw
    }

    pub fn set_brush_size(&mut self, size: f64) -> Response {
        if let Err(err) = self.tools.set_size(size) {
            log::debug!("set_brush_size: {err}");
            return Response::Ignored;
        }
        if !self.is_idle() {
            return Response::Handled;
        }
        match self.store.resize_selected(size) {
            Ok(0) => Response::Handled,
            Ok(_) => {
                self.commit();
                Response::Redraw
            }
            Err(err) => {
                log::debug!("set_brush_size: {err}");
                Response::Ignored
            }
        }
    }

    // --- Gesture helpers ---

    fn set_state(&mut self, state: InteractionState) {
        log::debug!("interaction: {} -> {}", self.state.name(), state.name());
        self.state = state;
    }

    fn begin_stroke(&mut self, input: &PointerInput) -> Response {
        if self.config.double_tap_clears && self.taps.register(input.position, input.timestamp) {
            log::debug!("double tap at {:?}", input.position);
            return match self.clear() {
                Response::Handled => Response::Handled,
                _ => Response::Redraw,
            };
        }

        let world = self.camera.screen_to_world(input.position);
        if let Err(err) = self.tools.begin(world, input.normalized_pressure()) {
            log::debug!("pointer_down: {err}");
            return Response::Ignored;
        }
        self.store.clear_selection();
        self.set_state(InteractionState::Drawing);
        Response::Redraw
    }

    fn begin_select(&mut self, input: &PointerInput) -> Response {
        let world = self.camera.screen_to_world(input.position);
        let tolerance = geometry::world_tolerance(self.config.pick_tolerance, self.camera.zoom);
        let hit = self.store.hit_test(world, tolerance).map(Shape::id);

        match hit {
            Some(id) => {
                if input.modifiers.shift {
                    self.store.add_to_selection(id);
                } else {
                    self.store.select(id);
                }
                let originals = self.store.selected_shapes().cloned().collect();
                self.set_state(InteractionState::SelectingDrag(MoveState::new(world, originals)));
            }
            None => {
                if !input.modifiers.shift {
                    self.store.clear_selection();
                }
                self.set_state(InteractionState::Panning {
                    last: input.position,
                });
            }
        }
        Response::Redraw
    }

    /// Commit the running gesture and return to idle.
    fn finish_gesture(&mut self) -> Response {
        let state = std::mem::take(&mut self.state);
        if state != InteractionState::Idle {
            log::debug!("interaction: {} -> idle (commit)", state.name());
        }
        match state {
            InteractionState::Idle => Response::Ignored,
            InteractionState::Panning { .. } => Response::Handled,
            InteractionState::Drawing => {
                let Some(stroke) = self.tools.end() else {
                    return Response::Redraw;
                };
                match self.store.add_shape(stroke.into()) {
                    Ok(id) => {
                        log::info!("committed stroke {id}");
                        self.commit();
                    }
                    Err(err) => log::debug!("stroke not committed: {err}"),
                }
                Response::Redraw
            }
            InteractionState::SelectingDrag(move_state) => {
                if move_state.moved {
                    log::info!(
                        "moved {} shapes by {:?}",
                        move_state.original_shapes.len(),
                        move_state.delta()
                    );
                    self.commit();
                    Response::Redraw
                } else {
                    Response::Handled
                }
            }
        }
    }

    /// Abort the running gesture without touching history.
    fn cancel_gesture(&mut self) -> Response {
        let state = std::mem::take(&mut self.state);
        if state != InteractionState::Idle {
            log::debug!("interaction: {} -> idle (cancel)", state.name());
        }
        match state {
            InteractionState::Idle => Response::Ignored,
            InteractionState::Panning { .. } => Response::Handled,
            InteractionState::Drawing => {
                self.tools.cancel();
                Response::Redraw
            }
            InteractionState::SelectingDrag(move_state) => {
                if move_state.moved {
                    self.store.restore_shapes(&move_state.original_shapes);
                    Response::Redraw
                } else {
                    Response::Handled
                }
            }
        }
    }

    /// Record the store in history after a committed mutation.
    fn commit(&mut self) {
        self.history.snapshot(self.store.shapes());
    }
}
