//! Per-frame bottom sheet pipeline
//!
//! Inputs (`drag`, `scroll`, `snap_to`) only record state. Each `tick`
//! evaluates the stages in a fixed order: gesture routing and scroll
//! compensation, destination selection, animation, settle reporting.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::animation::{AnimationFrame, Animator};
use crate::compensation::ScrollCompensation;
use crate::config::SheetConfig;
use crate::destination::{project_end_offset, select_destination};
use crate::gesture::{Channel, GestureRouter, GestureState};
use crate::settle::{policy_from_config, DecelerationPolicy, SettleNotifier};
use crate::snap_points::{SnapPointTable, SNAP_EPSILON};
use crate::{Error, Result};

/// Directive for the content adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCommand {
    /// Scroll content back to its top to cancel leftover glide
    ScrollToTop,
}

/// Values published after every tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineOutput {
    /// Sheet offset from the top of the container
    pub current_offset: f64,
    /// 1 = fully open, 0 = fully closed
    pub normalized_position: f64,
    /// Snap index while the sheet is at rest on one
    pub resting_index: Option<usize>,
    /// Deceleration rate the content adapter should use
    pub deceleration_rate: f64,
    /// Distance a content drag travels before content may scroll
    pub scroll_activation_distance: f64,
    /// One-shot directive raised this tick
    pub content_command: Option<ContentCommand>,
}

/// Snap-point gesture and animation engine for one bottom sheet
#[derive(Debug)]
pub struct BottomSheetEngine {
    config: SheetConfig,
    table: SnapPointTable,
    router: GestureRouter,
    compensation: ScrollCompensation,
    animator: Animator,
    notifier: SettleNotifier,
    deceleration: Box<dyn DecelerationPolicy>,
    /// Offset the sheet rests at when neither dragged nor animating
    rest_offset: f64,
    /// Snap index of `rest_offset`, `None` after an interrupted animation
    rest_index: Option<usize>,
    /// Snap index the running animation heads for
    target_index: Option<usize>,
    /// Raw translation treated as zero for the current gesture
    drag_origin: f64,
    /// The current gesture was overridden by `snap_to`
    detached: bool,
    pending_snap: Option<usize>,
    deceleration_rate: f64,
    output: EngineOutput,
}

impl BottomSheetEngine {
    /// Build an engine resting at `config.initial_snap_index`
    pub fn new(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        let table = SnapPointTable::resolve(&config.snap_points, config.container_height, config.top_inset)?;

        let initial = config.initial_snap_index;
        let rest_offset = table.get(initial).ok_or_else(|| {
            Error::Config(format!(
                "initial_snap_index {} out of range for {} snap points",
                initial,
                table.len()
            ))
        })?;

        let animator = Animator::new(config.animation.clone(), rest_offset)?;
        let deceleration = policy_from_config(&config);
        let deceleration_rate = deceleration.rate_for(initial);

        info!(snap_points = ?table.points(), initial, "Bottom sheet engine ready");

        let mut engine = Self {
            config,
            table,
            router: GestureRouter::new(),
            compensation: ScrollCompensation::new(false),
            animator,
            notifier: SettleNotifier::new(),
            deceleration,
            rest_offset,
            rest_index: Some(initial),
            target_index: None,
            drag_origin: 0.0,
            detached: false,
            pending_snap: None,
            deceleration_rate,
            output: EngineOutput {
                current_offset: rest_offset,
                normalized_position: 0.0,
                resting_index: Some(initial),
                deceleration_rate,
                scroll_activation_distance: 0.0,
                content_command: None,
            },
        };
        engine.output = engine.compute_output(None, None);
        Ok(engine)
    }

    /// Register the host callback fired when the sheet settles at a new index
    pub fn on_settle(&mut self, callback: impl FnMut(usize) + 'static) {
        self.notifier.set_callback(Box::new(callback));
    }

    /// Replace the deceleration policy derived from configuration
    pub fn set_deceleration_policy(&mut self, policy: Box<dyn DecelerationPolicy>) {
        self.deceleration = policy;
        if let Some(index) = self.rest_index {
            self.deceleration_rate = self.deceleration.rate_for(index);
            self.output.deceleration_rate = self.deceleration_rate;
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn table(&self) -> &SnapPointTable {
        &self.table
    }

    /// Output of the most recent tick
    pub fn output(&self) -> &EngineOutput {
        &self.output
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_dragging(&self) -> bool {
        !self.detached && self.router.is_dragging()
    }

    /// Record a drag event from the handle or content channel
    pub fn drag(&mut self, channel: Channel, state: GestureState, translation: f64, velocity: f64) {
        self.router.push_drag(channel, state, translation, velocity);
    }

    /// Record the inner content's scroll offset
    pub fn scroll(&mut self, offset: f64) {
        self.router.push_scroll(offset);
    }

    /// Animate to `index` on the next tick
    pub fn snap_to(&mut self, index: usize) -> Result<()> {
        let target = self.table.get(index).ok_or(Error::Range {
            index,
            len: self.table.len(),
        })?;

        debug!(index, target, "Snap requested");
        self.compensation
            .snap_requested((target - self.table.top()).abs() <= SNAP_EPSILON);
        self.pending_snap = Some(index);
        Ok(())
    }

    /// Re-resolve snap points after the container was resized
    pub fn set_container_height(&mut self, container_height: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.container_height = container_height;
        config.validate()?;
        let table = SnapPointTable::resolve(&config.snap_points, container_height, config.top_inset)?;

        let lower_bound = if config.enable_over_scroll {
            container_height.max(table.bottom())
        } else {
            table.bottom()
        };
        self.rest_offset = match self.rest_index {
            Some(index) => table.points()[index],
            None => self.rest_offset.clamp(table.top(), lower_bound),
        };
        if let Some(index) = self.target_index.filter(|_| self.animator.is_animating()) {
            let from = self.animator.position().clamp(table.top(), lower_bound);
            self.animator.start(from, table.points()[index]);
        } else if !self.animator.is_animating() {
            self.animator.set_position(self.rest_offset);
        }

        info!(container_height, snap_points = ?table.points(), "Snap points re-resolved");
        self.config = config;
        self.table = table;
        self.output = self.compute_output(self.live_drag(), None);
        Ok(())
    }

    /// Advance one frame and publish the new output
    pub fn tick(&mut self, dt: Duration) -> &EngineOutput {
        let mut content_command = None;
        let mut started = false;

        // Gesture routing and scroll compensation
        if let Some(channel) = self.router.take_began() {
            self.begin_gesture(channel);
        }
        self.track_drag();

        // Destination selection
        if let Some(sample) = self.router.take_ended() {
            if self.detached {
                self.detached = false;
            } else {
                content_command = self.end_gesture(sample.translation, sample.velocity);
                started = true;
            }
        }
        if let Some(index) = self.pending_snap.take() {
            let from = self.live_offset(self.live_drag());
            if self.router.is_dragging() {
                self.detached = true;
            }
            self.drag_origin = 0.0;
            self.animator.start(from, self.table.points()[index]);
            self.target_index = Some(index);
            self.rest_index = None;
            started = true;
        }

        // Animation; a run publishes its starting offset on the tick it starts
        if !started {
            if let AnimationFrame::Finished(offset) = self.animator.update(dt) {
                self.settle(offset);
            }
        }

        self.output = self.compute_output(self.live_drag(), content_command);
        &self.output
    }

    fn begin_gesture(&mut self, channel: Channel) {
        self.detached = false;
        self.drag_origin = 0.0;

        if let Some(frozen) = self.animator.interrupt() {
            self.rest_offset = frozen;
            self.rest_index = self.table.index_of(frozen);
            self.target_index = None;
        }

        let at_top = (self.rest_offset - self.table.top()).abs() <= SNAP_EPSILON;
        self.compensation.begin_gesture(channel, at_top);
        debug!(
            ?channel,
            rest_offset = self.rest_offset,
            via_handle = self.compensation.dragging_via_handle(),
            "Gesture began"
        );
    }

    fn track_drag(&mut self) {
        let Some(drag_y) = self.live_drag() else {
            return;
        };

        let top = self.table.top();
        let rest_is_snap_point = self.table.contains(self.rest_offset);
        if self
            .compensation
            .crossed_top(self.rest_offset, drag_y, top, rest_is_snap_point)
        {
            // Keep rest + drag constant while re-anchoring at the top
            self.drag_origin += top - self.rest_offset;
            self.rest_offset = top;
            self.rest_index = Some(0);
            self.compensation.release_handle();
            self.router.set_drag_start_scroll(self.router.scroll_offset());
        }

        if let Some(drag_y) = self.live_drag() {
            self.compensation
                .observe(drag_y, self.router.drag_start_scroll());
        }
    }

    fn end_gesture(&mut self, translation: f64, velocity: f64) -> Option<ContentCommand> {
        let drag_y = translation - self.drag_origin;
        let drag_start_scroll = self.router.drag_start_scroll();
        self.compensation.observe(drag_y, drag_start_scroll);

        let from = self.live_offset(Some(drag_y));
        let effective = self.compensation.effective_translation(drag_y, drag_start_scroll);
        let extra = self.compensation.extra_offset(drag_start_scroll);
        let end_offset_y = project_end_offset(self.rest_offset, effective, velocity, self.config.drag_toss());
        let destination = select_destination(&self.table, end_offset_y, extra);

        debug!(
            drag_y,
            velocity,
            end_offset_y,
            extra,
            index = destination.index,
            "Destination selected"
        );

        let pulled_past_scroll =
            !self.compensation.dragging_via_handle() && drag_y > drag_start_scroll;

        self.compensation.finish_gesture();
        self.drag_origin = 0.0;
        self.animator.start_with_velocity(from, destination.offset, velocity);
        self.target_index = Some(destination.index);
        self.rest_index = None;

        pulled_past_scroll.then_some(ContentCommand::ScrollToTop)
    }

    fn settle(&mut self, offset: f64) {
        self.rest_offset = offset;
        self.target_index = None;
        self.rest_index = self.table.index_of(offset);

        if let Some(index) = self.rest_index {
            self.compensation.settled(index == 0);
            self.deceleration_rate = self.deceleration.rate_for(index);
            self.notifier.settle(index);
        }
    }

    /// Current gesture translation relative to its origin, if a drag is live
    fn live_drag(&self) -> Option<f64> {
        if self.detached {
            return None;
        }
        self.router
            .active_sample()
            .map(|sample| sample.translation - self.drag_origin)
    }

    fn lower_bound(&self) -> f64 {
        if self.config.enable_over_scroll {
            self.config.container_height.max(self.table.bottom())
        } else {
            self.table.bottom()
        }
    }

    fn live_offset(&self, drag_y: Option<f64>) -> f64 {
        let base = if self.animator.is_animating() {
            self.animator.position()
        } else {
            self.rest_offset
        };
        let raw = match drag_y {
            Some(drag_y) => {
                base + drag_y - self.compensation.compensation(self.router.drag_start_scroll())
            }
            None => base,
        };
        raw.clamp(self.table.top(), self.lower_bound())
    }

    fn compute_output(&self, drag_y: Option<f64>, content_command: Option<ContentCommand>) -> EngineOutput {
        let current_offset = self.live_offset(drag_y);
        let at_rest = !self.animator.is_animating() && drag_y.is_none();
        let last_snap = self.animator.target().unwrap_or(self.rest_offset);

        EngineOutput {
            current_offset,
            normalized_position: self.table.normalize(current_offset),
            resting_index: if at_rest { self.rest_index } else { None },
            deceleration_rate: self.deceleration_rate,
            scroll_activation_distance: (last_snap - self.table.top()).max(0.0),
            content_command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimationConfig, SnapPointSpec, SpringConfig};
    use crate::settle::{FixedDeceleration, IOS_NORMAL_DECELERATION_RATE};
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    fn config(initial: usize) -> SheetConfig {
        SheetConfig {
            snap_points: vec![100.0.into(), "50%".into(), 600.0.into()],
            initial_snap_index: initial,
            container_height: 800.0,
            ..Default::default()
        }
    }

    fn engine_with_log(config: SheetConfig) -> (BottomSheetEngine, Rc<RefCell<Vec<usize>>>) {
        let settles = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&settles);
        let mut engine = BottomSheetEngine::new(config).unwrap();
        engine.on_settle(move |index| sink.borrow_mut().push(index));
        (engine, settles)
    }

    fn run_until_idle(engine: &mut BottomSheetEngine) -> EngineOutput {
        for _ in 0..1000 {
            let output = engine.tick(FRAME).clone();
            if !engine.is_animating() && !engine.is_dragging() {
                return output;
            }
        }
        panic!("engine did not come to rest");
    }

    fn drag(engine: &mut BottomSheetEngine, channel: Channel, moves: &[f64], velocity: f64) {
        engine.drag(channel, GestureState::Began, 0.0, 0.0);
        engine.tick(FRAME);
        for &translation in moves {
            engine.drag(channel, GestureState::Active, translation, velocity);
            engine.tick(FRAME);
        }
        let last = moves.last().copied().unwrap_or(0.0);
        engine.drag(channel, GestureState::Ended, last, velocity);
    }

    #[test]
    fn test_initial_state() {
        let engine = BottomSheetEngine::new(config(1)).unwrap();
        assert_eq!(engine.table().points(), &[100.0, 400.0, 600.0]);
        let output = engine.output();
        assert_eq!(output.current_offset, 400.0);
        assert!((output.normalized_position - 0.4).abs() < 1e-9);
        assert_eq!(output.resting_index, Some(1));
        assert_eq!(output.deceleration_rate, 0.0);
        assert_eq!(output.scroll_activation_distance, 300.0);
    }

    #[test]
    fn test_initial_index_out_of_range() {
        let result = BottomSheetEngine::new(config(3));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_snap_point_is_config_error() {
        let config = SheetConfig {
            snap_points: vec![SnapPointSpec::Percent("half".to_string())],
            ..Default::default()
        };
        assert!(matches!(BottomSheetEngine::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_snap_to_settles_once() {
        let (mut engine, settles) = engine_with_log(config(0));
        engine.snap_to(1).unwrap();

        let first = engine.tick(FRAME).clone();
        assert_eq!(first.current_offset, 100.0);
        assert!(engine.is_animating());
        assert_eq!(first.resting_index, None);

        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 400.0);
        assert!((output.normalized_position - 0.4).abs() < 1e-9);
        assert_eq!(output.resting_index, Some(1));
        assert_eq!(*settles.borrow(), vec![1]);

        for _ in 0..10 {
            engine.tick(FRAME);
        }
        assert_eq!(*settles.borrow(), vec![1]);
    }

    #[test]
    fn test_snap_to_out_of_range_leaves_state() {
        let (mut engine, settles) = engine_with_log(config(2));
        let before = engine.output().clone();

        let err = engine.snap_to(3).unwrap_err();
        assert!(matches!(err, Error::Range { index: 3, len: 3 }));

        let after = engine.tick(FRAME).clone();
        assert_eq!(after, before);
        assert!(!engine.is_animating());
        assert!(settles.borrow().is_empty());
    }

    #[test]
    fn test_fling_up_selects_top() {
        let (mut engine, settles) = engine_with_log(config(1));
        drag(&mut engine, Channel::Handle, &[-20.0, -50.0], -2000.0);

        let release = engine.tick(FRAME).clone();
        assert_eq!(release.current_offset, 350.0);
        assert_eq!(engine.animator.target(), Some(100.0));

        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 100.0);
        assert_eq!(output.resting_index, Some(0));
        assert_eq!(output.deceleration_rate, IOS_NORMAL_DECELERATION_RATE);
        assert_eq!(*settles.borrow(), vec![0]);
    }

    #[test]
    fn test_drag_tracks_live_offset() {
        let mut engine = BottomSheetEngine::new(config(1)).unwrap();
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, 75.0, 300.0);
        let output = engine.tick(FRAME).clone();
        assert_eq!(output.current_offset, 475.0);
        assert_eq!(output.resting_index, None);

        // clamped at the most closed snap point
        engine.drag(Channel::Handle, GestureState::Active, 400.0, 300.0);
        assert_eq!(engine.tick(FRAME).current_offset, 600.0);

        // clamped at the most open snap point
        engine.drag(Channel::Handle, GestureState::Active, -400.0, 300.0);
        assert_eq!(engine.tick(FRAME).current_offset, 100.0);
    }

    #[test]
    fn test_over_scroll_allows_dragging_past_bottom() {
        let mut config = config(2);
        config.enable_over_scroll = true;
        let mut engine = BottomSheetEngine::new(config).unwrap();

        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, 150.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 750.0);
        engine.drag(Channel::Handle, GestureState::Active, 400.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 800.0);

        engine.drag(Channel::Handle, GestureState::Ended, 400.0, 0.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 600.0);
    }

    #[test]
    fn test_interruption_is_continuous() {
        let (mut engine, settles) = engine_with_log(config(0));
        engine.snap_to(2).unwrap();
        for _ in 0..6 {
            engine.tick(FRAME);
        }
        assert!(engine.is_animating());
        let before = engine.output().current_offset;
        assert!(before > 100.0 && before < 600.0);

        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        let after = engine.tick(FRAME).clone();
        assert!((after.current_offset - before).abs() < 1e-9);
        assert!(!engine.is_animating());

        // Holding still keeps the frozen position
        for _ in 0..5 {
            assert!((engine.tick(FRAME).current_offset - before).abs() < 1e-9);
        }

        engine.drag(Channel::Content, GestureState::Active, 30.0, 0.0);
        assert!((engine.tick(FRAME).current_offset - (before + 30.0)).abs() < 1e-9);

        engine.drag(Channel::Content, GestureState::Ended, 30.0, 0.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(1));
        assert_eq!(*settles.borrow(), vec![1]);
    }

    #[test]
    fn test_tap_during_animation_resumes_to_nearest() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        engine.snap_to(2).unwrap();
        for _ in 0..4 {
            engine.tick(FRAME);
        }
        let frozen = engine.output().current_offset;

        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Ended, 0.0, 0.0);
        let output = engine.tick(FRAME).clone();
        assert!((output.current_offset - frozen).abs() < 1e-9);

        let output = run_until_idle(&mut engine);
        let expected = select_destination(engine.table(), frozen, 0.0).offset;
        assert_eq!(output.current_offset, expected);
    }

    #[test]
    fn test_content_drag_consumes_scroll_then_moves_sheet() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        engine.scroll(120.0);
        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Content, GestureState::Active, 0.0, 0.0);
        engine.tick(FRAME);

        engine.scroll(40.0);
        engine.drag(Channel::Content, GestureState::Active, 80.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 100.0);

        engine.scroll(0.0);
        engine.drag(Channel::Content, GestureState::Active, 120.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 100.0);

        engine.drag(Channel::Content, GestureState::Active, 200.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 180.0);
        assert!(engine.compensation.scroll_then_pull());

        engine.drag(Channel::Content, GestureState::Active, 450.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 430.0);

        engine.drag(Channel::Content, GestureState::Ended, 450.0, 0.0);
        let release = engine.tick(FRAME).clone();
        assert_eq!(release.current_offset, 430.0);
        assert_eq!(release.content_command, Some(ContentCommand::ScrollToTop));
        assert_eq!(engine.animator.target(), Some(400.0));

        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(1));
        assert_eq!(output.content_command, None);
    }

    #[test]
    fn test_content_drag_within_scroll_returns_to_top() {
        let (mut engine, settles) = engine_with_log(config(0));
        engine.scroll(120.0);
        drag(&mut engine, Channel::Content, &[40.0, 80.0], 0.0);

        let release = engine.tick(FRAME).clone();
        assert_eq!(release.current_offset, 100.0);
        assert_eq!(release.content_command, None);

        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(0));
        assert_eq!(*settles.borrow(), vec![0]);
    }

    #[test]
    fn test_moving_back_after_consuming_scroll_keeps_pull_offset() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        engine.scroll(120.0);
        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Content, GestureState::Active, 0.0, 0.0);
        engine.tick(FRAME);

        engine.drag(Channel::Content, GestureState::Active, 200.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 180.0);
        engine.drag(Channel::Content, GestureState::Active, 100.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 100.0);
        assert!(engine.compensation.scroll_then_pull());

        // end = 100 - 20 + 0.05 * 5000 = 330, closest shifted entry is 220
        engine.drag(Channel::Content, GestureState::Ended, 100.0, 5000.0);
        engine.tick(FRAME);
        assert_eq!(engine.animator.target(), Some(100.0));
        assert!(!engine.compensation.scroll_then_pull());
    }

    #[test]
    fn test_handle_cancel_while_content_drags_keeps_tracking() {
        let mut engine = BottomSheetEngine::new(config(1)).unwrap();
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, 10.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 410.0);

        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Content, GestureState::Active, 20.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Idle, 10.0, 0.0);
        for _ in 0..5 {
            let output = engine.tick(FRAME).clone();
            assert!(!engine.is_animating());
            assert_eq!(output.current_offset, 420.0);
        }

        engine.drag(Channel::Content, GestureState::Ended, 20.0, 0.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(1));
    }

    #[test]
    fn test_tap_uses_current_scroll_not_previous_gesture() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        engine.scroll(120.0);
        drag(&mut engine, Channel::Content, &[0.0], 0.0);
        assert_eq!(run_until_idle(&mut engine).resting_index, Some(0));

        // Began and Ended land in the same frame, no Active edge
        engine.scroll(0.0);
        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Content, GestureState::Ended, 200.0, 0.0);
        engine.tick(FRAME);
        assert_eq!(engine.animator.target(), Some(400.0));
    }

    #[test]
    fn test_spring_release_keeps_moving_with_the_finger() {
        let mut config = config(1);
        config.animation = AnimationConfig::Spring(SpringConfig::default());
        let mut engine = BottomSheetEngine::new(config).unwrap();

        // A slow drag up released with a quick downward flick of the finger
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, -250.0, 0.0);
        engine.tick(FRAME);
        engine.drag(Channel::Handle, GestureState::Ended, -250.0, 1000.0);
        assert_eq!(engine.tick(FRAME).current_offset, 150.0);
        assert_eq!(engine.animator.target(), Some(100.0));

        assert!(engine.tick(FRAME).current_offset > 150.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 100.0);
    }

    #[test]
    fn test_handle_drag_ignores_content_scroll() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        engine.scroll(120.0);
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, 50.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 150.0);
    }

    #[test]
    fn test_repeated_settle_not_reported() {
        let (mut engine, settles) = engine_with_log(config(0));
        engine.snap_to(1).unwrap();
        run_until_idle(&mut engine);

        drag(&mut engine, Channel::Handle, &[10.0], 0.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 400.0);

        engine.snap_to(1).unwrap();
        run_until_idle(&mut engine);
        assert_eq!(*settles.borrow(), vec![1]);
    }

    #[test]
    fn test_handle_drag_past_top_hands_over_to_content() {
        let mut engine = BottomSheetEngine::new(config(1)).unwrap();
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, -200.0, 0.0);
        engine.tick(FRAME);
        assert!(engine.compensation.dragging_via_handle());

        engine.drag(Channel::Handle, GestureState::Active, -350.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 100.0);
        assert!(!engine.compensation.dragging_via_handle());
        assert_eq!(engine.rest_offset, 100.0);

        // Reversing without releasing follows the finger from where it crossed
        engine.drag(Channel::Handle, GestureState::Active, -250.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 150.0);

        engine.drag(Channel::Handle, GestureState::Ended, -250.0, 0.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(0));
    }

    #[test]
    fn test_content_drag_below_top_moves_sheet_directly() {
        let mut engine = BottomSheetEngine::new(config(1)).unwrap();
        engine.scroll(90.0);
        engine.drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Content, GestureState::Active, 40.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 440.0);
    }

    #[test]
    fn test_deceleration_follows_resting_index() {
        let mut engine = BottomSheetEngine::new(config(0)).unwrap();
        assert_eq!(engine.output().deceleration_rate, IOS_NORMAL_DECELERATION_RATE);

        engine.snap_to(2).unwrap();
        assert_eq!(run_until_idle(&mut engine).deceleration_rate, 0.0);

        engine.snap_to(0).unwrap();
        assert_eq!(
            run_until_idle(&mut engine).deceleration_rate,
            IOS_NORMAL_DECELERATION_RATE
        );

        engine.set_deceleration_policy(Box::new(FixedDeceleration(0.5)));
        assert_eq!(engine.output().deceleration_rate, 0.5);
    }

    #[test]
    fn test_spring_animation_settles() {
        let mut config = config(2);
        config.animation = AnimationConfig::Spring(SpringConfig::default());
        let (mut engine, settles) = engine_with_log(config);

        engine.snap_to(0).unwrap();
        let mut previous = engine.tick(FRAME).current_offset;
        while engine.is_animating() {
            let offset = engine.tick(FRAME).current_offset;
            assert!(offset <= previous);
            assert!(offset >= 100.0);
            previous = offset;
        }
        assert_eq!(engine.output().current_offset, 100.0);
        assert_eq!(*settles.borrow(), vec![0]);
    }

    #[test]
    fn test_snap_to_during_drag_detaches_gesture() {
        let (mut engine, settles) = engine_with_log(config(1));
        engine.drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Active, 60.0, 0.0);
        assert_eq!(engine.tick(FRAME).current_offset, 460.0);

        engine.snap_to(0).unwrap();
        assert_eq!(engine.tick(FRAME).current_offset, 460.0);
        assert!(!engine.is_dragging());

        // The rest of the overridden gesture is ignored
        engine.drag(Channel::Handle, GestureState::Active, 120.0, 0.0);
        engine.drag(Channel::Handle, GestureState::Ended, 120.0, 900.0);
        let output = run_until_idle(&mut engine);
        assert_eq!(output.resting_index, Some(0));
        assert_eq!(*settles.borrow(), vec![0]);
    }

    #[test]
    fn test_container_resize_re_resolves_table() {
        let config = SheetConfig {
            snap_points: vec![100.0.into(), "50%".into(), "100%".into()],
            initial_snap_index: 1,
            container_height: 800.0,
            ..Default::default()
        };
        let mut engine = BottomSheetEngine::new(config).unwrap();
        assert_eq!(engine.output().current_offset, 400.0);

        engine.set_container_height(1000.0).unwrap();
        assert_eq!(engine.table().points(), &[100.0, 500.0, 1000.0]);
        assert_eq!(engine.tick(FRAME).current_offset, 500.0);
        assert_eq!(engine.output().resting_index, Some(1));

        assert!(engine.set_container_height(0.0).is_err());
        assert_eq!(engine.table().points(), &[100.0, 500.0, 1000.0]);
    }

    #[test]
    fn test_container_resize_retargets_running_animation() {
        let config = SheetConfig {
            snap_points: vec![100.0.into(), "50%".into(), "100%".into()],
            initial_snap_index: 0,
            container_height: 800.0,
            ..Default::default()
        };
        let (mut engine, settles) = engine_with_log(config);
        engine.snap_to(2).unwrap();
        engine.tick(FRAME);
        engine.tick(FRAME);

        engine.set_container_height(1000.0).unwrap();
        let output = run_until_idle(&mut engine);
        assert_eq!(output.current_offset, 1000.0);
        assert_eq!(*settles.borrow(), vec![2]);
    }
}
