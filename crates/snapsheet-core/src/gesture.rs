//! Gesture sample routing
//!
//! Two pan channels (the handle and the sheet's content) and one scroll
//! channel feed the engine. The router merges them into a single drag signal
//! and latches gesture edges so a tick never misses a gesture that began and
//! ended between two frames.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Source of a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Handle,
    Content,
}

/// Lifecycle of one discrete drag gesture on a channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    Idle,
    Began,
    Active,
    Ended,
}

/// Latest drag values reported by a channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Signed offset since the gesture started (positive = downwards)
    pub translation: f64,
    /// Signed velocity in points per second
    pub velocity: f64,
    pub channel: Channel,
}

impl DragSample {
    pub fn at_rest(channel: Channel) -> Self {
        Self {
            translation: 0.0,
            velocity: 0.0,
            channel,
        }
    }
}

/// Scroll position of the inner content
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSample {
    pub offset: f64,
}

#[derive(Debug, Clone, Copy)]
struct ChannelTrack {
    state: GestureState,
    sample: DragSample,
}

impl ChannelTrack {
    fn new(channel: Channel) -> Self {
        Self {
            state: GestureState::Idle,
            sample: DragSample::at_rest(channel),
        }
    }

    fn is_live(&self) -> bool {
        matches!(self.state, GestureState::Began | GestureState::Active)
    }
}

/// Merges handle/content drag channels and the content scroll channel
#[derive(Debug, Clone)]
pub struct GestureRouter {
    handle: ChannelTrack,
    content: ChannelTrack,
    scroll: ScrollSample,
    drag_start_scroll: f64,
    began: Option<Channel>,
    ended: Option<DragSample>,
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRouter {
    pub fn new() -> Self {
        Self {
            handle: ChannelTrack::new(Channel::Handle),
            content: ChannelTrack::new(Channel::Content),
            scroll: ScrollSample::default(),
            drag_start_scroll: 0.0,
            began: None,
            ended: None,
        }
    }

    fn track_mut(&mut self, channel: Channel) -> &mut ChannelTrack {
        match channel {
            Channel::Handle => &mut self.handle,
            Channel::Content => &mut self.content,
        }
    }

    /// Record a drag event from one channel
    pub fn push_drag(&mut self, channel: Channel, state: GestureState, translation: f64, velocity: f64) {
        let scroll_offset = self.scroll.offset;
        let track = self.track_mut(channel);
        let previous = track.state;
        track.state = state;
        track.sample = DragSample {
            translation,
            velocity,
            channel,
        };
        let sample = track.sample;

        match (previous, state) {
            (GestureState::Idle | GestureState::Ended, GestureState::Began) => {
                // Provisional until the Active edge; a tap never gets one
                self.drag_start_scroll = scroll_offset;
                debug!(?channel, "Drag began");
                self.began = Some(channel);
            }
            (GestureState::Began, GestureState::Active) => {
                self.drag_start_scroll = scroll_offset;
                debug!(?channel, drag_start_scroll = scroll_offset, "Drag active");
            }
            // Platforms that skip the Began report still get both edges
            (GestureState::Idle | GestureState::Ended, GestureState::Active) => {
                self.began = Some(channel);
                self.drag_start_scroll = scroll_offset;
                debug!(?channel, drag_start_scroll = scroll_offset, "Drag began active");
            }
            (GestureState::Began | GestureState::Active, GestureState::Ended | GestureState::Idle) => {
                self.track_mut(channel).state = GestureState::Ended;
                if self.other_live(channel) {
                    // The other channel took the gesture over
                    debug!(?channel, "Drag handed over, end ignored");
                } else {
                    debug!(?channel, translation, velocity, "Drag ended");
                    self.ended = Some(sample);
                }
            }
            _ => {}
        }

        if self.handle.state == GestureState::Active && self.content.state == GestureState::Active {
            warn!("Handle and content drags both active; content takes precedence");
        }
    }

    fn other_live(&self, channel: Channel) -> bool {
        match channel {
            Channel::Handle => self.content.is_live(),
            Channel::Content => self.handle.is_live(),
        }
    }

    /// Record the inner content's scroll position
    pub fn push_scroll(&mut self, offset: f64) {
        self.scroll.offset = offset.max(0.0);
    }

    /// Sample of the channel currently dragging, content first
    pub fn active_sample(&self) -> Option<DragSample> {
        [&self.content, &self.handle]
            .into_iter()
            .find(|track| track.is_live())
            .map(|track| track.sample)
    }

    pub fn is_dragging(&self) -> bool {
        self.active_sample().is_some()
    }

    /// Consume the latched Began edge
    pub fn take_began(&mut self) -> Option<Channel> {
        self.began.take()
    }

    /// Consume the latched Ended edge with the gesture's final sample
    pub fn take_ended(&mut self) -> Option<DragSample> {
        self.ended.take()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset
    }

    /// Scroll offset captured when the current drag became active
    pub fn drag_start_scroll(&self) -> f64 {
        self.drag_start_scroll
    }

    pub fn set_drag_start_scroll(&mut self, offset: f64) {
        self.drag_start_scroll = offset.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_began_active_snapshots_scroll() {
        let mut router = GestureRouter::new();
        router.push_scroll(120.0);
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        assert_eq!(router.drag_start_scroll(), 120.0);

        router.push_scroll(90.0);
        router.push_drag(Channel::Content, GestureState::Active, 5.0, 10.0);
        assert_eq!(router.drag_start_scroll(), 90.0);

        // Later scroll updates don't move the snapshot
        router.push_scroll(40.0);
        router.push_drag(Channel::Content, GestureState::Active, 20.0, 10.0);
        assert_eq!(router.drag_start_scroll(), 90.0);
        assert_eq!(router.scroll_offset(), 40.0);
    }

    #[test]
    fn test_edges_are_latched_until_taken() {
        let mut router = GestureRouter::new();
        router.push_drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Handle, GestureState::Active, -30.0, -500.0);
        router.push_drag(Channel::Handle, GestureState::Ended, -40.0, -600.0);

        assert_eq!(router.take_began(), Some(Channel::Handle));
        assert_eq!(router.take_began(), None);

        let ended = router.take_ended().unwrap();
        assert_eq!(ended.translation, -40.0);
        assert_eq!(ended.velocity, -600.0);
        assert_eq!(ended.channel, Channel::Handle);
        assert!(router.take_ended().is_none());
        assert!(!router.is_dragging());
    }

    #[test]
    fn test_content_takes_precedence() {
        let mut router = GestureRouter::new();
        router.push_drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Handle, GestureState::Active, 10.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Active, 25.0, 0.0);

        let sample = router.active_sample().unwrap();
        assert_eq!(sample.channel, Channel::Content);
        assert_eq!(sample.translation, 25.0);
    }

    #[test]
    fn test_active_without_began_counts_as_begin() {
        let mut router = GestureRouter::new();
        router.push_scroll(15.0);
        router.push_drag(Channel::Content, GestureState::Active, 3.0, 0.0);
        assert_eq!(router.take_began(), Some(Channel::Content));
        assert_eq!(router.drag_start_scroll(), 15.0);
    }

    #[test]
    fn test_cancelled_gesture_still_ends() {
        let mut router = GestureRouter::new();
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Idle, 0.0, 0.0);
        assert!(router.take_ended().is_some());
        assert!(!router.is_dragging());
    }

    #[test]
    fn test_new_gesture_replaces_previous_snapshot() {
        let mut router = GestureRouter::new();
        router.push_scroll(120.0);
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Active, 10.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Ended, 10.0, 0.0);
        router.take_ended();

        router.push_scroll(0.0);
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Ended, 200.0, 0.0);
        assert_eq!(router.drag_start_scroll(), 0.0);
    }

    #[test]
    fn test_handle_cancel_during_content_drag_is_not_an_end() {
        let mut router = GestureRouter::new();
        router.push_drag(Channel::Handle, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Handle, GestureState::Active, 10.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Began, 0.0, 0.0);
        router.push_drag(Channel::Content, GestureState::Active, 20.0, 0.0);
        router.push_drag(Channel::Handle, GestureState::Idle, 10.0, 0.0);

        assert!(router.take_ended().is_none());
        assert_eq!(router.active_sample().map(|s| s.channel), Some(Channel::Content));

        router.push_drag(Channel::Content, GestureState::Ended, 20.0, 300.0);
        let ended = router.take_ended().unwrap();
        assert_eq!(ended.channel, Channel::Content);
        assert_eq!(ended.translation, 20.0);
        assert!(!router.is_dragging());
    }

    #[test]
    fn test_negative_scroll_is_clamped() {
        let mut router = GestureRouter::new();
        router.push_scroll(-12.0);
        assert_eq!(router.scroll_offset(), 0.0);
    }
}
