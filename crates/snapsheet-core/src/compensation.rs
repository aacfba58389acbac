//! Scroll compensation between the sheet drag and the inner content scroll
//!
//! While the sheet rests fully open, a content drag first scrolls the inner
//! content back to its top; only the motion left over after that moves the
//! sheet. The scroll offset captured when the drag became active is the
//! amount the drag has to consume before the sheet follows the finger 1:1.
//! Drags that start on the handle, or while the sheet rests below its top
//! snap point, never scroll content and are tracked without compensation.

use tracing::debug;

use crate::gesture::Channel;
use crate::snap_points::SNAP_EPSILON;

/// Per-gesture compensation state
#[derive(Debug, Clone, Default)]
pub struct ScrollCompensation {
    dragging_via_handle: bool,
    scroll_then_pull: bool,
}

impl ScrollCompensation {
    pub fn new(dragging_via_handle: bool) -> Self {
        Self {
            dragging_via_handle,
            scroll_then_pull: false,
        }
    }

    pub fn dragging_via_handle(&self) -> bool {
        self.dragging_via_handle
    }

    /// True once the drag has consumed the captured scroll and pulls the sheet
    pub fn scroll_then_pull(&self) -> bool {
        self.scroll_then_pull
    }

    /// A new gesture began; `sheet_at_top` is whether it rests fully open
    pub fn begin_gesture(&mut self, channel: Channel, sheet_at_top: bool) {
        if channel == Channel::Handle || !sheet_at_top {
            self.dragging_via_handle = true;
        }
        self.scroll_then_pull = false;
    }

    /// An imperative snap was requested
    pub fn snap_requested(&mut self, target_is_top: bool) {
        if !target_is_top {
            self.dragging_via_handle = true;
        }
    }

    /// Whether a handle-mode drag has carried the sheet past its top snap point
    ///
    /// Only applies when the drag started from a resting snap point; after an
    /// interrupted animation the rest offset may lie between entries.
    pub fn crossed_top(&self, rest_offset: f64, drag_y: f64, top: f64, rest_is_snap_point: bool) -> bool {
        self.dragging_via_handle
            && rest_is_snap_point
            && (rest_offset - top).abs() > SNAP_EPSILON
            && rest_offset + drag_y < top
    }

    /// Switch to content mode after the sheet reached the top mid-gesture
    pub fn release_handle(&mut self) {
        debug!("Sheet reached top mid-gesture, handing motion to content");
        self.dragging_via_handle = false;
        self.scroll_then_pull = false;
    }

    /// Track the live drag against the captured scroll offset
    ///
    /// Once set, `scroll_then_pull` holds until the gesture finishes even if
    /// the finger moves back above the consumed scroll.
    pub fn observe(&mut self, drag_y: f64, drag_start_scroll: f64) {
        if !self.dragging_via_handle && drag_start_scroll > 0.0 && drag_y >= drag_start_scroll {
            self.scroll_then_pull = true;
        }
    }

    /// Offset subtracted from the raw drag to get the sheet's live motion
    pub fn compensation(&self, drag_start_scroll: f64) -> f64 {
        if self.dragging_via_handle {
            0.0
        } else {
            drag_start_scroll
        }
    }

    /// Translation fed to the destination selector
    ///
    /// Once the scroll is consumed the raw translation is used and the scroll
    /// is accounted for through [`Self::extra_offset`] instead.
    pub fn effective_translation(&self, drag_y: f64, drag_start_scroll: f64) -> f64 {
        if !self.dragging_via_handle && drag_y < drag_start_scroll {
            drag_y - drag_start_scroll
        } else {
            drag_y
        }
    }

    /// Offset added to every snap point while comparing distances
    pub fn extra_offset(&self, drag_start_scroll: f64) -> f64 {
        if self.scroll_then_pull {
            drag_start_scroll
        } else {
            0.0
        }
    }

    /// The gesture's destination has been chosen
    pub fn finish_gesture(&mut self) {
        self.scroll_then_pull = false;
    }

    /// The sheet came to rest; reaching the top re-enables content scrolling
    pub fn settled(&mut self, at_top: bool) {
        if at_top {
            self.dragging_via_handle = false;
        }
    }
}
