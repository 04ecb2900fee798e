//! Outward-facing notifications.
//!
//! The editor core emits exactly two signals the host application consumes,
//! plus redraw requests for the render loop. Notifications queue up during
//! event processing and are drained by the host afterwards; redraw requests
//! are idempotent and coalesce to at most one per drain.

use curve::ControlPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// The canonical control-point sequence of a named curve changed.
    CurveChanged {
        name: String,
        points: Vec<ControlPoint>,
    },
    /// The selected branch changed (or the selection was cleared).
    SelectionChanged { branch: Option<usize> },
    /// The view needs repainting. Fire-and-forget.
    RedrawRequested,
}

/// Order-preserving notification queue with redraw coalescing.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    redraw_pending: bool,
}

impl NotificationQueue {
    pub fn push(&mut self, notification: Notification) {
        if matches!(notification, Notification::RedrawRequested) {
            self.request_redraw();
        } else {
            self.items.push(notification);
        }
    }

    pub fn request_redraw(&mut self) {
        if !self.redraw_pending {
            self.redraw_pending = true;
            self.items.push(Notification::RedrawRequested);
        }
    }

    /// Drain everything queued since the last call.
    pub fn take(&mut self) -> Vec<Notification> {
        self.redraw_pending = false;
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraws_coalesce_until_drained() {
        let mut queue = NotificationQueue::default();
        queue.request_redraw();
        queue.push(Notification::SelectionChanged { branch: Some(1) });
        queue.request_redraw();
        queue.request_redraw();

        let drained = queue.take();
        let redraws = drained
            .iter()
            .filter(|n| matches!(n, Notification::RedrawRequested))
            .count();
        assert_eq!(redraws, 1);
        assert_eq!(drained.len(), 2);

        // A fresh request after draining queues again.
        queue.request_redraw();
        assert_eq!(queue.take().len(), 1);
    }
}
