use crate::registry::TrackId;

/// A request made before the sequence was set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeferredOp {
    AddTrack(TrackId),
    Refresh { animated: bool },
    SetTrackOrder(Vec<TrackId>),
    SetZoom { level: f64, focal: Option<f64> },
    Select { from: usize, to: usize },
}

/// Whether the renderer has a sequence to draw on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Readiness {
    NotReady { deferred: Vec<DeferredOp> },
    Ready,
}

impl Default for Readiness {
    fn default() -> Self {
        Self::NotReady {
            deferred: Vec::new(),
        }
    }
}

impl Readiness {
    pub(crate) fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Queue `op` if not ready. Returns whether it was queued.
    pub(crate) fn defer(&mut self, op: DeferredOp) -> bool {
        match self {
            Self::NotReady { deferred } => {
                log::debug!("deferring {op:?} until a sequence is set");
                deferred.push(op);
                true
            }
            Self::Ready => false,
        }
    }

    /// Drop queued track additions for `id`.
    pub(crate) fn forget_track(&mut self, id: &TrackId) {
        if let Self::NotReady { deferred } = self {
            deferred.retain(|op| !matches!(op, DeferredOp::AddTrack(t) if t == id));
        }
    }

    /// Switch to ready, handing back the queue in request order.
    pub(crate) fn make_ready(&mut self) -> Vec<DeferredOp> {
        match std::mem::replace(self, Self::Ready) {
            Self::NotReady { deferred } => deferred,
            Self::Ready => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_flushes_in_order_once() {
        let mut r = Readiness::default();
        assert!(r.defer(DeferredOp::AddTrack("a".into())));
        assert!(r.defer(DeferredOp::Refresh { animated: false }));
        let ops = r.make_ready();
        assert_eq!(
            ops,
            vec![
                DeferredOp::AddTrack("a".into()),
                DeferredOp::Refresh { animated: false }
            ]
        );
        assert!(r.is_ready());
        assert!(!r.defer(DeferredOp::Refresh { animated: true }));
        assert!(r.make_ready().is_empty());
    }

    #[test]
    fn test_forget_track_drops_pending_add() {
        let mut r = Readiness::default();
        let _ = r.defer(DeferredOp::AddTrack("a".into()));
        let _ = r.defer(DeferredOp::AddTrack("b".into()));
        r.forget_track(&"a".into());
        assert_eq!(r.make_ready(), vec![DeferredOp::AddTrack("b".into())]);
    }
}
