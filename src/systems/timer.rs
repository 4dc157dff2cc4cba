//! Deadline scheduling against the game clock.
//!
//! Effects that happen "later" (the frightened window expiring, the delayed
//! death event, portal visuals) are scheduled as purposed deadlines rather
//! than per-entity countdowns. Scheduling a purpose that is already pending
//! replaces the old deadline, which is exactly the retrigger semantics a
//! power pellet needs.

use bevy_ecs::resource::Resource;
use smallvec::SmallVec;

/// What a pending deadline does when it fires. At most one deadline per
/// purpose is pending at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Fire the frightened-window fade warning.
    PowerPelletFade,
    /// End the frightened window.
    PowerPelletEnd,
    /// Fire the delayed player-death event.
    PlayerDeath,
    /// End the portal entry/exit effect.
    PortalEffect,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    purpose: TimerPurpose,
    due: f32,
}

/// Pending deadlines, keyed by purpose.
#[derive(Resource, Debug, Default)]
pub struct TimerQueue {
    pending: SmallVec<[ScheduledTimer; 4]>,
}

impl TimerQueue {
    /// Schedules `purpose` to fire at `due` on the game clock. A pending
    /// deadline with the same purpose is replaced.
    pub fn schedule(&mut self, purpose: TimerPurpose, due: f32) {
        self.cancel(purpose);
        self.pending.push(ScheduledTimer { purpose, due });
    }

    /// Drops the pending deadline for `purpose`, if any.
    pub fn cancel(&mut self, purpose: TimerPurpose) {
        self.pending.retain(|timer| timer.purpose != purpose);
    }

    pub fn is_pending(&self, purpose: TimerPurpose) -> bool {
        self.pending.iter().any(|timer| timer.purpose == purpose)
    }

    /// Removes and returns every purpose whose deadline has passed, in
    /// deadline order.
    pub fn fire_due(&mut self, now: f32) -> SmallVec<[TimerPurpose; 4]> {
        let mut due: SmallVec<[ScheduledTimer; 4]> = SmallVec::new();
        self.pending.retain(|timer| {
            if timer.due <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|timer| timer.purpose).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
