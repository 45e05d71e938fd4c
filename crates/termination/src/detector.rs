use std::sync::Arc;

use pgas::{ReduceLco, World};

enum Phase {
    One,
    Two { finished: u64 },
}

/// The two-phase nonzero-activity termination detector (`spec.md` §4.2).
///
/// `detect` returns only once, on every locality, every relax task ever
/// dispatched has had its matching finish observed. One stale
/// zero-activity snapshot is not enough proof; two successive snapshots
/// with equal `finished` are, because no new work could have been
/// generated between them without also changing `finished`.
pub struct Detector;

impl Detector {
    /// Blocks the calling thread until the system reaches quiescence.
    pub fn detect<W: World>(world: &Arc<W>) {
        let n = world.locality_count();
        let reduce = ReduceLco::new(n, (0_u64, 0_u64), sum_activity);
        let mut phase = Phase::One;

        loop {
            reduce.reset(n);
            world.broadcast(|ctx| reduce.contribute(ctx.snapshot()));
            let (active, finished) = reduce.get();

            // Well-formed dispatch paths never finish more than they
            // activated; see `spec.md` §4.2 "Failure".
            let activity = active.saturating_sub(finished);

            if activity != 0 {
                phase = Phase::One;
                continue;
            }

            phase = match phase {
                Phase::One => {
                    log::debug!("termination: zero activity observed ({active} active, {finished} finished), entering confirmation phase");
                    Phase::Two { finished }
                }
                Phase::Two { finished: remembered } if finished == remembered => {
                    log::debug!("termination: quiescence confirmed at finished={finished}");
                    return;
                }
                Phase::Two { .. } => Phase::Two { finished },
            };
        }
    }
}

fn sum_activity(a: (u64, u64), b: (u64, u64)) -> (u64, u64) {
    (a.0 + b.0, a.1 + b.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgas::{LocalityId, SimWorld};

    #[test]
    fn detects_immediate_quiescence() {
        let world = SimWorld::new(3, 1);
        Detector::detect(&world);
        for i in 0..3 {
            assert_eq!(world.context(LocalityId::new(i)).snapshot(), (0, 0));
        }
    }

    #[test]
    fn detects_after_outstanding_work_finishes() {
        let world = SimWorld::new(2, 1);
        world.context(LocalityId::new(0)).activate(3);

        let w = Arc::clone(&world);
        world.call(LocalityId::new(0), move |_ctx| {
            for _ in 0..3 {
                w.context(LocalityId::new(0)).finish(1);
            }
        });

        Detector::detect(&world);
        assert_eq!(world.context(LocalityId::new(0)).snapshot(), (3, 3));
    }
}
