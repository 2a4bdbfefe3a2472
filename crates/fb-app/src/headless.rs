//! Running a session without a renderer or an interactive position solver.

use fb_linkage::{GeometryResult, Linkage, LinkageGeometryPort, LinkageView, Point2, endpoint_from};
use fb_sim::TickOutcome;
use tracing::info;

use crate::error::AppResult;
use crate::session::LinkageSession;

/// Geometry port for headless runs.
///
/// Re-anchors the coupler pivot on the new input endpoint and leaves the
/// output link where it is. It does not close the loop, so the output angle
/// it reports is the stored one.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedGeometryPort;

impl LinkageGeometryPort for DetachedGeometryPort {
    fn compute_from_input_endpoint(
        &mut self,
        current: &Linkage,
        input_end: Point2,
    ) -> GeometryResult<Linkage> {
        let mut next = current.clone();
        next.coupler.start = input_end;
        next.coupler.end = endpoint_from(input_end, next.coupler.length, next.coupler.angle);
        Ok(next)
    }
}

/// How the headless driver spaces its ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Tick as fast as possible.
    #[default]
    Immediate,
    /// Sleep one tick period between ticks.
    RealTime,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackReport {
    pub ticks: usize,
    pub final_angle_deg: f64,
}

/// Tick `session` until its playback finishes, calling `on_tick` after each
/// sample. Playback must already be started.
pub fn drive_playback<P, V, F>(
    session: &mut LinkageSession<P, V>,
    pacing: Pacing,
    mut on_tick: F,
) -> AppResult<PlaybackReport>
where
    P: LinkageGeometryPort,
    V: LinkageView,
    F: FnMut(&TickOutcome),
{
    let period = session.tick_rate().period();
    let mut ticks = 0;
    while session.is_running() {
        let outcome = session.tick()?;
        ticks += 1;
        on_tick(&outcome);
        if pacing == Pacing::RealTime && !outcome.finished {
            std::thread::sleep(period);
        }
    }
    let final_angle_deg = session.input_angle_deg();
    info!(ticks, final_angle_deg, "headless playback complete");
    Ok(PlaybackReport {
        ticks,
        final_angle_deg,
    })
}
