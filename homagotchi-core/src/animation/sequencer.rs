//! Animation sequencer
//!
//! Plays the fixed frame sequence for one person with partial refreshes.
//! The caller is blocked for the whole sequence and the display stays
//! owned by the sequencer until the base face is restored.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use homagotchi_display::{Panel, PanelError};
use log::info;

use crate::presence::{face, StatusCode, Transition};
use crate::state::{DisplaySlot, Household, Roster};
use crate::traits::Clock;

/// Frames shown, in order. Ends on the frame that looks like `Home`.
pub const ANIMATION_SEQUENCE: [StatusCode; 5] = [
    StatusCode::AnimFrameB,
    StatusCode::AnimFrameC,
    StatusCode::AnimFrameB,
    StatusCode::AnimFrameC,
    StatusCode::AnimFrameA,
];

/// Decide whether a poll should play the animation
///
/// Any successful probe while home qualifies: either the first success
/// ever, or one that moved `last_seen_at`.
pub fn should_animate(is_home: bool, first_success: bool, seen_moved: bool) -> bool {
    is_home && (first_success || seen_moved)
}

/// Outcome of a `play` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// The whole sequence was drawn
    Played,
    /// The display was asleep; nothing was drawn
    Skipped,
}

/// Plays the face animation
pub struct AnimationSequencer<D> {
    delay: D,
    frame_delay_ms: u32,
}

impl<D: DelayNs> AnimationSequencer<D> {
    /// Create a sequencer with the given pause after each frame
    pub fn new(delay: D, frame_delay_ms: u32) -> Self {
        Self {
            delay,
            frame_delay_ms,
        }
    }

    /// Play the sequence for the person at `index`
    ///
    /// Waits for display ownership first. If the display is asleep the
    /// animation is skipped, not queued. On return the record is no longer
    /// animating and shows its resolved base face, even if a refresh failed.
    pub async fn play<M, P, C>(
        &mut self,
        household: &Household<M, P>,
        index: usize,
        transition: Transition,
        clock: &C,
    ) -> Result<Playback, PanelError>
    where
        M: RawMutex,
        P: Panel,
        C: Clock,
    {
        let roster = household.roster();
        let mut display = household.display().await;

        if !household.power_state().is_awake() {
            roster.with_record(index, |r| {
                info!("{} tried to animate, but the display is asleep.", r.name())
            });
            return Ok(Playback::Skipped);
        }

        let started = roster.with_record(index, |r| {
            r.begin_animation();
            info!("{} is currently animating", r.name());
        });
        if started.is_none() {
            return Ok(Playback::Skipped);
        }

        let outcome = self.draw_frames(&mut display, roster, index, clock).await;

        let now = clock.now();
        roster.with_record(index, |r| {
            r.end_animation();
            face::apply(r, transition, now);
            info!("{} has finished animating", r.name());
        });
        drop(display);
        household.animation_finished();

        outcome.map(|()| Playback::Played)
    }

    async fn draw_frames<M, P, C>(
        &mut self,
        display: &mut DisplaySlot<P>,
        roster: &Roster<M>,
        index: usize,
        clock: &C,
    ) -> Result<(), PanelError>
    where
        M: RawMutex,
        P: Panel,
        C: Clock,
    {
        for frame in ANIMATION_SEQUENCE {
            roster.with_record(index, |r| {
                r.show_frame(frame);
                info!("Rendering face {} for {}", frame.face_index(), r.name());
            });
            display.draw_partial(&roster.frame(clock.display_time())).await?;
            self.delay.delay_ms(self.frame_delay_ms).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::power::{DisplayPowerManager, PowerState};
    use crate::testing::{household_config, t0, PanelOp, RecordingPanel, SimClock, SimDelay};
    use chrono::TimeDelta;
    use embassy_futures::block_on;
    use embassy_futures::join::{join, join3};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn sequencer(clock: &SimClock) -> AnimationSequencer<SimDelay<'_>> {
        AnimationSequencer::new(SimDelay::new(clock), 300)
    }

    #[test]
    fn test_trigger_rule() {
        assert!(should_animate(true, true, false));
        assert!(should_animate(true, false, true));
        assert!(!should_animate(true, false, false));
        assert!(!should_animate(false, true, true));
    }

    #[test]
    fn test_sequence_face_indices() {
        let indices = ANIMATION_SEQUENCE.map(StatusCode::face_index);
        assert_eq!(indices, [2, 3, 2, 3, 1]);
    }

    #[test]
    fn test_play_draws_sequence_and_restores_face() {
        let clock = SimClock::new(t0());
        let household: Household<NoopRawMutex, _> =
            Household::new(&household_config(&["A"]), RecordingPanel::new(&clock), t0());
        household.roster().with_record(0, |r| r.record_seen(t0()));
        let mut sequencer = sequencer(&clock);

        let (playback, _) = block_on(join(
            sequencer.play(&household, 0, Transition::Arrived, &clock),
            clock.drive_for(5),
        ));
        assert_eq!(playback, Ok(Playback::Played));

        let display = block_on(household.display());
        let panel = display.panel();
        assert_eq!(panel.ops(), vec![PanelOp::Partial; 5]);

        let times = panel.times_of(PanelOp::Partial);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= TimeDelta::milliseconds(300));
        }

        // B, C, B, C, A
        let frames = panel.buffers_of(PanelOp::Partial);
        assert_eq!(frames[0], frames[2]);
        assert_eq!(frames[1], frames[3]);
        assert_ne!(frames[0], frames[1]);
        assert_ne!(frames[4], frames[0]);
        assert_ne!(frames[4], frames[1]);
        drop(display);

        let (status, animating) = household
            .roster()
            .with_record(0, |r| (r.status(), r.is_animating()))
            .unwrap();
        assert_eq!(status, StatusCode::Home);
        assert!(!animating);
    }

    #[test]
    fn test_play_skipped_while_asleep() {
        let clock = SimClock::new(t0());
        let household: Household<NoopRawMutex, _> =
            Household::new(&household_config(&["A"]), RecordingPanel::new(&clock), t0());
        household.set_power_state(PowerState::Asleep);
        let mut sequencer = sequencer(&clock);

        let playback = block_on(sequencer.play(&household, 0, Transition::Arrived, &clock));
        assert_eq!(playback, Ok(Playback::Skipped));
        assert!(block_on(household.display()).panel().ops().is_empty());
        assert!(!household.roster().any_animating());
    }

    #[test]
    fn test_failed_refresh_still_releases_face() {
        let clock = SimClock::new(t0());
        let panel = RecordingPanel::new(&clock).failing_on(PanelOp::Partial);
        let household: Household<NoopRawMutex, _> =
            Household::new(&household_config(&["A"]), panel, t0());
        household.roster().with_record(0, |r| r.record_seen(t0()));
        let mut sequencer = sequencer(&clock);

        let playback = block_on(sequencer.play(&household, 0, Transition::StillHome, &clock));
        assert_eq!(playback, Err(PanelError::Communication));

        let (status, animating) = household
            .roster()
            .with_record(0, |r| (r.status(), r.is_animating()))
            .unwrap();
        assert_eq!(status, StatusCode::Home);
        assert!(!animating);
    }

    #[test]
    fn test_power_refresh_waits_for_whole_animation() {
        let clock = SimClock::new(t0());
        let household: Household<NoopRawMutex, _> =
            Household::new(&household_config(&["A"]), RecordingPanel::new(&clock), t0());
        let mut sequencer = sequencer(&clock);
        let mut manager = DisplayPowerManager::new(SimDelay::new(&clock), &TimingConfig::default());

        let refresh = async {
            SimDelay::new(&clock).delay_ms(100).await;
            manager.tick(&household, &clock).await
        };
        let (playback, state, _) = block_on(join3(
            sequencer.play(&household, 0, Transition::StillHome, &clock),
            refresh,
            clock.drive_for(10),
        ));
        assert_eq!(playback, Ok(Playback::Played));
        assert_eq!(state, Ok(PowerState::Awake));

        let display = block_on(household.display());
        let panel = display.panel();
        let mut expected = vec![PanelOp::Partial; 5];
        expected.push(PanelOp::Full);
        assert_eq!(panel.ops(), expected);
        assert_eq!(
            panel.times_of(PanelOp::Full),
            vec![t0() + TimeDelta::milliseconds(1500)]
        );
    }
}
