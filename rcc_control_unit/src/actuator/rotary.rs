//! Angle-controlled rotary actuator (flip servo).
//!
//! There is no position feedback. A move counts as settled once
//! `move_delay_ms` has elapsed since it was commanded.

use rcc_common::control_unit::config::RotaryConfig;
use rcc_common::hal::driver::{HalError, ServoChannel, Tick};
use tracing::{debug, error, info, warn};

pub struct RotaryDriver {
    servo: Box<dyn ServoChannel>,
    min_angle: u16,
    max_angle: u16,
    home_angle: u16,
    move_delay_ms: u64,
    attached: bool,
    /// Last commanded angle [deg].
    angle: Option<u16>,
    last_command_at: Option<Tick>,
}

impl std::fmt::Debug for RotaryDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotaryDriver")
            .field("range", &(self.min_angle..=self.max_angle))
            .field("home_angle", &self.home_angle)
            .field("attached", &self.attached)
            .field("angle", &self.angle)
            .field("last_command_at", &self.last_command_at)
            .finish()
    }
}

impl RotaryDriver {
    pub fn new(servo: Box<dyn ServoChannel>, config: &RotaryConfig) -> Self {
        Self {
            servo,
            min_angle: config.min_angle,
            max_angle: config.max_angle,
            home_angle: config.home_angle,
            move_delay_ms: config.move_delay_ms,
            attached: false,
            angle: None,
            last_command_at: None,
        }
    }

    /// Attach and move home.
    pub fn init(&mut self, now: Tick) -> Result<(), HalError> {
        self.servo.attach()?;
        self.attached = true;
        self.move_to_home(now);
        info!("Rotary initialized at home ({} deg)", self.home_angle);
        Ok(())
    }

    /// Command `angle`, clamped to the configured range. Re-attaches a
    /// detached servo first. Returns the angle actually commanded, or `None`
    /// if the servo could not be re-attached; the last command then stands.
    pub fn move_to(&mut self, angle: u16, now: Tick) -> Option<u16> {
        let target = angle.clamp(self.min_angle, self.max_angle);
        if target != angle {
            warn!(
                "Rotary target {angle} deg clamped to {target} deg [{}, {}]",
                self.min_angle, self.max_angle
            );
        }

        if !self.attached {
            warn!("Rotary commanded while detached, re-attaching");
            if let Err(e) = self.reattach() {
                error!("Rotary re-attach failed, {target} deg not commanded: {e}");
                return None;
            }
        }

        self.servo.write_angle(target);
        self.angle = Some(target);
        self.last_command_at = Some(now);
        debug!("Rotary -> {target} deg");
        Some(target)
    }

    pub fn move_to_home(&mut self, now: Tick) -> Option<u16> {
        self.move_to(self.home_angle, now)
    }

    /// True once the last commanded move has had `move_delay_ms` to
    /// complete. True if nothing was ever commanded.
    pub fn has_settled(&self, now: Tick) -> bool {
        match self.last_command_at {
            Some(at) => now.saturating_sub(at) >= self.move_delay_ms,
            None => true,
        }
    }

    /// Release the servo (no holding torque).
    pub fn detach(&mut self) {
        self.servo.detach();
        self.attached = false;
    }

    /// Re-enable the servo and restore the last commanded angle.
    pub fn reattach(&mut self) -> Result<(), HalError> {
        self.servo.attach()?;
        self.attached = true;
        if let Some(angle) = self.angle {
            self.servo.write_angle(angle);
        }
        debug!("Rotary re-attached");
        Ok(())
    }

    /// Park at home if attached, then detach.
    pub fn emergency_home(&mut self, now: Tick) {
        if self.attached {
            self.servo.write_angle(self.home_angle);
            self.angle = Some(self.home_angle);
            self.last_command_at = Some(now);
        }
        self.detach();
        warn!("Rotary emergency home, detached");
    }

    #[inline]
    pub fn angle(&self) -> Option<u16> {
        self.angle
    }

    /// Last command was the home angle.
    #[inline]
    pub fn is_home(&self) -> bool {
        self.angle == Some(self.home_angle)
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn home_angle(&self) -> u16 {
        self.home_angle
    }
}
