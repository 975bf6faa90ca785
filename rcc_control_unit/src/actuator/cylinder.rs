//! Binary pneumatic feed cylinder.
//!
//! The valve wiring decides which electrical level extends the cylinder
//! (`extend_level`); retract is always the opposite level.

use rcc_common::control_unit::config::CylinderConfig;
use rcc_common::control_unit::state::CylinderPosition;
use rcc_common::hal::driver::OutputPin;
use rcc_common::io::line::SignalLevel;
use tracing::{debug, info, warn};

pub struct CylinderDriver {
    pin: Box<dyn OutputPin>,
    extend_level: SignalLevel,
    initialized: bool,
    position: CylinderPosition,
    /// Last level written to the pin.
    commanded: Option<SignalLevel>,
}

impl std::fmt::Debug for CylinderDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CylinderDriver")
            .field("extend_level", &self.extend_level)
            .field("initialized", &self.initialized)
            .field("position", &self.position)
            .field("commanded", &self.commanded)
            .finish()
    }
}

impl CylinderDriver {
    pub fn new(pin: Box<dyn OutputPin>, config: &CylinderConfig) -> Self {
        Self {
            pin,
            extend_level: config.extend_level,
            initialized: false,
            position: CylinderPosition::Retracted,
            commanded: None,
        }
    }

    /// Configure the output and retract.
    pub fn init(&mut self) {
        self.pin.configure();
        self.initialized = true;
        self.drive(CylinderPosition::Retracted);
        info!(
            "Cylinder initialized (extend={}, retract={})",
            self.extend_level,
            self.retract_level()
        );
    }

    pub fn extend(&mut self) {
        self.ensure_initialized("extend");
        self.drive(CylinderPosition::Extended);
    }

    pub fn retract(&mut self) {
        self.ensure_initialized("retract");
        self.drive(CylinderPosition::Retracted);
    }

    /// Retract unconditionally. Re-configures the output first, so this
    /// works even if `init` never ran or the pin was reset.
    pub fn emergency_retract(&mut self) {
        self.pin.configure();
        self.initialized = true;
        let level = self.retract_level();
        self.pin.write(level);
        self.commanded = Some(level);
        self.position = CylinderPosition::Retracted;
        warn!("Cylinder emergency retract ({level})");
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.position == CylinderPosition::Extended
    }

    #[inline]
    pub fn position(&self) -> CylinderPosition {
        self.position
    }

    /// Level last written to the valve, `None` before any write.
    #[inline]
    pub fn commanded_level(&self) -> Option<SignalLevel> {
        self.commanded
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    fn retract_level(&self) -> SignalLevel {
        self.extend_level.inverted()
    }

    fn level_for(&self, position: CylinderPosition) -> SignalLevel {
        match position {
            CylinderPosition::Extended => self.extend_level,
            CylinderPosition::Retracted => self.retract_level(),
        }
    }

    fn ensure_initialized(&mut self, op: &str) {
        if !self.initialized {
            warn!("Cylinder {op} before init, configuring output");
            self.pin.configure();
            self.initialized = true;
        }
    }

    fn drive(&mut self, position: CylinderPosition) {
        let level = self.level_for(position);
        if self.commanded == Some(level) {
            return;
        }
        self.pin.write(level);
        self.commanded = Some(level);
        self.position = position;
        debug!("Cylinder {position} ({level})");
    }
}
