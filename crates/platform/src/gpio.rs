//! GPIO access for codec drivers
//!
//! Drivers that gate a power amplifier (PA) through a GPIO pin receive a
//! [`GpioProvider`] explicitly at construction. There is no process-wide
//! GPIO backend.

use crate::error::CodecError;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioDirection {
    /// Push-pull output
    Output,
    /// Input
    Input,
}

/// Pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Floating (no pull resistor)
    Float,
    /// Internal pull-up
    PullUp,
    /// Internal pull-down
    PullDown,
}

/// Pin-number based GPIO backend.
pub trait GpioProvider {
    /// Configure direction and pull mode of `pin`.
    fn setup(&mut self, pin: u16, dir: GpioDirection, mode: GpioMode) -> Result<(), CodecError>;

    /// Drive `pin` high (`true`) or low (`false`).
    fn set(&mut self, pin: u16, high: bool) -> Result<(), CodecError>;

    /// Read the level of `pin`.
    fn get(&self, pin: u16) -> bool;
}

impl<T: GpioProvider + ?Sized> GpioProvider for &mut T {
    fn setup(&mut self, pin: u16, dir: GpioDirection, mode: GpioMode) -> Result<(), CodecError> {
        T::setup(self, pin, dir, mode)
    }

    fn set(&mut self, pin: u16, high: bool) -> Result<(), CodecError> {
        T::set(self, pin, high)
    }

    fn get(&self, pin: u16) -> bool {
        T::get(self, pin)
    }
}

/// [`GpioProvider`] for boards without any driver-controlled pins.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGpio;

impl GpioProvider for NoGpio {
    fn setup(&mut self, _pin: u16, _dir: GpioDirection, _mode: GpioMode) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    fn set(&mut self, _pin: u16, _high: bool) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    fn get(&self, _pin: u16) -> bool {
        false
    }
}

/// Drive an active-high power-amplifier enable pin.
///
/// Configures the pin as a floating output first, as PA enable lines are
/// usually externally pulled.
pub fn set_pa_power<G: GpioProvider>(gpio: &mut G, pin: u16, enable: bool) -> Result<(), CodecError> {
    gpio.setup(pin, GpioDirection::Output, GpioMode::Float)?;
    gpio.set(pin, enable)
}
