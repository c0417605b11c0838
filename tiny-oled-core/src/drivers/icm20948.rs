// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TDK InvenSense ICM-20948 9-axis motion sensor, SPI mode.
//!
//! Only the accelerometer and gyroscope are used; the on-die magnetometer sits behind the
//! auxiliary I2C master and is left alone. Registers are split over four user banks selected
//! through `REG_BANK_SEL`, which is reachable from every bank.
//!
//! Address byte: bit 7 set for reads, clear for writes.

use crate::drivers::RegisterInterface;
use crate::error::SensorError;

// Register addresses
pub mod reg {
    /// Present in every bank.
    pub const REG_BANK_SEL: u8 = 0x7F;

    // User bank 0
    pub const WHO_AM_I: u8 = 0x00;
    pub const USER_CTRL: u8 = 0x03;
    pub const PWR_MGMT_1: u8 = 0x06;
    pub const PWR_MGMT_2: u8 = 0x07;
    pub const ACCEL_XOUT_H: u8 = 0x2D;
    pub const GYRO_XOUT_H: u8 = 0x33;

    // User bank 2
    pub const GYRO_CONFIG_1: u8 = 0x01;
    pub const ACCEL_CONFIG: u8 = 0x14;
}

/// Value of `WHO_AM_I`.
pub const WHO_AM_I_VALUE: u8 = 0xEA;

const SPI_READ: u8 = 0x80;
const SPI_WRITE_MASK: u8 = 0x7F;

const PWR_MGMT_1_DEVICE_RESET: u8 = 0x80;
const PWR_MGMT_1_CLKSEL_AUTO: u8 = 0x01;
const USER_CTRL_I2C_IF_DIS: u8 = 0x10;
const PWR_MGMT_2_DISABLE_ACCEL: u8 = 0x38;
const PWR_MGMT_2_DISABLE_GYRO: u8 = 0x07;

const RESET_US: u32 = 10_000;
const WAKE_US: u32 = 1_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bank {
    B0 = 0,
    B1 = 1,
    B2 = 2,
    B3 = 3,
}

/// Accelerometer full-scale range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelScale {
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

/// Gyroscope full-scale range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GyroScale {
    Dps250 = 0,
    Dps500 = 1,
    Dps1000 = 2,
    Dps2000 = 3,
}

/// Which 3-axis output a read returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MotionChannel {
    #[default]
    Accel,
    Gyro,
}

impl MotionChannel {
    #[inline]
    fn first_register(self) -> u8 {
        match self {
            MotionChannel::Accel => reg::ACCEL_XOUT_H,
            MotionChannel::Gyro => reg::GYRO_XOUT_H,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Icm20948Settings {
    pub accel_enabled: bool,
    pub gyro_enabled: bool,
    pub accel_scale: AccelScale,
    pub gyro_scale: GyroScale,
}

impl Default for Icm20948Settings {
    fn default() -> Self {
        Self {
            accel_enabled: true,
            gyro_enabled: true,
            accel_scale: AccelScale::G2,
            gyro_scale: GyroScale::Dps250,
        }
    }
}

impl Icm20948Settings {
    fn pwr_mgmt_2(&self) -> u8 {
        let mut v = 0;
        if !self.accel_enabled {
            v |= PWR_MGMT_2_DISABLE_ACCEL;
        }
        if !self.gyro_enabled {
            v |= PWR_MGMT_2_DISABLE_GYRO;
        }
        v
    }
}

/// ICM-20948 protocol state: settings and the bank last selected.
pub struct Icm20948 {
    settings: Icm20948Settings,
    bank: Option<Bank>,
    ready: bool,
}

impl Icm20948 {
    pub fn new(settings: Icm20948Settings) -> Self {
        Self {
            settings,
            bank: None,
            ready: false,
        }
    }

    #[inline]
    pub fn settings(&self) -> &Icm20948Settings {
        &self.settings
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Check identity, reset, wake with automatic clock selection, disable the I2C slave
    /// interface and apply the settings.
    pub fn init<I: RegisterInterface>(&mut self, io: &mut I) -> Result<(), SensorError> {
        self.ready = false;
        self.bank = None;
        self.select_bank(io, Bank::B0)?;

        let found = self.read_reg(io, reg::WHO_AM_I)?;
        if found != WHO_AM_I_VALUE {
            return Err(SensorError::ChipId {
                expected: WHO_AM_I_VALUE,
                found,
            });
        }

        self.write_reg(io, reg::PWR_MGMT_1, PWR_MGMT_1_DEVICE_RESET)?;
        io.delay_us(RESET_US);
        // Reset returns the part to bank 0.
        self.bank = Some(Bank::B0);

        self.write_reg(io, reg::PWR_MGMT_1, PWR_MGMT_1_CLKSEL_AUTO)?;
        io.delay_us(WAKE_US);
        self.write_reg(io, reg::USER_CTRL, USER_CTRL_I2C_IF_DIS)?;

        self.apply_settings(io, self.settings)?;
        self.ready = true;
        Ok(())
    }

    /// Program power management and full-scale ranges, leaving bank 0 selected.
    pub fn apply_settings<I: RegisterInterface>(
        &mut self,
        io: &mut I,
        settings: Icm20948Settings,
    ) -> Result<(), SensorError> {
        self.select_bank(io, Bank::B0)?;
        self.write_reg(io, reg::PWR_MGMT_2, settings.pwr_mgmt_2())?;

        self.select_bank(io, Bank::B2)?;
        self.write_reg(io, reg::GYRO_CONFIG_1, (settings.gyro_scale as u8) << 1)?;
        self.write_reg(io, reg::ACCEL_CONFIG, (settings.accel_scale as u8) << 1)?;

        self.select_bank(io, Bank::B0)?;
        self.settings = settings;
        Ok(())
    }

    /// Read one 3-axis sample (big-endian x, y, z).
    pub fn read_axes<I: RegisterInterface>(
        &mut self,
        io: &mut I,
        channel: MotionChannel,
    ) -> Result<[i16; 3], SensorError> {
        if !self.ready {
            return Err(SensorError::NotInitialized);
        }
        self.select_bank(io, Bank::B0)?;

        let mut raw = [0u8; 6];
        io.read(channel.first_register() | SPI_READ, &mut raw)?;
        Ok([
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ])
    }

    fn select_bank<I: RegisterInterface>(
        &mut self,
        io: &mut I,
        bank: Bank,
    ) -> Result<(), SensorError> {
        if self.bank == Some(bank) {
            return Ok(());
        }
        // Forget the cached bank until the write has gone through.
        self.bank = None;
        io.write(reg::REG_BANK_SEL & SPI_WRITE_MASK, &[(bank as u8) << 4])?;
        self.bank = Some(bank);
        Ok(())
    }

    fn read_reg<I: RegisterInterface>(&mut self, io: &mut I, reg: u8) -> Result<u8, SensorError> {
        let mut v = [0u8; 1];
        io.read(reg | SPI_READ, &mut v)?;
        Ok(v[0])
    }

    fn write_reg<I: RegisterInterface>(
        &mut self,
        io: &mut I,
        reg: u8,
        value: u8,
    ) -> Result<(), SensorError> {
        io.write(reg & SPI_WRITE_MASK, &[value])?;
        Ok(())
    }
}
