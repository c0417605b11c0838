// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bosch BME280 combined temperature / pressure / humidity sensor over SPI.
//!
//! The sensor is run in forced mode: every measurement is triggered explicitly and awaited with a
//! busy-wait whose length follows from the oversampling settings. Compensation uses the integer
//! formulas from the datasheet:
//!
//! - temperature in 0.01 °C (`2508` = 25.08 °C)
//! - pressure in 0.01 Pa (`10_065_325` = 1006.53 hPa)
//! - humidity in 1/1024 %RH (`56_317` ≈ 54.99 %RH)
//!
//! In SPI mode bit 7 of the address byte selects the direction: reads send the register address
//! unchanged (all BME280 registers live at 0x80 and above), writes clear bit 7.

use crate::drivers::RegisterInterface;
use crate::error::SensorError;

// Register addresses
pub mod reg {
    pub const CALIB_TP: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const CALIB_H: u8 = 0xE1;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const DATA: u8 = 0xF7;
}

/// Value of the `CHIP_ID` register.
pub const CHIP_ID: u8 = 0x60;
/// Written to `RESET` to trigger a power-on reset.
pub const SOFT_RESET_CMD: u8 = 0xB6;

const SPI_WRITE_MASK: u8 = 0x7F;
const CHIP_ID_ATTEMPTS: u8 = 5;
const CHIP_ID_RETRY_US: u32 = 1_000;
const STARTUP_US: u32 = 2_000;

/// Length of the temperature/pressure calibration block at `CALIB_TP` (0x88..=0xA1).
pub const CALIB_TP_LEN: usize = 26;
/// Length of the humidity calibration block at `CALIB_H` (0xE1..=0xE7).
pub const CALIB_H_LEN: usize = 7;
/// Pressure, temperature and humidity output registers (0xF7..=0xFE).
pub const DATA_LEN: usize = 8;

// Measurement-time model, microseconds.
const MEAS_OFFSET_US: u32 = 1_250;
const MEAS_DUR_US: u32 = 2_300;
const PRES_HUM_MEAS_OFFSET_US: u32 = 575;

const TEMPERATURE_MIN: i32 = -4_000;
const TEMPERATURE_MAX: i32 = 8_500;
const PRESSURE_MIN: u32 = 3_000_000;
const PRESSURE_MAX: u32 = 11_000_000;
const HUMIDITY_MAX: u32 = 102_400;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Oversampling {
    Skip,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Oversampling::Skip => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }

    /// Number of conversions averaged per measurement.
    #[inline]
    pub fn factor(self) -> u32 {
        match self {
            Oversampling::Skip => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// IIR filter coefficient.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Off,
    X2,
    X4,
    X8,
    X16,
}

impl Filter {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Filter::Off => 0b000,
            Filter::X2 => 0b001,
            Filter::X4 => 0b010,
            Filter::X8 => 0b011,
            Filter::X16 => 0b100,
        }
    }
}

/// Inactive time between measurements in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Standby {
    Ms0_5,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

impl Standby {
    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Sleep,
    Forced,
    Normal,
}

impl Mode {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Mode::Sleep => 0b00,
            Mode::Forced => 0b01,
            Mode::Normal => 0b11,
        }
    }
}

/// Oversampling, filter and standby configuration applied at `init`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bme280Settings {
    pub osr_h: Oversampling,
    pub osr_p: Oversampling,
    pub osr_t: Oversampling,
    pub filter: Filter,
    pub standby: Standby,
}

impl Default for Bme280Settings {
    fn default() -> Self {
        Self {
            osr_h: Oversampling::X1,
            osr_p: Oversampling::X16,
            osr_t: Oversampling::X2,
            filter: Filter::X16,
            standby: Standby::Ms0_5,
        }
    }
}

impl Bme280Settings {
    /// Worst-case duration of one forced measurement with these settings.
    pub fn measurement_delay_us(&self) -> u32 {
        MEAS_OFFSET_US
            + MEAS_DUR_US * self.osr_t.factor()
            + (MEAS_DUR_US * self.osr_p.factor() + PRES_HUM_MEAS_OFFSET_US)
            + (MEAS_DUR_US * self.osr_h.factor() + PRES_HUM_MEAS_OFFSET_US)
    }

    #[inline]
    fn ctrl_meas(&self, mode: Mode) -> u8 {
        (self.osr_t.bits() << 5) | (self.osr_p.bits() << 2) | mode.bits()
    }

    #[inline]
    fn config(&self) -> u8 {
        (self.standby.bits() << 5) | (self.filter.bits() << 2)
    }
}

/// Factory trimming parameters read once at `init`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

impl Calibration {
    /// Decode the two calibration blocks as laid out in the register map.
    pub fn from_registers(tp: &[u8; CALIB_TP_LEN], h: &[u8; CALIB_H_LEN]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([tp[i], tp[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([tp[i], tp[i + 1]]);

        Self {
            t1: u16_at(0),
            t2: i16_at(2),
            t3: i16_at(4),
            p1: u16_at(6),
            p2: i16_at(8),
            p3: i16_at(10),
            p4: i16_at(12),
            p5: i16_at(14),
            p6: i16_at(16),
            p7: i16_at(18),
            p8: i16_at(20),
            p9: i16_at(22),
            // tp[24] (0xA0) is reserved.
            h1: tp[25],
            h2: i16::from_le_bytes([h[0], h[1]]),
            h3: h[2],
            h4: ((h[3] as i8 as i16) << 4) | (h[4] & 0x0F) as i16,
            h5: ((h[5] as i8 as i16) << 4) | (h[4] >> 4) as i16,
            h6: h[6] as i8,
        }
    }

    /// Convert raw ADC values into the native output scales.
    pub fn compensate(&self, raw: &RawMeasurement) -> Measurement {
        let t_fine = self.t_fine(raw.temperature);
        Measurement {
            temperature: self.temperature(t_fine),
            pressure: self.pressure(t_fine, raw.pressure),
            humidity: self.humidity(t_fine, raw.humidity),
        }
    }

    fn t_fine(&self, adc_t: u32) -> i64 {
        let adc_t = adc_t as i64;
        let t1 = self.t1 as i64;
        let var1 = ((adc_t / 8 - t1 * 2) * self.t2 as i64) / 2_048;
        let var2 = adc_t / 16 - t1;
        let var2 = (((var2 * var2) / 4_096) * self.t3 as i64) / 16_384;
        var1 + var2
    }

    fn temperature(&self, t_fine: i64) -> i32 {
        let t = ((t_fine * 5 + 128) / 256) as i32;
        t.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
    }

    fn pressure(&self, t_fine: i64, adc_p: u32) -> u32 {
        let var1 = t_fine - 128_000;
        let var2 = var1 * var1 * self.p6 as i64;
        let var2 = var2 + var1 * self.p5 as i64 * 131_072;
        let var2 = var2 + self.p4 as i64 * 34_359_738_368;
        let var1 = (var1 * var1 * self.p3 as i64) / 256 + var1 * self.p2 as i64 * 4_096;
        let var1 = ((1i64 << 47) + var1) * self.p1 as i64 / 8_589_934_592;
        if var1 == 0 {
            // Unprogrammed part.
            return PRESSURE_MIN;
        }

        let p = 1_048_576 - adc_p as i64;
        let p = ((p * 2_147_483_648 - var2) * 3_125) / var1;
        let var1 = (self.p9 as i64 * (p / 8_192) * (p / 8_192)) / 33_554_432;
        let var2 = (self.p8 as i64 * p) / 524_288;
        let p = (p + var1 + var2) / 256 + self.p7 as i64 * 16;

        // Q24.8 Pa -> 0.01 Pa
        let pressure = ((p / 2) * 100) / 128;
        pressure.clamp(PRESSURE_MIN as i64, PRESSURE_MAX as i64) as u32
    }

    fn humidity(&self, t_fine: i64, adc_h: u32) -> u32 {
        let var1 = t_fine - 76_800;
        let var2 = adc_h as i64 * 16_384;
        let var3 = self.h4 as i64 * 1_048_576;
        let var4 = self.h5 as i64 * var1;
        let var5 = (((var2 - var3) - var4) + 16_384) / 32_768;
        let var2 = (var1 * self.h6 as i64) / 1_024;
        let var3 = (var1 * self.h3 as i64) / 2_048;
        let var4 = ((var2 * (var3 + 32_768)) / 1_024) + 2_097_152;
        let var2 = ((var4 * self.h2 as i64) + 8_192) / 16_384;
        let var3 = var5 * var2;
        let var4 = ((var3 / 32_768) * (var3 / 32_768)) / 128;
        let var5 = (var3 - ((var4 * self.h1 as i64) / 16)).clamp(0, 419_430_400);
        ((var5 / 4_096) as u32).min(HUMIDITY_MAX)
    }
}

/// Uncompensated ADC outputs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMeasurement {
    pub pressure: u32,
    pub temperature: u32,
    pub humidity: u32,
}

impl RawMeasurement {
    /// Decode the burst read starting at `DATA` (press[3], temp[3], hum[2], MSB first).
    pub fn from_registers(data: &[u8; DATA_LEN]) -> Self {
        let twenty_bit =
            |msb: u8, lsb: u8, xlsb: u8| ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4);
        Self {
            pressure: twenty_bit(data[0], data[1], data[2]),
            temperature: twenty_bit(data[3], data[4], data[5]),
            humidity: ((data[6] as u32) << 8) | data[7] as u32,
        }
    }
}

/// Compensated sample in the native scales (see module docs).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Measurement {
    pub temperature: i32,
    pub pressure: u32,
    pub humidity: u32,
}

/// BME280 protocol state. The register interface is passed to each call.
pub struct Bme280 {
    settings: Bme280Settings,
    calibration: Option<Calibration>,
}

impl Bme280 {
    pub fn new(settings: Bme280Settings) -> Self {
        Self {
            settings,
            calibration: None,
        }
    }

    #[inline]
    pub fn settings(&self) -> &Bme280Settings {
        &self.settings
    }

    #[inline]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Identify the part, reset it, load calibration and apply the configured settings.
    ///
    /// Leaves the sensor in sleep mode.
    pub fn init<I: RegisterInterface>(&mut self, io: &mut I) -> Result<(), SensorError> {
        self.calibration = None;
        self.check_chip_id(io)?;

        write_reg(io, reg::RESET, SOFT_RESET_CMD)?;
        io.delay_us(STARTUP_US);

        let mut tp = [0u8; CALIB_TP_LEN];
        let mut h = [0u8; CALIB_H_LEN];
        read_regs(io, reg::CALIB_TP, &mut tp)?;
        read_regs(io, reg::CALIB_H, &mut h)?;

        // ctrl_hum only latches on the following ctrl_meas write.
        write_reg(io, reg::CTRL_HUM, self.settings.osr_h.bits())?;
        write_reg(io, reg::CTRL_MEAS, self.settings.ctrl_meas(Mode::Sleep))?;
        write_reg(io, reg::CONFIG, self.settings.config())?;

        self.calibration = Some(Calibration::from_registers(&tp, &h));
        Ok(())
    }

    fn check_chip_id<I: RegisterInterface>(&self, io: &mut I) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        for attempt in 0..CHIP_ID_ATTEMPTS {
            read_regs(io, reg::CHIP_ID, &mut id)?;
            if id[0] == CHIP_ID {
                return Ok(());
            }
            if attempt + 1 < CHIP_ID_ATTEMPTS {
                io.delay_us(CHIP_ID_RETRY_US);
            }
        }
        Err(SensorError::ChipId {
            expected: CHIP_ID,
            found: id[0],
        })
    }

    /// Start one forced-mode conversion.
    pub fn trigger<I: RegisterInterface>(&mut self, io: &mut I) -> Result<(), SensorError> {
        if self.calibration.is_none() {
            return Err(SensorError::NotInitialized);
        }
        write_reg(io, reg::CTRL_HUM, self.settings.osr_h.bits())?;
        write_reg(io, reg::CTRL_MEAS, self.settings.ctrl_meas(Mode::Forced))?;
        Ok(())
    }

    /// Read and compensate the output registers.
    pub fn read_measurement<I: RegisterInterface>(
        &self,
        io: &mut I,
    ) -> Result<Measurement, SensorError> {
        let calibration = self.calibration.as_ref().ok_or(SensorError::NotInitialized)?;
        let mut data = [0u8; DATA_LEN];
        read_regs(io, reg::DATA, &mut data)?;
        Ok(calibration.compensate(&RawMeasurement::from_registers(&data)))
    }

    /// Trigger, wait out the conversion, and read the result.
    pub fn measure<I: RegisterInterface>(&mut self, io: &mut I) -> Result<Measurement, SensorError> {
        self.trigger(io)?;
        io.delay_us(self.settings.measurement_delay_us());
        self.read_measurement(io)
    }
}

#[inline]
fn read_regs<I: RegisterInterface>(io: &mut I, reg: u8, buf: &mut [u8]) -> Result<(), SensorError> {
    io.read(reg, buf).map_err(SensorError::from)
}

#[inline]
fn write_reg<I: RegisterInterface>(io: &mut I, reg: u8, value: u8) -> Result<(), SensorError> {
    io.write(reg & SPI_WRITE_MASK, &[value])
        .map_err(SensorError::from)
}
