// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side test doubles: a simulated SPI bus and the chips hanging off it.
//!
//! All mock pins and the mock SPI share one [`SimState`]. Every byte clocked through [`MockSpi`]
//! checks that exactly one chip-select line is low and routes the byte to that peripheral's model.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::hw::{CsBank, Peripheral, SharedBus};

/// Output pin that only remembers its level.
#[derive(Clone, Default)]
pub struct LevelPin {
    high: Rc<Cell<bool>>,
}

impl LevelPin {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }
}

impl digital::ErrorType for LevelPin {
    type Error = Infallible;
}

impl OutputPin for LevelPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

/// Delay that returns immediately.
#[derive(Copy, Clone, Default)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that adds up the requested time.
#[derive(Clone, Default)]
pub struct CountingDelay {
    total_ns: Rc<Cell<u64>>,
}

impl CountingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns.get() / 1_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
    }
}

/// Small deterministic PRNG for randomised tests.
pub struct XorShift32(u32);

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }
}

/// BME280 register file. Reads auto-increment from the address byte; writes store pairs.
pub struct Bme280Model {
    pub regs: [u8; 256],
    pub writes: Vec<(u8, u8)>,
    pointer: Option<(u8, bool)>,
}

impl Bme280Model {
    fn new() -> Self {
        Self {
            regs: [0; 256],
            writes: Vec::new(),
            pointer: None,
        }
    }

    fn begin(&mut self) {
        self.pointer = None;
    }

    fn clock(&mut self, mosi: u8) -> u8 {
        match self.pointer {
            None => {
                let read = mosi & 0x80 != 0;
                self.pointer = Some((mosi | 0x80, read));
                0xFF
            }
            Some((addr, true)) => {
                self.pointer = Some((addr.wrapping_add(1), true));
                self.regs[addr as usize]
            }
            Some((addr, false)) => {
                self.regs[addr as usize] = mosi;
                self.writes.push((addr, mosi));
                // Next byte in a write burst is another address.
                self.pointer = None;
                0xFF
            }
        }
    }
}

/// ICM-20948 register file: four user banks behind `REG_BANK_SEL` (0x7F).
pub struct Icm20948Model {
    pub banks: [[u8; 128]; 4],
    pub bank: usize,
    pub writes: Vec<(usize, u8, u8)>,
    pointer: Option<(u8, bool)>,
}

impl Icm20948Model {
    fn new() -> Self {
        Self {
            banks: [[0; 128]; 4],
            bank: 0,
            writes: Vec::new(),
            pointer: None,
        }
    }

    fn begin(&mut self) {
        self.pointer = None;
    }

    fn clock(&mut self, mosi: u8) -> u8 {
        match self.pointer {
            None => {
                self.pointer = Some((mosi & 0x7F, mosi & 0x80 != 0));
                0xFF
            }
            Some((addr, true)) => {
                self.pointer = Some(((addr + 1) & 0x7F, true));
                if addr == 0x7F {
                    (self.bank as u8) << 4
                } else {
                    self.banks[self.bank][addr as usize]
                }
            }
            Some((addr, false)) => {
                self.writes.push((self.bank, addr, mosi));
                if addr == 0x7F {
                    self.bank = ((mosi >> 4) & 0x03) as usize;
                } else if self.bank == 0 && addr == 0x06 {
                    // DEVICE_RESET self-clears.
                    self.banks[0][0x06] = mosi & !0x80;
                } else {
                    self.banks[self.bank][addr as usize] = mosi;
                }
                self.pointer = Some(((addr + 1) & 0x7F, false));
                0xFF
            }
        }
    }
}

/// Factory calibration of a sampled BME280 (0x88..=0xA1).
pub const BME280_CALIB_TP: [u8; 26] = [
    0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C, 0x00,
    0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17, 0x00, 0x4B,
];

/// Humidity calibration of the same part (0xE1..=0xE7).
pub const BME280_CALIB_H: [u8; 7] = [0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E];

/// One raw measurement (0xF7..=0xFE): adc_p = 415148, adc_t = 519888, adc_h = 30000.
pub const BME280_DATA: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];

/// Role of a simulated pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinRole {
    Cs(Peripheral),
    DataCommand,
    Reset,
}

/// Everything observable about the simulated board.
pub struct SimState {
    /// `true` where the CS line is driven low.
    pub cs_low: [bool; 4],
    /// Peak number of CS lines low at the same time.
    pub peak_selected: usize,
    /// Bytes clocked while zero or several CS lines were low.
    pub violations: usize,
    pub dc_high: bool,
    /// Level changes of the RES line, oldest first.
    pub reset_trace: Vec<bool>,
    /// Bytes the display received, tagged with the DC level (`true` = data).
    pub display: Vec<(bool, u8)>,
    /// Completed transactions, by peripheral.
    pub transactions: Vec<Peripheral>,
    /// Make every SPI call fail.
    pub fail_spi: bool,
    /// Make SPI calls fail while this peripheral is selected.
    pub fail_peripheral: Option<Peripheral>,
    pub bme: Bme280Model,
    pub icm: Icm20948Model,
}

impl SimState {
    fn selected(&self) -> Option<Peripheral> {
        let mut found = None;
        for p in Peripheral::ALL {
            if self.cs_low[p.index()] {
                if found.is_some() {
                    return None;
                }
                found = Some(p);
            }
        }
        found
    }

    fn clock(&mut self, mosi: u8) -> u8 {
        match self.selected() {
            None => {
                self.violations += 1;
                0xFF
            }
            Some(Peripheral::Climate) => self.bme.clock(mosi),
            Some(Peripheral::Motion) => self.icm.clock(mosi),
            Some(Peripheral::Display) => {
                self.display.push((self.dc_high, mosi));
                0xFF
            }
            Some(Peripheral::Storage) => 0xFF,
        }
    }

    /// Bytes the display received with DC low.
    pub fn display_commands(&self) -> Vec<u8> {
        self.display
            .iter()
            .filter(|(data, _)| !*data)
            .map(|(_, b)| *b)
            .collect()
    }

    /// Bytes the display received with DC high.
    pub fn display_data(&self) -> Vec<u8> {
        self.display
            .iter()
            .filter(|(data, _)| *data)
            .map(|(_, b)| *b)
            .collect()
    }
}

/// Shared handle to the simulated board.
#[derive(Clone)]
pub struct Sim(Rc<RefCell<SimState>>);

impl Sim {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SimState {
            cs_low: [false; 4],
            peak_selected: 0,
            violations: 0,
            dc_high: false,
            reset_trace: Vec::new(),
            display: Vec::new(),
            transactions: Vec::new(),
            fail_spi: false,
            fail_peripheral: None,
            bme: Bme280Model::new(),
            icm: Icm20948Model::new(),
        })))
    }

    /// A board whose climate and motion parts identify correctly and hold one sample each.
    pub fn with_parts() -> Self {
        let sim = Self::new();
        {
            let mut s = sim.state();
            s.bme.regs[0xD0] = 0x60;
            s.bme.regs[0x88..0x88 + 26].copy_from_slice(&BME280_CALIB_TP);
            s.bme.regs[0xE1..0xE1 + 7].copy_from_slice(&BME280_CALIB_H);
            s.bme.regs[0xF7..0xF7 + 8].copy_from_slice(&BME280_DATA);

            s.icm.banks[0][0x00] = 0xEA;
            // accel 1000, -2000, 16384; gyro -1, 2, 300
            s.icm.banks[0][0x2D..0x2D + 6].copy_from_slice(&[0x03, 0xE8, 0xF8, 0x30, 0x40, 0x00]);
            s.icm.banks[0][0x33..0x33 + 6].copy_from_slice(&[0xFF, 0xFF, 0x00, 0x02, 0x01, 0x2C]);
        }
        sim
    }

    pub fn state(&self) -> std::cell::RefMut<'_, SimState> {
        self.0.borrow_mut()
    }

    pub fn pin(&self, role: PinRole) -> SimPin {
        SimPin {
            sim: self.clone(),
            role,
        }
    }

    pub fn spi(&self) -> MockSpi {
        MockSpi { sim: self.clone() }
    }

    /// A shared bus wired to this board's four CS pins.
    pub fn bus(&self) -> TestBus {
        let cs = CsBank::new(
            self.pin(PinRole::Cs(Peripheral::Display)),
            self.pin(PinRole::Cs(Peripheral::Climate)),
            self.pin(PinRole::Cs(Peripheral::Motion)),
            self.pin(PinRole::Cs(Peripheral::Storage)),
        )
        .unwrap();
        SharedBus::new(self.spi(), cs)
    }
}

pub type TestCs = CsBank<SimPin, SimPin, SimPin, SimPin>;
pub type TestBus = SharedBus<MockSpi, TestCs>;

/// Pin wired into the simulation.
pub struct SimPin {
    sim: Sim,
    role: PinRole,
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl SimPin {
    fn drive(&mut self, high: bool) {
        let mut s = self.sim.state();
        match self.role {
            PinRole::Cs(p) => {
                let was_low = s.cs_low[p.index()];
                s.cs_low[p.index()] = !high;
                if !high && !was_low {
                    match p {
                        Peripheral::Climate => s.bme.begin(),
                        Peripheral::Motion => s.icm.begin(),
                        _ => {}
                    }
                }
                if high && was_low {
                    s.transactions.push(p);
                }
                let low = s.cs_low.iter().filter(|l| **l).count();
                s.peak_selected = s.peak_selected.max(low);
            }
            PinRole::DataCommand => s.dc_high = high,
            PinRole::Reset => s.reset_trace.push(high),
        }
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Full-duplex SPI bus clocking bytes into [`SimState`].
pub struct MockSpi {
    sim: Sim,
}

impl MockSpi {
    fn check(&self) -> Result<(), MockSpiError> {
        let s = self.sim.state();
        let failing = s.fail_peripheral.is_some() && s.fail_peripheral == s.selected();
        if s.fail_spi || failing {
            Err(MockSpiError)
        } else {
            Ok(())
        }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = MockSpiError;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.check()?;
        let mut s = self.sim.state();
        for w in words.iter_mut() {
            *w = s.clock(0x00);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        let mut s = self.sim.state();
        for w in words {
            s.clock(*w);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        let mut s = self.sim.state();
        for i in 0..read.len().max(write.len()) {
            let miso = s.clock(write.get(i).copied().unwrap_or(0x00));
            if let Some(r) = read.get_mut(i) {
                *r = miso;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.check()?;
        let mut s = self.sim.state();
        for w in words.iter_mut() {
            *w = s.clock(*w);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
