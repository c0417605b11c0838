// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

use super::*;
use crate::testing::{NoopDelay, PinRole, Sim, XorShift32};

#[test]
fn bank_starts_with_every_line_inactive() {
    let sim = Sim::new();
    let bus = sim.bus();
    assert_eq!(sim.state().cs_low, [false; 4]);
    assert_eq!(bus.active(), None);
}

#[test]
fn register_read_is_framed_by_one_chip_select() {
    let sim = Sim::new();
    sim.state().bme.regs[0xD0] = 0x60;
    let bus = sim.bus();
    let mut climate = bus.device(Peripheral::Climate, NoopDelay);

    let mut id = [0u8; 1];
    climate.read(0xD0, &mut id).unwrap();

    assert_eq!(id, [0x60]);
    let s = sim.state();
    assert_eq!(s.transactions, [Peripheral::Climate]);
    assert_eq!(s.cs_low, [false; 4]);
    assert_eq!(s.violations, 0);
}

#[test]
fn empty_buffers_are_rejected_without_touching_the_bus() {
    let sim = Sim::new();
    let bus = sim.bus();
    let mut motion = bus.device(Peripheral::Motion, NoopDelay);

    assert_eq!(motion.read(0x00, &mut []), Err(BusError::InvalidArgument));
    assert_eq!(motion.write(0x06, &[]), Err(BusError::InvalidArgument));
    assert!(sim.state().transactions.is_empty());
}

#[test]
fn second_assertion_reports_contention() {
    let sim = Sim::new();
    let mut bus = sim.bus().into_inner();

    bus.assert_cs(Peripheral::Display, true).unwrap();
    assert_eq!(
        bus.assert_cs(Peripheral::Motion, true),
        Err(BusError::Contention {
            held: Peripheral::Display,
            requested: Peripheral::Motion,
        })
    );
    assert_eq!(sim.state().cs_low, [true, false, false, false]);

    // Re-asserting the owner is harmless.
    bus.assert_cs(Peripheral::Display, true).unwrap();
    bus.assert_cs(Peripheral::Display, false).unwrap();
    assert_eq!(bus.active(), None);

    bus.assert_cs(Peripheral::Motion, true).unwrap();
    assert_eq!(bus.active(), Some(Peripheral::Motion));
}

#[test]
fn nested_transaction_is_busy() {
    let sim = Sim::new();
    let bus = sim.bus();

    let inner = bus.transaction(Peripheral::Climate, |_| {
        Ok(bus.transaction(Peripheral::Motion, |_| Ok(())))
    });

    assert_eq!(inner, Ok(Err(BusError::Busy)));
    assert_eq!(sim.state().peak_selected, 1);
}

#[test]
fn chip_select_is_released_when_the_transfer_fails() {
    let sim = Sim::new();
    let bus = sim.bus();
    sim.state().fail_spi = true;

    let mut climate = bus.device(Peripheral::Climate, NoopDelay);
    let err = climate.write(0x74, &[0x25]).unwrap_err();

    assert_eq!(err, BusError::Spi(embedded_hal::spi::ErrorKind::Other));
    assert_eq!(sim.state().cs_low, [false; 4]);
    assert_eq!(bus.active(), None);
}

#[test]
fn randomised_interleaving_never_overlaps_chip_selects() {
    let sim = Sim::new();
    let bus = sim.bus();
    let mut dc = sim.pin(PinRole::DataCommand);
    let mut rng = XorShift32::new(0x1234_5678);

    let mut climate = bus.device(Peripheral::Climate, NoopDelay);
    let mut motion = bus.device(Peripheral::Motion, NoopDelay);

    for _ in 0..2_000 {
        let len = 1 + rng.below(8) as usize;
        let mut buf = [0u8; 8];
        match rng.below(5) {
            0 => climate.read(0xF7, &mut buf[..len]).unwrap(),
            1 => climate.write(0x74, &[rng.next_u32() as u8]).unwrap(),
            2 => motion.read(0x80 | 0x2D, &mut buf[..len]).unwrap(),
            3 => motion.write(0x06, &[0x01]).unwrap(),
            _ => {
                dc.set_high().unwrap();
                bus.transaction(Peripheral::Display, |b| b.write(&buf[..len]))
                    .unwrap();
            }
        }

        // Attempt a rogue overlap inside a display transaction every so often.
        if rng.below(10) == 0 {
            let overlap = bus.transaction(Peripheral::Display, |b| {
                Ok(b.assert_cs(Peripheral::Climate, true))
            });
            assert!(matches!(
                overlap,
                Ok(Err(BusError::Contention {
                    held: Peripheral::Display,
                    requested: Peripheral::Climate,
                }))
            ));
        }
    }

    let s = sim.state();
    assert_eq!(s.violations, 0);
    assert_eq!(s.peak_selected, 1);
    assert_eq!(s.cs_low, [false; 4]);
    assert!(s.transactions.len() >= 2_000);
}
