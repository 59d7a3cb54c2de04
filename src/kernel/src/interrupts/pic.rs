//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).
//!
//! ```text
//! ┌─────────────┐ IRQ2 ┌─────────────┐
//! │   master    │◀─────│    slave    │
//! │  IRQ 0-7    │      │  IRQ 8-15   │
//! └─────────────┘      └─────────────┘
//!       │
//!       ▼
//!      CPU
//! ```
//!
//! Out of reset the master delivers IRQs 0-7 on vectors 8-15, on top of the
//! CPU exceptions, so both chips are reprogrammed before interrupts are
//! enabled.

use pikku_common::ControllerError;
use pikku_hal::PortIo;

/// Master command port.
pub const PIC_1_COMMAND: u16 = 0x20;
/// Master data (mask) port.
pub const PIC_1_DATA: u16 = 0x21;
/// Slave command port.
pub const PIC_2_COMMAND: u16 = 0xA0;
/// Slave data (mask) port.
pub const PIC_2_DATA: u16 = 0xA1;

/// ICW1: start initialization.
const ICW1_INIT: u8 = 0x10;
/// ICW1: an ICW4 will follow.
const ICW1_ICW4: u8 = 0x01;
/// ICW4: 8086/8088 mode.
const ICW4_8086: u8 = 0x01;
/// OCW2: non-specific end of interrupt.
const END_OF_INTERRUPT: u8 = 0x20;

/// Master line the slave is wired to.
pub const CASCADE_LINE: u8 = 2;

/// Number of request lines per controller.
const LINES_PER_CHIP: u8 = 8;

/// Vector offsets assigned by [`ChainedControllers::remap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Offsets {
    master: u8,
    slave: u8,
}

impl Offsets {
    fn validate(master: u8, slave: u8) -> Result<Self, ControllerError> {
        for offset in [master, slave] {
            if offset > u8::MAX - (LINES_PER_CHIP - 1) {
                return Err(ControllerError::RangeOverflow { offset });
            }
        }
        if master.abs_diff(slave) != LINES_PER_CHIP {
            return Err(ControllerError::RangesNotContiguous { master, slave });
        }
        Ok(Self { master, slave })
    }

    fn in_master(self, vector: u8) -> bool {
        (self.master..=self.master + (LINES_PER_CHIP - 1)).contains(&vector)
    }

    fn in_slave(self, vector: u8) -> bool {
        (self.slave..=self.slave + (LINES_PER_CHIP - 1)).contains(&vector)
    }
}

/// The two cascaded 8259 controllers.
///
/// Vectors are only considered managed after a successful [`remap`].
///
/// [`remap`]: ChainedControllers::remap
pub struct ChainedControllers<P: PortIo> {
    ports: P,
    offsets: Option<Offsets>,
}

impl<P: PortIo> ChainedControllers<P> {
    /// Wraps the controllers reachable through `ports`. Nothing is written.
    pub const fn new(ports: P) -> Self {
        Self {
            ports,
            offsets: None,
        }
    }

    /// Reprograms both controllers so IRQs 0-7 raise `master_offset..+8`
    /// and IRQs 8-15 raise `slave_offset..+8`.
    ///
    /// The interrupt masks are saved first and restored last, so the
    /// enable state of every line survives the reinitialization.
    pub fn remap(&mut self, master_offset: u8, slave_offset: u8) -> Result<(), ControllerError> {
        let offsets = Offsets::validate(master_offset, slave_offset)?;

        let master_mask = self.ports.read(PIC_1_DATA);
        let slave_mask = self.ports.read(PIC_2_DATA);

        self.ports.write(PIC_1_COMMAND, ICW1_INIT | ICW1_ICW4);
        self.ports.write(PIC_2_COMMAND, ICW1_INIT | ICW1_ICW4);
        self.ports.write(PIC_1_DATA, master_offset);
        self.ports.write(PIC_2_DATA, slave_offset);
        self.ports.write(PIC_1_DATA, 1 << CASCADE_LINE);
        self.ports.write(PIC_2_DATA, CASCADE_LINE);
        self.ports.write(PIC_1_DATA, ICW4_8086);
        self.ports.write(PIC_2_DATA, ICW4_8086);

        self.ports.write(PIC_1_DATA, master_mask);
        self.ports.write(PIC_2_DATA, slave_mask);

        self.offsets = Some(offsets);
        log::debug!(
            "PIC remapped: IRQ 0-7 -> {:#04x}, IRQ 8-15 -> {:#04x} (masks {:#04x}/{:#04x})",
            master_offset,
            slave_offset,
            master_mask,
            slave_mask
        );
        Ok(())
    }

    /// Unmasks exactly one device line and masks every other one.
    ///
    /// The cascade line on the master stays unmasked so slave lines can be
    /// routed; with all slave lines masked it carries nothing.
    pub fn enable_only(&mut self, line: u8) -> Result<(), ControllerError> {
        if self.offsets.is_none() {
            return Err(ControllerError::NotRemapped);
        }
        if line >= 2 * LINES_PER_CHIP {
            return Err(ControllerError::LineOutOfRange { line });
        }
        if line == CASCADE_LINE {
            return Err(ControllerError::CascadeLine);
        }

        let cascade = 1u8 << CASCADE_LINE;
        let (master_mask, slave_mask) = if line < LINES_PER_CHIP {
            (!((1u8 << line) | cascade), 0xFF)
        } else {
            (!cascade, !(1u8 << (line - LINES_PER_CHIP)))
        };
        self.set_masks(master_mask, slave_mask);
        Ok(())
    }

    /// Writes raw interrupt masks (a set bit disables the line).
    pub fn set_masks(&mut self, master: u8, slave: u8) {
        self.ports.write(PIC_1_DATA, master);
        self.ports.write(PIC_2_DATA, slave);
    }

    /// Returns the vector raised by request `line` (0-15).
    pub fn vector_for(&self, line: u8) -> Result<u8, ControllerError> {
        let offsets = self.offsets.ok_or(ControllerError::NotRemapped)?;
        match line {
            0..=7 => Ok(offsets.master + line),
            8..=15 => Ok(offsets.slave + line - LINES_PER_CHIP),
            _ => Err(ControllerError::LineOutOfRange { line }),
        }
    }

    /// Returns whether `vector` belongs to either controller.
    pub fn manages(&self, vector: u8) -> bool {
        self.offsets
            .is_some_and(|o| o.in_master(vector) || o.in_slave(vector))
    }

    /// Signals end of interrupt for `vector`.
    ///
    /// Vectors outside both ranges are ignored without touching a port.
    /// A line is not raised again until its interrupt is acknowledged, so
    /// every dispatched vector in range must come through here once.
    pub fn acknowledge(&mut self, vector: u8) {
        let Some(offsets) = self.offsets else {
            return;
        };
        if offsets.in_master(vector) {
            self.ports.write(PIC_1_COMMAND, END_OF_INTERRUPT);
        } else if offsets.in_slave(vector) {
            self.ports.write(PIC_2_COMMAND, END_OF_INTERRUPT);
        }
    }
}
