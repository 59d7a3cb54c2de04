//! Interrupt vector table.
//!
//! A fixed array of 256 gates. Uninstalled slots stay zeroed (not present);
//! the processor never dispatches to them as long as the interrupt
//! controllers only raise installed vectors.

use core::mem::size_of;
use core::sync::atomic::{AtomicBool, Ordering};
use pikku_common::{GateAttributes, TableError};
use pikku_hal::Cpu;

/// Number of slots in the table.
pub const VECTOR_COUNT: usize = 256;

/// Address of an interrupt entry stub.
pub type EntryPoint = usize;

/// A descriptor format the table can hold.
pub trait Gate: Copy {
    /// The zeroed, not-present slot.
    const MISSING: Self;

    /// Builds a present ring-0 interrupt gate.
    fn interrupt_gate(entry: EntryPoint, selector: u16) -> Result<Self, TableError>;

    /// Type/attribute byte.
    fn attributes(&self) -> GateAttributes;

    /// Reassembled entry address.
    fn entry_point(&self) -> EntryPoint;

    /// Code segment selector.
    fn selector(&self) -> u16;
}

/// 8-byte protected-mode gate.
///
/// Byte layout: offset 0..16, selector, reserved, type/attributes,
/// offset 16..32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ProtectedModeGate {
    offset_low: u16,
    selector: u16,
    reserved: u8,
    type_attributes: u8,
    offset_high: u16,
}

const _: () = assert!(size_of::<ProtectedModeGate>() == 8);

impl ProtectedModeGate {
    /// Returns the gate exactly as the processor reads it.
    pub fn to_bytes(&self) -> [u8; 8] {
        let [l0, l1] = self.offset_low.to_le_bytes();
        let [s0, s1] = self.selector.to_le_bytes();
        let [h0, h1] = self.offset_high.to_le_bytes();
        [l0, l1, s0, s1, self.reserved, self.type_attributes, h0, h1]
    }
}

impl Gate for ProtectedModeGate {
    const MISSING: Self = Self {
        offset_low: 0,
        selector: 0,
        reserved: 0,
        type_attributes: 0,
        offset_high: 0,
    };

    fn interrupt_gate(entry: EntryPoint, selector: u16) -> Result<Self, TableError> {
        let address =
            u32::try_from(entry).map_err(|_| TableError::EntryOutOfRange { entry: entry as u64 })?;
        Ok(Self {
            offset_low: address as u16,
            selector,
            reserved: 0,
            type_attributes: GateAttributes::KERNEL_INTERRUPT.bits(),
            offset_high: (address >> 16) as u16,
        })
    }

    fn attributes(&self) -> GateAttributes {
        GateAttributes::from_bits_retain(self.type_attributes)
    }

    fn entry_point(&self) -> EntryPoint {
        (usize::from(self.offset_high) << 16) | usize::from(self.offset_low)
    }

    fn selector(&self) -> u16 {
        self.selector
    }
}

/// 16-byte long-mode gate.
///
/// Same first eight bytes as [`ProtectedModeGate`] with the IST index in the
/// reserved byte, followed by offset bits 32..64 and a reserved dword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct LongModeGate {
    offset_low: u16,
    selector: u16,
    ist: u8,
    type_attributes: u8,
    offset_mid: u16,
    offset_high: u32,
    reserved: u32,
}

const _: () = assert!(size_of::<LongModeGate>() == 16);

impl LongModeGate {
    /// Returns the gate exactly as the processor reads it.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..2].copy_from_slice(&self.offset_low.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.selector.to_le_bytes());
        bytes[4] = self.ist;
        bytes[5] = self.type_attributes;
        bytes[6..8].copy_from_slice(&self.offset_mid.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.offset_high.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }
}

impl Gate for LongModeGate {
    const MISSING: Self = Self {
        offset_low: 0,
        selector: 0,
        ist: 0,
        type_attributes: 0,
        offset_mid: 0,
        offset_high: 0,
        reserved: 0,
    };

    fn interrupt_gate(entry: EntryPoint, selector: u16) -> Result<Self, TableError> {
        let address = entry as u64;
        Ok(Self {
            offset_low: address as u16,
            selector,
            ist: 0,
            type_attributes: GateAttributes::KERNEL_INTERRUPT.bits(),
            offset_mid: (address >> 16) as u16,
            offset_high: (address >> 32) as u32,
            reserved: 0,
        })
    }

    fn attributes(&self) -> GateAttributes {
        GateAttributes::from_bits_retain(self.type_attributes)
    }

    fn entry_point(&self) -> EntryPoint {
        let address = (u64::from(self.offset_high) << 32)
            | (u64::from(self.offset_mid) << 16)
            | u64::from(self.offset_low);
        address as EntryPoint
    }

    fn selector(&self) -> u16 {
        self.selector
    }
}

/// The gate format the processor uses when running this build.
#[cfg(target_pointer_width = "64")]
pub type NativeGate = LongModeGate;

/// The gate format the processor uses when running this build.
#[cfg(not(target_pointer_width = "64"))]
pub type NativeGate = ProtectedModeGate;

/// Location and size operand of the table-load instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Size of the table in bytes, minus one.
    pub limit: u16,
    /// Linear address of the first gate.
    pub base: usize,
}

impl TableDescriptor {
    /// Encodes the 6-byte protected-mode operand (2-byte limit, 4-byte base).
    pub fn to_protected_mode_bytes(&self) -> Result<[u8; 6], TableError> {
        let base = u32::try_from(self.base).map_err(|_| TableError::EntryOutOfRange {
            entry: self.base as u64,
        })?;
        let [l0, l1] = self.limit.to_le_bytes();
        let [b0, b1, b2, b3] = base.to_le_bytes();
        Ok([l0, l1, b0, b1, b2, b3])
    }
}

/// The interrupt vector table.
///
/// Mutable through [`install`](Self::install) until it is moved into
/// `'static` storage and [`activate`](Self::activate)d.
#[repr(C, align(16))]
pub struct VectorTable<G: Gate = NativeGate> {
    gates: [G; VECTOR_COUNT],
    selector: u16,
    loaded: AtomicBool,
}

impl<G: Gate> VectorTable<G> {
    /// Creates a table with every slot missing.
    ///
    /// Installed gates use the code segment `selector`.
    pub const fn new(selector: u16) -> Self {
        Self {
            gates: [G::MISSING; VECTOR_COUNT],
            selector,
            loaded: AtomicBool::new(false),
        }
    }

    /// Points slot `vector` at `entry` as a present ring-0 interrupt gate.
    pub fn install(&mut self, vector: usize, entry: EntryPoint) -> Result<(), TableError> {
        let selector = self.selector;
        let slot = self
            .gates
            .get_mut(vector)
            .ok_or(TableError::VectorOutOfRange { vector })?;
        *slot = G::interrupt_gate(entry, selector)?;
        Ok(())
    }

    /// Returns the gate in slot `vector`.
    pub fn gate(&self, vector: usize) -> Option<&G> {
        self.gates.get(vector)
    }

    /// Returns whether slot `vector` holds a present gate.
    pub fn is_installed(&self, vector: usize) -> bool {
        self.gate(vector)
            .is_some_and(|gate| gate.attributes().is_present())
    }

    /// Computes the table-load operand for this table.
    pub fn descriptor(&self) -> TableDescriptor {
        TableDescriptor {
            limit: (VECTOR_COUNT * size_of::<G>() - 1) as u16,
            base: self.gates.as_ptr() as usize,
        }
    }

    /// Loads the table into the processor.
    ///
    /// A table is loaded at most once; the `'static` borrow keeps any
    /// further [`install`](Self::install) from compiling.
    pub fn activate<C: Cpu>(&'static self, cpu: &C) -> Result<(), TableError> {
        if self.loaded.swap(true, Ordering::AcqRel) {
            return Err(TableError::AlreadyLoaded);
        }

        let descriptor = self.descriptor();
        // SAFETY: The table is 'static and can no longer be mutated. Slots
        // that were never installed are not present, and the interrupt
        // controllers are programmed to raise installed vectors only.
        unsafe { cpu.load_vector_table(descriptor.base, descriptor.limit) };
        log::info!(
            "vector table loaded at {:#x} (limit {:#x})",
            descriptor.base,
            descriptor.limit
        );
        Ok(())
    }

    /// Returns whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KERNEL_CODE_SELECTOR;
    use crate::input::InputBuffer;
    use crate::testutil::ScriptedCpu;

    #[test]
    fn test_protected_mode_gate_bytes() {
        let gate = ProtectedModeGate::interrupt_gate(0x1234_5678, KERNEL_CODE_SELECTOR).unwrap();
        assert_eq!(
            gate.to_bytes(),
            [0x78, 0x56, 0x08, 0x00, 0x00, 0x8E, 0x34, 0x12]
        );
        assert_eq!(gate.entry_point(), 0x1234_5678);
        assert_eq!(gate.selector(), KERNEL_CODE_SELECTOR);
    }

    #[test]
    fn test_protected_mode_rejects_wide_entry() {
        let entry = 0x1_0000_0000usize;
        assert_eq!(
            ProtectedModeGate::interrupt_gate(entry, KERNEL_CODE_SELECTOR),
            Err(TableError::EntryOutOfRange {
                entry: 0x1_0000_0000
            })
        );
    }

    #[test]
    fn test_long_mode_gate_bytes() {
        let gate = LongModeGate::interrupt_gate(0xFFFF_8000_1234_5678, KERNEL_CODE_SELECTOR).unwrap();
        assert_eq!(
            gate.to_bytes(),
            [
                0x78, 0x56, 0x08, 0x00, 0x00, 0x8E, 0x34, 0x12, 0x00, 0x80, 0xFF, 0xFF, 0x00,
                0x00, 0x00, 0x00
            ]
        );
        assert_eq!(gate.entry_point(), 0xFFFF_8000_1234_5678);
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = VectorTable::<ProtectedModeGate>::new(KERNEL_CODE_SELECTOR);
        for vector in 0..VECTOR_COUNT {
            assert!(!table.is_installed(vector));
            assert_eq!(table.gate(vector).unwrap().to_bytes(), [0; 8]);
        }
    }

    #[test]
    fn test_install_marks_only_that_slot() {
        let mut table = VectorTable::<ProtectedModeGate>::new(KERNEL_CODE_SELECTOR);
        table.install(33, 0x0010_2030).unwrap();

        assert!(table.is_installed(33));
        assert!(!table.is_installed(32));
        assert!(!table.is_installed(34));
        let gate = table.gate(33).unwrap();
        assert_eq!(gate.attributes(), GateAttributes::KERNEL_INTERRUPT);
        assert_eq!(gate.entry_point(), 0x0010_2030);
    }

    #[test]
    fn test_install_rejects_out_of_range() {
        let mut table = VectorTable::<LongModeGate>::new(KERNEL_CODE_SELECTOR);
        assert_eq!(
            table.install(256, 0x1000),
            Err(TableError::VectorOutOfRange { vector: 256 })
        );
        assert_eq!(
            table.install(usize::MAX, 0x1000),
            Err(TableError::VectorOutOfRange { vector: usize::MAX })
        );
        assert!((0..VECTOR_COUNT).all(|v| !table.is_installed(v)));
    }

    #[test]
    fn test_descriptor_limits() {
        let protected = VectorTable::<ProtectedModeGate>::new(KERNEL_CODE_SELECTOR);
        assert_eq!(protected.descriptor().limit, 256 * 8 - 1);

        let long = VectorTable::<LongModeGate>::new(KERNEL_CODE_SELECTOR);
        assert_eq!(long.descriptor().limit, 256 * 16 - 1);
        assert_eq!(long.descriptor().base, &long as *const _ as usize);
    }

    #[test]
    fn test_protected_mode_operand_bytes() {
        let descriptor = TableDescriptor {
            limit: 0x07FF,
            base: 0x0010_4000,
        };
        assert_eq!(
            descriptor.to_protected_mode_bytes(),
            Ok([0xFF, 0x07, 0x00, 0x40, 0x10, 0x00])
        );
    }

    #[test]
    fn test_activate_once() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");

        let mut table = VectorTable::<NativeGate>::new(KERNEL_CODE_SELECTOR);
        table.install(33, 0x1000).unwrap();
        let table: &'static VectorTable = Box::leak(Box::new(table));

        assert!(!table.is_loaded());
        table.activate(&cpu).unwrap();
        assert!(table.is_loaded());
        assert_eq!(
            cpu.loaded_tables(),
            vec![(table.descriptor().base, table.descriptor().limit)]
        );

        assert_eq!(table.activate(&cpu), Err(TableError::AlreadyLoaded));
        assert_eq!(cpu.loaded_tables().len(), 1);
    }
}
