//! Type/attribute byte of an interrupt vector descriptor.

use bitflags::bitflags;

bitflags! {
    /// The type/attribute byte of an interrupt gate.
    ///
    /// Layout: bit 7 present, bits 5-6 descriptor privilege level, bit 4
    /// clear for system descriptors, bits 0-3 gate kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct GateAttributes: u8 {
        /// The gate is valid and may be dispatched to.
        const PRESENT           = 1 << 7;
        /// Low bit of the descriptor privilege level.
        const DPL_LOW           = 1 << 5;
        /// High bit of the descriptor privilege level.
        const DPL_HIGH          = 1 << 6;
        /// 32-bit interrupt gate (64-bit interrupt gate in long mode).
        const INTERRUPT_GATE    = 0x0E;
        /// 32-bit trap gate (64-bit trap gate in long mode).
        const TRAP_GATE         = 0x0F;
    }
}

impl GateAttributes {
    /// Mask selecting the gate kind nibble.
    const KIND_MASK: u8 = 0x0F;

    /// Present ring-0 interrupt gate (`0x8E`).
    pub const KERNEL_INTERRUPT: Self =
        Self::from_bits_truncate(Self::PRESENT.bits() | Self::INTERRUPT_GATE.bits());

    /// Returns whether the present bit is set.
    pub const fn is_present(self) -> bool {
        self.bits() & Self::PRESENT.bits() != 0
    }

    /// Returns the descriptor privilege level (0-3).
    pub const fn privilege_level(self) -> u8 {
        (self.bits() >> 5) & 0b11
    }

    /// Returns the gate kind nibble.
    pub const fn kind(self) -> u8 {
        self.bits() & Self::KIND_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_interrupt_byte() {
        assert_eq!(GateAttributes::KERNEL_INTERRUPT.bits(), 0x8E);
        assert!(GateAttributes::KERNEL_INTERRUPT.is_present());
        assert_eq!(GateAttributes::KERNEL_INTERRUPT.privilege_level(), 0);
        assert_eq!(GateAttributes::KERNEL_INTERRUPT.kind(), 0x0E);
    }

    #[test]
    fn test_empty_is_not_present() {
        assert!(!GateAttributes::empty().is_present());
        assert!(!GateAttributes::from_bits_retain(0x0E).is_present());
    }

    #[test]
    fn test_user_trap_gate() {
        let attrs = GateAttributes::PRESENT
            | GateAttributes::DPL_LOW
            | GateAttributes::DPL_HIGH
            | GateAttributes::TRAP_GATE;
        assert_eq!(attrs.bits(), 0xEF);
        assert_eq!(attrs.privilege_level(), 3);
        assert_eq!(attrs.kind(), 0x0F);
    }
}
