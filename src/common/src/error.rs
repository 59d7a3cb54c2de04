//! System-wide error types for PikkuOS.

use core::fmt;

/// Interrupt vector table errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableError {
    /// Vector index does not name a table slot.
    VectorOutOfRange {
        /// The rejected index.
        vector: usize,
    },
    /// Entry point address cannot be encoded in the gate format.
    EntryOutOfRange {
        /// The rejected address.
        entry: u64,
    },
    /// The table was already loaded into the CPU.
    AlreadyLoaded,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::VectorOutOfRange { vector } => {
                write!(f, "vector {} is outside the 256-entry table", vector)
            }
            TableError::EntryOutOfRange { entry } => {
                write!(f, "entry point {:#x} does not fit the gate format", entry)
            }
            TableError::AlreadyLoaded => write!(f, "vector table already loaded"),
        }
    }
}

/// Interrupt controller (8259 PIC pair) errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControllerError {
    /// The two vector ranges overlap or leave a gap.
    RangesNotContiguous {
        /// Requested master offset.
        master: u8,
        /// Requested slave offset.
        slave: u8,
    },
    /// A range of eight vectors starting here runs past vector 255.
    RangeOverflow {
        /// The offending offset.
        offset: u8,
    },
    /// The controllers have not been remapped yet.
    NotRemapped,
    /// Request line is not in 0..16.
    LineOutOfRange {
        /// The rejected line.
        line: u8,
    },
    /// Line 2 on the master carries the slave and is not a device line.
    CascadeLine,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::RangesNotContiguous { master, slave } => write!(
                f,
                "vector ranges {:#04x} and {:#04x} are not contiguous",
                master, slave
            ),
            ControllerError::RangeOverflow { offset } => {
                write!(f, "vector range at {:#04x} runs past 255", offset)
            }
            ControllerError::NotRemapped => write!(f, "interrupt controllers not remapped"),
            ControllerError::LineOutOfRange { line } => {
                write!(f, "IRQ line {} out of range", line)
            }
            ControllerError::CascadeLine => write!(f, "IRQ 2 is the cascade line"),
        }
    }
}

/// Errors raised while bringing up the interrupt subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InitError {
    /// Vector table setup failed.
    Table(TableError),
    /// Controller programming failed.
    Controller(ControllerError),
}

impl From<TableError> for InitError {
    fn from(err: TableError) -> Self {
        InitError::Table(err)
    }
}

impl From<ControllerError> for InitError {
    fn from(err: ControllerError) -> Self {
        InitError::Controller(err)
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Table(err) => write!(f, "vector table: {}", err),
            InitError::Controller(err) => write!(f, "interrupt controller: {}", err),
        }
    }
}
