//! Key events produced by [`IrService`](super::service::IrService).

use crate::decode::NecCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrEvent {
    /// A new key press (data frame).
    Pressed {
        code: u32,
        /// Address/command split, if the code passes the NEC inverse check.
        command: Option<NecCommand>,
    },
    /// The held key is still down; `count` repeats so far.
    Repeated { code: u32, count: u16 },
}

impl IrEvent {
    pub fn code(&self) -> u32 {
        match self {
            Self::Pressed { code, .. } | Self::Repeated { code, .. } => *code,
        }
    }
}
