/// Shader interface summary
///
/// Bitmasks of the user-defined input and output registers of one stage, plus
/// its push constant block. Comparing the outputs of one stage with the
/// inputs of the next gives the inputs that must be eliminated.

use crate::dxbc::SignatureTable;

/// Registers at or above this index cannot be tracked in the masks
pub const MAX_INTERFACE_REGS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InterfaceSlots {
    /// Bit `n` set = input register `n` is read
    pub input_slots: u32,
    /// Bit `n` set = output register `n` is written
    pub output_slots: u32,
    /// Push constant block offset in bytes
    pub push_const_offset: u32,
    /// Push constant block size in bytes, 0 if the shader has none
    pub push_const_size: u32,
}

impl InterfaceSlots {
    /// Masks built from decoded input and output signatures
    ///
    /// System values are not part of the user interface and are skipped.
    pub fn from_signatures(inputs: &SignatureTable, outputs: &SignatureTable) -> Self {
        Self {
            input_slots: register_mask(inputs),
            output_slots: register_mask(outputs),
            push_const_offset: 0,
            push_const_size: 0,
        }
    }

    pub fn with_push_constants(mut self, offset: u32, size: u32) -> Self {
        self.push_const_offset = offset;
        self.push_const_size = size;
        self
    }

    /// Inputs of `consumer` that `producer` never writes
    pub fn undefined_inputs(producer: &InterfaceSlots, consumer: &InterfaceSlots) -> u32 {
        consumer.input_slots & !producer.output_slots
    }
}

fn register_mask(table: &SignatureTable) -> u32 {
    table
        .iter()
        .filter(|e| e.system_value.is_none() && e.register_id < MAX_INTERFACE_REGS)
        .fold(0, |mask, e| mask | (1u32 << e.register_id))
}
