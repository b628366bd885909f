//! 6502 addressing modes.
//!
//! The 6502 supports thirteen distinct ways of locating an instruction's
//! operand. The state machine in [`crate::cpu`] decodes one of these from
//! the opcode byte (via [`crate::opcodes::OPCODE_TABLE`]) and then steps
//! through the cycle sequence appropriate to the mode.

/// Addressing modes for 6502 instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Implied - no operand, the opcode alone determines the action.
    /// Example: CLC, SEC, INX, NOP.
    Implied,

    /// Accumulator - operates directly on the A register.
    /// Example: ASL A, ROL A.
    Accumulator,

    /// Immediate - operand is the byte immediately following the opcode.
    /// Example: LDA #$42.
    Immediate,

    /// Zero Page - 8-bit address into the first 256 bytes of memory.
    /// Example: LDA $42.
    ZeroPage,

    /// Zero Page,X - zero page address offset by X, wrapping within the page.
    /// Example: LDA $42,X.
    ZeroPageX,

    /// Zero Page,Y - zero page address offset by Y, wrapping within the page.
    /// Example: LDX $42,Y.
    ZeroPageY,

    /// Absolute - a full 16-bit address.
    /// Example: LDA $1234.
    Absolute,

    /// Absolute,X - 16-bit address offset by X. Reads incur a page-cross
    /// penalty; writes and read-modify-write always pay the extra cycle.
    /// Example: LDA $1234,X.
    AbsoluteX,

    /// Absolute,Y - 16-bit address offset by Y, same timing rules as
    /// [`Self::AbsoluteX`].
    /// Example: LDA $1234,Y.
    AbsoluteY,

    /// Indirect - 16-bit pointer to a 16-bit target address. Used only by
    /// JMP, and subject to the page-wrap bug when the pointer's low byte
    /// is $FF.
    /// Example: JMP ($1234).
    Indirect,

    /// Indexed Indirect, (Zero Page,X) - zero page pointer indexed by X
    /// before dereferencing.
    /// Example: LDA ($42,X).
    IndexedIndirectX,

    /// Indirect Indexed, (Zero Page),Y - zero page pointer dereferenced
    /// first, then the result indexed by Y.
    /// Example: LDA ($42),Y.
    IndirectIndexedY,

    /// Relative - signed 8-bit branch offset, relative to the address of
    /// the instruction following the branch.
    /// Example: BEQ label.
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode byte for this mode.
    #[must_use]
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndexedIndirectX
            | Self::IndirectIndexedY
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }

    /// Whether this mode's effective address can cross a page boundary
    /// and incur a variable-cycle read penalty.
    #[must_use]
    pub const fn can_page_cross(self) -> bool {
        matches!(
            self,
            Self::AbsoluteX | Self::AbsoluteY | Self::IndirectIndexedY | Self::Relative
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_bytes() {
        assert_eq!(AddressingMode::Implied.operand_bytes(), 0);
        assert_eq!(AddressingMode::Accumulator.operand_bytes(), 0);
        assert_eq!(AddressingMode::Immediate.operand_bytes(), 1);
        assert_eq!(AddressingMode::ZeroPage.operand_bytes(), 1);
        assert_eq!(AddressingMode::Relative.operand_bytes(), 1);
        assert_eq!(AddressingMode::Absolute.operand_bytes(), 2);
        assert_eq!(AddressingMode::Indirect.operand_bytes(), 2);
    }

    #[test]
    fn test_can_page_cross() {
        assert!(AddressingMode::AbsoluteX.can_page_cross());
        assert!(AddressingMode::AbsoluteY.can_page_cross());
        assert!(AddressingMode::IndirectIndexedY.can_page_cross());
        assert!(AddressingMode::Relative.can_page_cross());
        assert!(!AddressingMode::Absolute.can_page_cross());
        assert!(!AddressingMode::IndexedIndirectX.can_page_cross());
    }
}
