//! Flag types attached to syntax nodes.

bitflags::bitflags! {
    /// Flags on syntax nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const NONE      = 0;
        /// `let` declaration list.
        const LET       = 1 << 0;
        /// `const` declaration list.
        const CONST     = 1 << 1;
        /// `?` on a parameter, property or method signature.
        const OPTIONAL  = 1 << 2;
        /// `readonly` modifier on a member.
        const READONLY  = 1 << 3;
        /// `...` on a parameter or array/argument element.
        const REST      = 1 << 4;
        /// Node built by a tool rather than read from source text.
        const SYNTHESIZED = 1 << 5;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}
