//! Field selectors for `reset` and `set_expected_field`

use bitflags::bitflags;

bitflags! {
    /// A set of experiment fields. Combine with `|`, or use `Fields::ALL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Fields: u8 {
        const CMD = 1 << 0;
        const STDIN = 1 << 1;
        const CODE = 1 << 2;
        const STDOUT = 1 << 3;
        const STDERR = 1 << 4;
        const FILES = 1 << 5;
        const ALL = Self::CMD.bits()
            | Self::STDIN.bits()
            | Self::CODE.bits()
            | Self::STDOUT.bits()
            | Self::STDERR.bits()
            | Self::FILES.bits();
    }
}
