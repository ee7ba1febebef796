//! Enumerated header codes: object type, machine, and OS/ABI.
//!
//! Every code enum decodes totally. Codes without a named variant land in a
//! reserved-range variant or in `Unknown`, both of which keep the raw value.

/// Defines a closed code enum with total decoding from its raw integer.
///
/// Named codes are matched first, then the reserved ranges in order, and
/// anything left over becomes `Unknown(raw)`. A range carries labels for both
/// of its bounds; codes strictly inside it print as an offset from the low one.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $raw:ty {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $label:literal,
            )*
        }
        ranges {
            $(
                $(#[$rmeta:meta])*
                $rvariant:ident = $lo:literal ..= $hi:literal => $rlabel:literal ..= $hilabel:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            $(
                $(#[$rmeta])*
                $rvariant($raw),
            )*
            /// A code outside every known value and reserved range.
            Unknown($raw),
        }

        impl $name {
            /// Decodes a raw code. Never fails.
            #[must_use]
            pub const fn from_raw(raw: $raw) -> Self {
                match raw {
                    $( $code => Self::$variant, )*
                    $( $lo..=$hi => Self::$rvariant(raw), )*
                    other => Self::Unknown(other),
                }
            }

            /// Returns the raw code.
            #[must_use]
            pub const fn raw(self) -> $raw {
                match self {
                    $( Self::$variant => $code, )*
                    $( Self::$rvariant(raw) => raw, )*
                    Self::Unknown(raw) => raw,
                }
            }

            /// Returns the label of a named code, or `None` for range and
            /// unknown codes.
            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($label), )*
                    _ => None,
                }
            }

            /// Returns `true` if the code has no named variant and falls in no
            /// reserved range.
            #[must_use]
            pub const fn is_unknown(self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match *self {
                    $( Self::$variant => f.write_str($label), )*
                    $(
                        Self::$rvariant(raw) if raw == $lo => f.write_str($rlabel),
                        Self::$rvariant(raw) if raw == $hi => f.write_str($hilabel),
                        Self::$rvariant(raw) => write!(f, "{}+{:#x}", $rlabel, raw - $lo),
                    )*
                    Self::Unknown(raw) => write!(f, "unknown ({raw:#x})"),
                }
            }
        }
    };
}

pub(crate) use code_enum;

code_enum! {
    /// Object file type (`e_type`).
    pub enum ObjectType: u16 {
        /// `ET_NONE`.
        None = 0 => "NONE",
        /// `ET_REL`.
        Relocatable = 1 => "REL (relocatable)",
        /// `ET_EXEC`.
        Executable = 2 => "EXEC (executable)",
        /// `ET_DYN`.
        Shared = 3 => "DYN (shared object)",
        /// `ET_CORE`.
        Core = 4 => "CORE (core dump)",
    }
    ranges {
        /// `ET_LOOS..=ET_HIOS`.
        OsSpecific = 0xfe00..=0xfeff => "LOOS"..="HIOS",
        /// `ET_LOPROC..=ET_HIPROC`.
        ProcessorSpecific = 0xff00..=0xffff => "LOPROC"..="HIPROC",
    }
}

code_enum! {
    /// Target instruction set (`e_machine`).
    pub enum Machine: u16 {
        /// `EM_NONE`.
        None = 0x00 => "none",
        /// `EM_SPARC`.
        Sparc = 0x02 => "SPARC",
        /// `EM_386`.
        X86 = 0x03 => "x86",
        /// `EM_68K`.
        M68k = 0x04 => "Motorola 68000",
        /// `EM_MIPS`.
        Mips = 0x08 => "MIPS",
        /// `EM_PPC`.
        PowerPc = 0x14 => "PowerPC",
        /// `EM_PPC64`.
        PowerPc64 = 0x15 => "PowerPC64",
        /// `EM_S390`.
        S390 = 0x16 => "S390",
        /// `EM_ARM`.
        Arm = 0x28 => "ARM",
        /// `EM_SH`.
        SuperH = 0x2a => "SuperH",
        /// `EM_IA_64`.
        Ia64 = 0x32 => "IA-64",
        /// `EM_X86_64`.
        X86_64 = 0x3e => "x86-64",
        /// `EM_AARCH64`.
        Aarch64 = 0xb7 => "AArch64",
        /// `EM_RISCV`.
        RiscV = 0xf3 => "RISC-V",
        /// `EM_BPF`.
        Bpf = 0xf7 => "BPF",
        /// `EM_LOONGARCH`.
        LoongArch = 0x102 => "LoongArch",
    }
    ranges {}
}

code_enum! {
    /// Operating system / ABI identification (`e_ident[EI_OSABI]`).
    pub enum OsAbi: u8 {
        /// `ELFOSABI_SYSV`.
        SystemV = 0x00 => "UNIX - System V",
        /// `ELFOSABI_HPUX`.
        HpUx = 0x01 => "HP-UX",
        /// `ELFOSABI_NETBSD`.
        NetBsd = 0x02 => "NetBSD",
        /// `ELFOSABI_LINUX` (GNU).
        Linux = 0x03 => "Linux",
        /// `ELFOSABI_HURD`.
        Hurd = 0x04 => "GNU Hurd",
        /// `ELFOSABI_SOLARIS`.
        Solaris = 0x06 => "Solaris",
        /// `ELFOSABI_AIX`.
        Aix = 0x07 => "AIX",
        /// `ELFOSABI_IRIX`.
        Irix = 0x08 => "IRIX",
        /// `ELFOSABI_FREEBSD`.
        FreeBsd = 0x09 => "FreeBSD",
        /// `ELFOSABI_TRU64`.
        Tru64 = 0x0a => "Tru64",
        /// `ELFOSABI_MODESTO`.
        Modesto = 0x0b => "Novell Modesto",
        /// `ELFOSABI_OPENBSD`.
        OpenBsd = 0x0c => "OpenBSD",
        /// `ELFOSABI_OPENVMS`.
        OpenVms = 0x0d => "OpenVMS",
        /// `ELFOSABI_NSK`.
        NonStop = 0x0e => "NonStop Kernel",
        /// `ELFOSABI_AROS`.
        Aros = 0x0f => "AROS",
        /// `ELFOSABI_FENIXOS`.
        FenixOs = 0x10 => "FenixOS",
        /// `ELFOSABI_CLOUDABI`.
        CloudAbi = 0x11 => "CloudABI",
        /// `ELFOSABI_OPENVOS`.
        OpenVos = 0x12 => "Stratus Technologies OpenVOS",
        /// `ELFOSABI_ARM`.
        Arm = 0x61 => "ARM",
        /// `ELFOSABI_STANDALONE`.
        Standalone = 0xff => "Standalone App",
    }
    ranges {}
}
