use thiserror::Error;

pub const LONG_WORD_SIZE: usize = 4;

/// Magic cookie at offset 0 of every AmigaOS Hunk executable.
pub const HUNK_HEADER: [u8; 4] = [0x00, 0x00, 0x03, 0xf3];

pub const HUNK_UNIT: u32 = 0x0000_03e7;
pub const HUNK_NAME: u32 = 0x0000_03e8;
pub const HUNK_CODE: u32 = 0x0000_03e9;
pub const HUNK_DATA: u32 = 0x0000_03ea;
pub const HUNK_BSS: u32 = 0x0000_03eb;
pub const HUNK_RELOC32: u32 = 0x0000_03ec;
pub const HUNK_RELOC16: u32 = 0x0000_03ed;
pub const HUNK_END: u32 = 0x0000_03f2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected end of file at offset {offset:#x}: needed {needed} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("skip of {len} bytes at offset {offset:#x} breaks long-word alignment")]
    Misaligned { offset: usize, len: usize },
    #[error("incorrect header for Amiga executable: {found:02x?}")]
    MalformedHeader { found: [u8; 4] },
    #[error("resident library references are not supported (first name is {first_name_long_words} long words)")]
    UnsupportedResidentLibraries { first_name_long_words: u32 },
    #[error("malformed hunk table: first hunk {first}, last hunk {last}")]
    MalformedTable { first: u32, last: u32 },
    #[error("unknown hunk block type {tag:#010x} at offset {offset:#x}")]
    UnknownBlockType { tag: u32, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Unit,
    Name,
    Code,
    Data,
    Bss,
    Reloc32,
    Reloc16,
    End,
}

impl BlockType {
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            HUNK_UNIT => Some(Self::Unit),
            HUNK_NAME => Some(Self::Name),
            HUNK_CODE => Some(Self::Code),
            HUNK_DATA => Some(Self::Data),
            HUNK_BSS => Some(Self::Bss),
            HUNK_RELOC32 => Some(Self::Reloc32),
            HUNK_RELOC16 => Some(Self::Reloc16),
            HUNK_END => Some(Self::End),
            _ => None,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Unit => "Start of program unit",
            Self::Name => "Name block",
            Self::Code => "Code block",
            Self::Data => "Initialized data block",
            Self::Bss => "Uninitialized data block",
            Self::Reloc32 => "32-bit relocation information",
            Self::Reloc16 => "16-bit relocation information",
            Self::End => "End block of a hunk",
        }
    }
}

/// Human-readable name for a raw block tag, with a fixed fallback for tags
/// outside the known set.
#[must_use]
pub fn describe_tag(tag: u32) -> &'static str {
    BlockType::from_tag(tag).map_or("Unknown hunk block type", BlockType::description)
}

pub mod cursor;
pub mod hunk;
