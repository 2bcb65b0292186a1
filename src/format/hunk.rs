use crate::format::cursor::LongWordCursor;
use crate::format::{describe_tag, BlockType, FormatError, HUNK_HEADER};

const HUNKF_CHIP: u32 = 1 << 30;
const HUNKF_FAST: u32 = 1 << 31;
const HUNK_SIZE_MASK: u32 = !(HUNKF_CHIP | HUNKF_FAST);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    Any,
    Chip,
    Fast,
    /// Both flag bits set.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkSize {
    pub long_words: u32,
    pub memory: MemoryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkTable {
    pub table_size: u32,
    pub first_hunk: u32,
    pub last_hunk: u32,
    pub sizes: Vec<HunkSize>,
}

impl HunkTable {
    #[must_use]
    pub fn total_hunks(&self) -> usize {
        self.sizes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocGroup {
    pub hunk: u32,
    pub offsets: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkBlock {
    Unit { name: String },
    Name { name: String },
    Code { words: Vec<[u8; 4]> },
    Data { long_words: u32 },
    Bss { long_words: u32 },
    Reloc32 { groups: Vec<RelocGroup> },
    Reloc16 { groups: Vec<RelocGroup> },
    End,
}

impl HunkBlock {
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Unit { .. } => BlockType::Unit,
            Self::Name { .. } => BlockType::Name,
            Self::Code { .. } => BlockType::Code,
            Self::Data { .. } => BlockType::Data,
            Self::Bss { .. } => BlockType::Bss,
            Self::Reloc32 { .. } => BlockType::Reloc32,
            Self::Reloc16 { .. } => BlockType::Reloc16,
            Self::End => BlockType::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub index: usize,
    pub blocks: Vec<HunkBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkFile {
    pub table: HunkTable,
    pub hunks: Vec<Hunk>,
}

/// Decodes a complete Hunk executable held in memory.
///
/// # Errors
/// Returns `FormatError` for a wrong magic cookie, a resident library
/// reference list, a malformed hunk table, an unknown block tag, or input that
/// ends in the middle of a structure.
pub fn parse_hunk_file(input: &[u8]) -> Result<HunkFile, FormatError> {
    let mut cursor = LongWordCursor::new(input);

    if !validate_header(&mut cursor)? {
        let mut found = [0u8; 4];
        found.copy_from_slice(&input[..4]);
        return Err(FormatError::MalformedHeader { found });
    }
    scan_resident_libraries(&mut cursor)?;
    let table = read_hunk_table(&mut cursor)?;
    log::debug!(
        "hunk table: size={} first={} last={} hunks={}",
        table.table_size,
        table.first_hunk,
        table.last_hunk,
        table.total_hunks()
    );

    let mut hunks = Vec::new();
    for index in 0..table.total_hunks() {
        hunks.push(decode_hunk(&mut cursor, index)?);
    }

    if !cursor.is_eof() {
        log::debug!(
            "ignoring {} trailing bytes at offset {:#x}",
            cursor.remaining(),
            cursor.position()
        );
    }
    Ok(HunkFile { table, hunks })
}

/// Reads the first long word and reports whether it is the Hunk magic cookie.
///
/// # Errors
/// Returns `FormatError::OutOfBounds` for inputs shorter than one long word.
pub fn validate_header(cursor: &mut LongWordCursor<'_>) -> Result<bool, FormatError> {
    Ok(cursor.read_long_word_bytes()? == HUNK_HEADER)
}

/// Consumes the resident library table, which must be empty.
///
/// # Errors
/// Returns `FormatError::UnsupportedResidentLibraries` when the table holds a
/// name.
pub fn scan_resident_libraries(cursor: &mut LongWordCursor<'_>) -> Result<(), FormatError> {
    let first_name_long_words = cursor.read_long_word()?;
    if first_name_long_words != 0 {
        return Err(FormatError::UnsupportedResidentLibraries {
            first_name_long_words,
        });
    }
    Ok(())
}

/// Reads the table size, hunk range and per-hunk memory sizes.
///
/// # Errors
/// Returns `FormatError::MalformedTable` when the last hunk precedes the first.
pub fn read_hunk_table(cursor: &mut LongWordCursor<'_>) -> Result<HunkTable, FormatError> {
    let table_size = cursor.read_long_word()?;
    let first_hunk = cursor.read_long_word()?;
    let last_hunk = cursor.read_long_word()?;

    let total = last_hunk
        .checked_sub(first_hunk)
        .and_then(|span| span.checked_add(1))
        .ok_or(FormatError::MalformedTable {
            first: first_hunk,
            last: last_hunk,
        })?;

    let mut sizes = Vec::new();
    for _ in 0..total {
        sizes.push(read_hunk_size(cursor)?);
    }

    Ok(HunkTable {
        table_size,
        first_hunk,
        last_hunk,
        sizes,
    })
}

fn read_hunk_size(cursor: &mut LongWordCursor<'_>) -> Result<HunkSize, FormatError> {
    let raw = cursor.read_long_word()?;
    let memory = match (raw & HUNKF_CHIP != 0, raw & HUNKF_FAST != 0) {
        (false, false) => MemoryKind::Any,
        (true, false) => MemoryKind::Chip,
        (false, true) => MemoryKind::Fast,
        (true, true) => MemoryKind::Both,
    };
    Ok(HunkSize {
        long_words: raw & HUNK_SIZE_MASK,
        memory,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HunkState {
    ReadingBlocks,
    Done,
}

/// Decodes the blocks of one hunk up to and including its `End` block.
///
/// # Errors
/// Propagates the first block decode failure; the hunk is abandoned.
pub fn decode_hunk(cursor: &mut LongWordCursor<'_>, index: usize) -> Result<Hunk, FormatError> {
    let mut blocks = Vec::new();
    let mut state = HunkState::ReadingBlocks;
    while state == HunkState::ReadingBlocks {
        let block = decode_block(cursor)?;
        if block == HunkBlock::End {
            state = HunkState::Done;
        }
        blocks.push(block);
    }
    Ok(Hunk { index, blocks })
}

/// Reads one block tag and its payload.
///
/// # Errors
/// Returns `FormatError::UnknownBlockType` for tags outside the supported set
/// and `FormatError::OutOfBounds` for truncated payloads.
pub fn decode_block(cursor: &mut LongWordCursor<'_>) -> Result<HunkBlock, FormatError> {
    let offset = cursor.position();
    let tag = cursor.read_long_word()?;
    log::debug!("block {tag:#x} ({}) at offset {offset:#x}", describe_tag(tag));

    let Some(kind) = BlockType::from_tag(tag) else {
        return Err(FormatError::UnknownBlockType { tag, offset });
    };
    let block = match kind {
        BlockType::Unit => HunkBlock::Unit {
            name: read_name(cursor)?,
        },
        BlockType::Name => HunkBlock::Name {
            name: read_name(cursor)?,
        },
        BlockType::Code => {
            let count = cursor.read_long_word()?;
            let mut words = Vec::new();
            for _ in 0..count {
                words.push(cursor.read_long_word_bytes()?);
            }
            HunkBlock::Code { words }
        }
        BlockType::Data => {
            let long_words = cursor.read_long_word()?;
            cursor.skip_long_words(long_words)?;
            HunkBlock::Data { long_words }
        }
        BlockType::Bss => HunkBlock::Bss {
            long_words: cursor.read_long_word()?,
        },
        BlockType::Reloc32 => HunkBlock::Reloc32 {
            groups: read_reloc_groups(cursor)?,
        },
        BlockType::Reloc16 => HunkBlock::Reloc16 {
            groups: read_reloc_groups(cursor)?,
        },
        BlockType::End => HunkBlock::End,
    };
    Ok(block)
}

fn read_reloc_groups(cursor: &mut LongWordCursor<'_>) -> Result<Vec<RelocGroup>, FormatError> {
    let mut groups = Vec::new();
    loop {
        let count = cursor.read_long_word()?;
        if count == 0 {
            break;
        }
        let hunk = cursor.read_long_word()?;
        let mut offsets = Vec::new();
        for _ in 0..count {
            offsets.push(cursor.read_long_word()?);
        }
        log::trace!("reloc group: hunk={hunk} offsets={}", offsets.len());
        groups.push(RelocGroup { hunk, offsets });
    }
    Ok(groups)
}

// Long-word counted text, NUL padded up to the next long word.
fn read_name(cursor: &mut LongWordCursor<'_>) -> Result<String, FormatError> {
    let count = cursor.read_long_word()?;
    let mut bytes = Vec::new();
    for _ in 0..count {
        bytes.extend_from_slice(&cursor.read_long_word_bytes()?);
    }
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}
