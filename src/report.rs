use crate::format::hunk::{HunkBlock, HunkFile, HunkSize, MemoryKind, RelocGroup};
use crate::format::{FormatError, LONG_WORD_SIZE};

const HUNK_SEPARATOR: &str = "========================================\n";
const BLOCK_SEPARATOR: &str = "----------\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub long_words_per_line: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            long_words_per_line: 4,
        }
    }
}

/// Renders the structural report for a decoded file, one line per field.
#[must_use]
pub fn render_report(file: &HunkFile, options: &ReportOptions) -> String {
    let table = &file.table;
    let mut out = String::new();
    out.push_str("* Header check OK\n");
    out.push_str("* No calls to resident libraries found\n");
    out.push_str(&format!("* Hunk table size: {}\n", table.table_size));
    out.push_str(&format!("* First hunk: {}\n", table.first_hunk));
    out.push_str(&format!("* Last hunk: {}\n", table.last_hunk));
    out.push_str(&format!(
        "* Total number of hunks in file: {}\n",
        table.total_hunks()
    ));
    for (idx, size) in table.sizes.iter().enumerate() {
        out.push_str(&format_hunk_size_line(idx, size));
    }

    out.push_str(HUNK_SEPARATOR);
    for hunk in &file.hunks {
        out.push_str(&format!("* Dumping Hunk #{}\n", hunk.index));
        out.push_str(BLOCK_SEPARATOR);
        for block in &hunk.blocks {
            out.push_str(&format!(
                "* Hunk block type: {}\n",
                block.block_type().description()
            ));
            out.push_str(&format_block(block, options));
            if *block != HunkBlock::End {
                out.push_str(BLOCK_SEPARATOR);
            }
        }
        out.push_str(HUNK_SEPARATOR);
    }
    out
}

/// User-facing line for the outcomes that end decoding without a failure
/// status. Returns `None` for genuine errors.
#[must_use]
pub fn render_failure(err: &FormatError) -> Option<&'static str> {
    match err {
        FormatError::MalformedHeader { .. } => Some("Incorrect header for Amiga Executable"),
        FormatError::UnsupportedResidentLibraries { .. } => {
            Some("Calls to resident libraries found")
        }
        _ => None,
    }
}

fn format_block(block: &HunkBlock, options: &ReportOptions) -> String {
    match block {
        HunkBlock::Unit { name } | HunkBlock::Name { name } => format!("** Name: {name}\n"),
        HunkBlock::Code { words } => {
            let mut out = format_size_line("* Code block size", words.len() as u64);
            out.push_str("** Code:\n");
            for row in words.chunks(options.long_words_per_line.max(1)) {
                let line = row
                    .iter()
                    .map(format_long_word)
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push_str(&line);
                out.push('\n');
            }
            out
        }
        HunkBlock::Data { long_words } => {
            format_size_line("** Data block size", u64::from(*long_words))
        }
        HunkBlock::Bss { long_words } => {
            format_size_line("** BSS block size", u64::from(*long_words))
        }
        HunkBlock::Reloc32 { groups } | HunkBlock::Reloc16 { groups } => {
            groups
                .iter()
                .enumerate()
                .map(|(idx, group)| format_reloc_group(idx + 1, group))
                .collect()
        }
        HunkBlock::End => String::new(),
    }
}

fn format_reloc_group(number: usize, group: &RelocGroup) -> String {
    let mut out = format!("** N{number}: {}\n", group.offsets.len());
    out.push_str(&format!("** Hunk number {number}: {}\n", group.hunk));
    for (idx, offset) in group.offsets.iter().enumerate() {
        out.push_str(&format!(
            "** Offset {idx}: {}\n",
            format_long_word(&offset.to_be_bytes())
        ));
    }
    out
}

fn format_size_line(label: &str, long_words: u64) -> String {
    let bytes = long_words * LONG_WORD_SIZE as u64;
    format!("{label}: {long_words} long words = {bytes} bytes\n")
}

fn format_hunk_size_line(idx: usize, size: &HunkSize) -> String {
    let suffix = match size.memory {
        MemoryKind::Any => "",
        MemoryKind::Chip => " (chip memory)",
        MemoryKind::Fast => " (fast memory)",
        MemoryKind::Both => " (chip and fast flags)",
    };
    format!("* Memory size for hunk {idx}: {}{suffix}\n", size.long_words)
}

fn format_long_word(bytes: &[u8; 4]) -> String {
    format!(
        "{:02x} {:02x} {:02x} {:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{render_failure, render_report, ReportOptions};
    use crate::format::hunk::{
        Hunk, HunkBlock, HunkFile, HunkSize, HunkTable, MemoryKind, RelocGroup,
    };
    use crate::format::FormatError;

    fn one_hunk_file(blocks: Vec<HunkBlock>) -> HunkFile {
        HunkFile {
            table: HunkTable {
                table_size: 1,
                first_hunk: 0,
                last_hunk: 0,
                sizes: vec![HunkSize {
                    long_words: 3,
                    memory: MemoryKind::Any,
                }],
            },
            hunks: vec![Hunk { index: 0, blocks }],
        }
    }

    #[test]
    fn renders_header_table_and_blocks() {
        let file = one_hunk_file(vec![
            HunkBlock::Code {
                words: vec![[0x4e, 0x75, 0x00, 0x00]],
            },
            HunkBlock::Reloc32 {
                groups: vec![RelocGroup {
                    hunk: 0,
                    offsets: vec![0x10],
                }],
            },
            HunkBlock::End,
        ]);
        let text = render_report(&file, &ReportOptions::default());
        let expected = "\
* Header check OK
* No calls to resident libraries found
* Hunk table size: 1
* First hunk: 0
* Last hunk: 0
* Total number of hunks in file: 1
* Memory size for hunk 0: 3
========================================
* Dumping Hunk #0
----------
* Hunk block type: Code block
* Code block size: 1 long words = 4 bytes
** Code:
4e 75 00 00
----------
* Hunk block type: 32-bit relocation information
** N1: 1
** Hunk number 1: 0
** Offset 0: 00 00 00 10
----------
* Hunk block type: End block of a hunk
========================================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn groups_code_rows_by_option() {
        let words = (0u8..5).map(|b| [b, b, b, b]).collect::<Vec<_>>();
        let file = one_hunk_file(vec![HunkBlock::Code { words }, HunkBlock::End]);

        let text = render_report(&file, &ReportOptions::default());
        assert!(text.contains("00 00 00 00 01 01 01 01 02 02 02 02 03 03 03 03\n04 04 04 04\n"));

        let text = render_report(
            &file,
            &ReportOptions {
                long_words_per_line: 2,
            },
        );
        assert!(text.contains("00 00 00 00 01 01 01 01\n02 02 02 02 03 03 03 03\n04 04 04 04\n"));

        let text = render_report(
            &file,
            &ReportOptions {
                long_words_per_line: 0,
            },
        );
        assert!(text.contains("** Code:\n00 00 00 00\n01 01 01 01\n"));
    }

    #[test]
    fn renders_sizes_without_overflow() {
        let file = one_hunk_file(vec![
            HunkBlock::Data { long_words: 2 },
            HunkBlock::Bss {
                long_words: u32::MAX,
            },
            HunkBlock::Name {
                name: "DATA".to_string(),
            },
            HunkBlock::End,
        ]);
        let text = render_report(&file, &ReportOptions::default());
        assert!(text.contains("** Data block size: 2 long words = 8 bytes\n"));
        assert!(text.contains("** BSS block size: 4294967295 long words = 17179869180 bytes\n"));
        assert!(text.contains("* Hunk block type: Name block\n** Name: DATA\n"));
    }

    #[test]
    fn annotates_memory_kinds() {
        let mut file = one_hunk_file(vec![HunkBlock::End]);
        file.table.sizes = vec![
            HunkSize {
                long_words: 1,
                memory: MemoryKind::Chip,
            },
            HunkSize {
                long_words: 2,
                memory: MemoryKind::Fast,
            },
            HunkSize {
                long_words: 3,
                memory: MemoryKind::Both,
            },
        ];
        let text = render_report(&file, &ReportOptions::default());
        assert!(text.contains("* Memory size for hunk 0: 1 (chip memory)\n"));
        assert!(text.contains("* Memory size for hunk 1: 2 (fast memory)\n"));
        assert!(text.contains("* Memory size for hunk 2: 3 (chip and fast flags)\n"));
    }

    #[test]
    fn describes_clean_stop_outcomes_only() {
        assert_eq!(
            render_failure(&FormatError::MalformedHeader { found: [0; 4] }),
            Some("Incorrect header for Amiga Executable")
        );
        assert_eq!(
            render_failure(&FormatError::UnsupportedResidentLibraries {
                first_name_long_words: 1
            }),
            Some("Calls to resident libraries found")
        );
        assert_eq!(
            render_failure(&FormatError::MalformedTable { first: 1, last: 0 }),
            None
        );
    }
}
