use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use oxford_parser::{parse_entry, ParsedEntry};
use oxford_protocol::{LineNumber, SequenceId, TermRecord};
use tracing::{debug, info, warn};

const PROGRESS_EVERY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Two-space indented output
    pub pretty: bool,
    /// Put the detected part of speech into `definitionTags`
    pub pos_tags: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            pos_tags: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Lines with any non-whitespace content
    pub entries: usize,
    pub records: usize,
    pub skipped: usize,
    pub with_reading: usize,
    pub with_government: usize,
    pub examples: usize,
}

impl ConversionReport {
    fn count(&mut self, entry: &ParsedEntry) {
        self.records += 1;
        self.with_reading += usize::from(entry.reading.is_some());
        self.with_government += usize::from(!entry.government.is_empty());
        self.examples += entry.examples.len();
    }
}

pub fn to_record(entry: ParsedEntry, sequence: SequenceId, options: &ConvertOptions) -> TermRecord {
    let mut record = TermRecord::new(entry.headword, sequence, entry.content);
    record.reading = entry.reading.unwrap_or_default();
    if options.pos_tags {
        if let Some(pos) = entry.part_of_speech {
            record.definition_tags = pos.tag_name().to_string();
        }
    }
    record
}

/// Reads and parses every export line from `reader`.
///
/// Lines that cannot be parsed are logged and skipped; they still consume a
/// sequence number so numbering follows the source. Read errors abort.
fn collect_records<R: BufRead>(
    reader: R,
    options: &ConvertOptions,
) -> anyhow::Result<(Vec<TermRecord>, ConversionReport)> {
    let mut report = ConversionReport::default();
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = LineNumber::new(idx as u32 + 1);
        let line = line.with_context(|| format!("Failed to read {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let sequence = SequenceId::new(report.entries as u32);
        report.entries += 1;

        match parse_entry(&line) {
            Ok(entry) => {
                debug!(
                    "{line_number}: `{}` reading={:?} pos={:?} government={} examples={}",
                    entry.headword,
                    entry.reading,
                    entry.part_of_speech,
                    entry.government.len(),
                    entry.examples.len()
                );
                report.count(&entry);
                records.push(to_record(entry, sequence, options));
            }
            Err(e) => {
                report.skipped += 1;
                match e.headword() {
                    Some(headword) => warn!("Skipping {line_number} (`{headword}`): {e}"),
                    None => warn!("Skipping {line_number}: {e}"),
                }
            }
        }

        if report.entries % PROGRESS_EVERY == 0 {
            info!("⚙️  Processed {} entries...", report.entries);
        }
    }

    info!(
        "Parsed {} records ({} with readings, {} with case government, {} examples)",
        report.records, report.with_reading, report.with_government, report.examples
    );
    Ok((records, report))
}

/// Serializes `records` as one JSON term bank and flushes `writer`.
fn write_records<W: Write>(
    mut writer: W,
    records: &[TermRecord],
    options: &ConvertOptions,
) -> anyhow::Result<()> {
    let written = if options.pretty {
        serde_json::to_writer_pretty(&mut writer, records)
    } else {
        serde_json::to_writer(&mut writer, records)
    };
    written.context("Failed to write term bank")?;
    writer.flush().context("Failed to flush term bank")?;
    Ok(())
}

/// Reads export lines from `reader` and writes one JSON term bank to `writer`.
/// Nothing is written unless the whole input was read.
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    options: &ConvertOptions,
) -> anyhow::Result<ConversionReport> {
    let (records, report) = collect_records(reader, options)?;
    write_records(writer, &records, options)?;

    Ok(report)
}

/// File-to-file conversion. The term bank is built in memory and the output
/// is created only after the whole input has been read, so a missing or
/// unreadable export leaves an existing term bank untouched.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> anyhow::Result<ConversionReport> {
    let reader = File::open(input)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open input {:?}", input))?;
    let mut bank = Vec::new();
    let report = convert(reader, &mut bank, options)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    let mut writer = File::create(output)
        .with_context(|| format!("Failed to create output {:?}", output))?;
    writer
        .write_all(&bank)
        .with_context(|| format!("Failed to write {:?}", output))?;

    info!(
        "Wrote {} of {} entries to {:?}",
        report.records, report.entries, output
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use std::path::PathBuf;

    const EXPORT: &str = concat!(
        "дом<div>◉ <span style=\"color:dimgray\">д<u>о</u>м</span> <i>m.</i></div><div>house</div>\\n\n",
        "\n",
        "<div>orphan body</div>\n",
        "рассказать — (что-л., о чём-л.) рассказать историю — to tell a story\n",
        "   \n",
        "брать — impf. to take\n",
        "дом<div>home</div>\n",
    );

    fn run(input: &str, options: &ConvertOptions) -> (ConversionReport, Vec<u8>) {
        let mut out = Vec::new();
        let report = convert(input.as_bytes(), &mut out, options).unwrap();
        (report, out)
    }

    fn rows(bytes: &[u8]) -> Vec<Value> {
        match serde_json::from_slice(bytes).unwrap() {
            Value::Array(rows) => rows,
            other => panic!("Expected array, got {other}"),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("termbank-compiler-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_counts_and_skip_policy() {
        let (report, out) = run(EXPORT, &ConvertOptions::default());

        assert_eq!(report.entries, 5);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.records, 4);
        assert_eq!(report.with_reading, 1);
        assert_eq!(report.with_government, 1);
        assert_eq!(report.examples, 1);
        assert_eq!(rows(&out).len(), report.records);
    }

    #[test]
    fn test_rows_follow_term_bank_schema() {
        let (_, out) = run(EXPORT, &ConvertOptions::default());
        let rows = rows(&out);

        for row in &rows {
            let row = row.as_array().unwrap();
            assert_eq!(row.len(), TermRecord::FIELD_COUNT);
            assert_eq!(row[3], "");
            assert_eq!(row[4], 0);
            assert_eq!(row[5][0]["type"], "structured-content");
            assert_eq!(row[7], "");
        }

        // term, reading, tags, sequence
        assert_eq!(rows[0][0], "дом");
        assert_eq!(rows[0][1], "дом");
        assert_eq!(rows[0][2], "noun");
        assert_eq!(rows[0][6], 0);

        // the orphan body consumed sequence 1
        assert_eq!(rows[1][0], "рассказать");
        assert_eq!(rows[1][1], "");
        assert_eq!(rows[1][6], 2);

        assert_eq!(rows[2][2], "verb");
        assert_eq!(rows[3][0], "дом");
        assert_eq!(rows[3][6], 4);
    }

    #[test]
    fn test_gloss_keeps_government_and_example() {
        let (_, out) = run(
            "рассказать — (что-л., о чём-л.) рассказать историю — to tell a story\n",
            &ConvertOptions::default(),
        );
        let rows = rows(&out);
        assert_eq!(rows.len(), 1);

        let gloss = rows[0][5].to_string();
        assert!(gloss.contains("(что-л., о чём-л.)"));
        assert!(gloss.contains("рассказать историю"));
        assert!(gloss.contains("to tell a story"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let (_, first) = run(EXPORT, &ConvertOptions::default());
        let (_, second) = run(EXPORT, &ConvertOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_options() {
        let options = ConvertOptions {
            pretty: false,
            pos_tags: false,
        };
        let (_, out) = run(EXPORT, &options);
        let text = String::from_utf8(out.clone()).unwrap();

        assert!(!text.contains('\n'));
        assert!(text.contains("дом"), "UTF-8 is written unescaped");
        assert!(rows(&out).iter().all(|row| row[2] == ""));

        let (_, pretty) = run(EXPORT, &ConvertOptions::default());
        assert!(String::from_utf8(pretty).unwrap().starts_with("[\n  [\n    \"дом\""));
    }

    #[test]
    fn test_empty_input_gives_empty_array() {
        let (report, out) = run("", &ConvertOptions::default());
        assert_eq!(report, ConversionReport::default());
        assert_eq!(out, b"[]");
    }

    #[test]
    fn test_convert_file_overwrites_output() {
        let input = temp_path("input.txt");
        let output = temp_path("term_bank_1.json");
        fs::write(&input, "дом<div>house</div>\n").unwrap();
        fs::write(&output, "stale").unwrap();

        let report = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(report.records, 1);
        let written = fs::read(&output).unwrap();
        assert_eq!(rows(&written)[0][0], "дом");

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_missing_input_is_fatal_and_keeps_output() {
        let input = temp_path("does-not-exist.txt");
        let output = temp_path("untouched.json");
        fs::write(&output, "previous").unwrap();

        let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to open input"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");

        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_read_error_keeps_existing_output() {
        let input = temp_path("bad-utf8.txt");
        let output = temp_path("kept.json");
        let mut bytes = "дом<div>house</div>\n".as_bytes().to_vec();
        bytes.extend_from_slice(b"\xff\xfe<div>x</div>\n");
        fs::write(&input, bytes).unwrap();
        fs::write(&output, r#"["previous good bank"]"#).unwrap();

        let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert_eq!(fs::read_to_string(&output).unwrap(), r#"["previous good bank"]"#);

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let input = temp_path("input-unwritable.txt");
        fs::write(&input, "дом<div>house</div>\n").unwrap();

        let err = convert_file(&input, &std::env::temp_dir(), &ConvertOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to create output"));

        let _ = fs::remove_file(&input);
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let mut out = Vec::new();
        let input: &[u8] = b"\xff\xfe<div>x</div>\n";
        assert!(convert(input, &mut out, &ConvertOptions::default()).is_err());
        assert!(out.is_empty());
    }
}
