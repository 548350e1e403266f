//! FASTA/FASTQ and plain-text sequence loading
//!
//! Records are parsed with needletail; `.gz` files are decoded with flate2
//! first. Files without a `>` or `@` header are read as one bare sequence
//! with all whitespace removed. Every symbol outside ACGT (either case) is
//! stored as [`Base::Unknown`].

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use needletail::parse_fastx_reader;
use thiserror::Error;

use crate::types::{bases_from_ascii, Base, Position, Sequence};

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

/// Sequence file reader
pub struct FastaParser;

impl FastaParser {
    /// Parse every record in a FASTA, FASTQ or plain-text file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
        let path = path.as_ref();
        let data = Self::read_all(path)
            .with_context(|| format!("Failed to read sequence file {}", path.display()))?;
        let fallback_id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sequence".to_string());

        let sequences = Self::parse_bytes(&data, &fallback_id)?;
        log::debug!("Loaded {} sequence(s) from {}", sequences.len(), path.display());
        Ok(sequences)
    }

    /// The first record of a file.
    pub fn load_single<P: AsRef<Path>>(path: P) -> Result<Sequence> {
        let mut sequences = Self::parse_file(path)?;
        if sequences.len() > 1 {
            log::warn!(
                "{} records found, using the first ({})",
                sequences.len(),
                sequences[0].id
            );
        }
        Ok(sequences.swap_remove(0))
    }

    /// Parse FASTA/FASTQ records from any readable source.
    pub fn parse_reader<R: Read + Send>(reader: R) -> Result<Vec<Sequence>> {
        let mut sequences = Vec::new();
        let mut fastx_reader =
            parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;

        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            sequences.push(Self::record_to_sequence(record.id(), &record.seq()));
        }

        if sequences.is_empty() {
            Err(FastaError::EmptyFile.into())
        } else {
            Ok(sequences)
        }
    }

    /// Parse in-memory file contents, falling back to plain text when the
    /// data has no record header.
    pub fn parse_bytes(data: &[u8], fallback_id: &str) -> Result<Vec<Sequence>> {
        let start = match data.iter().position(|byte| !byte.is_ascii_whitespace()) {
            Some(start) => start,
            None => return Err(FastaError::EmptyFile.into()),
        };
        match data[start] {
            b'>' | b'@' => Self::parse_reader(Cursor::new(&data[start..])),
            _ => Ok(vec![Self::parse_plain_text(data, fallback_id)?]),
        }
    }

    /// One bare sequence, whitespace stripped.
    pub fn parse_plain_text(data: &[u8], id: &str) -> Result<Sequence> {
        let text: Vec<u8> = data
            .iter()
            .copied()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        if text.is_empty() {
            return Err(FastaError::EmptyFile.into());
        }
        Ok(Sequence::from_ascii(id, &text))
    }

    fn read_all(path: &Path) -> Result<Vec<u8>, FastaError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        if path.extension().map_or(false, |ext| ext == "gz") {
            GzDecoder::new(file).read_to_end(&mut data)?;
        } else {
            file.read_to_end(&mut data)?;
        }
        Ok(data)
    }

    fn record_to_sequence(header: &[u8], sequence: &[u8]) -> Sequence {
        let header = String::from_utf8_lossy(header);
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or_default().to_string();
        let description = parts
            .next()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let record = Sequence::new(id, bases_from_ascii(sequence));
        match description {
            Some(text) => record.with_description(text),
            None => record,
        }
    }
}

/// Write one record as FASTA, wrapping lines at `line_width` (0 disables wrapping).
pub fn write_fasta<W: Write>(writer: &mut W, sequence: &Sequence, line_width: usize) -> std::io::Result<()> {
    match &sequence.description {
        Some(description) => writeln!(writer, ">{} {}", sequence.id, description)?,
        None => writeln!(writer, ">{}", sequence.id)?,
    }

    let text: Vec<u8> = sequence.bases().iter().map(|base| base.to_ascii()).collect();
    let width = if line_width == 0 { text.len().max(1) } else { line_width };
    for line in text.chunks(width) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Summary of a loaded sequence set
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceStatistics {
    pub total_sequences: usize,
    pub total_length: Position,
    pub min_length: Position,
    pub max_length: Position,
    /// Percentage of G/C among canonical bases
    pub gc_content: f64,
    /// Percentage of unknown symbols over all positions
    pub unknown_content: f64,
}

impl SequenceStatistics {
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let mut gc = 0usize;
        let mut canonical = 0usize;
        let mut unknown = 0usize;
        for base in sequences.iter().flat_map(|s| s.bases()) {
            match base {
                Base::G | Base::C => {
                    gc += 1;
                    canonical += 1;
                }
                Base::A | Base::T => canonical += 1,
                Base::Unknown => unknown += 1,
            }
        }

        let total_length: Position = sequences.iter().map(Sequence::len).sum();
        let percent = |part: usize, whole: usize| {
            if whole == 0 {
                0.0
            } else {
                part as f64 / whole as f64 * 100.0
            }
        };

        Self {
            total_sequences: sequences.len(),
            total_length,
            min_length: sequences.iter().map(Sequence::len).min().unwrap_or(0),
            max_length: sequences.iter().map(Sequence::len).max().unwrap_or(0),
            gc_content: percent(gc, canonical),
            unknown_content: percent(unknown, total_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bases_to_string;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_fasta_reader() {
        let fasta_data = ">seq1 description of sequence 1\n\
                          ATCGATCGATCG\n\
                          >seq2\n\
                          gctagctagcta\n";

        let sequences = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id, "seq1");
        assert_eq!(sequences[0].description.as_deref(), Some("description of sequence 1"));
        assert_eq!(bases_to_string(sequences[0].bases()), "ATCGATCGATCG");

        assert_eq!(sequences[1].id, "seq2");
        assert_eq!(sequences[1].description, None);
        assert_eq!(bases_to_string(sequences[1].bases()), "GCTAGCTAGCTA");
    }

    #[test]
    fn test_parse_fastq_reader() {
        let fastq_data = "@read1\n\
                          ATCGNTCG\n\
                          +\n\
                          IIIIIIII\n";

        let sequences = FastaParser::parse_reader(Cursor::new(fastq_data)).unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].id, "read1");
        assert_eq!(bases_to_string(sequences[0].bases()), "ATCGNTCG");
        assert_eq!(sequences[0].bases()[4], Base::Unknown);
    }

    #[test]
    fn test_multiline_fasta() {
        let fasta_data = ">seq1\nATCGATCG\nATCGATCG\nGCTAGCTA\n";
        let sequences = FastaParser::parse_reader(Cursor::new(fasta_data)).unwrap();
        assert_eq!(sequences[0].len(), 24);
    }

    #[test]
    fn test_plain_text_sequence() {
        let sequences = FastaParser::parse_bytes(b"acgt ACGT\nRYAC\r\n", "reference").unwrap();
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].id, "reference");
        assert_eq!(bases_to_string(sequences[0].bases()), "ACGTACGTNNAC");
    }

    #[test]
    fn test_empty_input() {
        assert!(FastaParser::parse_reader(Cursor::new("")).is_err());

        let err = FastaParser::parse_bytes(b"  \n\n", "empty").unwrap_err();
        assert!(matches!(err.downcast_ref::<FastaError>(), Some(FastaError::EmptyFile)));
    }

    #[test]
    fn test_parse_plain_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ACGTACGT").unwrap();
        writeln!(file, "ACGT").unwrap();

        let sequence = FastaParser::load_single(file.path()).unwrap();
        assert_eq!(sequence.len(), 12);
    }

    #[test]
    fn test_parse_gzipped_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.fa.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b">q1\nGGGGTTTT\n>q2\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let sequences = FastaParser::parse_file(&path).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(bases_to_string(sequences[0].bases()), "GGGGTTTT");

        let first = FastaParser::load_single(&path).unwrap();
        assert_eq!(first.id, "q1");
    }

    #[test]
    fn test_write_fasta_wraps_and_reads_back() {
        let sequence = Sequence::from_ascii("chr1", b"ACGTACGTAC").with_description("test record");
        let mut buffer = Vec::new();
        write_fasta(&mut buffer, &sequence, 4).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), ">chr1 test record\nACGT\nACGT\nAC\n");

        let parsed = FastaParser::parse_reader(Cursor::new(buffer)).unwrap();
        assert_eq!(parsed[0].id, "chr1");
        assert_eq!(parsed[0].description.as_deref(), Some("test record"));
        assert_eq!(parsed[0].bases(), sequence.bases());
    }

    #[test]
    fn test_missing_file() {
        assert!(FastaParser::parse_file("/nonexistent/reference.fa").is_err());
    }

    #[test]
    fn test_sequence_statistics() {
        let sequences = vec![
            Sequence::from_ascii("a", b"GGCC"),
            Sequence::from_ascii("b", b"ATNN"),
        ];
        let stats = SequenceStatistics::from_sequences(&sequences);
        assert_eq!(stats.total_sequences, 2);
        assert_eq!(stats.total_length, 8);
        assert_eq!(stats.min_length, 4);
        assert_eq!(stats.max_length, 4);
        assert!((stats.gc_content - 66.666).abs() < 0.01);
        assert!((stats.unknown_content - 25.0).abs() < 1e-9);
    }
}
