use super::{Interval, Variant};
use crate::Result;
use serde::Deserialize;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct VariantRow {
    chromosome: String,
    position: u64,
    reference_bases: String,
    alternate_bases: String,
}

#[derive(Debug, Deserialize)]
struct IntervalRow {
    chromosome: String,
    start: u64,
    end: u64,
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All);
    builder
}

/// Loads variants from a CSV file with header
/// `chromosome,position,reference_bases,alternate_bases`.
pub fn load_variants_from_csv(path: impl AsRef<Path>) -> Result<Vec<Variant>> {
    let path = path.as_ref();
    let reader = reader_builder().from_path(path)?;
    let variants = collect_variants(reader)?;
    info!("Loaded {} variants from {}", variants.len(), path.display());
    Ok(variants)
}

/// Loads intervals from a CSV file with header `chromosome,start,end`.
/// Any row with `end <= start` rejects the whole file.
pub fn load_intervals_from_csv(path: impl AsRef<Path>) -> Result<Vec<Interval>> {
    let path = path.as_ref();
    let reader = reader_builder().from_path(path)?;
    let intervals = collect_intervals(reader)?;
    info!("Loaded {} intervals from {}", intervals.len(), path.display());
    Ok(intervals)
}

pub fn read_variants(input: impl io::Read) -> Result<Vec<Variant>> {
    collect_variants(reader_builder().from_reader(input))
}

pub fn read_intervals(input: impl io::Read) -> Result<Vec<Interval>> {
    collect_intervals(reader_builder().from_reader(input))
}

fn collect_variants<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Variant>> {
    let mut variants = Vec::new();
    for row in reader.deserialize::<VariantRow>() {
        let row = row?;
        variants.push(Variant {
            chromosome: row.chromosome,
            position: row.position,
            reference_bases: row.reference_bases,
            alternate_bases: row.alternate_bases,
        });
    }
    Ok(variants)
}

fn collect_intervals<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Interval>> {
    let mut intervals = Vec::new();
    for row in reader.deserialize::<IntervalRow>() {
        let row = row?;
        intervals.push(Interval::new(row.chromosome, row.start, row.end)?);
    }
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_variants_preserves_row_order() {
        let csv = "chromosome,position,reference_bases,alternate_bases\n\
                   chr22,36201698,A,C\n\
                   chr22,36201699,G,T\n";
        let variants = read_variants(csv.as_bytes()).unwrap();
        assert_eq!(
            variants,
            vec![
                Variant::new("chr22", 36_201_698, "A", "C"),
                Variant::new("chr22", 36_201_699, "G", "T"),
            ]
        );
    }

    #[test]
    fn test_read_variants_header_order_is_free() {
        let csv = "position,chromosome,alternate_bases,reference_bases\n\
                   100, chr1 , T , A\n";
        let variants = read_variants(csv.as_bytes()).unwrap();
        assert_eq!(variants, vec![Variant::new("chr1", 100, "A", "T")]);
    }

    #[test]
    fn test_read_variants_rejects_non_integer_position() {
        let csv = "chromosome,position,reference_bases,alternate_bases\n\
                   chr1,abc,A,C\n";
        assert!(matches!(read_variants(csv.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_read_variants_rejects_negative_position() {
        let csv = "chromosome,position,reference_bases,alternate_bases\n\
                   chr1,-5,A,C\n";
        assert!(read_variants(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_variants_rejects_missing_column() {
        let csv = "chromosome,position,reference_bases\nchr1,5,A\n";
        assert!(read_variants(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_intervals() {
        let csv = "chromosome,start,end\n\
                   chr22,35677410,36725986\n\
                   chr21,33000000,34000000\n";
        let intervals = read_intervals(csv.as_bytes()).unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].chromosome(), "chr22");
        assert_eq!(intervals[0].length(), 36_725_986 - 35_677_410);
        assert_eq!(intervals[1].start(), 33_000_000);
    }

    #[test]
    fn test_read_intervals_rejects_end_not_after_start() {
        let csv = "chromosome,start,end\n\
                   chr1,10,20\n\
                   chr1,30,30\n";
        let result = read_intervals(csv.as_bytes());
        assert!(matches!(
            result,
            Err(Error::InvalidInterval { start: 30, end: 30, .. })
        ));
    }

    #[test]
    fn test_read_empty_file_yields_no_rows() {
        let csv = "chromosome,start,end\n";
        assert!(read_intervals(csv.as_bytes()).unwrap().is_empty());
    }
}
