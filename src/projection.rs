//! Pure projections of fetched records onto a single reference coordinate.

use crate::error::ProjectionError;
use crate::models::{Call, Read, Variant};
use std::collections::BTreeMap;
use std::fmt;

/// Allele shown for a no-call genotype index
pub const NO_CALL: &str = ".";

/// Base at `coordinate`, indexing the aligned sequence at `coordinate - start`.
///
/// Ignores the CIGAR, so the result is wrong for reads with an insertion or
/// deletion before the coordinate. Use [`base_at`] for real data.
pub fn base_at_offset(read: &Read, coordinate: i64) -> Result<char, ProjectionError> {
    let start = read.start().ok_or(ProjectionError::MissingAlignment)?;
    let offset = coordinate - start;
    let len = read.aligned_sequence.len();

    usize::try_from(offset)
        .ok()
        .and_then(|i| read.aligned_sequence.as_bytes().get(i))
        .map(|&b| b as char)
        .ok_or(ProjectionError::OutOfRange { offset, len })
}

/// Base at `coordinate`, walking the alignment's CIGAR.
///
/// Returns `Ok(None)` when the coordinate falls in a deletion or skipped
/// region of the read. Reads without a CIGAR fall back to [`base_at_offset`].
pub fn base_at(read: &Read, coordinate: i64) -> Result<Option<char>, ProjectionError> {
    let alignment = read
        .alignment
        .as_ref()
        .ok_or(ProjectionError::MissingAlignment)?;
    if alignment.cigar.is_empty() {
        return base_at_offset(read, coordinate).map(Some);
    }

    let mut reference_pos = alignment.position.position;
    let mut read_pos: i64 = 0;

    for unit in &alignment.cigar {
        let op = unit.operation;
        let len = unit.operation_length;
        let reference_end = reference_pos
            .checked_add(len)
            .ok_or(ProjectionError::NotCovered(coordinate))?;

        if op.consumes_reference() && coordinate < reference_end {
            if coordinate < reference_pos {
                break;
            }
            if !op.consumes_read() {
                return Ok(None);
            }
            let offset = read_pos
                .checked_add(coordinate - reference_pos)
                .ok_or(ProjectionError::NotCovered(coordinate))?;
            return usize::try_from(offset)
                .ok()
                .and_then(|i| read.aligned_sequence.as_bytes().get(i))
                .map(|&b| Some(b as char))
                .ok_or(ProjectionError::OutOfRange {
                    offset,
                    len: read.aligned_sequence.len(),
                });
        }

        if op.consumes_reference() {
            reference_pos = reference_end;
        }
        if op.consumes_read() {
            read_pos = read_pos
                .checked_add(len)
                .ok_or(ProjectionError::NotCovered(coordinate))?;
        }
    }

    Err(ProjectionError::NotCovered(coordinate))
}

/// Allele strings selected by a call's genotype indices
pub fn genotype_alleles(variant: &Variant, call: &Call) -> Result<Vec<String>, ProjectionError> {
    call.genotype
        .iter()
        .map(|&index| match index {
            0 => Ok(variant.reference_bases.clone()),
            -1 => Ok(NO_CALL.to_string()),
            n if n > 0 => variant
                .alternate_bases
                .get((n - 1) as usize)
                .cloned()
                .ok_or(ProjectionError::GenotypeIndex {
                    index: n,
                    alternates: variant.alternate_bases.len(),
                }),
            n => Err(ProjectionError::GenotypeIndex {
                index: n,
                alternates: variant.alternate_bases.len(),
            }),
        })
        .collect()
}

/// Human-readable genotype, e.g. `G,T`
pub fn format_genotype(alleles: &[String]) -> String {
    alleles.join(",")
}

/// Occurrence count per base
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTally {
    counts: BTreeMap<char, usize>,
}

impl BaseTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, base: char) {
        *self.counts.entry(base).or_insert(0) += 1;
    }

    /// Tally the base each read carries at `coordinate`.
    /// Reads with a deletion at the coordinate contribute nothing.
    pub fn from_reads<'a, I>(reads: I, coordinate: i64) -> Result<Self, ProjectionError>
    where
        I: IntoIterator<Item = &'a Read>,
    {
        let mut tally = Self::new();
        for read in reads {
            if let Some(base) = base_at(read, coordinate)? {
                tally.add(base);
            }
        }
        Ok(tally)
    }

    pub fn get(&self, base: char) -> usize {
        self.counts.get(&base).copied().unwrap_or(0)
    }

    /// Number of distinct bases
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(&base, &count)| (base, count))
    }
}

impl FromIterator<char> for BaseTally {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut tally = Self::new();
        for base in iter {
            tally.add(base);
        }
        tally
    }
}

impl fmt::Display for BaseTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (base, count) in self.iter() {
            writeln!(f, "{}: {}", base, count)?;
        }
        Ok(())
    }
}
