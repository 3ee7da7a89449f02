use crate::models::Locus;
use crate::projection::BaseTally;
use std::io::{self, Write};

/// Print the base tally for `sample` at `locus`
pub fn write_base_tally<W: Write>(
    out: &mut W,
    sample: &str,
    locus: &Locus,
    tally: &BaseTally,
) -> io::Result<()> {
    writeln!(
        out,
        "{} bases on {} at {} are",
        sample, locus.reference_name, locus.position
    )?;
    write!(out, "{}", tally)
}

/// Print the called genotype, labelled with the variant's first name when it has one
pub fn write_genotype<W: Write>(
    out: &mut W,
    genotype: &str,
    variant_name: Option<&str>,
) -> io::Result<()> {
    match variant_name {
        Some(name) => writeln!(out, "the called genotype is {} at {}", genotype, name),
        None => writeln!(out, "the called genotype is {}", genotype),
    }
}
