//! Dependent lookups: resolve a sample name to a single remote identifier,
//! then fetch the records overlapping one coordinate.

use crate::{
    client::GenomicsClient,
    error::{GenomicsError, GenomicsResult},
    models::{
        Locus, Read, SearchCallSetsRequest, SearchReadGroupSetsRequest, SearchReadsRequest,
        SearchVariantsRequest, Variant,
    },
    projection::{format_genotype, genotype_alleles, BaseTally},
};
use log::debug;

/// Upper bound on reads returned by a point query. Further reads are dropped.
pub const DEFAULT_MAX_RESULTS: u32 = 1024;

pub const READ_GROUP_SET_ID_FIELDS: &str = "readGroupSets(id)";
pub const CALL_SET_ID_FIELDS: &str = "callSets(id)";
pub const READ_FIELDS: &str = "alignments(alignment,alignedSequence)";
pub const VARIANT_FIELDS: &str = "variants(names,referenceBases,alternateBases,calls(genotype))";

/// Outcome of a search that is expected to match exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matches<T> {
    One(T),
    Zero,
    Many(usize),
}

impl<T> Matches<T> {
    pub fn from_vec(mut items: Vec<T>) -> Self {
        match items.len() {
            0 => Self::Zero,
            1 => Self::One(items.remove(0)),
            n => Self::Many(n),
        }
    }

    /// The single match, or a cardinality error naming what was searched for
    pub fn into_single(self, kind: &'static str, name: &str) -> GenomicsResult<T> {
        match self {
            Self::One(item) => Ok(item),
            Self::Zero => Err(GenomicsError::cardinality(kind, name, 0)),
            Self::Many(n) => Err(GenomicsError::cardinality(kind, name, n)),
        }
    }
}

/// Find the id of the one read group set named `sample` in `dataset_id`
pub async fn resolve_read_group_set_id(
    client: &GenomicsClient,
    dataset_id: &str,
    sample: &str,
) -> GenomicsResult<String> {
    let request = SearchReadGroupSetsRequest {
        dataset_ids: vec![dataset_id.to_string()],
        name: Some(sample.to_string()),
        page_size: None,
        page_token: None,
    };
    let response = client
        .readgroupsets()
        .search(&request, Some(READ_GROUP_SET_ID_FIELDS))
        .await?;

    let read_group_set = Matches::from_vec(response.read_group_sets)
        .into_single("read group sets", sample)?;
    debug!("Resolved {} to read group set {}", sample, read_group_set.id);
    Ok(read_group_set.id)
}

/// Find the id of the one call set named `sample` in `variant_set_id`
pub async fn resolve_call_set_id(
    client: &GenomicsClient,
    variant_set_id: &str,
    sample: &str,
) -> GenomicsResult<String> {
    let request = SearchCallSetsRequest {
        variant_set_ids: vec![variant_set_id.to_string()],
        name: Some(sample.to_string()),
        page_size: None,
        page_token: None,
    };
    let response = client
        .callsets()
        .search(&request, Some(CALL_SET_ID_FIELDS))
        .await?;

    let call_set = Matches::from_vec(response.call_sets).into_single("call sets", sample)?;
    debug!("Resolved {} to call set {}", sample, call_set.id);
    Ok(call_set.id)
}

/// Reads overlapping `locus`, at most `max_results` of them
pub async fn fetch_reads_at(
    client: &GenomicsClient,
    read_group_set_id: &str,
    locus: &Locus,
    max_results: u32,
) -> GenomicsResult<Vec<Read>> {
    let request = SearchReadsRequest {
        read_group_set_ids: vec![read_group_set_id.to_string()],
        reference_name: locus.reference_name.clone(),
        start: Some(locus.start()),
        end: Some(locus.wire_end()),
        page_size: Some(max_results),
        page_token: None,
    };
    let response = client.reads().search(&request, Some(READ_FIELDS)).await?;

    if response.next_page_token.is_some() {
        debug!("Read search truncated at {} results", response.alignments.len());
    }
    Ok(response.alignments)
}

/// Variants in `call_set_id` overlapping `locus`
pub async fn fetch_variants_at(
    client: &GenomicsClient,
    call_set_id: &str,
    locus: &Locus,
) -> GenomicsResult<Vec<Variant>> {
    let request = SearchVariantsRequest {
        variant_set_ids: Vec::new(),
        call_set_ids: vec![call_set_id.to_string()],
        reference_name: locus.reference_name.clone(),
        start: locus.start(),
        end: locus.wire_end(),
        page_size: None,
        page_token: None,
    };
    let response = client
        .variants()
        .search(&request, Some(VARIANT_FIELDS))
        .await?;
    Ok(response.variants)
}

/// Tally of the bases `sample` carries at `locus`
pub async fn read_bases_at(
    client: &GenomicsClient,
    dataset_id: &str,
    sample: &str,
    locus: &Locus,
    max_results: u32,
) -> GenomicsResult<BaseTally> {
    let read_group_set_id = resolve_read_group_set_id(client, dataset_id, sample).await?;
    let reads = fetch_reads_at(client, &read_group_set_id, locus, max_results).await?;
    debug!("Fetched {} reads at {}:{}", reads.len(), locus.reference_name, locus.position);
    Ok(BaseTally::from_reads(&reads, locus.position)?)
}

/// Genotype called for one sample at one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalledGenotype {
    pub alleles: Vec<String>,
    pub variant_name: Option<String>,
}

impl CalledGenotype {
    pub fn genotype(&self) -> String {
        format_genotype(&self.alleles)
    }
}

/// Genotype `sample` was called with at the first variant overlapping `locus`
pub async fn called_genotype_at(
    client: &GenomicsClient,
    variant_set_id: &str,
    sample: &str,
    locus: &Locus,
) -> GenomicsResult<CalledGenotype> {
    let call_set_id = resolve_call_set_id(client, variant_set_id, sample).await?;
    let variants = fetch_variants_at(client, &call_set_id, locus).await?;

    let variant = variants.first().ok_or_else(|| {
        GenomicsError::NotFound(format!(
            "no variant for {} at {}:{}",
            sample, locus.reference_name, locus.position
        ))
    })?;
    let call = variant.calls.first().ok_or_else(|| {
        GenomicsError::InvalidResponse(format!("variant at {} has no call for {}", locus.position, sample))
    })?;

    Ok(CalledGenotype {
        alleles: genotype_alleles(variant, call)?,
        variant_name: variant.names.first().cloned(),
    })
}
