use serde::{Deserialize, Serialize};

/// The wire format encodes 64-bit integers as JSON strings. Accept both
/// forms on input and emit strings on output.
pub(crate) mod int64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::Number(n) => Ok(n),
            StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
        }
    }

    pub mod option {
        use super::StringOrNumber;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_str(&v.to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            match Option::<StringOrNumber>::deserialize(deserializer)? {
                None => Ok(None),
                Some(StringOrNumber::Number(n)) => Ok(Some(n)),
                Some(StringOrNumber::String(s)) => s.parse().map(Some).map_err(de::Error::custom),
            }
        }
    }
}

/// A reference name plus a single zero-based coordinate.
///
/// A point query covers exactly one base: `start == end == position`.
/// Search requests carry it as the half-open range `[position, position + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub reference_name: String,
    pub position: i64,
}

impl Locus {
    pub fn new(reference_name: impl Into<String>, position: i64) -> Self {
        Self {
            reference_name: reference_name.into(),
            position,
        }
    }

    /// Inclusive start of the point range
    pub fn start(&self) -> i64 {
        self.position
    }

    /// Inclusive end of the point range
    pub fn end(&self) -> i64 {
        self.position
    }

    /// Exclusive end as sent on the wire
    pub fn wire_end(&self) -> i64 {
        self.end() + 1
    }
}

/// Read group set information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadGroupSet {
    pub id: String,
    pub dataset_id: Option<String>,
    pub name: Option<String>,
}

/// Read group set search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadGroupSetsRequest {
    pub dataset_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Read group set search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadGroupSetsResponse {
    #[serde(default)]
    pub read_group_sets: Vec<ReadGroupSet>,
    pub next_page_token: Option<String>,
}

/// Position on a reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub reference_name: Option<String>,
    #[serde(with = "int64")]
    pub position: i64,
    #[serde(default)]
    pub reverse_strand: bool,
}

/// CIGAR operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CigarOperation {
    AlignmentMatch,
    Insert,
    Delete,
    Skip,
    ClipSoft,
    ClipHard,
    Pad,
    SequenceMatch,
    SequenceMismatch,
}

impl CigarOperation {
    pub fn consumes_read(self) -> bool {
        matches!(
            self,
            Self::AlignmentMatch
                | Self::Insert
                | Self::ClipSoft
                | Self::SequenceMatch
                | Self::SequenceMismatch
        )
    }

    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Self::AlignmentMatch
                | Self::Delete
                | Self::Skip
                | Self::SequenceMatch
                | Self::SequenceMismatch
        )
    }
}

/// One run of a CIGAR string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CigarUnit {
    pub operation: CigarOperation,
    #[serde(with = "int64")]
    pub operation_length: i64,
}

impl CigarUnit {
    pub fn new(operation: CigarOperation, operation_length: i64) -> Self {
        Self {
            operation,
            operation_length,
        }
    }
}

/// Linear alignment of a read against a reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearAlignment {
    pub position: Position,
    #[serde(default)]
    pub cigar: Vec<CigarUnit>,
}

/// A sequenced fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Read {
    pub id: Option<String>,
    pub alignment: Option<LinearAlignment>,
    #[serde(default)]
    pub aligned_sequence: String,
}

impl Read {
    /// An aligned read with no CIGAR, as returned for reads without indel information
    pub fn at(position: i64, aligned_sequence: impl Into<String>) -> Self {
        Self {
            id: None,
            alignment: Some(LinearAlignment {
                position: Position {
                    reference_name: None,
                    position,
                    reverse_strand: false,
                },
                cigar: Vec::new(),
            }),
            aligned_sequence: aligned_sequence.into(),
        }
    }

    pub fn with_cigar(mut self, cigar: Vec<CigarUnit>) -> Self {
        if let Some(alignment) = self.alignment.as_mut() {
            alignment.cigar = cigar;
        }
        self
    }

    /// Zero-based start of the alignment on the reference
    pub fn start(&self) -> Option<i64> {
        self.alignment.as_ref().map(|a| a.position.position)
    }
}

/// Read search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadsRequest {
    pub read_group_set_ids: Vec<String>,
    pub reference_name: String,
    #[serde(with = "int64::option", skip_serializing_if = "Option::is_none", default)]
    pub start: Option<i64>,
    #[serde(with = "int64::option", skip_serializing_if = "Option::is_none", default)]
    pub end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Read search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadsResponse {
    #[serde(default)]
    pub alignments: Vec<Read>,
    pub next_page_token: Option<String>,
}

/// Call set information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSet {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub variant_set_ids: Vec<String>,
}

/// Call set search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCallSetsRequest {
    pub variant_set_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Call set search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCallSetsResponse {
    #[serde(default)]
    pub call_sets: Vec<CallSet>,
    pub next_page_token: Option<String>,
}

/// A genotype call for one sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub call_set_id: Option<String>,
    pub call_set_name: Option<String>,
    #[serde(default)]
    pub genotype: Vec<i32>,
}

/// Variant information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: Option<String>,
    pub reference_name: Option<String>,
    #[serde(with = "int64::option", skip_serializing_if = "Option::is_none", default)]
    pub start: Option<i64>,
    #[serde(with = "int64::option", skip_serializing_if = "Option::is_none", default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub reference_bases: String,
    #[serde(default)]
    pub alternate_bases: Vec<String>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

/// Variant search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantsRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variant_set_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_set_ids: Vec<String>,
    pub reference_name: String,
    #[serde(with = "int64")]
    pub start: i64,
    #[serde(with = "int64")]
    pub end: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Variant search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantsResponse {
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub next_page_token: Option<String>,
}

/// Error response from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ErrorBody>,
}

/// Body of an API error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}
