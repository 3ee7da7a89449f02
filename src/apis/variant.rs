use crate::{
    client::GenomicsClient,
    error::GenomicsResult,
    models::{SearchVariantsRequest, SearchVariantsResponse},
};
use reqwest::Method;
use log::{debug, info};

/// Variant API operations
pub struct VariantApi<'a> {
    client: &'a GenomicsClient,
}

impl<'a> VariantApi<'a> {
    pub fn new(client: &'a GenomicsClient) -> Self {
        Self { client }
    }

    /// Search variants overlapping a reference range
    ///
    /// # Arguments
    /// * `request` - Call set or variant set ids, reference name and half-open range
    /// * `fields` - Partial-response field mask
    pub async fn search(
        &self,
        request: &SearchVariantsRequest,
        fields: Option<&str>,
    ) -> GenomicsResult<SearchVariantsResponse> {
        info!(
            "Searching variants for call sets {:?} on {}:{}-{}",
            request.call_set_ids, request.reference_name, request.start, request.end
        );
        let mut req = self.client.request(Method::POST, "variants/search").await?;
        req = GenomicsClient::with_fields(req, fields);
        debug!("HTTP POST variants/search with fields={:?}", fields);
        debug!("Request body: {:?}", request);

        self.client.execute(req.json(request)).await
    }
}
