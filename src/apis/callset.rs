use crate::{
    client::GenomicsClient,
    error::GenomicsResult,
    models::{SearchCallSetsRequest, SearchCallSetsResponse},
};
use reqwest::Method;
use log::{debug, info};

/// Call set API operations
pub struct CallSetApi<'a> {
    client: &'a GenomicsClient,
}

impl<'a> CallSetApi<'a> {
    pub fn new(client: &'a GenomicsClient) -> Self {
        Self { client }
    }

    /// Search call sets
    ///
    /// # Arguments
    /// * `request` - Variant set ids and optional name to match
    /// * `fields` - Partial-response field mask (e.g. `callSets(id)`)
    pub async fn search(
        &self,
        request: &SearchCallSetsRequest,
        fields: Option<&str>,
    ) -> GenomicsResult<SearchCallSetsResponse> {
        info!("Searching call sets in variant sets {:?}", request.variant_set_ids);
        let mut req = self.client.request(Method::POST, "callsets/search").await?;
        req = GenomicsClient::with_fields(req, fields);
        debug!("HTTP POST callsets/search with fields={:?}", fields);
        debug!("Request body: {:?}", request);

        self.client.execute(req.json(request)).await
    }
}
