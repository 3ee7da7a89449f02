use crate::{
    client::GenomicsClient,
    error::GenomicsResult,
    models::{SearchReadGroupSetsRequest, SearchReadGroupSetsResponse},
};
use reqwest::Method;
use log::{debug, info};

/// Read group set API operations
pub struct ReadGroupSetApi<'a> {
    client: &'a GenomicsClient,
}

impl<'a> ReadGroupSetApi<'a> {
    pub fn new(client: &'a GenomicsClient) -> Self {
        Self { client }
    }

    /// Search read group sets
    ///
    /// # Arguments
    /// * `request` - Dataset ids and optional name to match
    /// * `fields` - Partial-response field mask (e.g. `readGroupSets(id)`)
    pub async fn search(
        &self,
        request: &SearchReadGroupSetsRequest,
        fields: Option<&str>,
    ) -> GenomicsResult<SearchReadGroupSetsResponse> {
        info!("Searching read group sets in datasets {:?}", request.dataset_ids);
        let mut req = self.client.request(Method::POST, "readgroupsets/search").await?;
        req = GenomicsClient::with_fields(req, fields);
        debug!("HTTP POST readgroupsets/search with fields={:?}", fields);
        debug!("Request body: {:?}", request);

        self.client.execute(req.json(request)).await
    }
}
