use crate::{
    client::GenomicsClient,
    error::GenomicsResult,
    models::{SearchReadsRequest, SearchReadsResponse},
};
use reqwest::Method;
use log::{debug, info};

/// Read API operations
pub struct ReadApi<'a> {
    client: &'a GenomicsClient,
}

impl<'a> ReadApi<'a> {
    pub fn new(client: &'a GenomicsClient) -> Self {
        Self { client }
    }

    /// Search reads overlapping a reference range
    ///
    /// # Arguments
    /// * `request` - Read group set ids, reference name and half-open range
    /// * `fields` - Partial-response field mask
    pub async fn search(
        &self,
        request: &SearchReadsRequest,
        fields: Option<&str>,
    ) -> GenomicsResult<SearchReadsResponse> {
        info!(
            "Searching reads in {:?} on {}:{:?}-{:?}",
            request.read_group_set_ids, request.reference_name, request.start, request.end
        );
        let mut req = self.client.request(Method::POST, "reads/search").await?;
        req = GenomicsClient::with_fields(req, fields);
        debug!("HTTP POST reads/search with fields={:?}", fields);
        debug!("Request body: {:?}", request);

        self.client.execute(req.json(request)).await
    }
}
