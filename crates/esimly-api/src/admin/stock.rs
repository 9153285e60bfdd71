// Admin stock endpoints
//
// Pool listing, per-pool item drill-down, the usage report, CSV bulk
// upload (multipart), and template download. PIN and eSIM stock share one
// endpoint family distinguished by a path segment.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::types::{BulkUploadMetaDto, CsvTemplateDto, StockItemDto, StockPoolDto};

/// Which stock family an upload/template call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockKind {
    Pin,
    Esim,
}

impl StockKind {
    /// Path segment used by the bulk-upload and template endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Pin => "pins",
            Self::Esim => "esims",
        }
    }
}

impl ApiClient {
    /// List stock pools with aggregate counts.
    ///
    /// `GET /admin/stock/pools`
    pub async fn stock_pools(&self) -> Result<Vec<StockPoolDto>, Error> {
        let url = self.api_url("admin/stock/pools");
        self.get_list(url, &["pools", "stockPools"]).await
    }

    /// Items of one pool, decrypted server-side before transmission.
    ///
    /// `GET /admin/stock/pools/{id}/items`
    pub async fn stock_pool_items(&self, pool_id: &str) -> Result<Vec<StockItemDto>, Error> {
        let url = self.api_url(&format!("admin/stock/pools/{pool_id}/items"));
        self.get_list(url, &["items", "stockItems"]).await
    }

    /// Stock usage report (consumption per pool over time). Raw JSON;
    /// the shape follows the reporting backend.
    ///
    /// `GET /admin/stock/usage-report`
    pub async fn stock_usage_report(&self) -> Result<Value, Error> {
        let url = self.api_url("admin/stock/usage-report");
        self.get(url).await
    }

    /// Bulk-upload a CSV of PINs or eSIMs as multipart form data.
    ///
    /// `POST /admin/stock/{pins|esims}/bulk-upload` -- the file part plus
    /// pool metadata fields. The server re-validates the row count; the
    /// client-side count is advisory only.
    pub async fn bulk_upload(
        &self,
        kind: StockKind,
        file_name: &str,
        csv_bytes: Vec<u8>,
        meta: &BulkUploadMetaDto,
    ) -> Result<Option<String>, Error> {
        let url = self.api_url(&format!(
            "admin/stock/{}/bulk-upload",
            kind.path_segment()
        ));
        debug!(pool = %meta.pool_name, file = file_name, "bulk-uploading stock");

        let file_part = reqwest::multipart::Part::bytes(csv_bytes)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")
            .map_err(Error::Transport)?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("poolName", meta.pool_name.clone())
            .text("totalStock", meta.total_stock.to_string())
            .text("price", meta.price.to_string());
        if let Some(ref notes) = meta.notes {
            form = form.text("notes", notes.clone());
        }

        let value = self.post_multipart(url, form).await?;
        Ok(envelope::extract_message(&value))
    }

    /// Fetch the CSV template schema for a stock family.
    ///
    /// `GET /admin/stock/{pins|esims}/template` -- the server defines the
    /// schema as JSON `{headers, example}`; the client formats it into a
    /// downloadable CSV.
    pub async fn stock_template(&self, kind: StockKind) -> Result<CsvTemplateDto, Error> {
        let url = self.api_url(&format!("admin/stock/{}/template", kind.path_segment()));
        let value = self.get(url).await?;
        envelope::extract_object(value, &["template"])
    }
}
