//! DNAnexus API connector implementation
//!
//! Implements the `ProjectStore` trait. Every API route is a JSON POST with a
//! bearer token; retries and backoff are left to the `HttpClient`.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::store::{FolderHandle, ProjectHandle, ProjectNode, ProjectStore};
use core_runtime::DnanexusCredentials;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{DnanexusError, Result};
use crate::types::{
    DescribeDataObjectsRequest, DescribeDataObjectsResponse, DescribeFields, ErrorResponse,
    FindDataObjectsRequest, FindDataObjectsResponse, FindProjectsRequest, FindProjectsResponse,
    FoundDataObject, ListFolderRequest, ListFolderResponse, ProjectDescribe, SearchScope,
};

/// Prefix of every project ID
const PROJECT_ID_PREFIX: &str = "project-";

/// Maximum results per findDataObjects page (API limit)
const MAX_PAGE_SIZE: u32 = 1000;

/// Maximum objects per describeDataObjects call
const DESCRIBE_BATCH_SIZE: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// DNAnexus API connector
///
/// # Example
///
/// ```ignore
/// use provider_dnanexus::DnanexusConnector;
/// use bridge_traits::store::ProjectStore;
///
/// let connector = DnanexusConnector::from_credentials(http_client, &credentials.dnanexus);
/// let project = connector.resolve_project("project-G1abc").await?;
/// ```
pub struct DnanexusConnector {
    http_client: Arc<dyn HttpClient>,
    api_token: String,
    base_url: String,
}

impl DnanexusConnector {
    /// Create a connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `api_token` - API token with at least VIEW access to the projects
    /// * `api_server` - API host (`api.dnanexus.com`) or full base URL
    pub fn new(http_client: Arc<dyn HttpClient>, api_token: String, api_server: &str) -> Self {
        let api_server = api_server.trim_end_matches('/');
        let base_url = if api_server.starts_with("http://") || api_server.starts_with("https://")
        {
            api_server.to_string()
        } else {
            format!("https://{}", api_server)
        };

        Self {
            http_client,
            api_token,
            base_url,
        }
    }

    pub fn from_credentials(
        http_client: Arc<dyn HttpClient>,
        credentials: &DnanexusCredentials,
    ) -> Self {
        Self::new(
            http_client,
            credentials.api_token.clone(),
            &credentials.api_server,
        )
    }

    fn object_route(&self, object_id: &str, method: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(object_id),
            method
        )
    }

    fn system_route(&self, method: &str) -> String {
        format!("{}/system/{}", self.base_url, method)
    }

    /// POST a JSON body and decode the JSON reply
    #[instrument(skip(self, url, body), fields(url = %url))]
    async fn call<B, T>(&self, url: String, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post_json(url, body)?
            .bearer_token(self.api_token.as_str())
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            let error = Self::error_from_response(&response);
            if !error.is_not_found() {
                warn!("API request failed: {}", error);
            }
            return Err(error);
        }

        debug!("API request succeeded: status={}", response.status);
        serde_json::from_slice(&response.body)
            .map_err(|e| DnanexusError::ParseError(format!("Unexpected response body: {}", e)))
    }

    fn error_from_response(response: &HttpResponse) -> DnanexusError {
        let (error_type, message) = match serde_json::from_slice::<ErrorResponse>(&response.body)
        {
            Ok(parsed) => (parsed.error.error_type, parsed.error.message),
            Err(_) => ("Unknown".to_string(), response.text_lossy()),
        };

        if response.status == 401 {
            return DnanexusError::AuthenticationFailed(message);
        }

        DnanexusError::ApiError {
            status_code: response.status,
            error_type,
            message,
        }
    }

    async fn describe_project(&self, project_id: &str) -> Result<Option<ProjectHandle>> {
        let body = DescribeFields::of(&["id", "name"]);
        match self
            .call::<_, ProjectDescribe>(self.object_route(project_id, "describe"), &body)
            .await
        {
            Ok(project) => Ok(Some(ProjectHandle {
                id: project.id,
                name: project.name,
            })),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_project_by_name(&self, name: &str) -> Result<Option<ProjectHandle>> {
        let body = FindProjectsRequest {
            name,
            level: "VIEW",
            describe: DescribeFields::of(&["id", "name"]),
            limit: 2,
        };
        let response: FindProjectsResponse =
            self.call(self.system_route("findProjects"), &body).await?;

        match response.results.len() {
            0 => Ok(None),
            1 => {
                let project = response.results.into_iter().next().map(|found| ProjectHandle {
                    name: found
                        .describe
                        .map(|d| d.name)
                        .unwrap_or_else(|| name.to_string()),
                    id: found.id,
                });
                Ok(project)
            }
            count => Err(DnanexusError::AmbiguousProject {
                name: name.to_string(),
                count,
            }),
        }
    }

    async fn find_files_page(
        &self,
        project: &ProjectHandle,
        folder: &str,
        starting: Option<serde_json::Value>,
    ) -> Result<FindDataObjectsResponse> {
        let body = FindDataObjectsRequest {
            scope: SearchScope {
                project: &project.id,
                folder,
                recurse: true,
            },
            classname: "file",
            describe: DescribeFields::of(&["name", "folder", "size"]),
            limit: MAX_PAGE_SIZE,
            starting,
        };
        self.call(self.system_route("findDataObjects"), &body).await
    }

    fn convert_file(found: FoundDataObject) -> Result<ProjectNode> {
        let describe = found.describe.ok_or_else(|| {
            DnanexusError::ParseError(format!("File {} returned without a describe hash", found.id))
        })?;

        let (Some(name), Some(folder)) = (describe.name, describe.folder) else {
            return Err(DnanexusError::ParseError(format!(
                "File {} is missing its name or folder",
                found.id
            )));
        };

        Ok(ProjectNode::file(
            found.id,
            join_path(&folder, &name),
            describe.size,
        ))
    }

    async fn describe_sizes(&self, file_ids: &[String]) -> Result<HashMap<String, u64>> {
        let mut sizes = HashMap::with_capacity(file_ids.len());

        for chunk in file_ids.chunks(DESCRIBE_BATCH_SIZE) {
            let body = DescribeDataObjectsRequest {
                objects: chunk,
                class_describe_options: HashMap::from([("*", DescribeFields::of(&["id", "size"]))]),
            };
            let response: DescribeDataObjectsResponse = self
                .call(self.system_route("describeDataObjects"), &body)
                .await?;

            // Results come back in request order
            for (id, described) in chunk.iter().zip(response.results) {
                if let Some(size) = described.describe.and_then(|d| d.size) {
                    sizes.insert(id.clone(), size);
                }
            }
        }

        Ok(sizes)
    }
}

/// Join a folder (`/runs`, `/`) and a file name into an absolute path
fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    format!("{}/{}", folder, name)
}

#[async_trait]
impl ProjectStore for DnanexusConnector {
    #[instrument(skip(self))]
    async fn resolve_project(&self, identifier: &str) -> BridgeResult<Option<ProjectHandle>> {
        let project = if identifier.starts_with(PROJECT_ID_PREFIX) {
            self.describe_project(identifier).await?
        } else {
            self.find_project_by_name(identifier).await?
        };

        match &project {
            Some(p) => info!("Resolved project {} ({})", p.id, p.name),
            None => info!("Project {} not found", identifier),
        }

        Ok(project)
    }

    #[instrument(skip(self, project), fields(project = %project.id))]
    async fn resolve_folder(
        &self,
        project: &ProjectHandle,
        folder_path: &str,
    ) -> BridgeResult<Option<FolderHandle>> {
        let path = format!("/{}", folder_path.trim_matches('/'));
        let body = ListFolderRequest {
            folder: &path,
            only: "folders",
        };

        match self
            .call::<_, ListFolderResponse>(self.object_route(&project.id, "listFolder"), &body)
            .await
        {
            Ok(listing) => {
                debug!("Folder {} has {} sub-folder(s)", path, listing.folders.len());
                Ok(Some(FolderHandle {
                    project_id: project.id.clone(),
                    path,
                }))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, project, folder), fields(project = %project.id))]
    async fn recursive_list(
        &self,
        project: &ProjectHandle,
        folder: Option<&FolderHandle>,
    ) -> BridgeResult<Vec<ProjectNode>> {
        let folder_path = folder.map(|f| f.path.as_str()).unwrap_or("/");
        info!("Listing files under {}", folder_path);

        let mut nodes = Vec::new();
        let mut starting = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let response = self.find_files_page(project, folder_path, starting).await?;
            debug!(
                "Page {}: {} file(s), more: {}",
                page,
                response.results.len(),
                response.next.is_some()
            );

            for found in response.results {
                nodes.push(Self::convert_file(found)?);
            }

            match response.next {
                Some(next) if !next.is_null() => starting = Some(next),
                _ => break,
            }
        }

        info!("Listed {} file(s) under {}", nodes.len(), folder_path);
        Ok(nodes)
    }

    #[instrument(
        skip(self, project, file_ids),
        fields(project = %project.id, files = file_ids.len())
    )]
    async fn bulk_populate_sizes(
        &self,
        project: &ProjectHandle,
        file_ids: &[String],
    ) -> BridgeResult<HashMap<String, u64>> {
        Ok(self.describe_sizes(file_ids).await?)
    }
}
