//! DNAnexus API request and response types
//!
//! Data structures for the JSON bodies of the API routes the connector uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Error body returned with non-2xx statuses
///
/// See: https://documentation.dnanexus.com/developer/api/protocols#errors
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// `/project-xxxx/describe` response (subset)
#[derive(Debug, Deserialize)]
pub struct ProjectDescribe {
    pub id: String,
    pub name: String,
}

/// `/system/findProjects` request
#[derive(Debug, Serialize)]
pub struct FindProjectsRequest<'a> {
    pub name: &'a str,
    pub level: &'a str,
    pub describe: DescribeFields,
    pub limit: u32,
}

/// `/system/findProjects` response
#[derive(Debug, Deserialize)]
pub struct FindProjectsResponse {
    pub results: Vec<FoundProject>,
}

#[derive(Debug, Deserialize)]
pub struct FoundProject {
    pub id: String,
    #[serde(default)]
    pub describe: Option<ProjectDescribe>,
}

/// `/project-xxxx/listFolder` request
#[derive(Debug, Serialize)]
pub struct ListFolderRequest<'a> {
    pub folder: &'a str,
    pub only: &'a str,
}

/// `/project-xxxx/listFolder` response (subset)
#[derive(Debug, Deserialize)]
pub struct ListFolderResponse {
    #[serde(default)]
    pub folders: Vec<String>,
}

/// `{"fields": {"name": true, ...}}` describe selector
#[derive(Debug, Serialize)]
pub struct DescribeFields {
    pub fields: HashMap<&'static str, bool>,
}

impl DescribeFields {
    pub fn of(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().map(|field| (*field, true)).collect(),
        }
    }
}

/// `/system/findDataObjects` request
///
/// See: https://documentation.dnanexus.com/developer/api/search#api-method-system-finddataobjects
#[derive(Debug, Serialize)]
pub struct FindDataObjectsRequest<'a> {
    pub scope: SearchScope<'a>,
    pub classname: &'a str,
    pub describe: DescribeFields,
    pub limit: u32,
    /// Opaque cursor copied from the previous response's `next`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SearchScope<'a> {
    pub project: &'a str,
    pub folder: &'a str,
    pub recurse: bool,
}

/// `/system/findDataObjects` response
#[derive(Debug, Deserialize)]
pub struct FindDataObjectsResponse {
    pub results: Vec<FoundDataObject>,
    /// Cursor for the next page; `null` when exhausted
    #[serde(default)]
    pub next: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct FoundDataObject {
    pub id: String,
    #[serde(default)]
    pub describe: Option<DataObjectDescribe>,
}

/// Describe hash of a file (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct DataObjectDescribe {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    /// Absent while a file is still open
    #[serde(default)]
    pub size: Option<u64>,
}

/// `/system/describeDataObjects` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeDataObjectsRequest<'a> {
    pub objects: &'a [String],
    pub class_describe_options: HashMap<&'static str, DescribeFields>,
}

/// `/system/describeDataObjects` response: one entry per requested object, in order
#[derive(Debug, Deserialize)]
pub struct DescribeDataObjectsResponse {
    pub results: Vec<DescribedObject>,
}

#[derive(Debug, Deserialize)]
pub struct DescribedObject {
    #[serde(default)]
    pub describe: Option<DataObjectDescribe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_data_objects_request_omits_missing_cursor() {
        let request = FindDataObjectsRequest {
            scope: SearchScope {
                project: "project-1",
                folder: "/runs",
                recurse: true,
            },
            classname: "file",
            describe: DescribeFields::of(&["name"]),
            limit: 10,
            starting: None,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["scope"]["folder"], "/runs");
        assert_eq!(json["describe"]["fields"]["name"], true);
        assert!(json.get("starting").is_none());
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error": {"type": "ResourceNotFound", "message": "No such folder"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.error.error_type, "ResourceNotFound");
        assert_eq!(parsed.error.message, "No such folder");
    }
}
