use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crew_core::{JobId, StatusResponse};
use crew_logging::{crew_debug, crew_info};

use crate::{ApiSettings, FailureKind, FetchError, ResearchRequest};

const APPLICATION_JSON: &str = "application/json";

/// The backend operations the tracker needs.
#[async_trait::async_trait]
pub trait CrewApi: Send + Sync {
    /// `POST /api/crew`: starts a research job and returns its id.
    async fn submit(&self, request: &ResearchRequest) -> Result<JobId, FetchError>;

    /// `GET /api/crew/{job_id}`: current status, result, and events.
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusResponse, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestCrewApi {
    settings: ApiSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestCrewApi {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    /// `{base}/api/crew[/{job_id}]`, with the job id percent-encoded as a
    /// single path segment.
    fn endpoint(&self, job_id: Option<&JobId>) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url has no path"))?;
            segments.pop_if_empty().extend(["api", "crew"]);
            if let Some(job_id) = job_id {
                segments.push(job_id.as_str());
            }
        }
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl CrewApi for ReqwestCrewApi {
    async fn submit(&self, request: &ResearchRequest) -> Result<JobId, FetchError> {
        let url = self.endpoint(None)?;
        let body = serde_json::to_vec(request)
            .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))?;
        crew_info!(
            "Submitting research for {} companies x {} positions",
            request.companies().len(),
            request.positions().len()
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let submitted: SubmitResponse = self.read_json(response).await?;
        if submitted.job_id.trim().is_empty() {
            return Err(FetchError::new(FailureKind::Decode, "empty job_id in response"));
        }
        Ok(JobId::new(submitted.job_id))
    }

    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusResponse, FetchError> {
        let url = self.endpoint(Some(job_id))?;
        crew_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        self.read_json(response).await
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestCrewApi {
        ReqwestCrewApi::new(ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let id = JobId::from("a b/c");
        assert_eq!(
            api("http://localhost:3001").endpoint(Some(&id)).unwrap().as_str(),
            "http://localhost:3001/api/crew/a%20b%2Fc"
        );
        assert_eq!(
            api("http://host/prefix/").endpoint(None).unwrap().as_str(),
            "http://host/prefix/api/crew"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        for base in ["not a url", "mailto:someone@example.com"] {
            let err = ReqwestCrewApi::new(ApiSettings {
                base_url: base.to_string(),
                ..ApiSettings::default()
            })
            .unwrap_err();
            assert_eq!(err.kind, FailureKind::InvalidUrl);
        }
    }
}
