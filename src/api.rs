//! HTTP client for the parse, execute and host catalog service.

use log::debug;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::studio::error::TransportError;
use crate::studio::model::{
	DatasetDescriptor, ExecuteReply, ExecuteRequest, ExecutionResult, HostsReply, ParseReply, ParseRequest,
	UploadReply,
};

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			Self::Decode(err.to_string())
		} else if let Some(status) = err.status() {
			Self::Status(status.as_u16())
		} else {
			Self::Request(err.to_string())
		}
	}
}

/// Typed access to the remote endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
	http: reqwest::Client,
	parse_url: String,
	execute_url: String,
	hosts_url: String,
	upload_url: String,
}

impl ApiClient {
	pub fn new(config: &Config) -> Self {
		Self {
			http: reqwest::Client::new(),
			parse_url: config.endpoint("parse"),
			execute_url: config.endpoint("execute"),
			hosts_url: config.endpoint("hosts"),
			upload_url: config.endpoint("hosts/upload"),
		}
	}

	/// `POST /parse`
	pub async fn parse(&self, text: &str) -> Result<ParseReply, TransportError> {
		let body = ParseRequest { motif: text.to_owned() };
		let response = self.http.post(&self.parse_url).json(&body).send().await?;
		decode(response).await
	}

	/// `POST /execute`
	pub async fn execute(&self, request: &ExecuteRequest) -> Result<ExecutionResult, TransportError> {
		debug!("executing motif on {}", request.host_id);
		let response = self.http.post(&self.execute_url).json(request).send().await?;
		decode::<ExecuteReply>(response).await.map(ExecutionResult::from)
	}

	/// `GET /hosts`
	pub async fn hosts(&self) -> Result<Vec<DatasetDescriptor>, TransportError> {
		let response = self.http.get(&self.hosts_url).send().await?;
		decode::<HostsReply>(response).await.map(|reply| reply.hosts)
	}

	/// `POST /hosts/upload/{filename}`, returning the new dataset uri.
	pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, TransportError> {
		let url = self.upload_target(filename)?;
		let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_owned()));
		let response = self.http.post(url).multipart(form).send().await?;
		decode::<UploadReply>(response).await.map(|reply| reply.uri)
	}

	fn upload_target(&self, filename: &str) -> Result<Url, TransportError> {
		let mut url = Url::parse(&self.upload_url).map_err(|e| TransportError::Request(e.to_string()))?;
		url.path_segments_mut()
			.map_err(|()| TransportError::Request(format!("{} cannot take a path", self.upload_url)))?
			.push(filename);
		Ok(url)
	}
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
	let status = response.status();
	if !status.is_success() {
		return Err(TransportError::Status(status.as_u16()));
	}
	response
		.json::<T>()
		.await
		.map_err(|e| TransportError::Decode(e.to_string()))
}
