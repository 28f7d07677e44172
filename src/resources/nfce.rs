//! Consumer invoice (NFC-e) endpoints.

// self
use crate::{
	_prelude::*,
	client::Client,
	config::Environment,
	error::ValidationError,
	http::{RequestOptions, ResponseShape},
	resources::{Page, apply_paging, validate_cpf_cnpj, validate_id},
};

/// Minimum length the tax authority accepts for a cancellation reason.
pub const MIN_JUSTIFICATIVA_LEN: usize = 15;

/// Emission request for a new NFC-e.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PedidoEmissaoNfce {
	/// Target environment.
	pub ambiente: Environment,
	/// Caller-side reference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub referencia: Option<String>,
	/// Invoice body in the layout defined by SEFAZ.
	#[serde(rename = "infNFe")]
	pub inf_nfe: JsonValue,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl PedidoEmissaoNfce {
	/// Creates a request for `ambiente` carrying `inf_nfe`.
	pub fn new(ambiente: Environment, inf_nfe: JsonValue) -> Self {
		Self { ambiente, referencia: None, inf_nfe, extra: JsonMap::new() }
	}

	/// Sets the caller-side reference.
	pub fn with_referencia(mut self, referencia: impl Into<String>) -> Self {
		self.referencia = Some(referencia.into());

		self
	}
}

/// NFC-e as reported by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NfceDocument {
	/// Nuvem Fiscal identifier.
	pub id: String,
	/// Environment the document was emitted in.
	pub ambiente: Environment,
	/// Processing status (`autorizado`, `rejeitado`, ...).
	pub status: String,
	/// Emission timestamp as sent by the API.
	pub data_emissao: String,
	/// 44-digit access key.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chave: Option<String>,
	/// Download link for the XML.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link_xml: Option<String>,
	/// Download link for the DANFE PDF.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link_pdf: Option<String>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Paging and filter parameters for NFC-e listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NfceListParams {
	/// Maximum number of items (`$top`).
	pub top: Option<u32>,
	/// Items to skip (`$skip`).
	pub skip: Option<u32>,
	/// Issuer filter (`cpf_cnpj`).
	pub cpf_cnpj: Option<String>,
}
impl NfceListParams {
	/// Limits the page size.
	pub fn with_top(mut self, top: u32) -> Self {
		self.top = Some(top);

		self
	}

	/// Skips leading items.
	pub fn with_skip(mut self, skip: u32) -> Self {
		self.skip = Some(skip);

		self
	}

	/// Filters by issuer.
	pub fn with_cpf_cnpj(mut self, cpf_cnpj: impl Into<String>) -> Self {
		self.cpf_cnpj = Some(cpf_cnpj.into());

		self
	}

	fn apply(&self, options: RequestOptions) -> Result<RequestOptions, ValidationError> {
		let cpf_cnpj = self.cpf_cnpj.as_deref().filter(|value| !value.is_empty());

		if let Some(cpf_cnpj) = cpf_cnpj {
			validate_cpf_cnpj(cpf_cnpj)?;
		}

		Ok(apply_paging(options, self.top, self.skip).with_query_opt("cpf_cnpj", cpf_cnpj))
	}
}

#[derive(Serialize)]
struct Cancelamento<'a> {
	justificativa: &'a str,
}

/// Handle for `/nfce`.
#[derive(Clone, Copy, Debug)]
pub struct Nfce<'a> {
	client: &'a Client,
}
impl<'a> Nfce<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Emits an NFC-e; the returned document may be authorized or rejected.
	pub async fn emitir(&self, pedido: &PedidoEmissaoNfce) -> Result<NfceDocument> {
		self.client.send_json("/nfce", RequestOptions::post().with_json(pedido)?).await
	}

	/// Fetches an NFC-e by id.
	pub async fn consultar(&self, id: &str) -> Result<NfceDocument> {
		validate_id(id)?;

		self.client.send_json(&format!("/nfce/{id}"), RequestOptions::get()).await
	}

	/// Cancels an authorized NFC-e and returns the API's cancellation record.
	pub async fn cancelar(&self, id: &str, justificativa: &str) -> Result<JsonValue> {
		validate_id(id)?;

		if justificativa.trim().chars().count() < MIN_JUSTIFICATIVA_LEN {
			return Err(ValidationError::TooShort {
				field: "justificativa",
				min: MIN_JUSTIFICATIVA_LEN,
			}
			.into());
		}

		let options = RequestOptions::post().with_json(&Cancelamento { justificativa })?;

		self.client.send_json(&format!("/nfce/{id}/cancelamento"), options).await
	}

	/// Downloads the authorized XML.
	pub async fn baixar_xml(&self, id: &str) -> Result<String> {
		validate_id(id)?;

		let body = self
			.client
			.send(&format!("/nfce/{id}/xml"), RequestOptions::get().with_shape(ResponseShape::Text))
			.await?;

		Ok(body.into_text()?)
	}

	/// Downloads the DANFE PDF.
	pub async fn baixar_pdf(&self, id: &str) -> Result<Vec<u8>> {
		validate_id(id)?;

		let body = self
			.client
			.send(&format!("/nfce/{id}/pdf"), RequestOptions::get().with_shape(ResponseShape::Binary))
			.await?;

		Ok(body.into_bytes()?)
	}

	/// Lists NFC-e documents.
	pub async fn listar(&self, params: &NfceListParams) -> Result<Page<NfceDocument>> {
		self.client.send_json("/nfce", params.apply(RequestOptions::get())?).await
	}
}
