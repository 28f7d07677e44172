//! Digital certificate (A1 `.pfx`/`.p12`) endpoints of an empresa.
//!
//! A certificate must be uploaded before the empresa can emit fiscal documents, and its CNPJ
//! must match the empresa's.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	client::Client,
	error::CertificateError,
	http::RequestOptions,
	resources::{require, validate_cpf_cnpj},
};

/// Certificate metadata reported by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificadoInfo {
	/// Owning empresa.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cpf_cnpj: Option<String>,
	/// Whether the API considers the certificate usable.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub certificado_valido: Option<bool>,
	/// Expiration date.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub certificado_vencimento: Option<String>,
	/// CNPJ the certificate was issued for.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub certificado_cnpj: Option<String>,
	/// Upload timestamp.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Last update timestamp.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

#[derive(Serialize)]
struct CertificadoUpload<'a> {
	certificado: &'a str,
	password: &'a str,
}

/// Handle for `/empresas/{cpf_cnpj}/certificado`.
#[derive(Clone, Copy, Debug)]
pub struct Certificados<'a> {
	client: &'a Client,
}
impl<'a> Certificados<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Uploads or replaces the certificate of an empresa.
	///
	/// `certificado_base64` is the base64 text of the certificate file. API failures that point
	/// at a CNPJ mismatch, a wrong password, or a corrupt file surface as
	/// [`Error::Certificate`]; anything else is returned unchanged.
	pub async fn upload(
		&self,
		cpf_cnpj: &str,
		certificado_base64: &str,
		senha: &str,
	) -> Result<CertificadoInfo> {
		validate_cpf_cnpj(cpf_cnpj)?;
		require("certificado", certificado_base64)?;
		require("senha", senha)?;

		let options = RequestOptions::put()
			.with_json(&CertificadoUpload { certificado: certificado_base64, password: senha })?;

		self.client
			.send_json(&certificate_path(cpf_cnpj), options)
			.await
			.map_err(|e| classify_upload_error(cpf_cnpj, e))
	}

	/// Base64-encodes a certificate file's bytes and uploads it.
	pub async fn upload_bytes(
		&self,
		cpf_cnpj: &str,
		certificado: &[u8],
		senha: &str,
	) -> Result<CertificadoInfo> {
		self.upload(cpf_cnpj, &STANDARD.encode(certificado), senha).await
	}

	/// Fetches certificate metadata.
	pub async fn get(&self, cpf_cnpj: &str) -> Result<CertificadoInfo> {
		validate_cpf_cnpj(cpf_cnpj)?;

		self.client.send_json(&certificate_path(cpf_cnpj), RequestOptions::get()).await
	}

	/// Removes the certificate.
	pub async fn delete(&self, cpf_cnpj: &str) -> Result<()> {
		validate_cpf_cnpj(cpf_cnpj)?;
		self.client.send(&certificate_path(cpf_cnpj), RequestOptions::delete()).await?;

		Ok(())
	}
}

fn certificate_path(cpf_cnpj: &str) -> String {
	format!("/empresas/{cpf_cnpj}/certificado")
}

/// Only [`Error::Api`] details are inspected; matching ignores case.
fn classify_upload_error(cpf_cnpj: &str, err: Error) -> Error {
	let detail = match &err {
		Error::Api { detail, .. } => detail.to_lowercase(),
		_ => return err,
	};
	let source = Box::new(err);

	if detail.contains("certificado possui um cpf/cnpj diferente") {
		CertificateError::CnpjMismatch { cpf_cnpj: cpf_cnpj.to_owned(), source }.into()
	} else if detail.contains("senha") || detail.contains("password") {
		CertificateError::InvalidPassword { source }.into()
	} else if detail.contains("certificado inválido") || detail.contains("invalid certificate") {
		CertificateError::InvalidFile { source }.into()
	} else {
		*source
	}
}
