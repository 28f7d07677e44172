//! Company (empresa) registration endpoints.

// self
use crate::{
	_prelude::*,
	client::Client,
	http::RequestOptions,
	resources::{ListParams, Page, validate_cpf_cnpj},
};

/// Postal address of an empresa.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
	/// Street.
	pub logradouro: String,
	/// Street number.
	pub numero: String,
	/// Address complement.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub complemento: Option<String>,
	/// District.
	pub bairro: String,
	/// IBGE municipality code.
	pub codigo_municipio: String,
	/// City name.
	pub cidade: String,
	/// State abbreviation.
	pub uf: String,
	/// Postal code, digits only.
	pub cep: String,
	/// Country.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pais: Option<String>,
}

/// Company registered with Nuvem Fiscal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Empresa {
	/// CPF or CNPJ, digits only.
	pub cpf_cnpj: String,
	/// Legal name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nome_razao_social: Option<String>,
	/// Trade name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nome_fantasia: Option<String>,
	/// State registration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inscricao_estadual: Option<String>,
	/// Municipal registration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inscricao_municipal: Option<String>,
	/// Address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub endereco: Option<Endereco>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl Empresa {
	/// Creates an empresa with only its CPF/CNPJ set.
	pub fn new(cpf_cnpj: impl Into<String>) -> Self {
		Self { cpf_cnpj: cpf_cnpj.into(), ..Default::default() }
	}
}

/// Partial update; absent fields are left untouched by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmpresaUpdate {
	/// Legal name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nome_razao_social: Option<String>,
	/// Trade name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nome_fantasia: Option<String>,
	/// State registration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inscricao_estadual: Option<String>,
	/// Municipal registration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inscricao_municipal: Option<String>,
	/// Address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub endereco: Option<Endereco>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Handle for `/empresas`.
#[derive(Clone, Copy, Debug)]
pub struct Empresas<'a> {
	client: &'a Client,
}
impl<'a> Empresas<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Registers a new empresa.
	pub async fn create(&self, empresa: &Empresa) -> Result<Empresa> {
		validate_cpf_cnpj(&empresa.cpf_cnpj)?;

		self.client.send_json("/empresas", RequestOptions::post().with_json(empresa)?).await
	}

	/// Lists registered empresas.
	pub async fn list(&self, params: &ListParams) -> Result<Page<Empresa>> {
		self.client.send_json("/empresas", params.apply(RequestOptions::get())).await
	}

	/// Fetches one empresa.
	pub async fn get(&self, cpf_cnpj: &str) -> Result<Empresa> {
		validate_cpf_cnpj(cpf_cnpj)?;

		self.client.send_json(&format!("/empresas/{cpf_cnpj}"), RequestOptions::get()).await
	}

	/// Applies a partial update.
	pub async fn update(&self, cpf_cnpj: &str, changes: &EmpresaUpdate) -> Result<Empresa> {
		validate_cpf_cnpj(cpf_cnpj)?;

		self.client
			.send_json(&format!("/empresas/{cpf_cnpj}"), RequestOptions::put().with_json(changes)?)
			.await
	}

	/// Removes an empresa.
	pub async fn delete(&self, cpf_cnpj: &str) -> Result<()> {
		validate_cpf_cnpj(cpf_cnpj)?;
		self.client.send(&format!("/empresas/{cpf_cnpj}"), RequestOptions::delete()).await?;

		Ok(())
	}
}
