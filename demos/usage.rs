//! Lists empresas and reads their certificate status.
//!
//! With `NUVEM_FISCAL_CLIENT_ID` and `NUVEM_FISCAL_CLIENT_SECRET` set the demo talks to the
//! configured API (`NUVEM_FISCAL_BASE_URL`, `NUVEM_FISCAL_AUTH_URL`, and friends). Without them it
//! points the client at a local mock server so it can run offline.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use nuvem_fiscal::{Client, ClientConfig, Error, resources::ListParams, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// The mock server only starts on the offline path and must outlive the calls below.
	let (client, _server) = if std::env::var_os("NUVEM_FISCAL_CLIENT_ID").is_some() {
		(Client::from_env()?, None)
	} else {
		let server = MockServer::start_async().await;

		mock_api(&server).await;

		let base = Url::parse(&server.base_url())?;
		let client = Client::new(
			ClientConfig::new("demo-client", "demo-secret")
				.with_auth_url(base.join("/oauth/token")?)
				.with_base_url(base),
		)?;

		(client, Some(server))
	};
	let page = client.empresas().list(&ListParams::default().with_top(10)).await?;

	println!("{} empresa(s) listed (count: {:?}).", page.data.len(), page.count);

	for empresa in &page.data {
		let name = empresa.nome_fantasia.as_deref().unwrap_or("-");

		match client.certificados().get(&empresa.cpf_cnpj).await {
			Ok(info) => println!(
				"{} {name}: certificate valid = {:?}, expires = {:?}",
				empresa.cpf_cnpj, info.certificado_valido, info.certificado_vencimento
			),
			Err(Error::Api { status: 404, .. }) => {
				println!("{} {name}: no certificate uploaded", empresa.cpf_cnpj)
			},
			Err(e) => return Err(e.into()),
		}
	}

	Ok(())
}

async fn mock_api(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/empresas");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":[{\"cpf_cnpj\":\"12345678000190\",\"nome_fantasia\":\"Padaria Exemplo\"}],\"count\":1}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/empresas/12345678000190/certificado");
			then.status(200).header("content-type", "application/json").body(
				"{\"cpf_cnpj\":\"12345678000190\",\"certificado_valido\":true,\"certificado_vencimento\":\"2027-03-31\"}",
			);
		})
		.await;
}
