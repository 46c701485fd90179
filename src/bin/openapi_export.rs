// Prints the OpenAPI document as JSON: cargo run --bin openapi_export > openapi.json

use api_error_handler::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    println!("{}", json);
    Ok(())
}
