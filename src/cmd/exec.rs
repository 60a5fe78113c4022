//! Running a GraphQL document from the command line.

use std::{path::{Path, PathBuf}, sync::Arc};

use juniper::{http::{GraphQLRequest, GraphQLResponse}, InputValue};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{api, config::Config, db, prelude::*};


#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    /// File containing the GraphQL document. If not specified, the document
    /// is read from stdin.
    pub(crate) file: Option<PathBuf>,

    /// Values for the variables of the document, as JSON object.
    #[arg(long)]
    pub(crate) variables: Option<String>,

    /// Name of the operation to execute if the document contains several.
    #[arg(long)]
    pub(crate) operation: Option<String>,
}

pub(crate) async fn run(args: &Args, config: Config) -> Result<()> {
    let document = read_document(args.file.as_deref(), tokio::io::stdin()).await?;
    let request = build_request(document, args)?;

    let store = db::connect(&config.db).await.context("failed to connect to the store")?;
    let context = api::Context { store, config: Arc::new(config) };
    let response = execute(&request, &context).await;

    let json = serde_json::to_string_pretty(&response).context("failed to serialize response")?;
    println!("{json}");

    if !response.is_ok() {
        bail!("the GraphQL request resulted in errors (see response above)");
    }
    Ok(())
}

/// Reads the document from `file` or, if none is given, from `stdin`.
async fn read_document(file: Option<&Path>, mut stdin: impl AsyncRead + Unpin) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut s = String::new();
            stdin.read_to_string(&mut s)
                .await
                .context("failed to read GraphQL document from stdin")?;
            Ok(s)
        }
    }
}

fn build_request(document: String, args: &Args) -> Result<GraphQLRequest> {
    let variables = args.variables.as_deref()
        .map(serde_json::from_str::<InputValue>)
        .transpose()
        .context("`--variables` is not valid JSON")?;
    if variables.as_ref().is_some_and(|v| v.to_object_value().is_none()) {
        bail!("`--variables` has to be a JSON object");
    }

    debug!(operation = args.operation.as_deref(), "Executing GraphQL document");
    GraphQLRequest::new(document, args.operation.clone(), variables).pipe(Ok)
}

async fn execute(request: &GraphQLRequest, context: &api::Context) -> GraphQLResponse {
    let response = request.execute(&api::root_node(), context).await;
    if !response.is_ok() {
        warn!("GraphQL request resulted in errors");
    }
    response
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use confique::Config as _;

    use crate::{api, config::Config, prelude::*, store::Store};
    use super::{build_request, execute, read_document, Args};

    fn args(variables: Option<&str>, operation: Option<&str>) -> Args {
        Args {
            file: None,
            variables: variables.map(Into::into),
            operation: operation.map(Into::into),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn document_with_variables_and_operation() -> Result<()> {
        let context = api::Context {
            store: Store::in_memory(),
            config: Arc::new(Config::builder().load()?),
        };
        let document = r#"
            mutation Add($first: String!) {
                training { people { insert(people: [{ first_name: $first, last_name: "Doe" }]) {
                    success message
                } } }
            }
            query Other { training { people { find { docs { first_name } } } } }
        "#;

        let request = build_request(document.into(), &args(Some(r#"{"first":"Jane"}"#), Some("Add")))?;
        let response = execute(&request, &context).await;
        assert!(response.is_ok());
        assert_eq!(serde_json::to_value(&response)?, serde_json::json!({
            "data": { "training": { "people": { "insert": {
                "success": true,
                "message": "Added people: Jane Doe",
            }}}},
        }));

        let request = build_request(document.into(), &args(None, Some("Other")))?;
        let response = execute(&request, &context).await;
        assert_eq!(serde_json::to_value(&response)?, serde_json::json!({
            "data": { "training": { "people": { "find": { "docs": [{ "first_name": "Jane" }] }}}},
        }));

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_field_is_an_error() -> Result<()> {
        let context = api::Context {
            store: Store::in_memory(),
            config: Arc::new(Config::builder().load()?),
        };
        let request = build_request("{ training { shows } }".into(), &args(None, None))?;
        assert!(!execute(&request, &context).await.is_ok());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn document_from_stdin_or_file() -> Result<()> {
        let stdin = &b"{ __typename }"[..];
        assert_eq!(read_document(None, stdin).await?, "{ __typename }");

        let path = std::env::temp_dir().join(format!("filmography-exec-{}.graphql", std::process::id()));
        std::fs::write(&path, "query Q { __typename }")?;
        let document = read_document(Some(&path), &b"ignored"[..]).await;
        std::fs::remove_file(&path)?;
        assert_eq!(document?, "query Q { __typename }");

        assert!(read_document(Some(&path), &b""[..]).await.is_err());
        Ok(())
    }

    #[test]
    fn variables_must_be_an_object() {
        assert!(build_request("{ __typename }".into(), &args(Some("[1, 2]"), None)).is_err());
        assert!(build_request("{ __typename }".into(), &args(Some("{nope"), None)).is_err());
        assert!(build_request("{ __typename }".into(), &args(Some("{}"), None)).is_ok());
    }
}
