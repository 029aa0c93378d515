use hf_hub::{
    api::sync::{ApiBuilder, ApiRepo},
    Repo, RepoType,
};

use super::MODEL_CONFIG_FILE;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct FromPretrainedParameters {
    pub revision: String,
    pub auth_token: Option<String>,
}

impl Default for FromPretrainedParameters {
    fn default() -> Self {
        Self {
            revision: "main".into(),
            auth_token: None,
        }
    }
}

/// Gets a [`ApiRepo`] instance from the provided repository ID using the provided parameters. It
/// will check if the repository exists.
///
/// # Arguments
///
/// * `repo_id` - The repository ID.
/// * `params` - The parameters to use when creating the API instance.
///
/// # Returns
///
/// The API instance.
pub fn get_repo_api(repo_id: &str, params: Option<FromPretrainedParameters>) -> Result<ApiRepo> {
    let params = params.unwrap_or_default();
    let repo = Repo::with_revision(repo_id.to_string(), RepoType::Model, params.revision);

    let mut builder = ApiBuilder::new();
    if let Some(token) = params.auth_token {
        builder = builder.with_token(Some(token));
    }
    let api = builder.build()?.repo(repo);

    if api.info().is_err() && api.get(MODEL_CONFIG_FILE).is_err() {
        return Err(Error::RepositoryNotFound(repo_id.to_string()));
    }

    Ok(api)
}
