//! Template action
//!
//! Renders a greeting template with the `name` parameter. By default the
//! template is re-read and re-compiled on every invocation; with
//! `templates.cache` a single environment keeps compiled templates around.

use super::Action;
use crate::config::TemplatesConfig;
use crate::error::ActionError;
use crate::params::{EnvSnapshot, Params};
use crate::response::ActionResponse;
use async_trait::async_trait;
use minijinja::{Environment, context, path_loader};
use std::path::PathBuf;

pub const NAME: &str = "template";

/// Used when no `name` parameter is given
pub const DEFAULT_NAME: &str = "world";

pub struct TemplateAction {
    dir: PathBuf,
    template: String,
    cached: Option<Environment<'static>>,
}

impl TemplateAction {
    pub fn new(config: &TemplatesConfig) -> Self {
        let cached = config.cache.then(|| {
            let mut env = Environment::new();
            env.set_loader(path_loader(config.dir.clone()));
            env
        });

        tracing::debug!(
            dir = %config.dir.display(),
            template = %config.name,
            cache = config.cache,
            "Configured template action"
        );

        Self {
            dir: config.dir.clone(),
            template: config.name.clone(),
            cached,
        }
    }

    async fn render(&self, name: &str) -> Result<String, ActionError> {
        if let Some(env) = &self.cached {
            let template = env.get_template(&self.template)?;
            return Ok(template.render(context! { name => name })?);
        }

        let path = self.dir.join(&self.template);
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ActionError::TemplateRead {
                path: path.display().to_string(),
                source,
            })?;

        let mut env = Environment::new();
        env.add_template_owned(self.template.clone(), source)?;
        let template = env.get_template(&self.template)?;
        Ok(template.render(context! { name => name })?)
    }
}

#[async_trait]
impl Action for TemplateAction {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn invoke(&self, params: &Params, _env: &EnvSnapshot) -> ActionResponse {
        let name = params
            .get_non_empty("name")
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        self.render(&name).await.into()
    }
}
