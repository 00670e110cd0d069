//! Hello action: `name` in, `Hello, <name>.` out

use super::Action;
use super::template::DEFAULT_NAME;
use crate::params::{EnvSnapshot, Params};
use crate::response::ActionResponse;
use async_trait::async_trait;

pub const NAME: &str = "hello";

pub struct HelloAction;

#[async_trait]
impl Action for HelloAction {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn invoke(&self, params: &Params, _env: &EnvSnapshot) -> ActionResponse {
        let name = params
            .get_non_empty("name")
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        tracing::debug!(name = %name, "Greeting");
        ActionResponse::body(format!("Hello, {}.", name))
    }
}
