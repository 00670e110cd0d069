//! Integration tests for the template action against the shipped template

use actionloop::actions::{Action, TemplateAction};
use actionloop::config::TemplatesConfig;
use actionloop::params::{EnvSnapshot, Params};
use std::path::PathBuf;

fn shipped_templates(cache: bool) -> TemplateAction {
    TemplateAction::new(&TemplatesConfig {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
        cache,
        ..TemplatesConfig::default()
    })
}

#[tokio::test]
async fn test_default_name_is_world() {
    let response = shipped_templates(false)
        .invoke(&Params::new(), &EnvSnapshot::new())
        .await;
    let body = response.body_text().expect("should render");
    assert!(body.contains("Hello, world."), "body: {}", body);
}

#[tokio::test]
async fn test_renders_given_name() {
    let params = Params::new().with("name", "Ana");
    let response = shipped_templates(false)
        .invoke(&params, &EnvSnapshot::new())
        .await;
    let body = response.body_text().expect("should render");
    assert!(body.contains("Hello, Ana."), "body: {}", body);
}

#[tokio::test]
async fn test_cached_and_uncached_render_the_same() {
    let params = Params::new().with("name", "Ana");
    let uncached = shipped_templates(false)
        .invoke(&params, &EnvSnapshot::new())
        .await;
    let cached = shipped_templates(true)
        .invoke(&params, &EnvSnapshot::new())
        .await;
    assert_eq!(uncached, cached);
}

#[tokio::test]
async fn test_missing_directory_is_error_not_panic() {
    let action = TemplateAction::new(&TemplatesConfig {
        dir: PathBuf::from("/nonexistent/templates"),
        ..TemplatesConfig::default()
    });
    let response = action.invoke(&Params::new(), &EnvSnapshot::new()).await;
    assert!(response.is_error());
}
