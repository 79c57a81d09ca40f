use handlebars::RenderErrorReason;
use hbs_to_html::{
    ContextBuilder, PartialNaming, PartialRegistry, RenderError, RenderRequest, RendererConfig,
    TemplateRenderer,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture");
}

/// views/, views/layouts/main.hbs and views/partials/
fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("layouts")).unwrap();
    fs::create_dir_all(dir.path().join("partials")).unwrap();
    write(&dir.path().join("layouts"), "main.hbs", "<html>{{{body}}}</html>");
    dir
}

fn title(value: &str) -> RenderRequest {
    RenderRequest::new("index").context(ContextBuilder::new().insert("title", value))
}

#[tokio::test]
async fn test_context_values_are_substituted() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1><p>{{year}}</p>");

    let renderer = TemplateRenderer::new(RendererConfig::new(dir.path())).unwrap();
    let html = renderer
        .render(RenderRequest::new("index").context(
            ContextBuilder::new()
                .insert("title", "Testing package")
                .insert("year", 2024)
                .build(),
        ))
        .await
        .unwrap();

    assert_eq!(html, "<h1>Testing package</h1><p>2024</p>");
}

#[tokio::test]
async fn test_layout_wraps_template() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/main.hbs")),
    )
    .unwrap();
    let html = renderer.render(title("T")).await.unwrap();

    assert_eq!(html, "<html><h1>T</h1></html>");
}

#[tokio::test]
async fn test_layout_sees_caller_context() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");
    write(
        &dir.path().join("layouts"),
        "titled.hbs",
        "<title>{{title}}</title>{{{body}}}",
    );

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/titled.hbs")),
    )
    .unwrap();
    let html = renderer.render(title("Home")).await.unwrap();

    assert_eq!(html, "<title>Home</title><h1>Home</h1>");
}

#[tokio::test]
async fn test_inner_output_overwrites_caller_body() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/main.hbs")),
    )
    .unwrap();
    let request = RenderRequest::new("index").context(
        ContextBuilder::new()
            .insert("title", "T")
            .insert("body", "caller body")
            .build(),
    );
    let html = renderer.render(request).await.unwrap();

    assert_eq!(html, "<html><h1>T</h1></html>");
    assert!(!html.contains("caller body"));
}

#[tokio::test]
async fn test_inner_template_sees_caller_body() {
    let dir = site();
    write(dir.path(), "index.hbs", "<p>{{body}}</p>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/main.hbs")),
    )
    .unwrap();
    let request =
        RenderRequest::new("index").context(ContextBuilder::new().insert("body", "text").build());

    assert_eq!(
        renderer.render(request).await.unwrap(),
        "<html><p>text</p></html>"
    );
}

#[tokio::test]
async fn test_values_are_escaped_but_body_is_not() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/main.hbs")),
    )
    .unwrap();
    let html = renderer.render(title("<b>")).await.unwrap();

    assert_eq!(html, "<html><h1>&lt;b&gt;</h1></html>");
}

#[tokio::test]
async fn test_partials_available_to_template_and_layout() {
    let dir = site();
    let partials = dir.path().join("partials");
    write(&partials, "card.hbs", "<div>{{title}}</div>");
    write(&partials, "footer.handlebars", "<footer>bye</footer>");
    write(dir.path(), "index.hbs", "<main>{{> card}}</main>");
    write(
        &dir.path().join("layouts"),
        "footed.hbs",
        "{{{body}}}{{> footer}}",
    );

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path())
            .default_layout(dir.path().join("layouts/footed.hbs"))
            .partial_dir(&partials),
    )
    .unwrap();
    let html = renderer.render(title("T")).await.unwrap();

    assert_eq!(html, "<main><div>T</div></main><footer>bye</footer>");
    assert_eq!(renderer.partials().names().await, vec!["card", "footer"]);
}

#[tokio::test]
async fn test_legacy_naming_renderer() {
    let dir = site();
    let partials = dir.path().join("partials");
    write(&partials, "card.hbs", "<div>{{title}}</div>");
    write(dir.path(), "index.hbs", "{{> card}}");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path())
            .partial_dir(&partials)
            .partial_naming(PartialNaming::Legacy),
    )
    .unwrap();

    assert_eq!(renderer.render(title("T")).await.unwrap(), "<div>T</div>");
}

#[tokio::test]
async fn test_partials_reregistered_on_each_render() {
    let dir = site();
    let partials = dir.path().join("partials");
    write(&partials, "card.hbs", "v1");
    write(dir.path(), "index.hbs", "{{> card}}");

    let renderer =
        TemplateRenderer::new(RendererConfig::new(dir.path()).partial_dir(&partials)).unwrap();
    assert_eq!(renderer.render(title("T")).await.unwrap(), "v1");

    write(&partials, "card.hbs", "v2");
    assert_eq!(renderer.render(title("T")).await.unwrap(), "v2");
}

#[tokio::test]
async fn test_renderers_have_isolated_partials() {
    let first = site();
    let second = site();
    write(&first.path().join("partials"), "card.hbs", "first");
    write(&second.path().join("partials"), "card.hbs", "second");
    write(first.path(), "index.hbs", "{{> card}}");
    write(second.path(), "index.hbs", "{{> card}}");

    let a = TemplateRenderer::new(
        RendererConfig::new(first.path()).partial_dir(first.path().join("partials")),
    )
    .unwrap();
    let b = TemplateRenderer::new(
        RendererConfig::new(second.path()).partial_dir(second.path().join("partials")),
    )
    .unwrap();

    assert_eq!(a.render(title("T")).await.unwrap(), "first");
    assert_eq!(b.render(title("T")).await.unwrap(), "second");
    assert_eq!(a.render(title("T")).await.unwrap(), "first");
}

#[tokio::test]
async fn test_injected_registry_is_shared() {
    let dir = site();
    write(&dir.path().join("partials"), "shared_card.hbs", "shared");
    write(dir.path(), "index.hbs", "{{> shared_card}}");
    write(dir.path(), "plain.hbs", "{{> shared_card}}!");

    let registry = PartialRegistry::new();
    let loader = TemplateRenderer::with_registry(
        RendererConfig::new(dir.path()).partial_dir(dir.path().join("partials")),
        registry.clone(),
    )
    .unwrap();
    let reader = TemplateRenderer::with_registry(RendererConfig::new(dir.path()), registry).unwrap();

    loader.render(title("T")).await.unwrap();
    let html = reader.render(RenderRequest::new("plain")).await.unwrap();

    assert_eq!(html, "shared!");
}

#[tokio::test]
async fn test_missing_template_is_io_error() {
    let dir = site();
    let renderer = TemplateRenderer::new(RendererConfig::new(dir.path())).unwrap();

    match renderer.render(RenderRequest::new("missing")).await {
        Err(RenderError::Io { path, source }) => {
            assert_eq!(path, dir.path().join("missing.hbs"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_layout_is_io_error() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/none.hbs")),
    )
    .unwrap();

    assert!(renderer.render(title("T")).await.unwrap_err().is_io());
}

#[tokio::test]
async fn test_malformed_template_is_compile_error() {
    let dir = site();
    write(dir.path(), "index.hbs", "{{#if title}}<h1>{{title}}</h1>{{/each}}");

    let renderer = TemplateRenderer::new(RendererConfig::new(dir.path())).unwrap();
    let err = renderer.render(title("T")).await.unwrap_err();

    assert!(matches!(err, RenderError::Compile(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unknown_partial_is_render_error() {
    let dir = site();
    write(dir.path(), "index.hbs", "{{> nowhere}}");

    let renderer = TemplateRenderer::new(RendererConfig::new(dir.path())).unwrap();
    let err = renderer.render(title("T")).await.unwrap_err();

    match err {
        RenderError::Render(err) => assert!(
            matches!(err.reason(), RenderErrorReason::PartialNotFound(name) if name == "nowhere"),
            "got {:?}",
            err
        ),
        other => panic!("expected Render error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_partial_is_compile_error() {
    let dir = site();
    let partials = dir.path().join("partials");
    write(&partials, "bad.hbs", "{{#if x}}unclosed{{/each}}");
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer =
        TemplateRenderer::new(RendererConfig::new(dir.path()).partial_dir(&partials)).unwrap();
    let err = renderer.render(title("T")).await.unwrap_err();

    assert!(matches!(err, RenderError::Compile(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_malformed_layout_is_compile_error() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");
    write(
        &dir.path().join("layouts"),
        "broken.hbs",
        "<html>{{#each items}}{{{body}}}{{/if}}</html>",
    );

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).default_layout(dir.path().join("layouts/broken.hbs")),
    )
    .unwrap();
    let err = renderer.render(title("T")).await.unwrap_err();

    assert!(matches!(err, RenderError::Compile(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_empty_partial_dir_aborts_render() {
    let dir = site();
    write(dir.path(), "index.hbs", "<h1>{{title}}</h1>");

    let renderer = TemplateRenderer::new(
        RendererConfig::new(dir.path()).partial_dir(dir.path().join("partials")),
    )
    .unwrap();

    assert!(renderer.render(title("T")).await.unwrap_err().is_validation());
}
