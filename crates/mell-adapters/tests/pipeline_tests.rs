//! End-to-end runs of the generate pipeline over in-memory adapters.

use mell_adapters::{DelimiterRenderer, InMemoryMetadataSource, MemoryFilesystem, ScriptRegistry};
use mell_core::{
    application::{ApplicationError, GenerateService, Inflater, Invocation, ScriptResult},
    domain::{Action, MetaView, ProjectLayout, SetOperation, TypeTag},
    error::MellError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const USERS: &str = r#"{"users": [{"name": "Diego"}, {"name": "Quelle"}]}"#;

const PROJECTS: &str = r#"{
    "projects": [
        {"name": "Thoculi", "cost_in_usd": "1000000.00", "duration_in_months": 3},
        {"name": "Catalina", "cost_in_usd": "30000000.00", "duration_in_months": 24},
        {"name": "Gold", "cost_in_usd": "2000000.00", "duration_in_months": 2}
    ]
}"#;

const PROJECT_ASSET: &str = "Project '|= meta.name =|' will last |= meta.duration_in_months =| \
                             month(s) and cost USD |= meta.cost_in_usd =|.";

fn layout() -> ProjectLayout {
    ProjectLayout::under("/p")
}

fn add_email(_: &Invocation, meta: &mut MetaView<'_>) -> ScriptResult {
    let mut users = meta.at("users")?;
    for mut entry in users.iter()? {
        let user = entry.view();
        let name = user.get_field("name").as_str().unwrap_or_default().to_lowercase();
        user.set_field("email", format!("{name}@company.com"))?;
    }
    Ok(())
}

fn projects(_: &Invocation, meta: &mut MetaView<'_>, inflater: &Inflater<'_>) -> ScriptResult {
    let mut projects = meta.at("projects")?;
    for (i, entry) in projects.iter()?.enumerate() {
        let project = entry.into_view();
        let target = format!("project_{i}.txt");
        inflater.inflate("project.txt", project.value(), Some(&target))?;
    }
    Ok(())
}

fn service(
    source: InMemoryMetadataSource,
    fs: &MemoryFilesystem,
    registry: ScriptRegistry,
) -> GenerateService {
    GenerateService::new(
        Box::new(source),
        Box::new(fs.clone()),
        Box::new(DelimiterRenderer::default()),
        Box::new(registry),
    )
}

#[test]
fn test_native_migration_adds_emails() {
    let source = InMemoryMetadataSource::new().with_document("users", USERS);
    let fs = MemoryFilesystem::new().with_file("/p/style/migration/add_email.rs", "");
    let registry = ScriptRegistry::new().with_migration("add_email", add_email);

    let resolution = service(source, &fs, registry)
        .resolve(&Invocation::new("users", layout()))
        .unwrap();

    assert_eq!(resolution.migrations, 1);
    assert_eq!(
        resolution.tree,
        json!({"users": [
            {"name": "Diego", "email": "diego@company.com"},
            {"name": "Quelle", "email": "quelle@company.com"}
        ]})
    );
}

#[test]
fn test_numbered_migrations_run_first_in_numeric_order() {
    let source = InMemoryMetadataSource::new().with_document("doc", "{}");
    let fs = MemoryFilesystem::new()
        .with_file("/p/style/migration/zz_last.json", r#"[{"set": "trail[2]", "value": "named"}]"#)
        .with_file("/p/style/migration/20.second.json", r#"[{"set": "trail[1]", "value": 20}]"#)
        .with_file("/p/style/migration/3.first.json", r#"[{"set": "trail[0]", "value": 3}]"#)
        .with_file("/p/style/migration/100.third.json", r#"[{"set": "order", "value": "100"}]"#);

    let resolution = service(source, &fs, ScriptRegistry::new())
        .resolve(&Invocation::new("doc", layout()))
        .unwrap();

    assert_eq!(resolution.migrations, 4);
    assert_eq!(
        resolution.tree,
        json!({"trail": [3, 20, "named"], "order": "100"})
    );
}

#[test]
fn test_set_operations_apply_before_migrations() {
    let source = InMemoryMetadataSource::new().with_document(
        "data",
        r#"{"user": {"name": "Diego Souza", "age": 33, "backpack": ["book", "pen", "bottle"]}}"#,
    );
    let fs = MemoryFilesystem::new();

    let invocation = Invocation::new("data", layout())
        .with_set(SetOperation::new("extra", "more"))
        .with_set(SetOperation::new("user.age", "18"))
        .with_set(SetOperation::typed("user.height", "1.8", TypeTag::Float))
        .with_set(SetOperation::new("user.backpack[1]", "keys"))
        .with_set(SetOperation::new("user.name.first", "Diego"));

    let resolution = service(source, &fs, ScriptRegistry::new())
        .resolve(&invocation)
        .unwrap();

    assert_eq!(resolution.set_report.applied, 4);
    assert_eq!(resolution.set_report.failures.len(), 1);
    assert_eq!(
        resolution.tree,
        json!({
            "user": {
                "name": "Diego Souza",
                "age": "18",
                "backpack": ["book", "keys", "bottle"],
                "height": 1.8
            },
            "extra": "more"
        })
    );
}

#[test]
fn test_native_generator_renders_one_file_per_project() {
    let source = InMemoryMetadataSource::new().with_document("data", PROJECTS);
    let fs = MemoryFilesystem::new()
        .with_file("/p/style/generator/projects.rs", "")
        .with_file("/p/style/asset/project.txt", PROJECT_ASSET);
    let registry = ScriptRegistry::new().with_generator("projects", projects);

    let summary = service(source, &fs, registry)
        .generate(&Invocation::new("data", layout()))
        .unwrap();

    assert_eq!(summary.generators, 1);
    assert_eq!(summary.files_written, 3);
    assert_eq!(
        fs.read_file("/p/output/project_0.txt").as_deref(),
        Some("Project 'Thoculi' will last 3 month(s) and cost USD 1000000.00.")
    );
    assert_eq!(
        fs.read_file("/p/output/project_1.txt").as_deref(),
        Some("Project 'Catalina' will last 24 month(s) and cost USD 30000000.00.")
    );
    assert_eq!(
        fs.read_file("/p/output/project_2.txt").as_deref(),
        Some("Project 'Gold' will last 2 month(s) and cost USD 2000000.00.")
    );
}

#[test]
fn test_declarative_generator_matches_native_one() {
    let source = InMemoryMetadataSource::new().with_document("data", PROJECTS);
    let fs = MemoryFilesystem::new()
        .with_file(
            "/p/style/generator/projects.json",
            r#"[{"asset": "project.txt", "foreach": "projects", "output": "nested/project_{index}.txt"}]"#,
        )
        .with_file("/p/style/asset/project.txt", PROJECT_ASSET);

    let summary = service(source, &fs, ScriptRegistry::new())
        .generate(&Invocation::new("data", layout()).with_action(Action::Generator))
        .unwrap();

    assert_eq!(summary.files_written, 3);
    assert_eq!(
        fs.read_file("/p/output/nested/project_2.txt").as_deref(),
        Some("Project 'Gold' will last 2 month(s) and cost USD 2000000.00.")
    );
}

#[test]
fn test_clean_and_template_actions() {
    let source = InMemoryMetadataSource::new()
        .with_document("base", r#"{"name": "Base", "version": 1}"#)
        .with_document("shop", r#"{"__parent__": "base", "name": "Shop"}"#);
    let fs = MemoryFilesystem::new()
        .with_file("/p/output/stale.txt", "old")
        .with_file("/p/style/template/README.md", "# |= meta.name =| v|= meta.version =| (|= release =|)")
        .with_file("/p/style/template/docs/index.txt", "|# skipped #||= meta.name =|");

    let invocation = Invocation::new("shop", layout())
        .with_action(Action::Clean)
        .with_action(Action::Template)
        .with_variable("release", "2.1");

    let summary = service(source, &fs, ScriptRegistry::new())
        .generate(&invocation)
        .unwrap();

    assert_eq!(summary.templates, 2);
    assert_eq!(fs.read_file("/p/output/stale.txt"), None);
    assert_eq!(
        fs.read_file("/p/output/README.md").as_deref(),
        Some("# Shop v1 (2.1)")
    );
    assert_eq!(fs.read_file("/p/output/docs/index.txt").as_deref(), Some("Shop"));
}

#[test]
fn test_unknown_generator_script_fails_the_run() {
    let source = InMemoryMetadataSource::new().with_document("data", "{}");
    let fs = MemoryFilesystem::new().with_file("/p/style/generator/plugin.py", "def plugin(): pass");

    let err = service(source, &fs, ScriptRegistry::new())
        .generate(&Invocation::new("data", layout()))
        .unwrap_err();

    assert!(matches!(
        err,
        MellError::Application(ApplicationError::ScriptLoad { .. })
    ));
}

#[test]
fn test_failing_migration_is_a_runtime_error() {
    let source = InMemoryMetadataSource::new().with_document("data", r#"{"users": 3}"#);
    let fs = MemoryFilesystem::new().with_file("/p/style/migration/add_email.rs", "");
    let registry = ScriptRegistry::new().with_migration("add_email", add_email);

    let err = service(source, &fs, registry)
        .resolve(&Invocation::new("data", layout()))
        .unwrap_err();

    assert!(matches!(
        err,
        MellError::Application(ApplicationError::ScriptRuntime { .. })
    ));
}

#[test]
fn test_generator_cannot_read_outside_the_asset_folder() {
    let source = InMemoryMetadataSource::new().with_document("data", "{}");
    let fs = MemoryFilesystem::new()
        .with_file("/p/secret.txt", "hidden")
        .with_file("/p/style/asset/ok.txt", "ok")
        .with_file("/p/style/generator/peek.rs", "");
    let registry = ScriptRegistry::new().with_generator(
        "peek",
        |_: &Invocation, meta: &mut MetaView<'_>, inflater: &Inflater<'_>| -> ScriptResult {
            inflater.inflate("../../secret.txt", meta.value(), None)?;
            Ok(())
        },
    );

    let err = service(source, &fs, registry)
        .generate(&Invocation::new("data", layout()).with_action(Action::Generator))
        .unwrap_err();

    assert!(err.to_string().contains("asset folder"));
}
