//! CLI Tests
//!
//! Discovery, options and the batch driver over an on-disk project.

use ember_native_class::logging::{FileLogger, LogLevel};
use ember_native_class::{JsonRuntimeData, Transformer};
use ember_native_class_cli::config::{load_options, OptionOverrides};
use ember_native_class_cli::discovery::discover_files;
use ember_native_class_cli::run::Runner;
use std::fs;

const COMPONENT: &str = "import Component from '@ember/component';\n\nexport default Component.extend({\n  tagName: 'ul',\n});\n";
const SERVICE: &str = "import Service from '@ember/service';\n\nexport default Service.extend({\n  count: 0,\n});\n";

#[test]
fn should_transform_a_project() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("app/components")).unwrap();
    fs::create_dir_all(root.join("app/services")).unwrap();
    let component = root.join("app/components/item-list.js");
    let service = root.join("app/services/counter.js");
    let untracked = root.join("app/services/other.js");
    fs::write(&component, COMPONENT).unwrap();
    fs::write(&service, SERVICE).unwrap();
    fs::write(&untracked, SERVICE).unwrap();

    let mut telemetry = serde_json::Map::new();
    telemetry.insert(
        root.join("app/components/item-list").to_string_lossy().into_owned(),
        serde_json::json!({ "type": "Component" }),
    );
    telemetry.insert(
        service.to_string_lossy().into_owned(),
        serde_json::json!({ "type": "Service" }),
    );
    let telemetry = serde_json::Value::Object(telemetry);
    let telemetry_path = root.join("telemetry.json");
    fs::write(&telemetry_path, telemetry.to_string()).unwrap();
    let config_path = root.join("config.json");
    fs::write(&config_path, r#"{ "classicDecorator": false }"#).unwrap();

    let options = load_options(Some(&config_path), &OptionOverrides::default()).unwrap();
    let runtime_data = JsonRuntimeData::load(&telemetry_path).unwrap();
    let files = discover_files(&[root.join("app").to_string_lossy().into_owned()]).unwrap();
    assert_eq!(files.len(), 3);

    let log_path = root.join("codemods.log");
    let logger = FileLogger::open(&log_path, LogLevel::Info).unwrap();
    let transformer = Transformer::new(options, &runtime_data);
    let summary = Runner::new(&transformer, &logger, false).run(&files);

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.has_errors());

    assert_eq!(
        fs::read_to_string(&component).unwrap(),
        "import Component from '@ember/component';\nimport { tagName } from '@ember-decorators/component';\n\n@tagName('ul')\nexport default class ItemList extends Component {}\n"
    );
    assert_eq!(
        fs::read_to_string(&service).unwrap(),
        "import Service from '@ember/service';\n\nexport default class CounterService extends Service {\n  count = 0;\n}\n"
    );
    assert_eq!(fs::read_to_string(&untracked).unwrap(), SERVICE);

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains(&format!("[warn] [{}]: SKIPPED Could not find runtime data NO_RUNTIME_DATA", untracked.display())));
    assert!(log.contains(&format!("[info] [{}]: SUCCESS", service.display())));
}
