//! Actions Tests
//!
//! The `actions` hash: lifecycle name clashes, self-delegation, `_super`
//! handling and forwarding to referenced functions.

use ember_native_class::util::LIFECYCLE_HOOKS;
use ember_native_class::{FileOutcome, FileReport, InMemoryRuntimeData, Options, RuntimeData, Transformer};
use std::path::Path;

const PATH: &str = "/app/components/foo-bar.js";

fn transform_with_data(source: &str, data: RuntimeData) -> FileReport {
    let provider = InMemoryRuntimeData::new().with(PATH, data);
    Transformer::new(Options::default(), &provider)
        .transform_file(Path::new(PATH), source)
        .unwrap()
}

fn component() -> RuntimeData {
    RuntimeData {
        object_type: Some("Component".to_string()),
        ..RuntimeData::default()
    }
}

fn transform(source: &str) -> FileReport {
    transform_with_data(source, component())
}

fn with_actions(body: &str) -> String {
    format!(
        "export default Component.extend({{\n  actions: {{\n{}\n  }},\n}});\n",
        body
    )
}

fn error_messages(report: &FileReport) -> Vec<String> {
    report
        .failures
        .iter()
        .flat_map(|f| f.errors.iter().map(|e| e.to_string()))
        .collect()
}

mod lifecycle_hooks {
    use super::*;

    #[test]
    fn should_block_every_lifecycle_hook_name() {
        for hook in LIFECYCLE_HOOKS.iter() {
            let source = with_actions(&format!("    {}() {{}},", hook));
            let report = transform(&source);
            assert_eq!(report.outcome, FileOutcome::Failure, "{}", hook);
            assert!(report.output.is_none());

            let messages = error_messages(&report);
            assert_eq!(messages.len(), 1, "{}: {:?}", hook, messages);
            assert!(
                messages[0].starts_with(&format!(
                    "[{}]: Transform not supported - action name matches one of the lifecycle hooks",
                    hook
                )),
                "{}",
                messages[0]
            );
        }
    }

    #[test]
    fn should_allow_other_names() {
        let report = transform(&with_actions("    save() {},\n    cancel() {},"));
        assert_eq!(report.outcome, FileOutcome::Success);
    }
}

mod infinite_loops {
    use super::*;

    #[test]
    fn should_block_first_action_calling_itself() {
        let report = transform(&with_actions(
            "    save() {\n      this.save();\n    },\n    cancel() {},",
        ));
        assert_eq!(report.outcome, FileOutcome::Failure);
        let messages = error_messages(&report);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(
            "[save]: Transform not supported - calling the passed action would cause an infinite loop"
        ));
    }

    #[test]
    fn should_block_first_action_sending_itself() {
        let report = transform(&with_actions(
            "    save() {\n      this.sendAction('save');\n    },",
        ));
        assert_eq!(report.outcome, FileOutcome::Failure);
    }

    #[test]
    fn should_only_inspect_the_first_action() {
        let report = transform(&with_actions(
            "    cancel() {},\n    save() {\n      this.save();\n    },",
        ));
        assert_eq!(report.outcome, FileOutcome::Success);
        assert!(report
            .output
            .unwrap()
            .contains("  @action\n  save() {\n    this.save();\n  }"));
    }
}

mod conversion {
    use super::*;

    #[test]
    fn should_convert_every_action_form() {
        let source = with_actions(
            "    // first\n    save() {\n      return 1;\n    },\n    cancel: function(reason) {\n      return reason;\n    },\n    reset: resetForm,",
        );
        let output = transform(&source).output.unwrap();
        assert!(output.contains("import { action } from '@ember/object';"));
        assert!(output.contains("  // first\n  @action\n  save() {\n    return 1;\n  }"));
        assert!(output.contains("  @action\n  cancel(reason) {\n    return reason;\n  }"));
        assert!(output.contains(
            "  @action\n  reset() {\n    return resetForm.call(this, ...arguments);\n  }"
        ));
    }

    #[test]
    fn should_replace_super_when_no_parent_defines_the_action() {
        let source = with_actions("    save() {\n      this._super(...arguments);\n    },");
        let output = transform(&source).output.unwrap();
        assert!(output.contains("  save() {\n    undefined;\n  }"));
    }

    #[test]
    fn should_call_parent_action_with_a_note() {
        let source = with_actions("    save() {\n      this._super(...arguments);\n    },");
        let data = RuntimeData {
            overridden_actions: vec!["save".to_string()],
            ..component()
        };
        let output = transform_with_data(&source, data).output.unwrap();
        assert!(output.contains("    // NOTE: this super call runs inside an action"));
        assert!(output.contains("\n    super.save(...arguments);\n  }"));
    }

    #[test]
    fn should_block_super_that_is_not_called() {
        let report = transform(&with_actions("    save() {\n      const parent = this._super;\n      parent();\n    },"));
        assert_eq!(report.outcome, FileOutcome::Failure);
        assert!(error_messages(&report)
            .contains(&"[save]: Transform not supported - this._super is used without being called".to_string()));
    }

    #[test]
    fn should_block_spread_in_actions() {
        let report = transform(&with_actions("    ...shared,"));
        assert_eq!(report.outcome, FileOutcome::Failure);
        let messages = error_messages(&report);
        assert!(messages
            .iter()
            .any(|m| m.ends_with("Transform not supported - spread in actions can not be transformed")));
    }

    #[test]
    fn should_block_actions_that_are_not_objects() {
        let report = transform("export default Component.extend({\n  actions: sharedActions,\n});\n");
        assert_eq!(report.outcome, FileOutcome::Failure);
        assert_eq!(
            error_messages(&report),
            vec!["[actions]: Transform not supported - actions must be an object literal".to_string()]
        );
    }
}
