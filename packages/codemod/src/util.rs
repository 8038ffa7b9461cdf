//! Utility Functions
//!
//! Naming helpers and the fixed name tables shared by the analyzer,
//! validator and class builder.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const LAYOUT_DECORATOR_NAME: &str = "layout";
pub const LAYOUT_DECORATOR_LOCAL_NAME: &str = "templateLayout";

/// Property names that become class-level decorators.
pub const CLASS_DECORATOR_PROPS: [&str; 5] = [
    LAYOUT_DECORATOR_NAME,
    "tagName",
    "classNames",
    "classNameBindings",
    "attributeBindings",
];

/// Imported names whose decorator form decorates a method.
pub const METHOD_DECORATORS: [&str; 3] = ["action", "on", "observer"];

/// Framework-dispatched methods and events. An action may not reuse these.
pub static LIFECYCLE_HOOKS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Methods
        "$",
        "addObserver",
        "cacheFor",
        "decrementProperty",
        "destroy",
        "didReceiveAttrs",
        "didRender",
        "didUpdate",
        "didUpdateAttrs",
        "get",
        "getProperties",
        "getWithDefault",
        "has",
        "incrementProperty",
        "init",
        "notifyPropertyChange",
        "off",
        "on",
        "one",
        "readDOMAttr",
        "removeObserver",
        "rerender",
        "send",
        "set",
        "setProperties",
        "toString",
        "toggleProperty",
        "trigger",
        "willDestroy",
        "willRender",
        "willUpdate",
        // Events
        "didInsertElement",
        "willClearRender",
        "willDestroyElement",
        "willInsertElement",
        // Touch events
        "touchStart",
        "touchMove",
        "touchEnd",
        "touchCancel",
        // Keyboard events
        "keyDown",
        "keyUp",
        "keyPress",
        // Mouse events
        "mouseDown",
        "mouseUp",
        "contextMenu",
        "click",
        "doubleClick",
        "mouseMove",
        "focusIn",
        "focusOut",
        "mouseEnter",
        "mouseLeave",
        // Form events
        "submit",
        "change",
        "input",
        // HTML5 drag and drop events
        "dragStart",
        "drag",
        "dragEnter",
        "dragLeave",
        "dragOver",
        "dragEnd",
        "drop",
    ]
    .into_iter()
    .collect()
});

static WORD_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_.\s]+").unwrap());

static LEGAL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

pub fn is_class_decorator_prop(name: &str) -> bool {
    CLASS_DECORATOR_PROPS.contains(&name)
}

pub fn is_legal_identifier(name: &str) -> bool {
    LEGAL_IDENTIFIER_RE.is_match(name)
}

/// Convert the first letter to uppercase
pub fn capitalize_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns true if the first character in the word is uppercase
pub fn starts_with_uppercase_letter(word: &str) -> bool {
    word.chars()
        .next()
        .map_or(false, |c| c.is_uppercase())
}

/// Convert dash, underscore or dot separated words to camelCase.
pub fn camel_case(input: &str) -> String {
    let mut words = WORD_SEPARATOR_RE.split(input).filter(|w| !w.is_empty());
    let mut result = match words.next() {
        Some(first) => lowercase_first_letter(first),
        None => return String::new(),
    };
    for word in words {
        result.push_str(&capitalize_first_letter(word));
    }
    result
}
